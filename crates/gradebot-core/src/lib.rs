//! Core domain + application logic for the grade calculator / bug-report bot.
//!
//! This crate is framework-agnostic. Telegram lives behind the messaging port
//! implemented in the adapter crate.

pub mod app;
pub mod audit;
pub mod config;
pub mod conversation;
pub mod domain;
pub mod errors;
pub mod grades;
pub mod logging;
pub mod messaging;
pub mod relay;
pub mod texts;

pub use errors::{Error, Result};
