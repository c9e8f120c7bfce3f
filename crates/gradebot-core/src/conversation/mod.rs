//! Grade calculator: a per-user three-step dialogue (midterm, endterm, final).

pub mod engine;
pub mod state;
pub mod store;

pub use engine::{CalculatorEngine, Handled};
pub use state::{advance, Reply, Session, Stage, Transition};
pub use store::SessionStore;
