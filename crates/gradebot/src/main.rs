use std::sync::Arc;

use gradebot_core::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Arc::new(Config::load()?);
    gradebot_core::logging::init("gradebot", cfg.log_file.as_deref())?;

    if let Err(e) = gradebot_telegram::router::run_polling(cfg).await {
        tracing::error!(error = %e, "telegram bot failed");
        return Err(e);
    }

    Ok(())
}
