use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*, types::BotCommand};
use tracing::{info, warn};

use gradebot_core::{
    app::GradeBot,
    audit::AuditLogger,
    config::Config,
    domain::{ChatId, UserId},
    messaging::port::MessagingPort,
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub core: Arc<GradeBot>,
    pub staff_chat: ChatId,
}

fn bot_commands() -> Vec<BotCommand> {
    vec![
        BotCommand::new("start", "Открыть калькулятор оценок"),
        BotCommand::new("cancel", "Прервать ввод оценок"),
        BotCommand::new("bug", "Отправить баг-репорт разработчикам"),
        BotCommand::new("help", "Список команд"),
    ]
}

pub async fn run_polling(cfg: Arc<Config>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    // The bot's own id is needed by the relay's self-reply guard; resolve it
    // before serving anything.
    let me = bot.get_me().await?;
    let bot_id = UserId(me.id.0 as i64);
    info!(
        username = %me.username(),
        bot_id = bot_id.0,
        staff_chat = cfg.bug_report_chat_id.0,
        "gradebot started"
    );

    if let Err(e) = bot.set_my_commands(bot_commands()).await {
        warn!(error = %e, "failed to register bot commands");
    }

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let audit = Arc::new(AuditLogger::new(
        cfg.audit_log_path.clone(),
        cfg.audit_log_json,
    ));

    let state = Arc::new(AppState {
        core: Arc::new(GradeBot::new(
            cfg.bug_report_chat_id,
            bot_id,
            messenger,
            audit,
        )),
        staff_chat: cfg.bug_report_chat_id,
    });

    let handler = dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .branch(Update::filter_message().endpoint(handlers::handle_message));

    info!("polling for updates");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}
