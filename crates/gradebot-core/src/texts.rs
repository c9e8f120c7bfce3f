//! User-facing strings. The bot speaks Russian only.

pub const GREETING: &str =
    "Привет! Я калькулятор оценок для стипендии и бот для баг-репортов. Выбери, что хочешь сделать!";
pub const ENTER_MIDTERM_BUTTON: &str = "Ввести оценку за регмид";

pub const HELP: &str = "Команды:\n\
/start — начать заново и открыть калькулятор\n\
/cancel — прервать ввод оценок\n\
/bug <текст> — отправить баг-репорт разработчикам\n\
/help — эта справка";
pub const UNKNOWN_COMMAND: &str = "Неизвестная команда. Напиши /help, чтобы увидеть список команд.";

pub const CANCELLED: &str = "Ввод оценок прерван. Нажми /start, чтобы начать заново.";
pub const NOTHING_TO_CANCEL: &str = "Сейчас нечего отменять.";

// Calculator
pub const ASK_MIDTERM: &str = "Введи оценку за регмид (от 0 до 100):";
pub const ASK_ENDTERM: &str = "Введи оценку за регэнд (от 0 до 100):";
pub const ASK_FINAL: &str = "Введи оценку за финальный экзамен (если не сдан, введи 0):";
pub const INVALID_TERM: &str = "Ошибка: введи число от 25 до 100.";
pub const INVALID_FINAL: &str = "Ошибка: введи число от 0 до 100.";
pub const SUMMER_COURSE: &str = "К сожалению, у тебя летний курс (╯︵╰,)";

pub const TIER_TOP_SCHOLARSHIP: &str = "Поздравляю! Ты получаешь повышенную стипендию! (>‿<)";
pub const TIER_SCHOLARSHIP: &str = "Отлично! Ты получаешь стипендию! (^_^)/";
pub const TIER_PASS: &str = "Ты не пересдаешь экзамен (^-^*)";
pub const TIER_RETAKE: &str = "К сожалению, тебе придется пересдать экзамен (╯︵╰,)";

// Bug reports
pub const DEVELOPER_REPLY_PREFIX: &str = "Ответ от разработчиков: ";
pub const BUG_USAGE: &str = "Опиши проблему после команды, например: /bug калькулятор не отвечает";
pub const BUG_ACCEPTED: &str =
    "Спасибо! Репорт отправлен разработчикам, ответ придет в этот чат.";
pub const BUG_NOT_DELIVERED: &str =
    "Не удалось отправить репорт разработчикам. Попробуй позже.";

/// Header line for a report posted into the staff chat.
pub fn bug_report(username: Option<&str>, user_id: i64, text: &str) -> String {
    let who = match username {
        Some(name) => format!("@{name}"),
        None => "пользователя".to_string(),
    };
    format!("🐞 Баг-репорт от {who} (id {user_id}):\n{text}")
}

pub fn developer_reply(text: &str) -> String {
    format!("{DEVELOPER_REPLY_PREFIX}{text}")
}
