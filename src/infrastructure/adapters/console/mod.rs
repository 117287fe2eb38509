//! Console adapter for development/testing

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Stdin};
use tokio::sync::Mutex;

use crate::application::errors::BotError;
use crate::domain::entities::{Button, Reply};
use crate::domain::traits::{Bot, BotInfo};

/// Chat id used for every console message
pub const CONSOLE_CHAT_ID: i64 = 0;

/// Console bot adapter for local development
pub struct ConsoleAdapter {
    info: BotInfo,
    /// Refuse web app buttons the way group chats do
    reject_web_app: bool,
    stdin: Mutex<BufReader<Stdin>>,
}

impl ConsoleAdapter {
    pub fn new() -> Self {
        Self {
            info: BotInfo {
                id: "console".to_string(),
                name: "mines-calculator-bot".to_string(),
                username: "console".to_string(),
            },
            reject_web_app: false,
            stdin: Mutex::new(BufReader::new(tokio::io::stdin())),
        }
    }

    pub fn with_web_app_rejection(mut self, reject: bool) -> Self {
        self.reject_web_app = reject;
        self
    }

    /// Read one line; `None` at end of input
    pub async fn read_line(&self, prompt: &str) -> Option<String> {
        println!("{}", prompt);
        let mut input = String::new();
        let read = self.stdin.lock().await.read_line(&mut input).await.ok()?;
        (read > 0).then(|| input.trim().to_string())
    }

    /// Render a reply the way it would appear in the chat
    pub fn render(reply: &Reply) -> String {
        let mut out = format!("[BOT] {}", reply.text);
        for row in &reply.rows {
            let row_text: Vec<String> = row
                .iter()
                .map(|b| match b {
                    Button::Link { label, .. } => format!("{} <{}>", label, b.url()),
                    Button::WebApp { label, .. } => format!("{} [web app <{}>]", label, b.url()),
                })
                .collect();
            out.push_str(&format!("\n  [Buttons] {}", row_text.join(" | ")));
        }
        out
    }
}

impl Default for ConsoleAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bot for ConsoleAdapter {
    async fn send_reply(&self, _chat_id: i64, reply: &Reply) -> Result<String, BotError> {
        if self.reject_web_app && reply.has_web_app() {
            return Err(BotError::PlatformRejection("Bad Request: BUTTON_TYPE_INVALID".to_string()));
        }
        println!("{}", Self::render(reply));
        Ok("console_msg".to_string())
    }

    fn bot_info(&self) -> BotInfo {
        self.info.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_buttons_per_row() {
        let reply = Reply::markdown("pick")
            .with_row(vec![Button::link("Open", "https://a.example")])
            .with_row(vec![Button::web_app("Here", "https://a.example")]);

        assert_eq!(
            ConsoleAdapter::render(&reply),
            "[BOT] pick\n  [Buttons] Open <https://a.example>\n  [Buttons] Here [web app <https://a.example>]"
        );
    }

    #[tokio::test]
    async fn rejects_web_app_when_asked() {
        let bot = ConsoleAdapter::new().with_web_app_rejection(true);
        let rich = Reply::text("x").with_row(vec![Button::web_app("Here", "https://a.example")]);

        assert!(bot.send_reply(CONSOLE_CHAT_ID, &rich).await.unwrap_err().is_platform_rejection());
        assert!(bot.send_reply(CONSOLE_CHAT_ID, &Reply::text("plain")).await.is_ok());
    }
}
