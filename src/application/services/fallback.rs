//! Reply delivery with tiered fallback
//!
//! A reply is attempted at a starting tier. When the platform refuses the
//! embedded web app button the same content is retried as a plain link, then
//! as bare text carrying the URL. Any other failure on the rich tier gets a
//! generic apology instead. Nothing here returns an error: every path ends in
//! an [`Outcome`] and failures are logged.

use crate::application::errors::BotError;
use crate::domain::entities::CommandEvent;
use crate::domain::traits::Bot;

use super::responder::CommandResponder;

/// Presentation tier of a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Static informational text (`/start`, `/help`), no tier below it
    Info,
    /// Link row followed by a web app row
    Rich,
    /// Single link row
    Simple,
    /// Plain text with the literal URL, no buttons
    TextOnly,
}

/// Terminal state of one delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Sent(Tier),
    /// The generic apology went out instead of the requested reply
    Apologized,
    /// Nothing reached the user; failures were logged
    Degraded,
}

/// Next action of the delivery state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Attempt(Tier),
    Apologize,
    Done(Outcome),
}

impl Step {
    /// Transition taken after an attempt at `tier` failed with `error`
    pub fn after_failure(tier: Tier, error: &BotError) -> Step {
        match tier {
            Tier::Rich if error.is_platform_rejection() => Step::Attempt(Tier::Simple),
            Tier::Rich | Tier::Info => Step::Apologize,
            Tier::Simple => Step::Attempt(Tier::TextOnly),
            Tier::TextOnly => Step::Done(Outcome::Degraded),
        }
    }
}

/// Drive the state machine from `start` until it reaches an outcome.
pub async fn deliver<B: Bot + ?Sized>(
    bot: &B,
    responder: &CommandResponder,
    event: &CommandEvent,
    start: Tier,
) -> Outcome {
    let mut step = Step::Attempt(start);

    loop {
        step = match step {
            Step::Attempt(tier) => {
                let reply = responder.reply_for(event.command, tier);
                match bot.send_reply(event.chat_id, &reply).await {
                    Ok(_) => Step::Done(Outcome::Sent(tier)),
                    Err(e) => {
                        let next = Step::after_failure(tier, &e);
                        log_failure(event, tier, &e, next);
                        next
                    }
                }
            }
            Step::Apologize => {
                match bot.send_reply(event.chat_id, &CommandResponder::apology_reply()).await {
                    Ok(_) => Step::Done(Outcome::Apologized),
                    Err(e) => {
                        tracing::error!(
                            command = %event.command,
                            chat_id = event.chat_id,
                            user_id = ?event.user_id,
                            "Failed to send apology: {}",
                            e
                        );
                        Step::Done(Outcome::Degraded)
                    }
                }
            }
            Step::Done(outcome) => return outcome,
        };
    }
}

fn log_failure(event: &CommandEvent, tier: Tier, error: &BotError, next: Step) {
    match next {
        Step::Attempt(fallback) => tracing::warn!(
            command = %event.command,
            chat_id = event.chat_id,
            user_id = ?event.user_id,
            "{:?} reply failed ({}), falling back to {:?}",
            tier,
            error,
            fallback
        ),
        _ => tracing::error!(
            command = %event.command,
            chat_id = event.chat_id,
            user_id = ?event.user_id,
            "{:?} reply failed: {}",
            tier,
            error
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::testing::ScriptedBot;
    use crate::domain::entities::BotCommand;

    const URL: &str = "https://calc.example.com/mines";

    fn mines_event() -> CommandEvent {
        CommandEvent::new(BotCommand::Mines, -100).with_user(7, Some("player".to_string()))
    }

    #[test]
    fn transitions() {
        let rejected = ScriptedBot::rejection();
        let network = ScriptedBot::network();

        assert_eq!(Step::after_failure(Tier::Rich, &rejected), Step::Attempt(Tier::Simple));
        assert_eq!(Step::after_failure(Tier::Rich, &network), Step::Apologize);
        assert_eq!(Step::after_failure(Tier::Simple, &rejected), Step::Attempt(Tier::TextOnly));
        assert_eq!(Step::after_failure(Tier::Simple, &network), Step::Attempt(Tier::TextOnly));
        assert_eq!(Step::after_failure(Tier::TextOnly, &network), Step::Done(Outcome::Degraded));
        assert_eq!(Step::after_failure(Tier::Info, &rejected), Step::Apologize);
    }

    #[tokio::test]
    async fn rich_reply_sent_on_first_try() {
        let bot = ScriptedBot::new();
        let responder = CommandResponder::new(URL);

        let outcome = deliver(&bot, &responder, &mines_event(), Tier::Rich).await;

        assert_eq!(outcome, Outcome::Sent(Tier::Rich));
        let attempts = bot.attempts();
        assert_eq!(attempts.len(), 1);
        assert_eq!(attempts[0].0, -100);
        assert!(attempts[0].1.has_web_app());
    }

    #[tokio::test]
    async fn rejection_falls_back_to_single_link_row() {
        let bot = ScriptedBot::failing_with(vec![ScriptedBot::rejection()]);
        let responder = CommandResponder::new(URL);

        let outcome = deliver(&bot, &responder, &mines_event(), Tier::Rich).await;

        assert_eq!(outcome, Outcome::Sent(Tier::Simple));
        let attempts = bot.attempts();
        assert_eq!(attempts.len(), 2);
        let delivered = &attempts[1].1;
        assert_eq!(delivered.rows.len(), 1);
        assert_eq!(delivered.rows[0].len(), 1);
        assert!(!delivered.has_web_app());
        assert_eq!(delivered.rows[0][0].url(), URL);
    }

    #[tokio::test]
    async fn second_failure_makes_exactly_one_text_attempt() {
        let bot = ScriptedBot::failing_with(vec![
            ScriptedBot::rejection(),
            ScriptedBot::network(),
        ]);
        let responder = CommandResponder::new(URL);

        let outcome = deliver(&bot, &responder, &mines_event(), Tier::Rich).await;

        assert_eq!(outcome, Outcome::Sent(Tier::TextOnly));
        let attempts = bot.attempts();
        assert_eq!(attempts.len(), 3);
        let last = &attempts[2].1;
        assert!(last.rows.is_empty());
        assert!(last.text.contains(URL));
        assert_eq!(last.parse_mode, None);
    }

    #[tokio::test]
    async fn text_failure_is_terminal() {
        let bot = ScriptedBot::failing_with(vec![
            ScriptedBot::rejection(),
            ScriptedBot::rejection(),
            ScriptedBot::network(),
        ]);
        let responder = CommandResponder::new(URL);

        let outcome = deliver(&bot, &responder, &mines_event(), Tier::Rich).await;

        assert_eq!(outcome, Outcome::Degraded);
        assert_eq!(bot.attempts().len(), 3);
    }

    #[tokio::test]
    async fn unexpected_failure_on_rich_skips_the_chain() {
        let bot = ScriptedBot::failing_with(vec![ScriptedBot::network()]);
        let responder = CommandResponder::new(URL);

        let outcome = deliver(&bot, &responder, &mines_event(), Tier::Rich).await;

        assert_eq!(outcome, Outcome::Apologized);
        let attempts = bot.attempts();
        assert_eq!(attempts.len(), 2);
        assert_eq!(attempts[1].1, CommandResponder::apology_reply());
        assert!(!attempts[1].1.text.contains(URL));
    }

    #[tokio::test]
    async fn failed_apology_is_only_logged() {
        let bot = ScriptedBot::failing_with(vec![
            ScriptedBot::network(),
            ScriptedBot::network(),
        ]);
        let responder = CommandResponder::new(URL);

        let outcome = deliver(&bot, &responder, &mines_event(), Tier::Rich).await;

        assert_eq!(outcome, Outcome::Degraded);
        assert_eq!(bot.attempts().len(), 2);
    }

    #[tokio::test]
    async fn simple_tier_never_sends_web_app() {
        let bot = ScriptedBot::failing_with(vec![ScriptedBot::rejection()]);
        let responder = CommandResponder::new(URL);
        let event = CommandEvent::new(BotCommand::MinesSimple, 5);

        let outcome = deliver(&bot, &responder, &event, Tier::Simple).await;

        assert_eq!(outcome, Outcome::Sent(Tier::TextOnly));
        assert!(bot.attempts().iter().all(|(_, reply)| !reply.has_web_app()));
    }
}
