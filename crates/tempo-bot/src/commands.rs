//! Command parsing and dispatch.
//!
//! A [`Dispatcher`] turns a [`CommandEvent`] into session changes and replies.
//! Replies go through the same [`MessageTransport`] the update loops use.

use std::sync::Arc;

use tempo_core::log_session_event;
use tempo_telegram::{ChatId, MessageId, MessageTransport, TransportError};
use tracing::{debug, info};

use crate::session::SessionRegistry;
use crate::texts;
use crate::updater::Updater;

/// Commands the bot understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Progress,
    Stop,
    Stats,
    Help,
}

impl Command {
    /// Parse the first word of a message.
    ///
    /// Accepts `/name`, `/name@botname` and trailing arguments. Returns `None`
    /// for plain text and unknown commands.
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        let name = word.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name);

        match name.to_ascii_lowercase().as_str() {
            "start" => Some(Self::Start),
            "progress" => Some(Self::Progress),
            "stop" => Some(Self::Stop),
            "stats" => Some(Self::Stats),
            "help" => Some(Self::Help),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Progress => "progress",
            Self::Stop => "stop",
            Self::Stats => "stats",
            Self::Help => "help",
        }
    }
}

/// A parsed command from one conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEvent {
    pub chat_id: ChatId,
    pub user_display_name: String,
    pub command: Command,
}

/// What handling a command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Welcomed,
    /// A new loop was launched for the given message
    Started { message: MessageId },
    AlreadyRunning,
    /// The chat was stopped while the initial message was in flight
    StartCancelled,
    Stopped,
    NotRunning,
    StatsSent,
    HelpSent,
}

/// Routes commands to session changes and replies.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn MessageTransport>,
    sessions: Arc<SessionRegistry>,
    updater: Updater,
}

impl Dispatcher {
    pub fn new(
        transport: Arc<dyn MessageTransport>,
        sessions: Arc<SessionRegistry>,
        updater: Updater,
    ) -> Self {
        Self {
            transport,
            sessions,
            updater,
        }
    }

    /// Handle one command.
    ///
    /// Errors are delivery failures of replies or of the initial progress
    /// message; session state is left consistent either way.
    pub async fn handle(&self, event: &CommandEvent) -> Result<CommandOutcome, TransportError> {
        let chat = event.chat_id;
        debug!(chat_id = %chat, command = event.command.name(), "handling command");

        match event.command {
            Command::Start => {
                self.reply(chat, &texts::welcome(&event.user_display_name))
                    .await?;
                Ok(CommandOutcome::Welcomed)
            }
            Command::Progress => self.start_progress(chat).await,
            Command::Stop => {
                if self.sessions.stop(chat) {
                    log_session_event!(chat, "stopped");
                    self.reply(chat, texts::STOPPED).await?;
                    Ok(CommandOutcome::Stopped)
                } else {
                    self.reply(chat, texts::NOT_RUNNING).await?;
                    Ok(CommandOutcome::NotRunning)
                }
            }
            Command::Stats => {
                let text = self.updater.render_now();
                self.reply(chat, &text).await?;
                Ok(CommandOutcome::StatsSent)
            }
            Command::Help => {
                self.reply(chat, texts::HELP).await?;
                Ok(CommandOutcome::HelpSent)
            }
        }
    }

    async fn start_progress(&self, chat: ChatId) -> Result<CommandOutcome, TransportError> {
        let Some(ticket) = self.sessions.try_begin(chat) else {
            self.reply(chat, texts::ALREADY_RUNNING).await?;
            return Ok(CommandOutcome::AlreadyRunning);
        };

        let initial = self.updater.render_now();
        let message = match self.transport.send(chat, &initial).await {
            Ok(message) => message,
            Err(err) => {
                self.sessions.abort(&ticket);
                return Err(err);
            }
        };

        if !self.sessions.confirm(&ticket, message) {
            info!(chat_id = %chat, "progress stopped before it started");
            return Ok(CommandOutcome::StartCancelled);
        }

        log_session_event!(chat, "started", message_id = %message, generation = ticket.generation);
        self.updater.spawn(ticket, message);

        let interval_secs = self.updater.timing().update_interval.as_secs();
        self.reply(chat, &texts::started(interval_secs)).await?;
        Ok(CommandOutcome::Started { message })
    }

    async fn reply(&self, chat: ChatId, text: &str) -> Result<MessageId, TransportError> {
        self.transport.send(chat, text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_commands() {
        assert_eq!(Command::parse("/start"), Some(Command::Start));
        assert_eq!(Command::parse("/progress"), Some(Command::Progress));
        assert_eq!(Command::parse("/stop"), Some(Command::Stop));
        assert_eq!(Command::parse("/stats"), Some(Command::Stats));
        assert_eq!(Command::parse("/help"), Some(Command::Help));
    }

    #[test]
    fn test_parse_ignores_bot_suffix_and_arguments() {
        assert_eq!(
            Command::parse("/progress@TempoBot"),
            Some(Command::Progress)
        );
        assert_eq!(Command::parse("/stop now please"), Some(Command::Stop));
        assert_eq!(Command::parse("  /stats@x extra"), Some(Command::Stats));
        assert_eq!(Command::parse("/HELP"), Some(Command::Help));
    }

    #[test]
    fn test_parse_rejects_non_commands() {
        assert_eq!(Command::parse("hello"), None);
        assert_eq!(Command::parse(""), None);
        assert_eq!(Command::parse("/"), None);
        assert_eq!(Command::parse("/unknown"), None);
        assert_eq!(Command::parse("progress /stop"), None);
    }

    #[test]
    fn test_command_names_round_trip() {
        for command in [
            Command::Start,
            Command::Progress,
            Command::Stop,
            Command::Stats,
            Command::Help,
        ] {
            let text = format!("/{}", command.name());
            assert_eq!(Command::parse(&text), Some(command));
        }
    }
}
