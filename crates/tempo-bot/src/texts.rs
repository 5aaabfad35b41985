//! Fixed reply texts.

/// Greeting sent for `/start`.
pub fn welcome(display_name: &str) -> String {
    format!(
        "👋 Welcome {display_name}!\n\
         \n\
         I'm Live Time Progress Bot ⏳\n\
         \n\
         I show real-time progress with simple bars.\n\
         \n\
         Commands:\n\
         /progress - Start live updates\n\
         /stop - Stop updates\n\
         /stats - Show current stats\n\
         /help - Show help\n\
         \n\
         Click /progress to begin! 🚀"
    )
}

pub const HELP: &str = "🤖 Live Time Progress Bot Help\n\
\n\
Commands:\n\
/start - Welcome message\n\
/progress - Start live updates\n\
/stop - Stop live updates\n\
/stats - Show current stats\n\
/help - Show this help\n\
\n\
Features:\n\
• Year progress with percentage\n\
• Day progress with percentage\n\
• Second progress tracking\n\
• Month information\n\
• Quotes change every minute\n\
• Updates every 5 seconds\n\
\n\
Enjoy watching time progress! ⏳";

pub const ALREADY_RUNNING: &str = "⏳ Live progress is already running! Use /stop to end it.";

/// Confirmation sent after a live message starts updating.
pub fn started(interval_secs: u64) -> String {
    format!(
        "✅ Live Progress Started!\n\
         \n\
         The progress is now updating every {interval_secs} seconds!\n\
         \n\
         Use /stop to end updates."
    )
}

pub const STOPPED: &str = "⏹️ Live Progress Stopped\n\nUse /progress to start again!";

pub const NOT_RUNNING: &str = "ℹ️ No active live progress found.\nUse /progress to start one!";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_addresses_user() {
        let text = welcome("Ada");
        assert!(text.starts_with("👋 Welcome Ada!\n\n"));
        assert!(text.ends_with("Click /progress to begin! 🚀"));
    }

    #[test]
    fn test_help_lists_every_command() {
        for command in ["/start", "/progress", "/stop", "/stats", "/help"] {
            assert!(HELP.contains(command), "help is missing {command}");
        }
        assert!(HELP.contains("\n\nFeatures:\n• Year progress"));
    }

    #[test]
    fn test_multiline_replies_keep_blank_lines() {
        let started = started(5);
        assert_eq!(started.lines().collect::<Vec<_>>(), [
            "✅ Live Progress Started!",
            "",
            "The progress is now updating every 5 seconds!",
            "",
            "Use /stop to end updates."
        ]);
        assert_eq!(STOPPED.lines().collect::<Vec<_>>(), [
            "⏹️ Live Progress Stopped",
            "",
            "Use /progress to start again!"
        ]);
    }
}
