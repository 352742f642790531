pub mod chat;
pub mod quota;
pub mod settings;
pub mod write;

use colored::Colorize;
use storywell_core::assistant::ChatMessage;

/// Prints an assistant reply, one colored line at a time.
pub(crate) fn print_assistant(message: &ChatMessage) {
    for line in message.text().lines() {
        println!("{}", line.bright_blue());
    }
}
