//! Shell help text.

use super::command::ShellCommand;

pub fn help_text() -> String {
    let mut text = String::from("Options:");
    for command in ShellCommand::ALL {
        text.push_str(&format!("\n  {}  {}", command.key(), command.description()));
    }
    text
}
