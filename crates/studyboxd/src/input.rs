//! Keyboard stand-ins for the device buttons

use studybox_api::Button;

/// A command read from the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Press(Button),
    Quit,
}

/// Map a single key to a command
pub fn parse_key(key: char) -> Option<KeyCommand> {
    match key.to_ascii_lowercase() {
        'n' => Some(KeyCommand::Press(Button::Scroll)),
        'p' | ' ' => Some(KeyCommand::Press(Button::StartPause)),
        'x' => Some(KeyCommand::Press(Button::Stop)),
        'q' => Some(KeyCommand::Quit),
        _ => None,
    }
}

/// Map a line of keys to commands, skipping unknown keys
pub fn parse_line(line: &str) -> Vec<KeyCommand> {
    line.chars().filter_map(parse_key).collect()
}
