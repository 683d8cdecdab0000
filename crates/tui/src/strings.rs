// Centralized UI strings and labels.

pub const TITLE_CHAT: &str = " Chat ";
pub const TITLE_INPUT: &str = " Input ";
pub const TITLE_PROCESSING: &str = " Processing... ";

pub const INPUT_HINT: &str = "Ask me anything about coding... (Enter to send)";
pub const KEY_HINTS: &str = "Enter send | Alt+Enter newline | Ctrl+Y copy code | Ctrl+L clear | Esc quit";

pub const NOTICE_COPIED: &str = "Code copied to clipboard";

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

pub fn welcome_message(model: &str, endpoint: &str) -> String {
    format!("Using {} at {}. Ask a coding question to get started.", model, endpoint)
}

pub fn notice_copy_failed(reason: &str) -> String {
    format!("Failed to copy code: {}", reason)
}

pub fn code_header(language: &str) -> String {
    format!("▸ {} CODE", language.to_uppercase())
}

pub fn status_line(model: &str, endpoint: &str, in_flight: bool, tick: u64) -> String {
    if in_flight {
        let frame = SPINNER[(tick / 2) as usize % SPINNER.len()];
        format!(" {} @ {} {} waiting for reply", model, endpoint, frame)
    } else {
        format!(" {} @ {} ready | {}", model, endpoint, KEY_HINTS)
    }
}
