use ratatui::style::Color;

pub struct Theme {
    pub border_focus: Color,
    pub border_inactive: Color,
    pub chat_border: Color,
    pub timestamp: Color,
    pub sender_you: Color,
    pub sender_ai: Color,
    pub sender_system: Color,
    pub code_fg: Color,
    pub code_bg: Color,
    pub code_header: Color,
}

pub const THEME: Theme = Theme {
    border_focus: Color::Cyan,
    border_inactive: Color::DarkGray,
    chat_border: Color::DarkGray,
    timestamp: Color::Gray,
    sender_you: Color::Rgb(100, 180, 255),
    sender_ai: Color::Rgb(80, 180, 120),
    sender_system: Color::Yellow,
    code_fg: Color::Rgb(230, 230, 240),
    code_bg: Color::Rgb(30, 34, 40),
    code_header: Color::Rgb(150, 200, 255),
};
