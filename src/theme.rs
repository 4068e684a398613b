use ratatui::style::Color;

use crate::types::ThemeMode;

#[derive(Debug, Clone)]
pub struct Theme {
    pub fg: Color,
    pub bg: Color,
    pub dim: Color,
    pub border: Color,
    pub highlight_bg: Color,
    pub highlight_fg: Color,
    pub positive: Color,
    pub negative: Color,
    pub accent: Color,
    pub input_accent: Color,
    pub title: Color,
    pub error: Color,
    // chart axis ticks and labels
    pub axis: Color,
}

impl Default for Theme {
    fn default() -> Self {
        dark()
    }
}

pub fn for_mode(mode: ThemeMode) -> Theme {
    match mode {
        ThemeMode::Dark => dark(),
        ThemeMode::Light => light(),
    }
}

pub fn dark() -> Theme {
    Theme {
        fg: Color::Indexed(253),        // bright white
        bg: Color::Reset,
        dim: Color::Indexed(243),       // mid gray
        border: Color::Indexed(240),
        highlight_bg: Color::Indexed(237),
        highlight_fg: Color::Indexed(255),
        positive: Color::Indexed(46),   // vivid green
        negative: Color::Indexed(196),  // vivid red
        accent: Color::Indexed(81),     // sky cyan
        input_accent: Color::Indexed(220), // gold
        title: Color::Indexed(255),
        error: Color::Indexed(196),
        axis: Color::Indexed(245),
    }
}

pub fn light() -> Theme {
    Theme {
        fg: Color::Indexed(234),        // near black
        bg: Color::Indexed(231),        // white
        dim: Color::Indexed(246),       // mid gray
        border: Color::Indexed(251),    // light gray
        highlight_bg: Color::Indexed(253),
        highlight_fg: Color::Indexed(232),
        positive: Color::Indexed(28),   // dark green
        negative: Color::Indexed(124),  // dark red
        accent: Color::Indexed(25),     // dark blue
        input_accent: Color::Indexed(130), // dark orange
        title: Color::Indexed(232),     // black
        error: Color::Indexed(124),
        axis: Color::Indexed(240),
    }
}
