use clap::ValueEnum;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Named colour schemes. Each one only changes the accent colour.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Default,
    ValueEnum,
    Serialize,
    Deserialize,
    strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    #[default]
    Charcoal,
    Ocean,
    Grape,
    Forest,
    Sunrise,
    Paper,
}

impl Theme {
    pub const ALL: [Theme; 6] = [
        Theme::Charcoal,
        Theme::Ocean,
        Theme::Grape,
        Theme::Forest,
        Theme::Sunrise,
        Theme::Paper,
    ];

    pub fn accent_rgb(&self) -> (u8, u8, u8) {
        match self {
            Theme::Charcoal => (0xe2, 0xb7, 0x14),
            Theme::Ocean => (0x4f, 0xb3, 0xd9),
            Theme::Grape => (0xb4, 0x8e, 0xf0),
            Theme::Forest => (0x6a, 0xbf, 0x69),
            Theme::Sunrise => (0xf2, 0x8c, 0x52),
            Theme::Paper => (0x44, 0x44, 0x44),
        }
    }

    pub fn accent(&self) -> Color {
        let (r, g, b) = self.accent_rgb();
        Color::Rgb(r, g, b)
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}
