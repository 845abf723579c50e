//! Mood presets and the active mood selection

use serde::Serialize;
use tiny_skia::Color;
use tracing::{debug, info};

/// Errors raised while turning a preset's hex string into a color
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("expected a #RRGGBB color, got {0:?}")]
    Malformed(String),
}

/// A named (emoji, accent, background tint) triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoodPreset {
    pub emoji: &'static str,
    pub label: &'static str,
    /// Primary accent, also used as doodle ink
    pub theme: &'static str,
    /// Background tint
    pub secondary: &'static str,
}

/// The fixed preset table, in display order
pub static MOODS: [MoodPreset; 5] = [
    MoodPreset {
        emoji: "🌋",
        label: "Erupting",
        theme: "#E07A5F",
        secondary: "#F5D5CB",
    },
    MoodPreset {
        emoji: "🌊",
        label: "Choppy",
        theme: "#81B29A",
        secondary: "#D8E2DC",
    },
    MoodPreset {
        emoji: "🌤️",
        label: "Cloudy",
        theme: "#3D405B",
        secondary: "#E7DFDD",
    },
    MoodPreset {
        emoji: "🍃",
        label: "Breezy",
        theme: "#6A994E",
        secondary: "#CFE1B9",
    },
    MoodPreset {
        emoji: "🌌",
        label: "Zen",
        theme: "#5F797B",
        secondary: "#DDE5E7",
    },
];

/// "Cloudy"
pub const DEFAULT_MOOD_INDEX: usize = 2;

impl MoodPreset {
    /// Find a preset by its exact label
    pub fn find(label: &str) -> Option<&'static MoodPreset> {
        MOODS.iter().find(|mood| mood.label == label)
    }

    /// Accent color as an opaque RGB color
    pub fn theme_color(&self) -> Result<Color, ColorError> {
        parse_hex(self.theme)
    }
}

/// Parse a `#RRGGBB` string into an opaque color
pub fn parse_hex(hex: &str) -> Result<Color, ColorError> {
    let malformed = || ColorError::Malformed(hex.to_string());

    let digits = hex.strip_prefix('#').ok_or_else(malformed)?;
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(malformed());
    }

    let value = u32::from_str_radix(digits, 16).map_err(|_| malformed())?;
    let [_, r, g, b] = value.to_be_bytes();
    Ok(Color::from_rgba8(r, g, b, 255))
}

/// Holds the currently selected preset
///
/// Some preset is always active; an unknown label never clears it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodSelector {
    active: &'static MoodPreset,
}

impl MoodSelector {
    pub fn new() -> Self {
        Self {
            active: &MOODS[DEFAULT_MOOD_INDEX],
        }
    }

    pub fn active(&self) -> &'static MoodPreset {
        self.active
    }

    /// Select the preset named `label`
    ///
    /// Returns the newly active preset, or `None` when no preset matches, in
    /// which case the previous selection is kept.
    pub fn select(&mut self, label: &str) -> Option<&'static MoodPreset> {
        match MoodPreset::find(label) {
            Some(preset) => {
                self.active = preset;
                info!("Mood set to {}", preset.label);
                Some(preset)
            }
            None => {
                debug!("Ignoring unknown mood {:?}, keeping {}", label, self.active.label);
                None
            }
        }
    }
}

impl Default for MoodSelector {
    fn default() -> Self {
        Self::new()
    }
}
