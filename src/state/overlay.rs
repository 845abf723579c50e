//! Modal overlay slot

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::info;

/// Text shown by the kindness overlay
pub const KIND_WORD: &str = "You are doing a lot with the energy you have. That is enough.";

/// Soundscapes listed by the sound bath overlay
pub const SOUNDSCAPES: [&str; 3] = ["Rain", "Forest", "Ocean"];

/// Which overlay, if any, covers the main screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overlay {
    #[default]
    None,
    Sounds,
    Kindness,
    Doodle,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown overlay {0:?}")]
pub struct UnknownOverlay(pub String);

impl FromStr for Overlay {
    type Err = UnknownOverlay;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Overlay::None),
            "sounds" => Ok(Overlay::Sounds),
            "kindness" => Ok(Overlay::Kindness),
            "doodle" => Ok(Overlay::Doodle),
            other => Err(UnknownOverlay(other.to_string())),
        }
    }
}

impl fmt::Display for Overlay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Overlay::None => "none",
            Overlay::Sounds => "sounds",
            Overlay::Kindness => "kindness",
            Overlay::Doodle => "doodle",
        };
        f.write_str(name)
    }
}

/// Static content of an overlay
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "overlay", rename_all = "lowercase")]
pub enum OverlayContent {
    None,
    Sounds { soundscapes: Vec<&'static str> },
    Kindness { message: &'static str },
    /// The doodle overlay shows the live canvas, see `/doodle.png`
    Doodle,
}

impl Overlay {
    pub fn content(self) -> OverlayContent {
        match self {
            Overlay::None => OverlayContent::None,
            Overlay::Sounds => OverlayContent::Sounds {
                soundscapes: SOUNDSCAPES.to_vec(),
            },
            Overlay::Kindness => OverlayContent::Kindness { message: KIND_WORD },
            Overlay::Doodle => OverlayContent::Doodle,
        }
    }
}

/// Single overlay slot; opening replaces, closing empties
///
/// The slot only tracks visibility. Whatever an overlay shows is owned
/// elsewhere and survives the overlay being closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlaySlot {
    current: Overlay,
}

impl OverlaySlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Overlay {
        self.current
    }

    /// Show `overlay`, returning the one it replaced
    pub fn open(&mut self, overlay: Overlay) -> Overlay {
        let previous = std::mem::replace(&mut self.current, overlay);
        info!("Overlay {} -> {}", previous, overlay);
        previous
    }

    /// Return to no overlay, returning the one that was open
    pub fn close(&mut self) -> Overlay {
        self.open(Overlay::None)
    }
}
