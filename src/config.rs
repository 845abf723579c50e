//! Configuration and CLI argument handling

use clap::Parser;

use crate::state::presence::DEFAULT_ONLINE_COUNT;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "exhale")]
#[command(about = "A headless session host for breathing, doodling and mood check-ins")]
#[command(version)]
pub struct Config {
    /// Port to bind the control surface to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Doodle canvas width in logical pixels
    #[arg(long, default_value = "360")]
    pub canvas_width: f32,

    /// Doodle canvas height in logical pixels
    #[arg(long, default_value = "560")]
    pub canvas_height: f32,

    /// Device pixel ratio used to size the canvas backing buffer
    #[arg(long, default_value = "1.0")]
    pub pixel_ratio: f32,

    /// Initial "souls breathing together" count
    #[arg(long, default_value_t = DEFAULT_ONLINE_COUNT)]
    pub online_start: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Session parameters fixed at startup
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub pixel_ratio: f32,
    pub online_start: u32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            canvas_width: 360.0,
            canvas_height: 560.0,
            pixel_ratio: 1.0,
            online_start: DEFAULT_ONLINE_COUNT,
        }
    }
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            canvas_width: self.canvas_width,
            canvas_height: self.canvas_height,
            pixel_ratio: self.pixel_ratio,
            online_start: self.online_start,
        }
    }
}
