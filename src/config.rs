use crate::error::AppError;
use crate::render::Viewport;
use crate::state::AnimationSpeeds;
use clap::{Parser, ValueEnum};
use std::time::Duration;

/// Where frames are drawn
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Frontend {
    /// Desktop window (needs the `gui` feature)
    Window,
    /// Full-screen terminal rendering
    Console,
}

impl Default for Frontend {
    fn default() -> Self {
        if cfg!(feature = "gui") {
            Frontend::Window
        } else {
            Frontend::Console
        }
    }
}

/// Animated 2D affine transformations
#[derive(Parser, Debug)]
#[command(name = "transform-animator", version, about)]
pub struct Cli {
    /// Display to draw on
    #[arg(long, value_enum, default_value_t = Frontend::default())]
    pub frontend: Frontend,

    /// Milliseconds between animation ticks
    #[arg(long, default_value_t = 10)]
    pub interval_ms: u64,

    /// Degrees the blue square turns per tick
    #[arg(long, default_value_t = 6.0, allow_negative_numbers = true)]
    pub rotation_speed: f64,

    /// Frequency multiplier for the translation oscillators
    #[arg(long, default_value_t = 4.0, allow_negative_numbers = true)]
    pub translation_speed: f64,

    /// Frequency multiplier for the scale oscillators
    #[arg(long, default_value_t = 2.0, allow_negative_numbers = true)]
    pub scale_speed: f64,

    /// Logical width of the drawing area
    #[arg(long, default_value_t = 800.0)]
    pub width: f64,

    /// Logical height of the drawing area
    #[arg(long, default_value_t = 600.0)]
    pub height: f64,

    /// Quit after this many animation ticks; paused time does not count (console only)
    #[arg(long)]
    pub frames: Option<u64>,

    /// Start with the debug overlay shown
    #[arg(long)]
    pub debug: bool,
}

/// Validated runtime settings
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub frontend: Frontend,
    pub interval: Duration,
    pub speeds: AnimationSpeeds,
    pub viewport: Viewport,
    pub frames: Option<u64>,
    pub debug: bool,
}

fn finite(name: &str, value: f64) -> Result<f64, AppError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AppError::InvalidConfig(format!("{} must be a finite number, got {}", name, value)))
    }
}

/// Smallest accepted viewport side, in logical pixels
pub const MIN_VIEWPORT_SIDE: f64 = 1.0;

fn viewport_side(name: &str, value: f64) -> Result<f64, AppError> {
    if finite(name, value)? >= MIN_VIEWPORT_SIDE {
        Ok(value)
    } else {
        Err(AppError::InvalidConfig(format!(
            "{} must be at least {}, got {}",
            name, MIN_VIEWPORT_SIDE, value
        )))
    }
}

impl Cli {
    pub fn into_settings(self) -> Result<Settings, AppError> {
        if self.interval_ms == 0 {
            return Err(AppError::InvalidConfig(
                "interval-ms must be greater than zero".to_string(),
            ));
        }

        let speeds = AnimationSpeeds {
            rotation: finite("rotation-speed", self.rotation_speed)?,
            translation: finite("translation-speed", self.translation_speed)?,
            scale: finite("scale-speed", self.scale_speed)?,
        };
        let viewport = Viewport {
            width: viewport_side("width", self.width)?,
            height: viewport_side("height", self.height)?,
        };

        Ok(Settings {
            frontend: self.frontend,
            interval: Duration::from_millis(self.interval_ms),
            speeds,
            viewport,
            frames: self.frames,
            debug: self.debug,
        })
    }
}
