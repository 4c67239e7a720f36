mod config;
mod console;
mod error;
mod fps;
mod graphics;
mod math;
mod render;
mod state;
#[cfg(feature = "gui")]
mod widget;

use clap::Parser;
use config::{Cli, Frontend};
use error::AppError;

/// Main function
fn main() -> Result<(), AppError> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let settings = Cli::parse().into_settings()?;
    log::info!(
        "starting {} {} with {:?}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        settings
    );

    match settings.frontend {
        Frontend::Console => console::run(&settings),
        #[cfg(feature = "gui")]
        Frontend::Window => widget::run(&settings),
        #[cfg(not(feature = "gui"))]
        Frontend::Window => Err(AppError::FrontendUnavailable("window")),
    }
}
