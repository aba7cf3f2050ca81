use log::LevelFilter;

pub use crate::app::TpmApp;
pub use crate::commands::{CommandError, CommandRouter, TpmCommand, REQUIRED_PERMISSION_LEVEL};
pub use crate::config::TpmConfig;
pub use crate::host::{ActorHandle, CommandSource, Feedback, FeedbackKind, Host, Side, WorldHandle};
pub use crate::location::{BlockPos, Coordinates, LocationRecord};
pub use crate::registry::{LocationRegistry, RegistryError, RegistryStore};

pub mod app;
pub mod commands;
pub mod config;
pub mod host;
pub mod location;
pub mod registry;
pub mod storage;
pub mod teleport;

/// Set up the global logger, should be called once before creating a [TpmApp].
///
/// The logger itself accepts everything, verbosity is controlled by [set_log_level] so it can change at runtime.
pub fn init_logging(level: LevelFilter) -> eyre::Result<()> {
    let cfg = simplelog::ConfigBuilder::new()
        .set_target_level(LevelFilter::Error)
        .set_thread_level(LevelFilter::Off)
        .build();

    simplelog::TermLogger::init(
        LevelFilter::Trace,
        cfg,
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    )?;
    set_log_level(level);

    Ok(())
}

pub fn set_log_level(level: LevelFilter) {
    log::set_max_level(level);
}
