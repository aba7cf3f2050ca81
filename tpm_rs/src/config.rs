use std::path::Path;

use eyre::Context;
use log::LevelFilter;

pub const CONFIG_FILE_NAME: &str = "tpm_config.json";

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct TpmConfig {
    /// Maximum level of log messages which are printed
    pub log_level: LevelFilter,
    /// Write the locations to disk right after every `set`/`rm`, instead of waiting for the next world save.
    pub save_on_change: bool,
    /// Whether successful `set`/`rm`/teleport feedback is echoed to other operators.
    pub broadcast_to_ops: bool,
}

impl Default for TpmConfig {
    fn default() -> Self {
        Self {
            log_level: LevelFilter::Info,
            save_on_change: false,
            broadcast_to_ops: true,
        }
    }
}

pub fn load_config(directory: impl AsRef<Path>) -> eyre::Result<TpmConfig> {
    let path = directory.as_ref().join(CONFIG_FILE_NAME);
    let file = std::fs::read(&path)?;

    if let Ok(conf) = serde_json::from_slice(&file) {
        Ok(conf)
    } else {
        log::warn!("Couldn't parse {}, replacing it with the default config", path.display());
        std::fs::remove_file(&path)?;
        create_initial_config(directory.as_ref())?;
        let file = std::fs::read(&path)?;
        serde_json::from_slice(&file).context("Couldn't load config.")
    }
}

pub fn create_initial_config(directory: impl AsRef<Path>) -> eyre::Result<()> {
    let default_conf = TpmConfig::default();
    let path = directory.as_ref().join(CONFIG_FILE_NAME);

    if !path.exists() {
        std::fs::create_dir_all(directory.as_ref())?;
        let mut file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(&mut file, &default_conf)?;
    }

    Ok(())
}
