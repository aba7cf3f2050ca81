use std::path::{Path, PathBuf};

use eyre::Context;
use tpm_rs::BlockPos;

pub const CONFIG_FILE_NAME: &str = "tpm_console.json";

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct ConsoleConfig {
    /// Name of the simulated top-level world, its data lives in `<saves_directory>/<world_name>`.
    pub world_name: String,
    pub saves_directory: PathBuf,
    pub actors: Vec<ActorConfig>,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone)]
pub struct ActorConfig {
    pub name: String,
    pub region: String,
    pub position: BlockPos,
    pub permission_level: u8,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            world_name: "world".to_string(),
            saves_directory: PathBuf::from("saves"),
            actors: vec![
                ActorConfig {
                    name: "Admin".to_string(),
                    region: "minecraft:overworld".to_string(),
                    position: BlockPos::new(0, 64, 0),
                    permission_level: 4,
                },
                ActorConfig {
                    name: "Steve".to_string(),
                    region: "minecraft:overworld".to_string(),
                    position: BlockPos::new(120, 72, -45),
                    permission_level: 0,
                },
                ActorConfig {
                    name: "Alex".to_string(),
                    region: "minecraft:the_nether".to_string(),
                    position: BlockPos::new(15, 40, -6),
                    permission_level: 0,
                },
            ],
        }
    }
}

pub fn load_config(directory: impl AsRef<Path>) -> eyre::Result<ConsoleConfig> {
    let path = directory.as_ref().join(CONFIG_FILE_NAME);
    let file = std::fs::read(&path)?;

    let conf = serde_json::from_slice(&file).with_context(|| format!("Couldn't parse {}", path.display()))?;
    validate_config(&conf)?;

    Ok(conf)
}

pub fn create_initial_config(directory: impl AsRef<Path>) -> eyre::Result<()> {
    let path = directory.as_ref().join(CONFIG_FILE_NAME);

    if !path.exists() {
        let mut file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(&mut file, &ConsoleConfig::default())?;
    }

    Ok(())
}

pub fn validate_config(conf: &ConsoleConfig) -> eyre::Result<()> {
    if conf.world_name.is_empty() {
        eyre::bail!("`world_name` can't be empty");
    }

    for (i, actor) in conf.actors.iter().enumerate() {
        if conf.actors[..i].iter().any(|other| other.name == actor.name) {
            eyre::bail!("Actor `{}` is defined more than once", actor.name);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ConsoleConfig::default()).is_ok());
    }

    #[test]
    fn duplicate_actors_are_rejected() {
        let mut conf = ConsoleConfig::default();
        let first = conf.actors[0].clone();
        conf.actors.push(first);

        assert!(validate_config(&conf).is_err());
    }
}
