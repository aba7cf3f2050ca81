use std::path::PathBuf;

use crate::commands::{CommandError, CommandRouter, COMMAND_NAME, USAGE};
use crate::config::TpmConfig;
use crate::host::{CommandSource, Feedback, Host, WorldHandle};
use crate::registry::RegistryStore;

/// Glue between a [Host] and the waypoint commands, owning the per-world registries.
pub struct TpmApp<H: Host> {
    host: H,
    store: RegistryStore,
    router: CommandRouter,
    config: TpmConfig,
}

impl<H: Host> TpmApp<H> {
    pub fn new(saves_directory: impl Into<PathBuf>, host: H, config: TpmConfig) -> Self {
        let saves_directory = saves_directory.into();
        log::info!("TPM commands registered.");
        log::debug!("Global locations are stored under {}", saves_directory.display());

        Self {
            host,
            store: RegistryStore::new(saves_directory),
            router: CommandRouter::new(config.broadcast_to_ops),
            config,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Replace the active config, e.g. after the user edited the config file.
    pub fn set_config(&mut self, config: TpmConfig) {
        self.router = CommandRouter::new(config.broadcast_to_ops);
        self.config = config;
    }

    /// Execute a full command line such as `/tpm set base` for `source`.
    ///
    /// Anything a user can cause is reported back to `source` as a failure line. Only misuse of the registry
    /// (wrong side) and storage failures are returned as errors.
    pub fn run_command(&mut self, source: &CommandSource, line: &str) -> eyre::Result<()> {
        let mut tokens = line.trim().trim_start_matches('/').split_whitespace();

        if tokens.next() != Some(COMMAND_NAME) {
            self.host
                .send_feedback(source, Feedback::failure(format!("Unknown command: {}", line.trim())));
            return Ok(());
        }

        let args: Vec<&str> = tokens.collect();
        log::debug!("Running `{COMMAND_NAME} {}` for {:?}", args.join(" "), source.actor);

        match self.router.execute(&mut self.host, &mut self.store, source, &args) {
            Ok(()) => {
                if self.config.save_on_change {
                    self.store.save(&source.world.name)?;
                }
            }
            Err(CommandError::Registry(e)) => return Err(e.into()),
            Err(e @ CommandError::Syntax(_)) => {
                self.host.send_feedback(source, Feedback::failure(e.to_string()));
                self.host.send_feedback(source, Feedback::failure(format!("Usage: {USAGE}")));
            }
            Err(e @ CommandError::Host(_)) => {
                log::warn!("Command `{}` failed in the host: {e}", line.trim());
                self.host.send_feedback(source, Feedback::failure(e.to_string()));
            }
            Err(e) => self.host.send_feedback(source, Feedback::failure(e.to_string())),
        }

        Ok(())
    }

    /// Completion candidates for the partially typed `line`.
    pub fn suggest(&mut self, source: &CommandSource, line: &str) -> Vec<String> {
        let line = line.trim_start().trim_start_matches('/');
        let mut tokens: Vec<&str> = line.split_whitespace().collect();

        if tokens.first() != Some(&COMMAND_NAME) {
            return Vec::new();
        }
        // A trailing space starts a new, still empty, argument.
        if line.ends_with(char::is_whitespace) {
            tokens.push("");
        }

        self.router.suggest(&mut self.store, source, &tokens[1..])
    }

    /// Host hook for world saves, flushes that world's locations if they changed.
    pub fn on_world_save(&mut self, world: &WorldHandle) -> eyre::Result<()> {
        self.store.save(&world.name)?;
        Ok(())
    }

    pub fn on_world_unload(&mut self, world: &WorldHandle) -> eyre::Result<()> {
        self.store.unload(&world.name)?;
        log::info!("Unloaded global locations of `{}`", world.name);
        Ok(())
    }

    pub fn save_all(&mut self) -> eyre::Result<()> {
        self.store.save_all()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::host::{ActorHandle, Side};
    use crate::location::{BlockPos, Coordinates};

    #[derive(Default)]
    struct WorldHost {
        positions: HashMap<String, (String, BlockPos)>,
        lines: Vec<String>,
    }

    impl Host for WorldHost {
        fn resolve_actor(&self, name: &str) -> Option<ActorHandle> {
            self.positions.contains_key(name).then(|| ActorHandle(name.to_string()))
        }

        fn actor_region(&self, actor: &ActorHandle) -> eyre::Result<String> {
            Ok(self.positions[actor.name()].0.clone())
        }

        fn actor_position(&self, actor: &ActorHandle) -> eyre::Result<BlockPos> {
            Ok(self.positions[actor.name()].1)
        }

        fn move_actor(&mut self, actor: &ActorHandle, to: Coordinates) -> eyre::Result<()> {
            let entry = self
                .positions
                .get_mut(actor.name())
                .ok_or_else(|| eyre::eyre!("Actor left"))?;
            entry.1 = BlockPos::new(to.x.floor() as i32, to.y.floor() as i32, to.z.floor() as i32);
            Ok(())
        }

        fn send_feedback(&mut self, _source: &CommandSource, feedback: Feedback) {
            self.lines.push(feedback.text);
        }

        fn send_message(&mut self, _actor: &ActorHandle, text: &str) {
            self.lines.push(text.to_string());
        }
    }

    fn host() -> WorldHost {
        let mut host = WorldHost::default();
        host.positions
            .insert("Admin".into(), ("overworld".into(), BlockPos::new(10, 64, -3)));
        host.positions
            .insert("Steve".into(), ("overworld".into(), BlockPos::new(0, 70, 0)));
        host
    }

    fn admin() -> CommandSource {
        CommandSource {
            actor: Some(ActorHandle("Admin".into())),
            permission_level: 4,
            world: WorldHandle::server("world"),
        }
    }

    #[test]
    fn save_on_change_writes_immediately() {
        let dir = tempfile::tempdir().expect("create tempdir");
        let config = TpmConfig {
            save_on_change: true,
            ..Default::default()
        };
        let mut app = TpmApp::new(dir.path(), host(), config);

        app.run_command(&admin(), "/tpm set base").unwrap();

        assert!(dir.path().join("world/data/tpmod_locations.json").exists());
    }

    #[test]
    fn locations_survive_restart() {
        let dir = tempfile::tempdir().expect("create tempdir");
        let mut app = TpmApp::new(dir.path(), host(), TpmConfig::default());
        app.run_command(&admin(), "tpm set base").unwrap();
        app.on_world_save(&admin().world).unwrap();

        let mut restarted = TpmApp::new(dir.path(), host(), TpmConfig::default());
        restarted.run_command(&admin(), "tpm Steve base").unwrap();

        assert_eq!(restarted.host().positions["Steve"].1, BlockPos::new(10, 64, -3));
        assert_eq!(
            restarted.host().lines,
            vec!["Teleported player Steve to 'base'.", "You have been teleported to 'base' by an admin."]
        );
    }

    #[test]
    fn user_errors_become_failure_lines() {
        let dir = tempfile::tempdir().expect("create tempdir");
        let mut app = TpmApp::new(dir.path(), host(), TpmConfig::default());
        let mut console = admin();
        console.actor = None;

        app.run_command(&console, "tpm set base").unwrap();
        app.run_command(&admin(), "tpm Nobody base").unwrap();
        app.run_command(&admin(), "tp base").unwrap();

        assert_eq!(
            app.host().lines,
            vec![
                "A player is required to run this command here",
                "No player was found",
                "Unknown command: tp base",
            ]
        );
    }

    #[test]
    fn client_side_is_a_hard_error() {
        let dir = tempfile::tempdir().expect("create tempdir");
        let mut app = TpmApp::new(dir.path(), host(), TpmConfig::default());
        let mut source = admin();
        source.world.side = Side::Client;

        assert!(app.run_command(&source, "tpm ls").is_err());
    }

    #[test]
    fn suggest_handles_trailing_space() {
        let dir = tempfile::tempdir().expect("create tempdir");
        let mut app = TpmApp::new(dir.path(), host(), TpmConfig::default());
        app.run_command(&admin(), "tpm set base").unwrap();

        assert_eq!(app.suggest(&admin(), "/tpm rm "), vec!["base"]);
        assert_eq!(app.suggest(&admin(), "/tpm Steve ba"), vec!["base"]);
        assert_eq!(app.suggest(&admin(), "/tpm "), vec!["set", "rm", "ls"]);
        assert!(app.suggest(&admin(), "/gamemode ").is_empty());
    }
}
