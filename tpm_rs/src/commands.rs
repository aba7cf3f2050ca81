use crate::host::{CommandSource, Feedback, Host};
use crate::registry::{RegistryError, RegistryStore};
use crate::teleport::{self, TeleportOutcome};

pub const COMMAND_NAME: &str = "tpm";
/// Minimum permission level (operators) required for every `/tpm` subcommand.
pub const REQUIRED_PERMISSION_LEVEL: u8 = 2;

pub const USAGE: &str = "tpm set <name> | tpm <player> <name> | tpm rm <name> | tpm ls";

const LITERAL_SET: &str = "set";
const LITERAL_RM: &str = "rm";
const LITERAL_LS: &str = "ls";

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("You do not have permission to use this command")]
    PermissionDenied,

    #[error("A player is required to run this command here")]
    NoInvokingActor,

    #[error("No player was found")]
    UnknownActor(String),

    #[error("Unknown or incomplete command: {0}")]
    Syntax(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Host failure: {0:#}")]
    Host(eyre::Report),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TpmCommand {
    Set { name: String },
    Teleport { target: String, name: String },
    Remove { name: String },
    List,
}

impl TpmCommand {
    /// Parse the arguments following `tpm`.
    pub fn parse(args: &[&str]) -> Result<Self, CommandError> {
        let command = match args {
            [LITERAL_SET, name] => TpmCommand::Set {
                name: parse_word(name)?,
            },
            [LITERAL_RM, name] => TpmCommand::Remove {
                name: parse_word(name)?,
            },
            [LITERAL_LS] => TpmCommand::List,
            [LITERAL_SET | LITERAL_RM | LITERAL_LS, ..] => {
                return Err(CommandError::Syntax(format!("wrong arguments for `{}`", args[0])))
            }
            [target, name] => TpmCommand::Teleport {
                target: target.to_string(),
                name: parse_word(name)?,
            },
            [] => return Err(CommandError::Syntax("missing subcommand".into())),
            _ => return Err(CommandError::Syntax(format!("unexpected `{}`", args.join(" ")))),
        };

        Ok(command)
    }
}

/// Names are single unquoted words: ASCII letters, digits, and `_-.+`.
fn parse_word(word: &str) -> Result<String, CommandError> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '+');

    if !word.is_empty() && word.chars().all(allowed) {
        Ok(word.to_string())
    } else {
        Err(CommandError::Syntax(format!("invalid name `{word}`")))
    }
}

/// Turns `/tpm` invocations into registry operations and feedback lines.
#[derive(Debug, Clone)]
pub struct CommandRouter {
    broadcast_to_ops: bool,
}

impl Default for CommandRouter {
    fn default() -> Self {
        Self { broadcast_to_ops: true }
    }
}

impl CommandRouter {
    pub fn new(broadcast_to_ops: bool) -> Self {
        Self { broadcast_to_ops }
    }

    /// Authorization predicate guarding every subcommand.
    pub fn requires(source: &CommandSource) -> bool {
        source.has_permission(REQUIRED_PERMISSION_LEVEL)
    }

    /// Run `tpm <args>` on behalf of `source`.
    ///
    /// Routine failures (unknown waypoint, wrong region) are reported through [Host::send_feedback],
    /// only structural problems come back as errors.
    pub fn execute<H: Host + ?Sized>(
        &self,
        host: &mut H,
        store: &mut RegistryStore,
        source: &CommandSource,
        args: &[&str],
    ) -> Result<(), CommandError> {
        if !Self::requires(source) {
            return Err(CommandError::PermissionDenied);
        }

        match TpmCommand::parse(args)? {
            TpmCommand::Set { name } => self.set_location(host, store, source, &name),
            TpmCommand::Teleport { target, name } => self.teleport_actor(host, store, source, &target, &name),
            TpmCommand::Remove { name } => self.remove_location(host, store, source, &name),
            TpmCommand::List => self.list_locations(host, store, source),
        }
    }

    fn set_location<H: Host + ?Sized>(
        &self,
        host: &mut H,
        store: &mut RegistryStore,
        source: &CommandSource,
        name: &str,
    ) -> Result<(), CommandError> {
        let actor = source.actor.as_ref().ok_or(CommandError::NoInvokingActor)?;
        let pos = host.actor_position(actor).map_err(CommandError::Host)?;
        let region = host.actor_region(actor).map_err(CommandError::Host)?;

        let registry = store.get_for(&source.world)?;
        let message = teleport::set_location(&region, pos, registry, name);
        host.send_feedback(source, Feedback::success(message, self.broadcast_to_ops));

        Ok(())
    }

    fn teleport_actor<H: Host + ?Sized>(
        &self,
        host: &mut H,
        store: &mut RegistryStore,
        source: &CommandSource,
        target: &str,
        name: &str,
    ) -> Result<(), CommandError> {
        let actor = host
            .resolve_actor(target)
            .ok_or_else(|| CommandError::UnknownActor(target.to_string()))?;
        let region = host.actor_region(&actor).map_err(CommandError::Host)?;

        let registry = store.get_for(&source.world)?;

        match teleport::teleport(actor.name(), &region, registry, name) {
            TeleportOutcome::Success {
                destination,
                admin_message,
                target_message,
            } => {
                host.move_actor(&actor, destination).map_err(CommandError::Host)?;
                log::info!("Teleported `{}` to global location `{name}` at {destination:?}", actor.name());

                host.send_feedback(source, Feedback::success(admin_message, self.broadcast_to_ops));
                if let Some(message) = target_message {
                    host.send_message(&actor, &message);
                }
            }
            failure => host.send_feedback(source, Feedback::failure(failure.admin_message())),
        }

        Ok(())
    }

    fn remove_location<H: Host + ?Sized>(
        &self,
        host: &mut H,
        store: &mut RegistryStore,
        source: &CommandSource,
        name: &str,
    ) -> Result<(), CommandError> {
        if source.actor.is_none() {
            return Err(CommandError::NoInvokingActor);
        }

        let outcome = teleport::remove_location(store.get_for(&source.world)?, name);
        let feedback = if outcome.is_removed() {
            Feedback::success(outcome.message(), self.broadcast_to_ops)
        } else {
            Feedback::failure(outcome.message())
        };
        host.send_feedback(source, feedback);

        Ok(())
    }

    fn list_locations<H: Host + ?Sized>(
        &self,
        host: &mut H,
        store: &mut RegistryStore,
        source: &CommandSource,
    ) -> Result<(), CommandError> {
        let locations = teleport::list_locations(store.get_for(&source.world)?);

        if locations.is_empty() {
            host.send_feedback(source, Feedback::success("There are no saved global locations.", false));
            return Ok(());
        }

        host.send_feedback(source, Feedback::success("Saved global locations:", false));
        for (name, location) in locations {
            let line = format!("{name} {} {} {}", location.x(), location.y(), location.z());
            host.send_feedback(source, Feedback::success(line, false));
        }

        Ok(())
    }

    /// Completion candidates for the last (possibly partial) argument in `args`.
    pub fn suggest(&self, store: &mut RegistryStore, source: &CommandSource, args: &[&str]) -> Vec<String> {
        if !Self::requires(source) {
            return Vec::new();
        }

        let partial = match args {
            [] => return literals(""),
            [partial] => return literals(partial),
            [LITERAL_SET | LITERAL_LS, ..] => return Vec::new(),
            [_, partial] => *partial,
            _ => return Vec::new(),
        };

        match store.get_for(&source.world) {
            Ok(registry) => registry
                .names()
                .into_iter()
                .filter(|name| name.starts_with(partial))
                .collect(),
            Err(e) => {
                log::debug!("No location suggestions available: {e}");
                Vec::new()
            }
        }
    }
}

fn literals(partial: &str) -> Vec<String> {
    [LITERAL_SET, LITERAL_RM, LITERAL_LS]
        .into_iter()
        .filter(|literal| literal.starts_with(partial))
        .map(str::to_string)
        .collect()
}
