use crate::location::{BlockPos, Coordinates};

/// Which side of the host a command or lookup runs on. Only the server side owns persisted data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Server,
    Client,
}

/// The top-level world a command source lives in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorldHandle {
    /// Name of the top-level world save, all regions of a world share its persisted data.
    pub name: String,
    pub side: Side,
}

impl WorldHandle {
    pub fn server(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            side: Side::Server,
        }
    }

    pub fn is_authoritative(&self) -> bool {
        self.side == Side::Server
    }
}

/// Opaque handle to an actor known by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActorHandle(pub String);

impl ActorHandle {
    pub fn name(&self) -> &str {
        &self.0
    }
}

/// Whoever issued a command: a concrete actor, or something like a console.
#[derive(Debug, Clone)]
pub struct CommandSource {
    pub actor: Option<ActorHandle>,
    pub permission_level: u8,
    pub world: WorldHandle,
}

impl CommandSource {
    pub fn has_permission(&self, level: u8) -> bool {
        self.permission_level >= level
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Success,
    Failure,
}

/// A single chat/console line produced by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub text: String,
    /// Whether the host should echo this line to other operators as well.
    pub broadcast: bool,
}

impl Feedback {
    pub fn success(text: impl Into<String>, broadcast: bool) -> Self {
        Self {
            kind: FeedbackKind::Success,
            text: text.into(),
            broadcast,
        }
    }

    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            kind: FeedbackKind::Failure,
            text: text.into(),
            broadcast: false,
        }
    }
}

/// Everything the waypoint commands need from the game hosting them.
pub trait Host {
    /// Look up an online actor by name.
    fn resolve_actor(&self, name: &str) -> Option<ActorHandle>;

    /// Return the opaque identifier of the region the actor is currently in.
    fn actor_region(&self, actor: &ActorHandle) -> eyre::Result<String>;

    /// Return the block position the actor is currently standing on.
    fn actor_position(&self, actor: &ActorHandle) -> eyre::Result<BlockPos>;

    /// Move the actor to the given coordinates within its current region.
    ///
    /// # Errors
    ///
    /// If the actor could not be moved.
    fn move_actor(&mut self, actor: &ActorHandle, coordinates: Coordinates) -> eyre::Result<()>;

    /// Deliver a line to the source of a command.
    fn send_feedback(&mut self, source: &CommandSource, feedback: Feedback);

    /// Deliver a system message straight to an actor.
    fn send_message(&mut self, actor: &ActorHandle, text: &str);
}
