use std::collections::HashMap;

use eyre::ContextCompat;
use tpm_rs::teleport::TELEPORT_OFFSET;
use tpm_rs::{ActorHandle, BlockPos, CommandSource, Coordinates, Feedback, FeedbackKind, Host};

use crate::config::ActorConfig;

struct SimActor {
    region: String,
    position: Coordinates,
    permission_level: u8,
}

/// A tiny stand-in for a game server: actors are fixed at startup and all output goes to stdout.
pub struct ConsoleHost {
    actors: HashMap<String, SimActor>,
}

impl ConsoleHost {
    pub fn new(actors: &[ActorConfig]) -> Self {
        let actors = actors
            .iter()
            .map(|actor| {
                let sim = SimActor {
                    region: actor.region.clone(),
                    position: Coordinates {
                        x: f64::from(actor.position.x) + TELEPORT_OFFSET,
                        y: f64::from(actor.position.y),
                        z: f64::from(actor.position.z) + TELEPORT_OFFSET,
                    },
                    permission_level: actor.permission_level,
                };
                (actor.name.clone(), sim)
            })
            .collect();

        Self { actors }
    }

    pub fn permission_level(&self, name: &str) -> Option<u8> {
        self.actors.get(name).map(|actor| actor.permission_level)
    }

    pub fn describe(&self, name: &str) -> Option<String> {
        self.actors.get(name).map(|actor| {
            let pos = actor.position;
            format!("{name} is in {} at {:.1} {:.1} {:.1}", actor.region, pos.x, pos.y, pos.z)
        })
    }

    fn actor(&self, actor: &ActorHandle) -> eyre::Result<&SimActor> {
        self.actors
            .get(actor.name())
            .with_context(|| format!("Actor `{}` is not online", actor.name()))
    }
}

impl Host for ConsoleHost {
    fn resolve_actor(&self, name: &str) -> Option<ActorHandle> {
        self.actors.contains_key(name).then(|| ActorHandle(name.to_string()))
    }

    fn actor_region(&self, actor: &ActorHandle) -> eyre::Result<String> {
        Ok(self.actor(actor)?.region.clone())
    }

    fn actor_position(&self, actor: &ActorHandle) -> eyre::Result<BlockPos> {
        let pos = self.actor(actor)?.position;
        Ok(BlockPos::new(pos.x.floor() as i32, pos.y.floor() as i32, pos.z.floor() as i32))
    }

    fn move_actor(&mut self, actor: &ActorHandle, coordinates: Coordinates) -> eyre::Result<()> {
        let sim = self
            .actors
            .get_mut(actor.name())
            .with_context(|| format!("Actor `{}` is not online", actor.name()))?;
        sim.position = coordinates;

        Ok(())
    }

    fn send_feedback(&mut self, source: &CommandSource, feedback: Feedback) {
        let name = source.actor.as_ref().map(ActorHandle::name).unwrap_or("Server");

        match feedback.kind {
            FeedbackKind::Success => println!("{}", feedback.text),
            FeedbackKind::Failure => println!("! {}", feedback.text),
        }

        if feedback.broadcast {
            log::info!("[{name}: {}]", feedback.text);
        }
    }

    fn send_message(&mut self, actor: &ActorHandle, text: &str) {
        println!("<to {}> {text}", actor.name());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> ConsoleHost {
        ConsoleHost::new(&[ActorConfig {
            name: "Steve".to_string(),
            region: "minecraft:overworld".to_string(),
            position: BlockPos::new(-4, 64, -1),
            permission_level: 0,
        }])
    }

    fn steve() -> ActorHandle {
        ActorHandle("Steve".to_string())
    }

    #[test]
    fn position_floors_negative_coordinates() {
        let host = host();

        assert_eq!(host.actor_position(&steve()).unwrap(), BlockPos::new(-4, 64, -1));
    }

    #[test]
    fn move_actor_updates_position() {
        let mut host = host();

        let destination = Coordinates { x: 10.5, y: 70.0, z: -2.5 };
        host.move_actor(&steve(), destination).unwrap();

        assert_eq!(host.actor_position(&steve()).unwrap(), BlockPos::new(10, 70, -3));
        assert_eq!(
            host.describe("Steve").unwrap(),
            "Steve is in minecraft:overworld at 10.5 70.0 -2.5"
        );
    }

    #[test]
    fn unknown_actors_are_rejected() {
        let mut host = host();
        let nobody = ActorHandle("Nobody".to_string());

        assert!(host.resolve_actor("Nobody").is_none());
        assert!(host.describe("Nobody").is_none());
        assert!(host.actor_region(&nobody).is_err());
        let origin = Coordinates { x: 0.0, y: 0.0, z: 0.0 };
        assert!(host.move_actor(&nobody, origin).is_err());
    }
}
