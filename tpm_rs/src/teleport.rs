use crate::location::{BlockPos, Coordinates, LocationRecord};
use crate::registry::LocationRegistry;

/// Offset added to the horizontal block coordinates so the actor lands in the middle of the block.
pub const TELEPORT_OFFSET: f64 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub enum TeleportOutcome {
    Success {
        destination: Coordinates,
        admin_message: String,
        target_message: Option<String>,
    },
    NotFound {
        name: String,
    },
    CrossRegion {
        region: String,
    },
}

impl TeleportOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TeleportOutcome::Success { .. })
    }

    /// The line shown to whoever issued the teleport.
    pub fn admin_message(&self) -> String {
        match self {
            TeleportOutcome::Success { admin_message, .. } => admin_message.clone(),
            TeleportOutcome::NotFound { name } => not_found_message(name),
            TeleportOutcome::CrossRegion { region } => {
                format!("Cannot teleport across dimensions. Location is in {region}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed(String),
    NotFound(String),
}

impl RemoveOutcome {
    pub fn is_removed(&self) -> bool {
        matches!(self, RemoveOutcome::Removed(_))
    }

    pub fn message(&self) -> String {
        match self {
            RemoveOutcome::Removed(name) => format!("Global location '{name}' removed."),
            RemoveOutcome::NotFound(name) => not_found_message(name),
        }
    }
}

fn not_found_message(name: &str) -> String {
    format!("Global location '{name}' not found.")
}

/// Save the actor's current position as `name`, replacing any waypoint of the same name.
pub fn set_location(region: &str, pos: BlockPos, registry: &mut LocationRegistry, name: &str) -> String {
    registry.add(name, LocationRecord::new(region, pos));
    log::debug!("Set global location `{name}` to {pos:?} in {region}");

    format!("Global location '{name}' set to {} {} {}", pos.x, pos.y, pos.z)
}

/// Decide whether an actor named `target_name`, currently in `target_region`, can be sent to waypoint `name`.
///
/// The actor isn't moved here, the caller applies the returned destination.
pub fn teleport(target_name: &str, target_region: &str, registry: &LocationRegistry, name: &str) -> TeleportOutcome {
    let Some(location) = registry.get(name) else {
        return TeleportOutcome::NotFound { name: name.to_string() };
    };

    if location.region() != target_region {
        return TeleportOutcome::CrossRegion {
            region: location.region().to_string(),
        };
    }

    TeleportOutcome::Success {
        destination: destination_of(location),
        admin_message: format!("Teleported player {target_name} to '{name}'."),
        target_message: Some(format!("You have been teleported to '{name}' by an admin.")),
    }
}

pub fn destination_of(location: &LocationRecord) -> Coordinates {
    Coordinates {
        x: f64::from(location.x()) + TELEPORT_OFFSET,
        y: f64::from(location.y()),
        z: f64::from(location.z()) + TELEPORT_OFFSET,
    }
}

pub fn remove_location(registry: &mut LocationRegistry, name: &str) -> RemoveOutcome {
    if registry.remove(name) {
        log::debug!("Removed global location `{name}`");
        RemoveOutcome::Removed(name.to_string())
    } else {
        RemoveOutcome::NotFound(name.to_string())
    }
}

pub fn list_locations(registry: &LocationRegistry) -> Vec<(String, LocationRecord)> {
    registry
        .iter()
        .map(|(name, location)| (name.clone(), location.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_base() -> LocationRegistry {
        let mut registry = LocationRegistry::new();
        set_location("overworld", BlockPos::new(10, 64, -3), &mut registry, "base");
        registry
    }

    #[test]
    fn set_location_echoes_coordinates() {
        let mut registry = LocationRegistry::new();
        let message = set_location("overworld", BlockPos::new(10, 64, -3), &mut registry, "base");

        assert_eq!(message, "Global location 'base' set to 10 64 -3");
        assert_eq!(
            registry.get("base"),
            Some(&LocationRecord::new("overworld", BlockPos::new(10, 64, -3)))
        );
    }

    #[test]
    fn teleport_to_unknown_name_fails() {
        let outcome = teleport("Steve", "overworld", &LocationRegistry::new(), "home");

        assert!(!outcome.is_success());
        assert_eq!(outcome.admin_message(), "Global location 'home' not found.");
    }

    #[test]
    fn teleport_centers_on_block() {
        let outcome = teleport("Steve", "overworld", &with_base(), "base");

        assert_eq!(
            outcome,
            TeleportOutcome::Success {
                destination: Coordinates {
                    x: 10.5,
                    y: 64.0,
                    z: -2.5
                },
                admin_message: "Teleported player Steve to 'base'.".into(),
                target_message: Some("You have been teleported to 'base' by an admin.".into()),
            }
        );
    }

    #[test]
    fn teleport_across_regions_fails() {
        let outcome = teleport("Steve", "nether", &with_base(), "base");

        assert_eq!(
            outcome.admin_message(),
            "Cannot teleport across dimensions. Location is in overworld"
        );
    }

    #[test]
    fn remove_location_discriminates_outcomes() {
        let mut registry = with_base();

        let missing = remove_location(&mut registry, "home");
        assert!(!missing.is_removed());
        assert_eq!(missing.message(), "Global location 'home' not found.");

        let removed = remove_location(&mut registry, "base");
        assert!(removed.is_removed());
        assert_eq!(removed.message(), "Global location 'base' removed.");
    }

    #[test]
    fn list_locations_in_insertion_order() {
        let mut registry = with_base();
        assert!(list_locations(&LocationRegistry::new()).is_empty());

        set_location("nether", BlockPos::new(0, 40, 0), &mut registry, "portal");
        let names: Vec<_> = list_locations(&registry).into_iter().map(|(name, _)| name).collect();

        assert_eq!(names, vec!["base", "portal"]);
    }
}
