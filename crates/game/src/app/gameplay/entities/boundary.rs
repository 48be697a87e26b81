use engine::{Actor, Body, CollisionGroup, Size2, Vec2};

use super::super::entity::{Entity, EntityCore, GameContext, GROUP_PLAYER};
use super::super::events::GameEvent;
use super::super::factory::{EntityConfig, EntityError};

/// Invisible room exit. `dx`/`dy` map this room's coordinates onto the
/// target room's.
pub(crate) struct Boundary {
    core: EntityCore,
    target_level: usize,
    transform: Vec2,
}

impl Boundary {
    pub(crate) fn from_config(config: &EntityConfig) -> Result<Self, EntityError> {
        let raw_level = config.get_int("target_level", 0)?;
        let target_level =
            usize::try_from(raw_level).map_err(|_| EntityError::InvalidConfigValue {
                key: "target_level".to_string(),
                value: raw_level.to_string(),
            })?;
        let transform = Vec2::new(config.get_float("dx", 0.0)?, config.get_float("dy", 0.0)?);
        let size = Size2::new(
            config.get_float("width", 1.0)?,
            config.get_float("height", 1.0)?,
        );
        Ok(Self {
            core: EntityCore::new(Body {
                size,
                group: CollisionGroup::NONE,
                mask: GROUP_PLAYER,
                solid: false,
                ..Body::default()
            }),
            target_level,
            transform,
        })
    }
}

impl Entity for Boundary {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn kind(&self) -> &'static str {
        "boundary"
    }

    fn add_actors(&self, _actors: &mut Vec<Actor>) {}

    fn on_collision(&mut self, other: &mut dyn Entity, game: &mut GameContext<'_>) {
        if other.as_player().is_some() {
            game.post_event(GameEvent::LevelBoundaryTouched {
                transform: self.transform,
                target_level: self.target_level,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_target_and_transform() {
        let config = EntityConfig::default()
            .with("target_level", 3)
            .with("dx", -29)
            .with("height", 4);
        let boundary = Boundary::from_config(&config).expect("boundary");
        assert_eq!(boundary.target_level, 3);
        assert_eq!(boundary.transform, Vec2::new(-29.0, 0.0));
        assert_eq!(boundary.body().size, Size2::new(1.0, 4.0));
    }

    #[test]
    fn negative_target_is_rejected() {
        let config = EntityConfig::default().with("target_level", -1);
        assert!(matches!(
            Boundary::from_config(&config),
            Err(EntityError::InvalidConfigValue { .. })
        ));
    }
}
