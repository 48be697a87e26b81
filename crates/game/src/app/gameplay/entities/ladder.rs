use engine::{Actor, Body, CollisionGroup, Size2, Vec2};

use super::super::entity::{Capabilities, Entity, EntityCore, GROUP_LADDER};
use super::super::factory::{EntityConfig, EntityError};
use super::super::resources::Model;

const DEFAULT_HEIGHT: i32 = 4;

pub(crate) struct Ladder {
    core: EntityCore,
    rungs: i32,
}

impl Ladder {
    pub(crate) fn from_config(config: &EntityConfig) -> Result<Self, EntityError> {
        let rungs = config.get_int("height", DEFAULT_HEIGHT)?;
        if rungs <= 0 {
            return Err(EntityError::InvalidConfigValue {
                key: "height".to_string(),
                value: rungs.to_string(),
            });
        }
        Ok(Self {
            core: EntityCore::new(Body {
                size: Size2::new(1.0, rungs as f32),
                group: GROUP_LADDER,
                mask: CollisionGroup::NONE,
                solid: false,
                ..Body::default()
            }),
            rungs,
        })
    }
}

impl Entity for Ladder {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn kind(&self) -> &'static str {
        "ladder"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::CLIMBABLE
    }

    fn add_actors(&self, actors: &mut Vec<Actor>) {
        for rung in 0..self.rungs {
            let pos = self.core.body.pos + Vec2::new(0.0, rung as f32);
            actors.push(Actor::new(Model::Ladder.id(), pos, Size2::square(1.0)));
        }
    }
}
