use engine::{Actor, Body, Size2};

use super::super::entity::{Entity, EntityCore, GameContext, GROUP_SOLID_PLAYER, GROUP_WALLS};
use super::super::resources::Model;

/// Enough to kill at full life.
const SPIKE_DAMAGE: i32 = 1000;

pub(crate) struct Spikes {
    core: EntityCore,
}

impl Spikes {
    pub(crate) fn new() -> Self {
        Self {
            core: EntityCore::new(Body {
                size: Size2::new(1.0, 0.9),
                group: GROUP_WALLS,
                mask: GROUP_SOLID_PLAYER,
                solid: true,
                ..Body::default()
            }),
        }
    }
}

impl Entity for Spikes {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn kind(&self) -> &'static str {
        "spikes"
    }

    fn add_actors(&self, actors: &mut Vec<Actor>) {
        actors.push(Actor::new(
            Model::Spikes.id(),
            self.core.body.pos,
            self.core.body.size,
        ));
    }

    fn on_collision(&mut self, other: &mut dyn Entity, game: &mut GameContext<'_>) {
        if let Some(victim) = other.as_damageable() {
            victim.on_damage(SPIKE_DAMAGE, game);
        }
    }
}
