use engine::{Actor, Body, Size2};

use super::super::entity::{
    Entity, EntityCore, GameContext, Physics, GROUP_BONUS, GROUP_SOLID_PLAYER,
};
use super::super::resources::{Model, Sound};
use super::super::util::cycle;

/// Collectible. Its entity-local variable remembers the pickup across
/// reloads.
pub(crate) struct Artifact {
    core: EntityCore,
    time: i32,
}

impl Artifact {
    pub(crate) fn new() -> Self {
        Self {
            core: EntityCore::new(Body {
                size: Size2::square(1.0),
                group: GROUP_BONUS,
                mask: GROUP_SOLID_PLAYER,
                solid: false,
                ..Body::default()
            }),
            time: 0,
        }
    }
}

impl Entity for Artifact {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn kind(&self) -> &'static str {
        "artifact"
    }

    fn enter(&mut self, game: &mut GameContext<'_>) {
        if self.core.id.var().is_some_and(|var| game.variable(var).get() != 0) {
            self.core.dead = true;
        }
    }

    fn tick(&mut self, _game: &mut GameContext<'_>, _physics: &dyn Physics) {
        self.time += 1;
    }

    fn add_actors(&self, actors: &mut Vec<Actor>) {
        let mut actor = Actor::new(Model::Artifact.id(), self.core.body.pos, Size2::square(1.0));
        actor.blinking = true;
        actor.ratio = cycle(self.time, 20);
        actors.push(actor);
    }

    fn on_collision(&mut self, other: &mut dyn Entity, game: &mut GameContext<'_>) {
        if self.core.dead {
            return;
        }
        let Some(player) = other.as_player() else {
            return;
        };
        player.add_artifact(game);
        game.play_sound(Sound::Artifact);
        if let Some(var) = self.core.id.var() {
            game.variable(var).set(1);
        }
        self.core.dead = true;
    }
}
