use engine::{Actor, Body, CollisionGroup, Size2};

use super::super::entity::{
    Entity, EntityCore, GameContext, Physics, GROUP_PLAYER, GROUP_SOLID_PLAYER,
};
use super::super::events::GameEvent;
use super::super::resources::{Model, Sound};
use super::super::util::decrement;

pub(crate) const REQUIRED_ARTIFACTS: i32 = 8;
const FINISH_DELAY: i32 = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BedState {
    Waiting,
    Countdown(i32),
    Finished,
}

/// The bed ends the game once the player brings every artifact.
pub(crate) struct ExitPoint {
    core: EntityCore,
    state: BedState,
}

impl ExitPoint {
    pub(crate) fn new() -> Self {
        Self {
            core: EntityCore::new(Body {
                size: Size2::new(3.0, 1.0),
                group: CollisionGroup::NONE,
                mask: GROUP_PLAYER | GROUP_SOLID_PLAYER,
                solid: false,
                ..Body::default()
            }),
            state: BedState::Waiting,
        }
    }
}

impl Entity for ExitPoint {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn kind(&self) -> &'static str {
        "bed"
    }

    fn tick(&mut self, game: &mut GameContext<'_>, _physics: &dyn Physics) {
        let BedState::Countdown(mut timer) = self.state else {
            return;
        };

        game.set_ambient_light(-2.0 + (timer as f32 / FINISH_DELAY as f32) * 2.0);

        self.state = if decrement(&mut timer) {
            game.post_event(GameEvent::GameFinished);
            BedState::Finished
        } else {
            BedState::Countdown(timer)
        };
    }

    fn add_actors(&self, actors: &mut Vec<Actor>) {
        actors.push(Actor::new(
            Model::Bed.id(),
            self.core.body.pos,
            self.core.body.size,
        ));
    }

    fn on_collision(&mut self, other: &mut dyn Entity, game: &mut GameContext<'_>) {
        if self.state != BedState::Waiting {
            return;
        }
        let Some(player) = other.as_player() else {
            return;
        };

        if player.artifact_count() >= REQUIRED_ARTIFACTS {
            self.state = BedState::Countdown(FINISH_DELAY);
            game.stop_music();
            game.play_sound(Sound::Explode);
        } else {
            game.text_box("You don't have enough artifacts");
        }
    }
}
