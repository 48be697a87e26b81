use engine::{Actor, Body, CollisionGroup, Size2};

use super::super::entity::{Entity, EntityCore, GameContext, Physics, GROUP_PLAYER};
use super::super::events::GameEvent;
use super::super::factory::EntityConfig;
use super::super::resources::{Model, Sound};
use super::super::util::decrement;

/// Contact keeps this armed; one tick apart is enough to notice the
/// player walked away.
const TOUCH_COOLDOWN: i32 = 2;
const DEFAULT_MESSAGE: &str = "game saved";

pub(crate) struct Savepoint {
    core: EntityCore,
    touch_cooldown: i32,
    message: String,
}

impl Savepoint {
    pub(crate) fn from_config(config: &EntityConfig) -> Self {
        Self {
            core: EntityCore::new(Body {
                size: Size2::new(1.0, 2.0),
                group: CollisionGroup::NONE,
                mask: GROUP_PLAYER,
                solid: false,
                ..Body::default()
            }),
            touch_cooldown: 0,
            message: config.get_string("message", DEFAULT_MESSAGE),
        }
    }
}

impl Entity for Savepoint {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn kind(&self) -> &'static str {
        "savepoint"
    }

    fn tick(&mut self, _game: &mut GameContext<'_>, _physics: &dyn Physics) {
        decrement(&mut self.touch_cooldown);
    }

    fn add_actors(&self, actors: &mut Vec<Actor>) {
        let mut actor = Actor::new(
            Model::Savepoint.id(),
            self.core.body.pos,
            self.core.body.size,
        );
        actor.action = i32::from(self.touch_cooldown > 0);
        actors.push(actor);
    }

    fn on_collision(&mut self, other: &mut dyn Entity, game: &mut GameContext<'_>) {
        if other.as_player().is_none() {
            return;
        }
        if self.touch_cooldown == 0 {
            game.post_event(GameEvent::SaveRequested);
            game.play_sound(Sound::Savepoint);
            game.text_box(&self.message);
        }
        self.touch_cooldown = TOUCH_COOLDOWN;
    }
}
