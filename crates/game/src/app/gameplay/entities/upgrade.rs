use engine::{Actor, Body, Size2};

use super::super::entity::{
    Entity, EntityCore, GameContext, Physics, GROUP_BONUS, GROUP_SOLID_PLAYER,
};
use super::super::factory::{EntityConfig, EntityError};
use super::super::hero::{
    UPGRADE_BALL, UPGRADE_CLIMB, UPGRADE_DASH, UPGRADE_DOUBLE_JUMP, UPGRADE_SLIDE,
};
use super::super::resources::{Model, Sound};
use super::super::util::cycle;

/// Grants one upgrade bit, once per game.
pub(crate) struct Upgrade {
    core: EntityCore,
    upgrade: i32,
    time: i32,
}

impl Upgrade {
    pub(crate) fn from_config(config: &EntityConfig) -> Result<Self, EntityError> {
        let upgrade = config.get_int("upgrade", UPGRADE_DOUBLE_JUMP)?;
        if upgrade_name(upgrade).is_none() {
            return Err(EntityError::InvalidConfigValue {
                key: "upgrade".to_string(),
                value: upgrade.to_string(),
            });
        }
        Ok(Self {
            core: EntityCore::new(Body {
                size: Size2::square(1.0),
                group: GROUP_BONUS,
                mask: GROUP_SOLID_PLAYER,
                solid: false,
                ..Body::default()
            }),
            upgrade,
            time: 0,
        })
    }
}

fn upgrade_name(upgrade: i32) -> Option<&'static str> {
    match upgrade {
        UPGRADE_DOUBLE_JUMP => Some("double jump"),
        UPGRADE_CLIMB => Some("climb"),
        UPGRADE_DASH => Some("dash"),
        UPGRADE_BALL => Some("ball"),
        UPGRADE_SLIDE => Some("slide"),
        _ => None,
    }
}

impl Entity for Upgrade {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn kind(&self) -> &'static str {
        "upgrade"
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
        let mut actor = Actor::new(Model::Bonus.id(), self.core.body.pos, self.core.body.size);
        actor.ratio = cycle(self.time, 40);
        actors.push(actor);
    }

    fn on_collision(&mut self, other: &mut dyn Entity, game: &mut GameContext<'_>) {
        if self.core.dead {
            return;
        }
        let Some(player) = other.as_player() else {
            return;
        };
        player.add_upgrade(self.upgrade, game);
        game.play_sound(Sound::Bonus);
        if let Some(name) = upgrade_name(self.upgrade) {
            game.text_box(&format!("upgrade: {name}"));
        }
        if let Some(var) = self.core.id.var() {
            game.variable(var).set(1);
        }
        self.core.dead = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_upgrade_bit_is_rejected() {
        let result = Upgrade::from_config(&EntityConfig::default().with("upgrade", 3));
        assert!(matches!(result, Err(EntityError::InvalidConfigValue { .. })));
    }

    #[test]
    fn default_upgrade_is_double_jump() {
        let upgrade = Upgrade::from_config(&EntityConfig::default()).expect("upgrade");
        assert_eq!(upgrade.upgrade, UPGRADE_DOUBLE_JUMP);
    }
}
