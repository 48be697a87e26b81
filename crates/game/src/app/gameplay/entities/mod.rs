mod artifact;
mod bed;
mod boundary;
mod ladder;
mod savepoint;
mod scenery;
mod spikes;
mod upgrade;

use super::factory::EntityRegistry;
use super::hero::Hero;

pub(crate) use bed::REQUIRED_ARTIFACTS;

pub(crate) const HERO_KIND: &str = "Hero";

/// Registers every entity kind the level data may name.
pub(crate) fn register_all(registry: &mut EntityRegistry) {
    registry.register(HERO_KIND, |_| Ok(Box::new(Hero::new())));
    registry.register("artifact", |_| Ok(Box::new(artifact::Artifact::new())));
    registry.register("bed", |_| Ok(Box::new(bed::ExitPoint::new())));
    registry.register("spikes", |_| Ok(Box::new(spikes::Spikes::new())));
    registry.register("tree", |_| Ok(Box::new(scenery::Tree::new())));
    registry.register("owl", |_| Ok(Box::new(scenery::Owl::new())));
    registry.register("savepoint", |config| {
        Ok(Box::new(savepoint::Savepoint::from_config(config)))
    });
    registry.register("ladder", |config| {
        Ok(Box::new(ladder::Ladder::from_config(config)?))
    });
    registry.register("upgrade", |config| {
        Ok(Box::new(upgrade::Upgrade::from_config(config)?))
    });
    registry.register("boundary", |config| {
        Ok(Box::new(boundary::Boundary::from_config(config)?))
    });
}

/// Registry holding every built-in kind.
pub(crate) fn builtin_registry() -> EntityRegistry {
    let mut registry = EntityRegistry::default();
    register_all(&mut registry);
    registry
}
