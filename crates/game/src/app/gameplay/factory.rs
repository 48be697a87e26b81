use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

use engine::Vec2;
use thiserror::Error;

use super::entity::{Entity, EntityId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum EntityError {
    #[error("unknown entity kind '{name}'")]
    UnknownKind { name: String },
    #[error("invalid value '{value}' for entity config key '{key}'")]
    InvalidConfigValue { key: String, value: String },
}

/// Spawner parameters, as written in the level data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct EntityConfig {
    values: BTreeMap<String, String>,
}

impl EntityConfig {
    pub(crate) fn new(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }

    pub(crate) fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    pub(crate) fn get_string(&self, key: &str, default: &str) -> String {
        self.values
            .get(key)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    pub(crate) fn get_int(&self, key: &str, default: i32) -> Result<i32, EntityError> {
        self.parse(key, default)
    }

    pub(crate) fn get_float(&self, key: &str, default: f32) -> Result<f32, EntityError> {
        self.parse(key, default)
    }

    fn parse<T: FromStr>(&self, key: &str, default: T) -> Result<T, EntityError> {
        match self.values.get(key) {
            None => Ok(default),
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| EntityError::InvalidConfigValue {
                    key: key.to_string(),
                    value: raw.clone(),
                }),
        }
    }
}

type Constructor = Box<dyn Fn(&EntityConfig) -> Result<Box<dyn Entity>, EntityError>>;

/// String-keyed entity constructors.
#[derive(Default)]
pub(crate) struct EntityRegistry {
    constructors: HashMap<&'static str, Constructor>,
}

impl EntityRegistry {
    pub(crate) fn register<F>(&mut self, name: &'static str, constructor: F)
    where
        F: Fn(&EntityConfig) -> Result<Box<dyn Entity>, EntityError> + 'static,
    {
        self.constructors.insert(name, Box::new(constructor));
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    pub(crate) fn create(
        &self,
        name: &str,
        config: &EntityConfig,
        id: EntityId,
        pos: Vec2,
    ) -> Result<Box<dyn Entity>, EntityError> {
        let constructor =
            self.constructors
                .get(name)
                .ok_or_else(|| EntityError::UnknownKind {
                    name: name.to_string(),
                })?;
        let mut entity = constructor(config)?;
        let core = entity.core_mut();
        core.id = id;
        core.body.pos = pos;
        Ok(entity)
    }
}

#[cfg(test)]
mod tests {
    use engine::{Actor, Body};

    use super::super::entity::EntityCore;
    use super::*;

    struct Marker {
        core: EntityCore,
    }

    impl Entity for Marker {
        fn core(&self) -> &EntityCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut EntityCore {
            &mut self.core
        }

        fn kind(&self) -> &'static str {
            "marker"
        }

        fn add_actors(&self, _actors: &mut Vec<Actor>) {}
    }

    fn registry() -> EntityRegistry {
        let mut registry = EntityRegistry::default();
        registry.register("marker", |config| {
            let width = config.get_float("width", 1.0)?;
            let mut body = Body::default();
            body.size.width = width;
            Ok(Box::new(Marker {
                core: EntityCore::new(body),
            }))
        });
        registry
    }

    #[test]
    fn create_assigns_id_and_position() {
        let entity = registry()
            .create(
                "marker",
                &EntityConfig::default().with("width", 2.5),
                EntityId(1003),
                Vec2::new(4.0, 5.0),
            )
            .expect("marker");
        assert_eq!(entity.core().id, EntityId(1003));
        assert_eq!(entity.body().pos, Vec2::new(4.0, 5.0));
        assert_eq!(entity.body().size.width, 2.5);
    }

    #[test]
    fn unknown_kind_is_an_error() {
        let err = registry()
            .create("dragon", &EntityConfig::default(), EntityId(0), Vec2::ZERO)
            .err()
            .expect("unknown kind");
        assert_eq!(
            err,
            EntityError::UnknownKind {
                name: "dragon".to_string()
            }
        );
        assert_eq!(err.to_string(), "unknown entity kind 'dragon'");
    }

    #[test]
    fn malformed_config_value_is_an_error() {
        let config = EntityConfig::default().with("width", "wide");
        let err = registry()
            .create("marker", &config, EntityId(0), Vec2::ZERO)
            .err()
            .expect("bad value");
        assert!(matches!(err, EntityError::InvalidConfigValue { ref key, .. } if key == "width"));
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config = EntityConfig::default().with("target_level", " 2 ");
        assert_eq!(config.get_int("target_level", 0), Ok(2));
        assert_eq!(config.get_int("absent", 7), Ok(7));
        assert_eq!(config.get_string("absent", "none"), "none");
    }
}
