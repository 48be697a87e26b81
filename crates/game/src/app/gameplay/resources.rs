use engine::{ModelId, Resource, ResourceKind, SoundId};

pub(crate) const THEME_COUNT: i32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Sound {
    Pause,
    Door,
    Chirp,
    Beep,
    Fire,
    Jump,
    Land,
    Footstep1,
    Footstep2,
    Switch,
    Hurt,
    Die,
    Artifact,
    Bonus,
    Damage,
    Teleport,
    Hatch,
    Explode,
    Savepoint,
    Victory,
}

impl Sound {
    const ALL: [Sound; 20] = [
        Sound::Pause,
        Sound::Door,
        Sound::Chirp,
        Sound::Beep,
        Sound::Fire,
        Sound::Jump,
        Sound::Land,
        Sound::Footstep1,
        Sound::Footstep2,
        Sound::Switch,
        Sound::Hurt,
        Sound::Die,
        Sound::Artifact,
        Sound::Bonus,
        Sound::Damage,
        Sound::Teleport,
        Sound::Hatch,
        Sound::Explode,
        Sound::Savepoint,
        Sound::Victory,
    ];

    pub(crate) fn id(self) -> SoundId {
        self as SoundId
    }

    fn file_stem(self) -> &'static str {
        match self {
            Sound::Pause => "pause",
            Sound::Door => "door",
            Sound::Chirp => "chirp",
            Sound::Beep => "beep",
            Sound::Fire => "fire",
            Sound::Jump => "jump",
            Sound::Land => "land",
            Sound::Footstep1 => "footstep-01",
            Sound::Footstep2 => "footstep-02",
            Sound::Switch => "switch",
            Sound::Hurt => "hurt",
            Sound::Die => "die",
            Sound::Artifact => "artifact",
            Sound::Bonus => "bonus",
            Sound::Damage => "damage",
            Sound::Teleport => "teleport",
            Sound::Hatch => "hatch",
            Sound::Explode => "explode",
            Sound::Savepoint => "savepoint",
            Sound::Victory => "victory",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Model {
    Splash,
    Ending,
    Paused,
    Rect,
    Hero,
    Lifebar,
    Ladder,
    Artifact,
    Bonus,
    Spikes,
    Tree,
    Owl,
    Bed,
    Savepoint,
    /// Reloaded from the room theme on every level load.
    Background,
    /// One tileset per theme.
    Tiles(i32),
}

impl Model {
    const SPRITES: [Model; 14] = [
        Model::Splash,
        Model::Ending,
        Model::Paused,
        Model::Rect,
        Model::Hero,
        Model::Lifebar,
        Model::Ladder,
        Model::Artifact,
        Model::Bonus,
        Model::Spikes,
        Model::Tree,
        Model::Owl,
        Model::Bed,
        Model::Savepoint,
    ];

    pub(crate) fn id(self) -> ModelId {
        match self {
            Model::Splash => 0,
            Model::Ending => 1,
            Model::Paused => 2,
            Model::Rect => 3,
            Model::Hero => 4,
            Model::Lifebar => 5,
            Model::Ladder => 6,
            Model::Artifact => 7,
            Model::Bonus => 8,
            Model::Spikes => 9,
            Model::Tree => 10,
            Model::Owl => 11,
            Model::Bed => 12,
            Model::Savepoint => 13,
            Model::Background => 14,
            Model::Tiles(theme) => 16 + theme.rem_euclid(THEME_COUNT),
        }
    }

    fn sprite_name(self) -> Option<&'static str> {
        match self {
            Model::Splash => Some("splash"),
            Model::Ending => Some("ending"),
            Model::Paused => Some("minimap"),
            Model::Rect => Some("rect"),
            Model::Hero => Some("rockman"),
            Model::Lifebar => Some("lifebar"),
            Model::Ladder => Some("ladder"),
            Model::Artifact => Some("artifact"),
            Model::Bonus => Some("bonus"),
            Model::Spikes => Some("spikes"),
            Model::Tree => Some("tree"),
            Model::Owl => Some("owl"),
            Model::Bed => Some("bed"),
            Model::Savepoint => Some("savepoint"),
            Model::Background | Model::Tiles(_) => None,
        }
    }
}

pub(crate) fn background_resource(theme: i32) -> Resource {
    Resource::new(
        ResourceKind::Model,
        Model::Background.id(),
        format!("sprites/background-{:02}.png", theme),
    )
}

/// Everything preloaded once at startup.
pub(crate) fn all_resources() -> Vec<Resource> {
    let sounds = Sound::ALL.iter().map(|sound| {
        Resource::new(
            ResourceKind::Sound,
            sound.id(),
            format!("sounds/{}.ogg", sound.file_stem()),
        )
    });
    let tilesets = (0..THEME_COUNT).map(|theme| {
        Resource::new(
            ResourceKind::Tileset,
            Model::Tiles(theme).id(),
            format!("tiles/tiles-{:02}.png", theme),
        )
    });
    let sprites = Model::SPRITES.iter().filter_map(|model| {
        model.sprite_name().map(|name| {
            Resource::new(ResourceKind::Model, model.id(), format!("sprites/{name}.png"))
        })
    });
    sounds.chain(tilesets).chain(sprites).collect()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn sound_ids_follow_declaration_order() {
        assert_eq!(Sound::Pause.id(), 0);
        assert_eq!(Sound::Jump.id(), 5);
        assert_eq!(Sound::Victory.id(), 19);
    }

    #[test]
    fn model_ids_are_unique() {
        let resources = all_resources();
        let models: Vec<_> = resources
            .iter()
            .filter(|resource| resource.kind != ResourceKind::Sound)
            .map(|resource| resource.id)
            .collect();
        let unique: HashSet<_> = models.iter().copied().collect();
        assert_eq!(unique.len(), models.len());
        assert!(!unique.contains(&Model::Background.id()));
    }

    #[test]
    fn tiles_wrap_theme_into_range() {
        assert_eq!(Model::Tiles(9).id(), Model::Tiles(1).id());
        assert_eq!(
            background_resource(3).path,
            "sprites/background-03.png".to_string()
        );
    }
}
