mod entities;
mod entity;
mod error;
mod events;
mod factory;
mod hero;
mod orchestrator;
mod quest;
mod resources;
mod scenes;
mod util;
mod variables;

use std::rc::Rc;

use engine::{Scene, SceneFactory, View};
use tracing::info;

pub(crate) use entities::builtin_registry;
pub(crate) use factory::EntityRegistry;
pub(crate) use quest::{Quest, QuestError};

use resources::all_resources;
use scenes::{PlayingScene, SplashScene};

pub(crate) const GAME_TITLE: &str = "Rustman";

/// Everything a fresh run of the game is built from.
#[derive(Clone)]
pub(crate) struct GameSetup {
    pub(crate) quest: Rc<Quest>,
    pub(crate) registry: Rc<EntityRegistry>,
    pub(crate) start_level: usize,
    /// Jump straight into play, for level testing.
    pub(crate) skip_splash: bool,
}

/// Builds the first scene of every run. Resources are preloaded the first
/// time only; a level reset reuses them.
pub(crate) fn build_scene_factory(setup: GameSetup) -> SceneFactory {
    let mut preloaded = false;
    Box::new(move |view: &mut dyn View| -> Box<dyn Scene> {
        if !preloaded {
            view.set_title(GAME_TITLE);
            let resources = all_resources();
            info!(resource_count = resources.len(), "resources_preloading");
            for resource in resources {
                view.preload(resource);
            }
            preloaded = true;
        }

        if setup.skip_splash {
            Box::new(PlayingScene::new(&setup, setup.start_level))
        } else {
            Box::new(SplashScene::new(setup.clone()))
        }
    })
}

#[cfg(test)]
mod test_support;
