use std::env;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::rc::Rc;

use engine::{resolve_app_paths, AppPaths, LoopConfig, SceneFactory, StartupError};
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use super::gameplay::{
    build_scene_factory, builtin_registry, EntityRegistry, GameSetup, Quest, QuestError,
    GAME_TITLE,
};

const QUEST_ENV_VAR: &str = "RUSTMAN_QUEST";
const START_LEVEL_ENV_VAR: &str = "RUSTMAN_START_LEVEL";

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Paths(#[from] StartupError),
    #[error(transparent)]
    Quest(#[from] QuestError),
    #[error("room {room} spawns unknown entity kind '{name}'")]
    UnknownKind { room: usize, name: String },
}

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) paths: AppPaths,
    pub(crate) factory: SceneFactory,
}

/// Sets up logging and everything the frame pump needs. Failures are logged
/// here and turned into the process exit code.
pub(crate) fn build_app() -> Result<AppWiring, ExitCode> {
    init_tracing();
    info!("=== Rustman Startup ===");

    wire().map_err(|err| {
        error!(error = %err, "startup_failed");
        ExitCode::FAILURE
    })
}

fn wire() -> Result<AppWiring, BootstrapError> {
    let paths = resolve_app_paths()?;
    let quest = load_quest(&paths.root, env::var_os(QUEST_ENV_VAR).map(PathBuf::from))?;
    let registry = builtin_registry();
    check_spawners(&quest, &registry)?;

    let start_level = parse_start_level(env::var(START_LEVEL_ENV_VAR).ok(), quest.rooms.len());
    info!(
        room_count = quest.rooms.len(),
        start_level = ?start_level,
        "quest_ready"
    );

    let setup = GameSetup {
        quest: Rc::new(quest),
        registry: Rc::new(registry),
        start_level: start_level.unwrap_or(0),
        skip_splash: start_level.is_some(),
    };
    let config = LoopConfig {
        window_title: GAME_TITLE.to_string(),
        ..LoopConfig::default()
    };

    Ok(AppWiring {
        config,
        paths,
        factory: build_scene_factory(setup),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

/// Relative quest paths resolve against the project root; no path means the
/// built-in demo.
fn load_quest(root: &Path, configured: Option<PathBuf>) -> Result<Quest, QuestError> {
    let Some(path) = configured else {
        info!("quest_demo_selected");
        return Ok(Quest::demo());
    };
    let path = if path.is_relative() {
        root.join(path)
    } else {
        path
    };
    info!(path = %path.display(), "quest_loading");
    Quest::load(&path)
}

/// Fails on the first spawner naming a kind nobody registered, before any
/// room is entered.
fn check_spawners(quest: &Quest, registry: &EntityRegistry) -> Result<(), BootstrapError> {
    for (room, data) in quest.rooms.iter().enumerate() {
        if let Some(spawner) = data
            .spawners
            .iter()
            .find(|spawner| !registry.contains(&spawner.name))
        {
            return Err(BootstrapError::UnknownKind {
                room,
                name: spawner.name.clone(),
            });
        }
    }
    Ok(())
}

fn parse_start_level(raw: Option<String>, room_count: usize) -> Option<usize> {
    let raw = raw?;
    match raw.trim().parse::<usize>() {
        Ok(level) if level < room_count => Some(level),
        Ok(level) => {
            warn!(level, room_count, "start_level_out_of_range");
            None
        }
        Err(_) => {
            warn!(value = %raw, var = START_LEVEL_ENV_VAR, "start_level_invalid");
            None
        }
    }
}
