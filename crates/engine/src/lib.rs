use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod app;
pub mod geom;
pub mod physics;

pub use app::{
    run_app, Actor, AppError, Audio, Control, Display, DisplayError, EdgeTrigger, FrameClock,
    LoopConfig, LoopMetricsSnapshot, MetaAction, ModelId, MusicDeck, MusicId, Renderer, Resource,
    ResourceKind, Scene, SceneError, SceneFactory, SceneMachine, SceneTransition, SilentAudio,
    SoundId, Stage, StageError, View, VoiceId,
};
pub use geom::{Rect, Size2, Vec2};
pub use physics::{
    find_contacts, slide_move, Body, CollisionGroup, Contact, SolidQuery, TileGrid, TileGridError,
    Trace,
};

pub const ROOT_ENV_VAR: &str = "RUSTMAN_ROOT";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub asset_root: PathBuf,
    pub capture_dir: PathBuf,
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error("failed to create capture directory at {path}: {source}")]
    CreateCaptureDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "RUSTMAN_ROOT is set but does not point to a valid project root: {path}\n\
A valid root must contain Cargo.toml and either crates/ or res/."
    )]
    InvalidEnvRoot { path: PathBuf },
    #[error(
        "Could not detect project root by walking upward from executable directory: {start_dir}\n\
Expected a directory containing Cargo.toml and either crates/ or res/.\n\
Set {env_var} explicitly, for example:\n\
Bash/zsh: export {env_var}=\"/path/to/rustman\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
}

pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    let root = resolve_root()?;
    let asset_root = root.join("res");
    let capture_dir = root.join("captures");

    fs::create_dir_all(&capture_dir).map_err(|source| StartupError::CreateCaptureDir {
        path: capture_dir.clone(),
        source,
    })?;

    Ok(AppPaths {
        root,
        asset_root,
        capture_dir,
    })
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let raw = PathBuf::from(value);
            let normalized = normalize_path(&raw);
            if is_repo_marker(&normalized) {
                Ok(normalized)
            } else {
                Err(StartupError::InvalidEnvRoot { path: normalized })
            }
        }
        Err(env::VarError::NotPresent) => {
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;

            exe_dir
                .ancestors()
                .find(|candidate| is_repo_marker(candidate))
                .map(normalize_path)
                .ok_or_else(|| StartupError::RootNotFound {
                    start_dir: normalize_path(&exe_dir),
                    env_var: ROOT_ENV_VAR,
                })
        }
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn is_repo_marker(path: &Path) -> bool {
    let cargo_toml = path.join("Cargo.toml").is_file();
    let has_crates = path.join("crates").is_dir();
    let has_res = path.join("res").is_dir();

    cargo_toml && (has_crates || has_res)
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
