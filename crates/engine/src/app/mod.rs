mod audio;
mod display;
mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;
mod stage;
mod view;

pub use audio::{Audio, MusicDeck, SilentAudio, VoiceId, MUSIC_SOUND_SLOT};
pub use display::{Display, DisplayError};
pub use input::{Control, EdgeTrigger, MetaAction};
pub use loop_runner::{run_app, AppError, LoopConfig};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{world_to_screen, Renderer, Viewport, PIXELS_PER_WORLD};
pub use scene::{Scene, SceneError, SceneFactory, SceneMachine, SceneTransition};
pub use stage::{FrameClock, Stage, StageError};
pub use view::{Actor, ModelId, MusicId, Resource, ResourceKind, SoundId, View};
