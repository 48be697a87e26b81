use thiserror::Error;

use super::factory::EntityError;

#[derive(Debug, Error)]
pub(crate) enum GameError {
    #[error("no such level: {level} (quest has {room_count} rooms)")]
    NoSuchLevel { level: usize, room_count: usize },
    #[error(transparent)]
    Entity(#[from] EntityError),
    #[error("entity kind '{kind}' does not implement the player capability")]
    NotAPlayer { kind: &'static str },
}
