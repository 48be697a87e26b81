use std::path::Path;

use thiserror::Error;

use crate::geom::Vec2;

use super::{Actor, ModelId};

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("failed to present frame: {0}")]
    Present(#[source] pixels::Error),
    #[error("failed to resize surface to {width}x{height}: {source}")]
    Resize {
        width: u32,
        height: u32,
        #[source]
        source: pixels::TextureError,
    },
}

/// Frame sink driven by the stage: actors and text are queued between
/// `begin_draw` and `end_draw`, then presented in one go.
pub trait Display {
    fn begin_draw(&mut self);
    fn draw_actor(&mut self, actor: &Actor);
    fn draw_text(&mut self, cell: Vec2, text: &str);
    fn end_draw(&mut self) -> Result<(), DisplayError>;
    fn set_camera(&mut self, pos: Vec2);
    fn set_ambient_light(&mut self, amount: f32);
    fn set_caption(&mut self, caption: &str);
    fn set_fullscreen(&mut self, fullscreen: bool);
    fn load_model(&mut self, model: ModelId, path: &Path, tileset: bool);
    /// Copies the last presented frame as tightly packed RGBA rows.
    fn read_pixels(&self, out: &mut Vec<u8>);
    fn resize(&mut self, width: u32, height: u32) -> Result<(), DisplayError>;
}
