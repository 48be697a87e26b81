use crate::geom::{Size2, Vec2};

pub type ModelId = i32;
pub type SoundId = i32;
pub type MusicId = i32;

/// One drawable instance for the current frame.
///
/// `pos` is the bottom-left corner in world units; `scale` is the drawn
/// extent. `action` picks the frame row of the model (the cell for tilesets)
/// and `ratio` the progress through that row's animation, in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Actor {
    pub model: ModelId,
    pub pos: Vec2,
    pub scale: Size2,
    pub action: i32,
    pub ratio: f32,
    pub flip_x: bool,
    pub blinking: bool,
    pub screen_space: bool,
    pub z_order: i32,
}

impl Actor {
    pub fn new(model: ModelId, pos: Vec2, scale: Size2) -> Self {
        Self {
            model,
            pos,
            scale,
            action: 0,
            ratio: 0.0,
            flip_x: false,
            blinking: false,
            screen_space: false,
            z_order: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Sound,
    Model,
    /// 8x8 grid of tiles; `Actor::action` selects the cell.
    Tileset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub kind: ResourceKind,
    pub id: i32,
    /// Relative to the asset root.
    pub path: String,
}

impl Resource {
    pub fn new(kind: ResourceKind, id: i32, path: impl Into<String>) -> Self {
        Self {
            kind,
            id,
            path: path.into(),
        }
    }
}

/// Presentation sink the scenes talk to. Every call is fire-and-forget.
pub trait View {
    fn set_title(&mut self, title: &str);
    fn preload(&mut self, resource: Resource);
    fn text_box(&mut self, message: &str);
    fn play_music(&mut self, track: MusicId);
    fn stop_music(&mut self);
    fn play_sound(&mut self, sound: SoundId);
    fn set_camera_pos(&mut self, pos: Vec2);
    fn set_ambient_light(&mut self, amount: f32);
    fn send_actor(&mut self, actor: Actor);
    /// Text in character cells from the top-left corner of the screen.
    fn draw_text(&mut self, cell: Vec2, text: &str);
}
