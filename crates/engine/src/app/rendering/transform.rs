use crate::geom::Vec2;

/// Sixteen world units span the default 512 px frame.
pub const PIXELS_PER_WORLD: f32 = 32.0;

#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Maps a world point to frame pixels with `camera` at the frame center.
/// Screen `y` grows downward.
pub fn world_to_screen(
    world: Vec2,
    camera: Vec2,
    viewport: Viewport,
    pixels_per_world: f32,
) -> (i32, i32) {
    let x = (world.x - camera.x) * pixels_per_world + viewport.width as f32 * 0.5;
    let y = viewport.height as f32 * 0.5 - (world.y - camera.y) * pixels_per_world;
    (x.round() as i32, y.round() as i32)
}
