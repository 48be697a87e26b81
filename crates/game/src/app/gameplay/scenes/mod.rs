mod ending;
mod paused;
mod playing;
mod splash;

pub(crate) use ending::EndingScene;
pub(crate) use paused::PausedScene;
pub(crate) use playing::PlayingScene;
pub(crate) use splash::SplashScene;

use engine::{Actor, Size2, Vec2};

use super::resources::Model;

/// Full-screen picture centred on the camera.
fn fullscreen_picture(model: Model) -> Actor {
    Actor::new(model.id(), Vec2::new(-8.0, -8.0), Size2::square(16.0))
}
