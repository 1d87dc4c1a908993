use crate::app::{Camera2D, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// World units map one-to-one onto pixels; the camera marks the top-left
/// corner of the screen.
pub fn world_to_screen(world: Vec2, camera: &Camera2D) -> (i32, i32) {
    let x = world.x - camera.position.x;
    let y = world.y - camera.position.y;
    (x.round() as i32, y.round() as i32)
}
