mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;

pub use input::InputAction;
pub use loop_runner::{run_app, AppError, LoopConfig, SLOW_FRAME_ENV_VAR};
pub use rendering::{world_to_screen, Renderer, Viewport};
pub use scene::{
    Camera2D, DrawList, DrawRect, InputSnapshot, Rgba, Scene, SceneCommand, Vec2,
};
