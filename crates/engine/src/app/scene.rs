use super::input::{ActionStates, InputAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    None,
    HardReset,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct InputSnapshot {
    quit_requested: bool,
    restart_pressed: bool,
    actions: ActionStates,
    window_width: u32,
    window_height: u32,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(
        quit_requested: bool,
        restart_pressed: bool,
        actions: ActionStates,
        window_width: u32,
        window_height: u32,
    ) -> Self {
        Self {
            quit_requested,
            restart_pressed,
            actions,
            window_width,
            window_height,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn restart_pressed(&self) -> bool {
        self.restart_pressed
    }

    pub fn is_down(&self, action: InputAction) -> bool {
        self.actions.is_down(action)
    }

    pub fn with_action_down(mut self, action: InputAction, is_down: bool) -> Self {
        self.actions.set(action, is_down);
        self
    }

    pub fn with_restart_pressed(mut self, restart_pressed: bool) -> Self {
        self.restart_pressed = restart_pressed;
        self
    }

    pub fn with_window_size(mut self, window_size: (u32, u32)) -> Self {
        self.window_width = window_size.0;
        self.window_height = window_size.1;
        self
    }

    pub fn window_size(&self) -> (u32, u32) {
        (self.window_width, self.window_height)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

/// Top-left corner of the visible area, in world units (y grows downward).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Camera2D {
    pub position: Vec2,
}

pub type Rgba = [u8; 4];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRect {
    pub position: Vec2,
    pub size: Vec2,
    pub color: Rgba,
}

const DEFAULT_CLEAR_COLOR: Rgba = [0, 0, 0, 255];

/// Rectangles for one frame, painted in push order over the clear color.
#[derive(Debug, Clone)]
pub struct DrawList {
    clear_color: Rgba,
    rects: Vec<DrawRect>,
}

impl Default for DrawList {
    fn default() -> Self {
        Self {
            clear_color: DEFAULT_CLEAR_COLOR,
            rects: Vec::new(),
        }
    }
}

impl DrawList {
    pub fn set_clear_color(&mut self, color: Rgba) {
        self.clear_color = color;
    }

    pub fn clear_color(&self) -> Rgba {
        self.clear_color
    }

    pub fn push_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        self.rects.push(DrawRect {
            position: Vec2 { x, y },
            size: Vec2 {
                x: width,
                y: height,
            },
            color,
        });
    }

    pub fn rects(&self) -> &[DrawRect] {
        &self.rects
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.clear_color = DEFAULT_CLEAR_COLOR;
        self.rects.clear();
    }
}

pub trait Scene {
    fn load(&mut self);
    fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand;
    fn render(&self, draw_list: &mut DrawList);
    fn camera(&self) -> Camera2D {
        Camera2D::default()
    }
    fn unload(&mut self);
    fn debug_title(&self) -> Option<String> {
        None
    }
}

pub(crate) struct SceneHost {
    scene: Box<dyn Scene>,
    draw_list: DrawList,
    is_loaded: bool,
}

impl SceneHost {
    pub(crate) fn new(scene: Box<dyn Scene>) -> Self {
        Self {
            scene,
            draw_list: DrawList::default(),
            is_loaded: false,
        }
    }

    pub(crate) fn load(&mut self) {
        if self.is_loaded {
            return;
        }
        self.scene.load();
        self.is_loaded = true;
    }

    pub(crate) fn update(&mut self, fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        if !self.is_loaded {
            return SceneCommand::None;
        }
        self.scene.update(fixed_dt_seconds, input)
    }

    pub(crate) fn render(&mut self) -> &DrawList {
        self.draw_list.clear();
        if self.is_loaded {
            self.scene.render(&mut self.draw_list);
        }
        &self.draw_list
    }

    pub(crate) fn camera(&self) -> Camera2D {
        self.scene.camera()
    }

    pub(crate) fn debug_title(&self) -> Option<String> {
        self.scene.debug_title()
    }

    pub(crate) fn hard_reset(&mut self) {
        if self.is_loaded {
            self.scene.unload();
        }
        self.draw_list.clear();
        self.scene.load();
        self.is_loaded = true;
    }

    pub(crate) fn shutdown(&mut self) {
        if self.is_loaded {
            self.scene.unload();
            self.draw_list.clear();
            self.is_loaded = false;
        }
    }
}
