use engine::{Camera2D, DrawList, InputAction, InputSnapshot, Rgba, Scene, SceneCommand, Vec2};
use platformer::config::SimConfig;
use platformer::sim::{
    Aabb, BlockKind, EntityKind, EventSink, GameEvent, PlayerInput, PlayerState, Simulation,
};
use tracing::{debug, info};

const SKY_COLOR: Rgba = [107, 140, 255, 255];
const GROUND_COLOR: Rgba = [200, 76, 12, 255];
const WALL_COLOR: Rgba = [136, 112, 0, 255];
const BRICK_COLOR: Rgba = [180, 60, 20, 255];
const QUESTION_COLOR: Rgba = [252, 188, 60, 255];
const PIPE_COLOR: Rgba = [0, 168, 0, 255];
const GOOMBA_COLOR: Rgba = [150, 80, 30, 255];
const COIN_COLORS: [Rgba; 2] = [[252, 216, 40, 255], [255, 240, 140, 255]];
const MUSHROOM_COLOR: Rgba = [220, 30, 30, 255];
const PIRANHA_COLOR: Rgba = [20, 140, 40, 255];
const BUSH_COLOR: Rgba = [60, 190, 60, 255];
const CLOUD_COLOR: Rgba = [250, 250, 250, 255];
const PLAYER_COLOR: Rgba = [230, 40, 40, 255];
const PLAYER_SPIN_COLOR: Rgba = [255, 140, 140, 255];
const PLAYER_DEAD_COLOR: Rgba = [90, 20, 20, 255];
const INVINCIBLE_BLINK_TICKS: u64 = 4;

/// Reports audio cues through the log in place of a mixer.
#[derive(Debug, Default)]
struct CueLog {
    emitted: u64,
}

impl EventSink for CueLog {
    fn emit(&mut self, event: GameEvent) {
        self.emitted = self.emitted.saturating_add(1);
        if let Some(cue) = event.sound_cue() {
            debug!(cue = ?cue, "sound_cue");
        }
        if let Some(command) = event.music_command() {
            info!(command = ?command, "music_command");
        }
    }
}

pub(crate) struct PlatformerScene {
    sim_config: SimConfig,
    simulation: Option<Simulation>,
    cues: CueLog,
}

impl PlatformerScene {
    pub(crate) fn new(sim_config: SimConfig) -> Self {
        Self {
            sim_config,
            simulation: None,
            cues: CueLog::default(),
        }
    }

    fn draw_world(&self, simulation: &Simulation, draw_list: &mut DrawList) {
        let view = visible_area(simulation);
        for entity in simulation.entities().iter() {
            if !matches!(entity.kind(), EntityKind::Cloud | EntityKind::Bush) {
                continue;
            }
            push_visible(draw_list, &view, entity.bounds(), entity_color(entity.kind(), 0));
        }
        for block in simulation.world().blocks() {
            push_visible(draw_list, &view, block.bounds, block_color(block.kind));
        }
        for entity in simulation.entities().iter() {
            if matches!(entity.kind(), EntityKind::Cloud | EntityKind::Bush) {
                continue;
            }
            let color = entity_color(entity.kind(), entity.animation_frame());
            push_visible(draw_list, &view, entity.bounds(), color);
        }
    }

    fn draw_player(&self, simulation: &Simulation, draw_list: &mut DrawList) {
        let player = simulation.player();
        let blink_off = (simulation.tick_count() / INVINCIBLE_BLINK_TICKS) % 2 == 1;
        if player.is_invincible() && blink_off {
            return;
        }
        let color = match player.state() {
            PlayerState::Dead => PLAYER_DEAD_COLOR,
            PlayerState::Spinning => PLAYER_SPIN_COLOR,
            _ => PLAYER_COLOR,
        };
        let bounds = player.bounds();
        draw_list.push_rect(bounds.x, bounds.y, bounds.width, bounds.height, color);
    }
}

impl Scene for PlatformerScene {
    fn load(&mut self) {
        let mut simulation = Simulation::new(&self.sim_config);
        simulation.start(&mut self.cues);
        info!(
            blocks = simulation.world().blocks().len(),
            entities = simulation.entities().len(),
            "scene_loaded"
        );
        self.simulation = Some(simulation);
    }

    fn update(&mut self, _fixed_dt_seconds: f32, input: &InputSnapshot) -> SceneCommand {
        if input.restart_pressed() {
            return SceneCommand::HardReset;
        }
        let Some(simulation) = self.simulation.as_mut() else {
            return SceneCommand::None;
        };
        let (width, height) = input.window_size();
        simulation.set_viewport(width as f32, height as f32);
        simulation.tick(&player_input(input), &mut self.cues);
        SceneCommand::None
    }

    fn render(&self, draw_list: &mut DrawList) {
        draw_list.set_clear_color(SKY_COLOR);
        let Some(simulation) = self.simulation.as_ref() else {
            return;
        };
        self.draw_world(simulation, draw_list);
        self.draw_player(simulation, draw_list);
    }

    fn camera(&self) -> Camera2D {
        let Some(simulation) = self.simulation.as_ref() else {
            return Camera2D::default();
        };
        let (x, y) = simulation.camera();
        Camera2D {
            position: Vec2 { x, y },
        }
    }

    fn unload(&mut self) {
        if let Some(simulation) = self.simulation.take() {
            info!(
                ticks = simulation.tick_count(),
                events = self.cues.emitted,
                "scene_unloaded"
            );
        }
    }

    fn debug_title(&self) -> Option<String> {
        let simulation = self.simulation.as_ref()?;
        let hud = simulation.hud();
        let mut title = format!(
            "Scroller | x {} | coins {} | score {}",
            hud.x_readout, hud.coins, hud.score
        );
        if let Some(milestone) = hud.milestone {
            title.push_str(&format!(" | milestone {milestone}"));
        }
        Some(title)
    }
}

fn player_input(input: &InputSnapshot) -> PlayerInput {
    PlayerInput {
        left: input.is_down(InputAction::MoveLeft),
        right: input.is_down(InputAction::MoveRight),
        jump: input.is_down(InputAction::Jump),
        run: input.is_down(InputAction::Run),
        crouch: input.is_down(InputAction::Crouch),
        spin_jump: input.is_down(InputAction::SpinJump),
    }
}

fn visible_area(simulation: &Simulation) -> Aabb {
    let (x, y) = simulation.camera();
    let (width, height) = simulation.viewport();
    Aabb::new(x, y, width, height)
}

fn push_visible(draw_list: &mut DrawList, view: &Aabb, bounds: Aabb, color: Rgba) {
    let outside = bounds.right() < view.x
        || bounds.x > view.right()
        || bounds.bottom() < view.y
        || bounds.y > view.bottom();
    if !outside {
        draw_list.push_rect(bounds.x, bounds.y, bounds.width, bounds.height, color);
    }
}

fn block_color(kind: BlockKind) -> Rgba {
    match kind {
        BlockKind::Ground => GROUND_COLOR,
        BlockKind::Wall => WALL_COLOR,
        BlockKind::Brick => BRICK_COLOR,
        BlockKind::Question => QUESTION_COLOR,
        BlockKind::Pipe => PIPE_COLOR,
    }
}

fn entity_color(kind: EntityKind, frame: u8) -> Rgba {
    match kind {
        EntityKind::Goomba => GOOMBA_COLOR,
        EntityKind::Coin => COIN_COLORS[usize::from(frame % 2)],
        EntityKind::Mushroom => MUSHROOM_COLOR,
        EntityKind::PiranhaPlant => PIRANHA_COLOR,
        EntityKind::Bush => BUSH_COLOR,
        EntityKind::Cloud => CLOUD_COLOR,
    }
}
