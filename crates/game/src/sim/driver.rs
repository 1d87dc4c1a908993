use tracing::info;

use super::entities::EntityStore;
use super::events::{EventBus, EventCounts, EventSink, GameEvent};
use super::player::{Player, PlayerInput};
use super::score::{unlocked_milestone, HudSnapshot, Scoreboard};
use super::world::World;
use crate::config::SimConfig;

/// Owns one run of the game and advances it a fixed tick at a time.
pub struct Simulation {
    world: World,
    entities: EntityStore,
    player: Player,
    scoreboard: Scoreboard,
    bus: EventBus,
    level_complete_x: f32,
    level_complete_latched: bool,
    viewport: (f32, f32),
    camera: (f32, f32),
    tick: u64,
}

impl Simulation {
    pub fn new(config: &SimConfig) -> Self {
        let world = match config.seed {
            Some(seed) => World::with_seed(seed),
            None => World::from_entropy(),
        };
        info!(
            seed = ?config.seed,
            spawn_x = config.spawn_x,
            spawn_y = config.spawn_y,
            level_complete_x = config.level_complete_x,
            "simulation_created"
        );
        Self::with_world(config, world)
    }

    /// Runs on a caller-built world. The world is generated ahead of the
    /// spawn point before the first tick.
    pub fn with_world(config: &SimConfig, mut world: World) -> Self {
        let player = Player::new(config.spawn_x, config.spawn_y);
        let mut entities = EntityStore::default();
        world.generate_ahead(player.x(), &mut entities);
        entities.apply_pending();

        let mut simulation = Self {
            world,
            entities,
            player,
            scoreboard: Scoreboard::default(),
            bus: EventBus::default(),
            level_complete_x: config.level_complete_x,
            level_complete_latched: false,
            viewport: (config.viewport_width, config.viewport_height),
            camera: (0.0, 0.0),
            tick: 0,
        };
        simulation.follow_player();
        simulation
    }

    /// Announces the start of the run to `sink`. Call once before the first
    /// tick.
    pub fn start(&mut self, sink: &mut dyn EventSink) {
        info!(
            spawn_x = self.player.x(),
            generated_x = self.world.generated_x(),
            "run_started"
        );
        let event = GameEvent::RunStarted;
        self.scoreboard.apply(&event);
        sink.emit(event);
    }

    pub fn tick(&mut self, input: &PlayerInput, sink: &mut dyn EventSink) {
        self.player.update(
            input,
            &mut self.world,
            &mut self.entities,
            &mut self.bus,
        );
        self.check_level_complete();

        self.world.generate_ahead(self.player.x(), &mut self.entities);
        self.entities.advance(&self.world);
        self.entities.apply_pending();
        self.follow_player();

        for event in self.bus.iter_emitted_so_far() {
            self.scoreboard.apply(event);
            sink.emit(*event);
        }
        self.bus.finish_tick_rollover();
        self.tick = self.tick.saturating_add(1);
    }

    /// Fires once per crossing of the finish line; the latch clears when the
    /// player is back behind it.
    fn check_level_complete(&mut self) {
        if self.player.x() < self.level_complete_x {
            self.level_complete_latched = false;
            return;
        }
        if self.level_complete_latched || self.player.is_dead() {
            return;
        }
        self.level_complete_latched = true;
        info!(
            x = self.player.x(),
            score = self.scoreboard.score(),
            coins = self.scoreboard.coins(),
            "level_complete"
        );
        self.bus.emit(GameEvent::LevelComplete);
        self.player.reset(&mut self.entities, &mut self.bus);
    }

    fn follow_player(&mut self) {
        let (viewport_width, viewport_height) = self.viewport;
        let bounds = self.player.bounds();
        self.camera = (
            bounds.x - viewport_width / 2.0 + bounds.width / 2.0,
            (bounds.y - viewport_height / 2.0).max(0.0),
        );
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.viewport = (width, height);
            self.follow_player();
        }
    }

    pub fn camera(&self) -> (f32, f32) {
        self.camera
    }

    pub fn viewport(&self) -> (f32, f32) {
        self.viewport
    }

    pub fn hud(&self) -> HudSnapshot {
        let x = self.player.x();
        HudSnapshot {
            x_readout: x.floor() as i32,
            coins: self.scoreboard.coins(),
            score: self.scoreboard.score(),
            milestone: unlocked_milestone(x),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn entities(&self) -> &EntityStore {
        &self.entities
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub fn last_tick_counts(&self) -> EventCounts {
        self.bus.last_tick_counts()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    #[cfg(test)]
    pub(crate) fn parts_mut(&mut self) -> (&mut World, &mut EntityStore, &mut Player) {
        (&mut self.world, &mut self.entities, &mut self.player)
    }
}
