use super::{Behavior, EntityKind};
use crate::sim::events::EventSink;
use crate::sim::geometry::Aabb;
use crate::sim::player::Player;
use crate::sim::world::World;

pub const PIRANHA_WIDTH: f32 = 24.0;
pub const PIRANHA_HEIGHT: f32 = 32.0;
const PIRANHA_SPEED: f32 = 1.0;
const PIRANHA_REACH: f32 = 32.0;
const PIRANHA_DWELL_TICKS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PiranhaPhase {
    Extending,
    Retracting,
}

/// Hazard that rises out of a pipe, waits, and sinks back to where it spawned.
#[derive(Debug, Clone, PartialEq)]
pub struct PiranhaPlant {
    bounds: Aabb,
    origin_y: f32,
    phase: PiranhaPhase,
    timer: u32,
}

impl PiranhaPlant {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            bounds: Aabb::new(x, y, PIRANHA_WIDTH, PIRANHA_HEIGHT),
            origin_y: y,
            phase: PiranhaPhase::Extending,
            timer: 0,
        }
    }

    pub fn phase(&self) -> PiranhaPhase {
        self.phase
    }

    pub fn origin_y(&self) -> f32 {
        self.origin_y
    }
}

impl Behavior for PiranhaPlant {
    fn kind(&self) -> EntityKind {
        EntityKind::PiranhaPlant
    }

    fn bounds(&self) -> Aabb {
        self.bounds
    }

    fn update(&mut self, _world: &World) {
        self.timer += 1;
        match self.phase {
            PiranhaPhase::Extending => {
                self.bounds.y -= PIRANHA_SPEED;
                if self.bounds.y <= self.origin_y - PIRANHA_REACH {
                    self.bounds.y = self.origin_y - PIRANHA_REACH;
                    self.phase = PiranhaPhase::Retracting;
                    self.timer = 0;
                }
            }
            PiranhaPhase::Retracting => {
                if self.timer > PIRANHA_DWELL_TICKS {
                    self.bounds.y += PIRANHA_SPEED;
                    if self.bounds.y >= self.origin_y {
                        self.bounds.y = self.origin_y;
                        self.phase = PiranhaPhase::Extending;
                        self.timer = 0;
                    }
                }
            }
        }
    }

    fn on_player_contact(&mut self, player: &mut Player, events: &mut dyn EventSink) {
        if !player.is_dead() {
            player.die(events);
        }
    }

    fn is_hazard(&self) -> bool {
        true
    }
}
