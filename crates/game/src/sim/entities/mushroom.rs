use super::{apply_entity_gravity, landing_block, walk_and_bounce, Behavior, EntityKind};
use crate::sim::events::{EventSink, GameEvent};
use crate::sim::geometry::Aabb;
use crate::sim::player::Player;
use crate::sim::world::World;

pub const MUSHROOM_WIDTH: f32 = 24.0;
pub const MUSHROOM_HEIGHT: f32 = 32.0;
const MUSHROOM_SPEED: f32 = 2.0;
const MUSHROOM_SPROUT_VELOCITY: f32 = -4.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Mushroom {
    bounds: Aabb,
    vx: f32,
    vy: f32,
    collected: bool,
}

impl Mushroom {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            bounds: Aabb::new(x, y, MUSHROOM_WIDTH, MUSHROOM_HEIGHT),
            vx: MUSHROOM_SPEED,
            vy: 0.0,
            collected: false,
        }
    }

    /// Mushroom pushed out of a question block with a small upward hop.
    pub fn sprouting(x: f32, y: f32) -> Self {
        Self {
            vy: MUSHROOM_SPROUT_VELOCITY,
            ..Self::new(x, y)
        }
    }

    pub fn vx(&self) -> f32 {
        self.vx
    }

    pub fn vy(&self) -> f32 {
        self.vy
    }
}

impl Behavior for Mushroom {
    fn kind(&self) -> EntityKind {
        EntityKind::Mushroom
    }

    fn bounds(&self) -> Aabb {
        self.bounds
    }

    fn update(&mut self, world: &World) {
        if self.collected {
            return;
        }

        apply_entity_gravity(&mut self.vy);
        walk_and_bounce(&mut self.bounds, &mut self.vx, world);

        self.bounds.y += self.vy;
        if let Some(block) = landing_block(&self.bounds, self.vy, world) {
            self.bounds.y = block.bounds.y - self.bounds.height;
            self.vy = 0.0;
        }
    }

    fn check_collision(&self, rect: &Aabb) -> bool {
        !self.collected && self.bounds.overlaps(rect)
    }

    fn on_player_contact(&mut self, player: &mut Player, events: &mut dyn EventSink) {
        if self.collected {
            return;
        }
        self.collected = true;
        player.power_up();
        events.emit(GameEvent::PowerUp);
    }

    fn should_remove(&self) -> bool {
        self.collected
    }
}
