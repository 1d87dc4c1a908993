use super::{Behavior, EntityKind};
use crate::sim::events::{EventSink, GameEvent};
use crate::sim::geometry::Aabb;
use crate::sim::player::Player;
use crate::sim::world::World;

pub const COIN_SIZE: f32 = 24.0;
const COIN_FRAME_COUNT: u8 = 4;
const COIN_FRAME_TICKS: u32 = 10;
const POPPED_COIN_LAUNCH_VELOCITY: f32 = -8.0;
const POPPED_COIN_GRAVITY: f32 = 0.5;
const POPPED_COIN_DROP: f32 = 64.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Coin {
    bounds: Aabb,
    vy: f32,
    spawn_y: f32,
    popped: bool,
    collected: bool,
    expired: bool,
    frame: u8,
    frame_ticks: u32,
}

impl Coin {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            bounds: Aabb::new(x, y, COIN_SIZE, COIN_SIZE),
            vy: 0.0,
            spawn_y: y,
            popped: false,
            collected: false,
            expired: false,
            frame: 0,
            frame_ticks: 0,
        }
    }

    /// Coin knocked out of a question block: flies up, falls back and vanishes.
    pub fn popped(x: f32, y: f32) -> Self {
        Self {
            vy: POPPED_COIN_LAUNCH_VELOCITY,
            popped: true,
            ..Self::new(x, y)
        }
    }

    pub fn is_popped(&self) -> bool {
        self.popped
    }

    pub fn is_collected(&self) -> bool {
        self.collected
    }
}

impl Behavior for Coin {
    fn kind(&self) -> EntityKind {
        EntityKind::Coin
    }

    fn bounds(&self) -> Aabb {
        self.bounds
    }

    fn update(&mut self, _world: &World) {
        self.frame_ticks += 1;
        if self.frame_ticks > COIN_FRAME_TICKS {
            self.frame = (self.frame + 1) % COIN_FRAME_COUNT;
            self.frame_ticks = 0;
        }

        if self.popped {
            self.vy += POPPED_COIN_GRAVITY;
            self.bounds.y += self.vy;
            if self.bounds.y > self.spawn_y + POPPED_COIN_DROP {
                self.expired = true;
            }
        }
    }

    fn check_collision(&self, rect: &Aabb) -> bool {
        !self.collected && self.bounds.overlaps(rect)
    }

    fn on_player_contact(&mut self, _player: &mut Player, events: &mut dyn EventSink) {
        if self.collected {
            return;
        }
        self.collected = true;
        events.emit(GameEvent::CoinCollected);
    }

    fn should_remove(&self) -> bool {
        self.collected || self.expired
    }

    fn animation_frame(&self) -> u8 {
        self.frame
    }
}
