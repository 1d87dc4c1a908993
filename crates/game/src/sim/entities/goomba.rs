use super::{
    apply_entity_gravity, landing_block, walk_and_bounce, Behavior, EntityKind,
    GOOMBA_STOMP_POINTS,
};
use crate::sim::events::{EventSink, GameEvent};
use crate::sim::geometry::Aabb;
use crate::sim::player::Player;
use crate::sim::world::World;

pub const GOOMBA_WIDTH: f32 = 24.0;
pub const GOOMBA_HEIGHT: f32 = 32.0;
const GOOMBA_WALK_SPEED: f32 = -1.0;
const GOOMBA_CORPSE_TICKS: u32 = 30;
const STOMP_BOUNCE_VELOCITY: f32 = -5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Goomba {
    bounds: Aabb,
    vx: f32,
    vy: f32,
    on_ground: bool,
    dead: bool,
    dead_ticks: u32,
}

impl Goomba {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            bounds: Aabb::new(x, y, GOOMBA_WIDTH, GOOMBA_HEIGHT),
            vx: GOOMBA_WALK_SPEED,
            vy: 0.0,
            on_ground: false,
            dead: false,
            dead_ticks: 0,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn vx(&self) -> f32 {
        self.vx
    }

    pub fn on_ground(&self) -> bool {
        self.on_ground
    }
}

impl Behavior for Goomba {
    fn kind(&self) -> EntityKind {
        EntityKind::Goomba
    }

    fn bounds(&self) -> Aabb {
        self.bounds
    }

    fn update(&mut self, world: &World) {
        if self.dead {
            self.dead_ticks = self.dead_ticks.saturating_add(1);
            return;
        }

        apply_entity_gravity(&mut self.vy);
        walk_and_bounce(&mut self.bounds, &mut self.vx, world);

        self.bounds.y += self.vy;
        self.on_ground = false;
        if let Some(block) = landing_block(&self.bounds, self.vy, world) {
            self.bounds.y = block.bounds.y - self.bounds.height;
            self.vy = 0.0;
            self.on_ground = true;
        }
    }

    fn on_player_contact(&mut self, player: &mut Player, events: &mut dyn EventSink) {
        if self.dead {
            return;
        }

        if player.vy() > 0.0 && player.y() < self.bounds.y {
            self.dead = true;
            player.bounce(STOMP_BOUNCE_VELOCITY);
            events.emit(GameEvent::EnemyStomped {
                points: GOOMBA_STOMP_POINTS,
            });
        } else if !player.is_dead() {
            player.die(events);
        }
    }

    fn should_remove(&self) -> bool {
        self.dead_ticks > GOOMBA_CORPSE_TICKS
    }

    fn is_hazard(&self) -> bool {
        true
    }

    fn vulnerable_to_area_damage(&self) -> bool {
        true
    }

    fn is_defeated(&self) -> bool {
        self.dead
    }

    fn apply_area_damage(&mut self) {
        self.dead = true;
    }
}
