use super::{Behavior, EntityKind};
use crate::sim::events::EventSink;
use crate::sim::geometry::Aabb;
use crate::sim::player::Player;
use crate::sim::world::World;

pub const BUSH_WIDTH: f32 = 64.0;
pub const BUSH_HEIGHT: f32 = 32.0;
pub const CLOUD_WIDTH: f32 = 96.0;
pub const CLOUD_HEIGHT: f32 = 48.0;
const CLOUD_DRIFT: f32 = -0.2;

#[derive(Debug, Clone, PartialEq)]
pub struct Bush {
    bounds: Aabb,
}

impl Bush {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            bounds: Aabb::new(x, y, BUSH_WIDTH, BUSH_HEIGHT),
        }
    }
}

impl Behavior for Bush {
    fn kind(&self) -> EntityKind {
        EntityKind::Bush
    }

    fn bounds(&self) -> Aabb {
        self.bounds
    }

    fn update(&mut self, _world: &World) {}

    fn check_collision(&self, _rect: &Aabb) -> bool {
        false
    }

    fn on_player_contact(&mut self, _player: &mut Player, _events: &mut dyn EventSink) {}
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cloud {
    bounds: Aabb,
}

impl Cloud {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            bounds: Aabb::new(x, y, CLOUD_WIDTH, CLOUD_HEIGHT),
        }
    }
}

impl Behavior for Cloud {
    fn kind(&self) -> EntityKind {
        EntityKind::Cloud
    }

    fn bounds(&self) -> Aabb {
        self.bounds
    }

    fn update(&mut self, _world: &World) {
        self.bounds.x += CLOUD_DRIFT;
    }

    fn check_collision(&self, _rect: &Aabb) -> bool {
        false
    }

    fn on_player_contact(&mut self, _player: &mut Player, _events: &mut dyn EventSink) {}
}
