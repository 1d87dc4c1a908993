mod coin;
mod goomba;
mod mushroom;
mod piranha;
mod scenery;

pub use coin::Coin;
pub use goomba::Goomba;
pub use mushroom::Mushroom;
pub use piranha::{PiranhaPhase, PiranhaPlant, PIRANHA_HEIGHT, PIRANHA_WIDTH};
pub use scenery::{Bush, Cloud};

use super::events::EventSink;
use super::geometry::Aabb;
use super::player::Player;
use super::world::{Block, BlockKind, World};

pub const GOOMBA_STOMP_POINTS: u32 = 200;
pub const ENTITY_GRAVITY: f32 = 0.25;
pub const ENTITY_TERMINAL_VELOCITY: f32 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Goomba,
    Coin,
    Mushroom,
    PiranhaPlant,
    Bush,
    Cloud,
}

/// Shared behavior of every non-player actor. The capability flags let callers
/// filter actors without matching on concrete variants.
pub trait Behavior {
    fn kind(&self) -> EntityKind;
    fn bounds(&self) -> Aabb;
    fn update(&mut self, world: &World);

    fn check_collision(&self, rect: &Aabb) -> bool {
        self.bounds().overlaps(rect)
    }

    fn on_player_contact(&mut self, player: &mut Player, events: &mut dyn EventSink);

    fn should_remove(&self) -> bool {
        false
    }

    /// Cleared from the world when the run resets.
    fn is_hazard(&self) -> bool {
        false
    }

    /// Killed by a ground-pound landing nearby.
    fn vulnerable_to_area_damage(&self) -> bool {
        false
    }

    fn is_defeated(&self) -> bool {
        false
    }

    fn apply_area_damage(&mut self) {}

    fn animation_frame(&self) -> u8 {
        0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Goomba(Goomba),
    Coin(Coin),
    Mushroom(Mushroom),
    PiranhaPlant(PiranhaPlant),
    Bush(Bush),
    Cloud(Cloud),
}

impl Entity {
    pub fn behavior(&self) -> &dyn Behavior {
        match self {
            Self::Goomba(inner) => inner,
            Self::Coin(inner) => inner,
            Self::Mushroom(inner) => inner,
            Self::PiranhaPlant(inner) => inner,
            Self::Bush(inner) => inner,
            Self::Cloud(inner) => inner,
        }
    }

    pub fn behavior_mut(&mut self) -> &mut dyn Behavior {
        match self {
            Self::Goomba(inner) => inner,
            Self::Coin(inner) => inner,
            Self::Mushroom(inner) => inner,
            Self::PiranhaPlant(inner) => inner,
            Self::Bush(inner) => inner,
            Self::Cloud(inner) => inner,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.behavior().kind()
    }

    pub fn bounds(&self) -> Aabb {
        self.behavior().bounds()
    }

    pub fn should_remove(&self) -> bool {
        self.behavior().should_remove()
    }

    pub fn is_hazard(&self) -> bool {
        self.behavior().is_hazard()
    }

    pub fn animation_frame(&self) -> u8 {
        self.behavior().animation_frame()
    }

    pub fn as_goomba(&self) -> Option<&Goomba> {
        match self {
            Self::Goomba(goomba) => Some(goomba),
            _ => None,
        }
    }
}

/// Live entities plus a pending-add buffer. Spawns only ever land in the
/// buffer; `apply_pending` is the single point where they become live.
#[derive(Debug, Default)]
pub struct EntityStore {
    live: Vec<Entity>,
    pending: Vec<Entity>,
}

impl EntityStore {
    pub fn spawn(&mut self, entity: Entity) {
        self.pending.push(entity);
    }

    pub fn apply_pending(&mut self) -> usize {
        let merged = self.pending.len();
        self.live.append(&mut self.pending);
        merged
    }

    pub fn live(&self) -> &[Entity] {
        &self.live
    }

    pub fn live_mut(&mut self) -> &mut [Entity] {
        &mut self.live
    }

    pub fn pending(&self) -> &[Entity] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.live.iter()
    }

    /// Drops finished entities, updates the rest, then drops whatever finished
    /// during the update.
    pub fn advance(&mut self, world: &World) {
        self.live.retain(|entity| !entity.should_remove());
        for entity in &mut self.live {
            entity.behavior_mut().update(world);
        }
        self.live.retain(|entity| !entity.should_remove());
    }

    pub fn prune_behind(&mut self, cutoff_x: f32) -> usize {
        let before = self.live.len() + self.pending.len();
        self.live.retain(|entity| entity.bounds().x > cutoff_x);
        self.pending.retain(|entity| entity.bounds().x > cutoff_x);
        before - (self.live.len() + self.pending.len())
    }

    pub fn clear_hazards(&mut self) -> usize {
        let before = self.live.len() + self.pending.len();
        self.live.retain(|entity| !entity.is_hazard());
        self.pending.retain(|entity| !entity.is_hazard());
        before - (self.live.len() + self.pending.len())
    }

    /// Defeats every live, area-vulnerable hazard whose origin lies within
    /// `radius` of `center`'s origin. Returns the number of kills.
    pub fn apply_area_damage(&mut self, center: &Aabb, radius: f32) -> u32 {
        let mut kills = 0;
        for entity in &mut self.live {
            let behavior = entity.behavior_mut();
            if !behavior.is_hazard()
                || !behavior.vulnerable_to_area_damage()
                || behavior.is_defeated()
            {
                continue;
            }
            if behavior.bounds().origin_distance(center) < radius {
                behavior.apply_area_damage();
                kills += 1;
            }
        }
        kills
    }
}

/// Horizontal step shared by walkers: reverse on the first wall-like block hit
/// and snap flush against it.
pub(crate) fn walk_and_bounce(bounds: &mut Aabb, vx: &mut f32, world: &World) {
    bounds.x += *vx;
    let wall = world
        .get_collisions(bounds)
        .into_iter()
        .find(|block| block.kind.turns_walkers());
    if let Some(block) = wall {
        *vx = -*vx;
        bounds.x = if *vx > 0.0 {
            block.bounds.right()
        } else {
            block.bounds.x - bounds.width
        };
    }
}

pub(crate) fn apply_entity_gravity(vy: &mut f32) {
    *vy = (*vy + ENTITY_GRAVITY).min(ENTITY_TERMINAL_VELOCITY);
}

/// First block the box rests on after falling into it, if any.
pub(crate) fn landing_block(bounds: &Aabb, vy: f32, world: &World) -> Option<Block> {
    if vy <= 0.0 {
        return None;
    }
    world
        .get_collisions(bounds)
        .into_iter()
        .find(|block| bounds.y < block.bounds.y)
}
