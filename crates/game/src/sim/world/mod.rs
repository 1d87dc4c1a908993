use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::entities::{Coin, Entity, EntityKind, EntityStore, Mushroom};
use super::geometry::Aabb;

mod generation;

pub use generation::FeatureKind;

pub const TILE_SIZE: f32 = 32.0;
pub const CHUNK_TILES: i32 = 20;
pub const CHUNK_SIZE: f32 = TILE_SIZE * CHUNK_TILES as f32;
pub const GENERATE_AHEAD_DISTANCE: f32 = 800.0;
pub const CLEANUP_DISTANCE: f32 = 1000.0;
pub const GROUND_ROW: i32 = 11;
pub const GROUND_DEPTH_ROWS: i32 = 9;
/// Top edge of the ground strip.
pub const BASELINE_Y: f32 = GROUND_ROW as f32 * TILE_SIZE;

const MUSHROOM_CHANCE: f32 = 0.3;
const POPPED_COIN_INSET: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Ground,
    Wall,
    Brick,
    Question,
    Pipe,
}

impl BlockKind {
    /// Walking actors reverse direction against these.
    pub fn turns_walkers(self) -> bool {
        matches!(self, Self::Wall | Self::Pipe | Self::Brick)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block {
    pub id: BlockId,
    pub bounds: Aabb,
    pub kind: BlockKind,
    pub hit: bool,
}

/// Tile blocks of the level, the generation cursor and the generator's RNG.
pub struct World {
    blocks: Vec<Block>,
    next_block_id: u64,
    generated_x: f32,
    castle_generated: bool,
    rng: StdRng,
}

impl World {
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            blocks: Vec::new(),
            next_block_id: 0,
            generated_x: 0.0,
            castle_generated: false,
            rng,
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|block| block.id == id)
    }

    pub fn generated_x(&self) -> f32 {
        self.generated_x
    }

    pub fn castle_generated(&self) -> bool {
        self.castle_generated
    }

    /// Treats everything left of `x` as already generated, so hand-built
    /// terrain there is never overlaid with procedural chunks.
    pub fn skip_generation_until(&mut self, x: f32) {
        self.generated_x = self.generated_x.max(x);
    }

    pub fn add_block(&mut self, kind: BlockKind, bounds: Aabb) -> BlockId {
        let id = BlockId(self.next_block_id);
        self.next_block_id = self.next_block_id.saturating_add(1);
        self.blocks.push(Block {
            id,
            bounds,
            kind,
            hit: false,
        });
        id
    }

    pub fn add_tile(&mut self, kind: BlockKind, tile_x: i32, tile_y: i32) -> BlockId {
        self.add_block(
            kind,
            Aabb::new(
                tile_x as f32 * TILE_SIZE,
                tile_y as f32 * TILE_SIZE,
                TILE_SIZE,
                TILE_SIZE,
            ),
        )
    }

    /// Blocks overlapping `query`, in insertion order.
    pub fn get_collisions(&self, query: &Aabb) -> Vec<Block> {
        self.blocks
            .iter()
            .filter(|block| block.bounds.overlaps(query))
            .copied()
            .collect()
    }

    /// Turns an unhit question block into ground and queues its reward.
    /// Returns the spawned kind, or `None` when the block is gone, not a
    /// question block, or already spent.
    pub fn hit_question_block(
        &mut self,
        id: BlockId,
        spawns: &mut EntityStore,
    ) -> Option<EntityKind> {
        let block = self.blocks.iter_mut().find(|block| block.id == id)?;
        if block.kind != BlockKind::Question || block.hit {
            return None;
        }
        block.hit = true;
        block.kind = BlockKind::Ground;
        let bounds = block.bounds;

        let roll: f32 = self.rng.gen();
        let spawn_y = bounds.y - TILE_SIZE;
        let spawned = if roll < MUSHROOM_CHANCE {
            spawns.spawn(Entity::Mushroom(Mushroom::sprouting(bounds.x, spawn_y)));
            EntityKind::Mushroom
        } else {
            spawns.spawn(Entity::Coin(Coin::popped(
                bounds.x + POPPED_COIN_INSET,
                spawn_y,
            )));
            EntityKind::Coin
        };
        debug!(block = id.0, spawned = ?spawned, "question_block_hit");
        Some(spawned)
    }

    /// Generates chunks until the cursor is `GENERATE_AHEAD_DISTANCE` past the
    /// player, then retires blocks and entities left `CLEANUP_DISTANCE` behind.
    pub fn generate_ahead(&mut self, player_x: f32, entities: &mut EntityStore) {
        let target_x = player_x + GENERATE_AHEAD_DISTANCE;
        while self.generated_x < target_x {
            self.generate_chunk(self.generated_x, entities);
            self.generated_x += CHUNK_SIZE;
        }

        let cutoff_x = player_x - CLEANUP_DISTANCE;
        let removed_blocks = self.prune_behind(cutoff_x);
        let removed_entities = entities.prune_behind(cutoff_x);
        if removed_blocks > 0 || removed_entities > 0 {
            debug!(cutoff_x, removed_blocks, removed_entities, "world_pruned");
        }
    }

    pub fn prune_behind(&mut self, cutoff_x: f32) -> usize {
        let before = self.blocks.len();
        self.blocks.retain(|block| block.bounds.x > cutoff_x);
        before - self.blocks.len()
    }
}
