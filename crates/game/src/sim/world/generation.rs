use rand::Rng;
use tracing::{debug, info};

use super::{BlockKind, World, CHUNK_TILES, GROUND_DEPTH_ROWS, GROUND_ROW, TILE_SIZE};
use crate::sim::entities::{
    Bush, Cloud, Coin, Entity, EntityStore, Goomba, PiranhaPlant, PIRANHA_HEIGHT, PIRANHA_WIDTH,
};

pub const CASTLE_START_X: f32 = 9800.0;
const CASTLE_PLINTH_TILES: i32 = 10;
const CASTLE_TOWER_OFFSET: i32 = 2;
const CASTLE_TOWER_WIDTH: i32 = 6;
const CASTLE_TOWER_HEIGHT: i32 = 7;
const CASTLE_BATTLEMENT_ROW: i32 = 2;
const CASTLE_DOOR_COLUMNS: std::ops::Range<i32> = 3..5;
const CASTLE_DOOR_ROWS: std::ops::Range<i32> = 9..11;

const MAX_FEATURES_PER_CHUNK: u32 = 2;
const FEATURE_OFFSET_MIN: i32 = 2;
const FEATURE_OFFSET_MAX: i32 = 18;
const PLATFORM_TIER_CHANCE: f32 = 0.15;
const PLATFORM_TIER_RATIO: f32 = 0.7;
const PIPE_PIRANHA_CHANCE: f32 = 0.3;
const PIPE_WIDTH: i32 = 2;
const WALL_BATTLEMENT_CHANCE: f32 = 0.2;
const QUESTION_ROW: i32 = 6;
const BRICK_BASE_ROW: i32 = 6;
const WALL_BASE_ROW: i32 = 9;

const GOOMBA_CHANCE: f32 = 0.15;
const COIN_CHANCE: f32 = 0.2;
const BUSH_CHANCE: f32 = 0.4;
const CLOUD_CHANCE: f32 = 0.5;
const GOOMBA_SPAWN_Y: f32 = 300.0;
const COIN_INSET: f32 = 4.0;
const BUSH_ROW: i32 = 10;
const SPAWN_COLUMN_MIN: i32 = 1;
const SPAWN_COLUMN_MAX: i32 = 19;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    Platform,
    BrickCluster,
    QuestionBlock,
    Pipe,
    WallStructure,
}

impl FeatureKind {
    /// Maps a uniform `[0, 1)` draw onto the cumulative feature weights.
    pub fn from_roll(roll: f32) -> Self {
        if roll < 0.25 {
            Self::Platform
        } else if roll < 0.40 {
            Self::BrickCluster
        } else if roll < 0.55 {
            Self::QuestionBlock
        } else if roll < 0.70 {
            Self::Pipe
        } else {
            Self::WallStructure
        }
    }
}

impl World {
    /// Lays out one chunk starting at `start_x`. Spawned entities go to the
    /// pending buffer of `spawns`.
    pub fn generate_chunk(&mut self, start_x: f32, spawns: &mut EntityStore) {
        let chunk_tile = (start_x / TILE_SIZE).floor() as i32;

        if start_x >= CASTLE_START_X && !self.castle_generated {
            self.generate_castle(chunk_tile);
            self.castle_generated = true;
            info!(start_x, "castle_generated");
            return;
        }

        self.lay_ground(chunk_tile, CHUNK_TILES);

        let feature_count = self.rng.gen_range(1..=MAX_FEATURES_PER_CHUNK);
        for _ in 0..feature_count {
            self.generate_feature(chunk_tile, spawns);
        }
        self.roll_entity_spawns(chunk_tile, spawns);

        debug!(start_x, feature_count, blocks = self.blocks.len(), "chunk_generated");
    }

    fn lay_ground(&mut self, first_tile: i32, width_tiles: i32) {
        for dx in 0..width_tiles {
            for row in GROUND_ROW..GROUND_ROW + GROUND_DEPTH_ROWS {
                self.add_tile(BlockKind::Ground, first_tile + dx, row);
            }
        }
    }

    fn generate_castle(&mut self, chunk_tile: i32) {
        self.lay_ground(chunk_tile, CASTLE_PLINTH_TILES);
        // The cursor still advances a whole chunk, so the floor must too.
        self.lay_ground(
            chunk_tile + CASTLE_PLINTH_TILES,
            CHUNK_TILES - CASTLE_PLINTH_TILES,
        );

        let tower_top_row = GROUND_ROW - CASTLE_TOWER_HEIGHT;
        for dx in 0..CASTLE_TOWER_WIDTH {
            let column = CASTLE_TOWER_OFFSET + dx;
            for row in tower_top_row..GROUND_ROW {
                if CASTLE_DOOR_COLUMNS.contains(&column) && CASTLE_DOOR_ROWS.contains(&row) {
                    continue;
                }
                self.add_tile(BlockKind::Wall, chunk_tile + column, row);
            }
        }

        for dx in (0..CASTLE_TOWER_WIDTH).step_by(2) {
            self.add_tile(
                BlockKind::Wall,
                chunk_tile + CASTLE_TOWER_OFFSET + dx,
                CASTLE_BATTLEMENT_ROW,
            );
        }
    }

    fn generate_feature(&mut self, chunk_tile: i32, spawns: &mut EntityStore) {
        let offset = self.rng.gen_range(FEATURE_OFFSET_MIN..FEATURE_OFFSET_MAX);
        let roll: f32 = self.rng.gen();

        match FeatureKind::from_roll(roll) {
            FeatureKind::Platform => {
                let width = self.rng.gen_range(2..=4);
                let row = self.rng.gen_range(4..=7);
                let x = chunk_tile + fit_in_chunk(offset, width);
                for dx in 0..width {
                    self.add_tile(BlockKind::Ground, x + dx, row);
                }
                if self.rng.gen::<f32>() < PLATFORM_TIER_CHANCE {
                    let tier_width = (width as f32 * PLATFORM_TIER_RATIO).floor() as i32;
                    let tier_x = x + (width - tier_width) / 2;
                    for dx in 0..tier_width {
                        self.add_tile(BlockKind::Ground, tier_x + dx, row - 1);
                    }
                }
            }
            FeatureKind::BrickCluster => {
                let width = self.rng.gen_range(1..=2);
                let height = self.rng.gen_range(1..=2);
                let x = chunk_tile + fit_in_chunk(offset, width);
                for dx in 0..width {
                    for dy in 0..height {
                        self.add_tile(BlockKind::Brick, x + dx, BRICK_BASE_ROW - dy);
                    }
                }
            }
            FeatureKind::QuestionBlock => {
                let x = chunk_tile + fit_in_chunk(offset, 1);
                self.add_tile(BlockKind::Question, x, QUESTION_ROW);
            }
            FeatureKind::Pipe => {
                let height = self.rng.gen_range(2..=3);
                let x = chunk_tile + fit_in_chunk(offset, PIPE_WIDTH);
                let top_row = GROUND_ROW - height;
                for dx in 0..PIPE_WIDTH {
                    for row in top_row..GROUND_ROW {
                        self.add_tile(BlockKind::Pipe, x + dx, row);
                    }
                }
                if self.rng.gen::<f32>() < PIPE_PIRANHA_CHANCE {
                    let pipe_width = PIPE_WIDTH as f32 * TILE_SIZE;
                    let plant = PiranhaPlant::new(
                        x as f32 * TILE_SIZE + (pipe_width - PIRANHA_WIDTH) / 2.0,
                        top_row as f32 * TILE_SIZE - PIRANHA_HEIGHT,
                    );
                    spawns.spawn(Entity::PiranhaPlant(plant));
                }
            }
            FeatureKind::WallStructure => {
                let width = self.rng.gen_range(1..=2);
                let height = self.rng.gen_range(2..=3);
                let x = chunk_tile + fit_in_chunk(offset, width);
                for dx in 0..width {
                    for dy in 0..height {
                        self.add_tile(BlockKind::Wall, x + dx, WALL_BASE_ROW - dy);
                    }
                }
                if self.rng.gen::<f32>() < WALL_BATTLEMENT_CHANCE {
                    let battlement_row = WALL_BASE_ROW - height;
                    for dx in (0..width).step_by(2) {
                        self.add_tile(BlockKind::Wall, x + dx, battlement_row);
                    }
                }
            }
        }
    }

    fn roll_entity_spawns(&mut self, chunk_tile: i32, spawns: &mut EntityStore) {
        if self.rng.gen::<f32>() < GOOMBA_CHANCE {
            let x = self.spawn_column_x(chunk_tile);
            spawns.spawn(Entity::Goomba(Goomba::new(x, GOOMBA_SPAWN_Y)));
        }
        if self.rng.gen::<f32>() < COIN_CHANCE {
            let x = self.spawn_column_x(chunk_tile);
            let row = self.rng.gen_range(4..=8);
            spawns.spawn(Entity::Coin(Coin::new(
                x + COIN_INSET,
                row as f32 * TILE_SIZE + COIN_INSET,
            )));
        }
        if self.rng.gen::<f32>() < BUSH_CHANCE {
            let x = self.spawn_column_x(chunk_tile);
            spawns.spawn(Entity::Bush(Bush::new(x, BUSH_ROW as f32 * TILE_SIZE)));
        }
        if self.rng.gen::<f32>() < CLOUD_CHANCE {
            let x = self.spawn_column_x(chunk_tile);
            let row = self.rng.gen_range(1..=3);
            spawns.spawn(Entity::Cloud(Cloud::new(x, row as f32 * TILE_SIZE)));
        }
    }

    fn spawn_column_x(&mut self, chunk_tile: i32) -> f32 {
        let column = self.rng.gen_range(SPAWN_COLUMN_MIN..SPAWN_COLUMN_MAX);
        (chunk_tile + column) as f32 * TILE_SIZE
    }
}

fn fit_in_chunk(offset: i32, width: i32) -> i32 {
    offset.min(CHUNK_TILES - width)
}
