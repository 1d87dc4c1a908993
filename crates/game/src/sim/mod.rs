pub mod driver;
pub mod entities;
pub mod events;
pub mod geometry;
pub mod player;
pub mod score;
pub mod world;

pub use driver::Simulation;
pub use entities::{Behavior, Entity, EntityKind, EntityStore};
pub use events::{EventBus, EventCounts, EventSink, GameEvent, MusicCommand, NullSink, SoundCue};
pub use geometry::Aabb;
pub use player::{Facing, Player, PlayerInput, PlayerState};
pub use score::{HudSnapshot, Scoreboard};
pub use world::{Block, BlockId, BlockKind, World};
