use tracing::info;

use super::entities::EntityStore;
use super::events::{EventSink, GameEvent};
use super::geometry::Aabb;
use super::world::{BlockKind, World, BASELINE_Y};

pub const PLAYER_WIDTH: f32 = 24.0;
pub const PLAYER_HEIGHT: f32 = 32.0;
pub const PLAYER_CROUCH_HEIGHT: f32 = 16.0;
pub const PLAYER_BIG_HEIGHT: f32 = 64.0;
pub const PLAYER_BIG_CROUCH_HEIGHT: f32 = 32.0;

pub const WALK_SPEED: f32 = 1.5;
pub const RUN_SPEED: f32 = 4.0;
const GROUND_FRICTION: f32 = 0.85;
const STOP_EPSILON: f32 = 0.1;

pub const GRAVITY: f32 = 0.25;
pub const TERMINAL_VELOCITY: f32 = 12.0;
pub const MIN_JUMP_VELOCITY: f32 = -4.0;
pub const MAX_JUMP_VELOCITY: f32 = -6.5;
pub const MAX_JUMP_HOLD_TICKS: u32 = 20;
pub const CROUCH_JUMP_VELOCITY: f32 = -6.0;
pub const SPIN_JUMP_VELOCITY: f32 = MIN_JUMP_VELOCITY * 1.2;
const SPIN_DEGREES_PER_TICK: f32 = 15.0;
pub const GROUND_POUND_VELOCITY: f32 = 12.0;
pub const GROUND_POUND_RADIUS: f32 = 64.0;

const DEATH_VELOCITY: f32 = -8.0;
const DEAD_GRAVITY: f32 = 0.5;
const DEATH_FALL_DISTANCE: f32 = 500.0;
pub const INVINCIBILITY_TICKS: u32 = 60;

const RUN_FRAME_TICKS: u32 = 6;
const WALK_FRAME_TICKS: u32 = 8;
const WALK_FRAMES: u8 = 2;

/// Abstract controls sampled once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub run: bool,
    pub crouch: bool,
    pub spin_jump: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Idle,
    Walking,
    Jumping,
    Crouching,
    Spinning,
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

/// The player-controlled actor.
///
/// `update` evaluates the movement rules in a fixed order; later rules may
/// override earlier ones within the same tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    bounds: Aabb,
    spawn_x: f32,
    spawn_y: f32,
    vx: f32,
    vy: f32,
    state: PlayerState,
    facing: Facing,
    on_ground: bool,
    big: bool,
    crouching: bool,
    running: bool,
    spin_jumping: bool,
    ground_pounding: bool,
    invincible_ticks: u32,
    jump_latched: bool,
    spin_latched: bool,
    crouch_latched: bool,
    jump_boosting: bool,
    jump_hold_ticks: u32,
    spin_angle: f32,
    walk_timer: u32,
    walk_frame: u8,
}

impl Player {
    pub fn new(spawn_x: f32, spawn_y: f32) -> Self {
        Self {
            bounds: Aabb::new(spawn_x, spawn_y, PLAYER_WIDTH, PLAYER_HEIGHT),
            spawn_x,
            spawn_y,
            vx: 0.0,
            vy: 0.0,
            state: PlayerState::Idle,
            facing: Facing::Right,
            on_ground: false,
            big: false,
            crouching: false,
            running: false,
            spin_jumping: false,
            ground_pounding: false,
            invincible_ticks: 0,
            jump_latched: false,
            spin_latched: false,
            crouch_latched: false,
            jump_boosting: false,
            jump_hold_ticks: 0,
            spin_angle: 0.0,
            walk_timer: 0,
            walk_frame: 0,
        }
    }

    pub fn update(
        &mut self,
        input: &PlayerInput,
        world: &mut World,
        entities: &mut EntityStore,
        events: &mut dyn EventSink,
    ) {
        if self.is_dead() {
            self.vy += DEAD_GRAVITY;
            self.bounds.y += self.vy;
            if self.bounds.y > BASELINE_Y + DEATH_FALL_DISTANCE {
                self.reset(entities, events);
            }
            return;
        }

        let jump_edge = input.jump && !self.jump_latched;
        let spin_edge = input.spin_jump && !self.spin_latched;
        let crouch_edge = input.crouch && !self.crouch_latched;
        self.running = input.run;

        self.update_crouch(input, world);
        self.apply_horizontal_intent(input);
        if self.on_ground && jump_edge {
            self.start_jump(world);
        }
        self.apply_jump_hold(input);
        if self.on_ground && spin_edge && !self.crouching {
            self.vy = SPIN_JUMP_VELOCITY;
            self.on_ground = false;
            self.spin_jumping = true;
            self.spin_angle = 0.0;
            events.emit(GameEvent::SpinJump);
        }
        if self.spin_jumping {
            self.spin_angle = (self.spin_angle + SPIN_DEGREES_PER_TICK) % 360.0;
        }
        // Edge, not level: crouch held through a crouch-jump must not pound.
        if !self.on_ground && !self.crouching && !self.ground_pounding && crouch_edge {
            self.ground_pounding = true;
            events.emit(GameEvent::GroundPoundStarted);
        }
        if self.ground_pounding {
            self.vy = GROUND_POUND_VELOCITY;
            self.vx = 0.0;
        }

        self.vy = (self.vy + GRAVITY).min(TERMINAL_VELOCITY);

        self.move_horizontally(world);
        self.move_vertically(world, entities, events);
        self.touch_entities(entities, events);

        self.jump_latched = input.jump;
        self.spin_latched = input.spin_jump;
        self.crouch_latched = input.crouch;

        self.refresh_state();
        self.advance_walk_animation();
        self.invincible_ticks = self.invincible_ticks.saturating_sub(1);
        self.sync_height();
    }

    fn update_crouch(&mut self, input: &PlayerInput, world: &World) {
        if input.crouch && self.on_ground && !self.crouching {
            self.crouching = true;
            self.vx = 0.0;
            self.sync_height();
        } else if !input.crouch && self.crouching && self.standing_room_clear(world) {
            self.crouching = false;
            self.sync_height();
        }
    }

    fn apply_horizontal_intent(&mut self, input: &PlayerInput) {
        if self.crouching {
            return;
        }
        let speed = if input.run { RUN_SPEED } else { WALK_SPEED };
        if input.left {
            self.vx = -speed;
            self.facing = Facing::Left;
        } else if input.right {
            self.vx = speed;
            self.facing = Facing::Right;
        } else if self.on_ground {
            self.vx *= GROUND_FRICTION;
            if self.vx.abs() < STOP_EPSILON {
                self.vx = 0.0;
            }
        } else {
            self.vx = 0.0;
        }
    }

    fn start_jump(&mut self, world: &World) {
        if !self.crouching {
            self.vy = MIN_JUMP_VELOCITY;
            self.on_ground = false;
            self.jump_boosting = true;
            self.jump_hold_ticks = 0;
        } else if self.standing_room_clear(world) {
            self.vy = CROUCH_JUMP_VELOCITY;
            self.on_ground = false;
            self.crouching = false;
            self.sync_height();
        }
    }

    /// Hold-to-jump-higher. Only runs on ticks after the jump started, since
    /// the jump latch is still clear on the initiation tick.
    fn apply_jump_hold(&mut self, input: &PlayerInput) {
        if !input.jump {
            self.jump_boosting = false;
            return;
        }
        if self.jump_boosting
            && self.jump_latched
            && self.vy < 0.0
            && self.jump_hold_ticks < MAX_JUMP_HOLD_TICKS
        {
            self.jump_hold_ticks += 1;
            let progress = self.jump_hold_ticks as f32 / MAX_JUMP_HOLD_TICKS as f32;
            self.vy = MIN_JUMP_VELOCITY + (MAX_JUMP_VELOCITY - MIN_JUMP_VELOCITY) * progress;
        }
    }

    fn move_horizontally(&mut self, world: &World) {
        if self.vx == 0.0 {
            return;
        }
        self.bounds.x += self.vx;
        if !world.get_collisions(&self.bounds).is_empty() {
            self.bounds.x -= self.vx;
            self.vx = 0.0;
        }
    }

    fn move_vertically(
        &mut self,
        world: &mut World,
        entities: &mut EntityStore,
        events: &mut dyn EventSink,
    ) {
        self.on_ground = false;
        self.bounds.y += self.vy;

        let Some(block) = world.get_collisions(&self.bounds).into_iter().next() else {
            return;
        };

        if self.vy > 0.0 {
            self.bounds.y = block.bounds.y - self.bounds.height;
            self.vy = 0.0;
            self.on_ground = true;
            self.land(entities, events);
        } else if self.vy < 0.0 {
            self.bounds.y = block.bounds.bottom();
            self.vy = 0.0;
            self.jump_boosting = false;
        }

        if block.kind == BlockKind::Question && !block.hit {
            if let Some(spawned) = world.hit_question_block(block.id, entities) {
                events.emit(GameEvent::QuestionBlockHit { spawned });
            }
        }
    }

    fn land(&mut self, entities: &mut EntityStore, events: &mut dyn EventSink) {
        self.jump_boosting = false;
        self.spin_jumping = false;
        self.spin_angle = 0.0;
        if self.ground_pounding {
            self.ground_pounding = false;
            let kills = entities.apply_area_damage(&self.bounds, GROUND_POUND_RADIUS);
            events.emit(GameEvent::GroundPoundLanded { kills });
        }
    }

    fn touch_entities(&mut self, entities: &mut EntityStore, events: &mut dyn EventSink) {
        for entity in entities.live_mut() {
            if self.is_dead() {
                break;
            }
            let behavior = entity.behavior_mut();
            if behavior.check_collision(&self.bounds) {
                behavior.on_player_contact(self, events);
            }
        }
    }

    fn refresh_state(&mut self) {
        self.state = if self.is_dead() {
            PlayerState::Dead
        } else if self.crouching {
            PlayerState::Crouching
        } else if self.spin_jumping {
            PlayerState::Spinning
        } else if !self.on_ground {
            PlayerState::Jumping
        } else if self.vx != 0.0 {
            PlayerState::Walking
        } else {
            PlayerState::Idle
        };
    }

    fn advance_walk_animation(&mut self) {
        if self.state != PlayerState::Walking {
            self.walk_timer = 0;
            self.walk_frame = 0;
            return;
        }
        let cadence = if self.running {
            RUN_FRAME_TICKS
        } else {
            WALK_FRAME_TICKS
        };
        self.walk_timer += 1;
        if self.walk_timer >= cadence {
            self.walk_timer = 0;
            self.walk_frame = (self.walk_frame + 1) % WALK_FRAMES;
        }
    }

    fn standing_height(&self) -> f32 {
        if self.big {
            PLAYER_BIG_HEIGHT
        } else {
            PLAYER_HEIGHT
        }
    }

    fn target_height(&self) -> f32 {
        match (self.big, self.crouching) {
            (false, false) => PLAYER_HEIGHT,
            (false, true) => PLAYER_CROUCH_HEIGHT,
            (true, false) => PLAYER_BIG_HEIGHT,
            (true, true) => PLAYER_BIG_CROUCH_HEIGHT,
        }
    }

    /// Resizes the hitbox to match size and crouch, keeping the feet in place.
    fn sync_height(&mut self) {
        let height = self.target_height();
        if self.bounds.height != height {
            let feet = self.bounds.bottom();
            self.bounds.height = height;
            self.bounds.y = feet - height;
        }
    }

    fn standing_room_clear(&self, world: &World) -> bool {
        let height = self.standing_height();
        let headroom = Aabb::new(
            self.bounds.x,
            self.bounds.bottom() - height,
            self.bounds.width,
            height,
        );
        world.get_collisions(&headroom).is_empty()
    }

    /// Hurts the player: a big player shrinks and turns briefly invincible,
    /// a small one dies.
    pub fn die(&mut self, events: &mut dyn EventSink) {
        if self.is_dead() || self.is_invincible() {
            return;
        }
        if self.big {
            self.big = false;
            self.invincible_ticks = INVINCIBILITY_TICKS;
            self.sync_height();
            events.emit(GameEvent::PlayerShrunk);
            return;
        }

        self.state = PlayerState::Dead;
        self.vy = DEATH_VELOCITY;
        self.vx = 0.0;
        self.on_ground = false;
        self.crouching = false;
        self.ground_pounding = false;
        self.spin_jumping = false;
        self.jump_boosting = false;
        info!(x = self.bounds.x, y = self.bounds.y, "player_died");
        events.emit(GameEvent::PlayerDied);
    }

    pub fn bounce(&mut self, vy: f32) {
        self.vy = vy;
        self.on_ground = false;
        self.ground_pounding = false;
    }

    pub fn power_up(&mut self) {
        self.big = true;
    }

    /// Puts the player back at the spawn point and clears hazards from the
    /// world. Size is kept.
    pub fn reset(&mut self, entities: &mut EntityStore, events: &mut dyn EventSink) {
        let big = self.big;
        *self = Self::new(self.spawn_x, self.spawn_y);
        self.big = big;
        self.sync_height();
        let cleared = entities.clear_hazards();
        info!(cleared, "run_reset");
        events.emit(GameEvent::RunReset);
    }

    pub fn x(&self) -> f32 {
        self.bounds.x
    }

    pub fn y(&self) -> f32 {
        self.bounds.y
    }

    pub fn vx(&self) -> f32 {
        self.vx
    }

    pub fn vy(&self) -> f32 {
        self.vy
    }

    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    pub fn spawn_point(&self) -> (f32, f32) {
        (self.spawn_x, self.spawn_y)
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn on_ground(&self) -> bool {
        self.on_ground
    }

    pub fn is_big(&self) -> bool {
        self.big
    }

    pub fn is_dead(&self) -> bool {
        self.state == PlayerState::Dead
    }

    pub fn is_crouching(&self) -> bool {
        self.crouching
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_spin_jumping(&self) -> bool {
        self.spin_jumping
    }

    pub fn is_ground_pounding(&self) -> bool {
        self.ground_pounding
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_ticks > 0
    }

    pub fn spin_angle(&self) -> f32 {
        self.spin_angle
    }

    pub fn jump_hold_ticks(&self) -> u32 {
        self.jump_hold_ticks
    }

    pub fn walk_frame(&self) -> u8 {
        self.walk_frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entities::test_support::flat_world;
    use crate::sim::entities::{Entity, Goomba};
    use crate::sim::world::TILE_SIZE;

    const STANDING_Y: f32 = BASELINE_Y - PLAYER_HEIGHT;

    struct Rig {
        world: World,
        entities: EntityStore,
        player: Player,
        events: Vec<GameEvent>,
    }

    impl Rig {
        fn grounded() -> Self {
            let mut rig = Self {
                world: flat_world(0, 20),
                entities: EntityStore::default(),
                player: Player::new(100.0, STANDING_Y),
                events: Vec::new(),
            };
            rig.step(PlayerInput::default());
            assert!(rig.player.on_ground());
            rig
        }

        fn step(&mut self, input: PlayerInput) {
            self.player.update(
                &input,
                &mut self.world,
                &mut self.entities,
                &mut self.events,
            );
        }
    }

    fn held(jump: bool, crouch: bool) -> PlayerInput {
        PlayerInput {
            jump,
            crouch,
            ..PlayerInput::default()
        }
    }

    #[test]
    fn settles_on_ground_and_stays_idle() {
        let mut rig = Rig::grounded();
        for _ in 0..10 {
            rig.step(PlayerInput::default());
        }

        assert_eq!(rig.player.state(), PlayerState::Idle);
        assert_eq!(rig.player.vx(), 0.0);
        assert_eq!(rig.player.x(), 100.0);
        assert_eq!(rig.player.y(), STANDING_Y);
    }

    #[test]
    fn walking_sets_speed_and_facing_then_friction_stops() {
        let mut rig = Rig::grounded();
        rig.step(PlayerInput {
            left: true,
            ..PlayerInput::default()
        });
        assert_eq!(rig.player.vx(), -WALK_SPEED);
        assert_eq!(rig.player.facing(), Facing::Left);
        assert_eq!(rig.player.state(), PlayerState::Walking);

        rig.step(PlayerInput {
            right: true,
            run: true,
            ..PlayerInput::default()
        });
        assert_eq!(rig.player.vx(), RUN_SPEED);
        assert_eq!(rig.player.facing(), Facing::Right);

        for _ in 0..40 {
            rig.step(PlayerInput::default());
        }
        assert_eq!(rig.player.vx(), 0.0);
        assert_eq!(rig.player.state(), PlayerState::Idle);
    }

    #[test]
    fn walk_frames_follow_cadence() {
        let mut rig = Rig::grounded();
        let walk = PlayerInput {
            right: true,
            ..PlayerInput::default()
        };
        for _ in 0..WALK_FRAME_TICKS - 1 {
            rig.step(walk);
        }
        assert_eq!(rig.player.walk_frame(), 0);
        rig.step(walk);
        assert_eq!(rig.player.walk_frame(), 1);
    }

    #[test]
    fn no_air_control_without_input() {
        let mut rig = Rig::grounded();
        rig.step(PlayerInput {
            right: true,
            jump: true,
            ..PlayerInput::default()
        });
        assert!(!rig.player.on_ground());
        rig.step(PlayerInput::default());
        assert_eq!(rig.player.vx(), 0.0);
    }

    #[test]
    fn jump_starts_at_minimum_velocity() {
        let mut rig = Rig::grounded();
        rig.step(held(true, false));

        assert_eq!(rig.player.vy(), MIN_JUMP_VELOCITY + GRAVITY);
        assert!(!rig.player.on_ground());
        assert_eq!(rig.player.state(), PlayerState::Jumping);
        assert_eq!(rig.player.jump_hold_ticks(), 0);
    }

    #[test]
    fn holding_jump_reaches_maximum_velocity_at_hold_cap() {
        let mut rig = Rig::grounded();
        rig.step(held(true, false));
        for _ in 0..MAX_JUMP_HOLD_TICKS {
            rig.step(held(true, false));
        }

        assert_eq!(rig.player.jump_hold_ticks(), MAX_JUMP_HOLD_TICKS);
        assert_eq!(rig.player.vy(), MAX_JUMP_VELOCITY + GRAVITY);

        rig.step(held(true, false));
        assert_eq!(rig.player.vy(), MAX_JUMP_VELOCITY + 2.0 * GRAVITY);
    }

    #[test]
    fn jump_speed_is_monotonic_in_hold_time() {
        let mut peaks = Vec::new();
        for hold in [0, 3, 8, 15, 20] {
            let mut rig = Rig::grounded();
            rig.step(held(true, false));
            let mut peak = rig.player.vy();
            for tick in 0..40 {
                rig.step(held(tick < hold, false));
                peak = peak.min(rig.player.vy());
            }
            peaks.push(peak.abs());
        }

        assert!(peaks.windows(2).all(|pair| pair[0] <= pair[1]), "{peaks:?}");
        assert!(peaks[0] < peaks[peaks.len() - 1]);
    }

    #[test]
    fn held_jump_does_not_retrigger_after_landing() {
        let mut rig = Rig::grounded();
        for _ in 0..150 {
            rig.step(held(true, false));
        }
        assert!(rig.player.on_ground());
        assert_eq!(rig.player.vy(), 0.0);

        rig.step(held(false, false));
        rig.step(held(true, false));
        assert!(!rig.player.on_ground());
    }

    #[test]
    fn crouch_shrinks_hitbox_and_release_restores_it() {
        let mut rig = Rig::grounded();
        rig.step(held(false, true));

        assert!(rig.player.is_crouching());
        assert_eq!(rig.player.state(), PlayerState::Crouching);
        assert_eq!(rig.player.bounds().height, PLAYER_CROUCH_HEIGHT);
        assert_eq!(rig.player.bounds().bottom(), BASELINE_Y);

        rig.step(PlayerInput::default());
        assert!(!rig.player.is_crouching());
        assert_eq!(rig.player.bounds().height, PLAYER_HEIGHT);
        assert_eq!(rig.player.bounds().bottom(), BASELINE_Y);
    }

    #[test]
    fn crouching_ignores_horizontal_input() {
        let mut rig = Rig::grounded();
        rig.step(PlayerInput {
            right: true,
            ..PlayerInput::default()
        });
        rig.step(PlayerInput {
            right: true,
            crouch: true,
            ..PlayerInput::default()
        });

        assert_eq!(rig.player.vx(), 0.0);
        let x = rig.player.x();
        rig.step(PlayerInput {
            right: true,
            crouch: true,
            ..PlayerInput::default()
        });
        assert_eq!(rig.player.x(), x);
    }

    #[test]
    fn ceiling_keeps_player_crouched() {
        let mut rig = Rig::grounded();
        rig.step(held(false, true));
        let crouch_top = BASELINE_Y - PLAYER_CROUCH_HEIGHT;
        rig.world.add_block(
            BlockKind::Wall,
            Aabb::new(96.0, crouch_top - TILE_SIZE, TILE_SIZE, TILE_SIZE),
        );

        rig.step(PlayerInput::default());
        rig.step(PlayerInput::default());

        assert!(rig.player.is_crouching());
        assert_eq!(rig.player.bounds().height, PLAYER_CROUCH_HEIGHT);
    }

    #[test]
    fn crouch_jump_uses_its_own_velocity_and_cancels_crouch() {
        let mut rig = Rig::grounded();
        rig.step(held(false, true));
        rig.step(held(true, true));

        assert!(!rig.player.is_crouching());
        assert_eq!(rig.player.vy(), CROUCH_JUMP_VELOCITY + GRAVITY);
        assert_eq!(rig.player.bounds().height, PLAYER_HEIGHT);
        assert!(!rig.player.is_ground_pounding());
    }

    #[test]
    fn crouch_held_through_crouch_jump_needs_a_fresh_press_to_pound() {
        let mut rig = Rig::grounded();
        rig.step(held(false, true));
        rig.step(held(true, true));
        for _ in 0..5 {
            rig.step(held(false, true));
        }
        assert!(!rig.player.on_ground());
        assert!(!rig.player.is_ground_pounding());
        assert!(rig.events.is_empty());

        rig.step(held(false, false));
        rig.step(held(false, true));
        assert!(rig.player.is_ground_pounding());
        assert_eq!(rig.events, vec![GameEvent::GroundPoundStarted]);
    }

    #[test]
    fn spin_jump_spins_and_resets_on_landing() {
        let mut rig = Rig::grounded();
        rig.step(PlayerInput {
            spin_jump: true,
            ..PlayerInput::default()
        });

        assert_eq!(rig.events, vec![GameEvent::SpinJump]);
        assert!(rig.player.is_spin_jumping());
        assert_eq!(rig.player.state(), PlayerState::Spinning);
        assert_eq!(rig.player.vy(), SPIN_JUMP_VELOCITY + GRAVITY);
        assert_eq!(rig.player.spin_angle(), SPIN_DEGREES_PER_TICK);

        let mut max_angle: f32 = 0.0;
        for _ in 0..120 {
            rig.step(PlayerInput::default());
            max_angle = max_angle.max(rig.player.spin_angle());
        }
        assert!(max_angle < 360.0);
        assert!(!rig.player.is_spin_jumping());
        assert_eq!(rig.player.spin_angle(), 0.0);
    }

    #[test]
    fn ground_pound_falls_fast_and_kills_nearby_walkers() {
        let mut rig = Rig::grounded();
        rig.entities.spawn(Entity::Goomba(Goomba::new(150.0, STANDING_Y)));
        rig.entities.spawn(Entity::Goomba(Goomba::new(250.0, STANDING_Y)));
        rig.entities.apply_pending();
        rig.player = Player::new(100.0, 200.0);

        rig.step(held(false, true));
        assert!(rig.player.is_ground_pounding());
        assert_eq!(rig.player.vy(), GROUND_POUND_VELOCITY);
        assert_eq!(rig.player.vx(), 0.0);

        for _ in 0..20 {
            rig.step(held(false, true));
            if rig.player.on_ground() {
                break;
            }
        }

        assert!(!rig.player.is_ground_pounding());
        assert!(rig.player.on_ground());
        assert_eq!(
            rig.events,
            vec![
                GameEvent::GroundPoundStarted,
                GameEvent::GroundPoundLanded { kills: 1 }
            ]
        );
        let goombas: Vec<_> = rig.entities.iter().filter_map(Entity::as_goomba).collect();
        assert!(goombas[0].is_dead());
        assert!(!goombas[1].is_dead());
    }

    #[test]
    fn walls_stop_horizontal_motion() {
        let mut rig = Rig::grounded();
        rig.world.add_tile(BlockKind::Wall, 4, 10);

        for _ in 0..30 {
            rig.step(PlayerInput {
                right: true,
                ..PlayerInput::default()
            });
        }

        assert!(rig.player.bounds().right() <= 4.0 * TILE_SIZE);
        assert_eq!(rig.player.vx(), 0.0);
    }

    #[test]
    fn rising_into_question_block_spends_it() {
        let mut rig = Rig::grounded();
        let id = rig.world.add_tile(BlockKind::Question, 3, 8);

        rig.step(held(true, false));
        for _ in 0..20 {
            rig.step(held(true, false));
        }

        let block = rig.world.block(id).copied();
        assert_eq!(block.map(|block| (block.kind, block.hit)), Some((BlockKind::Ground, true)));
        assert_eq!(rig.entities.pending().len(), 1);
        assert!(matches!(
            rig.events.as_slice(),
            [GameEvent::QuestionBlockHit { .. }]
        ));
    }

    #[test]
    fn big_player_shrinks_instead_of_dying() {
        let mut rig = Rig::grounded();
        rig.player.power_up();
        rig.step(PlayerInput::default());
        assert_eq!(rig.player.bounds().height, PLAYER_BIG_HEIGHT);
        assert_eq!(rig.player.bounds().bottom(), BASELINE_Y);

        rig.player.die(&mut rig.events);
        assert!(!rig.player.is_big());
        assert!(rig.player.is_invincible());
        assert_eq!(rig.player.bounds().height, PLAYER_HEIGHT);

        rig.player.die(&mut rig.events);
        assert!(!rig.player.is_dead());
        assert_eq!(rig.events, vec![GameEvent::PlayerShrunk]);

        for _ in 0..INVINCIBILITY_TICKS {
            rig.step(PlayerInput::default());
        }
        rig.player.die(&mut rig.events);
        assert!(rig.player.is_dead());
    }

    #[test]
    fn dead_player_falls_and_resets_at_spawn() {
        let mut rig = Rig::grounded();
        rig.entities.spawn(Entity::Goomba(Goomba::new(400.0, STANDING_Y)));
        rig.entities.apply_pending();
        rig.player.die(&mut rig.events);

        assert!(rig.player.is_dead());
        assert_eq!(rig.player.vy(), DEATH_VELOCITY);
        assert_eq!(rig.player.vx(), 0.0);

        rig.step(PlayerInput {
            right: true,
            jump: true,
            ..PlayerInput::default()
        });
        assert_eq!(rig.player.x(), 100.0);
        assert_eq!(rig.player.vy(), DEATH_VELOCITY + DEAD_GRAVITY);

        for _ in 0..200 {
            if !rig.player.is_dead() {
                break;
            }
            rig.step(PlayerInput::default());
        }

        assert!(!rig.player.is_dead());
        assert_eq!((rig.player.x(), rig.player.y()), (100.0, STANDING_Y));
        assert!(rig.entities.is_empty());
        assert_eq!(rig.events, vec![GameEvent::PlayerDied, GameEvent::RunReset]);
    }
}
