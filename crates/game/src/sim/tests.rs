    use super::*;
    use crate::config::SimConfig;
    use crate::sim::entities::{Coin, Goomba, Mushroom};
    use crate::sim::player::{GRAVITY, MAX_JUMP_HOLD_TICKS, MAX_JUMP_VELOCITY, MIN_JUMP_VELOCITY};
    use crate::sim::world::{BASELINE_Y, GROUND_ROW};

    const STANDING_Y: f32 = BASELINE_Y - 32.0;

    fn flat_config(spawn_x: f32, spawn_y: f32) -> SimConfig {
        SimConfig {
            seed: Some(0),
            spawn_x,
            spawn_y,
            ..SimConfig::default()
        }
    }

    /// A long flat ground strip with procedural generation switched off.
    fn flat_simulation(config: &SimConfig) -> Simulation {
        let mut world = World::with_seed(0);
        for tile_x in -40..200 {
            world.add_tile(BlockKind::Ground, tile_x, GROUND_ROW);
        }
        world.skip_generation_until(1.0e9);
        Simulation::with_world(config, world)
    }

    fn spawn_live(simulation: &mut Simulation, entity: Entity) {
        let (_, entities, _) = simulation.parts_mut();
        entities.spawn(entity);
        entities.apply_pending();
    }

    fn input(configure: impl FnOnce(&mut PlayerInput)) -> PlayerInput {
        let mut input = PlayerInput::default();
        configure(&mut input);
        input
    }

    #[test]
    fn resting_player_stays_idle_without_input() {
        let mut simulation = flat_simulation(&flat_config(100.0, STANDING_Y));
        let mut events = Vec::new();

        for _ in 0..10 {
            simulation.tick(&PlayerInput::default(), &mut events);
        }

        let player = simulation.player();
        assert_eq!(player.state(), PlayerState::Idle);
        assert_eq!(player.vx(), 0.0);
        assert_eq!((player.x(), player.y()), (100.0, STANDING_Y));
        assert!(player.on_ground());
        assert!(events.is_empty());
    }

    #[test]
    fn jump_starts_at_minimum_and_hold_approaches_maximum() {
        let mut simulation = flat_simulation(&flat_config(100.0, STANDING_Y));
        let mut events = Vec::new();
        simulation.tick(&PlayerInput::default(), &mut events);

        let jump = input(|input| input.jump = true);
        simulation.tick(&jump, &mut events);
        assert_eq!(simulation.player().vy(), MIN_JUMP_VELOCITY + GRAVITY);
        assert!(!simulation.player().on_ground());

        let mut previous = simulation.player().vy();
        for _ in 0..MAX_JUMP_HOLD_TICKS {
            simulation.tick(&jump, &mut events);
            let vy = simulation.player().vy();
            assert!(vy < previous, "{vy} should be faster upward than {previous}");
            previous = vy;
        }
        assert_eq!(simulation.player().vy(), MAX_JUMP_VELOCITY + GRAVITY);
    }

    #[test]
    fn rising_into_question_block_spawns_one_live_reward() {
        let mut simulation = flat_simulation(&flat_config(100.0, STANDING_Y));
        let (world, _, _) = simulation.parts_mut();
        let block_id = world.add_tile(BlockKind::Question, 3, 8);
        let mut events = Vec::new();
        simulation.tick(&PlayerInput::default(), &mut events);

        let jump = input(|input| input.jump = true);
        for _ in 0..30 {
            simulation.tick(&jump, &mut events);
            if !events.is_empty() {
                break;
            }
        }

        let block = simulation.world().block(block_id).copied().expect("block");
        assert_eq!(block.kind, BlockKind::Ground);
        assert!(block.hit);
        assert!(simulation.entities().pending().is_empty());
        assert_eq!(simulation.entities().len(), 1);
        let spawned = simulation.entities().live()[0].kind();
        assert!(matches!(spawned, EntityKind::Coin | EntityKind::Mushroom));
        assert_eq!(events, vec![GameEvent::QuestionBlockHit { spawned }]);
    }

    #[test]
    fn falling_onto_question_block_spawns_one_live_reward() {
        let mut simulation = flat_simulation(&flat_config(100.0, 100.0));
        let (world, _, _) = simulation.parts_mut();
        let block_id = world.add_tile(BlockKind::Question, 3, 8);
        let mut events = Vec::new();

        for _ in 0..60 {
            simulation.tick(&PlayerInput::default(), &mut events);
            if !events.is_empty() {
                break;
            }
        }

        let block = simulation.world().block(block_id).copied().expect("block");
        assert_eq!(block.kind, BlockKind::Ground);
        assert!(block.hit);
        assert!(simulation.player().on_ground());
        assert_eq!(simulation.player().y(), 8.0 * 32.0 - 32.0);
        assert!(simulation.entities().pending().is_empty());
        assert_eq!(simulation.entities().len(), 1);
        let spawned = simulation.entities().live()[0].kind();
        assert!(matches!(spawned, EntityKind::Coin | EntityKind::Mushroom));
        assert_eq!(events, vec![GameEvent::QuestionBlockHit { spawned }]);
    }

    #[test]
    fn falling_onto_goomba_stomps_it_and_scores() {
        let mut simulation = flat_simulation(&flat_config(100.0, 280.0));
        spawn_live(&mut simulation, Entity::Goomba(Goomba::new(100.0, STANDING_Y)));
        let mut events = Vec::new();

        for _ in 0..40 {
            simulation.tick(&PlayerInput::default(), &mut events);
            if !events.is_empty() {
                break;
            }
        }

        let goomba = simulation.entities().iter().find_map(Entity::as_goomba);
        assert!(goomba.is_some_and(Goomba::is_dead));
        assert_eq!(simulation.player().vy(), -5.0);
        assert!(!simulation.player().is_dead());
        assert_eq!(simulation.scoreboard().score(), 200);
        assert_eq!(events, vec![GameEvent::EnemyStomped { points: 200 }]);
    }

    #[test]
    fn walking_into_goomba_kills_small_player() {
        let mut simulation = flat_simulation(&flat_config(100.0, STANDING_Y));
        spawn_live(&mut simulation, Entity::Goomba(Goomba::new(160.0, STANDING_Y)));
        let mut events = Vec::new();

        let walk = input(|input| input.right = true);
        for _ in 0..40 {
            simulation.tick(&walk, &mut events);
            if simulation.player().is_dead() {
                break;
            }
        }

        assert!(simulation.player().is_dead());
        assert_eq!(simulation.player().state(), PlayerState::Dead);
        assert_eq!(events, vec![GameEvent::PlayerDied]);
        assert_eq!(
            GameEvent::PlayerDied.music_command(),
            Some(MusicCommand::Stop)
        );
    }

    #[test]
    fn ground_pound_landing_kills_only_nearby_goombas() {
        let mut simulation = flat_simulation(&flat_config(200.0, 200.0));
        for x in [250.0, 160.0, 300.0, 90.0] {
            spawn_live(&mut simulation, Entity::Goomba(Goomba::new(x, STANDING_Y)));
        }
        let mut events = Vec::new();

        let pound = input(|input| input.crouch = true);
        simulation.tick(&pound, &mut events);
        assert!(simulation.player().is_ground_pounding());
        for _ in 0..30 {
            if !simulation.player().is_ground_pounding() {
                break;
            }
            simulation.tick(&pound, &mut events);
        }

        let alive: Vec<bool> = simulation
            .entities()
            .iter()
            .filter_map(Entity::as_goomba)
            .map(|goomba| !goomba.is_dead())
            .collect();
        assert_eq!(alive, vec![false, false, true, true]);
        assert_eq!(
            events,
            vec![
                GameEvent::GroundPoundStarted,
                GameEvent::GroundPoundLanded { kills: 2 }
            ]
        );
        assert!(simulation.player().on_ground());
    }

    #[test]
    fn collecting_coin_updates_scoreboard_and_removes_it() {
        let mut simulation = flat_simulation(&flat_config(100.0, STANDING_Y));
        spawn_live(
            &mut simulation,
            Entity::Coin(Coin::new(140.0, BASELINE_Y - 24.0)),
        );
        let mut events = Vec::new();

        let walk = input(|input| input.right = true);
        for _ in 0..40 {
            simulation.tick(&walk, &mut events);
        }

        assert_eq!(events, vec![GameEvent::CoinCollected]);
        assert!(simulation.entities().is_empty());
        assert_eq!(simulation.hud().coins, 1);
        assert_eq!(simulation.hud().score, 100);
    }

    #[test]
    fn mushroom_makes_player_big_with_feet_on_ground() {
        let mut simulation = flat_simulation(&flat_config(100.0, STANDING_Y));
        spawn_live(
            &mut simulation,
            Entity::Mushroom(Mushroom::new(20.0, STANDING_Y)),
        );
        let mut events = Vec::new();

        for _ in 0..60 {
            simulation.tick(&PlayerInput::default(), &mut events);
            if !events.is_empty() {
                break;
            }
        }

        assert_eq!(events, vec![GameEvent::PowerUp]);
        let player = simulation.player();
        assert!(player.is_big());
        assert_eq!(player.bounds().height, 64.0);
        assert_eq!(player.bounds().bottom(), BASELINE_Y);
    }

    #[test]
    fn crossing_finish_line_completes_level_once_and_resets() {
        let mut simulation = flat_simulation(&SimConfig {
            level_complete_x: 300.0,
            ..flat_config(100.0, STANDING_Y)
        });
        spawn_live(&mut simulation, Entity::Coin(Coin::new(130.0, BASELINE_Y - 24.0)));
        let mut events = Vec::new();

        let run = input(|input| {
            input.right = true;
            input.run = true;
        });
        for _ in 0..60 {
            simulation.tick(&run, &mut events);
            if events.contains(&GameEvent::LevelComplete) {
                break;
            }
        }

        assert_eq!(
            events,
            vec![
                GameEvent::CoinCollected,
                GameEvent::LevelComplete,
                GameEvent::RunReset
            ]
        );
        assert_eq!(simulation.player().x(), 100.0);
        assert_eq!(simulation.scoreboard().score(), 0);
        assert_eq!(simulation.scoreboard().coins(), 0);
        assert_eq!(simulation.last_tick_counts().resets, 1);

        simulation.tick(&PlayerInput::default(), &mut events);
        assert_eq!(simulation.last_tick_counts().total, 0);
    }

    #[test]
    fn spawns_from_block_hits_are_not_touched_in_the_same_tick() {
        let mut simulation = flat_simulation(&flat_config(100.0, STANDING_Y));
        let (world, entities, _) = simulation.parts_mut();
        let block_id = world.add_tile(BlockKind::Question, 3, 8);
        world.hit_question_block(block_id, entities);

        assert_eq!(simulation.entities().pending().len(), 1);
        assert!(simulation.entities().is_empty());

        let mut events = Vec::new();
        simulation.tick(&PlayerInput::default(), &mut events);
        assert!(simulation.entities().pending().is_empty());
        assert_eq!(simulation.entities().len(), 1);
    }

    #[test]
    fn null_sink_still_feeds_scoreboard() {
        let mut simulation = flat_simulation(&flat_config(100.0, STANDING_Y));
        spawn_live(
            &mut simulation,
            Entity::Coin(Coin::new(140.0, BASELINE_Y - 24.0)),
        );

        let walk = input(|input| input.right = true);
        for _ in 0..40 {
            simulation.tick(&walk, &mut NullSink);
        }

        assert_eq!(simulation.scoreboard().coins(), 1);
    }
