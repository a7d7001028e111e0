//! End-to-end scenarios through the public simulation and scheduler API

use arena_server::game::{
    InputState, PlayerId, SimCommand, Simulation, TickScheduler, WorldConfig, WorldSnapshot,
};
use arena_server::ws::protocol::{ClientMsg, ServerMsg};

fn world(width: f32, height: f32) -> WorldConfig {
    WorldConfig {
        width,
        height,
        ..WorldConfig::default()
    }
}

fn tick(sim: &mut Simulation) {
    let dt = sim.config().nominal_dt();
    sim.tick(dt);
}

/// MOVEMENT
mod movement {
    use super::*;

    #[test]
    fn holding_right_moves_five_units() {
        let mut sim = Simulation::new(world(800.0, 600.0), 11);
        sim.add_player(PlayerId(1)).unwrap();
        sim.place_player(PlayerId(1), 100.0, 100.0);
        sim.set_input(
            PlayerId(1),
            InputState {
                right: true,
                ..InputState::default()
            },
        );

        tick(&mut sim);

        let view = &sim.snapshot().players[&PlayerId(1)];
        assert_eq!((view.x, view.y), (105.0, 100.0));
    }

    #[test]
    fn right_edge_clamps_to_width() {
        let mut sim = Simulation::new(world(800.0, 600.0), 11);
        sim.add_player(PlayerId(1)).unwrap();
        sim.place_player(PlayerId(1), 795.0, 100.0);
        sim.set_input(
            PlayerId(1),
            InputState {
                right: true,
                ..InputState::default()
            },
        );

        tick(&mut sim);

        assert_eq!(sim.snapshot().players[&PlayerId(1)].x, 800.0);
    }

    #[test]
    fn input_is_replaced_wholesale() {
        let mut sim = Simulation::new(world(800.0, 600.0), 11);
        sim.add_player(PlayerId(1)).unwrap();
        sim.place_player(PlayerId(1), 100.0, 100.0);
        sim.set_input(
            PlayerId(1),
            InputState {
                right: true,
                down: true,
                ..InputState::default()
            },
        );
        sim.set_input(
            PlayerId(1),
            InputState {
                up: true,
                ..InputState::default()
            },
        );

        tick(&mut sim);

        let view = &sim.snapshot().players[&PlayerId(1)];
        assert_eq!((view.x, view.y), (100.0, 95.0));
    }
}

/// COMBAT
mod combat {
    use super::*;

    fn duel() -> Simulation {
        let mut sim = Simulation::new(world(800.0, 600.0), 5);
        sim.add_player(PlayerId(1)).unwrap();
        sim.add_player(PlayerId(2)).unwrap();
        sim
    }

    fn shoot_point_blank(sim: &mut Simulation) {
        sim.place_player(PlayerId(1), 100.0, 100.0);
        sim.place_player(PlayerId(2), 110.0, 100.0);
        sim.spawn_projectile(PlayerId(1), 0.0).unwrap();
        tick(sim);
    }

    #[test]
    fn hit_from_origin_after_approach() {
        let mut sim = duel();
        sim.place_player(PlayerId(1), 0.0, 0.0);
        sim.place_player(PlayerId(2), 48.0, 0.0);
        sim.spawn_projectile(PlayerId(1), 0.0).unwrap();

        tick(&mut sim);
        let snapshot = sim.snapshot();
        assert_eq!(snapshot.projectiles.len(), 1);
        assert_eq!((snapshot.projectiles[0].x, snapshot.projectiles[0].y), (12.0, 0.0));
        assert_eq!(snapshot.players[&PlayerId(2)].hp, 100);

        tick(&mut sim);
        let snapshot = sim.snapshot();
        assert!(snapshot.projectiles.is_empty());
        assert_eq!(snapshot.players[&PlayerId(2)].hp, 90);
        assert_eq!(snapshot.players[&PlayerId(1)].score, 0);
    }

    #[test]
    fn tenth_hit_respawns_and_scores_once() {
        let mut sim = duel();
        for _ in 0..9 {
            shoot_point_blank(&mut sim);
        }
        assert_eq!(sim.snapshot().players[&PlayerId(2)].hp, 10);
        assert_eq!(sim.snapshot().players[&PlayerId(1)].score, 0);

        shoot_point_blank(&mut sim);
        let snapshot = sim.snapshot();
        let target = &snapshot.players[&PlayerId(2)];
        assert_eq!(target.hp, 100);
        assert!((0.0..=800.0).contains(&target.x));
        assert!((0.0..=600.0).contains(&target.y));
        assert_eq!(snapshot.players[&PlayerId(1)].score, 1);

        shoot_point_blank(&mut sim);
        assert_eq!(sim.snapshot().players[&PlayerId(1)].score, 1);
    }

    #[test]
    fn disconnected_shooter_earns_nothing() {
        let mut sim = duel();
        sim.add_player(PlayerId(3)).unwrap();
        for _ in 0..9 {
            shoot_point_blank(&mut sim);
        }

        sim.place_player(PlayerId(2), 110.0, 100.0);
        sim.spawn_projectile(PlayerId(1), 0.0).unwrap();
        sim.remove_player(PlayerId(1));
        tick(&mut sim);

        let snapshot = sim.snapshot();
        assert!(!snapshot.players.contains_key(&PlayerId(1)));
        assert_eq!(snapshot.players[&PlayerId(2)].hp, 100);
        assert!(snapshot.players.values().all(|p| p.score == 0));
    }

    #[test]
    fn remove_twice_is_noop() {
        let mut sim = duel();
        sim.remove_player(PlayerId(2));
        let before = sim.snapshot();
        sim.remove_player(PlayerId(2));
        assert_eq!(sim.snapshot(), before);
    }
}

/// SCHEDULER + PROTOCOL
mod pipeline {
    use super::*;

    fn state_update(msg: ServerMsg) -> WorldSnapshot {
        match msg {
            ServerMsg::StateUpdate(snapshot) => snapshot,
            other => panic!("expected state update, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn client_messages_flow_into_snapshots() {
        let (mut scheduler, handle) =
            TickScheduler::new(Simulation::new(world(800.0, 600.0), 9), 60);
        let mut rx = handle.subscribe();

        assert!(handle.send(SimCommand::Connect(PlayerId(1))).await);
        assert!(handle.send(SimCommand::Connect(PlayerId(2))).await);
        scheduler.step();
        let first = state_update(rx.recv().await.unwrap());
        assert_eq!(first.players.len(), 2);

        let raw = r#"{"type":"shoot","angle":0.0}"#;
        let msg: ClientMsg = serde_json::from_str(raw).unwrap();
        assert!(handle.send(msg.into_command(PlayerId(1))).await);

        // Late message for a player that never existed
        assert!(handle.send(SimCommand::Shoot(PlayerId(99), 0.0)).await);
        scheduler.step();

        let second = state_update(rx.recv().await.unwrap());
        assert_eq!(second.tick, 2);
        assert!(!second.players.contains_key(&PlayerId(99)));

        let json = serde_json::to_value(ServerMsg::StateUpdate(second)).unwrap();
        assert_eq!(json["type"], "state_update");
        assert!(json["players"]["1"]["hp"].is_i64());
    }
}
