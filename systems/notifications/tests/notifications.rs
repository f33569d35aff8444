use cowboy_shooter_core::{Command, EnemyKind, Event, Motion};
use cowboy_shooter_system_notifications::{reports_game_over, Notifications, Scoreboard};
use cowboy_shooter_world::{self as world, query, World};
use glam::Vec2;

fn step(world: &mut World, commands: &[Command]) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command.clone(), &mut events);
    }
    events
}

#[test]
fn shooting_down_a_bandit_scores_ten_points() {
    let mut world = World::new(17);
    let mut scoreboard = Scoreboard::new();
    let mut notifications = Notifications::new();
    let above_player = query::player(&world).position() - Vec2::new(0.0, 136.0);
    let _ = step(
        &mut world,
        &[Command::SpawnEnemy {
            kind: EnemyKind::Bandit,
            motion: Motion::LinearDescent,
            position: above_player,
            wave: 0,
        }],
    );

    let mut all_events = Vec::new();
    for _ in 0..60 {
        let events = step(&mut world, &[Command::Shoot, Command::Tick]);
        scoreboard.handle(&events);
        notifications.handle(&events, query::player(&world).position());
        all_events.extend(events);
    }

    assert_eq!(scoreboard.score(), 10);
    assert!(query::enemies(&world).is_empty());
    assert_eq!(
        all_events
            .iter()
            .filter(|event| matches!(event, Event::DropRolled { .. }))
            .count(),
        1,
        "exactly one drop roll per kill"
    );
    assert!(notifications
        .active()
        .iter()
        .any(|notification| notification.text() == "+10"));
    assert!(!reports_game_over(&all_events));
}

#[test]
fn losing_the_last_health_point_is_reported() {
    let mut world = World::new(8);
    let mut game_over = false;

    for _ in 0..3 {
        let position = query::player(&world).position();
        let events = step(
            &mut world,
            &[
                Command::SpawnEnemy {
                    kind: EnemyKind::Bandit,
                    motion: Motion::LinearDescent,
                    position,
                    wave: 0,
                },
                Command::Tick,
            ],
        );
        game_over = reports_game_over(&events);
    }

    assert!(game_over, "third contact drains the last health point");
    assert_eq!(query::player(&world).health(), 0);
}
