use std::path::PathBuf;

use glam::Vec2;
use rat_maze_core::{MazeConfig, MazeSpec, NavigationTuning};
use rat_maze_system_navigation::{NavigationError, RatBot};
use rat_maze_world::World;

fn box_world() -> World {
    let config = MazeConfig::new(MazeSpec::Box {
        length: 300.0,
        width: 200.0,
        height: 100.0,
    });
    World::build(&config).expect("box maze builds")
}

fn exploration_tuning() -> NavigationTuning {
    NavigationTuning {
        speed: 1.0,
        momentum: 0.8,
        arc: 320.0,
        ..NavigationTuning::default()
    }
}

#[test]
fn exploration_never_leaves_the_walkable_region() {
    let world = box_world();
    let start = Vec2::new(150.0, 100.0);
    let mut rat = RatBot::explorer(&world, exploration_tuning(), start, 7);

    for _ in 0..1_000 {
        let (position, _) = rat.next_step();
        assert!(
            position.x >= 5.0 && position.x <= 295.0,
            "x left the offset bounds: {position}"
        );
        assert!(
            position.y >= 5.0 && position.y <= 195.0,
            "y left the offset bounds: {position}"
        );
    }

    // Every recorded transition is a legal step.
    for pair in rat.path().windows(2) {
        if pair[0] != pair[1] {
            assert!(world.valid_step(pair[0], pair[1]));
        }
    }
}

#[test]
fn each_step_appends_exactly_one_path_entry() {
    let world = box_world();
    let mut rat = RatBot::explorer(&world, exploration_tuning(), Vec2::new(150.0, 100.0), 3);
    assert_eq!(rat.path().len(), 1);
    for expected in 2..50 {
        let (position, _) = rat.next_step();
        assert_eq!(rat.path().len(), expected);
        assert_eq!(rat.position(), position);
    }
}

#[test]
fn step_length_matches_configured_speed_without_bias() {
    let world = box_world();
    let mut rat = RatBot::explorer(&world, exploration_tuning(), Vec2::new(150.0, 100.0), 11);
    for _ in 0..200 {
        let (_, step) = rat.next_step();
        if step != Vec2::ZERO {
            assert!((step.length() - 1.0).abs() < 1e-4, "step was {step}");
        }
    }
}

#[test]
fn unbiased_exploration_has_no_mean_drift() {
    let world = box_world();
    let mut rat = RatBot::explorer(&world, exploration_tuning(), Vec2::new(150.0, 100.0), 42);

    let steps = 4_000;
    let mut total = Vec2::ZERO;
    for _ in 0..steps {
        let (_, step) = rat.next_step();
        total += step;
    }
    let mean = total / steps as f32;
    assert!(
        mean.length() < 0.25,
        "expected no preferred heading, mean step was {mean}"
    );
}

#[test]
fn bias_accentuates_motion_along_its_axis() {
    let world = box_world();
    let tuning = NavigationTuning {
        bias: Vec2::new(1.0, 0.0),
        bias_strength: 0.5,
        ..exploration_tuning()
    };
    let mut rat = RatBot::explorer(&world, tuning, Vec2::new(150.0, 100.0), 42);

    let mut along = 0.0_f32;
    let mut across = 0.0_f32;
    for _ in 0..2_000 {
        let (_, step) = rat.next_step();
        along += step.x.abs();
        across += step.y.abs();
    }
    assert!(
        along > across,
        "biased walk should favour its axis: {along} vs {across}"
    );
}

#[test]
fn impossible_speed_exhausts_retries_and_holds_position() {
    let world = box_world();
    let tuning = NavigationTuning {
        speed: 500.0,
        ..exploration_tuning()
    };
    let start = Vec2::new(150.0, 100.0);
    let mut rat = RatBot::explorer(&world, tuning, start, 5);

    let (position, step) = rat.next_step();
    assert_eq!(position, start);
    assert_eq!(step, Vec2::ZERO);
    assert_eq!(rat.path(), &[start, start]);
}

fn write_waypoints(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(name);
    std::fs::write(&path, content).expect("write waypoint file");
    path
}

fn route_tuning() -> NavigationTuning {
    NavigationTuning {
        speed: 1.0,
        path_deviation: 0.0,
        ..NavigationTuning::default()
    }
}

#[test]
fn follower_starts_at_the_first_waypoint() {
    let world = box_world();
    let file = write_waypoints("rat_maze_route_start.txt", "50 50\n60 50\n60 60\n");
    let rat = RatBot::follower(&world, route_tuning(), &file, 1).expect("route loads");
    assert_eq!(rat.position(), Vec2::new(50.0, 50.0));
    assert_eq!(rat.path(), &[Vec2::new(50.0, 50.0)]);
}

#[test]
fn follower_advances_toward_each_waypoint_in_turn() {
    let world = box_world();
    let file = write_waypoints("rat_maze_route_advance.txt", "50 50\n60 50\n60 60\n");
    let mut rat = RatBot::follower(&world, route_tuning(), &file, 1).expect("route loads");

    // With zero deviation the first leg is a straight unit-step line.
    let (position, step) = rat.next_step();
    assert!((position - Vec2::new(51.0, 50.0)).length() < 1e-4);
    assert!((step - Vec2::new(1.0, 0.0)).length() < 1e-4);
}

#[test]
fn non_looping_route_teleports_back_to_its_start() {
    let world = box_world();
    let file = write_waypoints("rat_maze_route_teleport.txt", "50 50\n52 50\n");
    let mut rat = RatBot::follower(&world, route_tuning(), &file, 1).expect("route loads");

    let start = Vec2::new(50.0, 50.0);
    let mut teleported = None;
    for _ in 0..16 {
        let (position, heading) = rat.next_step();
        if position == start {
            teleported = Some(heading);
            break;
        }
    }

    // The reset is exact, not interpolated travel, and the reported
    // heading is the first route leg.
    let heading = teleported.expect("route should wrap within a few steps");
    assert_eq!(heading, Vec2::new(1.0, 0.0));
    assert_eq!(rat.position(), start);
}

#[test]
fn looping_route_walks_back_instead_of_teleporting() {
    let world = box_world();
    let file = write_waypoints("rat_maze_route_loop.txt", "50 50\n52 50\n");
    let tuning = NavigationTuning {
        path_loop: true,
        ..route_tuning()
    };
    let mut rat = RatBot::follower(&world, tuning, &file, 1).expect("route loads");

    for _ in 0..16 {
        let (_, step) = rat.next_step();
        // Every move covers at most one speed unit; a teleport would not.
        assert!(step.length() < 1.0 + 1e-4);
    }
}

#[test]
fn follower_ignores_walls_by_design() {
    let world = box_world();
    // Both waypoints sit outside the box maze on purpose.
    let file = write_waypoints("rat_maze_route_outside.txt", "-50 -50\n-50 -40\n");
    let mut rat = RatBot::follower(&world, route_tuning(), &file, 1).expect("route loads");
    let (position, _) = rat.next_step();
    assert!(!world.valid_position(position));
}

#[test]
fn malformed_waypoint_line_is_a_hard_error() {
    let world = box_world();
    let file = write_waypoints("rat_maze_route_malformed.txt", "50 50\nnot numbers\n");
    match RatBot::follower(&world, route_tuning(), &file, 1) {
        Err(NavigationError::MalformedWaypoint { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected a malformed waypoint error, got {other:?}"),
    }
}

#[test]
fn single_waypoint_route_is_rejected() {
    let world = box_world();
    let file = write_waypoints("rat_maze_route_single.txt", "50 50\n");
    assert!(matches!(
        RatBot::follower(&world, route_tuning(), &file, 1),
        Err(NavigationError::TooFewWaypoints { count: 1, .. })
    ));
}

#[test]
fn missing_waypoint_file_is_a_hard_error() {
    let world = box_world();
    let missing = PathBuf::from("/nonexistent/route.txt");
    assert!(matches!(
        RatBot::follower(&world, route_tuning(), &missing, 1),
        Err(NavigationError::WaypointFile { .. })
    ));
}
