use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rat_maze_world::{query, World};
use rat_maze_core::{MazeConfig, MazeSpec, Obstacle};

fn box_world() -> World {
    let config = MazeConfig::new(MazeSpec::Box {
        length: 300.0,
        width: 200.0,
        height: 100.0,
    });
    World::build(&config).expect("box maze builds")
}

#[test]
fn box_center_is_valid_and_outside_is_not() {
    let world = box_world();
    assert!(world.valid_position(Vec2::new(150.0, 100.0)));
    assert!(!world.valid_position(Vec2::new(-1.0, -1.0)));
    assert!(!world.valid_position(Vec2::new(301.0, 100.0)));
}

#[test]
fn positions_inside_the_wall_offset_are_rejected() {
    let world = box_world();
    // Default clearance is five units.
    assert!(!world.valid_position(Vec2::new(2.0, 100.0)));
    assert!(!world.valid_position(Vec2::new(150.0, 198.0)));
    assert!(world.valid_position(Vec2::new(10.0, 100.0)));
    assert!(world.valid_position(Vec2::new(150.0, 190.0)));
}

#[test]
fn clear_interior_point_in_front_of_every_wall_is_valid() {
    let world = box_world();
    let point = Vec2::new(80.0, 60.0);
    for wall in query::walls(&world) {
        assert!(wall.facing_front(point));
        assert!(!wall.proximity_alert(point));
    }
    assert!(world.valid_position(point));
}

#[test]
fn steps_crossing_a_wall_are_rejected() {
    let world = box_world();
    // Legal destination reached through a wall is still rejected.
    assert!(!world.valid_step(Vec2::new(150.0, 100.0), Vec2::new(150.0, 300.0)));
    assert!(!world.valid_step(Vec2::new(290.0, 100.0), Vec2::new(310.0, 100.0)));
    assert!(world.valid_step(Vec2::new(150.0, 100.0), Vec2::new(160.0, 110.0)));
}

#[test]
fn limits_tightly_bound_all_wall_endpoints() {
    let world = box_world();
    let limits = world.limits();
    assert_eq!(limits.min(), Vec2::ZERO);
    assert_eq!(limits.max(), Vec2::new(300.0, 200.0));

    for wall in query::walls(&world) {
        assert!(limits.contains(wall.from()));
        assert!(limits.contains(wall.to()));
    }
}

#[test]
fn obstacle_walls_participate_in_limits() {
    let mut config = MazeConfig::new(MazeSpec::Box {
        length: 300.0,
        width: 200.0,
        height: 100.0,
    });
    config.obstacles.push(Obstacle::from_corners(
        Vec2::new(280.0, 80.0),
        Vec2::new(320.0, 120.0),
    ));
    let world = World::build(&config).expect("box with obstacle builds");
    assert_eq!(world.limits().max(), Vec2::new(320.0, 200.0));
}

#[test]
fn steps_into_an_obstacle_are_rejected() {
    let mut config = MazeConfig::new(MazeSpec::Box {
        length: 300.0,
        width: 200.0,
        height: 100.0,
    });
    config.obstacles.push(Obstacle::from_corners(
        Vec2::new(100.0, 80.0),
        Vec2::new(140.0, 120.0),
    ));
    let world = World::build(&config).expect("box with obstacle builds");

    // Approaching closer than the offset trips the proximity alert.
    assert!(!world.valid_position(Vec2::new(98.0, 100.0)));
    // Stepping across an obstacle wall is a crossing violation.
    assert!(!world.valid_step(Vec2::new(90.0, 100.0), Vec2::new(120.0, 100.0)));
    // Walking past the obstacle with clearance stays legal.
    assert!(world.valid_step(Vec2::new(90.0, 40.0), Vec2::new(150.0, 40.0)));
}

#[test]
fn circle_maze_contains_its_center_only() {
    let config = MazeConfig::new(MazeSpec::Circle {
        radius: 100.0,
        segments: 32,
        wall_height: 20.0,
    });
    let world = World::build(&config).expect("circle maze builds");
    assert!(world.valid_position(Vec2::ZERO));
    assert!(!world.valid_position(Vec2::new(120.0, 0.0)));
}

#[test]
fn random_positions_are_always_valid() {
    let world = box_world();
    let mut rng = ChaCha8Rng::seed_from_u64(0xF00D);
    for _ in 0..1_000 {
        let position = world
            .random_position(&mut rng)
            .expect("box maze has free interior");
        assert!(world.valid_position(position));
    }
}

#[test]
fn random_position_gives_up_on_mazes_without_interior() {
    // A corridor narrower than twice the wall offset has no valid points.
    let config = MazeConfig::new(MazeSpec::Box {
        length: 300.0,
        width: 8.0,
        height: 100.0,
    });
    let world = World::build(&config).expect("narrow box builds");
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert!(world.random_position(&mut rng).is_err());
}
