#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line driver that runs a simulated rat through a polygonal maze.

mod experiment_transfer;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use glam::Vec2;
use rand::SeedableRng as _;
use rand_chacha::ChaCha8Rng;
use rat_maze_core::{MazeConfig, MazeSpec, NavigationTuning, Obstacle, DEFAULT_WALL_OFFSET};
use rat_maze_system_navigation::RatBot;
use rat_maze_world::{query, World};

use crate::experiment_transfer::ExperimentSnapshot;

/// Builds a maze, walks a simulated rat through it and reports the trajectory.
#[derive(Parser)]
#[command(name = "rat-maze", version)]
struct Cli {
    #[command(flatten)]
    run: RunArgs,
    #[command(subcommand)]
    maze: MazeCommand,
}

/// Parameters shared by every maze archetype.
#[derive(Args)]
struct RunArgs {
    /// Seed for the deterministic random number generator.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Number of simulation steps to run.
    #[arg(long, default_value_t = 1_000)]
    steps: u32,
    /// Starting position, `x,y`; drawn at random when omitted.
    #[arg(long, value_parser = parse_point)]
    start: Option<Vec2>,
    /// Waypoint file switching the rat to route-following mode.
    #[arg(long)]
    route: Option<PathBuf>,
    /// File the trajectory is written to, one `x y` pair per line.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Print the experiment transfer string instead of running.
    #[arg(long)]
    print_transfer: bool,
    #[command(flatten)]
    tuning: TuningArgs,
}

/// Locomotion tuning knobs.
#[derive(Args)]
struct TuningArgs {
    /// Distance covered by one step.
    #[arg(long, default_value_t = 1.0)]
    speed: f32,
    /// Weight of the previous velocity in the next step, in `[0,1]`.
    #[arg(long, default_value_t = 0.55)]
    momentum: f32,
    /// Width in degrees of the heading noise sector; `360` disables it.
    #[arg(long, default_value_t = 320.0)]
    arc: f32,
    /// Axis of a directional speed-up, `x,y`.
    #[arg(long, value_parser = parse_point)]
    bias: Option<Vec2>,
    /// Strength factor applied to the directional bias term.
    #[arg(long, default_value_t = 0.0)]
    bias_strength: f32,
    /// Lateral deviation from the beeline while following a route.
    #[arg(long, default_value_t = 0.125)]
    path_deviation: f32,
    /// Restart a waypoint route seamlessly instead of teleporting back.
    #[arg(long)]
    path_loop: bool,
}

impl TuningArgs {
    fn to_tuning(&self) -> NavigationTuning {
        NavigationTuning {
            speed: self.speed,
            momentum: self.momentum,
            arc: self.arc,
            bias: self.bias.unwrap_or(Vec2::ZERO),
            bias_strength: self.bias_strength,
            path_deviation: self.path_deviation,
            path_loop: self.path_loop,
        }
    }
}

/// Maze archetype to construct.
#[derive(Subcommand)]
enum MazeCommand {
    /// Rectangular box arena.
    Box(BoxArgs),
    /// Radial maze with corridors around a central polygon.
    Star(StarArgs),
    /// T-shaped maze with a vertical stem and a horizontal bar.
    TMaze(TMazeArgs),
    /// Circular arena approximated by wall chords.
    Circle(CircleArgs),
    /// Custom maze loaded from a wall description file.
    File(FileArgs),
    /// Re-run an experiment captured in a transfer string.
    Replay(ReplayArgs),
}

/// Options every constructed maze accepts.
#[derive(Args)]
struct MazeOptions {
    /// Rectangular obstacle, `x1,y1,x2,y2`; may be repeated.
    #[arg(long = "obstacle", value_parser = parse_obstacle)]
    obstacles: Vec<Obstacle>,
    /// Minimum clearance kept between the rat and every wall.
    #[arg(long, default_value_t = DEFAULT_WALL_OFFSET)]
    wall_offset: f32,
    /// Assign a different texture to every wall.
    #[arg(long)]
    wall_mix: bool,
    /// Assign a different crate texture to every obstacle.
    #[arg(long)]
    obstacle_mix: bool,
}

impl MazeOptions {
    fn into_config(self, spec: MazeSpec) -> MazeConfig {
        let mut config = MazeConfig::new(spec);
        config.obstacles = self.obstacles;
        config.wall_offset = self.wall_offset;
        config.wall_mix = self.wall_mix;
        config.obstacle_mix = self.obstacle_mix;
        config
    }
}

/// Dimensions of a box arena.
#[derive(Args)]
struct BoxArgs {
    /// Extent of the box along the x axis.
    #[arg(long, default_value_t = 300.0)]
    length: f32,
    /// Extent of the box along the y axis.
    #[arg(long, default_value_t = 200.0)]
    width: f32,
    /// Height of the four surrounding walls.
    #[arg(long, default_value_t = 100.0)]
    height: f32,
    #[command(flatten)]
    options: MazeOptions,
}

/// Dimensions of a star maze.
#[derive(Args)]
struct StarArgs {
    /// Number of corridors radiating outward.
    #[arg(long, default_value_t = 5)]
    arms: u32,
    /// Width of each corridor.
    #[arg(long, default_value_t = 40.0)]
    arm_width: f32,
    /// Length of each corridor measured from the inner polygon.
    #[arg(long, default_value_t = 120.0)]
    arm_length: f32,
    /// Height of every corridor wall.
    #[arg(long, default_value_t = 60.0)]
    arm_height: f32,
    #[command(flatten)]
    options: MazeOptions,
}

/// Dimensions of a T maze.
#[derive(Args)]
struct TMazeArgs {
    /// Length of the vertical stem.
    #[arg(long, default_value_t = 160.0)]
    vertical_length: f32,
    /// Width of the vertical stem.
    #[arg(long, default_value_t = 40.0)]
    vertical_width: f32,
    /// Length of the horizontal bar.
    #[arg(long, default_value_t = 160.0)]
    horizontal_length: f32,
    /// Width of the horizontal bar.
    #[arg(long, default_value_t = 40.0)]
    horizontal_width: f32,
    /// Height shared by all walls.
    #[arg(long, default_value_t = 60.0)]
    wall_height: f32,
    #[command(flatten)]
    options: MazeOptions,
}

/// Dimensions of a circular arena.
#[derive(Args)]
struct CircleArgs {
    /// Radius of the circle the chords inscribe.
    #[arg(long, default_value_t = 100.0)]
    radius: f32,
    /// Number of chord segments forming the perimeter.
    #[arg(long, default_value_t = 36)]
    segments: u32,
    /// Height of every chord wall.
    #[arg(long, default_value_t = 60.0)]
    wall_height: f32,
    #[command(flatten)]
    options: MazeOptions,
}

/// Source of a custom maze description.
#[derive(Args)]
struct FileArgs {
    /// Location of the maze description file.
    path: PathBuf,
    #[command(flatten)]
    options: MazeOptions,
}

/// Previously captured experiment to reproduce.
#[derive(Args)]
struct ReplayArgs {
    /// Transfer string produced by `--print-transfer`.
    transfer: String,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let snapshot = build_snapshot(cli.maze, &cli.run)?;

    if cli.run.print_transfer {
        println!("{}", snapshot.encode());
        return Ok(());
    }

    let world = World::build(&snapshot.config).context("could not build the maze world")?;

    let mut rat = match &cli.run.route {
        Some(route) => RatBot::follower(&world, snapshot.tuning, route, snapshot.seed)
            .context("could not load the waypoint route")?,
        None => {
            let start = match cli.run.start {
                Some(point) => point,
                None => {
                    let mut rng = ChaCha8Rng::seed_from_u64(snapshot.seed);
                    world
                        .random_position(&mut rng)
                        .context("could not place the rat")?
                }
            };
            RatBot::explorer(&world, snapshot.tuning, start, snapshot.seed)
        }
    };

    for _ in 0..snapshot.steps {
        let _ = rat.next_step();
    }

    let limits = query::limits(&world);
    println!(
        "maze: {} walls, bounds ({:.1}, {:.1}) to ({:.1}, {:.1})",
        query::walls(&world).len(),
        limits.min().x,
        limits.min().y,
        limits.max().x,
        limits.max().y,
    );
    let end = rat.position();
    println!(
        "rat: {} steps, finished at ({:.3}, {:.3})",
        snapshot.steps, end.x, end.y,
    );

    if let Some(output) = &cli.run.output {
        let mut lines = String::new();
        for point in rat.path() {
            lines.push_str(&format!("{} {}\n", point.x, point.y));
        }
        std::fs::write(output, lines)
            .with_context(|| format!("could not write trajectory to {}", output.display()))?;
        println!(
            "trajectory: {} positions written to {}",
            rat.path().len(),
            output.display(),
        );
    }

    Ok(())
}

fn build_snapshot(maze: MazeCommand, run: &RunArgs) -> anyhow::Result<ExperimentSnapshot> {
    let config = match maze {
        MazeCommand::Replay(args) => {
            return ExperimentSnapshot::decode(&args.transfer)
                .context("invalid experiment transfer string");
        }
        MazeCommand::Box(args) => args.options.into_config(MazeSpec::Box {
            length: args.length,
            width: args.width,
            height: args.height,
        }),
        MazeCommand::Star(args) => args.options.into_config(MazeSpec::Star {
            arms: args.arms,
            arm_width: args.arm_width,
            arm_length: args.arm_length,
            arm_height: args.arm_height,
        }),
        MazeCommand::TMaze(args) => args.options.into_config(MazeSpec::TMaze {
            vertical_length: args.vertical_length,
            vertical_width: args.vertical_width,
            horizontal_length: args.horizontal_length,
            horizontal_width: args.horizontal_width,
            wall_height: args.wall_height,
        }),
        MazeCommand::Circle(args) => args.options.into_config(MazeSpec::Circle {
            radius: args.radius,
            segments: args.segments,
            wall_height: args.wall_height,
        }),
        MazeCommand::File(args) => args
            .options
            .into_config(MazeSpec::FromFile { path: args.path }),
    };

    Ok(ExperimentSnapshot {
        steps: run.steps,
        seed: run.seed,
        config,
        tuning: run.tuning.to_tuning(),
    })
}

fn parse_point(value: &str) -> Result<Vec2, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got '{value}'"))?;
    let x = x.trim().parse::<f32>().map_err(|error| error.to_string())?;
    let y = y.trim().parse::<f32>().map_err(|error| error.to_string())?;
    Ok(Vec2::new(x, y))
}

fn parse_obstacle(value: &str) -> Result<Obstacle, String> {
    let fields: Vec<&str> = value.split(',').map(str::trim).collect();
    let &[x1, y1, x2, y2] = fields.as_slice() else {
        return Err(format!("expected `x1,y1,x2,y2`, got '{value}'"));
    };
    let parse = |field: &str| field.parse::<f32>().map_err(|error| error.to_string());
    Ok(Obstacle::from_corners(
        Vec2::new(parse(x1)?, parse(y1)?),
        Vec2::new(parse(x2)?, parse(y2)?),
    ))
}
