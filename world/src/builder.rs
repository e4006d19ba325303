//! Wall-set construction for the five maze archetypes and obstacles.
//!
//! Geometry conventions: walls are wound so that the derived `(dy, -dx)`
//! normal points into the walkable region. Obstacle quads are wound the
//! opposite way, so their normals face the surrounding walkable area.

use std::{collections::BTreeMap, fs, path::Path};

use glam::Vec2;
use rat_maze_core::{
    MazeConfig, MazeSpec, Obstacle, TextureId, DEFAULT_CUSTOM_WALL_HEIGHT,
};

use crate::{Wall, WorldBuildError};

/// Built-in wall texture palette cycled through when `wall_mix` is set.
const WALL_TEXTURES: [TextureId; 4] = [
    TextureId::new(1),
    TextureId::new(2),
    TextureId::new(3),
    TextureId::new(4),
];

/// Built-in crate texture palette cycled through when `obstacle_mix` is set.
const CRATE_TEXTURES: [TextureId; 4] = [
    TextureId::new(5),
    TextureId::new(6),
    TextureId::new(7),
    TextureId::new(8),
];

/// First handle handed out to textures named by a custom maze file.
const FIRST_CUSTOM_TEXTURE: u32 = 16;

/// Intermediate output of construction, before limits are derived.
#[derive(Debug)]
pub(crate) struct Blueprint {
    pub(crate) walls: Vec<Wall>,
    pub(crate) floor_texture: Option<TextureId>,
    pub(crate) texture_names: BTreeMap<String, TextureId>,
}

pub(crate) fn construct(config: &MazeConfig) -> Result<Blueprint, WorldBuildError> {
    let mut blueprint = Blueprint {
        walls: Vec::new(),
        floor_texture: None,
        texture_names: BTreeMap::new(),
    };

    match &config.spec {
        MazeSpec::Box {
            length,
            width,
            height,
        } => build_box(&mut blueprint, config, *length, *width, *height)?,
        MazeSpec::Star {
            arms,
            arm_width,
            arm_length,
            arm_height,
        } => build_star(
            &mut blueprint,
            config,
            *arms,
            *arm_width,
            *arm_length,
            *arm_height,
        )?,
        MazeSpec::TMaze {
            vertical_length,
            vertical_width,
            horizontal_length,
            horizontal_width,
            wall_height,
        } => build_t_maze(
            &mut blueprint,
            config,
            *vertical_length,
            *vertical_width,
            *horizontal_length,
            *horizontal_width,
            *wall_height,
        )?,
        MazeSpec::Circle {
            radius,
            segments,
            wall_height,
        } => build_circle(&mut blueprint, config, *radius, *segments, *wall_height)?,
        MazeSpec::FromFile { path } => build_from_file(&mut blueprint, config, path)?,
    }

    for (index, obstacle) in config.obstacles.iter().enumerate() {
        add_obstacle_walls(&mut blueprint, config, obstacle, index)?;
    }

    Ok(blueprint)
}

fn wall_texture(config: &MazeConfig, index: usize) -> TextureId {
    if config.wall_mix {
        WALL_TEXTURES[index % WALL_TEXTURES.len()]
    } else {
        WALL_TEXTURES[0]
    }
}

fn build_box(
    blueprint: &mut Blueprint,
    config: &MazeConfig,
    length: f32,
    width: f32,
    height: f32,
) -> Result<(), WorldBuildError> {
    let corners = [
        Vec2::new(0.0, 0.0),
        Vec2::new(0.0, width),
        Vec2::new(length, width),
        Vec2::new(length, 0.0),
    ];
    for (index, corner) in corners.iter().enumerate() {
        let next = corners[(index + 1) % corners.len()];
        blueprint.walls.push(Wall::new(
            *corner,
            next,
            height,
            wall_texture(config, index),
            config.wall_offset,
        )?);
    }
    Ok(())
}

fn build_star(
    blueprint: &mut Blueprint,
    config: &MazeConfig,
    arms: u32,
    arm_width: f32,
    arm_length: f32,
    arm_height: f32,
) -> Result<(), WorldBuildError> {
    let step = 360.0 / arms as f32;
    let inner_radius = arm_width / (2.0 * (std::f32::consts::PI / arms as f32).sin());

    // Corridors start at the bottom of the world and proceed clockwise.
    let mut arm_direction = 270.0_f32;
    for arm in 0..arms {
        let low = (arm_direction - 0.5 * step).to_radians();
        let high = (arm_direction + 0.5 * step).to_radians();
        let heading = arm_direction.to_radians();
        let outward = arm_length * Vec2::new(heading.cos(), heading.sin());

        let a = inner_radius * Vec2::new(low.cos(), low.sin());
        let b = a + outward;
        let c = inner_radius * Vec2::new(high.cos(), high.sin());
        let d = c + outward;

        // Two corridor sides and the end cap; one texture per complete arm.
        let texture = wall_texture(config, arm as usize);
        for (from, to) in [(c, d), (d, b), (b, a)] {
            blueprint.walls.push(Wall::new(
                from,
                to,
                arm_height,
                texture,
                config.wall_offset,
            )?);
        }

        arm_direction += step;
        if arm_direction >= 360.0 {
            arm_direction -= 360.0;
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn build_t_maze(
    blueprint: &mut Blueprint,
    config: &MazeConfig,
    vertical_length: f32,
    vertical_width: f32,
    horizontal_length: f32,
    horizontal_width: f32,
    wall_height: f32,
) -> Result<(), WorldBuildError> {
    // The stem straddles the y axis; the bar caps it.
    let a = Vec2::new(-vertical_width / 2.0, 0.0);
    let b = Vec2::new(-vertical_width / 2.0, vertical_length);
    let c = Vec2::new(-horizontal_length / 2.0, vertical_length);
    let d = Vec2::new(-horizontal_length / 2.0, vertical_length + horizontal_width);
    let e = Vec2::new(horizontal_length / 2.0, vertical_length + horizontal_width);
    let f = Vec2::new(horizontal_length / 2.0, vertical_length);
    let g = Vec2::new(vertical_width / 2.0, vertical_length);
    let h = Vec2::new(vertical_width / 2.0, 0.0);

    let outline = [a, b, c, d, e, f, g, h];
    for (index, corner) in outline.iter().enumerate() {
        let next = outline[(index + 1) % outline.len()];
        blueprint.walls.push(Wall::new(
            *corner,
            next,
            wall_height,
            wall_texture(config, index),
            config.wall_offset,
        )?);
    }
    Ok(())
}

fn build_circle(
    blueprint: &mut Blueprint,
    config: &MazeConfig,
    radius: f32,
    segments: u32,
    wall_height: f32,
) -> Result<(), WorldBuildError> {
    let step = 360.0 / segments as f32;
    let mut angle = 0.0_f32;
    for segment in 0..segments {
        let a = radius * direction(angle);
        let b = radius * direction(angle + step);
        // Wound from b to a so the chord normal faces the circle center.
        // With mixing enabled, textures change per sector rather than per
        // chord, grouping neighbouring segments.
        let texture = if config.wall_mix {
            let sector = (segment as usize * WALL_TEXTURES.len()) / segments as usize;
            WALL_TEXTURES[sector.min(WALL_TEXTURES.len() - 1)]
        } else {
            WALL_TEXTURES[0]
        };
        blueprint
            .walls
            .push(Wall::new(b, a, wall_height, texture, config.wall_offset)?);
        angle += step;
    }
    Ok(())
}

fn direction(degrees: f32) -> Vec2 {
    let radians = degrees.to_radians();
    Vec2::new(radians.cos(), radians.sin())
}

fn build_from_file(
    blueprint: &mut Blueprint,
    config: &MazeConfig,
    path: &Path,
) -> Result<(), WorldBuildError> {
    let text = fs::read_to_string(path).map_err(|source| WorldBuildError::MazeFile {
        path: path.to_path_buf(),
        source,
    })?;

    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        // A blank line terminates parsing; anything after it is comment
        // space.
        if trimmed.is_empty() {
            break;
        }

        let malformed = || WorldBuildError::MalformedMazeLine {
            path: path.to_path_buf(),
            line: index + 1,
            content: line.to_owned(),
        };

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        match fields.as_slice() {
            ["floor", name] => {
                blueprint.floor_texture = Some(intern_texture(blueprint, name));
            }
            [from_x, from_y, to_x, to_y, texture_name] => {
                let mut parsed = [0.0_f32; 4];
                for (slot, field) in parsed.iter_mut().zip([from_x, from_y, to_x, to_y]) {
                    *slot = field.parse().map_err(|_| malformed())?;
                }
                let texture = intern_texture(blueprint, texture_name);
                blueprint.walls.push(Wall::new(
                    Vec2::new(parsed[0], parsed[1]),
                    Vec2::new(parsed[2], parsed[3]),
                    DEFAULT_CUSTOM_WALL_HEIGHT,
                    texture,
                    config.wall_offset,
                )?);
            }
            _ => return Err(malformed()),
        }
    }

    if blueprint.walls.is_empty() {
        return Err(WorldBuildError::EmptyMazeFile {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

fn intern_texture(blueprint: &mut Blueprint, name: &str) -> TextureId {
    if let Some(existing) = blueprint.texture_names.get(name) {
        return *existing;
    }
    let id = TextureId::new(FIRST_CUSTOM_TEXTURE + blueprint.texture_names.len() as u32);
    let _ = blueprint.texture_names.insert(name.to_owned(), id);
    id
}

fn add_obstacle_walls(
    blueprint: &mut Blueprint,
    config: &MazeConfig,
    obstacle: &Obstacle,
    index: usize,
) -> Result<(), WorldBuildError> {
    let ll = obstacle.lower_left();
    let ur = obstacle.upper_right();
    let texture = if config.obstacle_mix {
        CRATE_TEXTURES[index % CRATE_TEXTURES.len()]
    } else {
        CRATE_TEXTURES[0]
    };

    // Independent closed quad, wound so each normal faces away from the
    // obstacle interior.
    let sides = [
        (Vec2::new(ll.x, ur.y), Vec2::new(ll.x, ll.y)),
        (Vec2::new(ur.x, ur.y), Vec2::new(ll.x, ur.y)),
        (Vec2::new(ur.x, ll.y), Vec2::new(ur.x, ur.y)),
        (Vec2::new(ll.x, ll.y), Vec2::new(ur.x, ll.y)),
    ];
    for (from, to) in sides {
        blueprint.walls.push(Wall::new(
            from,
            to,
            config.obstacle_height,
            texture,
            config.wall_offset,
        )?);
    }
    Ok(())
}
