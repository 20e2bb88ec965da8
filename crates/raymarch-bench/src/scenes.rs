use std::sync::Arc;

use glam::{IVec3, UVec3};
use rand::Rng;
use raymarch_core::Voxel;
use raymarch_world::shapes::{column, ellipsoid, random_sponge, solid};
use raymarch_world::{Command, Placement, SceneMap, ShapeError};

/// Number of translucent columns scattered over the floor.
pub const COLUMN_COUNT: usize = 100;

/// Columns snap to a grid of this pitch.
pub const COLUMN_GRID: i32 = 16;

/// Grid cells per axis the columns are scattered over.
pub const COLUMN_GRID_CELLS: f64 = 32.0;

/// Configuration for a single benchmark scene.
pub struct SceneConfig {
    pub name: &'static str,
    /// Commands held down for the whole run.
    pub held: &'static [Command],
}

/// The standard suite: a static view plus scrolling along one and two axes.
pub fn standard_scenes() -> Vec<SceneConfig> {
    vec![
        SceneConfig {
            name: "static",
            held: &[],
        },
        SceneConfig {
            name: "scroll-forward",
            held: &[Command::Up],
        },
        SceneConfig {
            name: "scroll-diagonal",
            held: &[Command::Up, Command::Right],
        },
    ]
}

/// Build the demo map: a grey floor under a patchy grass layer, a red
/// sphere, a field of translucent blue columns and a row of tinted glass
/// blocks.
pub fn demo_map(rng: &mut impl Rng) -> Result<SceneMap, ShapeError> {
    let mut map = SceneMap::new();

    let floor = solid(UVec3::new(512, 1, 512), Voxel::from_rgba(128, 128, 128, 255));
    map.push(Placement::new(IVec3::ZERO, floor));

    let grass = random_sponge(UVec3::new(512, 3, 512), 0.5, Voxel::from_rgba(0, 255, 0, 255), rng)?;
    map.push(Placement::new(IVec3::new(0, 1, 0), grass));

    let sphere = ellipsoid(UVec3::splat(16), Voxel::from_rgba(255, 0, 0, 255));
    map.push(Placement::new(IVec3::new(64, 8, 64), sphere));

    let column = Arc::new(column(UVec3::new(16, 30, 16), 0.3, Voxel::from_rgba(0, 0, 128, 32))?);
    for _ in 0..COLUMN_COUNT {
        let x = (rng.gen::<f64>() * COLUMN_GRID_CELLS).floor() as i32 * COLUMN_GRID;
        let z = (rng.gen::<f64>() * COLUMN_GRID_CELLS).floor() as i32 * COLUMN_GRID;
        map.push(Placement::new(IVec3::new(x, 1, z), Arc::clone(&column)));
    }

    let blocks = [
        (8, [255, 0, 0]),
        (12, [0, 255, 0]),
        (16, [0, 0, 255]),
        (20, [0, 0, 0]),
        (24, [128, 128, 128]),
        (28, [255, 255, 255]),
    ];
    for (slot, [r, g, b]) in blocks {
        let block = solid(UVec3::new(4, 8, 8), Voxel::from_rgba(r, g, b, 64));
        map.push(Placement::new(IVec3::new(slot * 2 + 80, 8, 64), block));
    }

    Ok(map)
}
