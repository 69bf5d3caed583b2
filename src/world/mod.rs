//! World configuration: which town layout gets generated.

use bevy::prelude::*;

pub struct WorldPlugin;

impl Plugin for WorldPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(TownConfig::from_env());
    }
}

/// Environment variable selecting the town preset (`village` or `city`).
pub const PRESET_ENV: &str = "TOWN_PRESET";

/// Named town layouts.
#[derive(Default, Clone, Copy, PartialEq, Eq, Debug)]
pub enum TownPreset {
    /// Small 3x3 grid of blocks.
    #[default]
    Village,
    /// Larger 6x6 city grid.
    City,
}

impl TownPreset {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "village" | "town" => Some(TownPreset::Village),
            "city" => Some(TownPreset::City),
            _ => None,
        }
    }
}

/// Parameters for the procedural town layout.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct TownConfig {
    pub preset: TownPreset,
    /// Number of blocks along X.
    pub blocks_x: u32,
    /// Number of blocks along Z.
    pub blocks_z: u32,
    /// Side length of a square block.
    pub block_size: f32,
    /// Full width of a road (two lanes).
    pub road_width: f32,
    /// Lots per block side; each block holds `lots_per_side^2` buildings.
    pub lots_per_side: u32,
    /// Gap between a building and its lot boundary.
    pub lot_setback: f32,
    pub min_building_height: f32,
    pub max_building_height: f32,
    /// Perlin value above which a block becomes a grass park.
    pub park_threshold: f64,
    pub dash_length: f32,
    pub dash_gap: f32,
    /// Parked vehicles placed along the roads.
    pub vehicle_count: usize,
    /// Where the player starts relative to the first parked vehicle.
    pub player_spawn_offset: Vec2,
    pub seed: u64,
}

impl TownConfig {
    pub fn preset(preset: TownPreset) -> Self {
        match preset {
            TownPreset::Village => Self {
                preset,
                blocks_x: 3,
                blocks_z: 3,
                block_size: 24.0,
                road_width: 8.0,
                lots_per_side: 2,
                lot_setback: 1.5,
                min_building_height: 3.0,
                max_building_height: 10.0,
                park_threshold: 0.25,
                dash_length: 2.0,
                dash_gap: 2.0,
                vehicle_count: 3,
                player_spawn_offset: Vec2::new(0.0, 2.0),
                seed: 7,
            },
            TownPreset::City => Self {
                preset,
                blocks_x: 6,
                blocks_z: 6,
                block_size: 30.0,
                road_width: 10.0,
                lots_per_side: 3,
                lot_setback: 1.0,
                min_building_height: 6.0,
                max_building_height: 40.0,
                park_threshold: 0.3,
                dash_length: 3.0,
                dash_gap: 2.0,
                vehicle_count: 8,
                player_spawn_offset: Vec2::new(0.0, 2.0),
                seed: 1337,
            },
        }
    }

    /// Reads [`PRESET_ENV`], falling back to the default preset.
    pub fn from_env() -> Self {
        let preset = match std::env::var(PRESET_ENV) {
            Ok(name) => TownPreset::from_name(&name).unwrap_or_else(|| {
                warn!("Unknown {} '{}', using {:?}", PRESET_ENV, name, TownPreset::default());
                TownPreset::default()
            }),
            Err(_) => TownPreset::default(),
        };
        info!("Town preset: {:?}", preset);
        Self::preset(preset)
    }

    /// Building height bounds, ordered low to high.
    pub fn building_height_range(&self) -> (f32, f32) {
        let (a, b) = (self.min_building_height, self.max_building_height);
        (a.min(b), a.max(b))
    }

    /// Distance between neighbouring road centrelines.
    pub fn pitch(&self) -> f32 {
        self.block_size + self.road_width
    }

    /// Ground size covered by roads and blocks, as (x, z).
    pub fn extent(&self) -> Vec2 {
        Vec2::new(
            self.blocks_x as f32 * self.pitch() + self.road_width,
            self.blocks_z as f32 * self.pitch() + self.road_width,
        )
    }
}

impl Default for TownConfig {
    fn default() -> Self {
        Self::preset(TownPreset::default())
    }
}
