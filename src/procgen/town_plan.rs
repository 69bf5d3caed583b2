//! Town layout planning.
//!
//! Turns a [`TownConfig`] into plain geometry: road strips, lane dashes,
//! building boxes, grass parks and parking spots. Planning is pure and
//! deterministic for a given seed; spawning meshes happens in `render`.

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;
use noise::{NoiseFn, Perlin};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::procgen::roads::{RoadAxis, RoadGraph};
use crate::world::TownConfig;

/// A straight road surface. Positions are (x, z) on the ground plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoadStrip {
    pub center: Vec2,
    /// Extent along the direction of travel.
    pub length: f32,
    /// Extent across the road.
    pub width: f32,
    pub axis: RoadAxis,
}

impl RoadStrip {
    /// Ground size as (x, z).
    pub fn size(&self) -> Vec2 {
        match self.axis {
            RoadAxis::EastWest => Vec2::new(self.length, self.width),
            RoadAxis::NorthSouth => Vec2::new(self.width, self.length),
        }
    }
}

/// One lane-marking dash along a road centreline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dash {
    pub start: Vec2,
    pub end: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildingLot {
    pub center: Vec2,
    pub footprint: Vec2,
    pub height: f32,
    /// Index into the building colour palette.
    pub tint: usize,
}

/// A block left as grass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Park {
    pub center: Vec2,
    pub size: Vec2,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParkingSpot {
    pub position: Vec2,
    /// Rotation about +Y; 0 faces -Z.
    pub heading: f32,
}

/// Static scenery and spawn points for one town.
#[derive(Resource, Clone, Debug, PartialEq, Default)]
pub struct TownPlan {
    pub extent: Vec2,
    pub roads: Vec<RoadStrip>,
    pub dashes: Vec<Dash>,
    pub buildings: Vec<BuildingLot>,
    pub parks: Vec<Park>,
    pub parking: Vec<ParkingSpot>,
    pub player_spawn: Vec2,
}

/// Number of distinct building tints the planner picks from.
pub const BUILDING_TINTS: usize = 6;

/// Centreline coordinates of the north-south (xs) and east-west (zs) roads.
pub fn road_lines(config: &TownConfig) -> (Vec<f32>, Vec<f32>) {
    let half = config.extent() / 2.0;
    let line = |count: u32, half: f32| -> Vec<f32> {
        (0..=count)
            .map(|i| -half + config.road_width / 2.0 + i as f32 * config.pitch())
            .collect()
    };
    (line(config.blocks_x, half.x), line(config.blocks_z, half.y))
}

/// Lay out the town on top of an already built road network.
pub fn plan_town(config: &TownConfig, roads: &RoadGraph) -> TownPlan {
    let extent = config.extent();
    let (xs, zs) = road_lines(config);
    let mut plan = TownPlan {
        extent,
        ..default()
    };

    for &x in &xs {
        plan.roads.push(RoadStrip {
            center: Vec2::new(x, 0.0),
            length: extent.y,
            width: config.road_width,
            axis: RoadAxis::NorthSouth,
        });
    }
    for &z in &zs {
        plan.roads.push(RoadStrip {
            center: Vec2::new(0.0, z),
            length: extent.x,
            width: config.road_width,
            axis: RoadAxis::EastWest,
        });
    }

    // Dashes stop at the intersection boundary.
    for edge in roads.edges() {
        if let Some((start, end)) = edge.trimmed(config.road_width / 2.0) {
            add_dashes(&mut plan.dashes, start, end, config.dash_length, config.dash_gap);
        }
    }

    let perlin = Perlin::new(config.seed as u32);
    let mut rng = StdRng::seed_from_u64(config.seed);
    let lot_size = config.block_size / config.lots_per_side.max(1) as f32;
    let footprint = Vec2::splat((lot_size - config.lot_setback * 2.0).max(1.0));
    let (low, high) = config.building_height_range();

    for bz in 0..config.blocks_z as usize {
        for bx in 0..config.blocks_x as usize {
            let min = Vec2::new(xs[bx], zs[bz]) + config.road_width / 2.0;
            let center = min + config.block_size / 2.0;

            let park_value = perlin.get([bx as f64 * 0.61 + 0.37, bz as f64 * 0.61 + 0.37]);
            if park_value > config.park_threshold {
                plan.parks.push(Park {
                    center,
                    size: Vec2::splat(config.block_size),
                });
                continue;
            }

            for lz in 0..config.lots_per_side {
                for lx in 0..config.lots_per_side {
                    let lot_center =
                        min + Vec2::new(lx as f32 + 0.5, lz as f32 + 0.5) * lot_size;
                    plan.buildings.push(BuildingLot {
                        center: lot_center,
                        footprint,
                        height: rng.gen_range(low..=high),
                        tint: rng.gen_range(0..BUILDING_TINTS),
                    });
                }
            }
        }
    }

    // Park facing west in the right-hand lane of east-west roads, mid-block.
    plan.parking = roads
        .edges()
        .filter(|edge| edge.axis == RoadAxis::EastWest)
        .filter_map(|edge| {
            let (&a, &b) = (edge.points.first()?, edge.points.last()?);
            Some(ParkingSpot {
                position: a.lerp(b, 0.5) - Vec2::new(0.0, config.road_width / 4.0),
                heading: FRAC_PI_2,
            })
        })
        .take(config.vehicle_count)
        .collect();

    plan.player_spawn = plan
        .parking
        .first()
        .map(|spot| spot.position + config.player_spawn_offset)
        .unwrap_or(Vec2::ZERO);

    plan
}

/// How many requested vehicles did not fit on the road network.
pub fn parking_shortfall(config: &TownConfig, plan: &TownPlan) -> Option<usize> {
    config
        .vehicle_count
        .checked_sub(plan.parking.len())
        .filter(|&missing| missing > 0)
}

/// Dashed line along a straight centreline.
fn add_dashes(out: &mut Vec<Dash>, start: Vec2, end: Vec2, dash_length: f32, gap_length: f32) {
    let total = start.distance(end);
    let dir = (end - start).normalize_or_zero();
    let cycle_length = dash_length + gap_length;
    if cycle_length <= 0.0 {
        return;
    }

    let mut current = 0.0;
    while current < total {
        let dash_end = (current + dash_length).min(total);
        if dash_end - current > 0.5 {
            out.push(Dash {
                start: start + dir * current,
                end: start + dir * dash_end,
            });
        }
        current += cycle_length;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::TownPreset;

    fn build(preset: TownPreset) -> (TownConfig, TownPlan) {
        let config = TownConfig::preset(preset);
        let (xs, zs) = road_lines(&config);
        let roads = RoadGraph::from_grid(&xs, &zs);
        let plan = plan_town(&config, &roads);
        (config, plan)
    }

    #[test]
    fn planning_is_deterministic() {
        let (_, a) = build(TownPreset::City);
        let (_, b) = build(TownPreset::City);
        assert_eq!(a, b);
    }

    #[test]
    fn road_lines_are_centred_on_origin() {
        let config = TownConfig::preset(TownPreset::Village);
        let (xs, zs) = road_lines(&config);
        assert_eq!(xs.len(), 4);
        assert_eq!(zs.len(), 4);
        assert!((xs[0] + xs[3]).abs() < 1e-4);
        assert!((zs[1] + zs[2]).abs() < 1e-4);
    }

    #[test]
    fn every_block_is_a_park_or_has_buildings() {
        let (config, plan) = build(TownPreset::City);
        let lots = (config.lots_per_side * config.lots_per_side) as usize;
        let blocks = (config.blocks_x * config.blocks_z) as usize;
        assert_eq!(plan.parks.len() + plan.buildings.len() / lots, blocks);
        assert_eq!(plan.buildings.len() % lots, 0);
    }

    #[test]
    fn buildings_stay_off_the_roads() {
        let (config, plan) = build(TownPreset::Village);
        let (xs, zs) = road_lines(&config);
        for building in &plan.buildings {
            let half = building.footprint / 2.0;
            for &x in &xs {
                assert!((building.center.x - x).abs() + 1e-3 >= config.road_width / 2.0 + half.x);
            }
            for &z in &zs {
                assert!((building.center.y - z).abs() + 1e-3 >= config.road_width / 2.0 + half.y);
            }
            assert!(building.height >= config.min_building_height);
            assert!(building.height <= config.max_building_height);
        }
    }

    #[test]
    fn dashes_skip_intersections() {
        let (config, plan) = build(TownPreset::Village);
        let (xs, zs) = road_lines(&config);
        let half_road = config.road_width / 2.0;
        assert!(!plan.dashes.is_empty());
        for dash in &plan.dashes {
            for point in [dash.start, dash.end, dash.start.lerp(dash.end, 0.5)] {
                let inside = xs.iter().any(|&x| (point.x - x).abs() < half_road - 1e-3)
                    && zs.iter().any(|&z| (point.y - z).abs() < half_road - 1e-3);
                assert!(!inside, "dash point {point:?} inside an intersection");
            }
        }
    }

    #[test]
    fn parking_fills_requested_vehicle_count() {
        let (config, plan) = build(TownPreset::City);
        assert_eq!(plan.parking.len(), config.vehicle_count);
    }

    #[test]
    fn player_spawns_within_reach_of_first_car() {
        let (_, plan) = build(TownPreset::Village);
        let first = plan.parking[0].position;
        assert!(plan.player_spawn.distance(first) < 3.0);
    }

    #[test]
    fn road_strips_are_oriented_by_axis() {
        let (config, plan) = build(TownPreset::Village);
        let extent = config.extent();
        for road in &plan.roads {
            let expected = match road.axis {
                RoadAxis::EastWest => Vec2::new(extent.x, config.road_width),
                RoadAxis::NorthSouth => Vec2::new(config.road_width, extent.y),
            };
            assert_eq!(road.size(), expected);
        }
    }

    #[test]
    fn swapped_height_bounds_do_not_panic() {
        let mut config = TownConfig::preset(TownPreset::Village);
        config.min_building_height = 12.0;
        config.max_building_height = 4.0;
        let (xs, zs) = road_lines(&config);
        let plan = plan_town(&config, &RoadGraph::from_grid(&xs, &zs));
        for building in &plan.buildings {
            assert!((4.0..=12.0).contains(&building.height));
        }
    }

    #[test]
    fn shortfall_reports_cars_that_did_not_fit() {
        let mut config = TownConfig::preset(TownPreset::Village);
        // 4 east-west roads of 3 segments each.
        config.vehicle_count = 20;
        let (xs, zs) = road_lines(&config);
        let plan = plan_town(&config, &RoadGraph::from_grid(&xs, &zs));
        assert_eq!(plan.parking.len(), 12);
        assert_eq!(parking_shortfall(&config, &plan), Some(8));
    }

    #[test]
    fn no_shortfall_when_every_car_fits() {
        let (config, plan) = build(TownPreset::City);
        assert_eq!(parking_shortfall(&config, &plan), None);
    }

    #[test]
    fn dashed_line_respects_cycle() {
        let mut dashes = Vec::new();
        add_dashes(&mut dashes, Vec2::ZERO, Vec2::new(10.0, 0.0), 2.0, 2.0);
        // Dashes at 0, 4 and 8.
        assert_eq!(dashes.len(), 3);
        assert_eq!(dashes[1].start, Vec2::new(4.0, 0.0));
        assert_eq!(dashes[2].end, Vec2::new(10.0, 0.0));
    }
}
