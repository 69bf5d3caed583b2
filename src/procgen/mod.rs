//! Procedural generation of the town.
//!
//! - Grid road network (petgraph)
//! - Block layout: buildings, parks, parking spots

use bevy::prelude::*;

pub mod roads;
pub mod town_plan;

use roads::RoadGraph;
use town_plan::{parking_shortfall, plan_town, road_lines};

use crate::world::TownConfig;

pub struct ProcgenPlugin;

impl Plugin for ProcgenPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, generate_town);
    }
}

/// Build the road network and town plan once at startup.
///
/// The road graph only feeds planning; scenery spawns from the plan.
fn generate_town(mut commands: Commands, config: Res<TownConfig>) {
    info!("Generating town...");

    let (xs, zs) = road_lines(&config);
    let roads = RoadGraph::from_grid(&xs, &zs);
    let plan = plan_town(&config, &roads);

    info!(
        "Town generated: {} intersections, {} road segments, {} buildings, {} parks, {} parking spots",
        roads.node_count(),
        roads.edge_count(),
        plan.buildings.len(),
        plan.parks.len(),
        plan.parking.len()
    );

    if let Some(missing) = parking_shortfall(&config, &plan) {
        warn!(
            "Only {} of {} vehicles fit on the road network ({} not placed)",
            plan.parking.len(),
            config.vehicle_count,
            missing
        );
    }

    commands.insert_resource(plan);
}
