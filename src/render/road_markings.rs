//! Lane markings - dashed centre lines.
//!
//! All dashes are batched into a single mesh.

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;

use crate::procgen::town_plan::{Dash, TownPlan};

pub struct RoadMarkingsPlugin;

impl Plugin for RoadMarkingsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MarkingsConfig>()
            .add_systems(PostStartup, generate_road_markings);
    }
}

/// Marker for road marking entities.
#[derive(Component)]
pub struct RoadMarking;

/// Configuration for road markings.
#[derive(Resource)]
pub struct MarkingsConfig {
    pub line_width: f32,
    pub marking_height: f32,
    pub color: Color,
}

impl Default for MarkingsConfig {
    fn default() -> Self {
        Self {
            line_width: 0.25,
            marking_height: 0.02, // Slightly above road
            color: Color::srgb(0.95, 0.95, 0.95),
        }
    }
}

/// Batched mesh builder for road markings.
#[derive(Default)]
struct MarkingsMeshBuilder {
    vertices: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    indices: Vec<u32>,
}

impl MarkingsMeshBuilder {
    /// Add a dash quad to the batch.
    fn add_dash(&mut self, dash: &Dash, width: f32, height: f32) {
        let dir = (dash.end - dash.start).normalize_or_zero();
        let perp = Vec2::new(-dir.y, dir.x);
        let half_width = width / 2.0;

        let corners = [
            dash.start + perp * half_width,
            dash.start - perp * half_width,
            dash.end + perp * half_width,
            dash.end - perp * half_width,
        ];

        let base_index = self.vertices.len() as u32;

        for corner in corners {
            self.vertices.push([corner.x, height, corner.y]);
            // All normals point up
            self.normals.push([0.0, 1.0, 0.0]);
        }
        self.uvs
            .extend_from_slice(&[[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]]);

        // CCW winding seen from above
        self.indices.extend_from_slice(&[
            base_index,
            base_index + 2,
            base_index + 1,
            base_index + 2,
            base_index + 3,
            base_index + 1,
        ]);
    }

    fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// Build the final mesh (returns None if empty).
    fn build(self) -> Option<Mesh> {
        if self.vertices.is_empty() {
            return None;
        }

        Some(
            Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::RENDER_WORLD)
                .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, self.vertices)
                .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals)
                .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, self.uvs)
                .with_inserted_indices(Indices::U32(self.indices)),
        )
    }
}

fn generate_road_markings(
    mut commands: Commands,
    plan: Res<TownPlan>,
    config: Res<MarkingsConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    info!("Generating road markings...");

    let mut dashes = MarkingsMeshBuilder::default();
    for dash in &plan.dashes {
        dashes.add_dash(dash, config.line_width, config.marking_height);
    }
    let count = dashes.quad_count();

    let Some(mesh) = dashes.build() else {
        info!("No road markings to generate");
        return;
    };

    commands.spawn((
        Mesh3d(meshes.add(mesh)),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: config.color,
            perceptual_roughness: 0.7,
            ..default()
        })),
        Transform::IDENTITY,
        RoadMarking,
    ));

    info!("Road markings generated: {} dashes (1 batched mesh)", count);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dash_quad_faces_up() {
        let mut builder = MarkingsMeshBuilder::default();
        let dash = Dash {
            start: Vec2::new(0.0, 0.0),
            end: Vec2::new(2.0, 0.0),
        };
        builder.add_dash(&dash, 0.2, 0.02);
        assert_eq!(builder.quad_count(), 1);

        let v = |i: u32| Vec3::from_array(builder.vertices[builder.indices[i as usize] as usize]);
        let normal = (v(1) - v(0)).cross(v(2) - v(0));
        assert!(normal.y > 0.0);
        assert!(builder.vertices.iter().all(|p| p[1] == 0.02));
    }

    #[test]
    fn empty_builder_yields_no_mesh() {
        assert!(MarkingsMeshBuilder::default().build().is_none());
    }
}
