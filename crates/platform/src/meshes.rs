//! Meshes for the scene's geometry handles.

use std::path::Path;

use asset::mesh::MeshData;
use asset::{obj, primitives};
use renderer::mesh::SceneMeshes;

/// Largest extent of the loaded bunny before the scene's 20x scale.
pub const BUNNY_EXTENT: f32 = 0.1;

pub fn scene_meshes(bunny: Option<&Path>) -> SceneMeshes {
    SceneMeshes {
        cube: primitives::cube(),
        cylinder: primitives::cylinder(32),
        torus: primitives::torus(0.4, 0.1, 48, 16),
        bunny: bunny_mesh(bunny),
    }
}

/// The bunny OBJ fitted to [`BUNNY_EXTENT`], or a sphere stand-in.
pub fn bunny_mesh(path: Option<&Path>) -> MeshData {
    let loaded = path.map(|p| (p, obj::load_obj_from_path(p)));
    let mut mesh = match loaded {
        Some((_, Ok(mesh))) => mesh,
        Some((p, Err(err))) => {
            log::warn!("Bunny OBJ {} unusable ({err:#}); drawing a sphere", p.display());
            primitives::sphere(24, 16)
        }
        None => {
            log::warn!("No --bunny=PATH given; drawing a sphere in its place");
            primitives::sphere(24, 16)
        }
    };
    mesh.fit_to_extent(BUNNY_EXTENT);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::program::Geometry;

    #[test]
    fn missing_bunny_falls_back_to_a_sphere() {
        let mesh = bunny_mesh(Some(Path::new("/nonexistent/bunny.obj")));
        assert!(mesh.is_valid());
        let (min, max) = mesh.bounds();
        assert!((max[1] - min[1] - BUNNY_EXTENT).abs() < 1e-5);
    }

    #[test]
    fn every_geometry_has_a_mesh() {
        let meshes = scene_meshes(None);
        for geometry in Geometry::ALL {
            assert!(meshes.get(geometry).is_valid());
        }
    }
}
