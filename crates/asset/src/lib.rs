//! CPU-side meshes: OBJ loading and procedural primitives.

pub mod mesh;
pub mod obj;
pub mod primitives;
