//! CPU-side mesh representation used by loaders and generators.

use std::collections::HashSet;

/// Vertex with position/normal/uv. Values are in object space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl MeshVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// Indexed triangle mesh with tightly-packed vertices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Returns `true` if both vertex and index buffers are non-empty.
    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty() && !self.indices.is_empty()
    }

    /// Unique triangle edges as a line list, for wireframe drawing.
    pub fn edge_indices(&self) -> Vec<u32> {
        let mut seen: HashSet<(u32, u32)> = HashSet::new();
        let mut lines = Vec::new();
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let key = if a < b { (a, b) } else { (b, a) };
                if seen.insert(key) {
                    lines.push(key.0);
                    lines.push(key.1);
                }
            }
        }
        lines
    }

    /// Axis-aligned bounds `(min, max)`.
    pub fn bounds(&self) -> ([f32; 3], [f32; 3]) {
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        for v in &self.vertices {
            for i in 0..3 {
                min[i] = min[i].min(v.position[i]);
                max[i] = max[i].max(v.position[i]);
            }
        }
        (min, max)
    }

    /// Centre on the origin and scale so the largest extent equals `extent`.
    pub fn fit_to_extent(&mut self, extent: f32) {
        if self.vertices.is_empty() {
            return;
        }
        let (min, max) = self.bounds();
        let center = [0, 1, 2].map(|i| (min[i] + max[i]) * 0.5);
        let size = (0..3).map(|i| max[i] - min[i]).fold(0.0_f32, f32::max);
        let factor = if size > 0.0 { extent / size } else { 1.0 };
        for v in &mut self.vertices {
            for i in 0..3 {
                v.position[i] = (v.position[i] - center[i]) * factor;
            }
        }
    }

    /// Smooth vertex normals from area-weighted face normals.
    pub fn recompute_normals(&mut self) {
        let mut accum = vec![[0.0_f32; 3]; self.vertices.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| self.vertices[i as usize].position);
            let e1 = sub(b, a);
            let e2 = sub(c, a);
            let n = cross(e1, e2);
            for &i in tri {
                let acc = &mut accum[i as usize];
                for k in 0..3 {
                    acc[k] += n[k];
                }
            }
        }
        for (v, n) in self.vertices.iter_mut().zip(accum) {
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            v.normal = if len > 0.0 {
                [n[0] / len, n[1] / len, n[2] / len]
            } else {
                [0.0, 1.0, 0.0]
            };
        }
    }
}

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}
