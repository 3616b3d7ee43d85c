//! Procedural primitives centred on the origin, about one unit across.
//! Triangles wind counter-clockwise when seen from outside.

use std::f32::consts::{PI, TAU};

use crate::mesh::{MeshData, MeshVertex};

/// Axis-aligned cube with edge 1 and flat per-face normals.
pub fn cube() -> MeshData {
    // (normal, u, v) with u x v = normal.
    const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ];
    let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (n, u, v) in FACES {
        let base = vertices.len() as u32;
        for (su, sv) in corners {
            let position = [0, 1, 2].map(|k| 0.5 * (n[k] + su * u[k] + sv * v[k]));
            let uv = [(su + 1.0) * 0.5, (sv + 1.0) * 0.5];
            vertices.push(MeshVertex::new(position, n, uv));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    MeshData::new(vertices, indices)
}

/// Capped cylinder along Y: radius 0.5, height 1.
pub fn cylinder(segments: u32) -> MeshData {
    let segments = segments.max(3);
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    // Side: bottom/top pairs, seam duplicated for uv continuity.
    for seg in 0..=segments {
        let t = seg as f32 / segments as f32;
        let (s, c) = (TAU * t).sin_cos();
        let normal = [c, 0.0, s];
        vertices.push(MeshVertex::new([0.5 * c, -0.5, 0.5 * s], normal, [t, 0.0]));
        vertices.push(MeshVertex::new([0.5 * c, 0.5, 0.5 * s], normal, [t, 1.0]));
    }
    for seg in 0..segments {
        let b0 = 2 * seg;
        let t0 = b0 + 1;
        let b1 = b0 + 2;
        let t1 = b0 + 3;
        indices.extend_from_slice(&[b0, t0, b1, b1, t0, t1]);
    }

    for (y, up) in [(0.5_f32, true), (-0.5_f32, false)] {
        let normal = [0.0, if up { 1.0 } else { -1.0 }, 0.0];
        let center = vertices.len() as u32;
        vertices.push(MeshVertex::new([0.0, y, 0.0], normal, [0.5, 0.5]));
        for seg in 0..=segments {
            let (s, c) = (TAU * seg as f32 / segments as f32).sin_cos();
            let uv = [0.5 + 0.5 * c, 0.5 + 0.5 * s];
            vertices.push(MeshVertex::new([0.5 * c, y, 0.5 * s], normal, uv));
        }
        for seg in 0..segments {
            let r0 = center + 1 + seg;
            let r1 = r0 + 1;
            if up {
                indices.extend_from_slice(&[center, r1, r0]);
            } else {
                indices.extend_from_slice(&[center, r0, r1]);
            }
        }
    }

    MeshData::new(vertices, indices)
}

/// Torus lying in the XZ plane.
pub fn torus(major_radius: f32, minor_radius: f32, rings: u32, sides: u32) -> MeshData {
    let rings = rings.max(3);
    let sides = sides.max(3);
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for i in 0..=rings {
        let u = TAU * i as f32 / rings as f32;
        let (su, cu) = u.sin_cos();
        for j in 0..=sides {
            let v = TAU * j as f32 / sides as f32;
            let (sv, cv) = v.sin_cos();
            let normal = [cv * cu, sv, cv * su];
            let position = [
                major_radius * cu + minor_radius * normal[0],
                minor_radius * normal[1],
                major_radius * su + minor_radius * normal[2],
            ];
            let uv = [i as f32 / rings as f32, j as f32 / sides as f32];
            vertices.push(MeshVertex::new(position, normal, uv));
        }
    }

    let stride = sides + 1;
    for i in 0..rings {
        for j in 0..sides {
            let a = i * stride + j;
            let b = a + stride;
            indices.extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
        }
    }

    MeshData::new(vertices, indices)
}

/// UV sphere of radius 0.5.
pub fn sphere(segments: u32, rings: u32) -> MeshData {
    let segments = segments.max(3);
    let rings = rings.max(2);
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for ring in 0..=rings {
        let phi = PI * ring as f32 / rings as f32;
        let y = phi.cos();
        let ring_radius = phi.sin();

        for seg in 0..=segments {
            let theta = TAU * seg as f32 / segments as f32;
            let x = ring_radius * theta.cos();
            let z = ring_radius * theta.sin();

            let position = [x * 0.5, y * 0.5, z * 0.5];
            let normal = [x, y, z];
            let uv = [seg as f32 / segments as f32, ring as f32 / rings as f32];
            vertices.push(MeshVertex::new(position, normal, uv));
        }
    }

    for ring in 0..rings {
        for seg in 0..segments {
            let current = ring * (segments + 1) + seg;
            let next = current + segments + 1;
            indices.extend_from_slice(&[current, current + 1, next, current + 1, next + 1, next]);
        }
    }

    MeshData::new(vertices, indices)
}
