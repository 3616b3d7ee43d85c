//! Static vertex/index buffers, uploaded once at startup.

use asset::mesh::MeshData;
use bytemuck::{Pod, Zeroable};
use corelib::program::{DrawMode, Geometry};
use wgpu::{Buffer, BufferUsages, Device, VertexBufferLayout, VertexStepMode, util::DeviceExt};

/// Vertex: position + normal.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuVertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
}

impl GpuVertex {
    pub const LAYOUT: VertexBufferLayout<'static> = VertexBufferLayout {
        array_stride: std::mem::size_of::<GpuVertex>() as u64,
        step_mode: VertexStepMode::Vertex,
        attributes: &wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3],
    };
}

pub fn gpu_vertices(mesh: &MeshData) -> Vec<GpuVertex> {
    mesh.vertices
        .iter()
        .map(|v| GpuVertex {
            pos: v.position,
            normal: v.normal,
        })
        .collect()
}

/// CPU meshes for every [`Geometry`] handle.
#[derive(Clone, Debug)]
pub struct SceneMeshes {
    pub cube: MeshData,
    pub cylinder: MeshData,
    pub torus: MeshData,
    pub bunny: MeshData,
}

impl SceneMeshes {
    pub fn get(&self, geometry: Geometry) -> &MeshData {
        match geometry {
            Geometry::Cube => &self.cube,
            Geometry::Cylinder => &self.cylinder,
            Geometry::Torus => &self.torus,
            Geometry::Bunny => &self.bunny,
        }
    }
}

/// One mesh on the GPU, with a triangle list and a line list over the
/// same vertices.
pub struct GpuMesh {
    pub vertex_buf: Buffer,
    pub triangle_buf: Buffer,
    pub triangle_count: u32,
    pub line_buf: Buffer,
    pub line_count: u32,
}

impl GpuMesh {
    pub fn upload(device: &Device, label: &str, mesh: &MeshData) -> Self {
        let vertices = gpu_vertices(mesh);
        let lines = mesh.edge_indices();
        let vertex_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} VB")),
            contents: bytemuck::cast_slice(&vertices),
            usage: BufferUsages::VERTEX,
        });
        let triangle_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} IB")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: BufferUsages::INDEX,
        });
        let line_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Lines IB")),
            contents: bytemuck::cast_slice(&lines),
            usage: BufferUsages::INDEX,
        });
        log::debug!(
            "Uploaded mesh '{label}': {} vertices, {} triangles, {} edges",
            vertices.len(),
            mesh.indices.len() / 3,
            lines.len() / 2
        );
        Self {
            vertex_buf,
            triangle_buf,
            triangle_count: mesh.indices.len() as u32,
            line_buf,
            line_count: lines.len() as u32,
        }
    }

    /// Index buffer and count for the requested topology.
    pub fn indices(&self, mode: DrawMode) -> (&Buffer, u32) {
        match mode {
            DrawMode::Filled => (&self.triangle_buf, self.triangle_count),
            DrawMode::Wireframe => (&self.line_buf, self.line_count),
        }
    }
}

pub struct GpuMeshes {
    cube: GpuMesh,
    cylinder: GpuMesh,
    torus: GpuMesh,
    bunny: GpuMesh,
}

impl GpuMeshes {
    pub fn upload(device: &Device, meshes: &SceneMeshes) -> Self {
        Self {
            cube: GpuMesh::upload(device, "Cube", &meshes.cube),
            cylinder: GpuMesh::upload(device, "Cylinder", &meshes.cylinder),
            torus: GpuMesh::upload(device, "Torus", &meshes.torus),
            bunny: GpuMesh::upload(device, "Bunny", &meshes.bunny),
        }
    }

    pub fn get(&self, geometry: Geometry) -> &GpuMesh {
        match geometry {
            Geometry::Cube => &self.cube,
            Geometry::Cylinder => &self.cylinder,
            Geometry::Torus => &self.torus,
            Geometry::Bunny => &self.bunny,
        }
    }
}
