// CPU-side mesh types produced by the geometry builders.
// See geometry.rs for the builders themselves.
//
//   geometry::*() → RenderMesh / PointCloud → Renderer::upload_*() → MeshId

use glam::Vec3;

// ============================================================================
// GPU VERTEX
// ============================================================================

/// GPU-ready vertex with position and texture coordinate.
///   @location(0) position: vec3<f32>
///   @location(1) uv:       vec2<f32>
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 3],
    pub uv:       [f32; 2],
}

impl GpuVertex {
    pub fn new(position: Vec3, u: f32, v: f32) -> Self {
        Self { position: position.to_array(), uv: [u, v] }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<GpuVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// One star of the point cloud, drawn as an instanced quad.
///   @location(2) center: vec3<f32>
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointInstance {
    pub center: [f32; 3],
}

impl PointInstance {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PointInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x3,
            }],
        }
    }
}

// ============================================================================
// RENDER MESH
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Triangles,
    /// Closed polyline: the index buffer repeats the first vertex at the end
    /// and is drawn as a line strip.
    LineLoop,
}

/// Indexed mesh ready for upload.
/// Upload vertex_bytes() to a VERTEX buffer, index_bytes() to an INDEX buffer.
#[derive(Debug, Clone)]
pub struct RenderMesh {
    pub vertices:  Vec<GpuVertex>,
    pub indices:   Vec<u32>,
    pub primitive: Primitive,
}

impl RenderMesh {
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }

    pub fn index_count(&self) -> usize { self.indices.len() }

    #[cfg(test)]
    pub fn triangle_count(&self) -> usize {
        match self.primitive {
            Primitive::Triangles => self.indices.len() / 3,
            Primitive::LineLoop => 0,
        }
    }
}

// ============================================================================
// POINT CLOUD
// ============================================================================

/// Positions drawn as camera-facing squares of `size` world units.
#[derive(Debug, Clone)]
pub struct PointCloud {
    pub positions: Vec<Vec3>,
    pub size: f32,
}

impl PointCloud {
    pub fn instances(&self) -> Vec<PointInstance> {
        self.positions
            .iter()
            .map(|p| PointInstance { center: p.to_array() })
            .collect()
    }
}
