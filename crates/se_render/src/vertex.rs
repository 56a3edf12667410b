#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
    pub color: [f32; 4],
}

const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4];

impl SpriteVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }

    /// Four corners of an axis-aligned quad centred on `center`, in
    /// top-left, top-right, bottom-right, bottom-left order (y down).
    pub fn quad(center: [f32; 2], size: [f32; 2], color: [f32; 4]) -> [SpriteVertex; 4] {
        let half_w = size[0] * 0.5;
        let half_h = size[1] * 0.5;
        let left = center[0] - half_w;
        let right = center[0] + half_w;
        let top = center[1] - half_h;
        let bottom = center[1] + half_h;
        [
            SpriteVertex {
                position: [left, top],
                tex_coords: [0.0, 0.0],
                color,
            },
            SpriteVertex {
                position: [right, top],
                tex_coords: [1.0, 0.0],
                color,
            },
            SpriteVertex {
                position: [right, bottom],
                tex_coords: [1.0, 1.0],
                color,
            },
            SpriteVertex {
                position: [left, bottom],
                tex_coords: [0.0, 1.0],
                color,
            },
        ]
    }
}
