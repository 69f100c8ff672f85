use crate::gallery::layout::TILE_SIZE;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TileVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl TileVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<TileVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Draw info for one image quad inside the shared vertex/index buffers.
#[derive(Debug, Clone)]
pub struct TileRenderInfo {
    pub image_id: usize,
    pub first_index: u32,
    pub index_count: u32,
}

/// Build the four corners of a tile quad, fitted to the image's aspect ratio
/// inside the tile square, facing +z at the given center.
pub fn quad_vertices(center: [f32; 3], aspect: f32) -> [TileVertex; 4] {
    let (half_w, half_h) = if aspect >= 1.0 {
        (TILE_SIZE * 0.5, TILE_SIZE * 0.5 / aspect)
    } else {
        (TILE_SIZE * 0.5 * aspect, TILE_SIZE * 0.5)
    };
    let [cx, cy, cz] = center;
    [
        TileVertex {
            position: [cx - half_w, cy - half_h, cz],
            uv: [0.0, 1.0],
        },
        TileVertex {
            position: [cx + half_w, cy - half_h, cz],
            uv: [1.0, 1.0],
        },
        TileVertex {
            position: [cx + half_w, cy + half_h, cz],
            uv: [1.0, 0.0],
        },
        TileVertex {
            position: [cx - half_w, cy + half_h, cz],
            uv: [0.0, 0.0],
        },
    ]
}

pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_images_fill_the_tile_width() {
        let verts = quad_vertices([0.0, 0.0, 0.0], 2.0);
        let width = verts[1].position[0] - verts[0].position[0];
        let height = verts[2].position[1] - verts[1].position[1];
        assert!((width - TILE_SIZE).abs() < 1e-6);
        assert!((height - TILE_SIZE / 2.0).abs() < 1e-6);
    }

    #[test]
    fn tall_images_fill_the_tile_height() {
        let verts = quad_vertices([1.0, -2.0, 0.0], 0.5);
        let width = verts[1].position[0] - verts[0].position[0];
        let height = verts[2].position[1] - verts[1].position[1];
        assert!((width - TILE_SIZE / 2.0).abs() < 1e-6);
        assert!((height - TILE_SIZE).abs() < 1e-6);
    }
}
