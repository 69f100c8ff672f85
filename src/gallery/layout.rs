use nalgebra_glm as glm;

pub const GRID_COLUMNS: usize = 5;
/// World-space distance between tile centers.
pub const TILE_SPACING: f32 = 2.4;
/// Edge length of the square a tile's image is fitted into.
pub const TILE_SIZE: f32 = 2.0;

/// Deterministic arrangement of images on the z = 0 plane: rows of
/// `columns` tiles, centered horizontally, growing downward. The inverse
/// mapping backs viewport click picking.
#[derive(Debug, Clone, Copy)]
pub struct GridLayout {
    columns: usize,
    spacing: f32,
}

impl GridLayout {
    pub fn new(columns: usize, spacing: f32) -> Self {
        Self {
            columns: columns.max(1),
            spacing,
        }
    }

    pub fn position(&self, index: usize) -> glm::Vec3 {
        let col = index % self.columns;
        let row = index / self.columns;
        let half_span = (self.columns - 1) as f32 * 0.5;
        glm::vec3(
            (col as f32 - half_span) * self.spacing,
            -(row as f32) * self.spacing,
            0.0,
        )
    }

    /// Map a world point on the grid plane back to the tile whose center it
    /// falls nearest, if that tile exists and the point lies inside the tile
    /// square.
    pub fn cell_at(&self, x: f32, y: f32, count: usize) -> Option<usize> {
        let half_span = (self.columns - 1) as f32 * 0.5;
        let col = (x / self.spacing + half_span).round();
        let row = (-y / self.spacing).round();
        if col < 0.0 || row < 0.0 || col >= self.columns as f32 {
            return None;
        }
        let index = row as usize * self.columns + col as usize;
        if index >= count {
            return None;
        }
        let center = self.position(index);
        let half_tile = TILE_SIZE * 0.5;
        if (x - center.x).abs() > half_tile || (y - center.y).abs() > half_tile {
            return None;
        }
        Some(index)
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::new(GRID_COLUMNS, TILE_SPACING)
    }
}
