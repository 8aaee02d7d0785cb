//! Screen-space visibility test with a cushion margin, and screen tiling.

use glam::{Affine3A, Mat4, Vec3};

use crate::camera::{Camera, ViewportPoint, project};

/// A sub-rectangle of the normalized viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportRect {
    /// Left edge.
    pub min_x: f32,
    /// Right edge.
    pub max_x: f32,
    /// Bottom edge.
    pub min_y: f32,
    /// Top edge.
    pub max_y: f32,
}

impl ViewportRect {
    /// The whole viewport, `[0,1] x [0,1]`.
    pub const FULL: Self = Self {
        min_x: 0.0,
        max_x: 1.0,
        min_y: 0.0,
        max_y: 1.0,
    };

    /// Create a rectangle from its edges.
    pub fn new(min_x: f32, max_x: f32, min_y: f32, max_y: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_y,
            max_y,
        }
    }

    /// Whether `p` lies inside the rectangle grown by `cushion`.
    ///
    /// The horizontal margin is `cushion * aspect`, the vertical margin
    /// `cushion / aspect`. Points with non-positive depth are never inside.
    pub fn contains_with_cushion(&self, p: ViewportPoint, cushion: f32, aspect: f32) -> bool {
        let margin_x = cushion * aspect;
        let margin_y = cushion / aspect;
        p.depth > 0.0
            && p.x >= self.min_x - margin_x
            && p.x <= self.max_x + margin_x
            && p.y >= self.min_y - margin_y
            && p.y <= self.max_y + margin_y
    }
}

impl Default for ViewportRect {
    fn default() -> Self {
        Self::FULL
    }
}

/// Splits the viewport into a grid of equally sized tiles.
///
/// Tile `i` sits in column `i % wide` and row `i / wide`, counted from the
/// bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenTiling {
    /// Tiles per row.
    pub wide: u32,
    /// Tiles per column.
    pub tall: u32,
}

impl ScreenTiling {
    /// A single tile covering the whole viewport.
    pub const SINGLE: Self = Self { wide: 1, tall: 1 };

    /// Create a tiling. Zero dimensions are raised to one.
    pub fn new(wide: u32, tall: u32) -> Self {
        Self {
            wide: wide.max(1),
            tall: tall.max(1),
        }
    }

    /// Total number of tiles.
    pub fn tile_count(&self) -> usize {
        self.wide as usize * self.tall as usize
    }

    /// Rectangle of tile `index`, or `None` past the last tile.
    pub fn tile_rect(&self, index: usize) -> Option<ViewportRect> {
        if index >= self.tile_count() {
            return None;
        }
        let wide = self.wide as usize;
        let (col, row) = (index % wide, index / wide);
        let w = self.wide as f32;
        let h = self.tall as f32;
        Some(ViewportRect::new(
            col as f32 / w,
            (col + 1) as f32 / w,
            row as f32 / h,
            (row + 1) as f32 / h,
        ))
    }

    /// Rectangles of every tile in index order.
    pub fn rects(&self) -> impl Iterator<Item = ViewportRect> + '_ {
        (0..self.tile_count()).filter_map(|i| self.tile_rect(i))
    }
}

impl Default for ScreenTiling {
    fn default() -> Self {
        Self::SINGLE
    }
}

/// Everything one cull pass needs to decide whether a mesh-space point is
/// on screen. Built once per pass.
#[derive(Debug, Clone)]
pub struct CullView {
    /// Mesh space to view space.
    model_view: Mat4,
    projection: Mat4,
    aspect: f32,
    rect: ViewportRect,
    cushion: f32,
}

impl CullView {
    /// View from `camera` over the full viewport, mesh placed at the origin.
    ///
    /// `cushion` is clamped to `[0, 1]`.
    pub fn new(camera: &Camera, cushion: f32) -> Self {
        Self {
            model_view: camera.view_matrix(),
            projection: camera.projection_matrix(),
            aspect: camera.aspect_ratio(),
            rect: ViewportRect::FULL,
            cushion: cushion.clamp(0.0, 1.0),
        }
    }

    /// Place the mesh in the world with `model`.
    pub fn with_model(mut self, model: Affine3A) -> Self {
        self.model_view *= Mat4::from(model);
        self
    }

    /// Restrict visibility to `rect` (plus cushion).
    pub fn with_rect(mut self, rect: ViewportRect) -> Self {
        self.rect = rect;
        self
    }

    /// The cushion fraction in use.
    pub fn cushion(&self) -> f32 {
        self.cushion
    }

    /// The viewport rectangle in use.
    pub fn rect(&self) -> ViewportRect {
        self.rect
    }

    /// Project a mesh-space point.
    pub fn project(&self, point: Vec3) -> ViewportPoint {
        project(&self.model_view, &self.projection, point)
    }

    /// Whether a mesh-space point counts as visible.
    pub fn is_visible(&self, point: Vec3) -> bool {
        self.rect
            .contains_with_cushion(self.project(point), self.cushion, self.aspect)
    }
}
