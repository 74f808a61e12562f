//! The `ScalarField` grid.
//!
//! Cells are addressed `(i, j)` with `i` along the world x axis and `j`
//! along y.  Storage is a flat `Vec<f32>` in column order (`i * height + j`).

use swarm_core::Vec2;

use crate::{FieldError, FieldResult};

/// Map a world point to the cell containing it.
///
/// Linear scale then floor, clamped into `[0, field_w-1] × [0, field_h-1]`.
/// Points outside the world snap to the nearest edge cell.
pub fn world_to_cell(
    x:       f32,
    y:       f32,
    field_w: usize,
    field_h: usize,
    world_w: f32,
    world_h: f32,
) -> (usize, usize) {
    (
        scale_axis(x, field_w, world_w),
        scale_axis(y, field_h, world_h),
    )
}

fn scale_axis(v: f32, cells: usize, extent: f32) -> usize {
    if cells == 0 {
        return 0;
    }
    let raw = (cells as f32 * v / extent).floor();
    if raw.is_nan() || raw < 0.0 {
        0
    } else {
        (raw as usize).min(cells - 1)
    }
}

// ── ScalarField ───────────────────────────────────────────────────────────────

/// A `width × height` grid of `f32` values.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScalarField {
    width:  usize,
    height: usize,
    cells:  Vec<f32>,
}

impl ScalarField {
    /// A field of zeros.
    pub fn zero(width: usize, height: usize) -> FieldResult<Self> {
        if width == 0 || height == 0 {
            return Err(FieldError::EmptyGrid { width, height });
        }
        Ok(Self { width, height, cells: vec![0.0; width * height] })
    }

    /// Normalised distance field around cell `(source_i, source_j)`.
    ///
    /// Each cell holds `1 - d / max_d` where `d` is the Euclidean distance
    /// in cells to the source and `max_d` the largest such distance on the
    /// grid.  The source cell is 1.0 and the farthest cell 0.0.  A 1×1 grid
    /// is just the source, valued 1.0.
    pub fn distance_field(
        source_i: usize,
        source_j: usize,
        width:    usize,
        height:   usize,
    ) -> FieldResult<Self> {
        let mut field = Self::zero(width, height)?;
        if source_i >= width || source_j >= height {
            return Err(FieldError::SourceOutOfRange { i: source_i, j: source_j, width, height });
        }

        let (si, sj) = (source_i as f32, source_j as f32);
        let mut max_distance = 0.0f32;
        for i in 0..width {
            for j in 0..height {
                let (dx, dy) = (i as f32 - si, j as f32 - sj);
                let d = (dx * dx + dy * dy).sqrt();
                max_distance = max_distance.max(d);
                field.cells[i * height + j] = d;
            }
        }

        if max_distance == 0.0 {
            field.cells.fill(1.0);
        } else {
            for c in &mut field.cells {
                *c = 1.0 - *c / max_distance;
            }
        }
        Ok(field)
    }

    /// Distance field whose source is the cell containing world point `source`.
    pub fn distance_field_at(
        source:  Vec2,
        width:   usize,
        height:  usize,
        world_w: f32,
        world_h: f32,
    ) -> FieldResult<Self> {
        let (i, j) = world_to_cell(source.x, source.y, width, height, world_w, world_h);
        Self::distance_field(i, j, width, height)
    }

    /// One diffusion+decay relaxation pass.
    ///
    /// Reads from a snapshot of the previous grid, so the update does not
    /// depend on iteration order.  Interior cells become
    /// `(1 - decay) * ((1 - diffusion) * c + diffusion/8 * Σ neighbours)`;
    /// the outermost ring is left untouched.
    pub fn step(&mut self, diffusion_rate: f32, decay_rate: f32) {
        if self.width < 3 || self.height < 3 {
            return;
        }
        let old = self.cells.clone();
        let h = self.height;
        let centre_w = 1.0 - diffusion_rate;
        let neighbour_w = diffusion_rate / 8.0;
        let keep = 1.0 - decay_rate;

        for i in 1..self.width - 1 {
            for j in 1..h - 1 {
                let mut neighbours = 0.0;
                for di in [i - 1, i, i + 1] {
                    for dj in [j - 1, j, j + 1] {
                        if di != i || dj != j {
                            neighbours += old[di * h + dj];
                        }
                    }
                }
                self.cells[i * h + j] = keep * (centre_w * old[i * h + j] + neighbour_w * neighbours);
            }
        }
    }

    // ── Access ────────────────────────────────────────────────────────────

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Value at `(i, j)`, or `None` outside the grid.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<f32> {
        (i < self.width && j < self.height).then(|| self.cells[i * self.height + j])
    }

    /// Overwrite `(i, j)`.  Returns `false` (and writes nothing) outside the grid.
    pub fn set(&mut self, i: usize, j: usize, value: f32) -> bool {
        if i >= self.width || j >= self.height {
            return false;
        }
        self.cells[i * self.height + j] = value;
        true
    }

    /// `true` for cells on the outermost ring.
    #[inline]
    pub fn is_border(&self, i: usize, j: usize) -> bool {
        i == 0 || j == 0 || i + 1 >= self.width || j + 1 >= self.height
    }

    /// Write a deposit into an interior cell, clamped to `[0, 1]`.
    ///
    /// Border cells are never written; returns whether the deposit landed.
    pub fn deposit(&mut self, i: usize, j: usize, value: f32) -> bool {
        if self.is_border(i, j) {
            return false;
        }
        self.set(i, j, value.clamp(0.0, 1.0))
    }

    /// Sample the cell containing world point `p`.
    pub fn sample_world(&self, p: Vec2, world_w: f32, world_h: f32) -> f32 {
        let (i, j) = self.cell_of(p, world_w, world_h);
        self.cells[i * self.height + j]
    }

    /// The cell containing world point `p` (clamped into the grid).
    #[inline]
    pub fn cell_of(&self, p: Vec2, world_w: f32, world_h: f32) -> (usize, usize) {
        world_to_cell(p.x, p.y, self.width, self.height, world_w, world_h)
    }

    /// Sum of all cell values.
    pub fn total_mass(&self) -> f64 {
        self.cells.iter().map(|&c| c as f64).sum()
    }

    /// Largest cell value (0.0 for an all-zero field).
    pub fn max_value(&self) -> f32 {
        self.cells.iter().copied().fold(0.0, f32::max)
    }

    /// Raw cell storage in column order, for render overlays.
    #[inline]
    pub fn as_slice(&self) -> &[f32] {
        &self.cells
    }
}
