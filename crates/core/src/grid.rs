//! Grid module - dense 3D block storage
//!
//! The grid is a `width × (height + overflow) × depth` box where each cell is
//! either empty or holds the [`BlockHandle`] of a locked block. It uses a flat
//! vector for cache locality.
//!
//! Coordinates: `(x, y, z)` with y pointing up. Index order is y-major, then z,
//! then x (`(y * depth + z) * width + x`), so a horizontal layer is one
//! contiguous slice.
//!
//! Plane operations come in three families (see [`PlaneAxis`]). Every family
//! spans the playable rows `0..height` in y; the overflow rows above are spawn
//! headroom and never take part in completion or shifting.

use crate::collab::Renderer;
use crate::error::ConfigError;
use crate::types::{BlockHandle, GridCoord, Plane, PlaneAxis, OVERFLOW_ROWS};

/// Upper bound on the number of stored cells
const MAX_CELLS: u64 = 1 << 24;

/// Cell contents
pub type Cell = Option<BlockHandle>;

pub(crate) fn check_dims(width: u32, height: u32, depth: u32) -> Result<(), ConfigError> {
    for (axis, value) in [("width", width), ("height", height), ("depth", depth)] {
        if value == 0 {
            return Err(ConfigError::ZeroDimension { axis, value });
        }
    }
    let cells = width as u64 * (height as u64 + OVERFLOW_ROWS as u64) * depth as u64;
    if cells > MAX_CELLS {
        return Err(ConfigError::TooLarge {
            width,
            height,
            depth,
        });
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct VoxelGrid {
    width: i32,
    height: i32,
    depth: i32,
    overflow: i32,
    cells: Vec<Cell>,
}

impl VoxelGrid {
    /// Create an empty grid; zero dimensions are rejected
    pub fn new(width: u32, height: u32, depth: u32) -> Result<Self, ConfigError> {
        check_dims(width, height, depth)?;
        let (width, height, depth) = (width as i32, height as i32, depth as i32);
        let overflow = OVERFLOW_ROWS;
        let len = (width * (height + overflow) * depth) as usize;
        Ok(Self {
            width,
            height,
            depth,
            overflow,
            cells: vec![None; len],
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    /// Playable height (excludes overflow rows)
    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn depth(&self) -> i32 {
        self.depth
    }

    pub fn overflow(&self) -> i32 {
        self.overflow
    }

    /// Height of the storage box, overflow included
    pub fn storage_height(&self) -> i32 {
        self.height + self.overflow
    }

    #[inline(always)]
    fn index(&self, c: GridCoord) -> Option<usize> {
        if !self.is_valid(c) {
            return None;
        }
        Some(((c.y * self.depth + c.z) * self.width + c.x) as usize)
    }

    /// Bounds check only
    pub fn is_valid(&self, c: GridCoord) -> bool {
        c.x >= 0
            && c.x < self.width
            && c.y >= 0
            && c.y < self.storage_height()
            && c.z >= 0
            && c.z < self.depth
    }

    /// Within bounds and empty
    pub fn is_free(&self, c: GridCoord) -> bool {
        matches!(self.get(c), Some(None))
    }

    /// Within bounds and filled
    pub fn is_occupied(&self, c: GridCoord) -> bool {
        matches!(self.get(c), Some(Some(_)))
    }

    /// Cell at `c`, or `None` when out of bounds
    pub fn get(&self, c: GridCoord) -> Option<Cell> {
        self.index(c).map(|i| self.cells[i])
    }

    /// Store a handle if the cell is free; a no-op otherwise
    ///
    /// Returns whether the handle was written.
    pub fn store(&mut self, c: GridCoord, handle: BlockHandle) -> bool {
        match self.index(c) {
            Some(i) if self.cells[i].is_none() => {
                self.cells[i] = Some(handle);
                true
            }
            _ => false,
        }
    }

    /// Number of occupied cells
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// All occupied cells with their handles, in index order
    pub fn occupied_cells(&self) -> impl Iterator<Item = (GridCoord, BlockHandle)> + '_ {
        let (w, d) = (self.width, self.depth);
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            let i = i as i32;
            cell.map(|h| (GridCoord::new(i % w, i / (w * d), (i / w) % d), h))
        })
    }

    /// Any block in the top playable row (`y == height - 1`)
    pub fn top_row_occupied(&self) -> bool {
        let y = self.height - 1;
        (0..self.depth).any(|z| (0..self.width).any(|x| self.is_occupied(GridCoord::new(x, y, z))))
    }

    /// Extent of the fixed coordinate of a plane family
    pub fn plane_count(&self, axis: PlaneAxis) -> i32 {
        match axis {
            PlaneAxis::Horizontal => self.height,
            PlaneAxis::Depth => self.depth,
            PlaneAxis::Width => self.width,
        }
    }

    fn plane_in_range(&self, plane: Plane) -> bool {
        plane.index >= 0 && plane.index < self.plane_count(plane.axis)
    }

    /// Every cell of a plane, within the playable rows
    fn plane_cells(&self, plane: Plane) -> impl Iterator<Item = GridCoord> {
        let (w, h, d) = (self.width, self.height, self.depth);
        let i = plane.index;
        let (xs, ys, zs) = match plane.axis {
            PlaneAxis::Horizontal => (0..w, i..i + 1, 0..d),
            PlaneAxis::Depth => (0..w, 0..h, i..i + 1),
            PlaneAxis::Width => (i..i + 1, 0..h, 0..d),
        };
        ys.flat_map(move |y| {
            let xs = xs.clone();
            zs.clone()
                .flat_map(move |z| xs.clone().map(move |x| GridCoord::new(x, y, z)))
        })
    }

    /// Whether every cell in the plane is occupied
    pub fn plane_complete(&self, plane: Plane) -> bool {
        self.plane_in_range(plane) && self.plane_cells(plane).all(|c| self.is_occupied(c))
    }

    /// Remove every handle in the plane, destroying its visual
    ///
    /// Returns the number of blocks removed. Clearing an empty plane is a no-op.
    pub fn clear_plane(&mut self, plane: Plane, renderer: &mut dyn Renderer) -> usize {
        if !self.plane_in_range(plane) {
            return 0;
        }
        let mut removed = 0;
        for c in self.plane_cells(plane).collect::<Vec<_>>() {
            if let Some(i) = self.index(c) {
                if let Some(handle) = self.cells[i].take() {
                    renderer.destroy_visual(handle);
                    removed += 1;
                }
            }
        }
        removed
    }

    /// Move every block beyond the plane one step toward it
    ///
    /// "Beyond" is the side with larger coordinates: above for horizontal
    /// layers, in front for depth layers, to the right for width layers. Cells
    /// are visited nearest-first so a block always lands in a cell that was
    /// just vacated. The plane itself is expected to be empty.
    pub fn shift_toward_cleared(&mut self, plane: Plane, renderer: &mut dyn Renderer) {
        if !self.plane_in_range(plane) {
            return;
        }
        let axis = plane.axis.normal();
        let step = plane.index + 1..self.plane_count(plane.axis);
        for layer in step {
            let source = Plane {
                axis: plane.axis,
                index: layer,
            };
            for from in self.plane_cells(source).collect::<Vec<_>>() {
                let to = from.with(axis, layer - 1);
                let (Some(src), Some(dst)) = (self.index(from), self.index(to)) else {
                    continue;
                };
                if let Some(handle) = self.cells[src].take() {
                    debug_assert!(self.cells[dst].is_none(), "shift into occupied cell {}", to);
                    self.cells[dst] = Some(handle);
                    renderer.move_visual(handle, to);
                }
            }
        }
    }

    /// Clear all complete planes of one family
    ///
    /// Scans indices in ascending order. After a clear, the shift can pull a
    /// newly complete plane into the same index, so that index is checked again
    /// before moving on.
    pub fn clear_complete_planes(&mut self, axis: PlaneAxis, renderer: &mut dyn Renderer) -> u32 {
        let mut cleared = 0;
        let mut index = 0;
        while index < self.plane_count(axis) {
            let plane = Plane { axis, index };
            if self.plane_complete(plane) {
                self.clear_plane(plane, renderer);
                self.shift_toward_cleared(plane, renderer);
                cleared += 1;
                log::debug!("cleared {:?} plane {}", axis, index);
                continue;
            }
            index += 1;
        }
        cleared
    }

    /// Empty the whole grid, destroying every visual
    pub fn clear_all(&mut self, renderer: &mut dyn Renderer) {
        for cell in &mut self.cells {
            if let Some(handle) = cell.take() {
                renderer.destroy_visual(handle);
            }
        }
    }

    /// Set a cell directly (for testing)
    #[cfg(test)]
    pub(crate) fn set(&mut self, c: GridCoord, cell: Cell) {
        if let Some(i) = self.index(c) {
            self.cells[i] = cell;
        }
    }
}
