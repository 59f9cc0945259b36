// Maze collision: keeps a moving point out of closed walls and wall posts.
//
// The point is treated as touching a cell boundary when its offset inside
// the cell is within `margin` of that boundary. Touching a closed wall snaps
// the point back to the edge of the margin band. Touching two open walls at
// a corner that carries a post snaps the point back along one axis.
//
// Velocity is never modified here: the damping in `KinematicObject::integrate`
// bleeds off whatever velocity keeps pushing into a wall.

use glam::DVec2;

use super::kinematics::KinematicObject;
use super::maze::{Corner, MazeTopology, Side, SideSet};

/// Lowest x a point may reach; half a cell past the entrance door.
pub const MIN_X: f64 = -0.5;
/// Gap kept below `width` on the right so the cell index stays in range.
pub const RIGHT_EDGE_GAP: f64 = 0.01;

// ============================================================================
// MARGIN
// ============================================================================

/// Contact band width, in fractional cell units (wall + slope thickness).
///
/// Invariant: `0 <= margin < 0.5`. Below one half, a point can sit in the
/// band of at most one horizontal and one vertical side, so at most one
/// corner applies at a time.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Margin(f64);

impl Margin {
    /// # Panics
    ///
    /// If `value` is not finite or outside `[0, 0.5)`.
    pub fn new(value: f64) -> Self {
        assert!(
            value.is_finite() && (0.0..0.5).contains(&value),
            "margin must be in [0, 0.5), got {value}"
        );
        Self(value)
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for Margin {
    fn default() -> Self {
        Self(0.3)
    }
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// Where a point sits relative to the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellContact {
    pub cell_x: i64,
    pub cell_y: i64,
    /// Offset inside the cell, each axis in [0, 1).
    pub frac: DVec2,
    /// Boundaries whose margin band contains the point.
    pub sides: SideSet,
}

impl CellContact {
    pub fn classify(position: DVec2, margin: Margin) -> Self {
        let m = margin.get();
        let cell = position.floor();
        let frac = position - cell;

        let mut sides = SideSet::EMPTY;
        if frac.x < m {
            sides.insert(Side::Left);
        } else if frac.x > 1.0 - m {
            sides.insert(Side::Right);
        }
        if frac.y < m {
            sides.insert(Side::Up);
        } else if frac.y > 1.0 - m {
            sides.insert(Side::Down);
        }

        Self {
            cell_x: cell.x as i64,
            cell_y: cell.y as i64,
            frac,
            sides,
        }
    }
}

// ============================================================================
// RESOLVER
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CollisionResolver {
    pub margin: Margin,
}

impl CollisionResolver {
    pub fn new(margin: Margin) -> Self {
        Self { margin }
    }

    /// Correct `target.position` so it sits in legal maze space.
    ///
    /// Returns the boundaries the point is still touching afterwards: open
    /// walls it is passing through, or an open corner.
    pub fn resolve<M: MazeTopology + ?Sized>(
        &self,
        target: &mut KinematicObject,
        topology: &M,
    ) -> SideSet {
        let m = self.margin.get();
        let pos = &mut target.position;

        // Only these two clamps exist; everything else is wall resolution.
        if pos.x < MIN_X {
            pos.x = MIN_X;
        }
        let max_x = topology.width() as f64 - RIGHT_EDGE_GAP;
        if pos.x >= max_x {
            pos.x = max_x;
        }

        let CellContact {
            cell_x,
            cell_y,
            frac,
            mut sides,
        } = CellContact::classify(*pos, self.margin);
        let (cx, cy) = (cell_x as f64, cell_y as f64);

        // Straight walls, one correction per axis.
        if sides.contains(Side::Left) && !topology.is_open(Side::Left, cell_x, cell_y) {
            pos.x = cx + m;
            sides.remove(Side::Left);
        } else if sides.contains(Side::Right) && !topology.is_open(Side::Right, cell_x, cell_y) {
            pos.x = cx + (1.0 - m);
            sides.remove(Side::Right);
        }
        if sides.contains(Side::Up) && !topology.is_open(Side::Up, cell_x, cell_y) {
            pos.y = cy + m;
            sides.remove(Side::Up);
        } else if sides.contains(Side::Down) && !topology.is_open(Side::Down, cell_x, cell_y) {
            pos.y = cy + (1.0 - m);
            sides.remove(Side::Down);
        }

        // Corner posts. Both walls of the corner were open, so the offsets
        // are still the classified ones. Push out along the axis that went
        // in less deep.
        let (fx, fy) = (frac.x, frac.y);
        let Some(corner) = sides.corners().next() else {
            return sides;
        };
        if !topology.is_corner_blocked(corner, cell_x, cell_y) {
            return sides;
        }
        let push_x = match corner {
            Corner::UpLeft => fx > fy,
            Corner::UpRight => (1.0 - fx) > fy,
            Corner::DownLeft => (1.0 - fx) < fy,
            Corner::DownRight => fx < fy,
        };
        let (h, v) = corner.sides();
        if push_x {
            pos.x = if h == Side::Left { cx + m } else { cx + (1.0 - m) };
            sides.remove(h);
        } else {
            pos.y = if v == Side::Up { cy + m } else { cy + (1.0 - m) };
            sides.remove(v);
        }
        log::trace!("corner {corner:?} of ({cell_x}, {cell_y}) pushed to {pos}");
        sides
    }
}
