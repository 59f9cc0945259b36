// Maze topology: a rectangular grid of cells, each with four walls.
//
// The navigation core reads the maze only through `MazeTopology`.
// `Maze` is the concrete grid: randomized Prim spanning tree, an entrance
// and an exit door, plus random shortcut doors.
//
// Coordinates: x grows right, y grows down. Cell (x, y) covers
// [x, x+1) x [y, y+1). Cell coordinates are i64 so that queries just
// outside the grid (the space beyond a boundary door) are expressible.

use rand::Rng;
use std::fmt;

use super::error::{MazeError, MazeResult};

// ============================================================================
// SIDES AND CORNERS
// ============================================================================

/// One of the four walls of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
    Up,
    Down,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Left, Side::Right, Side::Up, Side::Down];

    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
            Side::Up => Side::Down,
            Side::Down => Side::Up,
        }
    }

    /// Cell offset of the neighbour across this side.
    pub fn offset(self) -> (i64, i64) {
        match self {
            Side::Left => (-1, 0),
            Side::Right => (1, 0),
            Side::Up => (0, -1),
            Side::Down => (0, 1),
        }
    }

    #[inline]
    const fn bit(self) -> u8 {
        match self {
            Side::Left => 0b0001,
            Side::Right => 0b0010,
            Side::Up => 0b0100,
            Side::Down => 0b1000,
        }
    }
}

/// One of the four corners of a cell, named by the two sides that meet there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::UpLeft,
        Corner::UpRight,
        Corner::DownLeft,
        Corner::DownRight,
    ];

    /// (horizontal side, vertical side) meeting at this corner.
    pub fn sides(self) -> (Side, Side) {
        match self {
            Corner::UpLeft => (Side::Left, Side::Up),
            Corner::UpRight => (Side::Right, Side::Up),
            Corner::DownLeft => (Side::Left, Side::Down),
            Corner::DownRight => (Side::Right, Side::Down),
        }
    }

    /// Grid vertex at this corner of cell (x, y).
    fn vertex(self, x: i64, y: i64) -> (i64, i64) {
        match self {
            Corner::UpLeft => (x, y),
            Corner::UpRight => (x + 1, y),
            Corner::DownLeft => (x, y + 1),
            Corner::DownRight => (x + 1, y + 1),
        }
    }
}

/// Small bit set over `Side`.
///
/// Used both for a cell's open walls and for the boundaries a moving point
/// is currently touching.
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct SideSet(u8);

impl SideSet {
    pub const EMPTY: SideSet = SideSet(0);

    pub fn contains(self, side: Side) -> bool {
        self.0 & side.bit() != 0
    }

    pub fn insert(&mut self, side: Side) {
        self.0 |= side.bit();
    }

    pub fn remove(&mut self, side: Side) {
        self.0 &= !side.bit();
    }

    pub fn with(mut self, side: Side) -> Self {
        self.insert(side);
        self
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Side> {
        Side::ALL.into_iter().filter(move |&s| self.contains(s))
    }

    /// Every corner whose two sides are both in the set.
    pub fn corners(self) -> impl Iterator<Item = Corner> {
        Corner::ALL.into_iter().filter(move |c| {
            let (h, v) = c.sides();
            self.contains(h) && self.contains(v)
        })
    }
}

impl fmt::Debug for SideSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<Side> for SideSet {
    fn from_iter<I: IntoIterator<Item = Side>>(iter: I) -> Self {
        let mut set = SideSet::EMPTY;
        for side in iter {
            set.insert(side);
        }
        set
    }
}

// ============================================================================
// TOPOLOGY TRAIT
// ============================================================================

/// Read-only view of a maze, as consumed by the collision resolver.
///
/// Implementations must answer for any cell coordinate, including cells just
/// outside `width x height`: a point leaving through a boundary door lands in
/// such a cell.
pub trait MazeTopology {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// True if the wall on `side` of cell (x, y) can be crossed.
    fn is_open(&self, side: Side, cell_x: i64, cell_y: i64) -> bool;

    /// True if the diagonal at `corner` of cell (x, y) is blocked.
    fn is_corner_blocked(&self, corner: Corner, cell_x: i64, cell_y: i64) -> bool;
}

// ============================================================================
// GRID MAZE
// ============================================================================

/// Rectangular grid maze. Shared walls are always kept consistent:
/// opening a door opens it from both cells.
#[derive(Debug, Clone)]
pub struct Maze {
    width: u32,
    height: u32,
    /// Open sides per cell, row-major.
    open: Vec<SideSet>,
}

impl Maze {
    /// A maze with every wall closed.
    pub fn new(width: u32, height: u32) -> MazeResult<Self> {
        if width == 0 || height == 0 {
            return Err(MazeError::EmptyGrid { width, height });
        }
        Ok(Self {
            width,
            height,
            open: vec![SideSet::EMPTY; width as usize * height as usize],
        })
    }

    /// Generate a perfect maze with randomized Prim, open the entrance (left
    /// of the top-left cell) and the exit (right of the bottom-right cell),
    /// then punch `ceil(4 * width * height * shortcut_ratio)` random shortcut
    /// attempts through interior walls.
    pub fn generate<R: Rng + ?Sized>(
        width: u32,
        height: u32,
        shortcut_ratio: f64,
        rng: &mut R,
    ) -> MazeResult<Self> {
        let mut maze = Self::new(width, height)?;
        maze.carve_prim(rng);
        maze.open_door(0, 0, Side::Left)?;
        maze.open_door(width - 1, height - 1, Side::Right)?;
        maze.add_shortcuts(shortcut_ratio, rng);
        Ok(maze)
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width as i64 && y < self.height as i64
    }

    #[inline]
    fn idx(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Open sides of an in-grid cell, or `None` outside the grid.
    pub fn open_sides(&self, x: i64, y: i64) -> Option<SideSet> {
        if !self.contains(x, y) {
            return None;
        }
        Some(self.open[self.idx(x as u32, y as u32)])
    }

    /// In-grid neighbour of (x, y) across `side`.
    fn neighbor(&self, x: u32, y: u32, side: Side) -> Option<(u32, u32)> {
        let (dx, dy) = side.offset();
        let (nx, ny) = (x as i64 + dx, y as i64 + dy);
        self.contains(nx, ny).then_some((nx as u32, ny as u32))
    }

    /// Open the wall on `side` of cell (x, y). The neighbour's matching wall
    /// is opened too; on the grid boundary only this cell's wall changes.
    pub fn open_door(&mut self, x: u32, y: u32, side: Side) -> MazeResult<()> {
        if x >= self.width || y >= self.height {
            return Err(MazeError::CellOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        let i = self.idx(x, y);
        self.open[i].insert(side);
        if let Some((nx, ny)) = self.neighbor(x, y, side) {
            let ni = self.idx(nx, ny);
            self.open[ni].insert(side.opposite());
        }
        Ok(())
    }

    /// Open state of the edge on `side` of cell (x, y), for any cell.
    ///
    /// An edge is owned by whichever of its two cells lies inside the grid;
    /// an edge with no in-grid cell is closed.
    fn edge_open(&self, side: Side, x: i64, y: i64) -> bool {
        if let Some(sides) = self.open_sides(x, y) {
            return sides.contains(side);
        }
        let (dx, dy) = side.offset();
        self.open_sides(x + dx, y + dy)
            .is_some_and(|sides| sides.contains(side.opposite()))
    }

    /// True if any wall segment touches grid vertex (vx, vy).
    fn has_post(&self, vx: i64, vy: i64) -> bool {
        !self.edge_open(Side::Up, vx, vy)
            || !self.edge_open(Side::Up, vx - 1, vy)
            || !self.edge_open(Side::Left, vx, vy)
            || !self.edge_open(Side::Left, vx, vy - 1)
    }

    fn carve_prim<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut in_maze = vec![false; self.open.len()];
        let mut frontier: Vec<(u32, u32, Side)> = Vec::new();

        let start = (rng.gen_range(0..self.width), rng.gen_range(0..self.height));
        in_maze[self.idx(start.0, start.1)] = true;
        self.push_frontier(start, &mut frontier);

        while !frontier.is_empty() {
            let (x, y, side) = frontier.swap_remove(rng.gen_range(0..frontier.len()));
            let Some(next) = self.neighbor(x, y, side) else {
                continue;
            };
            let ni = self.idx(next.0, next.1);
            if in_maze[ni] {
                continue;
            }
            in_maze[ni] = true;
            let i = self.idx(x, y);
            self.open[i].insert(side);
            self.open[ni].insert(side.opposite());
            self.push_frontier(next, &mut frontier);
        }
    }

    fn push_frontier(&self, (x, y): (u32, u32), frontier: &mut Vec<(u32, u32, Side)>) {
        for side in Side::ALL {
            if self.neighbor(x, y, side).is_some() {
                frontier.push((x, y, side));
            }
        }
    }

    fn add_shortcuts<R: Rng + ?Sized>(&mut self, ratio: f64, rng: &mut R) {
        let attempts = (4.0 * self.open.len() as f64 * ratio).ceil().max(0.0) as usize;
        let mut opened = 0usize;
        for _ in 0..attempts {
            let x = rng.gen_range(0..self.width);
            let y = rng.gen_range(0..self.height);
            let side = Side::ALL[rng.gen_range(0..4)];
            if let Some((nx, ny)) = self.neighbor(x, y, side) {
                let (i, ni) = (self.idx(x, y), self.idx(nx, ny));
                if !self.open[i].contains(side) {
                    opened += 1;
                }
                self.open[i].insert(side);
                self.open[ni].insert(side.opposite());
            }
        }
        log::debug!("shortcuts: {attempts} attempts, {opened} new doors");
    }
}

impl MazeTopology for Maze {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn is_open(&self, side: Side, cell_x: i64, cell_y: i64) -> bool {
        self.edge_open(side, cell_x, cell_y)
    }

    fn is_corner_blocked(&self, corner: Corner, cell_x: i64, cell_y: i64) -> bool {
        let (vx, vy) = corner.vertex(cell_x, cell_y);
        self.has_post(vx, vy)
    }
}

impl fmt::Display for Maze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height as i64 {
            for x in 0..self.width as i64 {
                f.write_str("+")?;
                f.write_str(if self.edge_open(Side::Up, x, y) { "  " } else { "--" })?;
            }
            writeln!(f, "+")?;
            for x in 0..self.width as i64 {
                f.write_str(if self.edge_open(Side::Left, x, y) { " " } else { "|" })?;
                f.write_str("  ")?;
            }
            let last = self.width as i64 - 1;
            writeln!(f, "{}", if self.edge_open(Side::Right, last, y) { " " } else { "|" })?;
        }
        for _ in 0..self.width {
            f.write_str("+--")?;
        }
        writeln!(f, "+")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::VecDeque;

    fn reachable_cells(maze: &Maze) -> usize {
        let mut seen = vec![false; (maze.width() * maze.height()) as usize];
        let mut queue = VecDeque::from([(0u32, 0u32)]);
        seen[0] = true;
        let mut count = 0;
        while let Some((x, y)) = queue.pop_front() {
            count += 1;
            for side in Side::ALL {
                if !maze.is_open(side, x as i64, y as i64) {
                    continue;
                }
                if let Some((nx, ny)) = maze.neighbor(x, y, side) {
                    let i = maze.idx(nx, ny);
                    if !seen[i] {
                        seen[i] = true;
                        queue.push_back((nx, ny));
                    }
                }
            }
        }
        count
    }

    #[test]
    fn empty_grid_is_rejected() {
        assert_eq!(
            Maze::new(0, 4).unwrap_err(),
            MazeError::EmptyGrid { width: 0, height: 4 }
        );
    }

    #[test]
    fn door_out_of_bounds_is_rejected() {
        let mut maze = Maze::new(2, 2).unwrap();
        assert!(matches!(
            maze.open_door(2, 0, Side::Left),
            Err(MazeError::CellOutOfBounds { x: 2, y: 0, .. })
        ));
    }

    #[test]
    fn new_maze_is_fully_walled() {
        let maze = Maze::new(3, 2).unwrap();
        for y in 0..2 {
            for x in 0..3 {
                for side in Side::ALL {
                    assert!(!maze.is_open(side, x, y));
                }
            }
        }
    }

    #[test]
    fn open_door_opens_both_cells() {
        let mut maze = Maze::new(2, 1).unwrap();
        maze.open_door(0, 0, Side::Right).unwrap();
        assert!(maze.is_open(Side::Right, 0, 0));
        assert!(maze.is_open(Side::Left, 1, 0));
        assert!(!maze.is_open(Side::Left, 0, 0));
    }

    #[test]
    fn boundary_door_is_visible_from_outside() {
        let mut maze = Maze::new(2, 2).unwrap();
        maze.open_door(0, 0, Side::Left).unwrap();
        assert!(maze.is_open(Side::Right, -1, 0));
        assert!(!maze.is_open(Side::Right, -1, 1));
        // Beyond the door is a stub: its other walls are closed.
        assert!(!maze.is_open(Side::Up, -1, 0));
        assert!(!maze.is_open(Side::Down, -1, 0));
        assert!(!maze.is_open(Side::Left, -1, 0));
    }

    #[test]
    fn corner_post_stands_where_any_wall_meets_the_vertex() {
        let mut maze = Maze::new(2, 2).unwrap();
        for (x, y, side) in [
            (0, 0, Side::Right),
            (0, 0, Side::Down),
            (1, 0, Side::Down),
            (0, 1, Side::Right),
        ] {
            maze.open_door(x, y, side).unwrap();
        }
        // All four segments around the centre vertex are open.
        assert!(!maze.is_corner_blocked(Corner::UpLeft, 1, 1));
        assert!(!maze.is_corner_blocked(Corner::DownRight, 0, 0));

        let mut maze = Maze::new(2, 2).unwrap();
        for (x, y, side) in [(1, 0, Side::Down), (0, 1, Side::Right), (0, 0, Side::Down)] {
            maze.open_door(x, y, side).unwrap();
        }
        // (0,0)|(1,0) is still closed, so a post stands at the centre.
        assert!(maze.is_open(Side::Left, 1, 1));
        assert!(maze.is_open(Side::Up, 1, 1));
        assert!(maze.is_corner_blocked(Corner::UpLeft, 1, 1));
        assert!(maze.is_corner_blocked(Corner::UpRight, 0, 1));
        assert!(maze.is_corner_blocked(Corner::DownLeft, 1, 0));
    }

    #[test]
    fn generated_maze_is_connected_with_entrance_and_exit() {
        let mut rng = StdRng::seed_from_u64(7);
        let maze = Maze::generate(12, 9, 0.0, &mut rng).unwrap();
        assert_eq!(reachable_cells(&maze), 12 * 9);
        assert!(maze.is_open(Side::Left, 0, 0));
        assert!(maze.is_open(Side::Right, 11, 8));
        assert!(!maze.is_open(Side::Up, 5, 0));
    }

    #[test]
    fn perfect_maze_has_one_door_less_than_cells() {
        let mut rng = StdRng::seed_from_u64(11);
        let maze = Maze::generate(8, 8, 0.0, &mut rng).unwrap();
        let interior_doors: usize = (0..8)
            .flat_map(|y| (0..8).map(move |x| (x, y)))
            .map(|(x, y)| {
                let sides = maze.open_sides(x, y).unwrap();
                usize::from(sides.contains(Side::Right) && x < 7)
                    + usize::from(sides.contains(Side::Down) && y < 7)
            })
            .sum();
        assert_eq!(interior_doors, 8 * 8 - 1);
    }

    #[test]
    fn shortcuts_only_add_doors() {
        let base = Maze::generate(6, 6, 0.0, &mut StdRng::seed_from_u64(3)).unwrap();
        let cut = Maze::generate(6, 6, 0.5, &mut StdRng::seed_from_u64(3)).unwrap();
        let mut extra = 0;
        for y in 0..6 {
            for x in 0..6 {
                let (a, b) = (base.open_sides(x, y).unwrap(), cut.open_sides(x, y).unwrap());
                assert!(a.iter().all(|s| b.contains(s)));
                extra += b.iter().count() - a.iter().count();
            }
        }
        assert!(extra > 0);
        // Boundary walls other than entrance and exit stay closed.
        for x in 0..6 {
            assert!(!cut.is_open(Side::Up, x, 0));
            assert!(!cut.is_open(Side::Down, x, 5));
        }
    }

    #[test]
    fn shared_walls_stay_consistent() {
        let maze = Maze::generate(7, 5, 0.3, &mut StdRng::seed_from_u64(99)).unwrap();
        for y in 0..5u32 {
            for x in 0..7u32 {
                for side in Side::ALL {
                    if let Some((nx, ny)) = maze.neighbor(x, y, side) {
                        assert_eq!(
                            maze.is_open(side, x as i64, y as i64),
                            maze.is_open(side.opposite(), nx as i64, ny as i64),
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn side_set_corners() {
        let set: SideSet = [Side::Left, Side::Down].into_iter().collect();
        assert_eq!(set.corners().collect::<Vec<_>>(), vec![Corner::DownLeft]);
        assert_eq!(SideSet::EMPTY.with(Side::Up).corners().count(), 0);
        assert_eq!(format!("{set:?}"), "{Left, Down}");
    }

    #[test]
    fn display_draws_walls_and_doors() {
        let mut maze = Maze::new(2, 1).unwrap();
        maze.open_door(0, 0, Side::Right).unwrap();
        maze.open_door(0, 0, Side::Left).unwrap();
        assert_eq!(maze.to_string(), "+--+--+\n      |\n+--+--+\n");
    }
}
