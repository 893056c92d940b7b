use pathviz_core::{GridModel, Point};

const CARDINAL: [Point; 4] = [
    Point::new(0, -1),
    Point::new(1, 0),
    Point::new(0, 1),
    Point::new(-1, 0),
];

/// Which cells count as neighbors of a grid cell.
///
/// With diagonals the eight surrounding offsets are examined in row-major
/// order; without them the four cardinal offsets (up, right, down, left).
/// Out-of-bounds and blocked cells are never neighbors.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct NeighborPolicy {
    pub diagonal: bool,
}

impl NeighborPolicy {
    pub const fn new(diagonal: bool) -> Self {
        Self { diagonal }
    }

    /// Append the passable neighbors of `p` into `buf`. The caller clears
    /// `buf` before calling.
    pub fn neighbors(&self, grid: &GridModel, p: Point, buf: &mut Vec<Point>) {
        if self.diagonal {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    if dx == 0 && dy == 0 {
                        continue;
                    }
                    let n = p.shift(dx, dy);
                    if grid.is_passable(n) {
                        buf.push(n);
                    }
                }
            }
        } else {
            for d in CARDINAL {
                let n = p + d;
                if grid.is_passable(n) {
                    buf.push(n);
                }
            }
        }
    }
}
