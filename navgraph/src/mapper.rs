use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::geometry::Location;

/// Index of a grid cell
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan distance between two cells, the number of 4-neighbour hops in an open grid
    pub fn manhattan(&self, other: Point) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[row {}, col {}]", self.row, self.col)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// The order in which neighbours are recorded in the adjacency table.
    /// Search explores neighbours in this order, so it decides the parent on ties.
    pub const NEIGHBOUR_ORDER: [Direction; 4] = [
        Direction::Left,
        Direction::Up,
        Direction::Right,
        Direction::Down,
    ];
}

/// Converts between map coordinates and grid indices for a canvas split into square cells
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CoordinateMapper {
    cell_size: f32,
    columns: usize,
    rows: usize,
}

impl CoordinateMapper {
    /// Covers a `width` x `height` canvas with `ceil(width / cell_size)` columns and
    /// `ceil(height / cell_size)` rows. Callers validate the inputs.
    ///
    /// Returns `None` when the number of slots does not fit in a `usize`.
    pub fn new(width: f32, height: f32, cell_size: f32) -> Option<Self> {
        let columns = (width / cell_size).ceil() as usize;
        let rows = (height / cell_size).ceil() as usize;
        columns.checked_mul(rows)?;

        Some(Self {
            cell_size,
            columns,
            rows,
        })
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Total number of grid slots
    pub fn len(&self) -> usize {
        self.columns * self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, point: Point) -> bool {
        point.row < self.rows && point.col < self.columns
    }

    /// The cell covering `location`, or `None` when the location lies outside the grid
    pub fn to_index(&self, location: Location) -> Option<Point> {
        let col = (location.x / self.cell_size).floor();
        let row = (location.y / self.cell_size).floor();

        // also rejects NaN
        if !(col >= 0.0 && row >= 0.0) {
            return None;
        }

        let point = Point {
            row: row as usize,
            col: col as usize,
        };

        self.contains(point).then_some(point)
    }

    /// The anchor (top-left corner) of a cell in map space
    pub fn to_location(&self, point: Point) -> Location {
        Location {
            x: point.col as f32 * self.cell_size,
            y: point.row as f32 * self.cell_size,
        }
    }

    /// Position of a cell in a row-major flat array
    pub fn slot(&self, point: Point) -> usize {
        point.row * self.columns + point.col
    }

    /// Inverse of [`CoordinateMapper::slot`]
    pub fn point_of(&self, slot: usize) -> Point {
        Point {
            row: slot / self.columns,
            col: slot % self.columns,
        }
    }

    /// The cell next to `point` in the given direction, if it is inside the grid
    pub fn step(&self, point: Point, direction: Direction) -> Option<Point> {
        let next = match direction {
            Direction::Up => Point {
                row: point.row.checked_sub(1)?,
                col: point.col,
            },
            Direction::Left => Point {
                row: point.row,
                col: point.col.checked_sub(1)?,
            },
            Direction::Down => Point {
                row: point.row + 1,
                col: point.col,
            },
            Direction::Right => Point {
                row: point.row,
                col: point.col + 1,
            },
        };

        self.contains(next).then_some(next)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_dimensions_round_up() {
        let mapper = CoordinateMapper::new(95.0, 100.0, 10.0).unwrap();
        assert_eq!(mapper.columns(), 10);
        assert_eq!(mapper.rows(), 10);
        assert_eq!(mapper.len(), 100);

        let mapper = CoordinateMapper::new(101.0, 0.0, 10.0).unwrap();
        assert_eq!(mapper.columns(), 11);
        assert_eq!(mapper.rows(), 0);
        assert!(mapper.is_empty());
    }

    #[test]
    fn test_slot_count_overflow() {
        assert_eq!(CoordinateMapper::new(1e30, 1e30, 10.0), None);
        assert_eq!(CoordinateMapper::new(100.0, 100.0, 1e-30), None);
        // saturated columns are fine as long as there are no rows
        assert!(CoordinateMapper::new(1e30, 0.0, 10.0).is_some());
    }

    #[test]
    fn test_location_to_index() {
        let mapper = CoordinateMapper::new(100.0, 50.0, 10.0).unwrap();

        assert_eq!(
            mapper.to_index(Location::new(5.0, 5.0)),
            Some(Point { row: 0, col: 0 })
        );
        assert_eq!(
            mapper.to_index(Location::new(10.0, 49.9)),
            Some(Point { row: 4, col: 1 })
        );
        assert_eq!(mapper.to_index(Location::new(100.0, 5.0)), None);
        assert_eq!(mapper.to_index(Location::new(5.0, 50.0)), None);
        assert_eq!(mapper.to_index(Location::new(-0.5, 5.0)), None);
        assert_eq!(mapper.to_index(Location::new(f32::NAN, 5.0)), None);
    }

    #[test]
    fn test_anchor_and_slot() {
        let mapper = CoordinateMapper::new(100.0, 50.0, 10.0).unwrap();
        let point = Point { row: 3, col: 7 };

        assert_eq!(mapper.to_location(point), Location::new(70.0, 30.0));
        assert_eq!(mapper.slot(point), 37);
        assert_eq!(mapper.point_of(37), point);
        assert_eq!(mapper.to_index(mapper.to_location(point)), Some(point));
    }

    #[test]
    fn test_step_stops_at_boundary() {
        let mapper = CoordinateMapper::new(30.0, 30.0, 10.0).unwrap();
        let corner = Point { row: 0, col: 0 };

        assert_eq!(mapper.step(corner, Direction::Left), None);
        assert_eq!(mapper.step(corner, Direction::Up), None);
        assert_eq!(
            mapper.step(corner, Direction::Right),
            Some(Point { row: 0, col: 1 })
        );
        assert_eq!(
            mapper.step(corner, Direction::Down),
            Some(Point { row: 1, col: 0 })
        );
        assert_eq!(mapper.step(Point { row: 2, col: 2 }, Direction::Right), None);
        assert_eq!(mapper.step(Point { row: 2, col: 2 }, Direction::Down), None);
    }
}
