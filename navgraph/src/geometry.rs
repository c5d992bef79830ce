use std::{
    fmt::Display,
    ops::{Add, Mul, Sub},
};

use serde::{Deserialize, Serialize};

/// A position in map space (the coordinate system of the source drawing)
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub x: f32,
    pub y: f32,
}

impl Location {
    pub const ORIGIN: Location = Location { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The vector pointing from this location to `other`
    pub fn vector_to(self, other: Location) -> Vector {
        other - self
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A displacement in map space
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vector {
    pub dx: f32,
    pub dy: f32,
}

impl Vector {
    pub fn new(dx: f32, dy: f32) -> Self {
        Self { dx, dy }
    }

    pub fn length(&self) -> f32 {
        self.dx.hypot(self.dy)
    }
}

impl Sub for Location {
    type Output = Vector;

    fn sub(self, rhs: Location) -> Vector {
        Vector {
            dx: self.x - rhs.x,
            dy: self.y - rhs.y,
        }
    }
}

impl Add<Vector> for Location {
    type Output = Location;

    fn add(self, rhs: Vector) -> Location {
        Location {
            x: self.x + rhs.dx,
            y: self.y + rhs.dy,
        }
    }
}

impl Mul<f32> for Vector {
    type Output = Vector;

    fn mul(self, rhs: f32) -> Vector {
        Vector {
            dx: self.dx * rhs,
            dy: self.dy * rhs,
        }
    }
}

/// One straight stroke of a wall, in absolute map coordinates
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Location,
    pub end: Location,
}

impl Segment {
    pub fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }

    pub fn vector(&self) -> Vector {
        self.start.vector_to(self.end)
    }

    pub fn length(&self) -> f32 {
        self.vector().length()
    }
}
