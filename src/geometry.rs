use crate::error::{FocusError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Точка в экранных координатах
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Прямоугольник окна в экранных координатах (left, top, right, bottom).
///
/// Coordinates are in whatever pixel space the process negotiated at startup;
/// consumers never rescale them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self { left, top, right, bottom }
    }

    pub fn width(&self) -> i64 {
        i64::from(self.right) - i64::from(self.left)
    }

    pub fn height(&self) -> i64 {
        i64::from(self.bottom) - i64::from(self.top)
    }

    /// Прямоугольник с нулевой или отрицательной площадью недопустим
    pub fn is_valid(&self) -> bool {
        self.width() > 0 && self.height() > 0
    }

    pub fn validated(self) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(FocusError::InvalidGeometry(self))
        }
    }

    /// Inclusive on all four edges.
    pub fn contains(&self, point: Point) -> bool {
        (self.left..=self.right).contains(&point.x) && (self.top..=self.bottom).contains(&point.y)
    }

    /// Целочисленный центр, деление с округлением вниз
    pub fn center(&self) -> Point {
        let cx = i64::from(self.left) + self.width().div_euclid(2);
        let cy = i64::from(self.top) + self.height().div_euclid(2);
        // Центр всегда лежит между краями, поэтому помещается в i32
        Point::new(cx as i32, cy as i32)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}] {}x{}",
            self.left,
            self.top,
            self.right,
            self.bottom,
            self.width(),
            self.height()
        )
    }
}
