use crate::EstimateClose;
use geo::Point;
use serde::Deserialize;

/// Bounding box in the format (x,y, width, height), frame pixel coordinates
///
#[derive(Clone, Default, Debug, Copy, PartialEq)]
pub struct BoundingBox {
    _x: f32,
    _y: f32,
    _width: f32,
    _height: f32,
}

/// The point of a bounding box that represents the subject position on the floor plane
///
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    /// Middle of the bottom edge - where the feet of a standing person are
    #[default]
    BottomCenter,
    Center,
}

impl BoundingBox {
    /// Constructor
    ///
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            _x: x,
            _y: y,
            _width: width,
            _height: height,
        }
    }

    /// Constructor from the corners (left, top, right, bottom)
    ///
    pub fn ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    pub fn x(&self) -> f32 {
        self._x
    }

    pub fn y(&self) -> f32 {
        self._y
    }

    pub fn width(&self) -> f32 {
        self._width
    }

    pub fn height(&self) -> f32 {
        self._height
    }

    pub fn right(&self) -> f32 {
        self._x + self._width
    }

    pub fn bottom(&self) -> f32 {
        self._y + self._height
    }

    pub fn area(&self) -> f32 {
        self._width * self._height
    }

    pub fn center(&self) -> Point<f64> {
        Point::new(
            (self._x + self._width / 2.0) as f64,
            (self._y + self._height / 2.0) as f64,
        )
    }

    pub fn foot_point(&self) -> Point<f64> {
        Point::new((self._x + self._width / 2.0) as f64, self.bottom() as f64)
    }

    pub fn anchor(&self, anchor: Anchor) -> Point<f64> {
        match anchor {
            Anchor::BottomCenter => self.foot_point(),
            Anchor::Center => self.center(),
        }
    }
}

impl EstimateClose for BoundingBox {
    /// Allows comparing bboxes
    ///
    fn almost_same(&self, other: &Self, eps: f32) -> bool {
        (self._x - other._x).abs() < eps
            && (self._y - other._y).abs() < eps
            && (self._width - other._width).abs() < eps
            && (self._height - other._height).abs() < eps
    }
}
