use crate::Errors;
use geo::{Coord, EuclideanDistance, EuclideanLength, Line, Point};

/// Gate line in frame pixel coordinates
pub type GateLine = Line<f64>;

pub fn line_length(line: &Line<f64>) -> f64 {
    line.euclidean_length()
}

pub fn midpoint(line: &Line<f64>) -> Point<f64> {
    Point::from((line.start + line.end) / 2.0)
}

/// Fails with [Errors::GeometryDegenerateInput] when the gate endpoints coincide
///
pub fn validate_gate(line: &Line<f64>) -> anyhow::Result<()> {
    if line_length(line) <= f64::EPSILON {
        return Err(Errors::GeometryDegenerateInput(
            line.start.x,
            line.start.y,
            line.end.x,
            line.end.y,
        )
        .into());
    }
    Ok(())
}

/// Slope of the line (`rise / run`), `None` when the line is vertical
///
pub fn slope(line: &Line<f64>) -> Option<f64> {
    let run = line.dx();
    if run == 0.0 {
        None
    } else {
        Some(line.dy() / run)
    }
}

/// Extends the line on both sides by `percent` of its length along its own direction.
///
/// The line keeps its midpoint; the result is `1 + 2 * percent` times as long as the source.
///
pub fn extend(line: &Line<f64>, percent: f64) -> Line<f64> {
    let d = line.delta() * percent;
    Line::new(line.start - d, line.end + d)
}

/// The same segment with endpoints ordered by `x`, then by `y`
///
fn canonical(line: &Line<f64>) -> Line<f64> {
    if (line.end.x, line.end.y) < (line.start.x, line.start.y) {
        Line::new(line.end, line.start)
    } else {
        *line
    }
}

/// Perpendicular bisector of a gate line.
///
/// Both endpoints are symmetric about the gate midpoint. The axis depends on the gate segment
/// only, not on the order its endpoints were given in. `slope_sign` is `+1` when the
/// perpendicular slope is non-negative (or undefined) and `-1` otherwise; the gate model uses it
/// to fix which side of the gate is positive.
///
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceAxis {
    start: Point<f64>,
    end: Point<f64>,
    slope_sign: i8,
}

impl ReferenceAxis {
    pub fn perpendicular(line: &Line<f64>) -> Self {
        let line = &canonical(line);
        let c = midpoint(line);
        let d = c.euclidean_distance(&Point::from(line.start));
        match slope(line) {
            None => Self {
                start: Point::new(c.x() - d, c.y()),
                end: Point::new(c.x() + d, c.y()),
                slope_sign: 1,
            },
            Some(a) if a == 0.0 => Self {
                start: Point::new(c.x(), c.y() - d),
                end: Point::new(c.x(), c.y() + d),
                slope_sign: 1,
            },
            Some(a) => {
                let pa = -1.0 / a;
                let k = c.y() - pa * c.x();
                let x1 = (line.start.x + c.x()) / 2.0;
                let x2 = (c.x() + line.end.x) / 2.0;
                Self {
                    start: Point::new(x1, pa * x1 + k),
                    end: Point::new(x2, pa * x2 + k),
                    slope_sign: if pa >= 0.0 { 1 } else { -1 },
                }
            }
        }
    }

    pub fn start(&self) -> Point<f64> {
        self.start
    }

    pub fn end(&self) -> Point<f64> {
        self.end
    }

    pub fn slope_sign(&self) -> i8 {
        self.slope_sign
    }

    /// Unsigned length of the projection of `point - origin` onto the axis direction.
    ///
    /// Zero for a degenerate (zero length) axis.
    ///
    pub fn projected_distance(&self, origin: &Point<f64>, point: &Point<f64>) -> f64 {
        let axis: Coord<f64> = self.end.0 - self.start.0;
        let len = (axis.x * axis.x + axis.y * axis.y).sqrt();
        if len <= f64::EPSILON {
            return 0.0;
        }
        let v: Coord<f64> = point.0 - origin.0;
        ((v.x * axis.x + v.y * axis.y) / len).abs()
    }
}

#[cfg(test)]
mod tests {
    use crate::utils::geometry::{
        extend, line_length, midpoint, slope, validate_gate, ReferenceAxis,
    };
    use geo::{Line, Point};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn basics() {
        let l = Line::new((0.0, 100.0), (200.0, 100.0));
        assert!(close(line_length(&l), 200.0));
        assert_eq!(midpoint(&l), Point::new(100.0, 100.0));
        assert_eq!(slope(&l), Some(0.0));
        assert_eq!(slope(&Line::new((5.0, 0.0), (5.0, 10.0))), None);
    }

    #[test]
    fn gate_validation() {
        assert!(validate_gate(&Line::new((0.0, 100.0), (200.0, 100.0))).is_ok());
        assert!(validate_gate(&Line::new((3.0, 4.0), (3.0, 4.0))).is_err());
    }

    #[test]
    fn extension_keeps_midpoint() {
        let l = Line::new((0.0, 100.0), (200.0, 100.0));
        let e = extend(&l, 0.3);
        assert!(close(line_length(&e), 320.0));
        assert_eq!(midpoint(&e), midpoint(&l));
        assert!(close(e.start.x, -60.0));
        assert!(close(e.end.x, 260.0));
    }

    #[test]
    fn horizontal_gate_axis() {
        let axis = ReferenceAxis::perpendicular(&Line::new((0.0, 100.0), (200.0, 100.0)));
        assert_eq!(axis.start(), Point::new(100.0, 0.0));
        assert_eq!(axis.end(), Point::new(100.0, 200.0));
        assert_eq!(axis.slope_sign(), 1);
    }

    #[test]
    fn vertical_gate_axis() {
        let axis = ReferenceAxis::perpendicular(&Line::new((50.0, 0.0), (50.0, 100.0)));
        assert_eq!(axis.start(), Point::new(0.0, 50.0));
        assert_eq!(axis.end(), Point::new(100.0, 50.0));
        assert_eq!(axis.slope_sign(), 1);
    }

    #[test]
    fn diagonal_gate_axis() {
        let axis = ReferenceAxis::perpendicular(&Line::new((0.0, 0.0), (200.0, 200.0)));
        assert!(close(axis.start().x(), 50.0) && close(axis.start().y(), 150.0));
        assert!(close(axis.end().x(), 150.0) && close(axis.end().y(), 50.0));
        assert_eq!(axis.slope_sign(), -1);

        let axis = ReferenceAxis::perpendicular(&Line::new((0.0, 200.0), (200.0, 0.0)));
        assert_eq!(axis.slope_sign(), 1);
    }

    #[test]
    fn axis_ignores_drawing_order() {
        let gates = [
            Line::new((0.0, 0.0), (200.0, 200.0)),
            Line::new((0.0, 200.0), (200.0, 0.0)),
            Line::new((50.0, 0.0), (50.0, 300.0)),
            Line::new((0.0, 100.0), (200.0, 100.0)),
            Line::new((640.0, 100.0), (20.0, 130.0)),
        ];
        for line in gates {
            let reversed = Line::new(line.end, line.start);
            assert_eq!(
                ReferenceAxis::perpendicular(&line),
                ReferenceAxis::perpendicular(&reversed),
                "{:?}",
                line
            );
        }
    }

    #[test]
    fn projection() {
        let axis = ReferenceAxis::perpendicular(&Line::new((0.0, 100.0), (200.0, 100.0)));
        let origin = Point::new(100.0, 100.0);
        assert!(close(
            axis.projected_distance(&origin, &Point::new(130.0, 180.0)),
            80.0
        ));
        assert!(close(
            axis.projected_distance(&origin, &Point::new(0.0, 100.0)),
            0.0
        ));
    }

    #[test]
    fn degenerate_axis() {
        let axis = ReferenceAxis::perpendicular(&Line::new((10.0, 10.0), (10.0, 10.0)));
        assert_eq!(axis.start(), axis.end());
        assert_eq!(
            axis.projected_distance(&Point::new(10.0, 10.0), &Point::new(50.0, 50.0)),
            0.0
        );
    }
}
