use crate::error::Error;
use ordered_float::NotNan;
use std::ops::Sub;

/// A location in normalized image space.
///
/// Both axes run over `[0, 1]` with the origin at the bottom-left corner of
/// the frame, so a larger `y` is visually higher.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Result<Self, Error> {
        Ok(Self {
            x: NotNan::new(x)
                .map_err(|e| Error::ConstructNotNan(e, x))?
                .into_inner(),
            y: NotNan::new(y)
                .map_err(|e| Error::ConstructNotNan(e, y))?
                .into_inner(),
        })
    }

    /// Normalize a pixel coordinate with a top-left origin.
    pub fn from_image(x: f32, y: f32, width: u16, height: u16) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::ZeroFrameDimensions(width, height));
        }
        let width = f32::from(width);
        let height = f32::from(height);
        Self::new(x / width, 1.0 - y / height)
    }

    /// Whether both axes are within `tolerance` of `other`.
    ///
    /// This is a per-axis box test, not a euclidean radius.
    pub fn is_near(self, other: Self, tolerance: f32) -> bool {
        let delta = self - other;
        delta.x.abs() < tolerance && delta.y.abs() < tolerance
    }

    #[inline]
    pub fn x(self) -> f32 {
        self.x
    }

    #[inline]
    pub fn y(self) -> f32 {
        self.y
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::Output {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Point;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn xy_points() {
        let a = Point::new(0.5, 0.5).unwrap();
        let b = Point::new(1.0, 0.75).unwrap();
        assert_eq!(b - a, Point::new(0.5, 0.25).unwrap());
    }

    #[test]
    fn nan_is_rejected() {
        assert!(Point::new(f32::NAN, 0.5).is_err());
        assert!(Point::new(0.5, f32::NAN).is_err());
    }

    #[test]
    fn near_is_per_axis() {
        let shoulder = Point::new(0.5, 0.5).unwrap();
        assert!(Point::new(0.59, 0.41).unwrap().is_near(shoulder, 0.1));
        assert!(!Point::new(0.5, 0.61).unwrap().is_near(shoulder, 0.1));
        assert!(!Point::new(0.61, 0.5).unwrap().is_near(shoulder, 0.1));
    }

    #[test]
    fn from_image_flips_y() {
        let p = Point::from_image(160.0, 120.0, 640, 480).unwrap();
        assert_approx_eq!(p.x(), 0.25);
        assert_approx_eq!(p.y(), 0.75);
    }

    #[test]
    fn from_image_rejects_empty_frame() {
        assert!(Point::from_image(1.0, 1.0, 0, 480).is_err());
    }
}
