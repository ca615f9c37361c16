//! Strongly-typed numeric primitives (zero-cost newtypes).
//!
//! Raw `f64`s coming from users are checked once at the boundary and carried
//! as validated values afterwards.

use std::fmt;

use crate::errors::ShapeError;

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is negative when non-negative required
    Negative,
    /// Value has a fractional part when an integer is required
    NotInteger,
    /// Value is below the allowed minimum
    BelowMinimum(f64),
    /// Value is above the allowed maximum
    AboveMaximum(f64),
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Negative => write!(f, "value is negative"),
            NumericError::NotInteger => write!(f, "value is not an integer"),
            NumericError::BelowMinimum(min) => write!(f, "value is below the minimum of {}", min),
            NumericError::AboveMaximum(max) => write!(f, "value is above the maximum of {}", max),
        }
    }
}

impl std::error::Error for NumericError {}

/// Reject NaN and infinities
#[inline]
pub fn check_finite(val: f64) -> Result<f64, NumericError> {
    if val.is_nan() {
        Err(NumericError::NaN)
    } else if val.is_infinite() {
        Err(NumericError::Infinite)
    } else {
        Ok(val)
    }
}

/// Reject non-finite and negative values
#[inline]
pub fn check_non_negative(val: f64) -> Result<f64, NumericError> {
    let val = check_finite(val)?;
    if val < 0.0 {
        Err(NumericError::Negative)
    } else {
        Ok(val)
    }
}

/// Require a finite integer no smaller than `min`
#[inline]
pub fn check_integer_at_least(val: f64, min: f64) -> Result<f64, NumericError> {
    let val = check_finite(val)?;
    if val.fract() != 0.0 {
        Err(NumericError::NotInteger)
    } else if val < min {
        Err(NumericError::BelowMinimum(min))
    } else {
        Ok(val)
    }
}

/// Angle in degrees, clockwise from north. Unbounded: wraparound is handled
/// by the trigonometry, not by clamping.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[repr(transparent)]
pub struct Degrees(pub f64);

impl Degrees {
    #[inline]
    pub fn radians(self) -> f64 {
        self.0.to_radians()
    }

    /// Offset from a center for a point at this heading and distance,
    /// in screen space (x right, y down).
    #[inline]
    pub fn heading(self, distance: f64) -> glam::DVec2 {
        let (sin, cos) = self.radians().sin_cos();
        glam::dvec2(sin * distance, -cos * distance)
    }
}

impl std::ops::Add for Degrees {
    type Output = Degrees;
    fn add(self, rhs: Degrees) -> Degrees { Degrees(self.0 + rhs.0) }
}

impl fmt::Display for Degrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

/// Maximum distance at which two points count as duplicates
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[repr(transparent)]
pub struct Tolerance(f64);

impl Tolerance {
    /// Only exactly coincident points are merged
    pub const ZERO: Tolerance = Tolerance(0.0);

    /// Create a Tolerance with validation (rejects NaN, infinite and negative)
    pub fn new(val: f64) -> Result<Tolerance, ShapeError> {
        check_non_negative(val)
            .map(Tolerance)
            .map_err(|reason| ShapeError::invalid("dedupe", "tolerance", val, reason))
    }

    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }

    /// Whether two points `distance` apart are merged (boundary inclusive)
    #[inline]
    pub fn covers(self, distance: f64) -> bool {
        distance <= self.0
    }
}

impl fmt::Display for Tolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Number of decimal digits kept in exported coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Precision(u32);

impl Precision {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 5;

    /// Create a Precision with validation (1 through 5 digits)
    pub fn new(digits: u32) -> Result<Precision, ShapeError> {
        let reason = if digits < Self::MIN {
            NumericError::BelowMinimum(Self::MIN as f64)
        } else if digits > Self::MAX {
            NumericError::AboveMaximum(Self::MAX as f64)
        } else {
            return Ok(Precision(digits));
        };
        Err(ShapeError::invalid("export", "precision", digits as f64, reason))
    }

    #[inline]
    pub fn digits(self) -> u32 {
        self.0
    }
}

impl Default for Precision {
    fn default() -> Self {
        Precision(Self::MAX)
    }
}
