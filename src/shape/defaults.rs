//! Default parameter values for the built-in shapes

// Circle
pub const CIRCLE_COUNT: f64 = 12.0;
pub const CIRCLE_RADIUS: f64 = 5.0;
pub const CIRCLE_START: f64 = 0.0;
/// Percent; 100 is a true circle
pub const CIRCLE_ELLIPSE: f64 = 100.0;
pub const CIRCLE_ROTATE: f64 = 0.0;

// Line
pub const LINE_COUNT: f64 = 11.0;
pub const LINE_START_X: f64 = -5.0;
pub const LINE_END_X: f64 = 5.0;

// Polygon
pub const POLYGON_VERTICES: f64 = 5.0;
pub const POLYGON_COUNT: f64 = 4.0;
pub const POLYGON_RADIUS: f64 = 5.0;
pub const POLYGON_START: f64 = 0.0;
