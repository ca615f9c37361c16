//! Points spaced evenly around a circle

use glam::DVec2;

use super::defaults;
use super::{Generator, ParamMeta, ParamReader, Parameters};
use crate::errors::ShapeError;
use crate::types::Degrees;

const META: &[ParamMeta] = &[
    ParamMeta { name: "count", label: "Count", description: "How many points to generate" },
    ParamMeta { name: "center_x", label: "Center X", description: "Horizontal center of the circle" },
    ParamMeta { name: "center_y", label: "Center Y", description: "Vertical center of the circle" },
    ParamMeta { name: "radius", label: "Radius", description: "Distance of the points from the center" },
    ParamMeta { name: "start", label: "Start angle", description: "Angle of the first point, clockwise from north" },
    ParamMeta { name: "ellipse", label: "Ellipse", description: "Strength of the elliptical distortion, in percent" },
    ParamMeta { name: "rotate", label: "Rotation", description: "Rotation of the ellipse; does not move the start angle" },
];

/// A circle of `count` points starting at `start` degrees from north and
/// proceeding clockwise.
///
/// `ellipse` and `rotate` are validated and stored but do not yet affect the
/// generated coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Circle;

impl Generator for Circle {
    fn tag(&self) -> &'static str {
        "circle"
    }

    fn label(&self) -> &'static str {
        "Circle"
    }

    fn metadata(&self) -> &'static [ParamMeta] {
        META
    }

    fn defaults(&self) -> Parameters {
        Parameters::new()
            .with("count", defaults::CIRCLE_COUNT)
            .with("center_x", 0.0)
            .with("center_y", 0.0)
            .with("radius", defaults::CIRCLE_RADIUS)
            .with("start", defaults::CIRCLE_START)
            .with("ellipse", defaults::CIRCLE_ELLIPSE)
            .with("rotate", defaults::CIRCLE_ROTATE)
    }

    fn positions(&self, params: &Parameters) -> Result<Vec<DVec2>, ShapeError> {
        let p = ParamReader::new(self.tag(), params);
        let count = p.count("count", 1)?;
        let center = p.point("center_x", "center_y")?;
        let radius = p.non_negative("radius")?;
        let start = Degrees(p.finite("start")?);
        p.non_negative("ellipse")?;
        p.finite("rotate")?;

        let step = 360.0 / count as f64;
        Ok((0..count)
            .map(|i| center + (start + Degrees(i as f64 * step)).heading(radius))
            .collect())
    }
}
