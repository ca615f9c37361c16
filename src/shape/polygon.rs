//! Points spaced evenly along the edges of a regular polygon

use glam::DVec2;

use super::defaults;
use super::{Generator, ParamMeta, ParamReader, Parameters};
use crate::errors::ShapeError;
use crate::types::Degrees;

const META: &[ParamMeta] = &[
    ParamMeta { name: "vertices", label: "Vertices", description: "Number of corners" },
    ParamMeta { name: "count", label: "Points per edge", description: "How many points to place on each edge" },
    ParamMeta { name: "center_x", label: "Center X", description: "Horizontal center of the polygon" },
    ParamMeta { name: "center_y", label: "Center Y", description: "Vertical center of the polygon" },
    ParamMeta { name: "radius", label: "Radius", description: "Distance of the corners from the center" },
    ParamMeta { name: "start", label: "Start angle", description: "Angle of the first corner, clockwise from north" },
];

/// A regular polygon traced corner to corner.
///
/// Each edge contributes `count` points starting at its first corner; the
/// closing corner belongs to the next edge, so no corner is emitted twice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Polygon;

impl Generator for Polygon {
    fn tag(&self) -> &'static str {
        "polygon"
    }

    fn label(&self) -> &'static str {
        "Polygon"
    }

    fn metadata(&self) -> &'static [ParamMeta] {
        META
    }

    fn defaults(&self) -> Parameters {
        Parameters::new()
            .with("vertices", defaults::POLYGON_VERTICES)
            .with("count", defaults::POLYGON_COUNT)
            .with("center_x", 0.0)
            .with("center_y", 0.0)
            .with("radius", defaults::POLYGON_RADIUS)
            .with("start", defaults::POLYGON_START)
    }

    fn positions(&self, params: &Parameters) -> Result<Vec<DVec2>, ShapeError> {
        let p = ParamReader::new(self.tag(), params);
        let vertices = p.count("vertices", 3)?;
        let count = p.count("count", 1)?;
        let total = p.total_points("count", count, vertices)?;
        let center = p.point("center_x", "center_y")?;
        let radius = p.non_negative("radius")?;
        let start = Degrees(p.finite("start")?);

        let step = 360.0 / vertices as f64;
        let corners: Vec<DVec2> = (0..vertices)
            .map(|k| center + (start + Degrees(k as f64 * step)).heading(radius))
            .collect();

        let mut out = Vec::with_capacity(total);
        for (k, &from) in corners.iter().enumerate() {
            let to = corners[(k + 1) % corners.len()];
            for j in 0..count {
                out.push(from.lerp(to, j as f64 / count as f64));
            }
        }
        Ok(out)
    }
}
