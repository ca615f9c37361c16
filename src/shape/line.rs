//! Points spaced evenly along a segment

use glam::DVec2;

use super::defaults;
use super::{Generator, ParamMeta, ParamReader, Parameters};
use crate::errors::ShapeError;

const META: &[ParamMeta] = &[
    ParamMeta { name: "count", label: "Count", description: "How many points to generate" },
    ParamMeta { name: "start_x", label: "Start X", description: "Horizontal position of the first point" },
    ParamMeta { name: "start_y", label: "Start Y", description: "Vertical position of the first point" },
    ParamMeta { name: "end_x", label: "End X", description: "Horizontal position of the last point" },
    ParamMeta { name: "end_y", label: "End Y", description: "Vertical position of the last point" },
];

/// `count` points from start to end, both ends included.
/// A single point sits on the start.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Line;

impl Generator for Line {
    fn tag(&self) -> &'static str {
        "line"
    }

    fn label(&self) -> &'static str {
        "Line"
    }

    fn metadata(&self) -> &'static [ParamMeta] {
        META
    }

    fn defaults(&self) -> Parameters {
        Parameters::new()
            .with("count", defaults::LINE_COUNT)
            .with("start_x", defaults::LINE_START_X)
            .with("start_y", 0.0)
            .with("end_x", defaults::LINE_END_X)
            .with("end_y", 0.0)
    }

    fn positions(&self, params: &Parameters) -> Result<Vec<DVec2>, ShapeError> {
        let p = ParamReader::new(self.tag(), params);
        let count = p.count("count", 1)?;
        let start = p.point("start_x", "start_y")?;
        let end = p.point("end_x", "end_y")?;

        if count == 1 {
            return Ok(vec![start]);
        }
        let last = (count - 1) as f64;
        Ok((0..count)
            .map(|i| {
                // Pin the final point to the exact end instead of trusting lerp.
                if i == count - 1 { end } else { start.lerp(end, i as f64 / last) }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    fn line(count: f64, from: (f64, f64), to: (f64, f64)) -> Parameters {
        Line.defaults()
            .with("count", count)
            .with("start_x", from.0)
            .with("start_y", from.1)
            .with("end_x", to.0)
            .with("end_y", to.1)
    }

    #[test]
    fn endpoints_included() {
        let pts = Line.positions(&line(5.0, (0.0, 0.0), (4.0, 8.0))).unwrap();
        assert_eq!(
            pts,
            vec![
                dvec2(0.0, 0.0),
                dvec2(1.0, 2.0),
                dvec2(2.0, 4.0),
                dvec2(3.0, 6.0),
                dvec2(4.0, 8.0),
            ]
        );
    }

    #[test]
    fn single_point_is_start() {
        let pts = Line.positions(&line(1.0, (3.0, -1.0), (9.0, 9.0))).unwrap();
        assert_eq!(pts, vec![dvec2(3.0, -1.0)]);
    }

    #[test]
    fn zero_count_rejected() {
        assert!(Line.positions(&line(0.0, (0.0, 0.0), (1.0, 1.0))).is_err());
    }

    #[test]
    fn degenerate_segment_repeats_point() {
        let pts = Line.positions(&line(3.0, (2.0, 2.0), (2.0, 2.0))).unwrap();
        assert!(pts.iter().all(|p| *p == dvec2(2.0, 2.0)));
    }
}
