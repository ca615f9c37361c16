//! Cross-shape point merging
//!
//! Points are visited in composition order, then point order. Each one is
//! either merged into the first already-accepted point within the tolerance
//! or accepted as a new point. Merging keeps the earlier point's position and
//! ORs the selection flags. Points of manipulate shapes never take part.
//!
//! This is a greedy single pass, quadratic in the number of points, which is
//! fine for compositions of a few hundred points and keeps tie-breaking
//! fully deterministic.

use glam::DVec2;

use crate::composition::{Composition, Fingerprint};
use crate::types::Tolerance;

/// Where a candidate point came from
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeContext<'a> {
    /// Position of the shape in its composition
    pub index: usize,
    pub name: &'a str,
    pub selected: bool,
    pub manipulate: bool,
}

/// One point of the canonical output list
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessedPoint {
    pub pos: DVec2,
    pub selected: bool,
    /// Index of the shape that first contributed this point
    pub source_index: usize,
    pub source_name: String,
}

impl ProcessedPoint {
    fn new(pos: DVec2, ctx: &ShapeContext<'_>) -> Self {
        Self {
            pos,
            selected: ctx.selected,
            source_index: ctx.index,
            source_name: ctx.name.to_string(),
        }
    }

    /// Feed this point back in as a dedupe candidate
    pub fn as_candidate(&self) -> (DVec2, ShapeContext<'_>) {
        (
            self.pos,
            ShapeContext {
                index: self.source_index,
                name: &self.source_name,
                selected: self.selected,
                manipulate: false,
            },
        )
    }
}

/// Euclidean distance without underflow, so distinct points never measure 0
#[inline]
fn distance(a: DVec2, b: DVec2) -> f64 {
    let d = a - b;
    d.x.hypot(d.y)
}

/// Merge points closer than `tolerance` (inclusive) into one canonical list.
///
/// Output order is the order in which points were first accepted.
pub fn dedupe<'a, I>(points: I, tolerance: Tolerance) -> Vec<ProcessedPoint>
where
    I: IntoIterator<Item = (DVec2, ShapeContext<'a>)>,
{
    let mut accepted: Vec<ProcessedPoint> = Vec::new();

    for (pos, ctx) in points {
        if ctx.manipulate {
            continue;
        }
        match accepted
            .iter_mut()
            .find(|p| tolerance.covers(distance(p.pos, pos)))
        {
            Some(existing) => {
                crate::log::trace!(from = ctx.index, into = existing.source_index, "point merged");
                existing.selected |= ctx.selected;
            }
            None => accepted.push(ProcessedPoint::new(pos, &ctx)),
        }
    }

    crate::log::debug!(kept = accepted.len(), tolerance = tolerance.raw(), "dedupe finished");
    accepted
}

/// Deduplicated points of one shape
#[derive(Clone, Debug, PartialEq)]
pub struct ProcessedShape {
    pub name: String,
    pub manipulate: bool,
    pub points: Vec<ProcessedPoint>,
}

impl ProcessedShape {
    /// Groups that belong in an export (manipulate shapes removed)
    pub fn exportable(groups: &[ProcessedShape]) -> impl Iterator<Item = &ProcessedShape> {
        groups.iter().filter(|g| !g.manipulate)
    }
}

/// Run [`dedupe`] over a composition and group the result by shape.
///
/// Every shape gets a group, in composition order. Accepted points go to the
/// shape that contributed them first. Manipulate shapes keep all of their
/// points, unmerged, so a UI can still draw them.
pub fn dedupe_grouped(composition: &Composition, tolerance: Tolerance) -> Vec<ProcessedShape> {
    let mut groups: Vec<ProcessedShape> = composition
        .shapes()
        .iter()
        .map(|s| ProcessedShape {
            name: s.name().to_string(),
            manipulate: s.is_manipulate(),
            points: Vec::new(),
        })
        .collect();

    for point in dedupe(composition.candidates(), tolerance) {
        groups[point.source_index].points.push(point);
    }

    for (pos, ctx) in composition.candidates().filter(|(_, ctx)| ctx.manipulate) {
        groups[ctx.index].points.push(ProcessedPoint::new(pos, &ctx));
    }

    groups
}

/// Memoizes [`dedupe_grouped`] on the composition's fingerprint.
///
/// Recomputing is always safe; this only skips work when nothing relevant
/// changed.
#[derive(Debug, Default)]
pub struct DedupeCache {
    key: Option<Fingerprint>,
    groups: Vec<ProcessedShape>,
}

impl DedupeCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&mut self, composition: &Composition, tolerance: Tolerance) -> &[ProcessedShape] {
        let key = composition.fingerprint(tolerance);
        if self.key.as_ref() != Some(&key) {
            crate::log::debug!("dedupe cache miss");
            self.groups = dedupe_grouped(composition, tolerance);
            self.key = Some(key);
        }
        &self.groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;
    use proptest::prelude::*;

    fn ctx(index: usize, selected: bool) -> ShapeContext<'static> {
        ShapeContext { index, name: "s", selected, manipulate: false }
    }

    fn tol(t: f64) -> Tolerance {
        Tolerance::new(t).unwrap()
    }

    #[test]
    fn empty_input_empty_output() {
        assert!(dedupe(Vec::new(), tol(1.0)).is_empty());
    }

    #[test]
    fn first_point_wins_and_selection_is_ored() {
        let input = vec![
            (dvec2(0.0, 0.0), ctx(0, false)),
            (dvec2(0.04, 0.0), ctx(1, true)),
        ];
        let out = dedupe(input, tol(0.05));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].pos, dvec2(0.0, 0.0));
        assert!(out[0].selected);
        assert_eq!(out[0].source_index, 0);
    }

    #[test]
    fn boundary_distance_is_merged() {
        let input = vec![(dvec2(0.0, 0.0), ctx(0, false)), (dvec2(3.0, 4.0), ctx(0, false))];
        assert_eq!(dedupe(input.clone(), tol(5.0)).len(), 1);
        assert_eq!(dedupe(input, tol(4.999)).len(), 2);
    }

    #[test]
    fn zero_tolerance_merges_only_exact_duplicates() {
        let tiny = f64::from_bits(1);
        let input = vec![
            (dvec2(1.0, 1.0), ctx(0, false)),
            (dvec2(1.0, 1.0), ctx(1, false)),
            (dvec2(tiny, 0.0), ctx(1, false)),
            (dvec2(0.0, 0.0), ctx(1, false)),
        ];
        let out = dedupe(input, Tolerance::ZERO);
        assert_eq!(out.len(), 3);
    }

    #[test]
    fn merges_into_first_match_not_nearest() {
        let input = vec![
            (dvec2(0.0, 0.0), ctx(0, false)),
            (dvec2(1.0, 0.0), ctx(0, false)),
            (dvec2(0.9, 0.0), ctx(1, true)),
        ];
        let out = dedupe(input, tol(0.95));
        // (0.9, 0) is nearer to (1, 0) but (0, 0) was accepted first.
        assert_eq!(out.len(), 2);
        assert!(out[0].selected);
        assert!(!out[1].selected);
    }

    #[test]
    fn manipulate_points_never_appear_or_suppress() {
        let manip = ShapeContext { index: 0, name: "handle", selected: true, manipulate: true };
        let input = vec![(dvec2(0.0, 0.0), manip), (dvec2(0.0, 0.0), ctx(1, false))];
        let out = dedupe(input, tol(10.0));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].source_index, 1);
        assert!(!out[0].selected);
    }

    fn arb_points() -> impl Strategy<Value = Vec<(f64, f64, bool, bool)>> {
        prop::collection::vec(
            (-5.0f64..5.0, -5.0f64..5.0, any::<bool>(), prop::bool::weighted(0.2)),
            0..60,
        )
    }

    proptest! {
        #[test]
        fn dedupe_is_idempotent(raw in arb_points(), t in 0.0f64..2.0) {
            let t = tol(t);
            let input: Vec<_> = raw
                .iter()
                .enumerate()
                .map(|(i, &(x, y, sel, manip))| {
                    (dvec2(x, y), ShapeContext { index: i, name: "s", selected: sel, manipulate: manip })
                })
                .collect();
            let once = dedupe(input, t);
            let twice = dedupe(once.iter().map(|p| p.as_candidate()), t);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn manipulate_points_are_never_output(raw in arb_points(), t in 0.0f64..2.0) {
            let input: Vec<_> = raw
                .iter()
                .map(|&(x, y, sel, _)| (dvec2(x, y), ShapeContext { index: 0, name: "h", selected: sel, manipulate: true }))
                .collect();
            prop_assert!(dedupe(input, tol(t)).is_empty());
        }

        #[test]
        fn zero_tolerance_keeps_distinct_points(raw in arb_points()) {
            let input: Vec<_> = raw
                .iter()
                .map(|&(x, y, sel, _)| (dvec2(x, y), ctx(0, sel)))
                .collect();
            let mut distinct: Vec<(u64, u64)> = raw
                .iter()
                .map(|&(x, y, _, _)| ((x + 0.0).to_bits(), (y + 0.0).to_bits()))
                .collect();
            distinct.sort_unstable();
            distinct.dedup();
            prop_assert_eq!(dedupe(input, Tolerance::ZERO).len(), distinct.len());
        }
    }
}
