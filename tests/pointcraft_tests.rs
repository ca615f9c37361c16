//! End-to-end behaviour: shapes -> dedupe -> export -> import

use glam::dvec2;
use pointcraft::export::{self, ExportOptions};
use pointcraft::{
    CodecError, Composition, DedupeCache, Edit, Generator, ShapeKind, ShapeRegistry, ShapeSpec,
    Tolerance, codec, dedupe, dedupe_grouped,
};
use proptest::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A one-point circle sitting exactly at (x, y)
fn dot(x: f64, y: f64) -> ShapeSpec {
    ShapeSpec::new(ShapeKind::CIRCLE)
        .with_param("count", 1.0)
        .with_param("radius", 0.0)
        .with_param("center_x", x)
        .with_param("center_y", y)
}

// =============================================================================
// Generation
// =============================================================================

#[test]
fn circle_of_four_starts_north_and_turns_clockwise() {
    init_tracing();
    let c = Composition::new()
        .with(Edit::Add(
            ShapeSpec::new(ShapeKind::CIRCLE)
                .with_param("count", 4.0)
                .with_param("radius", 10.0)
                .with_param("start", 0.0),
        ))
        .unwrap();
    let expected = [(0.0, -10.0), (10.0, 0.0), (0.0, 10.0), (-10.0, 0.0)];
    let points = c.shapes()[0].points();
    assert_eq!(points.len(), 4);
    for (p, (x, y)) in points.iter().zip(expected) {
        assert!(p.pos.distance(dvec2(x, y)) < 1e-9, "{:?} vs ({x}, {y})", p.pos);
    }
}

#[test]
fn point_ids_are_unique_across_shapes() {
    let c = Composition::from_specs(vec![
        ShapeSpec::new(ShapeKind::CIRCLE),
        ShapeSpec::new(ShapeKind::LINE),
        ShapeSpec::new(ShapeKind::POLYGON),
    ])
    .unwrap();
    let mut ids: Vec<_> = c.shapes().iter().flat_map(|s| s.points()).map(|p| p.id).collect();
    let total = ids.len();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), total);
}

// =============================================================================
// Deduplication
// =============================================================================

#[test]
fn nearby_points_merge_with_selection_ored() {
    init_tracing();
    let mut c = Composition::from_specs(vec![dot(0.0, 0.0), dot(0.04, 0.0)]).unwrap();
    let second = c.shapes()[1].id().to_string();
    c.apply(Edit::Select { id: second, additive: false }).unwrap();

    let out = dedupe(c.candidates(), Tolerance::new(0.05).unwrap());
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].pos, dvec2(0.0, 0.0));
    assert!(out[0].selected);
    assert_eq!(out[0].source_name, "Circle 1");
}

#[test]
fn zero_tolerance_keeps_nearby_points() {
    let c = Composition::from_specs(vec![dot(0.0, 0.0), dot(0.04, 0.0), dot(0.0, 0.0)]).unwrap();
    let out = dedupe(c.candidates(), Tolerance::ZERO);
    assert_eq!(out.len(), 2);
}

#[test]
fn negative_tolerance_is_invalid() {
    assert!(matches!(
        Tolerance::new(-0.05),
        Err(pointcraft::ShapeError::InvalidParameter { .. })
    ));
}

#[test]
fn grouped_output_attributes_points_to_first_contributor() {
    let c = Composition::from_specs(vec![
        ShapeSpec::new(ShapeKind::CIRCLE).with_param("count", 4.0),
        ShapeSpec::new(ShapeKind::CIRCLE).with_param("count", 8.0),
        ShapeSpec::new(ShapeKind::CIRCLE).with_param("count", 8.0).manipulate(true),
    ])
    .unwrap();
    let groups = dedupe_grouped(&c, Tolerance::new(1e-9).unwrap());
    assert_eq!(groups.len(), 3);
    assert_eq!(groups[0].points.len(), 4);
    // Only the four diagonal points are new.
    assert_eq!(groups[1].points.len(), 4);
    assert!(groups[2].manipulate);
    assert_eq!(groups[2].points.len(), 8);
    assert_eq!(export::particle_count(&groups), 8);
}

#[test]
fn cache_follows_edits() {
    let mut c = Composition::from_specs(vec![dot(1.0, 1.0), dot(1.0, 1.0)]).unwrap();
    let mut cache = DedupeCache::new();
    let tolerance = Tolerance::ZERO;

    let first = cache.get(&c, tolerance).to_vec();
    assert_eq!(first[0].points.len(), 1);
    assert!(!first[0].points[0].selected);
    assert_eq!(cache.get(&c, tolerance), first.as_slice());

    let second = c.shapes()[1].id().to_string();
    c.apply(Edit::Select { id: second.clone(), additive: false }).unwrap();
    assert!(cache.get(&c, tolerance)[0].points[0].selected);

    c.apply(Edit::SetParameter { id: second, name: "center_x".into(), value: 3.0 }).unwrap();
    let groups = cache.get(&c, tolerance);
    assert_eq!(groups[1].points.len(), 1);
    assert_eq!(groups, dedupe_grouped(&c, tolerance).as_slice());
}

// =============================================================================
// Codec & artifacts
// =============================================================================

#[test]
fn import_from_artifact_with_surrounding_text() {
    init_tracing();
    let c = Composition::from_specs(vec![
        ShapeSpec::new(ShapeKind::POLYGON).with_param("vertices", 6.0).with_name("Hex"),
        ShapeSpec::new(ShapeKind::LINE).with_param("end_y", 7.5),
    ])
    .unwrap();
    let artifact = export::render(&c, Tolerance::new(0.1).unwrap(), &ExportOptions::default());
    let edited = format!("# hand-written header\n{artifact}\n# trailing note\n");

    let back = export::import(&edited, &ShapeRegistry::builtin()).unwrap();
    assert_eq!(back.len(), 2);
    assert_eq!(back.shapes()[0].name(), "Hex");
    assert_eq!(back.shapes()[1].parameters().get("end_y"), Some(7.5));
    assert_eq!(back.point_count(), c.point_count());
}

#[test]
fn garbage_token_is_corrupt_not_a_panic() {
    for token in ["%%%", "____", "AAAA-", "!"] {
        let err = codec::decode(token, &ShapeRegistry::builtin()).unwrap_err();
        assert!(matches!(err, CodecError::CorruptToken { .. }), "{token}: {err:?}");
    }
}

#[test]
fn point_limit_applies_to_every_edit() {
    init_tracing();
    let huge = Composition::from_specs(vec![
        ShapeSpec::new(ShapeKind::CIRCLE).with_param("count", pointcraft::MAX_POINTS as f64 + 1.0),
    ]);
    assert!(huge.is_err());

    let mut c = Composition::from_specs(vec![ShapeSpec::new(ShapeKind::LINE)]).unwrap();
    let line_id = c.shapes()[0].id().to_string();
    let err = c
        .apply(Edit::SetParameter { id: line_id, name: "count".into(), value: 1.0e12 })
        .unwrap_err();
    assert!(matches!(err, pointcraft::CompositionError::Shape(_)));
    assert_eq!(c.shapes()[0].points().len(), 11);
}

#[test]
fn renamed_shape_cannot_inject_commands() {
    let mut c = Composition::from_specs(vec![dot(0.0, 0.0)]).unwrap();
    let id = c.shapes()[0].id().to_string();
    c.apply(Edit::Rename { id, name: "a\nkill @e".into() }).unwrap();

    let artifact = export::render(&c, Tolerance::ZERO, &ExportOptions::default());
    assert!(artifact.lines().all(|l| !l.starts_with("kill")), "{artifact}");

    let back = export::import(&artifact, &ShapeRegistry::builtin()).unwrap();
    assert_eq!(back.shapes()[0].name(), "a kill @e");
}

fn arb_spec() -> impl Strategy<Value = ShapeSpec> {
    let circle = (
        1u32..40,
        -1.0e3f64..1.0e3,
        -1.0e3f64..1.0e3,
        0.0f64..1.0e3,
        -1.0e4f64..1.0e4,
        0.0f64..300.0,
        -360.0f64..360.0,
    )
        .prop_map(|(count, cx, cy, radius, start, ellipse, rotate)| {
            ShapeSpec::new(ShapeKind::CIRCLE)
                .with_param("count", count as f64)
                .with_param("center_x", cx)
                .with_param("center_y", cy)
                .with_param("radius", radius)
                .with_param("start", start)
                .with_param("ellipse", ellipse)
                .with_param("rotate", rotate)
        });
    let line = (1u32..40, -1.0e3f64..1.0e3, -1.0e3f64..1.0e3, -1.0e3f64..1.0e3, -1.0e3f64..1.0e3)
        .prop_map(|(count, sx, sy, ex, ey)| {
            ShapeSpec::new(ShapeKind::LINE)
                .with_param("count", count as f64)
                .with_param("start_x", sx)
                .with_param("start_y", sy)
                .with_param("end_x", ex)
                .with_param("end_y", ey)
        });
    let polygon = (3u32..12, 1u32..10, 0.0f64..1.0e3, -720.0f64..720.0).prop_map(
        |(vertices, count, radius, start)| {
            ShapeSpec::new(ShapeKind::POLYGON)
                .with_param("vertices", vertices as f64)
                .with_param("count", count as f64)
                .with_param("radius", radius)
                .with_param("start", start)
        },
    );
    (prop_oneof![circle, line, polygon], any::<bool>()).prop_map(|(spec, m)| spec.manipulate(m))
}

proptest! {
    #[test]
    fn codec_round_trip(specs in prop::collection::vec(arb_spec(), 0..8)) {
        let original = Composition::from_specs(specs).unwrap();
        let token = codec::encode(&original);
        let decoded = codec::decode(&token, &ShapeRegistry::builtin()).unwrap();

        prop_assert_eq!(decoded.len(), original.len());
        for (a, b) in original.shapes().iter().zip(decoded.shapes()) {
            prop_assert_eq!(a.kind().tag(), b.kind().tag());
            prop_assert_eq!(a.parameters(), b.parameters());
            prop_assert_eq!(a.is_manipulate(), b.is_manipulate());
            let pa: Vec<_> = a.points().iter().map(|p| p.pos).collect();
            let pb: Vec<_> = b.points().iter().map(|p| p.pos).collect();
            prop_assert_eq!(pa, pb);
        }
    }
}
