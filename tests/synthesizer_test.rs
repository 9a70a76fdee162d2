//! Tests for clip plan synthesis.

use std::collections::BTreeSet;

use audiobot::clipper::{Interval, IntervalSynthesizer, enforce_budget, merge_overlaps};
use audiobot::detect::{CriticalPoint, DetectorTag};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const TOLERANCE: f64 = 1e-6;

fn point(timestamp_ms: f64, source: DetectorTag, weight: f64) -> CriticalPoint {
    CriticalPoint {
        timestamp_ms,
        source,
        weight,
    }
}

fn random_points(rng: &mut StdRng, duration_ms: f64) -> Vec<CriticalPoint> {
    let tags = [DetectorTag::VoiceGap, DetectorTag::Volume, DetectorTag::Beat];
    let count = rng.random_range(0..60);
    let mut points: Vec<CriticalPoint> = (0..count)
        .map(|_| {
            point(
                rng.random_range(0.0..=duration_ms),
                tags[rng.random_range(0..tags.len())],
                rng.random_range(0.0..10.0),
            )
        })
        .collect();
    points.sort_by(|a, b| {
        a.timestamp_ms
            .total_cmp(&b.timestamp_ms)
            .then(a.source.cmp(&b.source))
    });
    points
}

#[test]
fn test_plan_invariants_hold_for_random_points() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..500 {
        let duration_ms = rng.random_range(0.0..120_000.0);
        let min_clip_ms = rng.random_range(100.0..5_000.0);
        let max_clip_ms = min_clip_ms + rng.random_range(0.0..10_000.0);
        let max_clips = rng.random_range(0..12);
        let synth = IntervalSynthesizer::new(
            min_clip_ms,
            max_clip_ms,
            rng.random_range(0.0..200.0),
            max_clips,
        );

        let points = random_points(&mut rng, duration_ms);
        let plan = synth.synthesize(&points, duration_ms);

        assert!(plan.len() <= max_clips);
        for interval in &plan {
            assert!(interval.start_ms >= 0.0);
            assert!(interval.end_ms <= duration_ms);
            assert!(interval.duration_ms() + TOLERANCE >= min_clip_ms);
            assert!(interval.duration_ms() <= max_clip_ms + TOLERANCE);
            assert!(!interval.sources.is_empty());
        }
        for pair in plan.intervals().windows(2) {
            assert!(pair[0].start_ms < pair[1].start_ms, "plan not sorted");
            assert!(pair[0].end_ms < pair[1].start_ms, "plan intervals overlap");
        }
    }
}

#[test]
fn test_synthesis_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(1234);
    let synth = IntervalSynthesizer::new(3_000.0, 10_000.0, 100.0, 10);

    for _ in 0..50 {
        let points = random_points(&mut rng, 60_000.0);
        let first = synth.synthesize(&points, 60_000.0);
        let second = synth.synthesize(&points, 60_000.0);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

#[test]
fn test_merge_scenario() {
    let span = |start_ms: f64, end_ms: f64| Interval {
        start_ms,
        end_ms,
        sources: BTreeSet::from([DetectorTag::VoiceGap]),
        weight: 1.0,
    };

    let merged = enforce_budget(
        merge_overlaps(vec![
            span(0.0, 2_000.0),
            span(1_800.0, 4_000.0),
            span(5_000.0, 6_000.0),
        ]),
        2,
    );

    let bounds: Vec<(f64, f64)> = merged.iter().map(|i| (i.start_ms, i.end_ms)).collect();
    assert_eq!(bounds, vec![(0.0, 4_000.0), (5_000.0, 6_000.0)]);
    assert_eq!(merged[0].weight, 2.0);
}

#[test]
fn test_budget_scenario_keeps_heaviest() {
    let synth = IntervalSynthesizer::new(2_000.0, 10_000.0, 100.0, 3);
    let points: Vec<CriticalPoint> = [1_000.0, 4_000.0, 7_000.0, 10_000.0, 13_000.0]
        .iter()
        .zip([1.0, 5.0, 2.0, 4.0, 3.0])
        .map(|(&ts, weight)| point(ts, DetectorTag::VoiceGap, weight))
        .collect();

    let plan = synth.synthesize(&points, 20_000.0);

    let weights: Vec<f64> = plan.iter().map(|i| i.weight).collect();
    assert_eq!(weights, vec![5.0, 4.0, 3.0]);
    assert_eq!(
        plan.bounds(),
        vec![(3_000.0, 5_000.0), (9_000.0, 11_000.0), (12_000.0, 14_000.0)]
    );
}

#[test]
fn test_cross_detector_points_fuse() {
    let synth = IntervalSynthesizer::new(2_000.0, 10_000.0, 100.0, 10);
    let points = [
        point(5_000.0, DetectorTag::VoiceGap, 1.0),
        point(5_040.0, DetectorTag::Beat, 0.5),
    ];

    let plan = synth.synthesize(&points, 20_000.0);

    assert_eq!(plan.bounds(), vec![(4_000.0, 6_000.0)]);
    let interval = &plan.intervals()[0];
    assert_eq!(
        interval.sources,
        BTreeSet::from([DetectorTag::VoiceGap, DetectorTag::Beat])
    );
    assert_eq!(interval.weight, 1.5);
}
