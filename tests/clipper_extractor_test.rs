//! Tests for clip extraction from a synthesized plan.

use audiobot::audio::AudioBuffer;
use audiobot::clipper::{ClipExtractor, FadeCurve, IntervalSynthesizer};
use audiobot::detect::{CriticalPoint, DetectorTag};

fn constant_buffer(duration_ms: usize, value: i32) -> AudioBuffer {
    // 1 kHz so one frame is one millisecond
    AudioBuffer::new(vec![value; duration_ms], 1_000, 1, 16).unwrap()
}

fn plan_around(timestamp_ms: f64, clip_ms: f64) -> audiobot::clipper::ClipPlan {
    let points = [CriticalPoint {
        timestamp_ms,
        source: DetectorTag::VoiceGap,
        weight: 1.0,
    }];
    IntervalSynthesizer::new(clip_ms, 10_000.0, 100.0, 10).synthesize(&points, 10_000.0)
}

#[test]
fn test_clip_fades_in_and_out() {
    let buffer = constant_buffer(10_000, 16_000);
    let plan = plan_around(3_000.0, 2_000.0);
    assert_eq!(plan.bounds(), vec![(2_000.0, 4_000.0)]);

    let clips = ClipExtractor::new(500.0, 500.0).extract(&buffer, &plan).unwrap();
    assert_eq!(clips.len(), 1);

    let clip = &clips[0];
    let samples = clip.audio.samples();
    assert_eq!(samples.len(), 2_000);
    assert!((clip.audio.duration_ms() - 2_000.0).abs() < 1e-9);

    // Ramp up from silence over the first 500 ms
    assert_eq!(samples[0], 0);
    assert!(samples[..500].windows(2).all(|w| w[0] <= w[1]));
    assert!(samples[499] < 16_000);

    // Untouched middle
    assert!(samples[500..1_500].iter().all(|&s| s == 16_000));

    // Ramp down to silence over the last 500 ms
    assert!(samples[1_500..].windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(samples[1_999], 0);
}

#[test]
fn test_curves_differ_only_in_fade_regions() {
    let buffer = constant_buffer(10_000, 16_000);
    let plan = plan_around(5_000.0, 3_000.0);

    let linear = ClipExtractor::new(500.0, 500.0).extract(&buffer, &plan).unwrap();
    let quadratic = ClipExtractor::new(500.0, 500.0)
        .with_curve(FadeCurve::Quadratic)
        .extract(&buffer, &plan)
        .unwrap();

    let (a, b) = (linear[0].audio.samples(), quadratic[0].audio.samples());
    assert_eq!(a.len(), b.len());
    assert!(b[250] < a[250]);
    assert_eq!(a[500..2_500], b[500..2_500]);
}

#[test]
fn test_empty_plan_extracts_nothing() {
    let buffer = constant_buffer(1_000, 100);
    let plan = plan_around(500.0, 3_000.0);
    assert!(plan.is_empty());
    assert!(
        ClipExtractor::new(500.0, 500.0)
            .extract(&buffer, &plan)
            .unwrap()
            .is_empty()
    );
}
