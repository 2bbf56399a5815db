//! Benchmarks for per-frame gesture classification

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use hand_gesture_control::{
    classifier::GestureClassifier,
    config::GestureConfig,
    geometry::{angle_at, ExtensionStrategy},
    gesture::ControlMode,
    hand_state::HandState,
    landmarks::Landmark,
    modes::create_mode_classifier,
};
use std::hint::black_box;

#[path = "../tests/test_helpers.rs"]
mod test_helpers;

use test_helpers::{hand, left_click_hand, pointing_at, scroll_down_hand};

// Tracker output wobbles by a few thousandths between frames
fn jittered(points: &[Landmark]) -> Vec<Landmark> {
    points
        .iter()
        .map(|p| {
            Landmark::new(
                p.x + 0.004 * (rand::random::<f64>() - 0.5),
                p.y + 0.004 * (rand::random::<f64>() - 0.5),
                p.z,
            )
        })
        .collect()
}

fn benchmark_geometry(c: &mut Criterion) {
    let mut group = c.benchmark_group("geometry");
    let a = Landmark::new(0.45, 0.55, 0.0);
    let b = Landmark::new(0.45, 0.51, 0.0);
    let c_point = Landmark::new(0.45, 0.40, 0.0);

    group.bench_function("angle_at", |bench| {
        bench.iter(|| black_box(angle_at(black_box(&a), black_box(&b), black_box(&c_point))));
    });

    for strategy in [ExtensionStrategy::Displacement, ExtensionStrategy::JointAngle] {
        let config = GestureConfig {
            extension_strategy: strategy,
            ..GestureConfig::default()
        };
        let params = config.extension_params();
        let points = hand([true, true, false, true, false]);

        group.bench_with_input(
            BenchmarkId::new("hand_state", format!("{strategy:?}")),
            &points,
            |bench, points| {
                bench.iter(|| black_box(HandState::build(black_box(points), &params, &config.thresholds)));
            },
        );
    }

    group.finish();
}

fn benchmark_mode_rules(c: &mut Criterion) {
    let mut group = c.benchmark_group("mode_rules");
    let config = GestureConfig::default();
    let state = HandState::build(&scroll_down_hand(), &config.extension_params(), &config.thresholds).unwrap();

    for mode in ControlMode::ALL {
        let rules = create_mode_classifier(mode, &config);
        group.bench_with_input(BenchmarkId::new("classify", mode), &state, |bench, state| {
            bench.iter(|| black_box(rules.classify(black_box(state), None)));
        });
    }

    group.finish();
}

fn benchmark_classifier(c: &mut Criterion) {
    let mut group = c.benchmark_group("classifier");

    let poses = [
        ("mouse_move", pointing_at(0.4, 0.35)),
        ("left_click", left_click_hand()),
        ("scroll_down", scroll_down_hand()),
        ("none", hand([false; 5])),
    ];

    for (name, points) in &poses {
        let frames: Vec<Vec<Landmark>> = (0..100).map(|_| jittered(points)).collect();
        let mut classifier = GestureClassifier::new(GestureConfig::default());

        group.bench_with_input(BenchmarkId::new("sequence_100", *name), &frames, |bench, frames| {
            bench.iter(|| {
                classifier.reset_statistics();
                for (i, frame) in frames.iter().enumerate() {
                    black_box(classifier.classify_at(black_box(frame), None, i as u64 * 33));
                }
            });
        });
    }

    let short = vec![Landmark::default(); 20];
    let mut classifier = GestureClassifier::new(GestureConfig::default());
    group.bench_function("rejected_frame", |bench| {
        bench.iter(|| black_box(classifier.classify_at(black_box(&short), None, 0)));
    });

    group.finish();
}

criterion_group!(benches, benchmark_geometry, benchmark_mode_rules, benchmark_classifier);
criterion_main!(benches);
