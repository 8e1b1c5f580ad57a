//! Latency benchmarks for forest inference
//!
//! The production artifact is a 150-tree forest over seven features; each
//! prediction should stay well under a millisecond on CPU.
//!
//! Run with: cargo bench -p carenet-classifiers

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use carenet_classifiers::{ForestClassifier, RiskClassifier, TreeNode};
use carenet_core::{FeatureField, FeatureManifest, PatientFeatures};

/// Thresholds roughly centred in the training ranges of each feature
const SPLIT_POINTS: [f64; 7] = [3.5, 90.5, 3.5, 2.5, 0.5, 14.5, 0.5];

/// Full binary tree of the given depth, cycling through features
fn build_tree(depth: usize, offset: usize) -> TreeNode {
    if depth == 0 {
        let p = ((offset % 10) as f64) / 10.0;
        return TreeNode::leaf(vec![1.0 - p, p]);
    }
    let feature = offset % SPLIT_POINTS.len();
    TreeNode::split(
        feature,
        SPLIT_POINTS[feature],
        build_tree(depth - 1, offset * 2 + 1),
        build_tree(depth - 1, offset * 2 + 2),
    )
}

fn build_forest(n_trees: usize, depth: usize) -> ForestClassifier {
    let trees = (0..n_trees).map(|i| build_tree(depth, i)).collect();
    ForestClassifier::new("bench", 7, vec![1.0 / 7.0; 7], trees).expect("valid forest")
}

fn benchmark_forest_inference(c: &mut Criterion) {
    let manifest = FeatureManifest::standard();
    let samples = vec![
        ("defaults", PatientFeatures::default()),
        (
            "high_risk",
            PatientFeatures::default()
                .with(FeatureField::MissedAppointments, 7.0)
                .with(FeatureField::DaysSinceLastVisit, 120.0)
                .with(FeatureField::FinancialScore, 2.0),
        ),
    ];

    let mut group = c.benchmark_group("Forest_Inference");
    group.sample_size(100);

    for (n_trees, depth) in [(10, 4), (150, 8)] {
        let forest = build_forest(n_trees, depth);
        for (name, features) in &samples {
            let vector = features.to_vector(&manifest);
            group.bench_with_input(
                BenchmarkId::new(format!("{}x{}", n_trees, depth), name),
                &vector,
                |b, vector| b.iter(|| forest.predict_probability(black_box(vector)).unwrap()),
            );
        }
    }

    group.finish();
}

criterion_group!(benches, benchmark_forest_inference);
criterion_main!(benches);
