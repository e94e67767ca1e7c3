//! End-to-end tests against the bundled demo artifacts.

use std::io::Write;
use std::path::PathBuf;

use diamond_pricer::app::pipeline::PricingPipeline;
use diamond_pricer::domain::{Clarity, Color, DiamondFeatures, Quality};
use diamond_pricer::error::PricingError;
use diamond_pricer::io::artifacts::{ArtifactPaths, ENCODER_FILE, MODEL_FILE};

fn bundled_artifacts() -> ArtifactPaths {
    ArtifactPaths {
        dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("artifacts"),
    }
}

fn reference_diamond() -> DiamondFeatures {
    DiamondFeatures {
        weight: 0.7,
        length: 5.76,
        width: 5.7,
        depth: 3.43,
        quality: Quality::VeryGood,
        color: Color::E,
        clarity: Clarity::SI1,
    }
}

#[test]
fn reference_diamond_matches_golden_price() {
    let pipeline = PricingPipeline::load(&bundled_artifacts()).unwrap();
    let price = pipeline.run(&reference_diamond()).unwrap();

    // Captured once against the bundled artifacts and pinned.
    assert!(
        (price.amount - 2501.36324240).abs() < 0.01,
        "golden regression drifted: {}",
        price.amount
    );
}

#[test]
fn run_is_deterministic_across_fresh_loads() {
    // Loading artifacts per call and reusing one loaded pipeline must agree
    // exactly.
    let features = reference_diamond();
    let cached = PricingPipeline::load(&bundled_artifacts()).unwrap();
    let baseline = cached.run(&features).unwrap().amount;

    for _ in 0..3 {
        let fresh = PricingPipeline::load(&bundled_artifacts()).unwrap();
        assert_eq!(fresh.run(&features).unwrap().amount, baseline);
        assert_eq!(cached.run(&features).unwrap().amount, baseline);
    }
}

#[test]
fn heavier_better_graded_diamonds_price_higher() {
    let pipeline = PricingPipeline::load(&bundled_artifacts()).unwrap();

    let small = pipeline.run(&reference_diamond()).unwrap();
    let big = pipeline
        .run(&DiamondFeatures {
            weight: 1.2,
            length: 6.8,
            width: 6.75,
            depth: 4.2,
            quality: Quality::Premium,
            color: Color::G,
            clarity: Clarity::VS1,
        })
        .unwrap();

    assert!(big.amount > small.amount);
    assert!(small.amount > 0.0);
}

#[test]
fn zero_weight_is_rejected() {
    let pipeline = PricingPipeline::load(&bundled_artifacts()).unwrap();
    let mut features = reference_diamond();
    features.weight = 0.0;
    assert!(matches!(
        pipeline.run(&features).unwrap_err(),
        PricingError::InvalidInput { field: "weight", .. }
    ));
}

#[test]
fn missing_artifact_directory_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let paths = ArtifactPaths {
        dir: dir.path().join("nope"),
    };
    let err = PricingPipeline::load(&paths).unwrap_err();
    assert!(matches!(err, PricingError::ArtifactLoad { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn corrupt_model_artifact_is_a_load_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::copy(
        bundled_artifacts().encoder_path(),
        dir.path().join(ENCODER_FILE),
    )
    .unwrap();
    let mut file = std::fs::File::create(dir.path().join(MODEL_FILE)).unwrap();
    file.write_all(b"{ not json").unwrap();

    let paths = ArtifactPaths {
        dir: dir.path().to_path_buf(),
    };
    assert!(matches!(
        PricingPipeline::load(&paths).unwrap_err(),
        PricingError::ArtifactLoad { .. }
    ));
}

#[test]
fn oblivious_trees_artifact_is_a_drop_in_replacement() {
    // Same encoder, different model format behind the same contract.
    let dir = tempfile::tempdir().unwrap();
    std::fs::copy(
        bundled_artifacts().encoder_path(),
        dir.path().join(ENCODER_FILE),
    )
    .unwrap();

    // One depth-2 symmetric tree over (transformed weight, quality rank):
    // leaf index bit 0 is weight > 0 (i.e. > 1 ct before the transform),
    // bit 1 is quality rank > 2.5.
    let model_json = r#"{
        "tool": "dprice",
        "kind": "price_model",
        "trained_date": "2025-11-02",
        "model": {
            "type": "oblivious_trees",
            "base_score": 5.5,
            "trees": [
                {
                    "features": [0, 4],
                    "thresholds": [0.0, 2.5],
                    "leaf_values": [0.0, 0.3, 0.1, 0.5]
                }
            ]
        }
    }"#;
    std::fs::write(dir.path().join(MODEL_FILE), model_json).unwrap();

    let paths = ArtifactPaths {
        dir: dir.path().to_path_buf(),
    };
    let pipeline = PricingPipeline::load(&paths).unwrap();

    // Reference diamond: both splits false -> leaf 0 -> score 5.5.
    let small = pipeline.run(&reference_diamond()).unwrap();
    assert!((small.amount - 956.87225850).abs() < 0.01);

    // 1.2 ct Premium: both splits true -> leaf 3 -> score 6.0.
    let big = pipeline
        .run(&DiamondFeatures {
            weight: 1.2,
            length: 6.8,
            width: 6.75,
            depth: 4.2,
            quality: Quality::Premium,
            color: Color::G,
            clarity: Clarity::VS1,
        })
        .unwrap();
    assert!((big.amount - 2160.44565678).abs() < 0.01);
}
