//! End-to-end training example for the discriminant classifier.
//!
//! Generates synthetic Gaussian blobs, fits the model, and reports
//! held-out accuracy with per-query confidence.

use gaussian_discriminant::{
    accuracy, synthetic, BlobConfig, ConfusionMatrix, GaussianDiscriminant, ModelConfig,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("📐 Gaussian Discriminant - Train and Classify");
    println!("=============================================\n");

    let centers = vec![
        vec![0.0, 0.0, 0.0],
        vec![6.0, 0.0, 3.0],
        vec![0.0, 6.0, -3.0],
        vec![-6.0, -6.0, 0.0],
    ];
    let blob_config = BlobConfig {
        spread: 0.9,
        samples_per_class: 120,
        seed: 42,
    };
    let model_config = ModelConfig::default();

    println!("Configuration:");
    println!("  Classes: {}", centers.len());
    println!("  Samples per class: {}", blob_config.samples_per_class);
    println!("  Spread: {}", blob_config.spread);
    println!("  Tau: {:e}", model_config.tau);
    println!();

    println!("📊 Generating dataset...");
    let dataset = synthetic::gaussian_blobs(&centers, &blob_config)?;
    let (train, val) = dataset.split(0.8);
    println!("  Training samples: {}", train.len());
    println!("  Validation samples: {}", val.len());
    println!();

    println!("🎓 Fitting model...");
    let mut model = GaussianDiscriminant::new(model_config);
    let summary = model.fit(&train)?;
    println!("  Classes fitted: {}", summary.num_classes);
    println!("  Feature dimension: {}", summary.dim);
    println!("  Elapsed: {} ms", summary.elapsed_ms);
    if !summary.degenerate_labels.is_empty() {
        println!("  Degenerate classes: {:?}", summary.degenerate_labels);
    }
    println!();

    println!("📈 Evaluation:");
    let train_acc = accuracy(&model, &train)?;
    let val_acc = accuracy(&model, &val)?;
    println!("  Train accuracy: {:.2}%", train_acc * 100.0);
    println!("  Validation accuracy: {:.2}%", val_acc * 100.0);
    println!();

    println!("📊 Confusion matrix (validation):");
    let matrix = ConfusionMatrix::evaluate(&model, &val)?;
    print!("  true\\pred");
    for label in matrix.labels() {
        print!(" {:>6}", label);
    }
    println!();
    for &true_label in matrix.labels() {
        print!("  {:>9}", true_label);
        for &predicted in matrix.labels() {
            print!(" {:>6}", matrix.count(true_label, predicted));
        }
        println!();
    }
    println!();

    println!("🔍 Sample predictions:");
    for i in (0..val.len()).step_by((val.len() / 6).max(1)) {
        let (query, truth) = val.sample(i);
        let (predicted, confidence) = model.predict_with_confidence(query)?;
        let mark = if predicted == truth { "✓" } else { "✗" };
        println!(
            "  {} sample {:3}: true={} pred={} confidence={:.3}",
            mark, i, truth, predicted, confidence
        );
    }
    println!();

    println!("✅ Done! Training run appended to logs/training.jsonl");
    Ok(())
}
