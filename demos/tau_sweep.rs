//! Regularization sweep: retune tau on a fitted model.
//!
//! Fits once, then walks tau across several orders of magnitude using
//! the cheap retuning path and reports accuracy at each setting.

use gaussian_discriminant::{accuracy, synthetic, BlobConfig, GaussianDiscriminant};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🎚️  Gaussian Discriminant - Tau Sweep");
    println!("=====================================\n");

    // overlapping blobs so the floor actually moves the boundary
    let centers = vec![vec![0.0, 0.0], vec![2.5, 2.5], vec![5.0, 0.0]];
    let config = BlobConfig {
        spread: 1.1,
        samples_per_class: 150,
        seed: 99,
    };

    println!("📊 Generating overlapping blobs...");
    let dataset = synthetic::gaussian_blobs(&centers, &config)?;
    let (train, val) = dataset.split(0.8);
    println!("  Training samples: {}", train.len());
    println!("  Validation samples: {}", val.len());
    println!();

    println!("🎓 Fitting once at the default floor...");
    let mut model = GaussianDiscriminant::default();
    let summary = model.fit(&train)?;
    println!("  Classes: {}", summary.num_classes);
    println!("  Elapsed: {} ms", summary.elapsed_ms);
    println!();

    println!("🎚️  Sweeping tau:");
    println!("  {:>10} | {:>9} | {:>9} | {:>10}", "tau", "train acc", "val acc", "mean conf");
    println!("  {:->10}-+-{:->9}-+-{:->9}-+-{:->10}", "", "", "", "");

    for tau in [1e-6, 1e-4, 1e-2, 1e-1, 1.0, 10.0] {
        model.set_tau(tau)?;

        let train_acc = accuracy(&model, &train)?;
        let val_acc = accuracy(&model, &val)?;

        let mut total_confidence = 0.0;
        for i in 0..val.len() {
            let (query, _) = val.sample(i);
            let (_, confidence) = model.predict_with_confidence(query)?;
            total_confidence += confidence;
        }
        let mean_confidence = total_confidence / val.len() as f64;

        println!(
            "  {:>10.0e} | {:>8.2}% | {:>8.2}% | {:>10.3}",
            tau,
            train_acc * 100.0,
            val_acc * 100.0,
            mean_confidence
        );
    }
    println!();

    println!("✅ Done! Updates appended to logs/tau_updates.jsonl");
    Ok(())
}
