use af_optimizer::*;
use af_types::{Bounds, Sample};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("AdaptFit decay fit example");

    // Irregular sampling: dense early, sparse late.
    let truth = DecayParams::new(0.5, 2.0, 0.2, 3.0, 1.0);
    let times = [0.0, 0.1, 0.2, 0.3, 0.4, 0.5, 1.0, 2.0, 4.0, 7.0, 10.0];
    let samples: Vec<Sample> = truth.simulate(&times)?;
    println!("Generated {} samples from {:?}", samples.len(), truth);

    let coords: Vec<f64> = samples.iter().map(|s| s.coordinate).collect();
    let weights = compute_weights(&coords, None)?;
    println!("Density weights: {:.3?}", weights);

    let bounds = Bounds::new(vec![(0.3, 1.0), (0.5, 5.0), (0.05, 0.3), (0.5, 10.0), (-5.0, 5.0)])?;
    let x0 = vec![0.55, 2.2, 0.18, 3.3, 0.9];
    let config = SearchConfig::new()
        .minimize()
        .with_iterations(5000)
        .with_alpha0(x0.iter().map(|v| 0.05 * v).collect())
        .with_gammas(1.1, 0.99)
        .with_seed(42);

    let mut search = AdaptiveLocalSearch::new(&TwoCompartmentDecay, config).with_observer(|report| {
        if report.iteration % 1000 == 0 {
            println!(
                "  iteration {:>5}: best={:.6} tolerance={:.3e}",
                report.iteration, report.best_value, report.tolerance
            );
        }
        SearchControl::Continue
    });
    let result = search.optimize(&x0, Some(&bounds), &samples)?;

    println!(
        "Finished after {} iterations ({:?}), weighted RMS {:.6}",
        result.iterations_run, result.termination, result.best_value
    );
    println!("Fitted parameters: {:?}", DecayParams::from_slice(&result.best_params)?);

    Ok(())
}
