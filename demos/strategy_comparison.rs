use banditry::prelude::*;

fn main() -> Result<()> {
    println!("Banditry: epsilon-greedy vs UCB on the 10-armed testbed\n");
    println!("{}", "=".repeat(60));

    let experiment = Experiment::builder()
        .num_arms(10)
        .time_steps(1000)
        .num_sims(500)
        .seed(2019)
        .build()?;

    println!("True arm means:");
    for (arm, mean) in experiment.rewards().true_means().iter().enumerate() {
        let marker = if arm == experiment.rewards().optimal_arm() {
            "  <- optimal"
        } else {
            ""
        };
        println!("  arm {arm}: {mean:>7.3}{marker}");
    }
    println!("{}", "=".repeat(60));

    let eps = experiment.sweep(Strategy::EpsilonGreedy, &[0.0, 0.01, 0.1])?;
    let ucb = experiment.sweep(Strategy::Ucb, &[0.5, 1.0, 2.0, 5.0])?;
    println!("\n{eps}\n{ucb}");

    // Optimal action % at a few checkpoints
    println!("Optimal action % over time");
    let checkpoints = [9, 99, 499, 999];
    print!("{:>12}", "");
    for t in checkpoints {
        print!("{:>8}", format!("t={}", t + 1));
    }
    println!();
    for (sweep, strategy) in [(&eps, Strategy::EpsilonGreedy), (&ucb, Strategy::Ucb)] {
        for result in sweep.iter() {
            let label = format!("{} = {}", strategy.parameter_name(), result.config_value());
            print!("{label:>12}");
            for t in checkpoints {
                print!("{:>7.1}%", result.optimal_fraction()[t] * 100.0);
            }
            println!();
        }
    }

    Ok(())
}
