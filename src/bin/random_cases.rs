use std::time::Instant;

use anyhow::Result;
use rand::prelude::*;
use tracing_subscriber::EnvFilter;

use livly_color_calc::{
    basis::{Color, Mode, Tolerance, MAX_CHANNEL},
    config::SolverConfig,
    mix_resolve::{yield_point::Never, Request, Solver},
    recipe::{simulate, within},
};

// 環境変数 LIVLY_* で閾値を変えながら平均手数と到達率を比べる.
fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let cases: usize = match args.next() {
        Some(n) => n.parse()?,
        None => 20,
    };
    let seed: u64 = match args.next() {
        Some(s) => s.parse()?,
        None => 0,
    };

    // fixed rng for comparable results between runs
    let mut rng = StdRng::seed_from_u64(seed);
    let mut color = || {
        Color::new(
            rng.gen_range(0..=MAX_CHANNEL),
            rng.gen_range(0..=MAX_CHANNEL),
            rng.gen_range(0..=MAX_CHANNEL),
        )
    };
    let pairs = (0..cases).map(|_| (color(), color())).collect::<Vec<_>>();

    let mut solver = Solver::livly();
    for &mode in &[Mode::Fast, Mode::Optimal] {
        let config = SolverConfig::from_env(mode)?;
        let begin = Instant::now();
        let mut total_steps = 0;
        let mut converged = 0;

        for &(start, target) in &pairs {
            let request = Request {
                start,
                target,
                tolerance: Tolerance(2),
                mode,
            };
            let solution = solver.solve_with(&request, &config, &mut Never)?;
            total_steps += solution.path.len();
            let end = simulate(solver.space(), solver.catalog(), start, &solution.path);
            if within(end, target, request.tolerance) {
                converged += 1;
            } else {
                println!(
                    "{} {} -> {}: {:?} at {}",
                    mode, start, target, solution.outcome, solution.reached
                );
            }
        }

        println!(
            "{}: {} cases, average {:.2} steps, converged {:.1}%, {:.2?}",
            mode,
            pairs.len(),
            total_steps as f64 / pairs.len().max(1) as f64,
            converged as f64 * 100.0 / pairs.len().max(1) as f64,
            begin.elapsed()
        );
    }

    Ok(())
}
