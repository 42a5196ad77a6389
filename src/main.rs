use std::{fs, path::PathBuf, time::Duration};

use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use easy_parallel::Parallel;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use livly_color_calc::{
    basis::{Color, Mode, Tolerance},
    catalog::Catalog,
    config::SolverConfig,
    mix_resolve::{yield_point::Never, Deadline, Request, Solution, Solver},
    paste::parse_color,
    recipe::{within, Lang, Recipe},
    space::Space,
};

#[derive(Parser)]
#[command(name = "livly_color_calc")]
#[command(about = "Find the fewest feedings that turn one Livly color into another", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve in one mode
    Solve {
        #[command(flatten)]
        query: Query,

        /// fast or optimal
        #[arg(long, default_value = "fast")]
        mode: Mode,
    },
    /// Solve in both modes at once and print both recipes
    Compare {
        #[command(flatten)]
        query: Query,
    },
    /// List the actions of the catalog
    Catalog {
        /// Catalog json file (the built-in one if omitted)
        #[arg(long)]
        catalog: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct Query {
    /// Current color, e.g. "R123 G45 B200" or "123,45,200"
    #[arg(long, value_parser = parse_color)]
    from: Color,

    /// Target color
    #[arg(long, value_parser = parse_color)]
    to: Color,

    /// Accept a color within distance 2 of the target
    #[arg(long, conflicts_with = "tolerance")]
    allow_error: bool,

    /// Accept a color within this distance of the target
    #[arg(long)]
    tolerance: Option<u16>,

    /// Catalog json file (the built-in one if omitted)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Stop searching after this many milliseconds and report the closest color
    #[arg(long)]
    timeout_ms: Option<u64>,

    #[arg(long)]
    json: bool,

    #[arg(long, value_enum, default_value = "zh")]
    lang: LangArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LangArg {
    Zh,
    En,
}

impl From<LangArg> for Lang {
    fn from(lang: LangArg) -> Self {
        match lang {
            LangArg::Zh => Lang::Zh,
            LangArg::En => Lang::En,
        }
    }
}

impl Query {
    fn tolerance(&self) -> Tolerance {
        match (self.allow_error, self.tolerance) {
            (_, Some(t)) => Tolerance(t),
            (true, None) => Tolerance(2),
            (false, None) => Tolerance::EXACT,
        }
    }
}

#[derive(Serialize)]
struct Report<'a> {
    mode: Mode,
    start: Color,
    target: Color,
    solution: &'a Solution,
    recipe: Recipe,
}

fn load_catalog(path: Option<&PathBuf>) -> Result<Catalog> {
    match path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Catalog::from_json(&json).with_context(|| format!("in {}", path.display()))
        }
        None => Ok(Catalog::livly()),
    }
}

fn solve(query: &Query, catalog: Catalog, mode: Mode) -> Result<Solution> {
    let config = SolverConfig::from_env(mode)?;
    let request = Request {
        start: query.from,
        target: query.to,
        tolerance: query.tolerance(),
        mode,
    };

    let mut solver = Solver::new(Space::LIVLY, catalog);
    match query.timeout_ms {
        Some(ms) => solver.solve_with(
            &request,
            &config,
            &mut Deadline::after(Duration::from_millis(ms)),
        ),
        None => solver.solve_with(&request, &config, &mut Never),
    }
}

fn print_solution(query: &Query, catalog: &Catalog, mode: Mode, solution: &Solution) -> Result<()> {
    let recipe = Recipe::new(catalog, &solution.path);
    let accepted = within(solution.reached, query.to, query.tolerance());

    if query.json {
        let report = Report {
            mode,
            start: query.from,
            target: query.to,
            solution,
            recipe,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("[{}] {} -> {}", mode, query.from, query.to);
        print!(
            "{}",
            recipe.render(query.lang.into(), solution.reached, accepted)
        );
    }

    if !accepted {
        eprintln!(
            "warning: [{}] search was {:?}; the recipe ends at {} (distance {:.2} from the target)",
            mode,
            solution.outcome,
            solution.reached,
            solution.reached.distance(query.to)
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Solve { query, mode } => {
            let catalog = load_catalog(query.catalog.as_ref())?;
            let solution = solve(&query, catalog.clone(), mode)?;
            print_solution(&query, &catalog, mode, &solution)?;
        }
        Command::Compare { query } => {
            let catalog = load_catalog(query.catalog.as_ref())?;
            let modes = [Mode::Fast, Mode::Optimal];
            let solutions = Parallel::new()
                .each(modes.iter().copied(), |mode| solve(&query, catalog.clone(), mode))
                .run();

            for (&mode, solution) in modes.iter().zip(solutions) {
                print_solution(&query, &catalog, mode, &solution?)?;
                if !query.json {
                    println!();
                }
            }
        }
        Command::Catalog { catalog, json } => {
            let catalog = load_catalog(catalog.as_ref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(catalog.actions())?);
            } else {
                for action in catalog.actions() {
                    let [r, g, b] = action.delta.channels();
                    println!(
                        "{:>4} {:>4} {:>4}  {} ({})",
                        r, g, b, action.name, action.name_en
                    );
                }
            }
        }
    }

    Ok(())
}
