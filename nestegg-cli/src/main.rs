use clap::{Parser, Subcommand};
use nestegg_common::Config;
use nestegg_core::{
    build_distribution, compare_projections, export_csv, export_json, final_balances,
    load_assumptions, print_summary, project, run_monte_carlo, Distribution, SimulationOutcome,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::__tracing_subscriber_SubscriberExt, util::SubscriberInitExt};

fn parse_bins(s: &str) -> Result<usize, String> {
    // reject zero at CLI parse time; the histogram builder errors on it anyway
    let v: usize = s.parse().map_err(|_| format!("not an integer: {s}"))?;
    if v >= 1 {
        Ok(v)
    } else {
        Err("bins must be at least 1".into())
    }
}

#[derive(Parser)]
#[command(name = "nestegg", version, about = "Retirement projection calculator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deterministic year-by-year projection
    Project {
        scenario: String,
        #[arg(long)]
        output: Option<String>,
        #[arg(long, default_value = "json")]
        format: String,
    },
    /// Monte Carlo outcome distribution
    Simulate {
        scenario: String,
        #[arg(long)]
        iterations: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, value_parser = parse_bins)]
        bins: Option<usize>,
        #[arg(long)]
        output: Option<String>,
    },
    /// Diff the projections of two scenario files
    Compare { scenario1: String, scenario2: String },
    /// Full document export (projection + simulation + distribution)
    Export {
        scenario: String,
        #[arg(long)]
        format: Option<String>,
        #[arg(long)]
        output: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry().with(fmt::layer()).init();
    let cli = Cli::parse();
    let config = Config::load().unwrap_or_default();
    match cli.command {
        Commands::Project {
            scenario,
            output,
            format,
        } => run_project(&scenario, output, &format),
        Commands::Simulate {
            scenario,
            iterations,
            seed,
            bins,
            output,
        } => run_simulate(&scenario, iterations, seed, bins, output, &config),
        Commands::Compare {
            scenario1,
            scenario2,
        } => run_compare(&scenario1, &scenario2),
        Commands::Export {
            scenario,
            format,
            output,
        } => run_export(&scenario, format, output, &config),
    }
}

fn run_project(scenario: &str, output: Option<String>, format: &str) -> anyhow::Result<()> {
    let assumptions = load_assumptions(Path::new(scenario))?;
    let rows = project(&assumptions)?;
    print_summary(&rows, None);
    if let Some(out) = output {
        let out_path = PathBuf::from(out);
        match format {
            "json" => export_json(&out_path, &rows, None, None)?,
            "csv" => export_csv(&out_path, &rows)?,
            _ => anyhow::bail!("Unknown format: {format} (use json or csv)"),
        }
        println!("Exported to {}", out_path.display());
    }
    Ok(())
}

fn run_simulate(
    scenario: &str,
    iterations: Option<usize>,
    seed: Option<u64>,
    bins: Option<usize>,
    output: Option<String>,
    config: &Config,
) -> anyhow::Result<()> {
    let assumptions = load_assumptions(Path::new(scenario))?;
    let rows = project(&assumptions)?;

    let mut sim_cfg = config.simulation.clone();
    if let Some(n) = iterations {
        sim_cfg.iterations = n;
    }
    if seed.is_some() {
        sim_cfg.seed = seed;
    }
    let outcome = run_monte_carlo(&assumptions, &sim_cfg)?;
    let bin_count = bins.unwrap_or(config.histogram.bins);
    let distribution = build_distribution(&final_balances(&outcome), bin_count)?;

    print_summary(&rows, Some(&outcome));
    println!();
    print_percentiles(&outcome);
    println!();
    print_distribution(&distribution);

    if let Some(out) = output {
        let out_path = PathBuf::from(out);
        export_json(&out_path, &rows, Some(&outcome), Some(&distribution))?;
        println!("Exported to {}", out_path.display());
    }
    Ok(())
}

fn print_percentiles(outcome: &SimulationOutcome) {
    let Some(last) = outcome.results.last() else {
        return;
    };
    println!("Final year ({}) outcome spread:", last.year);
    println!("{:<12} ${:.0}", "worst:", last.worst_case);
    println!("{:<12} ${:.0}", "p25:", last.p25);
    println!("{:<12} ${:.0}", "median:", last.median);
    println!("{:<12} ${:.0}", "p75:", last.p75);
    println!("{:<12} ${:.0}", "best:", last.best_case);
}

fn print_distribution(dist: &Distribution) {
    if dist.bins.is_empty() {
        println!("No positive final balances to bin.");
        return;
    }
    println!(
        "Distribution of final balances ({} samples, mean ${:.0}):",
        dist.stats.count, dist.stats.mean
    );
    let max_count = dist.bins.iter().map(|b| b.count).max().unwrap_or(1).max(1);
    for bin in &dist.bins {
        let bar_len = (bin.count * 40 / max_count) as usize;
        println!(
            "${:>12.0} - ${:>12.0} {:>5} {}",
            bin.start,
            bin.end,
            bin.count,
            "#".repeat(bar_len)
        );
    }
}

fn run_compare(scenario1: &str, scenario2: &str) -> anyhow::Result<()> {
    let left = load_assumptions(Path::new(scenario1))?;
    let right = load_assumptions(Path::new(scenario2))?;
    let left_rows = project(&left)?;
    let right_rows = project(&right)?;
    let cmp = compare_projections(
        &left.scenario_name,
        &left_rows,
        &right.scenario_name,
        &right_rows,
    );
    println!("{:<18} {} vs {}", "Scenarios:", cmp.left_name, cmp.right_name);
    println!(
        "{:<18} ${:.0} vs ${:.0} (delta ${:+.0})",
        "Final balance:", cmp.left_final_balance, cmp.right_final_balance, cmp.final_balance_delta
    );
    println!(
        "{:<18} ${:.0} vs ${:.0} (delta ${:+.0})",
        "Max balance:", cmp.left_max_balance, cmp.right_max_balance, cmp.max_balance_delta
    );
    let depleted = |d: Option<u32>| d.map(|a| format!("age {a}")).unwrap_or_else(|| "never".into());
    println!(
        "{:<18} {} vs {}",
        "Depleted:",
        depleted(cmp.left_depleted_at_age),
        depleted(cmp.right_depleted_at_age)
    );
    Ok(())
}

fn run_export(
    scenario: &str,
    format: Option<String>,
    output: Option<String>,
    config: &Config,
) -> anyhow::Result<()> {
    let assumptions = load_assumptions(Path::new(scenario))?;
    let rows = project(&assumptions)?;
    let format = format.unwrap_or_else(|| config.export.format.clone());
    let default_name = format!("projection.{format}");
    let out_path: PathBuf = if let Some(ref o) = output {
        PathBuf::from(o)
    } else {
        Path::new(&config.export.output_dir).join(&default_name)
    };
    if let Some(parent) = out_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    match format.as_str() {
        "json" => {
            let outcome = run_monte_carlo(&assumptions, &config.simulation)?;
            let distribution =
                build_distribution(&final_balances(&outcome), config.histogram.bins)?;
            export_json(&out_path, &rows, Some(&outcome), Some(&distribution))?;
            println!("Exported to {}", out_path.display());
        }
        "csv" => {
            export_csv(&out_path, &rows)?;
            println!("Exported to {}", out_path.display());
        }
        _ => anyhow::bail!("Unknown format: {format} (use json or csv)"),
    }
    Ok(())
}
