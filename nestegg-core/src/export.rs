use crate::histogram::Distribution;
use crate::montecarlo::SimulationOutcome;
use crate::projection::{summarize, ProjectionYear};
use nestegg_common::Result;
use std::io::Write;
use std::path::Path;

pub fn print_summary(rows: &[ProjectionYear], outcome: Option<&SimulationOutcome>) {
    let summary = summarize(rows);
    println!("{:<18} {}", "Years projected:", rows.len());
    println!("{:<18} ${:.0}", "Final balance:", summary.final_balance);
    println!("{:<18} ${:.0}", "Max balance:", summary.max_balance);
    match summary.depleted_at_age {
        Some(age) => println!("{:<18} age {}", "Depleted at:", age),
        None => println!("{:<18} never", "Depleted at:"),
    }
    if let Some(o) = outcome {
        if let Some(last) = o.results.last() {
            println!("{:<18} {}", "Iterations:", o.iterations);
            println!("{:<18} ${:.0}", "Worst case:", last.worst_case);
            println!("{:<18} ${:.0}", "Median:", last.median);
            println!("{:<18} ${:.0}", "Best case:", last.best_case);
        }
    }
}

/// Single JSON document with everything a chart layer needs.
pub fn export_json(
    output_path: &Path,
    rows: &[ProjectionYear],
    outcome: Option<&SimulationOutcome>,
    distribution: Option<&Distribution>,
) -> Result<()> {
    let summary = summarize(rows);
    let mut doc = serde_json::json!({
        "projection": rows,
        "summary": summary,
    });
    if let Some(o) = outcome {
        // strip per-year sample vectors; percentiles are what charts consume
        let percentiles: Vec<serde_json::Value> = o
            .results
            .iter()
            .map(|y| {
                serde_json::json!({
                    "year": y.year,
                    "worst_case": y.worst_case,
                    "p25": y.p25,
                    "median": y.median,
                    "p75": y.p75,
                    "best_case": y.best_case,
                })
            })
            .collect();
        doc["montecarlo"] = serde_json::json!({
            "iterations": o.iterations,
            "simulation_type": o.simulation_type,
            "results": percentiles,
        });
    }
    if let Some(d) = distribution {
        doc["distribution"] = serde_json::to_value(d)?;
    }
    let mut file = std::fs::File::create(output_path)?;
    serde_json::to_writer_pretty(&mut file, &doc)?;
    Ok(())
}

pub fn export_csv(output_path: &Path, rows: &[ProjectionYear]) -> Result<()> {
    let mut file = std::fs::File::create(output_path)?;
    writeln!(
        file,
        "year,age,starting_balance,interest,salary,contribution,active_retirement,slow_retirement,ending_balance"
    )?;
    for r in rows {
        writeln!(
            file,
            "{},{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
            r.year,
            r.age,
            r.starting_balance,
            r.interest,
            r.salary,
            r.contribution,
            r.active_retirement,
            r.slow_retirement,
            r.ending_balance,
        )?;
    }
    Ok(())
}
