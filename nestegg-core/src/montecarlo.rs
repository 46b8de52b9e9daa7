use crate::scenario::{Assumptions, FINAL_AGE};
use log::debug;
use nestegg_common::{Result, SimulationConfig};
use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Percentile spread of simulated balances for one year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearOutcome {
    pub year: i32,
    pub worst_case: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub best_case: f64,
    pub all_results: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub iterations: usize,
    pub results: Vec<YearOutcome>,
    pub simulation_type: String,
}

/// Monte Carlo over the same walk as the deterministic projection, with
/// the retirement-phase inflation drawn uniformly from the configured
/// range each year. Depleted paths keep reporting their final balance
/// through age 100 so every year carries `iterations` samples.
///
/// Iterations run on the rayon pool; each path derives its RNG from the
/// base seed and path index, so a seeded run is reproducible regardless
/// of scheduling.
pub fn run_monte_carlo(
    assumptions: &Assumptions,
    config: &SimulationConfig,
) -> Result<SimulationOutcome> {
    assumptions.validate()?;
    if config.iterations == 0 {
        return Err(nestegg_common::NestEggError::InvalidInput(
            "simulation iterations must be at least 1".into(),
        ));
    }

    let start_year = assumptions.current_year;
    let years = (FINAL_AGE - assumptions.current_age) as usize + 1;
    let base_seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
    debug!(
        "monte carlo: {} iterations over {} years, seed {}",
        config.iterations, years, base_seed
    );

    let paths: Vec<Vec<f64>> = (0..config.iterations)
        .into_par_iter()
        .map(|i| {
            let mut rng = StdRng::seed_from_u64(base_seed.wrapping_add(i as u64));
            simulate_path(assumptions, config, &mut rng, years)
        })
        .collect();

    let mut results = Vec::with_capacity(years);
    for y in 0..years {
        let mut values: Vec<f64> = paths.iter().map(|p| p[y]).collect();
        values.sort_by(f64::total_cmp);
        let n = values.len();
        results.push(YearOutcome {
            year: start_year + y as i32,
            worst_case: values[0],
            p25: values[n / 4],
            median: values[n / 2],
            p75: values[(3 * n) / 4],
            best_case: values[n - 1],
            all_results: values,
        });
    }

    Ok(SimulationOutcome {
        iterations: config.iterations,
        results,
        simulation_type: format!(
            "Monte Carlo with Random Inflation ({}-{}%)",
            config.inflation_floor_pct, config.inflation_ceiling_pct
        ),
    })
}

/// The final-balance samples the histogram consumes: every path's balance
/// in the last simulated year.
pub fn final_balances(outcome: &SimulationOutcome) -> Vec<f64> {
    outcome
        .results
        .last()
        .map(|y| y.all_results.clone())
        .unwrap_or_default()
}

fn simulate_path(
    a: &Assumptions,
    config: &SimulationConfig,
    rng: &mut StdRng,
    years: usize,
) -> Vec<f64> {
    let ror_before = a.rate_of_return_before_retirement / 100.0;
    let ror_in = a.rate_of_return_in_retirement / 100.0;
    let salary_growth = a.salary_growth_rate / 100.0;
    let contrib_rate = a.annual_contribution / 100.0;
    let floor = config.inflation_floor_pct / 100.0;
    let ceiling = config.inflation_ceiling_pct / 100.0;

    let mut balances = Vec::with_capacity(years);
    let mut balance = a.current_nest_egg;
    let mut salary = a.current_salary;
    let mut age = a.current_age;

    while age < a.retirement_age && balances.len() < years {
        balance += balance * ror_before + salary * contrib_rate;
        salary *= 1.0 + salary_growth;
        balances.push(balance);
        age += 1;
    }

    let mut active_withdrawal = a.spending_at_retirement;
    let mut slow_withdrawal: Option<f64> = None;

    while age <= FINAL_AGE && balance > 0.0 && balances.len() < years {
        let interest = balance * ror_in;
        let inflation = if ceiling > floor {
            rng.gen_range(floor..ceiling)
        } else {
            floor
        };

        let withdrawal = if age < a.slowdown_age {
            let w = active_withdrawal;
            active_withdrawal *= 1.0 + inflation;
            w
        } else {
            let w = slow_withdrawal.unwrap_or(a.spending_at_slowdown);
            slow_withdrawal = Some(w * (1.0 + inflation));
            w
        };

        balance += interest - withdrawal;
        if balance < 0.0 {
            balance = 0.0;
        }
        balances.push(balance);
        age += 1;
    }

    // depleted (or retired-at-zero) paths hold their final balance to age 100
    while balances.len() < years {
        balances.push(balance);
    }
    balances
}
