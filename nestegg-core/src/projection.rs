use crate::scenario::{Assumptions, FINAL_AGE};
use nestegg_common::Result;
use serde::{Deserialize, Serialize};

/// One row of the year-by-year projection, in the wire format the
/// calculation API returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionYear {
    pub year: i32,
    pub age: u32,
    pub starting_balance: f64,
    pub interest: f64,
    pub salary: f64,
    pub contribution: f64,
    pub active_retirement: f64,
    pub slow_retirement: f64,
    pub ending_balance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub final_balance: f64,
    pub max_balance: f64,
    pub depleted_at_age: Option<u32>,
}

/// Deterministic projection: accumulate until retirement age, then draw
/// down until age 100 or depletion.
///
/// During accumulation the balance earns the pre-retirement return and
/// receives `salary * contribution_rate`, with the salary growing each
/// year. In retirement the active spending level inflates annually until
/// the slowdown age, after which the slowdown spending takes over and
/// inflates from its own base. The balance never goes negative; the walk
/// stops in the year it reaches zero.
pub fn project(assumptions: &Assumptions) -> Result<Vec<ProjectionYear>> {
    assumptions.validate()?;

    let ror_before = assumptions.rate_of_return_before_retirement / 100.0;
    let ror_in = assumptions.rate_of_return_in_retirement / 100.0;
    let salary_growth = assumptions.salary_growth_rate / 100.0;
    let inflation = assumptions.inflation_in_retirement / 100.0;
    let contrib_rate = assumptions.annual_contribution / 100.0;

    let mut rows = Vec::new();
    let mut year = assumptions.current_year;
    let mut age = assumptions.current_age;
    let mut balance = assumptions.current_nest_egg;
    let mut salary = assumptions.current_salary;

    while age < assumptions.retirement_age {
        let interest = balance * ror_before;
        let contribution = salary * contrib_rate;
        let ending = balance + interest + contribution;
        rows.push(ProjectionYear {
            year,
            age,
            starting_balance: balance,
            interest,
            salary,
            contribution,
            active_retirement: 0.0,
            slow_retirement: 0.0,
            ending_balance: ending,
        });
        balance = ending;
        salary *= 1.0 + salary_growth;
        year += 1;
        age += 1;
    }

    let mut active_withdrawal = assumptions.spending_at_retirement;
    let mut slow_withdrawal: Option<f64> = None;

    while age <= FINAL_AGE && balance > 0.0 {
        let interest = balance * ror_in;
        let (withdrawal, active_ret, slow_ret) = if age < assumptions.slowdown_age {
            (active_withdrawal, active_withdrawal, 0.0)
        } else {
            let w = match slow_withdrawal {
                None => assumptions.spending_at_slowdown,
                Some(prev) => prev * (1.0 + inflation),
            };
            slow_withdrawal = Some(w);
            (w, 0.0, w)
        };

        let mut ending = balance + interest - withdrawal;
        if ending < 0.0 {
            ending = 0.0;
        }
        rows.push(ProjectionYear {
            year,
            age,
            starting_balance: balance,
            interest,
            salary: 0.0,
            contribution: 0.0,
            active_retirement: active_ret,
            slow_retirement: slow_ret,
            ending_balance: ending,
        });

        balance = ending;
        if age < assumptions.slowdown_age {
            active_withdrawal *= 1.0 + inflation;
        }
        year += 1;
        age += 1;
    }

    Ok(rows)
}

pub fn summarize(rows: &[ProjectionYear]) -> ProjectionSummary {
    let final_balance = rows.last().map(|r| r.ending_balance).unwrap_or(0.0);
    let max_balance = rows
        .iter()
        .map(|r| r.ending_balance)
        .fold(0.0_f64, f64::max);
    let depleted_at_age = rows
        .iter()
        .find(|r| r.ending_balance == 0.0 && (r.active_retirement > 0.0 || r.slow_retirement > 0.0))
        .map(|r| r.age);
    ProjectionSummary {
        final_balance,
        max_balance,
        depleted_at_age,
    }
}
