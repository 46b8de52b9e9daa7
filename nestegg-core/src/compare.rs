use crate::projection::{summarize, ProjectionYear};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearDelta {
    pub year: i32,
    pub left_balance: f64,
    pub right_balance: f64,
    pub delta: f64,
}

/// Side-by-side comparison of two projected scenarios. Deltas are
/// right minus left.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub left_name: String,
    pub right_name: String,
    pub left_final_balance: f64,
    pub right_final_balance: f64,
    pub final_balance_delta: f64,
    pub left_max_balance: f64,
    pub right_max_balance: f64,
    pub max_balance_delta: f64,
    pub left_depleted_at_age: Option<u32>,
    pub right_depleted_at_age: Option<u32>,
    pub year_deltas: Vec<YearDelta>,
}

pub fn compare_projections(
    left_name: &str,
    left: &[ProjectionYear],
    right_name: &str,
    right: &[ProjectionYear],
) -> ScenarioComparison {
    let ls = summarize(left);
    let rs = summarize(right);

    let mut year_deltas = Vec::new();
    for lrow in left {
        if let Some(rrow) = right.iter().find(|r| r.year == lrow.year) {
            year_deltas.push(YearDelta {
                year: lrow.year,
                left_balance: lrow.ending_balance,
                right_balance: rrow.ending_balance,
                delta: rrow.ending_balance - lrow.ending_balance,
            });
        }
    }
    year_deltas.sort_by_key(|d| d.year);

    ScenarioComparison {
        left_name: left_name.to_owned(),
        right_name: right_name.to_owned(),
        left_final_balance: ls.final_balance,
        right_final_balance: rs.final_balance,
        final_balance_delta: rs.final_balance - ls.final_balance,
        left_max_balance: ls.max_balance,
        right_max_balance: rs.max_balance,
        max_balance_delta: rs.max_balance - ls.max_balance,
        left_depleted_at_age: ls.depleted_at_age,
        right_depleted_at_age: rs.depleted_at_age,
        year_deltas,
    }
}
