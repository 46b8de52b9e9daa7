use nestegg_common::{NestEggError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Financial assumptions for one scenario. Field names follow the wire
/// format the calculation API accepts (camelCase); rates are whole-number
/// percentages (4.5 means 4.5%).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assumptions {
    #[serde(default)]
    pub scenario_name: String,
    pub current_year: i32,
    pub current_age: u32,
    pub retirement_age: u32,
    pub current_salary: f64,
    pub annual_contribution: f64, // % of salary saved each year
    pub salary_growth_rate: f64,
    pub current_nest_egg: f64,
    pub rate_of_return_before_retirement: f64,
    pub spending_at_retirement: f64,
    pub slowdown_age: u32,
    pub spending_at_slowdown: f64,
    pub rate_of_return_in_retirement: f64,
    pub inflation_in_retirement: f64,
}

/// A scenario as the backend persists it: assumptions plus the projection
/// that was current when the user saved, serialized to a JSON string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedScenario {
    #[serde(rename = "ID", default)]
    pub id: u64,
    #[serde(default)]
    pub user_id: u64,
    #[serde(flatten)]
    pub assumptions: Assumptions,
    #[serde(default)]
    pub projection_data: String,
}

pub const FINAL_AGE: u32 = 100;

impl Assumptions {
    pub fn validate(&self) -> Result<()> {
        if self.retirement_age <= self.current_age {
            return Err(NestEggError::InvalidInput(format!(
                "retirement age {} must be greater than current age {}",
                self.retirement_age, self.current_age
            )));
        }
        if self.slowdown_age < self.retirement_age {
            return Err(NestEggError::InvalidInput(format!(
                "slowdown age {} must not precede retirement age {}",
                self.slowdown_age, self.retirement_age
            )));
        }
        if self.retirement_age > FINAL_AGE {
            return Err(NestEggError::InvalidInput(format!(
                "retirement age {} exceeds projection horizon {FINAL_AGE}",
                self.retirement_age
            )));
        }
        let rates = [
            self.annual_contribution,
            self.salary_growth_rate,
            self.rate_of_return_before_retirement,
            self.rate_of_return_in_retirement,
            self.inflation_in_retirement,
        ];
        if rates.iter().any(|r| !r.is_finite()) {
            return Err(NestEggError::InvalidInput("rates must be finite".into()));
        }
        if self.current_salary < 0.0 || self.current_nest_egg < 0.0 {
            return Err(NestEggError::InvalidInput(
                "salary and nest egg must be non-negative".into(),
            ));
        }
        Ok(())
    }
}

/// Load a scenario file; `.toml` parses as TOML, anything else as JSON.
pub fn load_assumptions(path: &Path) -> Result<Assumptions> {
    let content = std::fs::read_to_string(path)?;
    let assumptions: Assumptions = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&content)?,
        _ => serde_json::from_str(&content)?,
    };
    assumptions.validate()?;
    Ok(assumptions)
}
