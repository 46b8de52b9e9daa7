pub mod client;
pub mod compare;
pub mod export;
pub mod histogram;
pub mod montecarlo;
pub mod projection;
pub mod scenario;

pub use nestegg_common::{NestEggError, Result};

pub use client::{ApiClient, SessionContext, User};
pub use compare::{compare_projections, ScenarioComparison, YearDelta};
pub use export::{export_csv, export_json, print_summary};
pub use histogram::{build_distribution, Bin, Distribution, DistributionStats, DEFAULT_BIN_COUNT};
pub use montecarlo::{final_balances, run_monte_carlo, SimulationOutcome, YearOutcome};
pub use projection::{project, summarize, ProjectionSummary, ProjectionYear};
pub use scenario::{load_assumptions, Assumptions, SavedScenario, FINAL_AGE};
