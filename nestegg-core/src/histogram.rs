use nestegg_common::{NestEggError, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BIN_COUNT: usize = 20;

/// Half-open interval `[start, end)`; the last bin of a distribution is
/// closed so the maximum sample stays inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub bins: Vec<Bin>,
    pub stats: DistributionStats,
}

/// Frequency distribution of final-balance samples, for chart display.
///
/// Samples `<= 0` are dropped before anything is computed: a zero balance
/// marks a simulation path that was never populated, not a real outcome.
/// Non-finite samples fall out through the same filter. Statistics cover
/// the filtered set only.
///
/// When every retained sample is equal the range collapses; a bin width of
/// `1.0` is substituted so the single occupied bin still has extent. That
/// degenerate histogram is the intended result, not an error.
///
/// Bin index is `floor((v - min) / width)` clamped to `bin_count - 1`, so a
/// sample sitting exactly on an interior edge belongs to the bin that
/// starts there; only the maximum is pulled back into the last bin.
pub fn build_distribution(samples: &[f64], bin_count: usize) -> Result<Distribution> {
    if bin_count == 0 {
        return Err(NestEggError::InvalidInput(
            "histogram bin count must be at least 1".into(),
        ));
    }

    let filtered: Vec<f64> = samples
        .iter()
        .copied()
        .filter(|v| v.is_finite() && *v > 0.0)
        .collect();

    if filtered.is_empty() {
        return Ok(Distribution {
            bins: Vec::new(),
            stats: DistributionStats {
                min: 0.0,
                max: 0.0,
                mean: 0.0,
                count: 0,
            },
        });
    }

    let min = filtered.iter().copied().fold(f64::INFINITY, f64::min);
    let max = filtered.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    let mean = filtered.iter().sum::<f64>() / filtered.len() as f64;

    let width = if range == 0.0 {
        1.0
    } else {
        range / bin_count as f64
    };

    let mut counts = vec![0u64; bin_count];
    for &v in &filtered {
        let idx = (((v - min) / width).floor() as usize).min(bin_count - 1);
        counts[idx] += 1;
    }

    let bins = counts
        .iter()
        .enumerate()
        .map(|(i, &c)| Bin {
            start: min + i as f64 * width,
            end: min + (i + 1) as f64 * width,
            count: c,
        })
        .collect();

    Ok(Distribution {
        bins,
        stats: DistributionStats {
            min,
            max,
            mean,
            count: filtered.len() as u64,
        },
    })
}
