//! Quality and process improvement formulas: Pareto analysis, process
//! capability (Cp/Cpk), DPMO and sigma level, process variation statistics.

use crate::core::error::ValidationError;
use crate::core::query::ValueItem;
use crate::formulas::inventory::rank_by_value;
use crate::formulas::normal::{dpmo_to_sigma, sigma_to_dpmo};
use serde::{Deserialize, Serialize};

/// One ranked item in a Pareto analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoEntry {
    pub id: String,
    pub value: f64,
    pub percentage: f64,
    pub cumulative_percentage: f64,
    /// Within the 80% cumulative cutoff
    pub is_vital_few: bool,
}

/// Result of a Pareto (80/20) analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParetoResult {
    pub entries: Vec<ParetoEntry>,
    pub vital_few_count: usize,
    pub trivial_many_count: usize,
    /// Share of total value contributed by the vital few
    pub vital_few_contribution_pct: f64,
}

/// Pareto analysis: rank by value descending and split at 80% cumulative
/// contribution into the vital few and the trivial many.
pub fn pareto_analysis(items: &[ValueItem]) -> Result<ParetoResult, ValidationError> {
    let ranked = rank_by_value(items)?;
    let total: f64 = ranked.iter().map(|i| i.value).sum();

    let mut cumulative = 0.0;
    let mut entries = Vec::with_capacity(ranked.len());
    for item in ranked {
        let percentage = item.value / total * 100.0;
        cumulative += percentage;
        entries.push(ParetoEntry {
            id: item.id.clone(),
            value: item.value,
            percentage,
            cumulative_percentage: cumulative,
            is_vital_few: cumulative <= 80.0,
        });
    }

    let vital_few_count = entries.iter().filter(|e| e.is_vital_few).count();
    let vital_few_contribution_pct = entries
        .iter()
        .filter(|e| e.is_vital_few)
        .map(|e| e.percentage)
        .sum();

    Ok(ParetoResult {
        trivial_many_count: entries.len() - vital_few_count,
        vital_few_count,
        vital_few_contribution_pct,
        entries,
    })
}

/// Interpretation band for a capability index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityBand {
    /// Cpk >= 2.0
    Excellent,
    /// Cpk >= 1.33
    Capable,
    /// Cpk >= 1.0
    Marginal,
    /// Cpk < 1.0
    Poor,
}

impl CapabilityBand {
    fn from_cpk(cpk: f64) -> Self {
        if cpk >= 2.0 {
            CapabilityBand::Excellent
        } else if cpk >= 1.33 {
            CapabilityBand::Capable
        } else if cpk >= 1.0 {
            CapabilityBand::Marginal
        } else {
            CapabilityBand::Poor
        }
    }
}

/// Result of a process capability analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityResult {
    pub cp: f64,
    pub cpk: f64,
    pub cpu: f64,
    pub cpl: f64,
    pub mean: f64,
    pub std_dev: f64,
    pub sample_size: usize,
    pub band: CapabilityBand,
    /// Short-term sigma estimate: 3 * Cpk, floored at zero
    pub sigma_level: f64,
    pub estimated_dpmo: f64,
}

/// Process capability: Cp = (USL-LSL)/(6*sigma), Cpk = min(CPU, CPL).
///
/// Uses the sample standard deviation (n-1). Requires at least two data
/// points, non-zero variation, and USL > LSL.
pub fn process_capability(
    data: &[f64],
    usl: f64,
    lsl: f64,
) -> Result<CapabilityResult, ValidationError> {
    require_sample(data, 2)?;
    if usl <= lsl {
        return Err(ValidationError::InvalidBounds { usl, lsl });
    }

    let mean = mean(data);
    let std_dev = sample_std(data, mean);
    if std_dev == 0.0 {
        return Err(ValidationError::ZeroVariance);
    }

    let cp = (usl - lsl) / (6.0 * std_dev);
    let cpu = (usl - mean) / (3.0 * std_dev);
    let cpl = (mean - lsl) / (3.0 * std_dev);
    let cpk = cpu.min(cpl);

    let sigma_level = (cpk * 3.0).max(0.0);
    let estimated_dpmo = if cpk > 0.0 {
        sigma_to_dpmo(sigma_level)
    } else {
        1_000_000.0
    };

    Ok(CapabilityResult {
        cp,
        cpk,
        cpu,
        cpl,
        mean,
        std_dev,
        sample_size: data.len(),
        band: CapabilityBand::from_cpk(cpk),
        sigma_level,
        estimated_dpmo,
    })
}

/// Result of a DPMO calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DpmoResult {
    pub defects: f64,
    pub units: f64,
    pub opportunities_per_unit: f64,
    pub total_opportunities: f64,
    /// Defects per opportunity
    pub dpo: f64,
    pub dpmo: f64,
    pub sigma_level: f64,
    pub yield_pct: f64,
}

/// Defects Per Million Opportunities and the derived sigma level.
pub fn dpmo(
    defects: f64,
    units: f64,
    opportunities_per_unit: f64,
) -> Result<DpmoResult, ValidationError> {
    if !defects.is_finite() || defects < 0.0 {
        return Err(ValidationError::negative("defects", defects));
    }
    if !units.is_finite() || units <= 0.0 {
        return Err(ValidationError::not_positive("units", units));
    }
    if !opportunities_per_unit.is_finite() || opportunities_per_unit <= 0.0 {
        return Err(ValidationError::not_positive(
            "opportunities_per_unit",
            opportunities_per_unit,
        ));
    }

    let total_opportunities = units * opportunities_per_unit;
    if defects > total_opportunities {
        return Err(ValidationError::OutOfRange {
            name: "defects".to_string(),
            min: 0.0,
            max: total_opportunities,
            value: defects,
        });
    }

    let dpo = defects / total_opportunities;
    let dpmo = dpo * 1_000_000.0;

    Ok(DpmoResult {
        defects,
        units,
        opportunities_per_unit,
        total_opportunities,
        dpo,
        dpmo,
        sigma_level: dpmo_to_sigma(dpmo),
        yield_pct: (1.0 - dpo) * 100.0,
    })
}

/// Result of a yield-to-sigma conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SigmaLevelResult {
    pub yield_pct: f64,
    pub dpmo: f64,
    pub sigma_level: f64,
}

/// Sigma level from process yield percentage (0..=100).
pub fn sigma_level_from_yield(yield_pct: f64) -> Result<SigmaLevelResult, ValidationError> {
    if !yield_pct.is_finite() || !(0.0..=100.0).contains(&yield_pct) {
        return Err(ValidationError::OutOfRange {
            name: "yield_pct".to_string(),
            min: 0.0,
            max: 100.0,
            value: yield_pct,
        });
    }

    let dpmo = (1.0 - yield_pct / 100.0) * 1_000_000.0;
    Ok(SigmaLevelResult {
        yield_pct,
        dpmo,
        sigma_level: dpmo_to_sigma(dpmo),
    })
}

/// Stability assessment for a measured process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stability {
    /// No points beyond the control limits
    Stable,
    /// Outliers at or below 1% of the sample
    MostlyStable,
    /// More than 1% of points beyond the control limits
    Unstable,
}

/// Result of a process variation analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariationResult {
    pub sample_size: usize,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub variance: f64,
    /// Coefficient of variation in percent (0 when the mean is 0)
    pub cv_pct: f64,
    pub range: f64,
    /// Upper control limit: mean + 3 sigma
    pub ucl: f64,
    /// Lower control limit: mean - 3 sigma
    pub lcl: f64,
    pub outliers: Vec<f64>,
    pub stability: Stability,
}

/// Process variation statistics: central tendency, spread, +/-3 sigma
/// control limits, and points beyond them.
pub fn process_variation(data: &[f64]) -> Result<VariationResult, ValidationError> {
    require_sample(data, 2)?;

    let n = data.len();
    let mean_v = mean(data);
    let std_dev = sample_std(data, mean_v);
    let variance = std_dev * std_dev;
    let cv_pct = if mean_v != 0.0 {
        std_dev / mean_v * 100.0
    } else {
        0.0
    };

    let mut sorted = data.to_vec();
    sorted.sort_by(f64::total_cmp);
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    let range = sorted[n - 1] - sorted[0];

    let ucl = mean_v + 3.0 * std_dev;
    let lcl = mean_v - 3.0 * std_dev;
    let outliers: Vec<f64> = data.iter().copied().filter(|x| *x > ucl || *x < lcl).collect();

    let stability = if outliers.is_empty() {
        Stability::Stable
    } else if outliers.len() as f64 <= n as f64 * 0.01 {
        Stability::MostlyStable
    } else {
        Stability::Unstable
    };

    Ok(VariationResult {
        sample_size: n,
        mean: mean_v,
        median,
        std_dev,
        variance,
        cv_pct,
        range,
        ucl,
        lcl,
        outliers,
        stability,
    })
}

fn require_sample(data: &[f64], required: usize) -> Result<(), ValidationError> {
    if data.len() < required {
        return Err(ValidationError::InsufficientData {
            required,
            actual: data.len(),
        });
    }
    if let Some(bad) = data.iter().find(|x| !x.is_finite()) {
        return Err(ValidationError::negative("data point", *bad));
    }
    Ok(())
}

fn mean(data: &[f64]) -> f64 {
    data.iter().sum::<f64>() / data.len() as f64
}

/// Sample standard deviation (n-1 denominator).
fn sample_std(data: &[f64], mean: f64) -> f64 {
    let sum_sq: f64 = data.iter().map(|x| (x - mean).powi(2)).sum();
    (sum_sq / (data.len() - 1) as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(values: &[f64]) -> Vec<ValueItem> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| ValueItem::new(format!("cause-{}", i + 1), *v))
            .collect()
    }

    #[test]
    fn test_pareto_vital_few() {
        let r = pareto_analysis(&items(&[60.0, 25.0, 10.0, 5.0])).unwrap();
        // Cumulative: 60, 85, 95, 100 - only the first is within 80%
        assert_eq!(r.vital_few_count, 1);
        assert_eq!(r.trivial_many_count, 3);
        assert!(r.entries[0].is_vital_few);
        assert!(!r.entries[1].is_vital_few);
    }

    #[test]
    fn test_pareto_requires_items() {
        assert_eq!(
            pareto_analysis(&[]).unwrap_err(),
            ValidationError::EmptyItems
        );
    }

    #[test]
    fn test_capability_sample() {
        let data = [4.9, 5.0, 5.1, 4.8, 5.2];
        let r = process_capability(&data, 10.0, 0.0).unwrap();
        assert!(r.cp > 0.0 && r.cp.is_finite());
        assert!(r.cpk > 0.0 && r.cpk.is_finite());
        assert!(r.cpk <= r.cp);
        assert!((r.mean - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_capability_needs_two_points() {
        let err = process_capability(&[5.0], 10.0, 0.0).unwrap_err();
        assert_eq!(err.kind(), "insufficient_data");
    }

    #[test]
    fn test_capability_zero_variance() {
        let err = process_capability(&[5.0, 5.0, 5.0], 10.0, 0.0).unwrap_err();
        assert_eq!(err, ValidationError::ZeroVariance);
    }

    #[test]
    fn test_capability_inverted_limits() {
        assert!(matches!(
            process_capability(&[4.9, 5.1], 0.0, 10.0),
            Err(ValidationError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn test_dpmo_example() {
        // 15 / (1000 * 3) * 1e6 = 5000
        let r = dpmo(15.0, 1000.0, 3.0).unwrap();
        assert!((r.dpmo - 5000.0).abs() < 0.1);
        assert!(r.sigma_level > 3.5 && r.sigma_level < 4.5);
        assert!((r.yield_pct - 99.5).abs() < 1e-9);
    }

    #[test]
    fn test_dpmo_validation() {
        assert!(dpmo(-1.0, 1000.0, 3.0).is_err());
        assert!(dpmo(15.0, 0.0, 3.0).is_err());
        assert!(dpmo(15.0, 1000.0, 0.0).is_err());
        // More defects than opportunities
        assert!(dpmo(5000.0, 10.0, 3.0).is_err());
    }

    #[test]
    fn test_sigma_from_yield() {
        // Canonical Six Sigma yield: 99.99966% = 3.4 DPMO
        let r = sigma_level_from_yield(99.99966).unwrap();
        assert!((r.sigma_level - 6.0).abs() < 0.05);
        // One digit less is a materially worse process, not six sigma
        let r = sigma_level_from_yield(99.9966).unwrap();
        assert!((r.dpmo - 34.0).abs() < 0.5);
        assert!((r.sigma_level - 5.48).abs() < 0.05);
        assert!(sigma_level_from_yield(101.0).is_err());
        assert!(sigma_level_from_yield(-0.1).is_err());
    }

    #[test]
    fn test_process_variation() {
        let data = [10.0, 10.2, 9.8, 10.1, 9.9, 10.0];
        let r = process_variation(&data).unwrap();
        assert!((r.mean - 10.0).abs() < 1e-9);
        assert_eq!(r.stability, Stability::Stable);
        assert!(r.ucl > r.mean && r.lcl < r.mean);
        assert!(r.outliers.is_empty());
        assert!((r.median - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_variation_flags_outliers() {
        // 50 tight points plus one far outlier: beyond 3 sigma and > 1%
        let mut data: Vec<f64> = (0..50).map(|i| 10.0 + 0.01 * (i % 5) as f64).collect();
        data.push(30.0);
        let r = process_variation(&data).unwrap();
        assert!(!r.outliers.is_empty());
        assert_ne!(r.stability, Stability::Stable);
    }

    #[test]
    fn test_variation_rejects_nan() {
        assert!(process_variation(&[1.0, f64::NAN]).is_err());
    }
}
