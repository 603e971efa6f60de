//! Grid scan of the chemistry-blend score over sodium fractions.

use lcis_core::traits::Calculator;
use lcis_core::types::{DomainError, EvaluationError, RawParameters, ResultRecord};

use crate::calculators::ChemistryBlend;

/// Configuration for the blend scan.
///
/// # Example
///
/// ```
/// use lcis_models::optimiser::BlendScanConfig;
///
/// let config = BlendScanConfig::default();
/// assert_eq!(config.step, 0.01);
///
/// let coarse = BlendScanConfig::with_step(0.2);
/// assert_eq!(coarse.step, 0.2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlendScanConfig {
    /// Distance between scanned sodium fractions, in (0, 1].
    pub step: f64,

    /// A later fraction only wins if its score exceeds the current best by
    /// more than this, so near-ties go to the lower sodium fraction.
    pub tie_tolerance: f64,
}

impl Default for BlendScanConfig {
    /// Default values:
    /// - `step`: 0.01
    /// - `tie_tolerance`: 1e-12
    fn default() -> Self {
        Self {
            step: 0.01,
            tie_tolerance: 1e-12,
        }
    }
}

impl BlendScanConfig {
    /// Default configuration with a custom step.
    pub fn with_step(step: f64) -> Self {
        Self {
            step,
            ..Self::default()
        }
    }
}

/// One evaluated point of the scan.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BlendPoint {
    /// Sodium share of total capacity
    pub sodium_fraction: f64,
    /// Blend score at that share
    pub score: f64,
}

/// Result of a blend scan.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BlendOptimum {
    /// Best sodium fraction
    pub sodium_fraction: f64,
    /// Score at the best fraction
    pub score: f64,
    /// Full record of the best fraction
    pub record: ResultRecord,
    /// Every evaluated point in ascending fraction order
    pub curve: Vec<BlendPoint>,
}

/// Largest number of sodium fractions a scan will evaluate.
pub const MAX_GRID_POINTS: usize = 1_000_001;

/// Sodium fractions `{0, step, 2·step, …, 1}`.
///
/// The last grid point is always exactly 1, even when `1 / step` is not
/// a whole number.
///
/// # Errors
/// `InvalidStep` unless `step` lies in (0, 1], and `GridTooFine` when the
/// grid would hold more than [`MAX_GRID_POINTS`] fractions.
///
/// # Examples
/// ```
/// use lcis_models::optimiser::sodium_fractions;
///
/// assert_eq!(sodium_fractions(0.25).unwrap(), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
/// assert_eq!(sodium_fractions(0.4).unwrap().last(), Some(&1.0));
/// assert!(sodium_fractions(0.0).is_err());
/// assert!(sodium_fractions(1e-300).is_err());
/// ```
pub fn sodium_fractions(step: f64) -> Result<Vec<f64>, DomainError> {
    if !(step > 0.0 && step <= 1.0) {
        return Err(DomainError::InvalidStep { step });
    }

    // 1 / step may land just off a whole number.
    let spans = 1.0 / step;
    let points = (spans - 1e-9).ceil() + 1.0;
    if points > MAX_GRID_POINTS as f64 {
        return Err(DomainError::GridTooFine {
            step,
            max_points: MAX_GRID_POINTS,
        });
    }

    let intervals = (spans + 1e-9).floor() as usize;
    let mut fractions: Vec<f64> = (0..=intervals)
        .map(|k| (k as f64 * step).min(1.0))
        .collect();

    match fractions.last_mut() {
        Some(last) if (1.0 - *last).abs() < 1e-9 => *last = 1.0,
        _ => fractions.push(1.0),
    }
    Ok(fractions)
}

/// Scans sodium fractions and returns the one maximising the blend score.
///
/// `base` supplies every chemistry-blend input except the capacities,
/// which are set to `1 − f` and `f` for each fraction `f`.
///
/// # Arguments
/// * `base` - Weights, performances and costs (missing ones take their defaults)
/// * `config` - Grid step and tie tolerance
///
/// # Returns
/// The best fraction, its score and record, and the whole curve.
///
/// # Examples
/// ```
/// use lcis_core::types::RawParameters;
/// use lcis_models::optimiser::{optimise_blend, BlendScanConfig};
///
/// let optimum = optimise_blend(&RawParameters::new(), &BlendScanConfig::default()).unwrap();
/// assert_eq!(optimum.sodium_fraction, 0.0);
/// assert_eq!(optimum.curve.len(), 101);
/// ```
pub fn optimise_blend(
    base: &RawParameters,
    config: &BlendScanConfig,
) -> Result<BlendOptimum, EvaluationError> {
    let fractions = sodium_fractions(config.step)?;
    let calculator = ChemistryBlend;
    let schema = calculator.schema();

    let mut curve = Vec::with_capacity(fractions.len());
    let mut best: Option<(f64, ResultRecord)> = None;

    for fraction in fractions {
        let raw = RawParameters::new()
            .with("li_capacity", 1.0 - fraction)
            .with("na_capacity", fraction)
            .layered_over(base);
        let params = schema.validate(&raw)?;
        let record = calculator.evaluate(&params)?;
        let score = record.final_value();

        curve.push(BlendPoint {
            sodium_fraction: fraction,
            score,
        });

        let improves = match &best {
            None => true,
            Some((_, current)) => score > current.final_value() + config.tie_tolerance,
        };
        if improves {
            best = Some((fraction, record));
        }
    }

    match best {
        Some((sodium_fraction, record)) => {
            tracing::debug!(
                sodium_fraction,
                score = record.final_value(),
                "blend scan complete"
            );
            Ok(BlendOptimum {
                sodium_fraction,
                score: record.final_value(),
                record,
                curve,
            })
        }
        None => Err(DomainError::InvalidStep { step: config.step }.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_grid_includes_both_ends() {
        let grid = sodium_fractions(0.01).unwrap();
        assert_eq!(grid.len(), 101);
        assert_eq!(grid[0], 0.0);
        assert_eq!(grid[100], 1.0);
    }

    #[test]
    fn test_grid_uneven_step() {
        let grid = sodium_fractions(0.3).unwrap();
        assert_eq!(grid.len(), 5);
        assert_relative_eq!(grid[3], 0.9, epsilon = 1e-12);
        assert_eq!(grid[4], 1.0);
    }

    #[test]
    fn test_grid_step_one() {
        assert_eq!(sodium_fractions(1.0).unwrap(), vec![0.0, 1.0]);
    }

    #[test]
    fn test_invalid_steps() {
        for step in [0.0, -0.1, 1.5, f64::NAN] {
            assert!(sodium_fractions(step).is_err(), "step {} accepted", step);
        }
        assert!(matches!(
            optimise_blend(&RawParameters::new(), &BlendScanConfig::with_step(0.0)),
            Err(EvaluationError::Domain(DomainError::InvalidStep { .. }))
        ));
    }

    #[test]
    fn test_too_fine_step_rejected_before_building() {
        for step in [1e-300, f64::MIN_POSITIVE, 1e-7] {
            assert_eq!(
                sodium_fractions(step),
                Err(DomainError::GridTooFine {
                    step,
                    max_points: MAX_GRID_POINTS,
                })
            );
        }
        assert!(matches!(
            optimise_blend(&RawParameters::new(), &BlendScanConfig::with_step(1e-300)),
            Err(EvaluationError::Domain(DomainError::GridTooFine { .. }))
        ));
    }

    #[test]
    fn test_finest_allowed_grid() {
        let grid = sodium_fractions(1e-6).unwrap();
        assert_eq!(grid.len(), MAX_GRID_POINTS);
        assert_eq!(grid[0], 0.0);
        assert_eq!(grid[MAX_GRID_POINTS - 1], 1.0);
    }

    #[test]
    fn test_defaults_prefer_pure_lithium() {
        let optimum = optimise_blend(&RawParameters::new(), &BlendScanConfig::default()).unwrap();
        assert_eq!(optimum.sodium_fraction, 0.0);
        assert_relative_eq!(optimum.score, 0.6, epsilon = 1e-12);
        assert_eq!(optimum.record.component("na_ratio"), Some(0.0));
    }

    #[test]
    fn test_sodium_wins_when_better() {
        let base = RawParameters::new()
            .with("na_performance", 3.0)
            .with("integration_bonus", 0.0);
        let optimum = optimise_blend(&base, &BlendScanConfig::with_step(0.1)).unwrap();
        assert_eq!(optimum.sodium_fraction, 1.0);
        assert_relative_eq!(optimum.score, 0.9, epsilon = 1e-12);
    }

    #[test]
    fn test_flat_curve_ties_to_lowest_fraction() {
        // α·Li = β·Na and no bonus: every fraction scores 0.5
        let base = RawParameters::new()
            .with("alpha", 0.5)
            .with("beta", 0.5)
            .with("na_performance", 1.0)
            .with("integration_bonus", 0.0);
        let optimum = optimise_blend(&base, &BlendScanConfig::with_step(0.05)).unwrap();
        assert_eq!(optimum.sodium_fraction, 0.0);
    }

    #[test]
    fn test_integration_bonus_can_pick_interior() {
        let base = RawParameters::new()
            .with("alpha", 0.5)
            .with("beta", 0.5)
            .with("na_performance", 1.0)
            .with("gamma", 1.0)
            .with("integration_bonus", 1.0);
        let optimum = optimise_blend(&base, &BlendScanConfig::with_step(0.1)).unwrap();
        assert_relative_eq!(optimum.sodium_fraction, 0.5, epsilon = 1e-12);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_lower_sodium_performance_gives_zero_sodium(
            na_perf in 0.0..0.99_f64,
            step in 0.01..=1.0_f64,
        ) {
            let base = RawParameters::new()
                .with("na_performance", na_perf)
                .with("integration_bonus", 0.0);
            let optimum = optimise_blend(&base, &BlendScanConfig::with_step(step)).unwrap();
            prop_assert_eq!(optimum.sodium_fraction, 0.0);
        }

        #[test]
        fn test_scan_is_deterministic(step in 0.02..=0.5_f64) {
            let config = BlendScanConfig::with_step(step);
            let a = optimise_blend(&RawParameters::new(), &config).unwrap();
            let b = optimise_blend(&RawParameters::new(), &config).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
