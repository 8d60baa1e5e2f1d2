//! Belief over which region holds the target, revised by Bayes' rule after
//! each round of searching.

use crate::model::region::{REGION_COUNT, RegionId};
use core::fmt;
use serde::Serialize;

/// Tolerance when checking that the probabilities sum to one.
pub const SUM_TOLERANCE: f64 = 1e-9;

/// Denominators at or below this are treated as a collapsed posterior.
const MIN_DENOMINATOR: f64 = 1e-12;

/// The per-region target probabilities. Always sums to one within
/// [`SUM_TOLERANCE`]; mutated only by [`BeliefState::revise`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeliefState {
    probabilities: [f64; REGION_COUNT],
}

impl BeliefState {
    pub fn new(priors: [f64; REGION_COUNT]) -> Result<Self, BeliefError> {
        for (index, &prior) in priors.iter().enumerate() {
            if !prior.is_finite() || !(0.0..=1.0).contains(&prior) {
                return Err(BeliefError::PriorOutOfRange {
                    region: RegionId::ALL[index],
                    value: prior,
                });
            }
        }
        let sum: f64 = priors.iter().sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(BeliefError::PriorsDoNotSumToOne { sum });
        }
        Ok(Self {
            probabilities: priors,
        })
    }

    pub fn probability(&self, region: RegionId) -> f64 {
        self.probabilities[region.index()]
    }

    pub fn probabilities(&self) -> &[f64; REGION_COUNT] {
        &self.probabilities
    }

    /// Region currently holding the most probability mass.
    pub fn most_likely(&self) -> RegionId {
        RegionId::ALL
            .iter()
            .copied()
            .max_by(|a, b| {
                self.probability(*a)
                    .partial_cmp(&self.probability(*b))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(RegionId::Alpha)
    }

    /// Applies the simultaneous Bayes update for one round of searching.
    ///
    /// `effectiveness[i]` is the fraction of region `i` covered this round,
    /// zero for regions that were not searched. Each posterior is
    /// `p_i * (1 - e_i)` normalized by the sum over all regions. A collapsed
    /// denominator leaves the state untouched and reports
    /// [`BeliefError::DegeneratePosterior`].
    pub fn revise(&mut self, effectiveness: &[f64; REGION_COUNT]) -> Result<(), BeliefError> {
        let mut numerators = [0.0f64; REGION_COUNT];
        let mut denominator = 0.0f64;
        for index in 0..REGION_COUNT {
            numerators[index] = self.probabilities[index] * (1.0 - effectiveness[index]);
            denominator += numerators[index];
        }

        if !denominator.is_finite() || denominator <= MIN_DENOMINATOR {
            return Err(BeliefError::DegeneratePosterior { denominator });
        }

        for index in 0..REGION_COUNT {
            self.probabilities[index] = numerators[index] / denominator;
        }

        debug_assert!((self.probabilities.iter().sum::<f64>() - 1.0).abs() <= SUM_TOLERANCE);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BeliefError {
    PriorOutOfRange { region: RegionId, value: f64 },
    PriorsDoNotSumToOne { sum: f64 },
    DegeneratePosterior { denominator: f64 },
}

impl fmt::Display for BeliefError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BeliefError::PriorOutOfRange { region, value } => {
                write!(f, "prior {value} for region {region} is outside [0, 1]")
            }
            BeliefError::PriorsDoNotSumToOne { sum } => {
                write!(f, "priors sum to {sum}, expected 1")
            }
            BeliefError::DegeneratePosterior { denominator } => {
                write!(
                    f,
                    "posterior denominator collapsed to {denominator}; update refused"
                )
            }
        }
    }
}

impl std::error::Error for BeliefError {}
