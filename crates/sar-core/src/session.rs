//! One search-and-rescue game: a hidden target, a belief over the three
//! regions, and a round loop driven by the caller. Starting over is an
//! explicit reset transition, not a new session.

use crate::belief::{BeliefError, BeliefState};
use crate::model::region::{Cell, REGION_COUNT, RegionId, RegionSet};
use crate::model::target::TargetLocation;
use crate::search::{self, EffectivenessRange, SearchOutcome, Sweep};
use core::fmt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// How the target's region is chosen at placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementModel {
    /// A triangular variate over the region indices with its mode at the
    /// midpoint, floored. Biases placement toward the middle region.
    Triangular,
    /// Explicit categorical weights per region.
    Weighted([f64; REGION_COUNT]),
}

/// Everything needed to start a session. Region geometry and the
/// effectiveness bounds are validated at construction of their own types;
/// priors and placement weights are validated by [`Session::new`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub regions: RegionSet,
    pub priors: [f64; REGION_COUNT],
    pub effectiveness: EffectivenessRange,
    pub placement: PlacementModel,
}

/// One region's share of a round: which region and how many independent
/// sweeps of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchAssignment {
    pub region: RegionId,
    pub sweeps: u8,
}

impl SearchAssignment {
    pub const fn single(region: RegionId) -> Self {
        Self { region, sweeps: 1 }
    }

    pub const fn double(region: RegionId) -> Self {
        Self { region, sweeps: 2 }
    }
}

/// Everything the driver needs to report one completed round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundResult {
    pub round: u32,
    pub outcomes: Vec<(RegionId, SearchOutcome)>,
    /// Per-region effectiveness as fed into the belief update: zero for
    /// unsearched regions, the sampled value for single sweeps, the union
    /// coverage ratio when a region was swept more than once.
    pub effectiveness: [f64; REGION_COUNT],
    /// Beliefs after the update.
    pub beliefs: [f64; REGION_COUNT],
    pub found: Option<RegionId>,
}

#[derive(Debug, Clone)]
pub struct Session {
    regions: RegionSet,
    initial_belief: BeliefState,
    belief: BeliefState,
    effectiveness: EffectivenessRange,
    placement: PlacementModel,
    target: Option<TargetLocation>,
    rng: StdRng,
    seed: u64,
    round_number: u32,
    halted: bool,
}

impl Session {
    pub fn new(config: SessionConfig) -> Result<Self, SessionError> {
        let seed: u64 = rand::random();
        Self::with_seed(config, seed)
    }

    pub fn with_seed(config: SessionConfig, seed: u64) -> Result<Self, SessionError> {
        if let PlacementModel::Weighted(weights) = &config.placement {
            let sum: f64 = weights.iter().sum();
            if weights.iter().any(|w| !w.is_finite() || *w < 0.0) || sum <= 0.0 {
                return Err(SessionError::InvalidPlacementWeights { sum });
            }
        }

        let belief = BeliefState::new(config.priors)?;
        Ok(Self {
            regions: config.regions,
            initial_belief: belief.clone(),
            belief,
            effectiveness: config.effectiveness,
            placement: config.placement,
            target: None,
            rng: StdRng::seed_from_u64(seed),
            seed,
            round_number: 1,
            halted: false,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn regions(&self) -> &RegionSet {
        &self.regions
    }

    pub fn beliefs(&self) -> &[f64; REGION_COUNT] {
        self.belief.probabilities()
    }

    pub fn probability(&self, region: RegionId) -> f64 {
        self.belief.probability(region)
    }

    pub fn most_likely_region(&self) -> RegionId {
        self.belief.most_likely()
    }

    pub fn target(&self) -> Option<TargetLocation> {
        self.target
    }

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Fixes the ground truth for this session. Callable exactly once;
    /// `reset` clears it again.
    pub fn place_target(&mut self) -> Result<TargetLocation, SessionError> {
        if self.target.is_some() {
            return Err(SessionError::AlreadyPlaced);
        }

        let region_id = self.sample_region();
        let region = self.regions.get(region_id);
        let cell = Cell::new(
            self.rng.gen_range(0..region.width()),
            self.rng.gen_range(0..region.height()),
        );

        let target = TargetLocation::new(region_id, cell);
        self.target = Some(target);
        Ok(target)
    }

    /// Runs one round: sample effectiveness for each planned region, sweep,
    /// then commit the Bayes update. A degenerate posterior halts the
    /// session until `reset`.
    pub fn run_round(&mut self, plan: &[SearchAssignment]) -> Result<RoundResult, SessionError> {
        if self.halted {
            return Err(SessionError::Halted);
        }
        let target = self.target.ok_or(SessionError::TargetNotPlaced)?;
        self.validate_plan(plan)?;

        let mut effectiveness = [0.0f64; REGION_COUNT];
        let mut outcomes = Vec::with_capacity(plan.len());
        let mut found = None;

        for assignment in plan {
            let region = self.regions.get(assignment.region);
            let sampled = self.effectiveness.sample(&mut self.rng);

            let mut sweeps: Vec<Sweep> = Vec::with_capacity(assignment.sweeps as usize);
            for _ in 0..assignment.sweeps {
                sweeps.push(search::sweep_region(region, sampled, &target, &mut self.rng));
            }

            let outcome = sweeps
                .iter()
                .map(|sweep| sweep.outcome)
                .find(|outcome| outcome.is_found())
                .unwrap_or(SearchOutcome::NotFound);
            if let SearchOutcome::Found(region) = outcome {
                found = Some(region);
            }

            effectiveness[assignment.region.index()] = if assignment.sweeps > 1 {
                search::combined_effectiveness(region, &sweeps)
            } else {
                sampled
            };
            outcomes.push((assignment.region, outcome));
        }

        if let Err(error) = self.belief.revise(&effectiveness) {
            if matches!(error, BeliefError::DegeneratePosterior { .. }) {
                self.halted = true;
            }
            return Err(SessionError::Belief(error));
        }

        let result = RoundResult {
            round: self.round_number,
            outcomes,
            effectiveness,
            beliefs: *self.belief.probabilities(),
            found,
        };
        self.round_number += 1;
        Ok(result)
    }

    /// Returns to the pre-placement state: no target, prior beliefs, round
    /// one, unhalted. The session RNG keeps advancing; reproducible games
    /// come from constructing a fresh session `with_seed`.
    pub fn reset(&mut self) {
        self.target = None;
        self.belief = self.initial_belief.clone();
        self.round_number = 1;
        self.halted = false;
    }

    fn validate_plan(&self, plan: &[SearchAssignment]) -> Result<(), SessionError> {
        if plan.is_empty() {
            return Err(SessionError::EmptyPlan);
        }
        let mut planned = [false; REGION_COUNT];
        for assignment in plan {
            if assignment.sweeps == 0 {
                return Err(SessionError::ZeroSweeps {
                    region: assignment.region,
                });
            }
            if planned[assignment.region.index()] {
                return Err(SessionError::DuplicateRegion {
                    region: assignment.region,
                });
            }
            planned[assignment.region.index()] = true;
        }
        Ok(())
    }

    fn sample_region(&mut self) -> RegionId {
        match self.placement {
            PlacementModel::Triangular => self.sample_region_triangular(),
            PlacementModel::Weighted(weights) => self.sample_region_weighted(&weights),
        }
    }

    /// Inverse-CDF draw from a symmetric triangular distribution over
    /// `[0, REGION_COUNT)`, floored to an index.
    fn sample_region_triangular(&mut self) -> RegionId {
        let high = REGION_COUNT as f64;
        let mode = high / 2.0;
        let u: f64 = self.rng.gen_range(0.0..1.0);

        let value = if u < mode / high {
            (u * high * mode).sqrt()
        } else {
            high - ((1.0 - u) * high * (high - mode)).sqrt()
        };

        let index = (value.floor() as usize).min(REGION_COUNT - 1);
        RegionId::ALL[index]
    }

    fn sample_region_weighted(&mut self, weights: &[f64; REGION_COUNT]) -> RegionId {
        let total: f64 = weights.iter().sum();
        let mut choice = self.rng.gen_range(0.0..total);
        for (index, &weight) in weights.iter().enumerate() {
            if weight <= 0.0 {
                continue;
            }
            if choice <= weight {
                return RegionId::ALL[index];
            }
            choice -= weight;
        }
        RegionId::ALL[REGION_COUNT - 1]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionError {
    Belief(BeliefError),
    InvalidPlacementWeights { sum: f64 },
    AlreadyPlaced,
    TargetNotPlaced,
    Halted,
    EmptyPlan,
    ZeroSweeps { region: RegionId },
    DuplicateRegion { region: RegionId },
}

impl From<BeliefError> for SessionError {
    fn from(error: BeliefError) -> Self {
        SessionError::Belief(error)
    }
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Belief(error) => error.fmt(f),
            SessionError::InvalidPlacementWeights { sum } => {
                write!(f, "placement weights must be non-negative with a positive sum (sum was {sum})")
            }
            SessionError::AlreadyPlaced => {
                f.write_str("target already placed; reset the session to start over")
            }
            SessionError::TargetNotPlaced => f.write_str("no target placed yet"),
            SessionError::Halted => {
                f.write_str("session halted after a degenerate belief update; reset to continue")
            }
            SessionError::EmptyPlan => f.write_str("a round must search at least one region"),
            SessionError::ZeroSweeps { region } => {
                write!(f, "region {region} requested with zero sweeps")
            }
            SessionError::DuplicateRegion { region } => {
                write!(f, "region {region} appears more than once in the plan")
            }
        }
    }
}

impl std::error::Error for SessionError {}
