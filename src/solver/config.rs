//! Solver configuration

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMetric;
use crate::local_search::TwoOptLimits;

/// Configuration for the route solver.
///
/// Deserializes with every field optional; missing fields take the
/// [`Default`] values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Distance formula for all legs.
    pub metric: DistanceMetric,
    /// Run 2-opt on every assigned route.
    pub optimize_routes: bool,
    /// Minimum route shortening (km) for a 2-opt move to count.
    pub min_improvement: f64,
    /// Consecutive non-improving 2-opt sweeps before giving up.
    pub max_idle_sweeps: usize,
    /// 2-opt sweep budget per stop in a route.
    pub sweeps_per_stop: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        let limits = TwoOptLimits::default();
        Self {
            metric: DistanceMetric::Haversine,
            optimize_routes: true,
            min_improvement: limits.min_improvement,
            max_idle_sweeps: limits.max_idle_sweeps,
            sweeps_per_stop: limits.sweeps_per_stop,
        }
    }
}

impl SolverConfig {
    /// Fast configuration for interactive use
    /// - Flat-earth distances
    /// - Tight 2-opt budget
    pub fn fast() -> Self {
        Self {
            metric: DistanceMetric::Equirectangular,
            max_idle_sweeps: 10,
            sweeps_per_stop: 10,
            ..Self::default()
        }
    }

    /// Thorough configuration for background planning
    /// - Smaller improvement threshold
    /// - Larger 2-opt budget
    pub fn thorough() -> Self {
        Self {
            min_improvement: 0.001,
            max_idle_sweeps: 500,
            sweeps_per_stop: 500,
            ..Self::default()
        }
    }

    /// Builder-style metric override.
    pub fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Builder-style switch for 2-opt.
    pub fn with_route_optimization(mut self, enabled: bool) -> Self {
        self.optimize_routes = enabled;
        self
    }

    /// The 2-opt stopping rules carried by this config.
    pub fn two_opt_limits(&self) -> TwoOptLimits {
        TwoOptLimits {
            min_improvement: self.min_improvement,
            max_idle_sweeps: self.max_idle_sweeps,
            sweeps_per_stop: self.sweeps_per_stop,
        }
    }
}
