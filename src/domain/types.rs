//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - built at the call site and handed to the fitter
//! - exported to JSON
//! - rendered by the text report, the ASCII plot, and the TUI

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::fit::{validate_observation, GrowthError};

/// Tolerance used when matching observations for removal.
pub const MATCH_TOLERANCE: f64 = 1e-9;

/// A single `(time, concentration)` measurement.
///
/// Construction goes through [`Observation::new`], so every value in a series
/// already satisfies `time >= 0` and `concentration > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Observation {
    time: f64,
    concentration: f64,
}

impl Observation {
    pub fn new(time: f64, concentration: f64) -> Result<Self, GrowthError> {
        validate_observation(time, concentration)?;
        Ok(Self { time, concentration })
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn concentration(&self) -> f64 {
        self.concentration
    }

    pub fn log2_concentration(&self) -> f64 {
        self.concentration.log2()
    }

    /// Value equality within [`MATCH_TOLERANCE`] on both coordinates.
    pub fn matches(&self, other: &Observation) -> bool {
        (self.time - other.time).abs() < MATCH_TOLERANCE
            && (self.concentration - other.concentration).abs() < MATCH_TOLERANCE
    }
}

/// Caller-owned list of observations, kept sorted by ascending time.
///
/// Sorting is for display; the fitter does not depend on it. Observations
/// with equal times keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ObservationSeries {
    points: Vec<Observation>,
}

impl ObservationSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_observations(mut points: Vec<Observation>) -> Self {
        points.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { points }
    }

    /// Insert keeping the series sorted; returns the index it landed at.
    pub fn add(&mut self, obs: Observation) -> usize {
        let idx = self.points.partition_point(|p| p.time <= obs.time);
        self.points.insert(idx, obs);
        idx
    }

    /// Remove the first observation matching `target` (see [`Observation::matches`]).
    pub fn remove_matching(&mut self, target: &Observation) -> Option<Observation> {
        let idx = self.points.iter().position(|p| p.matches(target))?;
        Some(self.points.remove(idx))
    }

    pub fn remove_at(&mut self, idx: usize) -> Option<Observation> {
        (idx < self.points.len()).then(|| self.points.remove(idx))
    }

    /// Swap in a freshly loaded series, returning the previous one.
    pub fn replace(&mut self, other: ObservationSeries) -> ObservationSeries {
        std::mem::replace(self, other)
    }

    pub fn get(&self, idx: usize) -> Option<&Observation> {
        self.points.get(idx)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.points.iter()
    }

    pub fn times(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.time).collect()
    }

    pub fn concentrations(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.concentration).collect()
    }

    pub fn log2_concentrations(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.log2_concentration()).collect()
    }

    /// `(first, last)` time, or `None` when empty.
    pub fn time_range(&self) -> Option<(f64, f64)> {
        Some((self.points.first()?.time, self.points.last()?.time))
    }
}

impl<'a> IntoIterator for &'a ObservationSeries {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Result of a multi-point fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FitResult {
    /// Slope of `log2(concentration)` against time (generations per unit time).
    pub rate: f64,
    /// Coefficient of determination, in `[0, 1]`.
    pub r_squared: f64,
}

/// Full regression line `log2(c) = rate * t + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LogLinearFit {
    pub rate: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl LogLinearFit {
    pub fn result(&self) -> FitResult {
        FitResult {
            rate: self.rate,
            r_squared: self.r_squared,
        }
    }

    /// Fitted `log2(concentration)` at time `t`.
    pub fn predict_log2(&self, t: f64) -> f64 {
        self.rate * t + self.intercept
    }

    /// Time for one doubling; only defined for a growing population.
    pub fn doubling_time(&self) -> Option<f64> {
        (self.rate > 0.0).then(|| 1.0 / self.rate)
    }
}

/// Time unit used for labels only; it never rescales values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    #[default]
    Hours,
    Minutes,
    Days,
    Seconds,
}

impl TimeUnit {
    pub const ALL: [TimeUnit; 4] = [TimeUnit::Hours, TimeUnit::Minutes, TimeUnit::Days, TimeUnit::Seconds];

    pub fn as_str(self) -> &'static str {
        match self {
            TimeUnit::Hours => "hours",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Days => "days",
            TimeUnit::Seconds => "seconds",
        }
    }

    pub fn singular(self) -> &'static str {
        match self {
            TimeUnit::Hours => "hour",
            TimeUnit::Minutes => "minute",
            TimeUnit::Days => "day",
            TimeUnit::Seconds => "second",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&u| u == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `growth fit` run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct FitConfig {
    pub data_path: PathBuf,
    pub time_unit: TimeUnit,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub export: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(t: f64, c: f64) -> Observation {
        Observation::new(t, c).unwrap()
    }

    #[test]
    fn observation_rejects_invalid_values() {
        assert!(Observation::new(-1.0, 1.0).is_err());
        assert!(Observation::new(1.0, 0.0).is_err());
        assert!(Observation::new(f64::NAN, 1.0).is_err());
        assert!(Observation::new(0.0, 0.5).is_ok());
    }

    #[test]
    fn add_keeps_series_sorted() {
        let mut s = ObservationSeries::new();
        assert_eq!(s.add(obs(2.0, 4.0)), 0);
        assert_eq!(s.add(obs(0.0, 1.0)), 0);
        assert_eq!(s.add(obs(1.0, 2.0)), 1);
        assert_eq!(s.times(), vec![0.0, 1.0, 2.0]);
        assert_eq!(s.time_range(), Some((0.0, 2.0)));
    }

    #[test]
    fn equal_times_keep_insertion_order() {
        let mut s = ObservationSeries::new();
        s.add(obs(1.0, 10.0));
        s.add(obs(1.0, 20.0));
        s.add(obs(0.5, 5.0));
        assert_eq!(s.concentrations(), vec![5.0, 10.0, 20.0]);
    }

    #[test]
    fn from_observations_sorts() {
        let s = ObservationSeries::from_observations(vec![obs(3.0, 1.0), obs(1.0, 2.0), obs(2.0, 3.0)]);
        assert_eq!(s.times(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn remove_matching_uses_tolerance() {
        let mut s = ObservationSeries::from_observations(vec![obs(0.0, 1.0), obs(1.5, 0.25), obs(3.0, 4.0)]);
        let removed = s.remove_matching(&obs(1.5 + 5e-10, 0.25 - 5e-10)).unwrap();
        assert_eq!(removed, obs(1.5, 0.25));
        assert_eq!(s.len(), 2);

        assert!(s.remove_matching(&obs(1.5 + 1e-6, 0.25)).is_none());
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn remove_matching_takes_only_the_first_duplicate() {
        let mut s = ObservationSeries::from_observations(vec![obs(1.0, 2.0), obs(1.0, 2.0)]);
        s.remove_matching(&obs(1.0, 2.0));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn remove_at_out_of_range_is_none() {
        let mut s = ObservationSeries::from_observations(vec![obs(1.0, 2.0)]);
        assert!(s.remove_at(1).is_none());
        assert_eq!(s.remove_at(0), Some(obs(1.0, 2.0)));
        assert!(s.is_empty());
        assert_eq!(s.time_range(), None);
    }

    #[test]
    fn replace_returns_previous_series() {
        let mut s = ObservationSeries::from_observations(vec![obs(1.0, 2.0)]);
        let loaded = ObservationSeries::from_observations(vec![obs(0.0, 1.0), obs(1.0, 2.0)]);
        let old = s.replace(loaded);
        assert_eq!(old.len(), 1);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn doubling_time_only_for_growth() {
        let grow = LogLinearFit { rate: 0.5, intercept: 0.0, r_squared: 1.0 };
        assert_eq!(grow.doubling_time(), Some(2.0));
        let flat = LogLinearFit { rate: 0.0, intercept: 3.0, r_squared: 1.0 };
        assert_eq!(flat.doubling_time(), None);
        assert_eq!(flat.predict_log2(10.0), 3.0);
    }

    #[test]
    fn time_unit_cycles_through_all() {
        let mut u = TimeUnit::default();
        for _ in 0..TimeUnit::ALL.len() {
            u = u.next();
        }
        assert_eq!(u, TimeUnit::Hours);
        assert_eq!(TimeUnit::Minutes.to_string(), "minutes");
        assert_eq!(TimeUnit::Days.singular(), "day");
    }
}
