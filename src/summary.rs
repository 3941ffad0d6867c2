//! Session statistics and interpretive insights
//!
//! Turns a completed trial sequence into a [`SessionSummary`]: average,
//! fastest and slowest response, a population percentile bucket, and a list
//! of [`Insight`]s (time of day, response consistency, practice/fatigue).
//!
//! Everything here is a pure function of the trial data and the wall-clock
//! hour passed in by the caller.

use std::fmt;
use thiserror::Error;

/// Errors for session analysis
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("Cannot analyze a session with no trials")]
    EmptySession,

    #[error("Trial {index} has invalid duration {value} ms")]
    InvalidTrial { index: usize, value: f64 },

    #[error("Hour {0} is outside 0..24")]
    InvalidHour(u32),
}

pub type Result<T> = std::result::Result<T, StatsError>;

/// Half-average difference (ms) that counts as a practice or fatigue effect
pub const TREND_THRESHOLD_MS: f64 = 15.0;

/// Range (ms) below which responses count as very consistent
pub const CONSISTENT_RANGE_MS: f64 = 30.0;

/// Range (ms) below which response spread counts as normal
pub const NORMAL_RANGE_MS: f64 = 60.0;

/// One row of the population norm table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PercentileBucket {
    /// Exclusive upper bound on the average reaction time (ms)
    pub below_ms: f64,
    /// Percentile rank (faster than this share of adults)
    pub rank: u8,
    /// Short label
    pub label: &'static str,
    /// Sentence shown to the user
    pub description: &'static str,
}

/// Typical adult simple reaction time distribution, fastest first
pub static PERCENTILE_TABLE: [PercentileBucket; 6] = [
    PercentileBucket {
        below_ms: 180.0,
        rank: 99,
        label: "Exceptional",
        description: "Exceptional - faster than 99% of people",
    },
    PercentileBucket {
        below_ms: 200.0,
        rank: 95,
        label: "Excellent",
        description: "Excellent - faster than 95% of people",
    },
    PercentileBucket {
        below_ms: 230.0,
        rank: 85,
        label: "Above average",
        description: "Above average",
    },
    PercentileBucket {
        below_ms: 270.0,
        rank: 50,
        label: "Average",
        description: "Average",
    },
    PercentileBucket {
        below_ms: 320.0,
        rank: 25,
        label: "Below average",
        description: "Below average",
    },
    PercentileBucket {
        below_ms: f64::INFINITY,
        rank: 10,
        label: "Slow",
        description: "Slow - you might be tired!",
    },
];

/// Look up the percentile bucket for an average reaction time
///
/// First row whose bound is strictly greater than `average_ms` wins.
pub fn percentile_bucket(average_ms: f64) -> &'static PercentileBucket {
    PERCENTILE_TABLE
        .iter()
        .find(|bucket| average_ms < bucket.below_ms)
        .unwrap_or(&PERCENTILE_TABLE[PERCENTILE_TABLE.len() - 1])
}

/// Spread of responses within a session (max - min)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variability {
    /// Range under 30 ms
    VeryConsistent,
    /// Range under 60 ms
    Normal,
    /// Range of 60 ms or more
    High,
}

impl Variability {
    pub fn classify(range_ms: f64) -> Self {
        if range_ms < CONSISTENT_RANGE_MS {
            Variability::VeryConsistent
        } else if range_ms < NORMAL_RANGE_MS {
            Variability::Normal
        } else {
            Variability::High
        }
    }
}

/// Change in speed between the first and second half of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendEffect {
    /// Second half at least 15 ms faster
    Practice,
    /// Second half at least 15 ms slower
    Fatigue,
}

impl TrendEffect {
    /// Compare half-averages; `None` when the difference is under the threshold
    pub fn detect(trials_ms: &[f64]) -> Option<Self> {
        let (first, second) = half_averages(trials_ms)?;
        if second <= first - TREND_THRESHOLD_MS {
            Some(TrendEffect::Practice)
        } else if second >= first + TREND_THRESHOLD_MS {
            Some(TrendEffect::Fatigue)
        } else {
            None
        }
    }
}

/// Split point is `len / 2`; an odd trial out goes to the second half.
///
/// Returns `None` when either half would be empty.
pub fn half_averages(trials_ms: &[f64]) -> Option<(f64, f64)> {
    let split = trials_ms.len() / 2;
    if split == 0 {
        return None;
    }
    let (first, second) = trials_ms.split_at(split);
    Some((mean(first), mean(second)))
}

/// Circadian window the session was analyzed in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    /// 06:00 - 09:59
    Morning,
    /// 14:00 - 15:59
    AfternoonDip,
    /// 22:00 - 05:59
    LateNight,
}

impl TimeOfDay {
    /// Windows outside the three notable ones produce no note
    pub fn from_hour(hour: u32) -> Option<Self> {
        match hour {
            6..=9 => Some(TimeOfDay::Morning),
            14..=15 => Some(TimeOfDay::AfternoonDip),
            22..=23 | 0..=5 => Some(TimeOfDay::LateNight),
            _ => None,
        }
    }
}

/// Interpretive note about a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insight {
    TimeOfDay(TimeOfDay),
    Variability(Variability),
    Trend(TrendEffect),
}

impl Insight {
    /// Leading symbol shown before the message
    pub fn marker(&self) -> &'static str {
        match self {
            Insight::TimeOfDay(TimeOfDay::Morning) => "☀️",
            Insight::TimeOfDay(TimeOfDay::AfternoonDip) => "😴",
            Insight::TimeOfDay(TimeOfDay::LateNight) => "🌙",
            Insight::Variability(Variability::VeryConsistent) => "🎯",
            Insight::Variability(Variability::Normal) => "📊",
            Insight::Variability(Variability::High) => "📈",
            Insight::Trend(TrendEffect::Practice) => "⬆️",
            Insight::Trend(TrendEffect::Fatigue) => "⬇️",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Insight::TimeOfDay(TimeOfDay::Morning) => {
                "Morning testing: cortisol levels are typically high, which can help reaction time"
            }
            Insight::TimeOfDay(TimeOfDay::AfternoonDip) => {
                "Afternoon dip: this is when circadian alertness typically drops"
            }
            Insight::TimeOfDay(TimeOfDay::LateNight) => {
                "Late night: reduced alertness may be affecting your performance"
            }
            Insight::Variability(Variability::VeryConsistent) => {
                "Very consistent responses - strong attentional control"
            }
            Insight::Variability(Variability::Normal) => "Normal variability in responses",
            Insight::Variability(Variability::High) => {
                "High variability - might indicate fluctuating attention or fatigue"
            }
            Insight::Trend(TrendEffect::Practice) => {
                "Practice effect detected: you got faster as you warmed up"
            }
            Insight::Trend(TrendEffect::Fatigue) => {
                "Fatigue effect detected: responses slowed over trials"
            }
        }
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.marker(), self.message())
    }
}

/// Derived statistics for one completed session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    trials_ms: Vec<f64>,
    average_ms: f64,
    fastest_ms: f64,
    slowest_ms: f64,
    percentile: &'static PercentileBucket,
    variability: Variability,
    insights: Vec<Insight>,
}

impl SessionSummary {
    /// Analyze a completed trial sequence at the given local hour (0-23)
    ///
    /// Insights are ordered time of day, variability, trend.
    pub fn analyze(trials_ms: &[f64], hour: u32) -> Result<Self> {
        if trials_ms.is_empty() {
            return Err(StatsError::EmptySession);
        }
        if hour >= 24 {
            return Err(StatsError::InvalidHour(hour));
        }
        if let Some((index, &value)) = trials_ms
            .iter()
            .enumerate()
            .find(|(_, ms)| !ms.is_finite() || **ms < 0.0)
        {
            return Err(StatsError::InvalidTrial { index, value });
        }

        let average_ms = mean(trials_ms);
        let fastest_ms = trials_ms.iter().copied().fold(f64::INFINITY, f64::min);
        let slowest_ms = trials_ms.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        // Summation rounding can push the mean a hair outside [min, max]
        let average_ms = average_ms.clamp(fastest_ms, slowest_ms);

        let variability = Variability::classify(slowest_ms - fastest_ms);

        let mut insights = Vec::with_capacity(3);
        if let Some(window) = TimeOfDay::from_hour(hour) {
            insights.push(Insight::TimeOfDay(window));
        }
        insights.push(Insight::Variability(variability));
        if let Some(trend) = TrendEffect::detect(trials_ms) {
            insights.push(Insight::Trend(trend));
        }

        Ok(Self {
            trials_ms: trials_ms.to_vec(),
            average_ms,
            fastest_ms,
            slowest_ms,
            percentile: percentile_bucket(average_ms),
            variability,
            insights,
        })
    }

    pub fn trials_ms(&self) -> &[f64] {
        &self.trials_ms
    }

    pub fn average_ms(&self) -> f64 {
        self.average_ms
    }

    pub fn fastest_ms(&self) -> f64 {
        self.fastest_ms
    }

    pub fn slowest_ms(&self) -> f64 {
        self.slowest_ms
    }

    /// Slowest minus fastest trial
    pub fn range_ms(&self) -> f64 {
        self.slowest_ms - self.fastest_ms
    }

    pub fn percentile(&self) -> &'static PercentileBucket {
        self.percentile
    }

    pub fn variability(&self) -> Variability {
        self.variability
    }

    pub fn insights(&self) -> &[Insight] {
        &self.insights
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile_boundaries() {
        assert_eq!(percentile_bucket(179.9).rank, 99);
        assert_eq!(percentile_bucket(180.0).rank, 95);
        assert_eq!(percentile_bucket(199.9).rank, 95);
        assert_eq!(percentile_bucket(200.0).rank, 85);
        assert_eq!(percentile_bucket(229.9).rank, 85);
        assert_eq!(percentile_bucket(230.0).rank, 50);
        assert_eq!(percentile_bucket(269.9).rank, 50);
        assert_eq!(percentile_bucket(270.0).rank, 25);
        assert_eq!(percentile_bucket(319.9).rank, 25);
        assert_eq!(percentile_bucket(320.0).rank, 10);
        assert_eq!(percentile_bucket(5000.0).label, "Slow");
    }

    #[test]
    fn test_percentile_table_is_ordered() {
        for pair in PERCENTILE_TABLE.windows(2) {
            assert!(pair[0].below_ms < pair[1].below_ms);
            assert!(pair[0].rank > pair[1].rank);
        }
    }

    #[test]
    fn test_percentile_nan_falls_to_last_bucket() {
        assert_eq!(percentile_bucket(f64::NAN).rank, 10);
    }

    #[test]
    fn test_variability_boundaries() {
        assert_eq!(Variability::classify(29.9), Variability::VeryConsistent);
        assert_eq!(Variability::classify(30.0), Variability::Normal);
        assert_eq!(Variability::classify(59.9), Variability::Normal);
        assert_eq!(Variability::classify(60.0), Variability::High);
    }

    #[test]
    fn test_half_split_puts_odd_trial_in_second_half() {
        let (first, second) = half_averages(&[150.0, 160.0, 155.0, 158.0, 152.0]).unwrap();
        assert_eq!(first, 155.0);
        assert_eq!(second, 155.0);
    }

    #[test]
    fn test_half_split_single_trial() {
        assert!(half_averages(&[200.0]).is_none());
        assert!(TrendEffect::detect(&[200.0]).is_none());
    }

    #[test]
    fn test_trend_thresholds() {
        // Exactly 15 ms faster counts as practice
        assert_eq!(
            TrendEffect::detect(&[300.0, 300.0, 285.0, 285.0]),
            Some(TrendEffect::Practice)
        );
        // Exactly 15 ms slower counts as fatigue
        assert_eq!(
            TrendEffect::detect(&[250.0, 250.0, 265.0, 265.0]),
            Some(TrendEffect::Fatigue)
        );
        assert_eq!(TrendEffect::detect(&[250.0, 250.0, 264.0, 264.0]), None);
        assert_eq!(TrendEffect::detect(&[250.0, 250.0, 236.0, 236.0]), None);
    }

    #[test]
    fn test_time_of_day_windows() {
        assert_eq!(TimeOfDay::from_hour(5), Some(TimeOfDay::LateNight));
        assert_eq!(TimeOfDay::from_hour(6), Some(TimeOfDay::Morning));
        assert_eq!(TimeOfDay::from_hour(9), Some(TimeOfDay::Morning));
        assert_eq!(TimeOfDay::from_hour(10), None);
        assert_eq!(TimeOfDay::from_hour(13), None);
        assert_eq!(TimeOfDay::from_hour(14), Some(TimeOfDay::AfternoonDip));
        assert_eq!(TimeOfDay::from_hour(15), Some(TimeOfDay::AfternoonDip));
        assert_eq!(TimeOfDay::from_hour(16), None);
        assert_eq!(TimeOfDay::from_hour(21), None);
        assert_eq!(TimeOfDay::from_hour(22), Some(TimeOfDay::LateNight));
        assert_eq!(TimeOfDay::from_hour(0), Some(TimeOfDay::LateNight));
    }

    #[test]
    fn test_analyze_consistent_fast_session() {
        let summary = SessionSummary::analyze(&[150.0, 160.0, 155.0, 158.0, 152.0], 12).unwrap();
        assert_eq!(summary.average_ms(), 155.0);
        assert_eq!(summary.fastest_ms(), 150.0);
        assert_eq!(summary.slowest_ms(), 160.0);
        assert_eq!(summary.percentile().rank, 99);
        assert_eq!(summary.percentile().label, "Exceptional");
        assert_eq!(summary.range_ms(), 10.0);
        assert_eq!(summary.variability(), Variability::VeryConsistent);
        assert_eq!(
            summary.insights(),
            &[Insight::Variability(Variability::VeryConsistent)]
        );
    }

    #[test]
    fn test_analyze_slow_variable_session() {
        let summary = SessionSummary::analyze(&[300.0, 310.0, 295.0, 305.0, 500.0], 12).unwrap();
        assert_eq!(summary.average_ms(), 342.0);
        assert_eq!(summary.percentile().rank, 10);
        assert_eq!(summary.percentile().label, "Slow");
        assert_eq!(summary.range_ms(), 205.0);
        assert_eq!(summary.variability(), Variability::High);
        // First half 305.0, second half 366.7
        assert_eq!(
            summary.insights(),
            &[
                Insight::Variability(Variability::High),
                Insight::Trend(TrendEffect::Fatigue),
            ]
        );
    }

    #[test]
    fn test_analyze_orders_time_of_day_first() {
        let summary = SessionSummary::analyze(&[320.0, 310.0, 260.0, 250.0], 7).unwrap();
        assert_eq!(
            summary.insights(),
            &[
                Insight::TimeOfDay(TimeOfDay::Morning),
                Insight::Variability(Variability::High),
                Insight::Trend(TrendEffect::Practice),
            ]
        );
    }

    #[test]
    fn test_analyze_single_trial() {
        let summary = SessionSummary::analyze(&[210.0], 12).unwrap();
        assert_eq!(summary.average_ms(), 210.0);
        assert_eq!(summary.fastest_ms(), 210.0);
        assert_eq!(summary.slowest_ms(), 210.0);
        assert_eq!(summary.percentile().rank, 85);
        assert_eq!(summary.insights().len(), 1);
    }

    #[test]
    fn test_analyze_rejects_empty_session() {
        assert_eq!(
            SessionSummary::analyze(&[], 12).unwrap_err(),
            StatsError::EmptySession
        );
    }

    #[test]
    fn test_analyze_rejects_invalid_input() {
        assert!(matches!(
            SessionSummary::analyze(&[200.0, f64::NAN], 12),
            Err(StatsError::InvalidTrial { index: 1, .. })
        ));
        assert!(matches!(
            SessionSummary::analyze(&[-1.0], 12),
            Err(StatsError::InvalidTrial { index: 0, .. })
        ));
        assert_eq!(
            SessionSummary::analyze(&[200.0], 24).unwrap_err(),
            StatsError::InvalidHour(24)
        );
    }

    #[test]
    fn test_insight_display_leads_with_marker() {
        let insight = Insight::Trend(TrendEffect::Practice);
        assert_eq!(
            insight.to_string(),
            "⬆️ Practice effect detected: you got faster as you warmed up"
        );
        assert_eq!(
            Insight::TimeOfDay(TimeOfDay::LateNight).to_string(),
            "🌙 Late night: reduced alertness may be affecting your performance"
        );
    }
}
