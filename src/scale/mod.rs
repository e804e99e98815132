//! Time-scale model: the mapping from the zoom slider value to a duration.
//!
//! The slider moves over an ordered table of presets (minute, hour, day, ...).
//! Values between two presets are interpolated, logarithmically by default,
//! since the presets span five orders of magnitude.

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

mod transition;

pub use transition::{ScaleTransition, smooth_step};

const MINUTE_MS: f64 = 60.0 * 1000.0;
const HOUR_MS: f64 = 60.0 * MINUTE_MS;
const DAY_MS: f64 = 24.0 * HOUR_MS;

/// Named calendar intervals used for presets, grid lines and orbit bands.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimeInterval {
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl TimeInterval {
    pub const ALL: [TimeInterval; 7] = [
        TimeInterval::Minute,
        TimeInterval::Hour,
        TimeInterval::Day,
        TimeInterval::Week,
        TimeInterval::Month,
        TimeInterval::Quarter,
        TimeInterval::Year,
    ];

    /// Length of the interval in milliseconds. Months are 30 days, quarters 90, years 365.
    pub fn ms(self) -> f64 {
        match self {
            TimeInterval::Minute => MINUTE_MS,
            TimeInterval::Hour => HOUR_MS,
            TimeInterval::Day => DAY_MS,
            TimeInterval::Week => 7.0 * DAY_MS,
            TimeInterval::Month => 30.0 * DAY_MS,
            TimeInterval::Quarter => 90.0 * DAY_MS,
            TimeInterval::Year => 365.0 * DAY_MS,
        }
    }

    /// Compact label drawn next to grid lines.
    pub fn short_label(self) -> &'static str {
        match self {
            TimeInterval::Minute => "1m",
            TimeInterval::Hour => "1h",
            TimeInterval::Day => "1d",
            TimeInterval::Week => "1w",
            TimeInterval::Month => "1mo",
            TimeInterval::Quarter => "1q",
            TimeInterval::Year => "1y",
        }
    }

    fn preset_label(self) -> &'static str {
        match self {
            TimeInterval::Minute => "1 minute",
            TimeInterval::Hour => "1 hour",
            TimeInterval::Day => "1 day",
            TimeInterval::Week => "1 week",
            TimeInterval::Month => "1 month",
            TimeInterval::Quarter => "1 quarter",
            TimeInterval::Year => "1 year",
        }
    }
}

/// One stop on the time-scale slider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeScalePreset {
    /// Ordinal slider position.
    pub value: f64,
    pub unit_duration_ms: f64,
    pub label: String,
    /// Interval this preset stands for, when it is one of the named ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<TimeInterval>,
}

/// Strategy used between two bracketing presets.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScaleInterpolation {
    #[default]
    Logarithmic,
    Linear,
}

/// The presets bracketing a slider value.
#[derive(Debug, Clone, Copy)]
pub struct IntervalBoundaries<'a> {
    pub lower: &'a TimeScalePreset,
    pub upper: &'a TimeScalePreset,
    /// Position between `lower` (0.0) and `upper` (1.0).
    pub fraction: f64,
}

/// A validated, ascending preset table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TimeScalePreset>", into = "Vec<TimeScalePreset>")]
pub struct TimeScale {
    presets: Vec<TimeScalePreset>,
}

impl Default for TimeScale {
    fn default() -> Self {
        let presets = TimeInterval::ALL
            .iter()
            .enumerate()
            .map(|(i, &interval)| TimeScalePreset {
                value: i as f64,
                unit_duration_ms: interval.ms(),
                label: interval.preset_label().to_string(),
                interval: Some(interval),
            })
            .collect();
        Self { presets }
    }
}

impl TryFrom<Vec<TimeScalePreset>> for TimeScale {
    type Error = LayoutError;

    fn try_from(presets: Vec<TimeScalePreset>) -> Result<Self, Self::Error> {
        TimeScale::new(presets)
    }
}

impl From<TimeScale> for Vec<TimeScalePreset> {
    fn from(scale: TimeScale) -> Self {
        scale.presets
    }
}

impl TimeScale {
    /// Build a table from custom presets.
    ///
    /// Both `value` and `unit_duration_ms` must be strictly increasing and
    /// every duration must be positive and finite.
    pub fn new(presets: Vec<TimeScalePreset>) -> Result<Self, LayoutError> {
        if presets.is_empty() {
            return Err(LayoutError::EmptyPresets);
        }
        for (index, preset) in presets.iter().enumerate() {
            if !(preset.unit_duration_ms.is_finite() && preset.unit_duration_ms > 0.0) {
                return Err(LayoutError::NonPositiveDuration { index });
            }
            if !preset.value.is_finite() {
                return Err(LayoutError::NonIncreasingPresets { index });
            }
            if index > 0 {
                let prev = &presets[index - 1];
                if preset.value <= prev.value || preset.unit_duration_ms <= prev.unit_duration_ms {
                    return Err(LayoutError::NonIncreasingPresets { index });
                }
            }
        }
        Ok(Self { presets })
    }

    pub fn presets(&self) -> &[TimeScalePreset] {
        &self.presets
    }

    pub fn min_value(&self) -> f64 {
        self.presets[0].value
    }

    pub fn max_value(&self) -> f64 {
        self.presets[self.presets.len() - 1].value
    }

    /// Clamp a slider value into the table's range. NaN maps to the minimum.
    pub fn clamp(&self, scale: f64) -> f64 {
        if !(scale > self.min_value()) {
            self.min_value()
        } else if scale > self.max_value() {
            self.max_value()
        } else {
            scale
        }
    }

    /// Find the presets around `scale`. An exact hit returns the same preset twice.
    pub fn interval_boundaries(&self, scale: f64) -> IntervalBoundaries<'_> {
        let scale = self.clamp(scale);
        // Number of presets at or below the value; at least 1 after clamping.
        let at_or_below = self.presets.partition_point(|p| p.value <= scale);
        let lower = &self.presets[at_or_below - 1];
        if lower.value == scale || at_or_below == self.presets.len() {
            return IntervalBoundaries { lower, upper: lower, fraction: 0.0 };
        }
        let upper = &self.presets[at_or_below];
        let fraction = (scale - lower.value) / (upper.value - lower.value);
        IntervalBoundaries { lower, upper, fraction }
    }

    /// Duration in milliseconds represented by a slider value.
    pub fn duration_for_scale(&self, scale: f64, interpolation: ScaleInterpolation) -> f64 {
        let b = self.interval_boundaries(scale);
        if std::ptr::eq(b.lower, b.upper) {
            return b.lower.unit_duration_ms;
        }
        let (lo, hi, t) = (b.lower.unit_duration_ms, b.upper.unit_duration_ms, b.fraction);
        match interpolation {
            ScaleInterpolation::Logarithmic => ((1.0 - t) * lo.ln() + t * hi.ln()).exp(),
            ScaleInterpolation::Linear => lo + (hi - lo) * t,
        }
    }

    /// Label of the nearest preset; halfway rounds up.
    pub fn label_for_scale(&self, scale: f64) -> &str {
        let b = self.interval_boundaries(scale);
        if b.fraction < 0.5 { &b.lower.label } else { &b.upper.label }
    }

    /// The preset at or directly below `scale`.
    pub fn floor_index(&self, scale: f64) -> usize {
        let scale = self.clamp(scale);
        self.presets.partition_point(|p| p.value <= scale) - 1
    }
}

/// Logarithmic duration lookup over the default minute..year table.
pub fn duration_for_scale(scale: f64) -> f64 {
    TimeScale::default().duration_for_scale(scale, ScaleInterpolation::Logarithmic)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn test_exact_presets_return_exact_durations() {
        let scale = TimeScale::default();
        for (i, interval) in TimeInterval::ALL.iter().enumerate() {
            assert_eq!(scale.duration_for_scale(i as f64, ScaleInterpolation::Logarithmic), interval.ms());
            assert_eq!(scale.duration_for_scale(i as f64, ScaleInterpolation::Linear), interval.ms());
        }
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(duration_for_scale(-3.0), TimeInterval::Minute.ms());
        assert_eq!(duration_for_scale(42.0), TimeInterval::Year.ms());
        assert_eq!(duration_for_scale(f64::NAN), TimeInterval::Minute.ms());
    }

    #[test]
    fn test_logarithmic_midpoint_is_geometric_mean() {
        let mid = duration_for_scale(1.5);
        let expected = (TimeInterval::Hour.ms() * TimeInterval::Day.ms()).sqrt();
        assert!(close(mid, expected), "{mid} vs {expected}");
    }

    #[test]
    fn test_linear_midpoint_is_arithmetic_mean() {
        let mid = TimeScale::default().duration_for_scale(1.5, ScaleInterpolation::Linear);
        let expected = (TimeInterval::Hour.ms() + TimeInterval::Day.ms()) / 2.0;
        assert!(close(mid, expected));
    }

    #[test]
    fn test_interpolated_duration_is_increasing() {
        let scale = TimeScale::default();
        let mut prev = 0.0;
        for step in 0..=60 {
            let d = scale.duration_for_scale(step as f64 / 10.0, ScaleInterpolation::Logarithmic);
            assert!(d > prev);
            prev = d;
        }
    }

    #[test]
    fn test_labels_round_to_nearest_preset() {
        let scale = TimeScale::default();
        assert_eq!(scale.label_for_scale(2.0), "1 day");
        assert_eq!(scale.label_for_scale(2.3), "1 day");
        assert_eq!(scale.label_for_scale(2.5), "1 week");
        assert_eq!(scale.label_for_scale(9.0), "1 year");
    }

    #[test]
    fn test_interval_boundaries() {
        let scale = TimeScale::default();
        let b = scale.interval_boundaries(3.25);
        assert_eq!(b.lower.interval, Some(TimeInterval::Week));
        assert_eq!(b.upper.interval, Some(TimeInterval::Month));
        assert!(close(b.fraction, 0.25));

        let top = scale.interval_boundaries(6.0);
        assert_eq!(top.lower.interval, Some(TimeInterval::Year));
        assert_eq!(top.fraction, 0.0);
    }

    #[test]
    fn test_custom_table_validation() {
        let preset = |value: f64, ms: f64| TimeScalePreset {
            value,
            unit_duration_ms: ms,
            label: format!("{value}"),
            interval: None,
        };

        assert!(matches!(TimeScale::new(vec![]), Err(LayoutError::EmptyPresets)));
        assert!(matches!(
            TimeScale::new(vec![preset(0.0, 10.0), preset(1.0, 5.0)]),
            Err(LayoutError::NonIncreasingPresets { index: 1 })
        ));
        assert!(matches!(
            TimeScale::new(vec![preset(0.0, 0.0)]),
            Err(LayoutError::NonPositiveDuration { index: 0 })
        ));

        let custom = TimeScale::new(vec![preset(0.0, 1000.0), preset(10.0, 100_000.0)]).unwrap();
        assert!(close(custom.duration_for_scale(5.0, ScaleInterpolation::Logarithmic), 10_000.0));
    }

    #[test]
    fn test_table_deserializes_with_validation() {
        let ok: TimeScale = serde_json::from_str(
            r#"[{"value":0,"unitDurationMs":1000,"label":"a"},{"value":1,"unitDurationMs":2000,"label":"b"}]"#,
        )
        .unwrap();
        assert_eq!(ok.presets().len(), 2);

        let bad = serde_json::from_str::<TimeScale>(
            r#"[{"value":1,"unitDurationMs":1000,"label":"a"},{"value":0,"unitDurationMs":2000,"label":"b"}]"#,
        );
        assert!(bad.is_err());
    }
}
