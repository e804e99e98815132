// Time-to-space layout engine for the task timeline.
//
// Goals:
// - Deterministic: no randomness, "now" is injected, per-task variation comes
//   from a stable id hash
// - Pure: every pass builds a fresh PositionMap, inputs are never mutated
// - Readable: near-term tasks spread out, far tasks compressed towards a
//   bounded outer radius, overdue tasks pulled towards the center
// - No overlap: a single declustering pass enforces a minimum separation
//
// Submodules:
// - distance: time offset -> radial distance (log/distortion or orbit bands)
// - angle: due date + id hash -> angle, future and past on opposite halves
// - position: radius + angle (+ spiral skew) + priority elevation -> x/y/z
// - decluster: O(n²) sequential pairwise relaxation
// - grid_lines: reference rings drawn behind the tasks
//
// Intended scale: tens to low hundreds of visible tasks per pass.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::LayoutError;
use crate::model::{Priority, TaskSnapshot};
use crate::scale::{ScaleInterpolation, TimeScale};

mod angle;
mod decluster;
mod distance;
mod grid_lines;
mod position;

pub use angle::{IdHash, compute_angle, spiral_factor};
pub use decluster::{DeclusterConfig, DeclusterMode, decluster_positions, weighted_distance};
pub use distance::{DistanceMapping, distortion_factor, map_time_to_distance};
pub use grid_lines::{GridLine, RingBounds, generate_grid_lines, ring_bounds};
pub use position::{SpatialPosition, compute_position};

/// Task id -> position. Iteration order is the order tasks were supplied in,
/// which is also the order the declustering pass visits pairs in.
pub type PositionMap = IndexMap<String, SpatialPosition>;

/// Above this many tasks the quadratic declustering pass starts to cost frames.
pub const MAX_RECOMMENDED_TASKS: usize = 500;

/// Vertical offsets per priority. Higher priority floats higher.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriorityElevation {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
    pub critical: f64,
}

impl Default for PriorityElevation {
    fn default() -> Self {
        Self { low: 0.0, medium: 0.7, high: 1.5, critical: 2.5 }
    }
}

impl PriorityElevation {
    pub fn get(&self, priority: Priority) -> f64 {
        match priority {
            Priority::Low => self.low,
            Priority::Medium => self.medium,
            Priority::High => self.high,
            Priority::Critical => self.critical,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Slider presets. Deserializing a custom table validates it.
    pub presets: TimeScale,
    pub interpolation: ScaleInterpolation,
    pub distance_mapping: DistanceMapping,
    /// Radius of the "now" singularity.
    pub base_distance: f64,
    /// Radius budget of the logarithmic mapping for a year at minute scale.
    pub max_distance: f64,
    /// Distortion falloff, as a fraction of the effective interval.
    pub distortion_k: f64,
    /// Multiplier applied to past (overdue) distances.
    pub past_dampening: f64,
    pub id_hash: IdHash,
    /// Skew the angle by radius for a spiral look.
    pub spiral: bool,
    pub priority_elevation: PriorityElevation,
    /// Y for completed tasks, regardless of priority.
    pub completed_elevation: f64,
    /// Offset used to read day-of-week and hour-of-day from due dates.
    pub utc_offset_minutes: i32,
    pub decluster: DeclusterConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            presets: TimeScale::default(),
            interpolation: ScaleInterpolation::Logarithmic,
            distance_mapping: DistanceMapping::Logarithmic,
            base_distance: 5.0,
            max_distance: 100.0,
            distortion_k: 0.1,
            past_dampening: 0.7,
            id_hash: IdHash::Fnv1a,
            spiral: true,
            priority_elevation: PriorityElevation::default(),
            completed_elevation: -1.0,
            utc_offset_minutes: 0,
            decluster: DeclusterConfig::default(),
        }
    }
}

impl LayoutConfig {
    pub fn validate(&self) -> Result<(), LayoutError> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(LayoutError::InvalidConfig(format!("{name} must be positive and finite, got {v}")))
            }
        };
        positive("baseDistance", self.base_distance)?;
        positive("maxDistance", self.max_distance)?;
        positive("distortionK", self.distortion_k)?;
        positive("decluster.minDistance", self.decluster.min_distance)?;
        if self.base_distance >= self.max_distance {
            return Err(LayoutError::InvalidConfig(format!(
                "baseDistance ({}) must be below maxDistance ({})",
                self.base_distance, self.max_distance
            )));
        }
        if !(self.past_dampening > 0.0 && self.past_dampening <= 1.0) {
            return Err(LayoutError::InvalidConfig(format!(
                "pastDampening must be in (0, 1], got {}",
                self.past_dampening
            )));
        }
        if !(self.decluster.y_weight > 0.0 && self.decluster.y_weight <= 1.0) {
            return Err(LayoutError::InvalidConfig(format!(
                "decluster.yWeight must be in (0, 1], got {}",
                self.decluster.y_weight
            )));
        }
        if self.utc_offset_minutes.abs() > 14 * 60 {
            return Err(LayoutError::InvalidConfig(format!(
                "utcOffsetMinutes out of range: {}",
                self.utc_offset_minutes
            )));
        }
        Ok(())
    }
}

/// Run one full layout pass: compose every task, then decluster once.
///
/// The returned map is complete before it is handed back, so a renderer that
/// swaps it in never observes a half-updated layout.
pub fn layout_tasks(
    tasks: &[TaskSnapshot],
    scale: f64,
    now: DateTime<Utc>,
    cfg: &LayoutConfig,
) -> PositionMap {
    if tasks.len() > MAX_RECOMMENDED_TASKS {
        warn!(
            "laying out {} tasks; the declustering pass is quadratic and tuned for at most {}",
            tasks.len(),
            MAX_RECOMMENDED_TASKS
        );
    }

    let scale = cfg.presets.clamp(scale);
    let positions: PositionMap = tasks
        .iter()
        .map(|task| (task.id.clone(), compute_position(task, scale, now, cfg)))
        .collect();

    if !cfg.decluster.enabled {
        debug!("layout pass: {} tasks at scale {scale}, decluster disabled", positions.len());
        return positions;
    }

    let adjusted = decluster_positions(&positions, &cfg.decluster);
    debug!("layout pass: {} tasks at scale {scale}", adjusted.len());
    adjusted
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 15, 9, 30, 0).unwrap()
    }

    fn sample_tasks() -> Vec<TaskSnapshot> {
        let now = now();
        vec![
            TaskSnapshot::new("standup", now, Priority::Medium),
            TaskSnapshot::new("report", now + Duration::hours(3), Priority::High),
            TaskSnapshot::new("review", now + Duration::hours(3), Priority::High),
            TaskSnapshot::new("taxes", now + Duration::days(365), Priority::Critical),
            TaskSnapshot::new("invoice", now - Duration::days(2), Priority::Low),
            TaskSnapshot::new("gym", now + Duration::days(1), Priority::Low).completed(true),
        ]
    }

    #[test]
    fn test_layout_has_one_entry_per_task_in_order() {
        let tasks = sample_tasks();
        let map = layout_tasks(&tasks, 2.0, now(), &LayoutConfig::default());
        let ids: Vec<&str> = map.keys().map(String::as_str).collect();
        let expected: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_layout_is_deterministic() {
        let tasks = sample_tasks();
        let cfg = LayoutConfig::default();
        let a = layout_tasks(&tasks, 2.7, now(), &cfg);
        let b = layout_tasks(&tasks, 2.7, now(), &cfg);
        assert_eq!(a, b);
    }

    #[test]
    fn test_layout_keeps_radius_consistent() {
        let map = layout_tasks(&sample_tasks(), 2.0, now(), &LayoutConfig::default());
        for pos in map.values() {
            assert!((pos.radius - pos.x.hypot(pos.z)).abs() < 1e-9);
            assert!(pos.x.is_finite() && pos.y.is_finite() && pos.z.is_finite());
        }
    }

    #[test]
    fn test_tasks_due_together_end_up_separated() {
        let cfg = LayoutConfig::default();
        let due = now() + Duration::minutes(10);
        let tasks = vec![
            TaskSnapshot::new("alpha", due, Priority::Medium),
            TaskSnapshot::new("beta", due, Priority::Medium),
        ];
        let map = layout_tasks(&tasks, 2.0, now(), &cfg);
        let d = weighted_distance(&map["alpha"], &map["beta"], cfg.decluster.y_weight);
        assert!(d >= cfg.decluster.min_distance - 1e-9, "distance {d}");
    }

    #[test]
    fn test_shared_spot_is_split_on_the_plane() {
        // With the char-sum hash "ad" and "da" get the same angle and skew.
        let cfg = LayoutConfig { id_hash: IdHash::CharSum, ..LayoutConfig::default() };
        let due = now() + Duration::hours(4);
        let tasks = vec![
            TaskSnapshot::new("ad", due, Priority::Low),
            TaskSnapshot::new("da", due, Priority::Critical),
        ];
        let raw_a = compute_position(&tasks[0], 2.0, now(), &cfg);
        let raw_b = compute_position(&tasks[1], 2.0, now(), &cfg);
        assert_eq!((raw_a.x, raw_a.z), (raw_b.x, raw_b.z));

        let map = layout_tasks(&tasks, 2.0, now(), &cfg);
        let (a, b) = (&map["ad"], &map["da"]);
        assert_eq!(a.y, cfg.priority_elevation.low);
        assert_eq!(b.y, cfg.priority_elevation.critical);
        assert!(a.y > cfg.completed_elevation && b.y > cfg.completed_elevation);
        assert!((a.x - b.x).hypot(a.z - b.z) > 0.0);
        let d = weighted_distance(a, b, cfg.decluster.y_weight);
        assert!(d >= cfg.decluster.min_distance - 1e-9, "distance {d}");
    }

    #[test]
    fn test_mixed_priorities_keep_layers_and_separation() {
        let cfg = LayoutConfig::default();
        let min = cfg.decluster.min_distance;
        // Pairs of tasks due together, on rings far enough apart that only
        // partners can interact.
        let mut tasks = Vec::new();
        for (days, first, second) in [
            (1, Priority::Low, Priority::Critical),
            (7, Priority::Medium, Priority::High),
            (90, Priority::Critical, Priority::Low),
            (365, Priority::High, Priority::Medium),
        ] {
            let due = now() + Duration::days(days);
            tasks.push(TaskSnapshot::new(format!("{days}d-a"), due, first));
            tasks.push(TaskSnapshot::new(format!("{days}d-b"), due, second));
        }
        let radii: Vec<f64> =
            tasks.iter().step_by(2).map(|t| compute_position(t, 2.0, now(), &cfg).radius).collect();
        assert!(radii.windows(2).all(|w| w[1] - w[0] > 2.0 * min), "rings {radii:?}");

        let map = layout_tasks(&tasks, 2.0, now(), &cfg);
        for task in &tasks {
            let y = map[&task.id].y;
            assert_eq!(y, cfg.priority_elevation.get(task.priority), "{}", task.id);
            assert!(y > cfg.completed_elevation);
        }
        for (i, a) in tasks.iter().enumerate() {
            for b in &tasks[i + 1..] {
                let d = weighted_distance(&map[&a.id], &map[&b.id], cfg.decluster.y_weight);
                assert!(d >= min - 1e-9, "{} / {}: {d}", a.id, b.id);
                if a.priority > b.priority {
                    assert!(map[&a.id].y > map[&b.id].y);
                }
            }
        }
    }

    #[test]
    fn test_sample_layout_keeps_priority_elevation() {
        let cfg = LayoutConfig::default();
        let tasks = sample_tasks();
        let map = layout_tasks(&tasks, 2.0, now(), &cfg);
        for task in &tasks {
            let y = map[&task.id].y;
            if task.completed {
                assert_eq!(y, cfg.completed_elevation);
            } else {
                assert_eq!(y, cfg.priority_elevation.get(task.priority), "{}", task.id);
                assert!(y >= cfg.completed_elevation);
            }
        }
        assert!(map["taxes"].y > map["report"].y);
        assert!(map["report"].y > map["standup"].y);
        assert!(map["standup"].y > map["invoice"].y);
    }

    #[test]
    fn test_disabled_decluster_matches_raw_composition() {
        let tasks = sample_tasks();
        let mut cfg = LayoutConfig::default();
        cfg.decluster.enabled = false;
        let map = layout_tasks(&tasks, 2.0, now(), &cfg);
        for task in &tasks {
            assert_eq!(map[&task.id], compute_position(task, 2.0, now(), &cfg));
        }
    }

    #[test]
    fn test_out_of_range_scale_is_clamped() {
        let tasks = sample_tasks();
        let cfg = LayoutConfig::default();
        assert_eq!(layout_tasks(&tasks, 99.0, now(), &cfg), layout_tasks(&tasks, 6.0, now(), &cfg));
    }

    #[test]
    fn test_config_defaults_from_partial_json() {
        let cfg: LayoutConfig =
            serde_json::from_str(r#"{"spiral":false,"decluster":{"minDistance":8}}"#).unwrap();
        assert!(!cfg.spiral);
        assert_eq!(cfg.decluster.min_distance, 8.0);
        assert_eq!(cfg.decluster.y_weight, DeclusterConfig::default().y_weight);
        assert_eq!(cfg.base_distance, 5.0);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        assert!(LayoutConfig::default().validate().is_ok());

        let mut cfg = LayoutConfig::default();
        cfg.base_distance = 200.0;
        assert!(matches!(cfg.validate(), Err(LayoutError::InvalidConfig(_))));

        let mut cfg = LayoutConfig::default();
        cfg.decluster.y_weight = 0.0;
        assert!(cfg.validate().is_err());

        let mut cfg = LayoutConfig::default();
        cfg.past_dampening = 1.5;
        assert!(cfg.validate().is_err());

        let mut cfg = LayoutConfig::default();
        cfg.utc_offset_minutes = 15 * 60;
        assert!(cfg.validate().is_err());
    }
}
