//! Read-only task projection consumed by the layout engine.
//!
//! Snapshots are rebuilt by the task store for every layout pass. The engine
//! assumes they are already validated: a snapshot always carries a real due
//! timestamp, and ids are unique within one pass. Nothing here re-checks that.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSnapshot {
    pub id: String,
    /// Due timestamp; milliseconds since the epoch on the wire.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub due_at: DateTime<Utc>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
}

impl TaskSnapshot {
    pub fn new(id: impl Into<String>, due_at: DateTime<Utc>, priority: Priority) -> Self {
        Self { id: id.into(), due_at, priority, completed: false }
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Signed distance from `now` to the due date, in milliseconds. Keeps
    /// microsecond precision unless the gap overflows it.
    pub fn offset_ms(&self, now: DateTime<Utc>) -> f64 {
        let delta = self.due_at - now;
        delta
            .num_microseconds()
            .map_or_else(|| delta.num_milliseconds() as f64, |us| us as f64 / 1000.0)
    }

    /// Strictly in the future; a task due exactly now counts as past.
    /// Agrees with the sign of [`offset_ms`](Self::offset_ms).
    pub fn is_future(&self, now: DateTime<Utc>) -> bool {
        self.offset_ms(now) > 0.0
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.offset_ms(now) < 0.0
    }
}

/// Where the layout's "now" comes from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum NowSource {
    /// Follow the wall clock supplied by the caller.
    #[default]
    Live,
    /// A user-chosen simulated "now".
    Pinned(DateTime<Utc>),
}

impl NowSource {
    pub fn resolve(self, live_now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            NowSource::Live => live_now,
            NowSource::Pinned(at) => at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_offsets_and_flags() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let task = TaskSnapshot::new("a", now + Duration::hours(2), Priority::High);
        assert_eq!(task.offset_ms(now), 2.0 * 3_600_000.0);
        assert!(task.is_future(now));
        assert!(!task.is_overdue(now));

        let late = TaskSnapshot::new("b", now - Duration::minutes(1), Priority::Low);
        assert!(late.is_overdue(now));
        assert!(!late.clone().completed(true).is_overdue(now));

        let exact = TaskSnapshot::new("c", now, Priority::Low);
        assert!(!exact.is_future(now));
    }

    #[test]
    fn test_sub_millisecond_offsets_agree_with_flags() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let soon = TaskSnapshot::new("a", now + Duration::microseconds(500), Priority::Low);
        assert_eq!(soon.offset_ms(now), 0.5);
        assert!(soon.is_future(now));

        let just_late = TaskSnapshot::new("b", now - Duration::microseconds(500), Priority::Low);
        assert_eq!(just_late.offset_ms(now), -0.5);
        assert!(!just_late.is_future(now));
        assert!(just_late.is_overdue(now));
    }

    #[test]
    fn test_snapshot_from_json() {
        let task: TaskSnapshot =
            serde_json::from_str(r#"{"id":"t1","dueAt":1700000000000,"priority":"critical"}"#).unwrap();
        assert_eq!(task.priority, Priority::Critical);
        assert!(!task.completed);
        assert_eq!(task.due_at.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn test_now_source() {
        let live = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let pinned = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(NowSource::Live.resolve(live), live);
        assert_eq!(NowSource::Pinned(pinned).resolve(live), pinned);
    }
}
