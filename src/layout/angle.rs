// Angular placement.
//
// Future tasks start from angle 0, past tasks from π, so the two time
// directions land on opposite halves of the plane. Within a half, the due
// date's weekday and hour plus a per-task id hash spread tasks out. All
// inputs are properties of the task itself, so repeated passes agree.

use chrono::{DateTime, Datelike, FixedOffset, Offset, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::LayoutConfig;

/// Stable string hash used for per-task angle and spiral variation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IdHash {
    /// 64-bit FNV-1a over the UTF-8 bytes.
    #[default]
    Fnv1a,
    /// Sum of UTF-16 code units, as the first web client did.
    CharSum,
}

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

impl IdHash {
    pub fn hash(self, id: &str) -> u64 {
        match self {
            IdHash::Fnv1a => id
                .bytes()
                .fold(FNV_OFFSET_BASIS, |h, b| (h ^ u64::from(b)).wrapping_mul(FNV_PRIME)),
            IdHash::CharSum => id.encode_utf16().map(u64::from).sum(),
        }
    }
}

/// Per-task fraction in `[0, 0.99]` taken from the id hash.
fn id_offset(task_id: &str, cfg: &LayoutConfig) -> f64 {
    (cfg.id_hash.hash(task_id) % 100) as f64 / 100.0
}

/// Per-task spiral skew in `[0.10, 0.19]`.
pub fn spiral_factor(task_id: &str, cfg: &LayoutConfig) -> f64 {
    0.1 + (cfg.id_hash.hash(task_id) % 10) as f64 / 100.0
}

fn local_offset(cfg: &LayoutConfig) -> FixedOffset {
    FixedOffset::east_opt(cfg.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
}

/// Angle in radians for a task. Not wrapped into `[0, 2π)`: flipping
/// `is_future` shifts the result by exactly π.
pub fn compute_angle(due_at: DateTime<Utc>, task_id: &str, is_future: bool, cfg: &LayoutConfig) -> f64 {
    let base = if is_future { 0.0 } else { PI };

    let local = due_at.with_timezone(&local_offset(cfg));
    let day_factor = f64::from(local.weekday().num_days_from_sunday()) / 7.0;
    let hour_factor = f64::from(local.hour()) / 24.0;

    base + (day_factor + hour_factor + id_offset(task_id, cfg)) * PI
}
