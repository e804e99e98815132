// Declustering: one sequential all-pairs relaxation pass.
//
// Pairs are visited once each, (i, j) with i < j in map order. A pair closer
// than `min_distance` (Y weighted down) is pushed apart symmetrically in the
// XZ plane until its weighted separation is exactly `min_distance`. Y is
// never moved, so priority layers keep their elevation. Later pairs see
// earlier adjustments. This is not
// an iterative solver: a later push may bring an earlier pair back inside
// the threshold, which is accepted for the intended task counts.

use log::debug;
use serde::{Deserialize, Serialize};

use super::{PositionMap, SpatialPosition};

/// What happens to an adjusted point's orbit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeclusterMode {
    /// Keep the pushed position; radius and angle are recomputed from it.
    #[default]
    Drift,
    /// Keep only the pushed angle and snap back onto the pre-pass radius.
    PreserveRadius,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeclusterConfig {
    pub enabled: bool,
    pub min_distance: f64,
    /// Weight of Y relative to X/Z when measuring separation.
    pub y_weight: f64,
    pub mode: DeclusterMode,
}

impl Default for DeclusterConfig {
    fn default() -> Self {
        Self { enabled: true, min_distance: 5.0, y_weight: 0.5, mode: DeclusterMode::Drift }
    }
}

/// Euclidean distance with the Y axis scaled by `y_weight`.
///
/// Weights outside `[0, 1]` are clamped; a non-finite weight ignores Y.
pub fn weighted_distance(a: &SpatialPosition, b: &SpatialPosition, y_weight: f64) -> f64 {
    let dx = a.x - b.x;
    let dy = (a.y - b.y) * effective_weight(y_weight);
    let dz = a.z - b.z;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

fn effective_weight(y_weight: f64) -> f64 {
    if y_weight.is_finite() { y_weight.clamp(0.0, 1.0) } else { 0.0 }
}

/// Push apart positions closer than `cfg.min_distance`. Returns a new map;
/// `positions` is left untouched.
pub fn decluster_positions(positions: &PositionMap, cfg: &DeclusterConfig) -> PositionMap {
    let mut points: Vec<SpatialPosition> = positions.values().cloned().collect();
    let mut adjusted_pairs = 0usize;

    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            let (head, tail) = points.split_at_mut(j);
            if push_apart(&mut head[i], &mut tail[0], cfg) {
                adjusted_pairs += 1;
            }
        }
    }

    if cfg.mode == DeclusterMode::PreserveRadius {
        for (point, original) in points.iter_mut().zip(positions.values()) {
            if point.x != original.x || point.z != original.z {
                snap_to_radius(point, original.radius);
            }
        }
    }

    debug!("decluster: adjusted {adjusted_pairs} pairs among {} points", points.len());

    positions.keys().cloned().zip(points).collect()
}

/// Adjust one pair in place. Returns whether anything moved.
fn push_apart(a: &mut SpatialPosition, b: &mut SpatialPosition, cfg: &DeclusterConfig) -> bool {
    let dx = a.x - b.x;
    let dy = (a.y - b.y) * effective_weight(cfg.y_weight);
    let dz = a.z - b.z;
    let planar = dx.hypot(dz);
    let distance = planar.hypot(dy);

    if distance.is_nan() || distance >= cfg.min_distance {
        return false;
    }

    // Planar gap that, together with the fixed Y gap, makes the pair exactly
    // `min_distance` apart. |dy| <= distance < min_distance, so this is > 0.
    let target = (cfg.min_distance * cfg.min_distance - dy * dy).sqrt();
    let half = (target - planar) / 2.0;

    // Unit vector from b to a on the plane.
    let (ux, uz) = if planar > 0.0 {
        (dx / planar, dz / planar)
    } else {
        // Same XZ spot: nudge sideways, perpendicular to a's radial direction.
        let theta = a.z.atan2(a.x);
        (-theta.sin(), theta.cos())
    };

    a.x += ux * half;
    a.z += uz * half;
    b.x -= ux * half;
    b.z -= uz * half;

    a.recompute_polar();
    b.recompute_polar();
    true
}

fn snap_to_radius(point: &mut SpatialPosition, radius: f64) {
    let angle = point.z.atan2(point.x);
    point.x = angle.cos() * radius;
    point.z = angle.sin() * radius;
    point.radius = radius;
    point.angle = angle;
}
