//! Timeorbit core: places tasks around a "now" origin by how far away their
//! due dates are.
//!
//! The engine is pure. Callers hand in a snapshot of visible tasks, the slider
//! value and a reference "now", and get back a complete [`PositionMap`]. It
//! assumes the task store has already validated its snapshots (unique ids,
//! real due dates); nothing here re-checks them.

mod error;
mod logging;
mod wasm;
pub mod layout;
pub mod model;
pub mod output;
pub mod scale;

pub use error::LayoutError;
pub use layout::{
    DeclusterConfig, DeclusterMode, DistanceMapping, GridLine, IdHash, LayoutConfig, PositionMap,
    SpatialPosition, compute_angle, compute_position, decluster_positions, generate_grid_lines,
    layout_tasks, map_time_to_distance,
};
pub use model::{NowSource, Priority, TaskSnapshot};
pub use scale::{ScaleInterpolation, TimeInterval, TimeScale, TimeScalePreset, duration_for_scale};
