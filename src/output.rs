//! Output types for the JS renderer.
//!
//! These structs are serialized to JSON and handed to the frontend, which
//! draws tasks and rings from them without further layout work.

use serde::Serialize;

use crate::error::LayoutError;
use crate::layout::{GridLine, PositionMap, SpatialPosition};

/// A positioned task ready to draw
#[derive(Debug, Clone, Serialize)]
pub struct PositionOutput {
    pub id: String,
    #[serde(flatten)]
    pub position: SpatialPosition,
}

/// Error information shown by the frontend
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub message: String,
}

impl From<&LayoutError> for ErrorInfo {
    fn from(e: &LayoutError) -> Self {
        Self { message: e.to_string() }
    }
}

/// The combined output of one layout pass
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOutput {
    pub positions: Vec<PositionOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub grid_lines: Vec<GridLine>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub scale_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl LayoutOutput {
    pub fn from_error(e: &LayoutError) -> Self {
        Self { error: Some(e.into()), ..Self::default() }
    }

    pub fn with_positions(mut self, positions: PositionMap) -> Self {
        self.positions = positions
            .into_iter()
            .map(|(id, position)| PositionOutput { id, position })
            .collect();
        self
    }
}
