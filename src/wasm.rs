//! WASM bindings for the timeorbit-core library.
//!
//! All functions exposed to JavaScript via wasm-bindgen are defined here.
//! Inputs and outputs are JSON strings; failures never throw, they come back
//! as an `error` field and are echoed to the console.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::to_string;
use wasm_bindgen::prelude::*;

use crate::error::LayoutError;
use crate::layout::{LayoutConfig, generate_grid_lines, layout_tasks};
use crate::model::{NowSource, TaskSnapshot};
use crate::output::LayoutOutput;
use crate::scale::TimeScale;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = log)]
    pub fn console_log(s: &str);

    #[wasm_bindgen(js_namespace = console, js_name = error)]
    pub fn console_error(s: &str);
}

/// Body of a `compute_layout` call.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutRequest {
    tasks: Vec<TaskSnapshot>,
    scale: f64,
    /// Pinned "now"; the wall clock is used when absent.
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    now_ms: Option<DateTime<Utc>>,
    #[serde(default)]
    config: LayoutConfig,
}

fn layout_json(input: &str, live_now: DateTime<Utc>) -> Result<LayoutOutput, LayoutError> {
    let request: LayoutRequest = serde_json::from_str(input)?;
    let cfg = request.config;
    cfg.validate()?;

    let now = request.now_ms.map_or(NowSource::Live, NowSource::Pinned).resolve(live_now);
    let scale = cfg.presets.clamp(request.scale);
    let positions = layout_tasks(&request.tasks, scale, now, &cfg);

    Ok(LayoutOutput {
        grid_lines: generate_grid_lines(scale, &cfg),
        scale_label: cfg.presets.label_for_scale(scale).to_string(),
        ..LayoutOutput::default()
    }
    .with_positions(positions))
}

fn grid_lines_json(scale: f64, config_json: &str) -> Result<LayoutOutput, LayoutError> {
    let cfg: LayoutConfig = if config_json.trim().is_empty() {
        LayoutConfig::default()
    } else {
        serde_json::from_str(config_json)?
    };
    cfg.validate()?;
    Ok(LayoutOutput {
        grid_lines: generate_grid_lines(scale, &cfg),
        scale_label: cfg.presets.label_for_scale(scale).to_string(),
        ..LayoutOutput::default()
    })
}

fn render(result: Result<LayoutOutput, LayoutError>) -> String {
    let output = result.unwrap_or_else(|e| {
        console_error(&format!("Layout failed: {e}"));
        LayoutOutput::from_error(&e)
    });
    to_string(&output).unwrap_or_else(|_| "{\"error\": {\"message\": \"Serialization error\"}}".to_string())
}

/// Install the console logger at `level` ("error" .. "trace").
#[wasm_bindgen]
pub fn init_logging(level: &str) {
    crate::logging::init(level);
}

/// Lay out the tasks in `input` and return positions, grid lines and the scale label.
#[wasm_bindgen]
pub fn compute_layout(input: &str) -> String {
    render(layout_json(input, Utc::now()))
}

/// Grid lines for `scale`. An empty `config_json` uses the default config.
#[wasm_bindgen]
pub fn grid_lines(scale: f64, config_json: &str) -> String {
    render(grid_lines_json(scale, config_json))
}

/// Milliseconds represented by a slider value on the default presets.
#[wasm_bindgen]
pub fn duration_for_scale(scale: f64) -> f64 {
    crate::scale::duration_for_scale(scale)
}

/// Human label for a slider value on the default presets.
#[wasm_bindgen]
pub fn time_scale_label(scale: f64) -> String {
    TimeScale::default().label_for_scale(scale).to_string()
}
