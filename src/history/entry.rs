use bon::Builder;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Viewport scroll offset, in pixels.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollPosition {
    pub x: f64,
    pub y: f64,
}

impl ScrollPosition {
    pub fn new(x: f64, y: f64) -> Self {
        ScrollPosition { x, y }
    }
}

impl From<(f64, f64)> for ScrollPosition {
    fn from((x, y): (f64, f64)) -> Self {
        ScrollPosition { x, y }
    }
}

/// One navigation recorded in the history log.
///
/// `id` is the identifier a restoration request refers back to. It is never
/// changed after the entry is first appended, not even by a replace.
#[derive(Builder, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: u64,
    #[builder(default)]
    #[serde(default)]
    pub state: Value,
    #[builder(into)]
    pub title: String,
    #[builder(into)]
    pub url: String,
    #[builder(default)]
    #[serde(default)]
    pub scroll_position: ScrollPosition,
}
