//! Core types for the Gaze Sentinel pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: raw samples, screen geometry, consumer-facing events, and the
//! exported session report.

use serde::{Deserialize, Serialize};

/// A 2D position in screen coordinates (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance from the origin
    pub fn magnitude(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

/// An axis-aligned screen rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Point-in-rectangle hit test (edges inclusive)
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.right
            && point.y >= self.top
            && point.y <= self.bottom
    }
}

/// A single gaze sample from the external tracker.
///
/// `elapsed_sec` is a caller-supplied monotonic timestamp in seconds. The
/// pipeline never reads the wall clock; all timing flows through this field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GazeSample {
    pub x: f64,
    pub y: f64,
    pub elapsed_sec: f64,
}

impl GazeSample {
    pub fn new(x: f64, y: f64, elapsed_sec: f64) -> Self {
        Self { x, y, elapsed_sec }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Decisions emitted by the pipeline for the consumer to render.
///
/// The core only decides *which* zone and *whether* to escalate; popups,
/// highlights, and chat windows are the consumer's concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A zone's visual highlight should be shown or cleared
    ZoneHighlightChanged { zone_id: String, active: bool },
    /// Contextual help should be shown for a zone
    ConfusionTriggered { zone_id: String },
    /// The session-level support offer should be surfaced
    EscalationOffered,
}

/// Where a zone's contextual popup should be anchored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PopupPlacement {
    Side,
    Bottom,
}

/// Static display content for one zone's contextual popup.
///
/// Supplied by the consumer as configuration; the core never computes or
/// inspects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneContent {
    pub title: String,
    pub body: String,
    /// Accent color token understood by the consumer's renderer
    pub accent: String,
    pub placement: PopupPlacement,
}

/// The exported end-of-session record.
///
/// Field names are camelCase on the wire; the exact field set is consumed by
/// downstream reporting and must not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetricsReport {
    /// Session duration in seconds
    pub total_time_seconds: f64,
    /// Number of zones that ever showed contextual help
    pub confusion_event_count: u32,
    /// Number of purchase-button hover signals received
    pub purchase_hover_count: u32,
    /// Heuristic conversion likelihood without intervention (10-95)
    pub conversion_estimate_without_help: f64,
    /// Fixed "with intervention" baseline
    pub conversion_estimate_with_help: f64,
    /// Stabilized gaze positions captured over the session
    pub heatmap_points: Vec<Point>,
}
