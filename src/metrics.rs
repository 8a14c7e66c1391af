//! Session metrics aggregation
//!
//! Monotonic counters over the session plus heatmap capture, finalized once
//! into the exported report. `finalize` consumes the aggregator; there is no
//! lifecycle after it.

use crate::config::MetricsConfig;
use crate::types::{Point, SessionMetricsReport};

/// Per-session metrics aggregator
#[derive(Debug, Clone)]
pub struct SessionMetrics {
    config: MetricsConfig,
    session_start: f64,
    confusion_event_count: u32,
    purchase_hover_count: u32,
    purchase_commit_count: u32,
    heatmap: Vec<Point>,
}

impl SessionMetrics {
    pub fn new(config: MetricsConfig, session_start: f64) -> Self {
        Self {
            config,
            session_start,
            confusion_event_count: 0,
            purchase_hover_count: 0,
            purchase_commit_count: 0,
            heatmap: Vec::new(),
        }
    }

    /// Count one zone's contextual help being shown (once per zone, enforced
    /// by the classifier's latch)
    pub fn record_confusion(&mut self) {
        self.confusion_event_count += 1;
    }

    pub fn record_hover(&mut self) {
        self.purchase_hover_count += 1;
    }

    pub fn record_commit(&mut self) {
        self.purchase_commit_count += 1;
    }

    /// Capture a stabilized gaze position. Capture stops silently at the
    /// configured capacity so unbounded streams cannot grow the report.
    pub fn record_heatmap_point(&mut self, point: Point) {
        if self.heatmap.len() < self.config.heatmap_capacity {
            self.heatmap.push(point);
        }
    }

    pub fn confusion_event_count(&self) -> u32 {
        self.confusion_event_count
    }

    pub fn purchase_hover_count(&self) -> u32 {
        self.purchase_hover_count
    }

    pub fn purchase_commit_count(&self) -> u32 {
        self.purchase_commit_count
    }

    pub fn heatmap_len(&self) -> usize {
        self.heatmap.len()
    }

    /// Produce the one-shot session report
    pub fn finalize(self, now: f64) -> SessionMetricsReport {
        let without_help = conversion_estimate(
            &self.config,
            self.confusion_event_count,
            self.purchase_hover_count,
        );
        SessionMetricsReport {
            total_time_seconds: now - self.session_start,
            confusion_event_count: self.confusion_event_count,
            purchase_hover_count: self.purchase_hover_count,
            conversion_estimate_without_help: without_help,
            conversion_estimate_with_help: self.config.assisted_estimate,
            heatmap_points: self.heatmap,
        }
    }
}

/// Closed-form conversion heuristic: base score minus a penalty per confusion
/// event, plus a bonus for sustained purchase-button interest, clamped.
fn conversion_estimate(config: &MetricsConfig, confusion_events: u32, hovers: u32) -> f64 {
    let bonus = if hovers > config.hover_bonus_threshold {
        config.hover_bonus
    } else {
        0.0
    };
    let raw = config.base_score - config.confusion_penalty * confusion_events as f64 + bonus;
    raw.clamp(config.estimate_floor, config.estimate_ceiling)
}
