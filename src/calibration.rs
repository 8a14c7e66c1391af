//! Calibration progress tracking
//!
//! The tracker needs a handful of confirmed screen positions before its
//! output is usable. The click-capture UI is the host's concern; this module
//! only keeps the per-point click counts and the completion state the host
//! gates tracking on.

use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// Clicks required on each calibration point
pub const DEFAULT_CLICKS_PER_POINT: u32 = 5;

/// Progress snapshot for a single point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointProgress {
    pub clicks: u32,
    pub complete: bool,
}

/// Click-per-point calibration bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationProgress {
    clicks_per_point: u32,
    points: Vec<(String, u32)>,
}

impl CalibrationProgress {
    /// Register calibration points; duplicate ids are ignored
    pub fn new<I, S>(point_ids: I, clicks_per_point: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut points: Vec<(String, u32)> = Vec::new();
        for id in point_ids {
            let id = id.into();
            if !points.iter().any(|(existing, _)| *existing == id) {
                points.push((id, 0));
            }
        }
        Self {
            clicks_per_point,
            points,
        }
    }

    /// Record one click on a point. Clicks past completion saturate.
    pub fn record_click(&mut self, point_id: &str) -> Result<PointProgress, PipelineError> {
        let target = self.clicks_per_point;
        let entry = self
            .points
            .iter_mut()
            .find(|(id, _)| id == point_id)
            .ok_or_else(|| PipelineError::UnknownCalibrationPoint(point_id.to_string()))?;
        if entry.1 < target {
            entry.1 += 1;
        }
        Ok(PointProgress {
            clicks: entry.1,
            complete: entry.1 >= target,
        })
    }

    pub fn is_complete(&self) -> bool {
        !self.points.is_empty()
            && self
                .points
                .iter()
                .all(|(_, clicks)| *clicks >= self.clicks_per_point)
    }

    pub fn completed_points(&self) -> usize {
        self.points
            .iter()
            .filter(|(_, clicks)| *clicks >= self.clicks_per_point)
            .count()
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Completed points over total points, 0-1
    pub fn completion_ratio(&self) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        self.completed_points() as f64 / self.points.len() as f64
    }
}
