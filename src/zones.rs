//! Per-zone dwell and revisit tracking
//!
//! Each named screen region carries an `{Outside, Inside}` state machine fed
//! by the stabilized gaze position. Dwell accrues only across consecutive
//! inside samples; leaving a zone stops accrual without penalty. Overlapping
//! zones accrue independently.
//!
//! Zone bounds are resolved through [`ZoneLayout`] on every evaluation, never
//! cached: the on-screen region can move under scroll or resize. A zone whose
//! geometry is currently unavailable is skipped for the tick and resumes
//! normal evaluation when bounds reappear.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{Point, Rect};

/// Resolves the current bounds of a zone, or `None` if the region is not
/// presently rendered.
pub trait ZoneLayout {
    fn bounds(&self, zone_id: &str) -> Option<Rect>;
}

/// Any closure over zone ids works as a layout, which keeps moving-geometry
/// test setups cheap.
impl<F> ZoneLayout for F
where
    F: Fn(&str) -> Option<Rect>,
{
    fn bounds(&self, zone_id: &str) -> Option<Rect> {
        self(zone_id)
    }
}

/// Fixed zone geometry backed by a map, used for replay and tests
#[derive(Debug, Clone, Default)]
pub struct StaticZoneLayout {
    bounds: HashMap<String, Rect>,
}

impl StaticZoneLayout {
    pub fn new(bounds: HashMap<String, Rect>) -> Self {
        Self { bounds }
    }

    pub fn insert(&mut self, zone_id: impl Into<String>, rect: Rect) {
        self.bounds.insert(zone_id.into(), rect);
    }
}

impl ZoneLayout for StaticZoneLayout {
    fn bounds(&self, zone_id: &str) -> Option<Rect> {
        self.bounds.get(zone_id).copied()
    }
}

/// Mutable per-zone tracking state; monotonic within a session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneState {
    pub is_inside: bool,
    pub dwell_time_sec: f64,
    pub revisit_count: u32,
    pub last_entry: Option<f64>,
}

#[derive(Debug, Clone)]
struct ZoneEntry {
    id: String,
    state: ZoneState,
}

/// Tracks dwell state for every registered zone, in registration order
#[derive(Debug, Clone, Default)]
pub struct DwellTracker {
    zones: Vec<ZoneEntry>,
}

impl DwellTracker {
    /// Register zones in iteration order; duplicate ids are ignored
    pub fn new<I, S>(zone_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tracker = Self { zones: Vec::new() };
        for id in zone_ids {
            let id = id.into();
            if !tracker.contains(&id) {
                tracker.zones.push(ZoneEntry {
                    id,
                    state: ZoneState::default(),
                });
            }
        }
        tracker
    }

    pub fn contains(&self, zone_id: &str) -> bool {
        self.zones.iter().any(|z| z.id == zone_id)
    }

    pub fn state(&self, zone_id: &str) -> Option<&ZoneState> {
        self.zones.iter().find(|z| z.id == zone_id).map(|z| &z.state)
    }

    /// Registered zone ids and their states, in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ZoneState)> {
        self.zones.iter().map(|z| (z.id.as_str(), &z.state))
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// Advance every zone's state machine with one stabilized sample
    pub fn update(&mut self, layout: &dyn ZoneLayout, point: Point, now: f64) {
        for zone in &mut self.zones {
            let Some(rect) = layout.bounds(&zone.id) else {
                // Geometry not currently present; skip this tick
                continue;
            };

            let state = &mut zone.state;
            if rect.contains(point) {
                if !state.is_inside {
                    state.is_inside = true;
                    state.revisit_count += 1;
                    state.last_entry = Some(now);
                    debug!(zone = %zone.id, revisits = state.revisit_count, "zone entered");
                } else if let Some(entry) = state.last_entry {
                    state.dwell_time_sec += now - entry;
                    state.last_entry = Some(now);
                }
            } else {
                state.is_inside = false;
            }
        }
    }
}
