//! Confusion classification
//!
//! Combines per-zone dwell/revisit state with the session-wide saccade
//! distance accumulator into a once-per-zone trigger decision. A zone
//! triggers while `dwell > 5s` and either its revisit count or the
//! accumulated saccade distance is past threshold; the classifier latches the
//! first unsuppressed trigger per zone into a "shown" flag so consumers see
//! exactly one event per zone per session.
//!
//! The saccade accumulator is a session-lifetime running sum with no decay or
//! per-zone reset, matching the deployed behavior.

use std::collections::HashSet;

use tracing::debug;

use crate::config::ClassifierConfig;
use crate::zones::{DwellTracker, ZoneState};

/// Stateful confusion classifier; one per session
#[derive(Debug, Clone)]
pub struct ConfusionClassifier {
    config: ClassifierConfig,
    total_saccade_distance: f64,
    /// Zones the user dismissed; terminal for the session
    suppressed: HashSet<String>,
    /// Zones whose contextual help is currently shown (highlight active)
    shown: HashSet<String>,
}

impl ConfusionClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self {
            config,
            total_saccade_distance: 0.0,
            suppressed: HashSet::new(),
            shown: HashSet::new(),
        }
    }

    /// Fold one sample's movement energy into the saccade accumulator.
    /// Energy at or below the gate is fixation jitter and is discarded.
    pub fn record_energy(&mut self, movement_energy: f64) {
        if movement_energy > self.config.saccade_energy_gate {
            self.total_saccade_distance += movement_energy;
        }
    }

    pub fn total_saccade_distance(&self) -> f64 {
        self.total_saccade_distance
    }

    /// Raw trigger predicate for one zone's state
    pub fn is_triggering(&self, state: &ZoneState) -> bool {
        state.dwell_time_sec > self.config.dwell_trigger_sec
            && (state.revisit_count > self.config.revisit_trigger
                || self.total_saccade_distance > self.config.saccade_distance_trigger)
    }

    /// Evaluate every zone after a tracker update; returns the ids newly
    /// latched into the shown state, in registration order.
    pub fn evaluate(&mut self, tracker: &DwellTracker) -> Vec<String> {
        let mut newly_shown = Vec::new();
        for (zone_id, state) in tracker.iter() {
            if !self.is_triggering(state)
                || self.suppressed.contains(zone_id)
                || self.shown.contains(zone_id)
            {
                continue;
            }
            self.shown.insert(zone_id.to_string());
            newly_shown.push(zone_id.to_string());
            debug!(
                zone = zone_id,
                dwell_sec = state.dwell_time_sec,
                revisits = state.revisit_count,
                saccade_distance = self.total_saccade_distance,
                "confusion triggered"
            );
        }
        newly_shown
    }

    /// Dismiss a zone: suppress it for the rest of the session and clear its
    /// highlight. Returns whether a highlight was active.
    pub fn suppress(&mut self, zone_id: &str) -> bool {
        self.suppressed.insert(zone_id.to_string());
        self.shown.remove(zone_id)
    }

    pub fn is_suppressed(&self, zone_id: &str) -> bool {
        self.suppressed.contains(zone_id)
    }

    pub fn is_highlighted(&self, zone_id: &str) -> bool {
        self.shown.contains(zone_id)
    }
}
