//! Session-level escalation
//!
//! Escalation measures cumulative frustration: the clock starts at the first
//! confusion trigger across all zones, not per zone. Once the age of that
//! first trigger exceeds the configured delay the support offer fires, exactly
//! once per session. Dismissal is terminal.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::EscalationConfig;

/// Escalation lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationPhase {
    /// No confusion trigger seen yet
    Idle,
    /// First trigger recorded; the delay clock is running
    Armed,
    /// The support offer has been emitted
    Escalated,
    /// Dismissed; no further offers this session
    Suppressed,
}

/// Escalation state machine; one per session
#[derive(Debug, Clone)]
pub struct Escalation {
    config: EscalationConfig,
    phase: EscalationPhase,
    first_trigger: Option<f64>,
}

impl Escalation {
    pub fn new(config: EscalationConfig) -> Self {
        Self {
            config,
            phase: EscalationPhase::Idle,
            first_trigger: None,
        }
    }

    pub fn phase(&self) -> EscalationPhase {
        self.phase
    }

    /// Timestamp of the first confusion trigger, if any
    pub fn first_trigger(&self) -> Option<f64> {
        self.first_trigger
    }

    /// Record a confusion trigger. Only the first one arms the clock;
    /// later triggers (any zone) are absorbed.
    pub fn note_trigger(&mut self, now: f64) {
        if self.phase == EscalationPhase::Idle {
            self.phase = EscalationPhase::Armed;
            self.first_trigger = Some(now);
        }
    }

    /// Check the delay clock. Returns `true` exactly once, on the tick the
    /// first trigger's age exceeds the configured delay.
    pub fn poll(&mut self, now: f64) -> bool {
        if self.phase != EscalationPhase::Armed {
            return false;
        }
        let Some(first) = self.first_trigger else {
            return false;
        };
        if now - first > self.config.offer_delay_sec {
            self.phase = EscalationPhase::Escalated;
            info!(age_sec = now - first, "escalation offered");
            return true;
        }
        false
    }

    /// Dismiss escalation for the rest of the session, from any phase
    pub fn dismiss(&mut self) {
        self.phase = EscalationPhase::Suppressed;
    }
}
