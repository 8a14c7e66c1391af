//! Pipeline configuration
//!
//! All tuning constants live here. Defaults reproduce the production
//! thresholds exactly; deviate only for experimentation.

use serde::{Deserialize, Serialize};

/// High-pass filter coefficient
pub const HPF_ALPHA: f64 = 0.8;

/// Smoothing window length in samples
pub const SMOOTHING_WINDOW: usize = 10;

/// Movement energy below this is treated as fixation jitter, not a saccade
pub const SACCADE_ENERGY_GATE: f64 = 15.0;

/// Signal filter tuning
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FilterConfig {
    /// First-order recursive high-pass coefficient (0-1)
    pub alpha: f64,
    /// Trailing-mean window length in raw samples
    pub smoothing_window: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            alpha: HPF_ALPHA,
            smoothing_window: SMOOTHING_WINDOW,
        }
    }
}

/// Confusion trigger thresholds
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Minimum movement energy for a sample to count as saccade distance
    pub saccade_energy_gate: f64,
    /// Dwell time a zone must exceed (strict) before it can trigger
    pub dwell_trigger_sec: f64,
    /// Revisit count a zone must exceed (strict) to trigger via revisits
    pub revisit_trigger: u32,
    /// Accumulated saccade distance that triggers regardless of revisits
    pub saccade_distance_trigger: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            saccade_energy_gate: SACCADE_ENERGY_GATE,
            dwell_trigger_sec: 5.0,
            revisit_trigger: 3,
            saccade_distance_trigger: 6000.0,
        }
    }
}

/// Escalation timing
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EscalationConfig {
    /// Seconds of unresolved confusion (from the first trigger, any zone)
    /// before the support offer is raised
    pub offer_delay_sec: f64,
}

impl Default for EscalationConfig {
    fn default() -> Self {
        Self {
            offer_delay_sec: 15.0,
        }
    }
}

/// Conversion estimate constants and capture limits
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Base conversion score before adjustments
    pub base_score: f64,
    /// Penalty per confusion event
    pub confusion_penalty: f64,
    /// Bonus applied when hover count exceeds `hover_bonus_threshold`
    pub hover_bonus: f64,
    /// Hover count must exceed this (strict) to earn the bonus
    pub hover_bonus_threshold: u32,
    /// Lower clamp for the unassisted estimate
    pub estimate_floor: f64,
    /// Upper clamp for the unassisted estimate
    pub estimate_ceiling: f64,
    /// Fixed "with intervention" estimate, not computed from behavior
    pub assisted_estimate: f64,
    /// Heatmap capture stops once this many points are held
    pub heatmap_capacity: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            base_score: 85.0,
            confusion_penalty: 5.0,
            hover_bonus: 5.0,
            hover_bonus_threshold: 2,
            estimate_floor: 10.0,
            estimate_ceiling: 95.0,
            assisted_estimate: 96.0,
            heatmap_capacity: 4096,
        }
    }
}

/// Complete pipeline configuration
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub filter: FilterConfig,
    pub classifier: ClassifierConfig,
    pub escalation: EscalationConfig,
    pub metrics: MetricsConfig,
}
