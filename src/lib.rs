//! Gaze Sentinel - On-device gaze analysis engine for checkout confusion detection
//!
//! Sentinel turns a noisy, high-frequency stream of 2D gaze samples into
//! intervention decisions through a deterministic pipeline: signal filtering
//! → per-zone dwell tracking → confusion classification → escalation, with a
//! session metrics aggregator listening alongside.
//!
//! ## Modules
//!
//! - **Filter**: stabilized position estimate + movement energy from raw samples
//! - **Zones**: per-region dwell/revisit state machines over live geometry
//! - **Classifier**: once-per-zone confusion triggers with dismissal suppression
//! - **Escalation**: single session-level support offer after sustained confusion
//! - **Metrics**: monotonic counters, heatmap capture, conversion estimate
//!
//! All timing is caller-supplied and monotonic; replaying a recorded session
//! reproduces a live run exactly.

pub mod calibration;
pub mod classifier;
pub mod config;
pub mod error;
pub mod escalation;
pub mod export;
pub mod filter;
pub mod metrics;
pub mod pipeline;
pub mod session;
pub mod types;
pub mod zones;

pub use calibration::CalibrationProgress;
pub use config::PipelineConfig;
pub use error::PipelineError;
pub use escalation::EscalationPhase;
pub use export::{ReportExporter, SessionExport};
pub use pipeline::SessionProcessor;
pub use session::{
    parse_session, replay_session, RecordedSession, SessionReplayOutcome, SCHEMA_VERSION,
};
pub use types::{GazeSample, Point, Rect, SessionEvent, SessionMetricsReport, ZoneContent};
pub use zones::{StaticZoneLayout, ZoneLayout, ZoneState};

/// Engine version embedded in all exported records
pub const SENTINEL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for exported records
pub const PRODUCER_NAME: &str = "gaze-sentinel";
