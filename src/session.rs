//! Recorded session schema and deterministic replay
//!
//! A [`RecordedSession`] captures everything a live session consumed: static
//! zone geometry (with optional display content for the consumer's renderer)
//! and a time-ordered list of inputs. Because the pipeline takes all timing
//! from input timestamps, replaying a log reproduces the live run exactly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::pipeline::SessionProcessor;
use crate::types::{GazeSample, Rect, SessionEvent, SessionMetricsReport, ZoneContent};
use crate::zones::StaticZoneLayout;

/// Recorded-session schema version
pub const SCHEMA_VERSION: &str = "1.0";

fn default_schema_version() -> String {
    SCHEMA_VERSION.to_string()
}

/// A zone's recorded geometry plus optional consumer display content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneGeometry {
    pub id: String,
    pub bounds: Rect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<ZoneContent>,
}

/// One recorded input at monotonic time `t` (seconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInput {
    pub t: f64,
    #[serde(flatten)]
    pub kind: SessionInputKind,
}

/// The kinds of input a live session consumes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "input", rename_all = "snake_case")]
pub enum SessionInputKind {
    /// A gaze sample from the tracker
    Sample { x: f64, y: f64 },
    /// The tracker reported no detection this tick
    Dropout,
    IntentHover,
    IntentCommit,
    DismissZone { zone_id: String },
    DismissEscalation,
    Pause,
    Resume,
}

/// A complete recorded session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedSession {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    pub session_id: String,
    /// Wall-clock session start, for provenance only; replay timing uses
    /// the monotonic `t` fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    pub zones: Vec<ZoneGeometry>,
    pub inputs: Vec<SessionInput>,
}

/// An event plus the input timestamp that produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    pub t: f64,
    #[serde(flatten)]
    pub event: SessionEvent,
}

/// Everything a replay produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionReplayOutcome {
    pub session_id: String,
    pub events: Vec<TimedEvent>,
    pub report: SessionMetricsReport,
}

/// Parse a recorded session from JSON
pub fn parse_session(json: &str) -> Result<RecordedSession, PipelineError> {
    serde_json::from_str(json)
        .map_err(|e| PipelineError::ParseError(format!("Failed to parse session log: {e}")))
}

/// Parse and replay a recorded session in one call
pub fn replay_session(
    json: &str,
    config: PipelineConfig,
) -> Result<SessionReplayOutcome, PipelineError> {
    parse_session(json)?.replay(config)
}

impl RecordedSession {
    /// Structural validation: schema version, zone uniqueness, input
    /// ordering, and dismissal targets
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.schema_version != SCHEMA_VERSION {
            return Err(PipelineError::UnsupportedSchema(
                self.schema_version.clone(),
            ));
        }
        if self.zones.is_empty() {
            return Err(PipelineError::InvalidSession(
                "session declares no zones".to_string(),
            ));
        }
        for (i, zone) in self.zones.iter().enumerate() {
            if self.zones[..i].iter().any(|z| z.id == zone.id) {
                return Err(PipelineError::InvalidSession(format!(
                    "duplicate zone id: {}",
                    zone.id
                )));
            }
        }

        let mut last_t = f64::NEG_INFINITY;
        for input in &self.inputs {
            if input.t < last_t {
                return Err(PipelineError::OutOfOrderInput(input.t));
            }
            last_t = input.t;

            if let SessionInputKind::DismissZone { zone_id } = &input.kind {
                if !self.zones.iter().any(|z| z.id == *zone_id) {
                    return Err(PipelineError::UnknownZone(zone_id.clone()));
                }
            }
        }
        Ok(())
    }

    fn layout(&self) -> StaticZoneLayout {
        let mut layout = StaticZoneLayout::default();
        for zone in &self.zones {
            layout.insert(zone.id.clone(), zone.bounds);
        }
        layout
    }

    /// Replay the session through a fresh pipeline. The session clock starts
    /// at the first input's `t` and the report is finalized at the last
    /// input's `t`.
    pub fn replay(&self, config: PipelineConfig) -> Result<SessionReplayOutcome, PipelineError> {
        self.validate()?;

        let session_start = self.inputs.first().map(|i| i.t).unwrap_or(0.0);
        let session_end = self.inputs.last().map(|i| i.t).unwrap_or(session_start);

        let zone_ids: Vec<String> = self.zones.iter().map(|z| z.id.clone()).collect();
        let mut processor = SessionProcessor::with_session_start(
            zone_ids,
            Box::new(self.layout()),
            config,
            session_start,
        );

        let mut events = Vec::new();
        let push = |t: f64, emitted: Vec<SessionEvent>, events: &mut Vec<TimedEvent>| {
            for event in emitted {
                events.push(TimedEvent { t, event });
            }
        };

        for input in &self.inputs {
            match &input.kind {
                SessionInputKind::Sample { x, y } => {
                    let emitted = processor.push_sample(Some(GazeSample::new(*x, *y, input.t)));
                    push(input.t, emitted, &mut events);
                }
                SessionInputKind::Dropout => {
                    processor.push_sample(None);
                }
                SessionInputKind::IntentHover => processor.intent_hover(),
                SessionInputKind::IntentCommit => processor.intent_commit(),
                SessionInputKind::DismissZone { zone_id } => {
                    let emitted = processor.dismiss_zone(zone_id)?;
                    push(input.t, emitted, &mut events);
                }
                SessionInputKind::DismissEscalation => processor.dismiss_escalation(),
                SessionInputKind::Pause => processor.pause(),
                SessionInputKind::Resume => processor.resume(),
            }
        }

        Ok(SessionReplayOutcome {
            session_id: self.session_id.clone(),
            events,
            report: processor.finalize(session_end),
        })
    }
}
