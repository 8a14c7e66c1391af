//! Pipeline orchestration
//!
//! [`SessionProcessor`] is the explicit per-session pipeline object: it owns
//! the filter, dwell tracker, classifier, escalation machine, and metrics
//! aggregator, with no global state, so any number of independent sessions
//! can coexist in one process.
//!
//! Every state-mutating call is synchronous and completes before the next
//! sample; timing comes exclusively from the caller-supplied monotonic
//! timestamps on each sample. In a multi-threaded host, calls must be
//! externally serialized (the processor holds no locks).

use crate::classifier::ConfusionClassifier;
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::escalation::{Escalation, EscalationPhase};
use crate::filter::GazeFilter;
use crate::metrics::SessionMetrics;
use crate::types::{GazeSample, SessionEvent, SessionMetricsReport};
use crate::zones::{DwellTracker, ZoneLayout, ZoneState};

/// Per-session gaze analysis pipeline
pub struct SessionProcessor {
    filter: GazeFilter,
    tracker: DwellTracker,
    classifier: ConfusionClassifier,
    escalation: Escalation,
    metrics: SessionMetrics,
    layout: Box<dyn ZoneLayout>,
    paused: bool,
}

impl SessionProcessor {
    /// Create a processor with the session clock starting at t=0
    pub fn new<I, S>(zone_ids: I, layout: Box<dyn ZoneLayout>, config: PipelineConfig) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_session_start(zone_ids, layout, config, 0.0)
    }

    /// Create a processor whose session clock starts at `session_start`
    /// (useful when replaying a stream that begins mid-timeline)
    pub fn with_session_start<I, S>(
        zone_ids: I,
        layout: Box<dyn ZoneLayout>,
        config: PipelineConfig,
        session_start: f64,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            filter: GazeFilter::new(config.filter),
            tracker: DwellTracker::new(zone_ids),
            classifier: ConfusionClassifier::new(config.classifier),
            escalation: Escalation::new(config.escalation),
            metrics: SessionMetrics::new(config.metrics, session_start),
            layout,
            paused: false,
        }
    }

    /// Feed one tracker tick. `None` means the tracker had no detection;
    /// such ticks (and any tick while paused) are dropped with no state
    /// change. Returns the decisions the consumer should render.
    pub fn push_sample(&mut self, sample: Option<GazeSample>) -> Vec<SessionEvent> {
        let Some(sample) = sample else {
            return Vec::new();
        };
        if self.paused {
            return Vec::new();
        }

        let now = sample.elapsed_sec;
        let out = self.filter.process(sample.point());
        self.classifier.record_energy(out.movement_energy);
        self.metrics.record_heatmap_point(out.stabilized);
        self.tracker.update(self.layout.as_ref(), out.stabilized, now);

        let mut events = Vec::new();
        for zone_id in self.classifier.evaluate(&self.tracker) {
            self.metrics.record_confusion();
            self.escalation.note_trigger(now);
            events.push(SessionEvent::ZoneHighlightChanged {
                zone_id: zone_id.clone(),
                active: true,
            });
            events.push(SessionEvent::ConfusionTriggered { zone_id });
        }

        // The escalation clock is checked every tick once armed, not only
        // while a zone is actively triggering
        if self.escalation.poll(now) {
            events.push(SessionEvent::EscalationOffered);
        }

        events
    }

    /// Purchase-button hover signal
    pub fn intent_hover(&mut self) {
        self.metrics.record_hover();
    }

    /// Purchase-button click signal; hosts typically follow this with
    /// [`SessionProcessor::finalize`]
    pub fn intent_commit(&mut self) {
        self.metrics.record_commit();
    }

    /// Dismiss a zone's contextual help: suppresses the zone for the rest of
    /// the session and clears its highlight. Unknown ids are an error.
    pub fn dismiss_zone(&mut self, zone_id: &str) -> Result<Vec<SessionEvent>, PipelineError> {
        if !self.tracker.contains(zone_id) {
            return Err(PipelineError::UnknownZone(zone_id.to_string()));
        }
        let was_highlighted = self.classifier.suppress(zone_id);
        let mut events = Vec::new();
        if was_highlighted {
            events.push(SessionEvent::ZoneHighlightChanged {
                zone_id: zone_id.to_string(),
                active: false,
            });
        }
        Ok(events)
    }

    /// Dismiss the session-level support offer permanently
    pub fn dismiss_escalation(&mut self) {
        self.escalation.dismiss();
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn zone_state(&self, zone_id: &str) -> Option<&ZoneState> {
        self.tracker.state(zone_id)
    }

    pub fn total_saccade_distance(&self) -> f64 {
        self.classifier.total_saccade_distance()
    }

    pub fn escalation_phase(&self) -> EscalationPhase {
        self.escalation.phase()
    }

    pub fn confusion_event_count(&self) -> u32 {
        self.metrics.confusion_event_count()
    }

    /// End the session and produce the exported report. Consumes the
    /// processor: there is no pipeline lifecycle after finalization.
    pub fn finalize(self, now: f64) -> SessionMetricsReport {
        self.metrics.finalize(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClassifierConfig, EscalationConfig};
    use crate::types::{Point, Rect};
    use crate::zones::StaticZoneLayout;

    const SAMPLE_DT: f64 = 0.1;

    fn layout() -> Box<StaticZoneLayout> {
        let mut layout = StaticZoneLayout::default();
        layout.insert("zone-shipping", Rect::new(0.0, 0.0, 100.0, 100.0));
        layout.insert("zone-payment", Rect::new(0.0, 200.0, 100.0, 300.0));
        Box::new(layout)
    }

    fn processor(config: PipelineConfig) -> SessionProcessor {
        SessionProcessor::new(["zone-shipping", "zone-payment"], layout(), config)
    }

    /// Trigger on any revisit after half a second of dwell; keeps end-to-end
    /// scenarios short without touching the state-machine semantics.
    fn eager_config() -> PipelineConfig {
        PipelineConfig {
            classifier: ClassifierConfig {
                dwell_trigger_sec: 0.5,
                revisit_trigger: 0,
                ..ClassifierConfig::default()
            },
            ..PipelineConfig::default()
        }
    }

    /// Feed `n` samples at a fixed point starting at `t0`, collecting events
    fn feed(
        p: &mut SessionProcessor,
        point: Point,
        t0: f64,
        n: usize,
        events: &mut Vec<(f64, SessionEvent)>,
    ) -> f64 {
        let mut t = t0;
        for i in 0..n {
            t = t0 + i as f64 * SAMPLE_DT;
            for event in p.push_sample(Some(GazeSample::new(point.x, point.y, t))) {
                events.push((t, event));
            }
        }
        t
    }

    #[test]
    fn test_dwell_accrues_end_to_end() {
        let mut p = processor(PipelineConfig::default());
        let mut events = Vec::new();
        // 3 seconds inside zone-shipping at 10 Hz
        feed(&mut p, Point::new(50.0, 50.0), 0.0, 31, &mut events);

        let state = p.zone_state("zone-shipping").unwrap();
        assert_eq!(state.revisit_count, 1);
        assert!((state.dwell_time_sec - 3.0).abs() < 1e-6);
        assert!(events.is_empty());
    }

    #[test]
    fn test_none_sample_is_a_noop_tick() {
        let mut p = processor(PipelineConfig::default());
        p.push_sample(Some(GazeSample::new(50.0, 50.0, 0.0)));
        let before = p.zone_state("zone-shipping").cloned();

        assert!(p.push_sample(None).is_empty());
        assert_eq!(p.zone_state("zone-shipping").cloned(), before);
    }

    #[test]
    fn test_pause_gates_sample_processing() {
        let mut p = processor(PipelineConfig::default());
        p.push_sample(Some(GazeSample::new(50.0, 50.0, 0.0)));
        p.pause();
        assert!(p.is_paused());

        let before = p.zone_state("zone-shipping").cloned();
        let saccades = p.total_saccade_distance();
        for i in 1..50 {
            let events = p.push_sample(Some(GazeSample::new(900.0, 900.0, i as f64 * 0.1)));
            assert!(events.is_empty());
        }
        assert_eq!(p.zone_state("zone-shipping").cloned(), before);
        assert_eq!(p.total_saccade_distance(), saccades);

        p.resume();
        assert!(!p.is_paused());
        p.push_sample(Some(GazeSample::new(50.0, 50.0, 10.0)));
        assert_ne!(p.zone_state("zone-shipping").cloned(), before);
    }

    #[test]
    fn test_trigger_emits_highlight_and_confusion_once() {
        let mut p = processor(eager_config());
        let mut events = Vec::new();
        // Dwell inside past the 0.5s gate; first trigger latches once
        feed(&mut p, Point::new(50.0, 50.0), 0.0, 40, &mut events);

        let emitted: Vec<&SessionEvent> = events.iter().map(|(_, e)| e).collect();
        assert_eq!(
            emitted,
            vec![
                &SessionEvent::ZoneHighlightChanged {
                    zone_id: "zone-shipping".to_string(),
                    active: true,
                },
                &SessionEvent::ConfusionTriggered {
                    zone_id: "zone-shipping".to_string(),
                },
            ]
        );
        assert_eq!(p.confusion_event_count(), 1);
    }

    #[test]
    fn test_dismissed_zone_never_triggers_again() {
        let mut p = processor(eager_config());
        let mut events = Vec::new();
        feed(&mut p, Point::new(50.0, 50.0), 0.0, 40, &mut events);
        assert_eq!(p.confusion_event_count(), 1);

        let dismissal = p.dismiss_zone("zone-shipping").unwrap();
        assert_eq!(
            dismissal,
            vec![SessionEvent::ZoneHighlightChanged {
                zone_id: "zone-shipping".to_string(),
                active: false,
            }]
        );

        // Keep satisfying the trigger condition for the rest of the session
        let mut after = Vec::new();
        feed(&mut p, Point::new(50.0, 50.0), 5.0, 100, &mut after);
        assert!(after.is_empty());
        assert_eq!(p.confusion_event_count(), 1);

        // Suppression stops popups, not tracking: dwell keeps accruing
        assert!(p.zone_state("zone-shipping").unwrap().dwell_time_sec > 5.0);
    }

    #[test]
    fn test_dismiss_unknown_zone_is_an_error() {
        let mut p = processor(PipelineConfig::default());
        let err = p.dismiss_zone("zone-nonexistent").unwrap_err();
        assert!(matches!(err, PipelineError::UnknownZone(_)));
    }

    #[test]
    fn test_escalation_fires_once_across_zones() {
        let mut p = processor(eager_config());
        let mut events = Vec::new();

        // zone-shipping triggers shortly after t=0
        let t = feed(&mut p, Point::new(50.0, 50.0), 0.0, 10, &mut events);
        assert_eq!(p.confusion_event_count(), 1);
        assert_eq!(p.escalation_phase(), EscalationPhase::Armed);

        // Wander off both zones until t=20; the quiet ticks still advance
        // the escalation clock, which runs from the FIRST trigger
        feed(&mut p, Point::new(900.0, 900.0), t + SAMPLE_DT, 190, &mut events);

        // zone-payment triggers around t=20
        feed(&mut p, Point::new(50.0, 250.0), 20.1, 30, &mut events);
        assert_eq!(p.confusion_event_count(), 2);

        let offers: Vec<f64> = events
            .iter()
            .filter(|(_, e)| matches!(e, SessionEvent::EscalationOffered))
            .map(|(t, _)| *t)
            .collect();
        assert_eq!(offers.len(), 1, "escalation must fire exactly once");
        // Fired when the first trigger's age crossed 15s, not 15s after
        // the second zone
        assert!(offers[0] > 15.0 && offers[0] < 17.0, "fired at {}", offers[0]);
        assert_eq!(p.escalation_phase(), EscalationPhase::Escalated);
    }

    #[test]
    fn test_escalation_fires_on_quiet_tick() {
        let mut p = processor(eager_config());
        let mut events = Vec::new();
        feed(&mut p, Point::new(50.0, 50.0), 0.0, 10, &mut events);
        assert_eq!(p.escalation_phase(), EscalationPhase::Armed);

        // Leave every zone; nothing is triggering when the clock expires
        let mut quiet = Vec::new();
        feed(&mut p, Point::new(900.0, 900.0), 1.0, 200, &mut quiet);
        assert!(quiet
            .iter()
            .any(|(_, e)| matches!(e, SessionEvent::EscalationOffered)));
    }

    #[test]
    fn test_dismissed_escalation_never_fires() {
        let mut p = processor(eager_config());
        let mut events = Vec::new();
        feed(&mut p, Point::new(50.0, 50.0), 0.0, 10, &mut events);

        p.dismiss_escalation();

        let mut after = Vec::new();
        feed(&mut p, Point::new(50.0, 250.0), 1.0, 300, &mut after);
        assert!(!after
            .iter()
            .any(|(_, e)| matches!(e, SessionEvent::EscalationOffered)));
        assert_eq!(p.escalation_phase(), EscalationPhase::Suppressed);
    }

    #[test]
    fn test_escalation_respects_custom_delay() {
        let config = PipelineConfig {
            escalation: EscalationConfig {
                offer_delay_sec: 2.0,
            },
            ..eager_config()
        };
        let mut p = processor(config);
        let mut events = Vec::new();
        feed(&mut p, Point::new(50.0, 50.0), 0.0, 40, &mut events);

        let offers: Vec<f64> = events
            .iter()
            .filter(|(_, e)| matches!(e, SessionEvent::EscalationOffered))
            .map(|(t, _)| *t)
            .collect();
        assert_eq!(offers.len(), 1);
        assert!(offers[0] > 2.0 && offers[0] < 3.5);
    }

    #[test]
    fn test_finalize_report_reflects_session() {
        let mut p = processor(eager_config());
        let mut events = Vec::new();
        feed(&mut p, Point::new(50.0, 50.0), 0.0, 40, &mut events);

        for _ in 0..4 {
            p.intent_hover();
        }
        p.intent_commit();

        let report = p.finalize(120.0);
        assert_eq!(report.total_time_seconds, 120.0);
        assert_eq!(report.confusion_event_count, 1);
        assert_eq!(report.purchase_hover_count, 4);
        // 85 - 5*1 + 5 = 85
        assert_eq!(report.conversion_estimate_without_help, 85.0);
        assert_eq!(report.conversion_estimate_with_help, 96.0);
        // Every accepted sample contributed a stabilized heatmap point
        assert_eq!(report.heatmap_points.len(), 40);
    }

    #[test]
    fn test_independent_sessions_share_nothing() {
        let mut a = processor(eager_config());
        let b = processor(eager_config());

        let mut events = Vec::new();
        feed(&mut a, Point::new(50.0, 50.0), 0.0, 40, &mut events);
        assert_eq!(a.confusion_event_count(), 1);
        assert_eq!(b.confusion_event_count(), 0);
        assert_eq!(b.total_saccade_distance(), 0.0);
        assert_eq!(b.escalation_phase(), EscalationPhase::Idle);
    }
}
