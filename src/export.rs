//! Report export
//!
//! Wraps the session report in an envelope carrying producer identity and a
//! wall-clock computation stamp, for downstream reporting pipelines that
//! ingest records from many engine instances.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PipelineError;
use crate::types::SessionMetricsReport;
use crate::{PRODUCER_NAME, SENTINEL_VERSION};

/// Producer metadata embedded in every export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Exported session record: producer identity, computation stamp, report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionExport {
    pub producer: ExportProducer,
    pub computed_at_utc: String,
    pub report: SessionMetricsReport,
}

/// Report exporter with a stable per-process instance id
pub struct ReportExporter {
    instance_id: String,
}

impl Default for ReportExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportExporter {
    /// Create an exporter with a fresh instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an exporter with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Wrap a finalized report in the export envelope
    pub fn export(&self, report: SessionMetricsReport) -> SessionExport {
        SessionExport {
            producer: ExportProducer {
                name: PRODUCER_NAME.to_string(),
                version: SENTINEL_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            computed_at_utc: Utc::now().to_rfc3339(),
            report,
        }
    }

    /// Export straight to JSON
    pub fn export_to_json(
        &self,
        report: SessionMetricsReport,
        pretty: bool,
    ) -> Result<String, PipelineError> {
        let export = self.export(report);
        let encoded = if pretty {
            serde_json::to_string_pretty(&export)
        } else {
            serde_json::to_string(&export)
        };
        encoded.map_err(PipelineError::JsonError)
    }
}
