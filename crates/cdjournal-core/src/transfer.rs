//! Export and import of the whole document as a versioned JSON envelope.

use chrono::{NaiveDate, SecondsFormat};
use cdjournal_domain::Document;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::{time::Clock, CoreError, ServiceResult};

pub const EXPORT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportEnvelope {
    pub version: String,
    /// ISO-8601 timestamp with millisecond precision.
    pub export_date: String,
    pub data: Document,
}

pub struct TransferService;

impl TransferService {
    pub fn envelope(document: &Document, clock: &dyn Clock) -> ExportEnvelope {
        ExportEnvelope {
            version: EXPORT_VERSION.to_string(),
            export_date: clock.now().to_rfc3339_opts(SecondsFormat::Millis, true),
            data: document.clone(),
        }
    }

    /// Pretty-printed export of `document`.
    pub fn export_json(document: &Document, clock: &dyn Clock) -> ServiceResult<String> {
        let envelope = Self::envelope(document, clock);
        Ok(serde_json::to_string_pretty(&envelope)?)
    }

    /// Parses an export. Only `data` is required; it replaces the whole document.
    pub fn import_json(text: &str) -> ServiceResult<Document> {
        let mut value: Value = serde_json::from_str(text)
            .map_err(|err| CoreError::BadFormat(format!("import is not valid JSON: {err}")))?;
        let data = value
            .as_object_mut()
            .and_then(|object| object.remove("data"))
            .filter(|data| !data.is_null())
            .ok_or_else(|| CoreError::BadFormat("import is missing the `data` field".into()))?;
        let document: Document = serde_json::from_value(data)
            .map_err(|err| CoreError::BadFormat(format!("import `data` is malformed: {err}")))?;
        info!(
            accounts = document.gl_accounts.len(),
            years = document.years.len(),
            "imported document"
        );
        Ok(document)
    }

    /// `cd-journal-{year}-{YYYY-MM-DD}.json`
    pub fn export_file_name(year: i32, date: NaiveDate) -> String {
        format!("cd-journal-{year}-{}.json", date.format("%Y-%m-%d"))
    }
}
