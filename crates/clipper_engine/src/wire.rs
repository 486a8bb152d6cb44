//! JSON shapes exchanged with the clipping backend.

use serde::{Deserialize, Serialize};

pub const DEFAULT_TOTAL_STEPS: u32 = 5;

/// Body of `POST /api/full-auto`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FullAutoRequest {
    pub url: String,
    pub api_key: String,
    pub model: String,
    pub watermark: String,
    pub burn_subtitle: bool,
    /// `ai` or `replayed`.
    pub analysis_method: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StartJobResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub job_id: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Running,
    Done,
    Error,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Done | JobState::Error)
    }
}

/// Body of `GET /api/job-status/<id>`. `success: false` means the server
/// does not know the job.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobStatusResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub status: Option<JobState>,
    #[serde(default)]
    pub step: Option<u32>,
    #[serde(default)]
    pub total_steps: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl JobStatusResponse {
    /// `None` when the response carries no usable status.
    pub fn into_report(self, job_id: &str) -> Option<JobReport> {
        if !self.success {
            return None;
        }
        let state = self.status?;
        Some(JobReport {
            job_id: job_id.to_string(),
            state,
            step: self.step.unwrap_or(0),
            total_steps: self.total_steps.unwrap_or(DEFAULT_TOTAL_STEPS),
            message: self.message.unwrap_or_default(),
            output: self.output,
        })
    }
}

/// A single status report, as forwarded to the front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub job_id: String,
    pub state: JobState,
    pub step: u32,
    pub total_steps: u32,
    pub message: String,
    pub output: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FilesResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub current_path: Option<String>,
    #[serde(default)]
    pub parent_path: Option<String>,
    #[serde(default)]
    pub files: Vec<RemoteEntry>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteEntry {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub is_dir: bool,
    #[serde(default)]
    pub size: Option<u64>,
    /// Lowercase, with the leading dot; empty for directories.
    #[serde(default)]
    pub ext: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteListing {
    pub current_path: String,
    /// `None` at the browse root.
    pub parent_path: Option<String>,
    pub entries: Vec<RemoteEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteChapter {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub reason: String,
}

/// Reply of a synchronous action endpoint. `raw` keeps the full body,
/// pretty-printed, for replies without `output`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub success: bool,
    pub output: Option<String>,
    pub chapters: Option<Vec<RemoteChapter>>,
    pub raw: String,
}

#[derive(Deserialize)]
struct ActionEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    output: Option<String>,
    #[serde(default)]
    chapters: Option<Vec<RemoteChapter>>,
}

impl ActionResponse {
    pub(crate) fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        let raw = serde_json::to_string_pretty(&value)?;
        let envelope: ActionEnvelope = serde_json::from_value(value)?;
        Ok(Self {
            success: envelope.success,
            output: envelope.output,
            chapters: envelope.chapters,
            raw,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ActionResponse, JobState, JobStatusResponse};
    use serde_json::json;

    #[test]
    fn status_defaults_fill_missing_fields() {
        let response: JobStatusResponse =
            serde_json::from_value(json!({"success": true, "status": "running"})).unwrap();
        let report = response.into_report("j1").unwrap();
        assert_eq!(report.state, JobState::Running);
        assert_eq!((report.step, report.total_steps), (0, 5));
        assert_eq!(report.message, "");
    }

    #[test]
    fn unknown_job_yields_no_report() {
        let response: JobStatusResponse =
            serde_json::from_value(json!({"success": false, "error": "Job not found"})).unwrap();
        assert!(response.into_report("j1").is_none());
    }

    #[test]
    fn action_reply_keeps_pretty_raw_body() {
        let reply =
            ActionResponse::from_value(json!({"success": true, "extra": 1})).unwrap();
        assert!(reply.success);
        assert_eq!(reply.output, None);
        assert!(reply.raw.contains("\"extra\": 1"));
    }
}
