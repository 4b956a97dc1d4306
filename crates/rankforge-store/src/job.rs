use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    Research,
    Plan,
}

impl JobKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Research => "research",
            Self::Plan => "plan",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: JobKind,
    pub title: String,
    pub status: JobStatus,
    /// 0-100.
    pub progress: u8,
    pub logs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_completion: Option<DateTime<Utc>>,
}

/// A partial change to a job. Unset fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobUpdate {
    pub progress: Option<u8>,
    pub log: Option<String>,
    pub result: Option<serde_json::Value>,
    pub error: Option<String>,
}

impl JobUpdate {
    pub fn progress(progress: u8) -> Self {
        Self {
            progress: Some(progress),
            ..Self::default()
        }
    }

    pub fn with_log(mut self, log: impl Into<String>) -> Self {
        self.log = Some(log.into());
        self
    }

    /// Progress 100 with the final payload.
    pub fn completed(result: serde_json::Value) -> Self {
        Self {
            progress: Some(100),
            result: Some(result),
            ..Self::default()
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

impl Job {
    pub fn new(id: String, kind: JobKind, title: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            kind,
            title,
            status: JobStatus::Pending,
            progress: 0,
            logs: vec![format!("Initializing {}...", kind.as_str())],
            result: None,
            error: None,
            started_at: now,
            updated_at: now,
            estimated_completion: None,
        }
    }

    /// Apply `update` at time `now`.
    ///
    /// Status follows progress: 100 or more completes the job, anything
    /// above zero marks it running. An error fails the job regardless of
    /// progress.
    pub fn apply(&mut self, update: JobUpdate, now: DateTime<Utc>) {
        if let Some(p) = update.progress {
            self.progress = p.min(100);
            if self.progress >= 100 {
                self.status = JobStatus::Completed;
            } else if self.progress > 0 {
                self.status = JobStatus::Running;
            }
        }
        if let Some(log) = update.log {
            self.logs.push(log);
        }
        if update.result.is_some() {
            self.result = update.result;
        }
        if let Some(err) = update.error {
            self.logs.push(format!("Failed: {err}"));
            self.error = Some(err);
            self.status = JobStatus::Failed;
        }
        self.updated_at = now;
        self.estimated_completion = match self.status {
            JobStatus::Running => estimate_completion(self.started_at, self.progress, now),
            _ => None,
        };
    }
}

/// Linear extrapolation of the finish time from progress so far.
fn estimate_completion(
    started_at: DateTime<Utc>,
    progress: u8,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if progress == 0 || progress >= 100 {
        return None;
    }
    let elapsed_ms = (now - started_at).num_milliseconds().max(0);
    let remaining_ms = elapsed_ms * i64::from(100 - progress) / i64::from(progress);
    Some(now + Duration::milliseconds(remaining_ms))
}
