use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::store::repository::Record;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Fields written by other clients (the dashboard stores a blank `jobId`).
    /// Kept as-is so rewriting a job never drops them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Job {
    pub fn new(id: impl Into<String>, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            extra: Map::new(),
        }
    }
}

impl Record for Job {
    fn id(&self) -> &str {
        &self.id
    }
}

/// User-supplied fields for "Add Job" and "Edit Job".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

impl JobDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn trimmed(&self) -> Self {
        Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
        }
    }
}

impl From<&Job> for JobDraft {
    fn from(job: &Job) -> Self {
        Self {
            title: job.title.clone(),
            description: job.description.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_fields_survive_a_rewrite() {
        let raw = r#"{"id":"j1","title":"Engineer","description":"","jobId":""}"#;
        let job: Job = serde_json::from_str(raw).unwrap();
        assert_eq!(job.extra.get("jobId"), Some(&json!("")));
        assert_eq!(serde_json::to_string(&job).unwrap(), raw);
    }

    #[test]
    fn test_new_job_has_no_extra_fields() {
        let job = Job::new("j1", "Engineer", "Builds things");
        assert_eq!(
            serde_json::to_value(&job).unwrap(),
            json!({"id": "j1", "title": "Engineer", "description": "Builds things"})
        );
    }
}
