use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine;
use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::store::repository::Record;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum CandidateStatus {
    #[default]
    #[serde(rename = "Under Review")]
    UnderReview,
    #[serde(rename = "Selected")]
    Selected,
    #[serde(rename = "Rejected")]
    Rejected,
    #[serde(rename = "Interview Scheduled")]
    InterviewScheduled,
    #[serde(rename = "Offer Made")]
    OfferMade,
}

impl CandidateStatus {
    /// Display order used by the status pickers.
    pub const ALL: [CandidateStatus; 5] = [
        CandidateStatus::UnderReview,
        CandidateStatus::Selected,
        CandidateStatus::Rejected,
        CandidateStatus::InterviewScheduled,
        CandidateStatus::OfferMade,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CandidateStatus::UnderReview => "Under Review",
            CandidateStatus::Selected => "Selected",
            CandidateStatus::Rejected => "Rejected",
            CandidateStatus::InterviewScheduled => "Interview Scheduled",
            CandidateStatus::OfferMade => "Offer Made",
        }
    }
}

impl fmt::Display for CandidateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CandidateStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        CandidateStatus::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown candidate status '{s}'"))
    }
}

/// A resume is either an uploaded file kept inline as a data URL, or a link/path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resume {
    File { mime: String, data: Bytes },
    Link(String),
}

impl Resume {
    pub fn file(mime: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Resume::File {
            mime: mime.into(),
            data: data.into(),
        }
    }

    pub fn to_data_url(&self) -> String {
        match self {
            Resume::File { mime, data } => format!("data:{mime};base64,{}", B64.encode(data)),
            Resume::Link(link) => link.clone(),
        }
    }

    /// Parses `data:<mime>;base64,<payload>`; anything else is kept as a link.
    pub fn parse(raw: &str) -> Self {
        if let Some(rest) = raw.strip_prefix("data:") {
            if let Some((mime, payload)) = rest.split_once(";base64,") {
                if let Ok(decoded) = B64.decode(payload) {
                    return Resume::File {
                        mime: mime.to_string(),
                        data: Bytes::from(decoded),
                    };
                }
            }
        }
        Resume::Link(raw.to_string())
    }
}

impl Serialize for Resume {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_data_url())
    }
}

impl<'de> Deserialize<'de> for Resume {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Resume::parse(&raw))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Empty for records written by the legacy application form, which never assigned one.
    #[serde(default)]
    pub id: String,
    /// Soft reference to a [`Job`](crate::models::job::Job); may dangle after the job is deleted.
    pub job_id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub resume: Option<Resume>,
    pub application_date: String,
    #[serde(default)]
    pub status: CandidateStatus,
}

impl Record for Candidate {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Submission from the public application form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Application {
    pub name: String,
    pub email: String,
    pub resume: Option<Resume>,
}
