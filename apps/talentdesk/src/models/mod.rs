pub mod assessment;
pub mod candidate;
pub mod job;

pub use assessment::{AnswerKey, AnswerOptions, AssessmentQuestion, QuestionDraft};
pub use candidate::{Application, Candidate, CandidateStatus, Resume};
pub use job::{Job, JobDraft};
