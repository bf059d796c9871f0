pub mod coordinator;
pub mod repository;

pub use coordinator::Coordinator;
pub use repository::{Record, Repository};

/// Key holding the JSON array of jobs.
pub const JOBS_KEY: &str = "jobsData";
/// Key holding the JSON array of all candidates, across every job.
pub const CANDIDATES_KEY: &str = "candidatesData";

/// Key holding one job's ordered question list.
pub fn questions_key(job_id: &str) -> String {
    format!("job_{job_id}_questions")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_questions_key_layout() {
        assert_eq!(questions_key("1700000000000"), "job_1700000000000_questions");
    }
}
