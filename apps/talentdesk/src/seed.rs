use tracing::info;

use crate::errors::AppResult;
use crate::models::{Candidate, CandidateStatus, Resume};
use crate::state::DeskState;
use crate::store::CANDIDATES_KEY;

fn sample(
    id: &str,
    job_id: &str,
    name: &str,
    email: &str,
    resume: &str,
    date: &str,
    status: CandidateStatus,
) -> Candidate {
    Candidate {
        id: id.to_string(),
        job_id: job_id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        resume: Some(Resume::Link(resume.to_string())),
        application_date: date.to_string(),
        status,
    }
}

/// Writes three demo candidates bound to `job_id`, but only when the candidate
/// collection has never been written. Returns whether anything was seeded.
pub fn seed_sample_candidates(state: &DeskState, job_id: &str) -> AppResult<bool> {
    let seeded = state.coordinator.init_if_absent(CANDIDATES_KEY, || {
        vec![
            sample(
                "1",
                job_id,
                "Alice Johnson",
                "alice.johnson@example.com",
                "https://example.com/resumes/alice_johnson.pdf",
                "2024-01-10",
                CandidateStatus::UnderReview,
            ),
            sample(
                "2",
                job_id,
                "Bob Smith",
                "bob.smith@example.com",
                "/path/to/bob_smith_resume.pdf",
                "2024-01-12",
                CandidateStatus::Selected,
            ),
            sample(
                "3",
                job_id,
                "Charlie Brown",
                "charlie.brown@example.com",
                "/path/to/charlie_brown_resume.pdf",
                "2024-01-15",
                CandidateStatus::Rejected,
            ),
        ]
    })?;

    if seeded {
        info!("Seeded sample candidates for job {job_id}");
    }
    Ok(seeded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relations::candidates_for_job;

    #[test]
    fn test_seeds_only_into_absent_collection() {
        let state = DeskState::in_memory();
        assert!(seed_sample_candidates(&state, "j1").unwrap());
        assert_eq!(candidates_for_job(&state, "j1").unwrap().len(), 3);

        assert!(!seed_sample_candidates(&state, "j2").unwrap());
        assert!(candidates_for_job(&state, "j2").unwrap().is_empty());
    }

    #[test]
    fn test_empty_but_present_collection_is_not_seeded() {
        let state = DeskState::in_memory();
        state
            .kv()
            .set_collection::<Candidate>(CANDIDATES_KEY, &[])
            .unwrap();
        assert!(!seed_sample_candidates(&state, "j1").unwrap());
    }

    #[test]
    fn test_concurrent_seeders_write_once() {
        let state = DeskState::in_memory();
        let handles: Vec<_> = ["j1", "j2", "j3"]
            .into_iter()
            .map(|job_id| {
                let state = state.clone();
                std::thread::spawn(move || seed_sample_candidates(&state, job_id).unwrap())
            })
            .collect();
        let seeded = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&s| s)
            .count();
        assert_eq!(seeded, 1);
        assert_eq!(state.candidates().list().unwrap().len(), 3);
    }
}
