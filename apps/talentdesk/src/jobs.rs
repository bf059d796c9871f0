//! Job CRUD as driven by the admin dashboard.
//!
//! Deleting a job never touches candidates or assessment questions that refer
//! to it; those become orphans and stay readable by job id.

use tracing::info;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::{Job, JobDraft};
use crate::state::DeskState;

pub fn list_jobs(state: &DeskState) -> AppResult<Vec<Job>> {
    state.jobs().list()
}

pub fn find_job(state: &DeskState, job_id: &str) -> AppResult<Option<Job>> {
    state.jobs().find_by_id(job_id)
}

/// Case-insensitive substring match on the title. An empty query matches everything.
pub fn search_jobs(state: &DeskState, query: &str) -> AppResult<Vec<Job>> {
    let needle = query.to_lowercase();
    state
        .jobs()
        .filter(|job| job.title.to_lowercase().contains(&needle))
}

pub fn add_job(state: &DeskState, draft: &JobDraft) -> AppResult<Job> {
    let draft = draft.trimmed();
    if draft.title.is_empty() {
        return Err(AppError::EmptyJobTitle);
    }

    let job = Job::new(Uuid::new_v4().to_string(), draft.title, draft.description);
    state.jobs().insert(job.clone())?;

    info!("Added job {} ({})", job.id, job.title);
    Ok(job)
}

/// Replaces title and description of an existing job.
/// An unknown id is reported as `NotFound` and nothing is written.
pub fn edit_job(state: &DeskState, job_id: &str, draft: &JobDraft) -> AppResult<Job> {
    let draft = draft.trimmed();
    if draft.title.is_empty() {
        return Err(AppError::EmptyJobTitle);
    }

    state.jobs().mutate(|jobs| {
        let job = jobs
            .iter_mut()
            .find(|job| job.id == job_id)
            .ok_or_else(|| AppError::NotFound(format!("job {job_id}")))?;
        job.title = draft.title.clone();
        job.description = draft.description.clone();
        Ok(job.clone())
    })
}

/// Removes the job record only.
pub fn delete_job(state: &DeskState, job_id: &str) -> AppResult<()> {
    let removed = state.jobs().remove(|job| job.id == job_id)?;
    if removed == 0 {
        return Err(AppError::NotFound(format!("job {job_id}")));
    }
    info!("Deleted job {job_id}");
    Ok(())
}
