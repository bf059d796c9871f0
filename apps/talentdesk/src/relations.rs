//! Job–candidate relationship: applications, status tracking and the
//! aggregate views the dashboard charts are built from.
//!
//! `Candidate::job_id` is a soft reference. It is checked once when an
//! application is submitted and never again; candidates of a deleted job stay
//! in the collection and are still returned by [`candidates_for_job`].

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::{Application, Candidate, CandidateStatus};
use crate::state::DeskState;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobTotal {
    pub job_id: String,
    pub title: String,
    pub candidates: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_jobs: usize,
    pub total_candidates: usize,
    /// Candidates whose job no longer exists.
    pub orphaned_candidates: usize,
}

pub fn candidates_for_job(state: &DeskState, job_id: &str) -> AppResult<Vec<Candidate>> {
    state.candidates().filter(|c| c.job_id == job_id)
}

pub fn find_candidate(state: &DeskState, candidate_id: &str) -> AppResult<Option<Candidate>> {
    state.candidates().find_by_id(candidate_id)
}

/// Candidate count for every job, in one pass over the candidate collection.
/// Jobs without candidates map to zero; candidates of unknown jobs are ignored.
pub fn job_totals(state: &DeskState) -> AppResult<HashMap<String, usize>> {
    let mut totals: HashMap<String, usize> = state
        .jobs()
        .list()?
        .into_iter()
        .map(|job| (job.id, 0))
        .collect();

    for candidate in state.candidates().list()? {
        if let Some(count) = totals.get_mut(&candidate.job_id) {
            *count += 1;
        }
    }
    Ok(totals)
}

/// Per-job rows in job order, labelled with the job title.
pub fn chart_data(state: &DeskState) -> AppResult<Vec<JobTotal>> {
    let totals = job_totals(state)?;
    Ok(state
        .jobs()
        .list()?
        .into_iter()
        .map(|job| JobTotal {
            candidates: totals.get(&job.id).copied().unwrap_or(0),
            job_id: job.id,
            title: job.title,
        })
        .collect())
}

/// Count per status, every status present. `job_id` restricts to one job.
pub fn status_histogram(
    state: &DeskState,
    job_id: Option<&str>,
) -> AppResult<BTreeMap<CandidateStatus, usize>> {
    let mut histogram: BTreeMap<CandidateStatus, usize> =
        CandidateStatus::ALL.into_iter().map(|s| (s, 0)).collect();

    let candidates = state.candidates().list()?;
    for candidate in candidates
        .iter()
        .filter(|c| job_id.map_or(true, |id| c.job_id == id))
    {
        *histogram.entry(candidate.status).or_insert(0) += 1;
    }
    Ok(histogram)
}

pub fn dashboard_summary(state: &DeskState) -> AppResult<DashboardSummary> {
    let jobs = state.jobs().list()?;
    let candidates = state.candidates().list()?;
    let job_ids: HashSet<&str> = jobs.iter().map(|j| j.id.as_str()).collect();
    let orphaned_candidates = candidates
        .iter()
        .filter(|c| !job_ids.contains(c.job_id.as_str()))
        .count();

    Ok(DashboardSummary {
        total_jobs: jobs.len(),
        total_candidates: candidates.len(),
        orphaned_candidates,
    })
}

/// Public application flow: one new candidate per submission.
pub fn submit_application(
    state: &DeskState,
    job_id: &str,
    application: &Application,
) -> AppResult<Candidate> {
    if state.jobs().find_by_id(job_id)?.is_none() {
        return Err(AppError::NotFound(format!("job {job_id}")));
    }

    let candidate = Candidate {
        id: Uuid::new_v4().to_string(),
        job_id: job_id.to_string(),
        name: application.name.trim().to_string(),
        email: application.email.trim().to_string(),
        resume: application.resume.clone(),
        application_date: Local::now().format("%Y-%m-%d").to_string(),
        status: CandidateStatus::UnderReview,
    };
    state.candidates().insert(candidate.clone())?;

    info!("Candidate {} applied to job {job_id}", candidate.id);
    Ok(candidate)
}

/// Updates one candidate's status, wherever it sits in the collection.
/// An unknown id leaves the collection untouched and reports `NotFound`.
pub fn set_candidate_status(
    state: &DeskState,
    candidate_id: &str,
    status: CandidateStatus,
) -> AppResult<Candidate> {
    let updated = state.candidates().mutate(|candidates| {
        Ok(candidates
            .iter_mut()
            .find(|c| !c.id.is_empty() && c.id == candidate_id)
            .map(|c| {
                c.status = status;
                c.clone()
            }))
    })?;

    match updated {
        Some(candidate) => {
            debug!("Candidate {candidate_id} status -> {status}");
            Ok(candidate)
        }
        None => Err(AppError::NotFound(format!("candidate {candidate_id}"))),
    }
}
