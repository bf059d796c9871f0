//! Per-job assessment questions.
//!
//! Each job owns an ordered list stored under `job_{id}_questions`. Question
//! text is unique within a job (exact, case-sensitive, after trimming).
//! Index-addressed operations mirror the editor; id-addressed ones stay valid
//! when the list shifts underneath a buffered reference.

use tracing::{debug, info};

use crate::errors::{AppError, AppResult};
use crate::models::assessment::new_question_id;
use crate::models::{AssessmentQuestion, QuestionDraft};
use crate::state::DeskState;

/// A delete the user asked for but has not yet confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub index: usize,
    pub question_id: String,
}

/// Gives every id-less question a fresh id. Returns how many were assigned.
fn assign_missing_ids(questions: &mut [AssessmentQuestion]) -> usize {
    let mut assigned = 0;
    for q in questions.iter_mut().filter(|q| q.id.is_empty()) {
        q.id = new_question_id();
        assigned += 1;
    }
    assigned
}

/// Lists the job's questions. Questions stored without an id get one here and
/// the list is written back before any id is returned, so ids handed out stay
/// valid across reads.
pub fn list_questions(state: &DeskState, job_id: &str) -> AppResult<Vec<AssessmentQuestion>> {
    state.questions(job_id).mutate(|questions| {
        let assigned = assign_missing_ids(questions);
        if assigned > 0 {
            info!("Assigned ids to {assigned} legacy questions for job {job_id}");
        }
        Ok(questions.clone())
    })
}

/// Checks a trimmed draft against `questions`, ignoring position `editing`.
fn validate(
    questions: &[AssessmentQuestion],
    draft: &QuestionDraft,
    editing: Option<usize>,
) -> AppResult<()> {
    if draft.question.is_empty() {
        return Err(AppError::EmptyQuestion);
    }
    let duplicate = questions
        .iter()
        .enumerate()
        .any(|(i, q)| Some(i) != editing && q.question == draft.question);
    if duplicate {
        return Err(AppError::DuplicateQuestion);
    }
    Ok(())
}

/// Replaces the question at `edit_index` when it is in range, otherwise appends.
/// Returns the stored question.
pub fn upsert_question(
    state: &DeskState,
    job_id: &str,
    draft: &QuestionDraft,
    edit_index: Option<usize>,
) -> AppResult<AssessmentQuestion> {
    let draft = draft.trimmed();

    state.questions(job_id).mutate(|questions| {
        assign_missing_ids(questions);
        let editing = edit_index.filter(|&i| i < questions.len());
        validate(questions, &draft, editing)?;

        match editing {
            Some(i) => {
                let id = std::mem::take(&mut questions[i].id);
                questions[i] = draft.clone().into_question(id);
                debug!("Replaced question {i} for job {job_id}");
                Ok(questions[i].clone())
            }
            None => {
                let question = draft.clone().into_question(new_question_id());
                questions.push(question.clone());
                debug!("Appended question {} for job {job_id}", questions.len() - 1);
                Ok(question)
            }
        }
    })
}

/// Replaces the question with `question_id`, wherever it currently sits.
pub fn update_question(
    state: &DeskState,
    job_id: &str,
    question_id: &str,
    draft: &QuestionDraft,
) -> AppResult<AssessmentQuestion> {
    let draft = draft.trimmed();

    state.questions(job_id).mutate(|questions| {
        assign_missing_ids(questions);
        let index = questions
            .iter()
            .position(|q| q.id == question_id)
            .ok_or_else(|| AppError::NotFound(format!("question {question_id}")))?;
        validate(questions, &draft, Some(index))?;
        questions[index] = draft.clone().into_question(question_id.to_string());
        Ok(questions[index].clone())
    })
}

/// Removes the question at `index`. Out-of-range is a no-op returning `None`
/// and leaves the stored bytes untouched.
pub fn delete_question_at(
    state: &DeskState,
    job_id: &str,
    index: usize,
) -> AppResult<Option<AssessmentQuestion>> {
    state.questions(job_id).mutate(|questions| {
        if index >= questions.len() {
            debug!("Delete at {index} ignored for job {job_id}: only {} questions", questions.len());
            return Ok(None);
        }
        Ok(Some(questions.remove(index)))
    })
}

/// Removes the question with `question_id`. Missing id is a no-op returning `None`.
pub fn delete_question(
    state: &DeskState,
    job_id: &str,
    question_id: &str,
) -> AppResult<Option<AssessmentQuestion>> {
    state.questions(job_id).mutate(|questions| {
        assign_missing_ids(questions);
        let index = questions.iter().position(|q| q.id == question_id);
        Ok(index.map(|i| questions.remove(i)))
    })
}

/// Captures the question currently at `index` for a later [`confirm_delete`].
pub fn request_delete(
    state: &DeskState,
    job_id: &str,
    index: usize,
) -> AppResult<Option<PendingDelete>> {
    Ok(list_questions(state, job_id)?
        .get(index)
        .map(|q| PendingDelete {
            index,
            question_id: q.id.clone(),
        }))
}

/// Executes a buffered delete. The buffered index is trusted only while it
/// still points at the same question; otherwise the question is located by id,
/// and if it is gone the call is a no-op.
pub fn confirm_delete(
    state: &DeskState,
    job_id: &str,
    pending: &PendingDelete,
) -> AppResult<Option<AssessmentQuestion>> {
    state.questions(job_id).mutate(|questions| {
        assign_missing_ids(questions);
        let index = match questions.get(pending.index) {
            Some(q) if q.id == pending.question_id => Some(pending.index),
            _ => questions.iter().position(|q| q.id == pending.question_id),
        };
        Ok(index.map(|i| questions.remove(i)))
    })
}

/// Drops every question for the job.
pub fn clear_questions(state: &DeskState, job_id: &str) -> AppResult<()> {
    state.questions(job_id).clear()?;
    info!("Cleared assessment questions for job {job_id}");
    Ok(())
}
