//! Form edit sessions: `Idle → Editing(target) → Idle` on save or cancel.
//!
//! A session holds at most one target. Starting a new edit while another is in
//! progress drops the old draft without merging; the dropped draft is handed
//! back so callers can observe it, but nothing is persisted.

use crate::errors::AppResult;
use crate::jobs::{add_job, edit_job};
use crate::models::{AssessmentQuestion, Job, JobDraft, QuestionDraft};
use crate::questions::upsert_question;
use crate::state::DeskState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditState<K, D> {
    Idle,
    Editing { target: K, draft: D },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession<K, D> {
    state: EditState<K, D>,
}

impl<K, D> Default for EditSession<K, D> {
    fn default() -> Self {
        Self {
            state: EditState::Idle,
        }
    }
}

impl<K, D> EditSession<K, D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditState<K, D> {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, EditState::Idle)
    }

    pub fn target(&self) -> Option<&K> {
        match &self.state {
            EditState::Editing { target, .. } => Some(target),
            EditState::Idle => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut D> {
        match &mut self.state {
            EditState::Editing { draft, .. } => Some(draft),
            EditState::Idle => None,
        }
    }

    /// Enters `Editing(target)`. Returns the discarded edit, if one was active.
    pub fn begin(&mut self, target: K, draft: D) -> Option<(K, D)> {
        let previous = std::mem::replace(&mut self.state, EditState::Editing { target, draft });
        match previous {
            EditState::Editing { target, draft } => Some((target, draft)),
            EditState::Idle => None,
        }
    }

    /// Back to `Idle`, returning whatever was being edited.
    pub fn cancel(&mut self) -> Option<(K, D)> {
        match std::mem::replace(&mut self.state, EditState::Idle) {
            EditState::Editing { target, draft } => Some((target, draft)),
            EditState::Idle => None,
        }
    }

    /// Runs `persist` on the active edit. Success returns to `Idle`; a rejection
    /// keeps the session in `Editing` so the user can correct the draft.
    fn save_with<R>(&mut self, persist: impl FnOnce(&K, &D) -> AppResult<R>) -> AppResult<Option<R>> {
        let EditState::Editing { target, draft } = &self.state else {
            return Ok(None);
        };
        let saved = persist(target, draft)?;
        self.state = EditState::Idle;
        Ok(Some(saved))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobTarget {
    New,
    Existing(String),
}

pub type JobEditor = EditSession<JobTarget, JobDraft>;

impl JobEditor {
    pub fn begin_add(&mut self) -> Option<(JobTarget, JobDraft)> {
        self.begin(JobTarget::New, JobDraft::default())
    }

    pub fn begin_edit(&mut self, job: &Job) -> Option<(JobTarget, JobDraft)> {
        self.begin(JobTarget::Existing(job.id.clone()), JobDraft::from(job))
    }

    pub fn save(&mut self, state: &DeskState) -> AppResult<Option<Job>> {
        self.save_with(|target, draft| match target {
            JobTarget::New => add_job(state, draft),
            JobTarget::Existing(id) => edit_job(state, id, draft),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionTarget {
    New,
    Index(usize),
}

pub type QuestionEditor = EditSession<QuestionTarget, QuestionDraft>;

impl QuestionEditor {
    pub fn begin_create(&mut self, draft: QuestionDraft) -> Option<(QuestionTarget, QuestionDraft)> {
        self.begin(QuestionTarget::New, draft)
    }

    pub fn begin_edit(
        &mut self,
        index: usize,
        question: &AssessmentQuestion,
    ) -> Option<(QuestionTarget, QuestionDraft)> {
        self.begin(QuestionTarget::Index(index), QuestionDraft::from(question))
    }

    pub fn save(&mut self, state: &DeskState, job_id: &str) -> AppResult<Option<AssessmentQuestion>> {
        self.save_with(|target, draft| {
            let edit_index = match target {
                QuestionTarget::New => None,
                QuestionTarget::Index(i) => Some(*i),
            };
            upsert_question(state, job_id, draft, edit_index)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;
    use crate::jobs::list_jobs;
    use crate::models::{AnswerKey, AnswerOptions};
    use crate::questions::list_questions;

    fn draft(text: &str) -> QuestionDraft {
        QuestionDraft::new(text, AnswerOptions::new("a", "b", "c", "d"), AnswerKey::D)
    }

    #[test]
    fn test_save_then_idle() {
        let state = DeskState::in_memory();
        let mut editor = JobEditor::new();
        assert!(editor.is_idle());

        editor.begin_add();
        if let Some(d) = editor.draft_mut() {
            d.title = "Data Engineer".into();
        }
        let job = editor.save(&state).unwrap().unwrap();
        assert!(editor.is_idle());
        assert_eq!(list_jobs(&state).unwrap(), vec![job]);
    }

    #[test]
    fn test_cancel_discards_draft() {
        let state = DeskState::in_memory();
        let mut editor = JobEditor::new();
        editor.begin_add();
        editor.draft_mut().unwrap().title = "Never saved".into();
        let (target, dropped) = editor.cancel().unwrap();
        assert_eq!(target, JobTarget::New);
        assert_eq!(dropped.title, "Never saved");
        assert!(editor.is_idle());
        assert!(editor.save(&state).unwrap().is_none());
        assert!(list_jobs(&state).unwrap().is_empty());
    }

    #[test]
    fn test_switching_target_drops_previous_edit() {
        let state = DeskState::in_memory();
        let a = add_job(&state, &JobDraft::new("A", "")).unwrap();
        let b = add_job(&state, &JobDraft::new("B", "")).unwrap();

        let mut editor = JobEditor::new();
        editor.begin_edit(&a);
        editor.draft_mut().unwrap().title = "A changed".into();

        let (dropped_target, dropped_draft) = editor.begin_edit(&b).unwrap();
        assert_eq!(dropped_target, JobTarget::Existing(a.id.clone()));
        assert_eq!(dropped_draft.title, "A changed");
        assert_eq!(editor.target(), Some(&JobTarget::Existing(b.id.clone())));

        editor.draft_mut().unwrap().title = "B changed".into();
        editor.save(&state).unwrap();

        let titles: Vec<_> = list_jobs(&state).unwrap().into_iter().map(|j| j.title).collect();
        assert_eq!(titles, vec!["A", "B changed"]);
    }

    #[test]
    fn test_rejected_save_stays_editing() {
        let state = DeskState::in_memory();
        let mut editor = JobEditor::new();
        editor.begin_add();
        let err = editor.save(&state).unwrap_err();
        assert!(matches!(err, AppError::EmptyJobTitle));
        assert_eq!(editor.target(), Some(&JobTarget::New));
    }

    #[test]
    fn test_question_editor_edit_in_place() {
        let state = DeskState::in_memory();
        let mut editor = QuestionEditor::new();
        editor.begin_create(draft("Q1"));
        editor.save(&state, "j1").unwrap();
        editor.begin_create(draft("Q2"));
        editor.save(&state, "j1").unwrap();

        let questions = list_questions(&state, "j1").unwrap();
        editor.begin_edit(0, &questions[0]);
        editor.draft_mut().unwrap().question = "Q2".into();
        assert!(matches!(
            editor.save(&state, "j1").unwrap_err(),
            AppError::DuplicateQuestion
        ));

        editor.draft_mut().unwrap().question = "Q1 (revised)".into();
        let saved = editor.save(&state, "j1").unwrap().unwrap();
        assert_eq!(saved.id, questions[0].id);
        assert!(editor.is_idle());
    }
}
