//! In-memory collaborators for exercising the pipeline without network access.

use std::collections::VecDeque;
use std::sync::{ Arc, Mutex };
use async_trait::async_trait;

use crate::errors::{ VigilError, VigilResult };
use crate::models::common::{ Phase, Verdict };
use crate::models::requirement::{ sort_requirements, NewRequirement, Requirement };
use crate::traits::chat_service::{ ChatPrompt, ChatService };
use crate::traits::classifier::Classifier;
use crate::traits::escalator::Escalator;
use crate::traits::procedure_extractor::ProcedureExtractor;
use crate::traits::requirement_store::{ RequirementSource, RequirementStore, StatusWriter };

pub fn requirement(text: &str, phase: Phase, order: i32) -> Requirement {
    Requirement {
        id: None,
        text: text.to_string(),
        phase,
        order,
        completion_status: false,
    }
}

/// Requirement table held in memory. Clones share the same rows.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    rows: Arc<Mutex<Vec<Requirement>>>,
    writes: Arc<Mutex<Vec<String>>>,
    ignored: Arc<Mutex<Vec<String>>>,
    fail_fetch: bool,
}

impl InMemoryStore {
    pub fn with_requirements(rows: Vec<Requirement>) -> Self {
        Self {
            rows: Arc::new(Mutex::new(rows)),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_fetch: true,
            ..Self::default()
        }
    }

    /// Writes for this text report zero matched rows even though the text is stored
    pub fn ignore_writes_for(self, text: &str) -> Self {
        self.ignored.lock().unwrap().push(text.to_string());
        self
    }

    /// Every text passed to `mark_satisfied`, in call order
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }

    pub fn is_satisfied(&self, text: &str) -> bool {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .any(|r| r.text == text && r.completion_status)
    }

    pub fn rows(&self) -> Vec<Requirement> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl RequirementSource for InMemoryStore {
    async fn fetch_requirements(&self) -> VigilResult<Vec<Requirement>> {
        if self.fail_fetch {
            return Err(VigilError::Upstream {
                service: "supabase".to_string(),
                status: Some(503),
                message: "service unavailable".to_string(),
            });
        }
        let mut rows = self.rows();
        sort_requirements(&mut rows);
        Ok(rows)
    }

    async fn fetch_requirements_by_phase(&self, phase: Phase) -> VigilResult<Vec<Requirement>> {
        let rows = self.fetch_requirements().await?;
        Ok(
            rows
                .into_iter()
                .filter(|r| r.phase == phase)
                .collect()
        )
    }

    async fn find_requirement(&self, text: &str) -> VigilResult<Option<Requirement>> {
        Ok(
            self
                .rows()
                .into_iter()
                .find(|r| r.text == text)
        )
    }
}

#[async_trait]
impl StatusWriter for InMemoryStore {
    async fn mark_satisfied(&self, requirement_text: &str) -> VigilResult<bool> {
        self.writes.lock().unwrap().push(requirement_text.to_string());
        if self.ignored.lock().unwrap().iter().any(|t| t == requirement_text) {
            return Ok(false);
        }

        let mut matched = false;
        for row in self.rows.lock().unwrap().iter_mut() {
            if row.text == requirement_text {
                row.completion_status = true;
                matched = true;
            }
        }
        Ok(matched)
    }
}

#[async_trait]
impl RequirementStore for InMemoryStore {
    async fn insert_requirements(
        &self,
        requirements: &[NewRequirement]
    ) -> VigilResult<Vec<Requirement>> {
        let mut rows = self.rows.lock().unwrap();
        let mut inserted = Vec::with_capacity(requirements.len());
        for new in requirements {
            let stored = Requirement {
                id: Some((rows.len() as i64) + 1),
                text: new.text.clone(),
                phase: new.phase,
                order: new.order,
                completion_status: false,
            };
            rows.push(stored.clone());
            inserted.push(stored);
        }
        Ok(inserted)
    }
}

/// Returns a fixed verdict list, or fails every call
#[derive(Clone, Default)]
pub struct ScriptedClassifier {
    verdicts: Vec<Verdict>,
    fail: bool,
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl ScriptedClassifier {
    pub fn returning(verdicts: Vec<Verdict>) -> Self {
        Self {
            verdicts,
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Requirement batches received, one entry per call
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Classifier for ScriptedClassifier {
    async fn classify(&self, requirements: &[String], _transcript: &str) -> VigilResult<Vec<Verdict>> {
        self.calls.lock().unwrap().push(requirements.to_vec());
        if self.fail {
            return Err(VigilError::Upstream {
                service: "classifier".to_string(),
                status: Some(401),
                message: "invalid api key".to_string(),
            });
        }
        Ok(self.verdicts.clone())
    }
}

/// Returns a fixed clarification and records the requirements it was asked about
#[derive(Clone)]
pub struct ScriptedEscalator {
    answer: Option<String>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl ScriptedEscalator {
    pub fn answering(answer: &str) -> Self {
        Self {
            answer: Some(answer.to_string()),
            calls: Arc::default(),
        }
    }

    pub fn failing() -> Self {
        Self {
            answer: None,
            calls: Arc::default(),
        }
    }

    /// (requirement, transcript) pairs, one per call
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Escalator for ScriptedEscalator {
    async fn escalate(&self, requirement_text: &str, transcript: &str) -> VigilResult<String> {
        self.calls
            .lock()
            .unwrap()
            .push((requirement_text.to_string(), transcript.to_string()));
        self.answer.clone().ok_or_else(|| VigilError::upstream("search", "connection reset"))
    }
}

/// Returns a fixed step list
#[derive(Clone, Default)]
pub struct ScriptedExtractor {
    steps: Vec<NewRequirement>,
    calls: Arc<Mutex<usize>>,
}

impl ScriptedExtractor {
    pub fn returning(steps: Vec<NewRequirement>) -> Self {
        Self {
            steps,
            calls: Arc::default(),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl ProcedureExtractor for ScriptedExtractor {
    async fn extract_steps(&self, _procedure_text: &str) -> VigilResult<Vec<NewRequirement>> {
        *self.calls.lock().unwrap() += 1;
        Ok(self.steps.clone())
    }
}

/// Chat backend that replays queued replies and records every prompt
#[derive(Clone, Default)]
pub struct ScriptedChat {
    replies: Arc<Mutex<VecDeque<VigilResult<String>>>>,
    prompts: Arc<Mutex<Vec<ChatPrompt>>>,
}

impl ScriptedChat {
    pub fn replying(reply: &str) -> Self {
        let chat = Self::default();
        chat.replies.lock().unwrap().push_back(Ok(reply.to_string()));
        chat
    }

    pub fn failing_with(err: VigilError) -> Self {
        let chat = Self::default();
        chat.replies.lock().unwrap().push_back(Err(err));
        chat
    }

    pub fn prompts(&self) -> Vec<ChatPrompt> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatService for ScriptedChat {
    fn service_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, prompt: &ChatPrompt) -> VigilResult<String> {
        self.prompts.lock().unwrap().push(prompt.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(VigilError::upstream("scripted", "no reply queued")))
    }
}
