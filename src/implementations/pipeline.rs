use async_trait::async_trait;
use chrono::Utc;
use log::{ debug, info, warn };

use crate::errors::{ VigilError, VigilResult };
use crate::models::common::{ Phase, PipelineStage, Verdict };
use crate::models::outcome::{ ClassificationResult, ComplianceOutcome, ComplianceRun, Escalation };
use crate::models::requirement::{ NewRequirement, Requirement };
use crate::traits::classifier::Classifier;
use crate::traits::compliance_system::ComplianceSystem;
use crate::traits::escalator::Escalator;
use crate::traits::procedure_extractor::ProcedureExtractor;
use crate::traits::requirement_store::RequirementStore;

/// Conversation compliance pipeline.
///
/// One invocation fetches the checklist, classifies it against the
/// transcript in a single batch, then walks the verdicts in checklist
/// order: satisfied requirements are written back, unrelated ones are
/// skipped, and the first ambiguous one is escalated and ends the walk.
/// Requirements after the ambiguous one are not written in that pass.
///
/// All collaborators are injected so tests can substitute fakes.
pub struct CompliancePipeline<S, C, E, X> {
    store: S,
    classifier: C,
    escalator: E,
    extractor: X,
}

impl<S, C, E, X> CompliancePipeline<S, C, E, X>
    where S: RequirementStore, C: Classifier, E: Escalator, X: ProcedureExtractor
{
    pub fn new(store: S, classifier: C, escalator: E, extractor: X) -> Self {
        Self {
            store,
            classifier,
            escalator,
            extractor,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run the pipeline for one transcript
    pub async fn run(&self, transcript: &str) -> VigilResult<ComplianceOutcome> {
        self.evaluate(transcript).await.map(|(outcome, _)| outcome)
    }

    /// Run the pipeline, also reporting how many requirements were classified
    async fn evaluate(&self, transcript: &str) -> VigilResult<(ComplianceOutcome, usize)> {
        debug!("Pipeline stage: {}", PipelineStage::FetchingRequirements);
        let requirements = self.store.fetch_requirements().await?;
        if requirements.is_empty() {
            info!("No requirements found in database");
            return Ok((ComplianceOutcome::NoRequirements, 0));
        }

        debug!("Pipeline stage: {}", PipelineStage::Classifying);
        let texts: Vec<String> = requirements
            .into_iter()
            .map(|r| r.text)
            .collect();
        let verdicts = self.classifier.classify(&texts, transcript).await?;
        if verdicts.len() != texts.len() {
            return Err(
                VigilError::SystemError(
                    format!(
                        "Classifier returned {} verdicts for {} requirements",
                        verdicts.len(),
                        texts.len()
                    )
                )
            );
        }

        let evaluated = texts.len();
        let results = texts
            .into_iter()
            .zip(verdicts)
            .map(|(requirement, verdict)| ClassificationResult { requirement, verdict });

        debug!("Pipeline stage: {}", PipelineStage::Dispatching);
        let outcome = self.dispatch(results, transcript).await?;
        Ok((outcome, evaluated))
    }

    async fn dispatch(
        &self,
        results: impl Iterator<Item = ClassificationResult>,
        transcript: &str
    ) -> VigilResult<ComplianceOutcome> {
        let mut satisfied = Vec::new();
        let mut unrecorded = Vec::new();

        for result in results {
            debug!(
                "Requirement '{}': {}",
                result.requirement.chars().take(50).collect::<String>(),
                result.verdict
            );

            match result.verdict {
                Verdict::Satisfied => {
                    if !self.store.mark_satisfied(&result.requirement).await? {
                        warn!("Failed to record satisfied requirement: {}", result.requirement);
                        unrecorded.push(result.requirement.clone());
                    }
                    satisfied.push(result.requirement);
                }
                Verdict::Unrelated => {}
                Verdict::Ambiguous => {
                    info!("Requirement needs clarification, escalating");
                    let clarification = self.escalator.escalate(
                        &result.requirement,
                        transcript
                    ).await?;

                    debug!("Pipeline stage: {}", PipelineStage::Escalated);
                    return Ok(
                        ComplianceOutcome::Escalated(Escalation {
                            requirement: result.requirement,
                            clarification,
                            satisfied,
                            unrecorded,
                        })
                    );
                }
            }
        }

        debug!("Pipeline stage: {}", PipelineStage::Done);
        Ok(ComplianceOutcome::Completed { satisfied, unrecorded })
    }
}

#[async_trait]
impl<S, C, E, X> ComplianceSystem
    for CompliancePipeline<S, C, E, X>
    where S: RequirementStore, C: Classifier, E: Escalator, X: ProcedureExtractor
{
    async fn process_transcript(&self, transcript: &str) -> VigilResult<ComplianceRun> {
        if transcript.trim().is_empty() {
            return Err(VigilError::InvalidInput("Conversation text is required".to_string()));
        }

        info!("Processing transcript of {} characters", transcript.len());
        let evaluated_at = Utc::now();
        let (outcome, requirements_evaluated) = self.evaluate(transcript).await?;

        Ok(ComplianceRun {
            outcome,
            requirements_evaluated,
            evaluated_at,
        })
    }

    async fn mark_requirement(&self, requirement_text: &str) -> VigilResult<bool> {
        if requirement_text.trim().is_empty() {
            return Err(VigilError::InvalidInput("Requirement text is required".to_string()));
        }

        match self.store.find_requirement(requirement_text).await? {
            Some(current) => debug!("Current requirement state: {:?}", current),
            None => warn!("No existing requirement found matching: {}", requirement_text),
        }

        self.store.mark_satisfied(requirement_text).await
    }

    async fn list_requirements(&self, phase: Option<Phase>) -> VigilResult<Vec<Requirement>> {
        match phase {
            Some(phase) => self.store.fetch_requirements_by_phase(phase).await,
            None => self.store.fetch_requirements().await,
        }
    }

    async fn extract_procedure(&self, procedure_text: &str) -> VigilResult<Vec<NewRequirement>> {
        if procedure_text.trim().is_empty() {
            return Err(VigilError::InvalidInput("Procedure text is required".to_string()));
        }
        self.extractor.extract_steps(procedure_text).await
    }

    async fn store_requirements(&self, steps: &[NewRequirement]) -> VigilResult<Vec<Requirement>> {
        self.store.insert_requirements(steps).await
    }
}
