pub mod config;
pub mod chat_client;
pub mod classifier;
pub mod escalator;
pub mod procedure_extractor;
pub mod supabase_store;
pub mod pipeline;

use log::info;

use crate::errors::VigilResult;
use chat_client::OpenAIChatClient;
use classifier::LLMClassifier;
use config::ServiceConfig;
use escalator::SearchEscalator;
use pipeline::CompliancePipeline;
use procedure_extractor::LLMProcedureExtractor;
use supabase_store::SupabaseStore;

/// Pipeline wired to the real services
pub type LiveComplianceSystem = CompliancePipeline<
    SupabaseStore,
    LLMClassifier,
    SearchEscalator,
    LLMProcedureExtractor
>;

/// Build every client from configuration and wire them into a pipeline
pub fn build_live_system(config: &ServiceConfig) -> VigilResult<LiveComplianceSystem> {
    let store = SupabaseStore::new(config.store_settings()?)?;
    let classifier = LLMClassifier::new(
        OpenAIChatClient::new(config.classifier_settings()?)?,
        config
    )?;
    let escalator = SearchEscalator::new(OpenAIChatClient::new(config.search_settings()?)?, config)?;
    let extractor = LLMProcedureExtractor::new(
        OpenAIChatClient::new(config.extractor_settings()?)?,
        config
    )?;

    info!("Compliance system initialised");
    Ok(CompliancePipeline::new(store, classifier, escalator, extractor))
}
