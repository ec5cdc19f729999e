use async_trait::async_trait;
use log::{ debug, info, warn };
use reqwest::{ Method, RequestBuilder, Response };

use crate::errors::{ VigilError, VigilResult };
use crate::implementations::config::StoreSettings;
use crate::models::common::Phase;
use crate::models::requirement::{ sort_requirements, NewRequirement, Requirement };
use crate::traits::requirement_store::{ RequirementSource, RequirementStore, StatusWriter };

const SERVICE: &str = "supabase";

/// Requirement table served by Supabase's PostgREST API.
///
/// Every call goes straight to the database; nothing is cached between
/// calls, so concurrent pipelines always see the stored state.
#[derive(Clone)]
pub struct SupabaseStore {
    settings: StoreSettings,
    http_client: reqwest::Client,
}

impl SupabaseStore {
    pub fn new(settings: StoreSettings) -> VigilResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| VigilError::SystemError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { settings, http_client })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.settings.url, self.settings.table)
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.http_client
            .request(method, self.table_url())
            .header("apikey", &self.settings.service_key)
            .bearer_auth(&self.settings.service_key)
    }

    async fn send(&self, request: RequestBuilder) -> VigilResult<Response> {
        let response = request.send().await.map_err(|e| {
            let error_msg = format!("Network error when calling Supabase: {}", e);
            warn!("{}", error_msg);
            VigilError::upstream(SERVICE, error_msg)
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response
                .text().await
                .unwrap_or_else(|_| "Failed to get error message".to_string());

            warn!("Supabase error: HTTP {} - {}", status, error_text);
            return Err(VigilError::Upstream {
                service: SERVICE.to_string(),
                status: Some(status),
                message: error_text,
            });
        }

        Ok(response)
    }

    async fn rows(&self, request: RequestBuilder) -> VigilResult<Vec<Requirement>> {
        let response = self.send(request).await?;
        let body = response
            .text().await
            .map_err(|e| VigilError::upstream(SERVICE, e.to_string()))?;
        decode_rows(&body)
    }
}

/// PostgREST equality filter value
fn eq_filter(value: &str) -> String {
    format!("eq.{}", value)
}

fn all_requirements_query() -> Vec<(&'static str, String)> {
    vec![("select", "*".to_string()), ("order", "phase.asc,order.asc".to_string())]
}

fn phase_query(phase: Phase) -> Vec<(&'static str, String)> {
    vec![
        ("select", "*".to_string()),
        ("phase", eq_filter(phase.as_str())),
        ("order", "order.asc".to_string())
    ]
}

fn text_query(text: &str) -> Vec<(&'static str, String)> {
    vec![("requirement", eq_filter(text))]
}

fn decode_rows(body: &str) -> VigilResult<Vec<Requirement>> {
    serde_json::from_str(body).map_err(|e| VigilError::MalformedRecord(e.to_string()))
}

#[async_trait]
impl RequirementSource for SupabaseStore {
    async fn fetch_requirements(&self) -> VigilResult<Vec<Requirement>> {
        debug!("Fetching all requirements from {}", self.settings.table);
        let mut requirements = self.rows(
            self.request(Method::GET).query(&all_requirements_query())
        ).await?;

        // The table stores phase as text, which sorts alphabetically
        sort_requirements(&mut requirements);
        info!("Fetched {} requirements", requirements.len());
        Ok(requirements)
    }

    async fn fetch_requirements_by_phase(&self, phase: Phase) -> VigilResult<Vec<Requirement>> {
        debug!("Fetching {} requirements from {}", phase, self.settings.table);
        let mut requirements = self.rows(self.request(Method::GET).query(&phase_query(phase))).await?;
        sort_requirements(&mut requirements);
        Ok(requirements)
    }

    async fn find_requirement(&self, text: &str) -> VigilResult<Option<Requirement>> {
        let mut query = text_query(text);
        query.push(("select", "*".to_string()));
        query.push(("limit", "1".to_string()));

        let requirements = self.rows(self.request(Method::GET).query(&query)).await?;
        Ok(requirements.into_iter().next())
    }
}

#[async_trait]
impl StatusWriter for SupabaseStore {
    async fn mark_satisfied(&self, requirement_text: &str) -> VigilResult<bool> {
        info!(
            "Updating completion status for: {}",
            requirement_text.chars().take(100).collect::<String>()
        );

        let updated = self.rows(
            self.request(Method::PATCH)
                .query(&text_query(requirement_text))
                .header("Prefer", "return=representation")
                .json(&serde_json::json!({ "completion_status": true }))
        ).await?;

        if updated.is_empty() {
            warn!(
                "No matching requirement found for: {}",
                requirement_text.chars().take(100).collect::<String>()
            );
            return Ok(false);
        }

        debug!("Updated {} row(s)", updated.len());
        Ok(true)
    }
}

#[async_trait]
impl RequirementStore for SupabaseStore {
    async fn insert_requirements(
        &self,
        requirements: &[NewRequirement]
    ) -> VigilResult<Vec<Requirement>> {
        if requirements.is_empty() {
            return Ok(Vec::new());
        }

        info!("Inserting {} requirements into {}", requirements.len(), self.settings.table);
        let mut inserted = self.rows(
            self.request(Method::POST).header("Prefer", "return=representation").json(requirements)
        ).await?;
        sort_requirements(&mut inserted);
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SupabaseStore {
        SupabaseStore::new(StoreSettings {
            url: "https://project.supabase.co".to_string(),
            service_key: "service-key".to_string(),
            table: "compliance_requirements".to_string(),
            timeout: None,
        }).unwrap()
    }

    #[test]
    fn table_url_points_at_rest_endpoint() {
        assert_eq!(store().table_url(), "https://project.supabase.co/rest/v1/compliance_requirements");
    }

    #[test]
    fn text_filter_keeps_requirement_verbatim() {
        let query = text_query("Has the patient stated their name?");
        assert_eq!(query, vec![("requirement", "eq.Has the patient stated their name?".to_string())]);
    }

    #[test]
    fn phase_query_filters_and_orders() {
        let query = phase_query(Phase::IntraOp);
        assert!(query.contains(&("phase", "eq.intra-op".to_string())));
        assert!(query.contains(&("order", "order.asc".to_string())));
    }

    #[test]
    fn empty_update_representation_decodes_to_no_rows() {
        assert!(decode_rows("[]").unwrap().is_empty());
    }

    #[test]
    fn bad_rows_are_malformed_records() {
        let result = decode_rows(r#"[{"requirement": "x", "phase": "icu", "order": 1}]"#);
        assert!(matches!(result, Err(VigilError::MalformedRecord(_))));
    }
}
