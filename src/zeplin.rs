//! Thin client for the read-only parts of the Zeplin REST API.
//!
//! Only the three endpoints the assistant's tools need are wrapped: project
//! lookup, screen listing and the latest version of a screen (which carries
//! the layer tree).

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error, instrument, warn};

use crate::config::AppConfig;
use crate::error::ZeplinError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub id: String,
    pub name: String,
    // Everything else Zeplin sends is passed through to the model untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Screen {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScreenVersion {
    pub id: String,
    #[serde(default)]
    pub layers: Vec<Layer>,
}

/// One node of a screen's layer tree. Text layers carry `content`; groups
/// carry child `layers`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Layer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layers: Option<Vec<Layer>>,
}

/// Query parameters for a single page of `GET /projects/{id}/screens`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScreenPage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

#[derive(Clone)]
pub struct ZeplinClient {
    http: Client,
    base_url: String,
    access_token: String,
}

impl ZeplinClient {
    pub fn new(base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.zeplin_api_base, &config.zeplin_api_key)
    }

    #[instrument(skip(self))]
    pub async fn get_project(&self, project_id: &str) -> Result<Project, ZeplinError> {
        self.get_json(&format!("/projects/{}", project_id), None)
            .await
    }

    #[instrument(skip(self))]
    pub async fn list_project_screens(
        &self,
        project_id: &str,
        page: &ScreenPage,
    ) -> Result<Vec<Screen>, ZeplinError> {
        self.get_json(&format!("/projects/{}/screens", project_id), Some(page))
            .await
    }

    #[instrument(skip(self))]
    pub async fn get_latest_screen_version(
        &self,
        project_id: &str,
        screen_id: &str,
    ) -> Result<ScreenVersion, ZeplinError> {
        self.get_json(
            &format!("/projects/{}/screens/{}/versions/latest", project_id, screen_id),
            None,
        )
        .await
    }

    /// Pages through every screen of a project, `page_size` at a time, stopping
    /// at the first short page or after `max_pages` pages. A full last page is
    /// followed by a one-screen request to tell an exact fit from truncation.
    #[instrument(skip(self))]
    pub async fn list_all_screens(
        &self,
        project_id: &str,
        page_size: u32,
        max_pages: u32,
    ) -> Result<Vec<Screen>, ZeplinError> {
        let page_size = page_size.max(1);
        let mut screens = Vec::new();

        for page_index in 0..max_pages {
            let page = ScreenPage {
                offset: Some(page_index * page_size),
                limit: Some(page_size),
                sort: None,
            };
            let batch = self.list_project_screens(project_id, &page).await?;
            let fetched = batch.len();
            screens.extend(batch);

            if fetched < page_size as usize {
                return Ok(screens);
            }
        }

        let next = ScreenPage {
            offset: Some(max_pages * page_size),
            limit: Some(1),
            sort: None,
        };
        if !self.list_project_screens(project_id, &next).await?.is_empty() {
            warn!(
                project_id,
                max_pages,
                collected = screens.len(),
                "Stopped listing screens at the page cap; later screens are not included"
            );
        }
        Ok(screens)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Option<&ScreenPage>,
    ) -> Result<T, ZeplinError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, ?query, "Sending Zeplin request");

        let mut request = self.http.get(&url).bearer_auth(&self.access_token);
        if let Some(query) = query {
            request = request.query(query);
        }
        let response = request.send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            error!(%status, %url, "Zeplin API request failed");
            return Err(ZeplinError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn project_keeps_unknown_fields() {
        let raw = json!({
            "id": "65ddec7fe6d474b19d2bc5f1",
            "name": "Checkout",
            "platform": "web",
            "number_of_screens": 12
        });
        let project: Project = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(project.name, "Checkout");
        assert_eq!(serde_json::to_value(&project).unwrap(), raw);
    }

    #[test]
    fn layer_tree_decodes_without_optional_fields() {
        let version: ScreenVersion = serde_json::from_value(json!({
            "id": "v1",
            "layers": [
                { "type": "text", "content": "Sign in" },
                { "type": "group", "layers": [ { "type": "shape" } ] }
            ]
        }))
        .unwrap();

        assert_eq!(version.layers.len(), 2);
        assert_eq!(version.layers[0].content.as_deref(), Some("Sign in"));
        assert_eq!(version.layers[1].layers.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn empty_screen_page_has_no_query_fields() {
        let page = ScreenPage::default();
        assert_eq!(serde_json::to_value(&page).unwrap(), json!({}));
    }
}
