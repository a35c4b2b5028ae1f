//! The fixed set of Zeplin tools offered to the language model.
//!
//! Each [`ToolKind`] owns its model-facing name and parameter schema, and
//! [`ToolRegistry::invoke`] matches on it to reach the handler, so adding a
//! variant without wiring its schema and handler does not compile.

use futures::future::try_join_all;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, instrument};

use crate::config::AppConfig;
use crate::error::{ToolError, ZeplinError};
use crate::layers::flatten_layer_texts;
use crate::llm_interaction::{FunctionDefinition, ToolDefinition};
use crate::zeplin::{ScreenPage, ZeplinClient};

const PROJECT_ID_DESCRIPTION: &str =
    "The id of the project in mongodb object id format e.g. 65ddec7fe6d474b19d2bc5f1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    GetProject,
    ListProjectScreens,
    GetScreenTexts,
    GetProjectTexts,
}

impl ToolKind {
    pub const ALL: [ToolKind; 4] = [
        ToolKind::GetProject,
        ToolKind::ListProjectScreens,
        ToolKind::GetScreenTexts,
        ToolKind::GetProjectTexts,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::GetProject => "getProject",
            ToolKind::ListProjectScreens => "listProjectScreens",
            ToolKind::GetScreenTexts => "getScreenTexts",
            ToolKind::GetProjectTexts => "getProjectTexts",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    fn description(self) -> &'static str {
        match self {
            ToolKind::GetProject => "Gets the project in Zeplin",
            ToolKind::ListProjectScreens => {
                "Lists one page of the screens in a Zeplin project. Use offset and limit to page."
            }
            ToolKind::GetScreenTexts => {
                "Gets every text shown on the latest version of a screen in a Zeplin project"
            }
            ToolKind::GetProjectTexts => {
                "Gets the texts shown on the latest version of every screen in a Zeplin project"
            }
        }
    }

    fn parameters(self) -> Value {
        let project_id = json!({ "type": "string", "description": PROJECT_ID_DESCRIPTION });
        match self {
            ToolKind::GetProject | ToolKind::GetProjectTexts => json!({
                "type": "object",
                "properties": { "projectId": project_id },
                "required": ["projectId"]
            }),
            ToolKind::ListProjectScreens => json!({
                "type": "object",
                "properties": {
                    "projectId": project_id,
                    "offset": { "type": "integer", "description": "Number of screens to skip", "minimum": 0 },
                    "limit": { "type": "integer", "description": "Page size, at most 100", "minimum": 1, "maximum": 100 },
                    "sort": { "type": "string", "enum": ["created", "section"], "description": "Sort order of the screens" }
                },
                "required": ["projectId"]
            }),
            ToolKind::GetScreenTexts => json!({
                "type": "object",
                "properties": {
                    "projectId": project_id,
                    "screenId": { "type": "string", "description": "The id of the screen in mongodb object id format" }
                },
                "required": ["projectId", "screenId"]
            }),
        }
    }

    pub fn definition(self) -> ToolDefinition {
        ToolDefinition {
            kind: "function".to_string(),
            function: FunctionDefinition {
                name: self.name().to_string(),
                description: self.description().to_string(),
                parameters: self.parameters(),
            },
        }
    }

    pub fn definitions() -> Vec<ToolDefinition> {
        Self::ALL.into_iter().map(Self::definition).collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectArgs {
    project_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListScreensArgs {
    project_id: String,
    #[serde(flatten)]
    page: ScreenPage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScreenArgs {
    project_id: String,
    screen_id: String,
}

/// Flattened text content of one screen's latest version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenTexts {
    pub screen_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub screen_name: Option<String>,
    pub texts: Vec<String>,
}

#[derive(Clone)]
pub struct ToolRegistry {
    zeplin: ZeplinClient,
    screen_page_size: u32,
    max_screen_pages: u32,
}

impl ToolRegistry {
    pub fn new(zeplin: ZeplinClient, screen_page_size: u32, max_screen_pages: u32) -> Self {
        Self {
            zeplin,
            screen_page_size,
            max_screen_pages,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            ZeplinClient::from_config(config),
            config.screen_page_size,
            config.max_screen_pages,
        )
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        ToolKind::definitions()
    }

    /// Resolves a model-requested call by name and decodes its JSON-encoded
    /// arguments before dispatching.
    pub async fn invoke_by_name(&self, name: &str, arguments: &str) -> Result<Value, ToolError> {
        let kind = ToolKind::from_name(name).ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        let args = serde_json::from_str::<Value>(arguments).map_err(|source| {
            ToolError::InvalidArguments {
                tool: kind.name(),
                source,
            }
        })?;
        self.invoke(kind, args).await
    }

    #[instrument(skip(self, args), fields(tool = kind.name()))]
    pub async fn invoke(&self, kind: ToolKind, args: Value) -> Result<Value, ToolError> {
        debug!(%args, "Invoking tool");
        let result = match kind {
            ToolKind::GetProject => {
                let ProjectArgs { project_id } = decode(kind, args)?;
                to_value(self.zeplin.get_project(&project_id).await?)?
            }
            ToolKind::ListProjectScreens => {
                let ListScreensArgs { project_id, page } = decode(kind, args)?;
                to_value(self.zeplin.list_project_screens(&project_id, &page).await?)?
            }
            ToolKind::GetScreenTexts => {
                let ScreenArgs {
                    project_id,
                    screen_id,
                } = decode(kind, args)?;
                to_value(self.screen_texts(&project_id, screen_id, None).await?)?
            }
            ToolKind::GetProjectTexts => {
                let ProjectArgs { project_id } = decode(kind, args)?;
                to_value(self.project_texts(&project_id).await?)?
            }
        };
        Ok(result)
    }

    async fn screen_texts(
        &self,
        project_id: &str,
        screen_id: String,
        screen_name: Option<String>,
    ) -> Result<ScreenTexts, ZeplinError> {
        let version = self
            .zeplin
            .get_latest_screen_version(project_id, &screen_id)
            .await?;
        Ok(ScreenTexts {
            screen_id,
            screen_name,
            texts: flatten_layer_texts(&version.layers),
        })
    }

    /// Fetches every screen's latest version concurrently. One failed fetch
    /// fails the whole aggregate.
    async fn project_texts(&self, project_id: &str) -> Result<Vec<ScreenTexts>, ZeplinError> {
        let screens = self
            .zeplin
            .list_all_screens(project_id, self.screen_page_size, self.max_screen_pages)
            .await?;
        info!(project_id, screens = screens.len(), "Fetching texts for every screen");

        try_join_all(
            screens
                .into_iter()
                .map(|screen| self.screen_texts(project_id, screen.id, Some(screen.name)))
                .collect::<Vec<_>>(),
        )
        .await
    }
}

fn decode<T: DeserializeOwned>(kind: ToolKind, args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|source| ToolError::InvalidArguments {
        tool: kind.name(),
        source,
    })
}

fn to_value<T: Serialize>(value: T) -> Result<Value, ToolError> {
    serde_json::to_value(value).map_err(ToolError::Encode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_for_every_kind() {
        for kind in ToolKind::ALL {
            assert_eq!(ToolKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ToolKind::from_name("deleteProject"), None);
    }

    #[test]
    fn definitions_use_function_format() {
        let definitions = ToolKind::definitions();
        assert_eq!(definitions.len(), 4);

        let get_project = &definitions[0];
        assert_eq!(get_project.kind, "function");
        assert_eq!(get_project.function.name, "getProject");
        assert_eq!(get_project.function.parameters["required"], json!(["projectId"]));
    }

    #[test]
    fn screen_texts_require_both_ids() {
        let schema = ToolKind::GetScreenTexts.definition().function.parameters;
        assert_eq!(schema["required"], json!(["projectId", "screenId"]));
    }

    #[test]
    fn list_screen_args_accept_optional_paging() {
        let args: ListScreensArgs =
            decode(ToolKind::ListProjectScreens, json!({ "projectId": "p1", "limit": 10 })).unwrap();
        assert_eq!(args.project_id, "p1");
        assert_eq!(args.page.limit, Some(10));
        assert_eq!(args.page.offset, None);
    }

    #[test]
    fn unencodable_result_is_an_encode_error() {
        struct Unencodable;

        impl Serialize for Unencodable {
            fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
                Err(serde::ser::Error::custom("not representable"))
            }
        }

        let err = to_value(Unencodable).unwrap_err();
        assert!(matches!(err, ToolError::Encode(_)));
        assert!(err.to_string().contains("not representable"));
    }

    #[test]
    fn missing_project_id_is_invalid_arguments() {
        let err = decode::<ProjectArgs>(ToolKind::GetProject, json!({})).unwrap_err();
        assert!(matches!(
            err,
            ToolError::InvalidArguments { tool: "getProject", .. }
        ));
    }
}
