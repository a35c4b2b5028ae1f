//! Condensed summary of an OpenAPI document, injected into prompts as extra
//! context about the Zeplin API surface.

use std::fmt::Write as _;
use std::path::Path;

use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use tracing::info;

use crate::error::SpecSummaryError;

const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

#[derive(Debug, Deserialize)]
struct OpenApiDocument {
    #[serde(default)]
    info: Option<Info>,
    #[serde(default)]
    paths: Mapping,
    #[serde(default)]
    components: Mapping,
}

#[derive(Debug, Deserialize)]
struct Info {
    title: Option<String>,
    version: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ApiSpecSummary {
    pub title: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
    /// `METHOD /path` entries in document order.
    pub operations: Vec<String>,
    pub component_sections: Vec<String>,
}

impl ApiSpecSummary {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SpecSummaryError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let summary = Self::parse(&raw)?;
        info!(
            path = %path.display(),
            operations = summary.operations.len(),
            "Loaded API spec summary"
        );
        Ok(summary)
    }

    pub fn parse(raw: &str) -> Result<Self, SpecSummaryError> {
        let document: OpenApiDocument = serde_yaml::from_str(raw)?;
        let info = document.info;

        let mut operations = Vec::new();
        for (path, item) in &document.paths {
            let Some(path) = path.as_str() else { continue };
            let methods: Vec<&str> = match item {
                Value::Mapping(item) => HTTP_METHODS
                    .into_iter()
                    .filter(|method| item.contains_key(*method))
                    .collect(),
                _ => Vec::new(),
            };
            if methods.is_empty() {
                operations.push(path.to_string());
            }
            for method in methods {
                operations.push(format!("{} {}", method.to_uppercase(), path));
            }
        }

        let component_sections = document
            .components
            .keys()
            .filter_map(|key| key.as_str().map(str::to_string))
            .collect();

        Ok(Self {
            title: info.as_ref().and_then(|info| info.title.clone()),
            version: info.as_ref().and_then(|info| info.version.clone()),
            description: info.and_then(|info| info.description),
            operations,
            component_sections,
        })
    }

    /// Plain-text rendering appended to the user message.
    pub fn to_prompt_context(&self) -> String {
        let mut out = String::from("API specification summary:\n");
        match (&self.title, &self.version) {
            (Some(title), Some(version)) => {
                let _ = writeln!(out, "Title: {} (version {})", title, version);
            }
            (Some(title), None) => {
                let _ = writeln!(out, "Title: {}", title);
            }
            _ => {}
        }
        if let Some(description) = &self.description {
            let _ = writeln!(out, "Description: {}", description.trim());
        }
        if !self.operations.is_empty() {
            out.push_str("Paths:\n");
            for operation in &self.operations {
                let _ = writeln!(out, "- {}", operation);
            }
        }
        if !self.component_sections.is_empty() {
            let _ = writeln!(
                out,
                "Component sections: {}",
                self.component_sections.join(", ")
            );
        }
        out
    }
}
