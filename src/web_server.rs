use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    routing::{get, post},
    serve, Json, Router,
};
use minijinja::{path_loader, Environment};
use minijinja_autoreload::AutoReloader;
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, sync::Arc};
use tokio::sync::RwLock;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::llm_interaction::ToolDefinition;
use crate::orchestrator::Orchestrator;

const TEMPLATE_DIR: &str = "templates";
const STATIC_DIR: &str = "static";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub prompt: String,
}

/// Body of every `/api/ask` reply. On failure `answer` is whatever was shown
/// before, so the page never distinguishes error kinds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AskResponse {
    pub answer: Option<String>,
}

// Shared application state
#[derive(Clone)]
pub struct AppState {
    templates: Arc<AutoReloader>,
    orchestrator: Arc<Orchestrator>,
    // Latest successful answer; only the ask handler writes it.
    last_answer: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            templates: Arc::new(create_minijinja_env()),
            orchestrator: Arc::new(orchestrator),
            last_answer: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn last_answer(&self) -> Option<String> {
        self.last_answer.read().await.clone()
    }
}

fn create_minijinja_env() -> AutoReloader {
    AutoReloader::new(|notifier| {
        let mut env = Environment::new();
        env.set_loader(path_loader(TEMPLATE_DIR));
        notifier.watch_path(TEMPLATE_DIR, true);
        Ok(env)
    })
}

async fn index_handler(
    State(state): State<AppState>,
) -> Result<Html<String>, (StatusCode, Html<String>)> {
    let answer = state.last_answer().await;
    render_index(&state.templates, answer).map(Html).map_err(|e| {
        error!("Failed to get or render template: {}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(format!("Internal Server Error: {}", e)),
        )
    })
}

fn render_index(
    templates: &AutoReloader,
    answer: Option<String>,
) -> Result<String, minijinja::Error> {
    let env = templates.acquire_env()?;
    let tmpl = env.get_template("index.html")?;
    tmpl.render(minijinja::context! {
        title => "Zeplin Assistant",
        answer => answer,
    })
}

async fn ask_handler(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> (StatusCode, Json<AskResponse>) {
    if request.prompt.trim().is_empty() {
        warn!("Ignoring empty prompt");
        let answer = state.last_answer().await;
        return (StatusCode::BAD_REQUEST, Json(AskResponse { answer }));
    }

    info!(prompt = %request.prompt, "Received prompt");
    match state.orchestrator.answer(&request.prompt).await {
        Ok(answer) => {
            *state.last_answer.write().await = Some(answer.clone());
            (
                StatusCode::OK,
                Json(AskResponse {
                    answer: Some(answer),
                }),
            )
        }
        Err(e) => {
            error!(error = %e, "Exchange failed; keeping the previous answer");
            let answer = state.last_answer().await;
            (StatusCode::BAD_GATEWAY, Json(AskResponse { answer }))
        }
    }
}

async fn tools_handler(State(state): State<AppState>) -> Json<Vec<ToolDefinition>> {
    Json(state.orchestrator.registry().definitions())
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/ask", post(ask_handler))
        .route("/api/tools", get(tools_handler))
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn start_web_server(port: u16, orchestrator: Orchestrator) -> Result<()> {
    let app = router(AppState::new(orchestrator));

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind to address {}", addr))?;

    serve(listener, app.into_make_service())
        .await
        .context("Web server failed")?;

    Ok(())
}
