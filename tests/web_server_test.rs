use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use zeplin_assistant::web_server::{router, AppState, AskResponse};
use zeplin_assistant::{AppConfig, Orchestrator};

fn test_server(llm: &MockServer, zeplin: &MockServer) -> TestServer {
    let mut config = AppConfig::new("sk-test", "zpl-test");
    config.openai_api_base = llm.uri();
    config.zeplin_api_base = zeplin.uri();
    let orchestrator = Orchestrator::from_config(&config).unwrap();
    TestServer::new(router(AppState::new(orchestrator))).unwrap()
}

fn completion(content: Option<&str>, tool: Option<&str>) -> Value {
    let mut message = json!({ "role": "assistant", "content": content });
    let finish_reason = match tool {
        Some(name) => {
            message["tool_calls"] = json!([{
                "id": "call_1",
                "type": "function",
                "function": { "name": name, "arguments": "{}" }
            }]);
            "tool_calls"
        }
        None => "stop",
    };
    json!({ "choices": [{ "index": 0, "finish_reason": finish_reason, "message": message }] })
}

#[test_log::test(tokio::test)]
async fn ask_returns_the_answer() {
    let llm = MockServer::start().await;
    let zeplin = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(Some("Hi!"), None)))
        .mount(&llm)
        .await;

    let server = test_server(&llm, &zeplin);
    let response = server.post("/api/ask").json(&json!({ "prompt": "Hello" })).await;

    response.assert_status_ok();
    assert_eq!(
        response.json::<AskResponse>(),
        AskResponse {
            answer: Some("Hi!".to_string())
        }
    );

    let page = server.get("/").await;
    page.assert_status_ok();
    assert!(page.text().contains("Hi!"));
}

#[test_log::test(tokio::test)]
async fn failed_exchange_keeps_the_previous_answer() {
    let llm = MockServer::start().await;
    let zeplin = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("first question"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(Some("First answer"), None)))
        .mount(&llm)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("second question"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(None, Some("deleteProject"))))
        .mount(&llm)
        .await;

    let server = test_server(&llm, &zeplin);
    server
        .post("/api/ask")
        .json(&json!({ "prompt": "first question" }))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/ask")
        .json(&json!({ "prompt": "second question" }))
        .await;
    response.assert_status(StatusCode::BAD_GATEWAY);
    assert_eq!(
        response.json::<AskResponse>().answer.as_deref(),
        Some("First answer")
    );
    assert!(zeplin.received_requests().await.unwrap().is_empty());
}

#[test_log::test(tokio::test)]
async fn failure_before_any_answer_has_no_answer() {
    let llm = MockServer::start().await;
    let zeplin = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&llm)
        .await;

    let server = test_server(&llm, &zeplin);
    let response = server.post("/api/ask").json(&json!({ "prompt": "Hello" })).await;
    response.assert_status(StatusCode::BAD_GATEWAY);
    assert_eq!(response.json::<AskResponse>(), AskResponse { answer: None });

    let page = server.get("/").await;
    page.assert_status_ok();
    assert!(page.text().contains("Ask me about your Zeplin project!"));
}

#[tokio::test]
async fn empty_prompt_is_rejected_without_calling_the_model() {
    let llm = MockServer::start().await;
    let zeplin = MockServer::start().await;

    let server = test_server(&llm, &zeplin);
    let response = server.post("/api/ask").json(&json!({ "prompt": "   " })).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(llm.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn tools_endpoint_lists_descriptors() {
    let llm = MockServer::start().await;
    let zeplin = MockServer::start().await;

    let server = test_server(&llm, &zeplin);
    let tools = server.get("/api/tools").await.json::<Value>();
    let names: Vec<_> = tools
        .as_array()
        .unwrap()
        .iter()
        .map(|tool| tool["function"]["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        names,
        vec!["getProject", "listProjectScreens", "getScreenTexts", "getProjectTexts"]
    );
}

#[tokio::test]
async fn static_assets_are_served() {
    let llm = MockServer::start().await;
    let zeplin = MockServer::start().await;

    let server = test_server(&llm, &zeplin);
    let response = server.get("/static/app.js").await;
    response.assert_status_ok();
    assert!(response.text().contains("/api/ask"));
}
