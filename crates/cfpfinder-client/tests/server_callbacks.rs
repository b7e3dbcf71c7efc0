//! Sampling and elicitation requests sent by a server to the client handler.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use cfpfinder_client::{FinderClient, QuestionAnswer, QuestionResponder};
use cfpfinder_llm::{ApprovalRequest, Approver, AutoApprove, ChatClient, LlmConfig};
use rmcp::model::{
    Content, CreateElicitationRequestParam, CreateMessageRequestParam, ElicitationAction,
    ElicitationSchema, Role, SamplingMessage,
};
use rmcp::service::RunningService;
use rmcp::{RoleClient, RoleServer, ServerHandler, ServiceExt};
use serde_json::{json, Value};
use tokio::net::TcpListener;

#[derive(Clone)]
struct Bare;

impl ServerHandler for Bare {}

async fn completions(
    State(seen): State<Arc<Mutex<Vec<Value>>>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    seen.lock().unwrap().push(body);
    Json(json!({"choices": [{"message": {
        "role": "assistant",
        "content": "[{\"name\": \"RustFest Berlin\", \"score\": 91, \"reasoning\": \"Rust\"}]"
    }}]}))
}

async fn chat_endpoint() -> (ChatClient, Arc<Mutex<Vec<Value>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/v1/chat/completions", post(completions))
        .with_state(Arc::clone(&seen));
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let client = ChatClient::from_config(&LlmConfig {
        base_url: format!("http://{addr}"),
        model: "local-model".into(),
        timeout_secs: 5,
        ..LlmConfig::default()
    })
    .unwrap();
    (client, seen)
}

/// Approver that refuses and remembers what it was shown.
#[derive(Default)]
struct Refuse {
    shown: Mutex<Vec<(Option<String>, Vec<String>, Option<u32>)>>,
}

#[async_trait]
impl Approver for Refuse {
    async fn approve(&self, request: &ApprovalRequest<'_>) -> bool {
        self.shown.lock().unwrap().push((
            request.system_prompt.map(str::to_string),
            request.messages.to_vec(),
            request.max_tokens,
        ));
        false
    }
}

struct Always(QuestionAnswer);

#[async_trait]
impl QuestionResponder for Always {
    async fn respond(&self, _question: &str) -> QuestionAnswer {
        self.0
    }
}

async fn connect(
    handler: FinderClient,
) -> (RunningService<RoleServer, Bare>, RunningService<RoleClient, FinderClient>) {
    let (server_transport, client_transport) = tokio::io::duplex(64 * 1024);
    let (server, client) = tokio::join!(Bare.serve(server_transport), handler.serve(client_transport));
    (server.unwrap(), client.unwrap())
}

fn sampling_params() -> CreateMessageRequestParam {
    CreateMessageRequestParam {
        messages: vec![SamplingMessage {
            role: Role::User,
            content: Content::text("Match this CFP"),
        }],
        model_preferences: None,
        system_prompt: Some("You rank conferences.".into()),
        include_context: None,
        temperature: Some(0.3),
        max_tokens: 4000,
        stop_sequences: None,
        metadata: None,
    }
}

#[tokio::test]
async fn approved_sampling_is_answered_by_the_chat_model() {
    let (llm, seen) = chat_endpoint().await;
    let handler = FinderClient::new(llm, Arc::new(AutoApprove), Arc::new(Always(QuestionAnswer::Decline)));
    let (server, client) = connect(handler).await;

    assert!(server
        .peer()
        .peer_info()
        .is_some_and(|info| info.capabilities.sampling.is_some()
            && info.capabilities.elicitation.is_some()));

    let result = server.peer().create_message(sampling_params()).await.unwrap();
    assert_eq!(result.model, "local-model");
    assert_eq!(result.message.role, Role::Assistant);
    assert!(result
        .message
        .content
        .as_text()
        .unwrap()
        .text
        .contains("RustFest Berlin"));

    let bodies = seen.lock().unwrap();
    assert_eq!(bodies.len(), 1);
    let messages = bodies[0]["messages"].as_array().unwrap();
    assert_eq!(messages[0]["role"], "system");
    assert_eq!(messages[0]["content"], "You rank conferences.");
    assert_eq!(messages[1]["role"], "user");
    assert_eq!(messages[1]["content"], "Match this CFP");
    assert_eq!(bodies[0]["max_tokens"], 4000);

    drop(bodies);
    client.cancel().await.unwrap();
    server.cancel().await.unwrap();
}

#[tokio::test]
async fn refused_sampling_never_reaches_the_model() {
    let (llm, seen) = chat_endpoint().await;
    let approver = Arc::new(Refuse::default());
    let handler = FinderClient::new(llm, approver.clone(), Arc::new(Always(QuestionAnswer::Decline)));
    let (server, client) = connect(handler).await;

    let result = server.peer().create_message(sampling_params()).await.unwrap();
    let text = &result.message.content.as_text().unwrap().text;
    let reply: Value = serde_json::from_str(text).unwrap();
    assert_eq!(reply["error"], "Sampling denied by user");
    assert!(seen.lock().unwrap().is_empty());

    let shown = approver.shown.lock().unwrap();
    assert_eq!(shown.len(), 1);
    assert_eq!(shown[0].0.as_deref(), Some("You rank conferences."));
    assert_eq!(shown[0].1, vec!["Match this CFP".to_string()]);
    assert_eq!(shown[0].2, Some(4000));

    drop(shown);
    client.cancel().await.unwrap();
    server.cancel().await.unwrap();
}

#[tokio::test]
async fn questions_are_answered_by_the_responder() {
    let (llm, _seen) = chat_endpoint().await;
    let handler = FinderClient::new(llm, Arc::new(AutoApprove), Arc::new(Always(QuestionAnswer::Yes)));
    let (server, client) = connect(handler).await;

    let result = server
        .peer()
        .create_elicitation(CreateElicitationRequestParam {
            message: "Do you want to apply to RustFest Berlin?".into(),
            requested_schema: ElicitationSchema::builder()
                .required_bool("value")
                .build()
                .unwrap(),
        })
        .await
        .unwrap();
    assert_eq!(result.action, ElicitationAction::Accept);
    assert_eq!(result.content, Some(json!({"value": true})));

    client.cancel().await.unwrap();
    server.cancel().await.unwrap();
}
