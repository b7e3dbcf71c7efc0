//! Tests for the MCP server tools, prompts and resources.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, PromptMessageContent, RawContent};
use rmcp::ServerHandler;
use serde_json::Value;

use cfpfinder_core::agenda::Agenda;
use cfpfinder_core::cfp::{CfpDocument, CfpLibrary};
use cfpfinder_core::error::{CfpError, CfpResult};
use cfpfinder_core::matching::{SamplingBackend, SamplingRequest};
use cfpfinder_mcp::server::{
    MonthPromptArgs, OpenCfpsPromptArgs, OutputFormat, SearchConferencesParams, TAGS_URI,
};
use cfpfinder_mcp::CfpFinderServer;

const AGENDA: &str = "\
## 2099

### March

* 26-28: [Devoxx France](https://devoxx.fr) - Paris (France) <a href=\"https://cfp.devoxx.fr\"><img alt=\"CFP\" src=\"https://img.shields.io/static/v1?label=CFP&message=until%2010-January-2099&color=green\"></a>
* 15: [Python Web Summit](https://pws.example) - Lyon (France)
* 5: [RustFest Berlin](https://rustfest.example) - Berlin (Germany)
";

fn library() -> CfpLibrary {
    [
        CfpDocument::new("rust-async", "# Async Rust in Practice\nTokio, futures and pinning."),
        CfpDocument::new("web-perf", "# Web Performance\nCore web vitals."),
    ]
    .into_iter()
    .collect()
}

fn server() -> CfpFinderServer {
    CfpFinderServer::new(Arc::new(Agenda::from_markdown(AGENDA)), Arc::new(library()))
}

fn text_of(result: &CallToolResult) -> String {
    result
        .content
        .iter()
        .filter_map(|c| match &c.raw {
            RawContent::Text(text) => Some(text.text.as_str()),
            _ => None,
        })
        .collect()
}

struct Canned {
    replies: Mutex<Vec<CfpResult<String>>>,
}

#[async_trait]
impl SamplingBackend for Canned {
    async fn sample(&self, _request: &SamplingRequest) -> CfpResult<String> {
        self.replies.lock().unwrap().remove(0)
    }
}

#[tokio::test]
async fn test_search_json_is_sorted_and_formatted() {
    let params = SearchConferencesParams {
        country: Some("france".into()),
        ..Default::default()
    };
    let result = server().search(params, None).await.unwrap();
    let json: Value = serde_json::from_str(&text_of(&result)).unwrap();

    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["name"], "Python Web Summit");
    assert_eq!(items[0]["dateFormatted"], "2099-03-15");
    assert_eq!(items[1]["name"], "Devoxx France");
    assert_eq!(items[1]["date"]["end"], "2099-03-28");
    assert_eq!(items[1]["cfp"]["untilDate"], "2099-01-10");
}

#[tokio::test]
async fn test_search_text_format() {
    let params = SearchConferencesParams {
        city: Some("berlin".into()),
        format: OutputFormat::Text,
        ..Default::default()
    };
    let result = server().search(params, None).await.unwrap();
    let text = text_of(&result);
    assert!(text.starts_with("Found 1 conferences (near berlin):"));
    assert!(text.contains("• RustFest Berlin - 2099-03-05 - Berlin (Germany)"));
}

#[tokio::test]
async fn test_search_open_cfp_and_tags() {
    let params = SearchConferencesParams {
        cfp_open: true,
        ..Default::default()
    };
    let result = server().search(params, None).await.unwrap();
    let json: Value = serde_json::from_str(&text_of(&result)).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["name"], "Devoxx France");

    let params = SearchConferencesParams {
        tags: Some("python".into()),
        ..Default::default()
    };
    let result = server().search(params, None).await.unwrap();
    let json: Value = serde_json::from_str(&text_of(&result)).unwrap();
    assert_eq!(json[0]["name"], "Python Web Summit");
}

#[tokio::test]
async fn test_invalid_date_is_rejected() {
    let params = SearchConferencesParams {
        min_date: Some("2099-02-30".into()),
        ..Default::default()
    };
    let err = server().search(params, None).await.unwrap_err();
    assert!(err.message.contains("2099-02-30"));
}

#[tokio::test]
async fn test_matching_requires_backend() {
    let params = SearchConferencesParams {
        match_cfps: true,
        ..Default::default()
    };
    assert!(server().search(params, None).await.is_err());
}

#[tokio::test]
async fn test_matching_reports_per_cfp() {
    let backend = Canned {
        replies: Mutex::new(vec![
            Ok(r#"```json
[{"name": "RustFest Berlin", "score": 92, "reasoning": "Rust audience"},
 {"name": "Devoxx France", "score": 40, "reasoning": "mostly JVM"}]
```"#
                .to_string()),
            Err(CfpError::sampling("model unavailable")),
        ]),
    };
    let server = server().with_sampler(Arc::new(backend));
    let params = SearchConferencesParams {
        match_cfps: true,
        min_score: Some(30),
        ..Default::default()
    };
    let result = server.search(params, None).await.unwrap();
    let json: Value = serde_json::from_str(&text_of(&result)).unwrap();

    let rust = &json["rust-async"];
    assert_eq!(rust["cfp_title"], "Async Rust in Practice");
    let matches = rust["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0]["name"], "RustFest Berlin");
    assert_eq!(matches[0]["match_score"], 92);
    assert_eq!(matches[0]["application_status"], "pending");
    assert_eq!(matches[1]["match_score"], 40);

    let web = &json["web-perf"];
    assert_eq!(web["cfp_title"], "Web Performance");
    assert!(web["error"].as_str().unwrap().contains("model unavailable"));
}

#[tokio::test]
async fn test_list_cfps() {
    let result = server().list_cfps().await.unwrap();
    let json: Value = serde_json::from_str(&text_of(&result)).unwrap();
    assert_eq!(json[0]["slug"], "rust-async");
    assert_eq!(json[0]["uri"], "cfp://rust-async");
    assert_eq!(json[1]["title"], "Web Performance");
}

#[test]
fn test_resources() {
    let server = server();
    let uris: Vec<String> = server
        .resource_list()
        .iter()
        .map(|r| r.raw.uri.clone())
        .collect();
    assert_eq!(uris, vec![TAGS_URI, "cfp://rust-async", "cfp://web-perf"]);

    let content = server.resource_text("cfp://web-perf").unwrap();
    assert!(content.starts_with("# Web Performance"));

    let tags: Value = serde_json::from_str(&server.resource_text(TAGS_URI).unwrap()).unwrap();
    assert_eq!(tags[0]["tag"], "ai");

    assert!(server.resource_text("cfp://unknown").is_err());
    assert!(server.resource_text("file:///etc/passwd").is_err());
}

#[tokio::test]
async fn test_prompts() {
    let server = server();
    let result = server
        .find_conferences_for_open_cfps(Parameters(OpenCfpsPromptArgs {
            country: "Belgium".into(),
        }))
        .await
        .unwrap();
    match &result.messages[0].content {
        PromptMessageContent::Text { text } => {
            assert!(text.contains("\"Belgium\""));
            assert!(text.contains("search_conferences"));
        }
        other => panic!("unexpected content: {other:?}"),
    }

    let result = server
        .conferences_by_month(Parameters(MonthPromptArgs {
            month: "june".into(),
            country: "France".into(),
            year: Some("2099".into()),
        }))
        .await
        .unwrap();
    assert_eq!(
        result.description.as_deref(),
        Some("Conferences in France during June 2099")
    );

    let err = server
        .conferences_by_month(Parameters(MonthPromptArgs {
            month: "Smarch".into(),
            country: "France".into(),
            year: None,
        }))
        .await;
    assert!(err.is_err());
}

#[test]
fn test_server_info() {
    let info = server().get_info();
    assert_eq!(info.server_info.name, "cfp-server");
    assert!(info.capabilities.tools.is_some());
    assert!(info.capabilities.prompts.is_some());
    assert!(info.capabilities.resources.is_some());
    assert!(info.instructions.unwrap().contains("3 developer conferences"));
}
