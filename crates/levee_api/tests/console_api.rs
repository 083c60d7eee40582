use levee_api::{
    ApiClient, ApiError, ApiSettings, BuildIndexRequest, ChatMessage, ChatRequest, ReportRequest,
    RequestContext,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    let base = Url::parse(&server.uri()).expect("mock server uri");
    ApiClient::new(ApiSettings::new(base)).expect("client")
}

#[tokio::test]
async fn knowledge_base_list_parses_camel_case_timestamps() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/knowledge-base"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "kb_flood",
                "name": "汛情知识库",
                "description": "flood season references",
                "createdAt": "2024-01-10T08:00:00",
                "updatedAt": "2024-01-15T09:30:00"
            },
            { "id": "kb_bare", "name": "bare" }
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let bases = client
        .list_knowledge_bases(&RequestContext::anonymous())
        .await
        .expect("list");
    assert_eq!(bases.len(), 2);
    assert_eq!(bases[0].id, "kb_flood");
    assert_eq!(bases[0].created_at.as_deref(), Some("2024-01-10T08:00:00"));
    assert_eq!(bases[1].description, None);
    assert_eq!(bases[1].updated_at, None);
}

#[tokio::test]
async fn contents_are_unwrapped_from_the_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/knowledge-base/kb_flood/contents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "data": [{
                "url": "https://example.com/report",
                "title": "Rainfall bulletin",
                "content": "hourly rainfall ...",
                "extracted_time": "2024-01-15 10:31:00",
                "structured_data": { "events": [] }
            }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let items = client
        .knowledge_base_contents(&RequestContext::anonymous(), "kb_flood")
        .await
        .expect("contents");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Rainfall bulletin");
    assert_eq!(items[0].structured_data, json!({ "events": [] }));
}

#[tokio::test]
async fn delete_content_sends_the_url_in_the_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/knowledge-base/kb_flood/contents"))
        .and(body_json(json!({ "url": "https://example.com/report" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "内容已删除"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let message = client
        .delete_content(
            &RequestContext::anonymous(),
            "kb_flood",
            "https://example.com/report",
        )
        .await
        .expect("delete");
    assert_eq!(message, "内容已删除");
}

#[tokio::test]
async fn build_index_warning_still_counts_as_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/knowledge-base/kb_empty/build-index"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "warning",
            "message": "未加载到任何文本，跳过构建索引"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = BuildIndexRequest {
        kb_id: "kb_empty".to_string(),
        index_id: None,
    };
    let message = client
        .build_index(&RequestContext::anonymous(), &request)
        .await
        .expect("build index");
    assert_eq!(message, "未加载到任何文本，跳过构建索引");
}

#[tokio::test]
async fn login_goes_out_form_encoded_and_anonymous() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(header(
            "content-type",
            "application/x-www-form-urlencoded",
        ))
        .and(body_string_contains("username=analyst"))
        .and(body_string_contains("password=levee-pass"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-9",
            "token_type": "bearer",
            "user": {
                "id": "u_1",
                "username": "analyst",
                "email": "analyst@example.com",
                "full_name": "Duty Analyst"
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let login = client.login("analyst", "levee-pass").await.expect("login");
    assert_eq!(login.access_token, "tok-9");
    assert_eq!(login.user.username, "analyst");
}

#[tokio::test]
async fn authenticated_calls_carry_the_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer tok-9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u_1",
            "username": "analyst",
            "email": "analyst@example.com"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let ctx = RequestContext::with_token("tok-9");
    let user = client.current_user(&ctx).await.expect("me");
    assert_eq!(user.id, "u_1");
    assert_eq!(user.full_name, None);
}

#[tokio::test]
async fn change_password_posts_both_passwords() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/auth/me/password"))
        .and(body_json(json!({
            "current_password": "old-pass",
            "new_password": "new-pass"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "密码更新成功" })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let ctx = RequestContext::with_token("tok-9");
    let message = client
        .change_password(&ctx, "old-pass", "new-pass")
        .await
        .expect("change password");
    assert_eq!(message, "密码更新成功");
}

#[tokio::test]
async fn generate_report_returns_body_and_history_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/knowledge-base/kb_flood/generate-report"))
        .and(body_json(json!({ "query": "7月防汛简报" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "report": "# 7月防汛简报\n...",
            "id": "report_20240115103000"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = ReportRequest {
        query: "7月防汛简报".to_string(),
        issuing_unit: None,
        report_date: None,
    };
    let report = client
        .generate_report(&RequestContext::anonymous(), "kb_flood", &request)
        .await
        .expect("report");
    assert_eq!(report.id.as_deref(), Some("report_20240115103000"));
    assert!(report.report.starts_with("# 7月防汛简报"));
}

#[tokio::test]
async fn chat_errors_surface_the_data_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/knowledge-base/kb_flood/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "error",
            "data": "抱歉，报告生成失败: no index",
            "is_report": false
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = ChatRequest {
        query: "最新雨情".to_string(),
        kb_id: "kb_flood".to_string(),
        k: Some(5),
        chat_history: vec![ChatMessage {
            role: "user".to_string(),
            content: "你好".to_string(),
            timestamp: None,
        }],
    };
    let err = client
        .chat(&RequestContext::anonymous(), &request)
        .await
        .unwrap_err();
    match err {
        ApiError::Api(detail) => assert_eq!(detail, "抱歉，报告生成失败: no index"),
        other => panic!("expected Api error, got {other:?}"),
    }
}
