use fieldhint_api::SuggestionClient;
use fieldhint_types::{FieldType, SuggestionId};
use fieldhint_util::ApiSettings;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, token: Option<&str>) -> SuggestionClient {
    let settings = ApiSettings {
        base_url: server.uri(),
        token: token.map(str::to_string),
        ..ApiSettings::default()
    };
    SuggestionClient::new(&settings).expect("client")
}

#[tokio::test]
async fn search_sends_field_type_and_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/suggestions/search"))
        .and(query_param("field_type", "cargo_description"))
        .and(query_param("q", "į Vilnių"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 4, "value": "į Vilnių vakare", "usage_count": 5},
            {"id": 9, "value": "į Vilnių rytoj", "usage_count": 1}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let rows = client
        .search(&FieldType::from("cargo_description"), "į Vilnių")
        .await
        .expect("search succeeds");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, SuggestionId::Number(4));
    assert_eq!(rows[0].value, "į Vilnių vakare");
    assert_eq!(rows[0].usage_count, 5);
}

#[tokio::test]
async fn search_surfaces_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/suggestions/search"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    let error = client
        .search(&FieldType::from("client_name"), "UAB")
        .await
        .expect_err("503 must be an error");
    assert!(error.to_string().contains("503"), "{error}");
}

#[tokio::test]
async fn search_rejects_undecodable_bodies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    assert!(client.search(&FieldType::from("client_name"), "UAB").await.is_err());
}

#[tokio::test]
async fn save_posts_json_body_with_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/suggestions/save"))
        .and(header("authorization", "Bearer s3cret"))
        .and(body_json(json!({"field_type": "client_notes", "value": "Skambinti prieš atvykstant"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Some("s3cret"));
    client
        .save(&FieldType::from("client_notes"), "Skambinti prieš atvykstant")
        .await
        .expect("save succeeds");
}

#[tokio::test]
async fn save_reports_non_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    assert!(client.save(&FieldType::from("client_notes"), "x").await.is_err());
}
