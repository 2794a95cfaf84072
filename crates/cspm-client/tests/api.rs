//! HTTP-level tests against a wiremock server.

use std::time::Duration;

use cspm_client::{ClientError, CspmClient, PaginationOptions};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REQUIREMENTS: &str = "/api/cspm/v1/compliance/requirements";

fn client(server: &MockServer) -> CspmClient {
    CspmClient::new(&server.uri(), "test-token", Duration::from_secs(5)).expect("client builds")
}

fn requirement(id: &str) -> serde_json::Value {
    json!({
        "requirementId": id,
        "name": format!("Requirement {id}"),
        "policyId": "pol-1",
        "policyName": "CIS Amazon Web Services Foundations Benchmark",
        "severity": "High",
        "pass": false,
        "failedControls": 1,
        "zone": {"id": "z1", "name": "Entire Infrastructure"},
        "controls": [{"id": format!("ctrl-{id}"), "resourceApiEndpoint": "/api/cspm/v1/cloud/resources?controlId=1"}]
    })
}

#[tokio::test]
async fn single_page_sends_filter_and_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(REQUIREMENTS))
        .and(header("authorization", "Bearer test-token"))
        .and(query_param("filter", r#"pass = "false""#))
        .and(query_param("pageNumber", "1"))
        .and(query_param("pageSize", "50"))
        .and(query_param_is_missing("includeControls"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"requirementId": "r1", "policyId": "p1", "zoneId": "z1", "pass": false}],
            "totalCount": "1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let page = client(&server)
        .get_requirements_page(r#"pass = "false""#, 1, 50)
        .await
        .unwrap();
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].requirement_id, "r1");
    assert_eq!(page.total_count.get(), 1);
}

#[tokio::test]
async fn unpaginated_query_omits_page_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(REQUIREMENTS))
        .and(query_param_is_missing("pageNumber"))
        .and(query_param_is_missing("pageSize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [], "totalCount": 0})))
        .expect(1)
        .mount(&server)
        .await;

    let page = client(&server).get_compliance_requirements("").await.unwrap();
    assert!(page.data.is_empty());
}

#[tokio::test]
async fn all_requirements_with_controls_merges_pages() {
    let server = MockServer::start().await;
    for (page, ids) in [("1", vec!["a", "b"]), ("2", vec!["c"])] {
        let data: Vec<_> = ids.iter().map(|id| requirement(id)).collect();
        Mock::given(method("GET"))
            .and(path(REQUIREMENTS))
            .and(query_param("includeControls", "true"))
            .and(query_param("pageNumber", page))
            .and(query_param("pageSize", "2"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"data": data, "totalCount": "3"})),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let result = client(&server)
        .get_all_requirements_with_controls("", PaginationOptions::normalized(2, 3, 0))
        .await
        .unwrap();
    let ids: Vec<_> = result.data.iter().map(|r| r.requirement_id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert_eq!(result.data[0].controls[0].id, "ctrl-a");
}

#[tokio::test]
async fn api_error_message_is_surfaced_with_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(REQUIREMENTS))
        .and(query_param("pageNumber", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [], "totalCount": 4})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(REQUIREMENTS))
        .and(query_param("pageNumber", "2"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"message": "invalid filter expression"})),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .get_all_requirements("bad", PaginationOptions::normalized(2, 3, 0))
        .await
        .unwrap_err();
    assert_eq!(err.page(), Some(2));
    assert_eq!(err.status(), Some(400));
    let text = err.to_string();
    assert!(text.contains("invalid filter expression"), "{text}");
    assert!(text.contains("[bad]"), "{text}");
}

#[tokio::test]
async fn malformed_total_count_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(REQUIREMENTS))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": [], "totalCount": "lots"})),
        )
        .mount(&server)
        .await;

    let err = client(&server)
        .get_requirements_page("", 1, 50)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn cloud_resources_keep_endpoint_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cspm/v1/cloud/resources"))
        .and(query_param("controlId", "16015"))
        .and(query_param("pageNumber", "1"))
        .and(query_param("pageSize", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"hash": "h1", "name": "bucket", "type": "AWS_S3_BUCKET", "passed": false},
                {"hash": "h2", "name": "bucket2", "type": "AWS_S3_BUCKET", "passed": true,
                 "acceptance": {"justification": "ok", "expirationDate": "2030-01-01"}}
            ],
            "totalCount": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server)
        .get_all_cloud_resources(
            "/api/cspm/v1/cloud/resources?controlId=16015",
            PaginationOptions::normalized(50, 3, 0),
        )
        .await
        .unwrap();
    assert_eq!(result.data.len(), 2);
    assert_eq!(result.data[1].acceptance_justification(), Some("ok"));
}

#[tokio::test]
async fn risk_acceptances_are_searched_sequentially() {
    let server = MockServer::start().await;
    for page in 1..=2 {
        Mock::given(method("POST"))
            .and(path("/api/cspm/v1/compliance/violations/acceptances/search"))
            .and(body_json(json!({
                "filter": "",
                "pageNumber": page,
                "pageSize": 1,
                "sort": "acceptanceDate",
                "orderBy": "desc"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": [{"id": format!("ra-{page}"), "tenantId": "t", "controlId": "c", "acceptanceDate": 1_700_000_000_000_i64}],
                "totalCount": "2"
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let acceptances = client(&server)
        .list_risk_acceptances_with(1, Duration::ZERO)
        .await
        .unwrap();
    let ids: Vec<_> = acceptances.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["ra-1", "ra-2"]);
}

#[tokio::test]
async fn revoke_posts_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/cspm/v1/compliance/violations/revoke"))
        .and(body_json(json!({"id": "ra-9"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client(&server).revoke_risk_acceptance("ra-9").await.unwrap();
}

#[tokio::test]
async fn revoke_failure_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/cspm/v1/compliance/violations/revoke"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "not found"})))
        .mount(&server)
        .await;

    let err = client(&server).revoke_risk_acceptance("nope").await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::ApiStatus { status: 404, message: Some(ref m) } if m == "not found"
    ));
}

#[tokio::test]
async fn inventory_pages_through() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/cspm/v1/inventory/resources"))
        .and(query_param("filter", r#"platform = "AWS""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"hash": "i1", "name": "vpc", "type": "AWS_VPC", "platform": "AWS",
                      "metadata": {"account": "123"}, "lastSeen": "1733011200"}],
            "totalCount": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server)
        .get_all_inventory(r#"platform = "AWS""#, PaginationOptions::default())
        .await
        .unwrap();
    assert_eq!(result.data.len(), 1);
    assert_eq!(result.data[0].platform_identifiers().aws_account.as_deref(), Some("123"));
}
