//! End-to-end tests for the typed client against a mock service.

use std::time::Duration;

use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use narrative_service_client::types::{
    CopyNarrativeParams, CopyObjectParams, CreateNewNarrativeParams, FindObjectReportParams,
    ListAvailableTypesParams, ListNarratorialParams, ListNarrativeParams,
    ListObjectsWithSetsParams, RemoveNarratorialParams, SetNarratorialParams,
};
use narrative_service_client::{AuthToken, NarrativeServiceClient, RpcError};

fn client_for(server: &MockServer) -> NarrativeServiceClient {
    NarrativeServiceClient::new(Url::parse(&server.uri()).unwrap())
}

fn rpc_result(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "version": "1.1",
        "id": "srv-1",
        "result": result,
    }))
}

async fn sent_body(server: &MockServer) -> Value {
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    serde_json::from_slice(&requests[0].body).unwrap()
}

#[tokio::test]
async fn copy_narrative_decodes_the_result_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(rpc_result(json!([{"new_narrative_id": 99}])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let output = client
        .copy_narrative(
            CopyNarrativeParams {
                workspace_name: Some("ws1".into()),
                narrative_id: Some(42),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();

    assert_eq!(output.new_narrative_id, 99);
    assert_eq!(output.new_workspace_id, None);

    let sent = sent_body(&server).await;
    assert_eq!(sent["method"], "NarrativeService.copy_narrative");
    assert_eq!(sent["params"], json!([{"workspace_name": "ws1", "narrative_id": 42}]));
}

#[tokio::test]
async fn status_tolerates_an_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let status = client.status(None).await.unwrap();
    assert!(status.is_empty());
}

#[tokio::test]
async fn status_decodes_the_reported_mapping() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(rpc_result(json!([{"state": "OK", "version": "0.2.1"}])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let status = client.status(None).await.unwrap();
    assert_eq!(status["state"], "OK");
    assert_eq!(status["version"], "0.2.1");

    let sent = sent_body(&server).await;
    assert_eq!(sent["method"], "NarrativeService.status");
    assert_eq!(sent["params"], json!([]));
}

#[tokio::test]
async fn list_operations_tolerate_an_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let narratives = client
        .list_narratives(ListNarrativeParams::default(), None)
        .await
        .unwrap();
    assert!(narratives.narratives.is_empty());

    let narratorials = client
        .list_narratorials(ListNarratorialParams::default(), None)
        .await
        .unwrap();
    assert!(narratorials.narratorials.is_empty());
}

#[tokio::test]
async fn result_mandatory_operation_rejects_an_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .copy_narrative(CopyNarrativeParams::default(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, RpcError::Protocol(_)));
}

#[tokio::test]
async fn server_error_reaches_the_caller_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "version": "1.1",
            "id": "srv-1",
            "error": {
                "code": -32500,
                "message": "narrative 42 is locked",
                "data": {"name": "JSONRPCError", "error": "lock held by someuser"},
            },
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .copy_narrative(
            CopyNarrativeParams {
                workspace_name: Some("ws1".into()),
                narrative_id: Some(42),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap_err();

    match err {
        RpcError::Server { code, message, data } => {
            assert_eq!(code, -32500);
            assert_eq!(message, "narrative 42 is locked");
            assert_eq!(data.unwrap()["error"], "lock held by someuser");
        },
        other => panic!("expected a server error, got {other:?}"),
    }
}

#[tokio::test]
async fn expired_token_fails_without_a_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .mount(&server)
        .await;

    let url = Url::parse(&server.uri()).unwrap();
    let mut client = NarrativeServiceClient::with_token(url, AuthToken::new("stale-token", "someuser"));
    client.set_insecure_http_allowed(true);

    let err = client.status(None).await.unwrap_err();
    assert!(matches!(err, RpcError::Unauthorized(_)));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn parameter_records_survive_the_wire_losslessly() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(rpc_result(json!([{"data": [], "data_palette_refs": {}}])))
        .mount(&server)
        .await;

    let params = ListObjectsWithSetsParams {
        ws_name: Some("my_ws".into()),
        ws_id: Some(7),
        workspaces: Some(vec!["alpha".into(), "beta".into()]),
        types: Some(vec!["KBaseGenomes.Genome".into()]),
        include_metadata: Some(1),
    };

    let client = client_for(&server);
    client
        .list_objects_with_sets(params.clone(), None)
        .await
        .unwrap();

    let sent = sent_body(&server).await;
    let observed: ListObjectsWithSetsParams =
        serde_json::from_value(sent["params"][0].clone()).unwrap();
    assert_eq!(observed, params);
}

#[tokio::test]
async fn list_objects_result_is_structurally_preserved() {
    let object_info = json!([5, "my_genome", "KBaseGenomes.Genome-17.0", "2026-01-05T10:00:00+0000", 1]);
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(rpc_result(json!([{
            "data": [{"object_info": object_info, "dp_info": {"ref": "8/1/2"}}],
            "data_palette_refs": {"my_ws": "8/1/2"},
        }])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let output = client
        .list_objects_with_sets(ListObjectsWithSetsParams::default(), None)
        .await
        .unwrap();

    assert_eq!(output.data.len(), 1);
    assert_eq!(output.data[0].object_info, object_info);
    assert_eq!(output.data[0].dp_info.as_ref().unwrap()["ref"], "8/1/2");
    assert_eq!(output.data_palette_refs["my_ws"], "8/1/2");
}

#[tokio::test]
async fn find_object_report_decodes_all_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(rpc_result(json!([{
            "report_upas": ["10/3/1"],
            "object_upa": "9/2/1",
            "copy_inaccessible": 0,
        }])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let output = client
        .find_object_report(FindObjectReportParams { upa: "11/4/1".into() }, None)
        .await
        .unwrap();

    assert_eq!(output.report_upas, vec!["10/3/1".to_string()]);
    assert_eq!(output.object_upa.as_deref(), Some("9/2/1"));
    assert_eq!(output.copy_inaccessible, Some(0));
    assert_eq!(output.error, None);
}

#[tokio::test]
async fn narratorial_lifecycle_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(rpc_result(json!([{}])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .set_narratorial(
            SetNarratorialParams {
                ws: "my_ws".into(),
                description: Some("intro to assembly".into()),
            },
            None,
        )
        .await
        .unwrap();
    client
        .remove_narratorial(RemoveNarratorialParams { ws: "my_ws".into() }, None)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    let set: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(set["method"], "NarrativeService.set_narratorial");
    assert_eq!(set["params"], json!([{"ws": "my_ws", "description": "intro to assembly"}]));
    let remove: Value = serde_json::from_slice(&requests[1].body).unwrap();
    assert_eq!(remove["method"], "NarrativeService.remove_narratorial");
    assert_eq!(remove["params"], json!([{"ws": "my_ws"}]));
}

#[tokio::test]
async fn create_new_narrative_returns_the_created_infos() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(rpc_result(json!([{
            "workspace_info": [108, "someuser:narrative_108"],
            "narrative_info": [1, "My narrative", "KBaseNarrative.Narrative-4.0"],
        }])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let output = client
        .create_new_narrative(
            CreateNewNarrativeParams {
                markdown: Some("# Welcome".into()),
                include_intro_cell: Some(1),
                title: Some("My narrative".into()),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();

    assert_eq!(output.workspace_info.unwrap()[0], 108);
    assert_eq!(output.narrative_info.unwrap()[1], "My narrative");

    let sent = sent_body(&server).await;
    assert_eq!(sent["method"], "NarrativeService.create_new_narrative");
    assert_eq!(
        sent["params"],
        json!([{"markdown": "# Welcome", "include_intro_cell": 1, "title": "My narrative"}])
    );
}

#[tokio::test]
async fn copy_object_targets_the_requested_workspace() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(rpc_result(json!([{"info": [4, "my_genome_copy"]}])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let output = client
        .copy_object(
            CopyObjectParams {
                object_ref: Some("1/2/3".into()),
                target_ws_name: Some("other_ws".into()),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();

    assert_eq!(output.info.unwrap()[1], "my_genome_copy");

    let sent = sent_body(&server).await;
    assert_eq!(sent["params"], json!([{"ref": "1/2/3", "target_ws_name": "other_ws"}]));
}

#[tokio::test]
async fn list_available_types_decodes_the_counts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(rpc_result(json!([{
            "type_stats": {"KBaseGenomes.Genome": 12, "KBaseSets.ReadsSet": 3},
        }])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let output = client
        .list_available_types(
            ListAvailableTypesParams {
                workspaces: Some(vec!["my_ws".into()]),
            },
            None,
        )
        .await
        .unwrap();

    assert_eq!(output.type_stats["KBaseGenomes.Genome"], 12);
    assert_eq!(output.type_stats["KBaseSets.ReadsSet"], 3);
}

#[tokio::test]
async fn pinned_service_version_routes_to_that_revision() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/beta"))
        .respond_with(rpc_result(json!([{"state": "OK"}])))
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    client.set_service_version(Some("beta".into()));
    let status = client.status(None).await.unwrap();
    assert_eq!(status["state"], "OK");
}

#[tokio::test]
async fn slow_service_trips_the_read_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(rpc_result(json!([{"state": "OK"}])).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let mut client = client_for(&server);
    client.set_read_timeout(Some(Duration::from_millis(50)));
    let err = client.status(None).await.unwrap_err();
    assert!(matches!(err, RpcError::Timeout(_)));
}
