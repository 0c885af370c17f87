//! E2E tests using the mock Onshape server.
//!
//! These tests exercise full workflows against the mock server, which
//! checks every request signature the way the real API does.

#![cfg(feature = "test-server")]

use onshapi::mock_server::{Fixtures, MockServer, MockState};
use onshapi::{
    get_bill_of_materials, get_document, get_elements_in_document, get_parts, ApiRequest,
    BillOfMaterials, Credentials, Document, ElementRef, ElementsQuery, Get, List, OnshapeClient,
    OnshapeError, Part, Scope,
};

fn workspace() -> Scope {
    Scope::Workspace(Fixtures::WORKSPACE_ID.to_string())
}

// =============================================================================
// Server Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn test_server_starts_on_random_port() {
    let server1 = MockServer::start().await;
    let server2 = MockServer::start().await;

    assert_ne!(server1.url(), server2.url());

    server1.shutdown().await;
    server2.shutdown().await;
}

#[tokio::test]
async fn test_server_shutdown_is_clean() {
    let server = MockServer::start().await;
    let url = server.url().to_string();

    server.shutdown().await;

    // After shutdown, server should not respond
    let client = reqwest::Client::new();
    let result = client.get(format!("{}/health", url)).send().await;

    assert!(result.is_err());
}

// =============================================================================
// Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_workflow_document_to_bill_of_materials() {
    let server = MockServer::start().await;
    let client = OnshapeClient::new(server.credentials()).unwrap();

    // 1. Open the document and find its main workspace
    let document = get_document(&client, Fixtures::DOCUMENT_ID).await.unwrap();
    assert_eq!(document.name, "Toolbox Drawer");
    let workspace_id = document.default_workspace_id().unwrap().to_string();
    let scope = Scope::Workspace(workspace_id);

    // 2. Everything in the workspace
    let all = get_elements_in_document(
        &client,
        &document.id,
        scope.clone(),
        ElementsQuery::default(),
    )
    .await
    .unwrap();
    assert_eq!(all.len(), 2);

    // 3. Only the assemblies
    let assemblies = get_elements_in_document(
        &client,
        &document.id,
        scope.clone(),
        ElementsQuery::of_type("Assembly"),
    )
    .await
    .unwrap();
    assert_eq!(assemblies.len(), 1);
    assert!(assemblies[0].is_assembly());
    assert_eq!(assemblies[0].id, Fixtures::ASSEMBLY_ID);

    // 4. Parts of the part studio
    let part_studio = all.iter().find(|e| e.is_part_studio()).unwrap();
    let parts = get_parts(&client, &document.id, scope.clone(), &part_studio.id)
        .await
        .unwrap();
    assert_eq!(parts.len(), 3);
    assert!(parts.iter().any(|p| p.part_id == "JHD"));

    // 5. Bill of materials of the assembly
    let bom = get_bill_of_materials(&client, &document.id, scope, &assemblies[0].id)
        .await
        .unwrap();
    assert_eq!(bom.bom_table.items.len(), 3);
    assert_eq!(bom.total_quantity(), 4.0);

    let finish = bom.bom_table.header_for("5ace8269c046ad612c65a0bb").unwrap();
    assert_eq!(bom.bom_table.items[0].value_for(finish).and_then(|v| v.as_str()), Some("Raw"));
    assert_eq!(bom.bom_table.visible_headers().count(), 2);

    // One request per call, each with a fresh nonce
    let state = server.state();
    let state = state.read().await;
    assert_eq!(state.request_count, 5);
    assert_eq!(state.seen_nonces.len(), 5);
    drop(state);

    server.shutdown().await;
}

#[tokio::test]
async fn test_workflow_through_traits() {
    let server = MockServer::start().await;
    let client = OnshapeClient::new(server.credentials()).unwrap();

    let document = Document::get(&client, Fixtures::DOCUMENT_ID.to_string())
        .await
        .unwrap();
    assert_eq!(document.id, Fixtures::DOCUMENT_ID);

    let part_studio = ElementRef::new(Fixtures::DOCUMENT_ID, workspace(), Fixtures::PART_STUDIO_ID);
    let parts = Part::list(&client, &part_studio).await.unwrap();
    assert_eq!(parts.len(), 3);

    let assembly = ElementRef::new(Fixtures::DOCUMENT_ID, workspace(), Fixtures::ASSEMBLY_ID);
    let bom = BillOfMaterials::get(&client, assembly).await.unwrap();
    assert_eq!(bom.total_quantity(), 4.0);

    server.shutdown().await;
}

#[tokio::test]
async fn test_filter_by_element_id() {
    let server = MockServer::start().await;
    let client = OnshapeClient::new(server.credentials()).unwrap();

    let filters = ElementsQuery {
        element_id: Some(Fixtures::PART_STUDIO_ID.to_string()),
        ..Default::default()
    };
    let elements = get_elements_in_document(&client, Fixtures::DOCUMENT_ID, workspace(), filters)
        .await
        .unwrap();

    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].name, "Drawer Parts");

    server.shutdown().await;
}

#[tokio::test]
async fn test_unknown_version_is_not_found() {
    let server = MockServer::start().await;
    let client = OnshapeClient::new(server.credentials()).unwrap();

    let result = get_elements_in_document(
        &client,
        Fixtures::DOCUMENT_ID,
        Scope::Version("0123456789abcdef01234567".to_string()),
        ElementsQuery::default(),
    )
    .await;

    assert!(matches!(
        result,
        Err(OnshapeError::UnexpectedStatus { status_code: 404, .. })
    ));

    server.shutdown().await;
}

// =============================================================================
// Signature Tests
// =============================================================================

#[tokio::test]
async fn test_wrong_access_key_rejected() {
    let server = MockServer::start().await;
    let creds = Credentials::new("someone-else", Fixtures::SECRET_KEY).with_base_url(server.url());
    let client = OnshapeClient::new(creds).unwrap();

    let err = get_document(&client, Fixtures::DOCUMENT_ID).await.unwrap_err();

    match err {
        OnshapeError::UnexpectedStatus {
            status_code,
            message,
        } => {
            assert_eq!(status_code, 401);
            assert_eq!(message, "signature mismatch");
        }
        other => panic!("Expected UnexpectedStatus, got {other:?}"),
    }

    server.shutdown().await;
}

#[tokio::test]
async fn test_query_is_part_of_signature() {
    let server = MockServer::start().await;
    let client = OnshapeClient::new(server.credentials()).unwrap();

    // A query with characters that need encoding still verifies
    let filters = ElementsQuery {
        element_type: Some("Part Studio & more".to_string()),
        with_thumbnails: Some(true),
        ..Default::default()
    };
    let elements = get_elements_in_document(&client, Fixtures::DOCUMENT_ID, workspace(), filters)
        .await
        .unwrap();
    assert!(elements.is_empty());

    server.shutdown().await;
}

#[tokio::test]
async fn test_replayed_nonce_rejected() {
    let server = MockServer::start().await;
    let client = OnshapeClient::new(server.credentials()).unwrap();

    get_document(&client, Fixtures::DOCUMENT_ID).await.unwrap();

    // Re-sign the same request with a nonce the server already accepted
    let nonce = {
        let state = server.state();
        let state = state.read().await;
        state.seen_nonces.iter().next().cloned().unwrap()
    };
    assert_eq!(nonce.len(), 25);

    let signer = onshapi::RequestSigner::new(Fixtures::ACCESS_KEY, Fixtures::SECRET_KEY).unwrap();
    let path = format!("/api/documents/{}", Fixtures::DOCUMENT_ID);
    let replayed = signer
        .sign_at(
            &reqwest::Method::GET,
            &path,
            "",
            reqwest::header::HeaderMap::new(),
            &nonce,
            chrono::Utc::now(),
        )
        .unwrap();

    let response = reqwest::Client::new()
        .get(format!("{}{}", server.url(), path))
        .headers(replayed)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 401);

    server.shutdown().await;
}

// =============================================================================
// Redirect Tests
// =============================================================================

#[tokio::test]
async fn test_redirect_surfaces_by_default() {
    let server = MockServer::start().await;
    let old_path = "/api/documents/moved";
    let new_path = format!("/api/documents/{}", Fixtures::DOCUMENT_ID);
    server
        .state()
        .write()
        .await
        .redirects
        .insert(old_path.to_string(), new_path.clone());

    let client = OnshapeClient::new(server.credentials()).unwrap();
    let err = client.get_json(&ApiRequest::raw(old_path)).await.unwrap_err();

    match err {
        OnshapeError::Redirect { location } => assert_eq!(location, new_path),
        other => panic!("Expected Redirect, got {other:?}"),
    }

    server.shutdown().await;
}

#[tokio::test]
async fn test_redirect_followed_and_re_signed() {
    let server = MockServer::start().await;
    let new_path = format!("/api/documents/{}", Fixtures::DOCUMENT_ID);
    server
        .state()
        .write()
        .await
        .redirects
        .insert("/api/documents/moved".to_string(), new_path);

    let client = OnshapeClient::new(server.credentials())
        .unwrap()
        .with_max_redirects(1);
    let document = get_document(&client, "moved").await.unwrap();

    assert_eq!(document.name, "Toolbox Drawer");
    assert_eq!(server.state().read().await.request_count, 2);

    server.shutdown().await;
}

#[tokio::test]
async fn test_cross_origin_redirect_not_followed() {
    let target = MockServer::start_empty().await;
    let location = format!("{}/api/documents/{}", target.url(), Fixtures::DOCUMENT_ID);

    let state = MockState::new()
        .with_api_keys(Fixtures::ACCESS_KEY, Fixtures::SECRET_KEY)
        .with_redirect("/api/documents/moved", &location);
    let server = MockServer::with_state(state).await;

    let client = OnshapeClient::new(server.credentials())
        .unwrap()
        .with_max_redirects(3);
    let err = get_document(&client, "moved").await.unwrap_err();

    assert!(matches!(err, OnshapeError::Redirect { .. }));
    assert_eq!(target.state().read().await.request_count, 0);

    server.shutdown().await;
    target.shutdown().await;
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[tokio::test]
async fn test_concurrent_requests_use_distinct_nonces() {
    let server = MockServer::start().await;
    let client = OnshapeClient::new(server.credentials()).unwrap();

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let client = client.clone();
            tokio::spawn(async move { get_document(&client, Fixtures::DOCUMENT_ID).await })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    let state = server.state();
    let state = state.read().await;
    assert_eq!(state.request_count, 10);
    assert_eq!(state.seen_nonces.len(), 10);
    drop(state);

    server.shutdown().await;
}

#[tokio::test]
async fn test_list_trait_for_elements() {
    let server = MockServer::start().await;
    let client = OnshapeClient::new(server.credentials()).unwrap();

    let query = onshapi::ElementsInDocument::new(Fixtures::DOCUMENT_ID, workspace())
        .with_filters(ElementsQuery::of_type("PARTSTUDIO"));
    let elements = onshapi::Element::list(&client, &query).await.unwrap();

    assert_eq!(elements.len(), 1);
    assert!(elements[0].is_part_studio());

    server.shutdown().await;
}
