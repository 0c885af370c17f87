//! Mock Onshape API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the Onshape
//! API for integration and end-to-end testing. Unlike wiremock which mocks at
//! the HTTP level per-test, this server maintains state across requests and
//! verifies request signatures the way the real server does, including
//! rejecting replayed nonces.
//!
//! # Example
//!
//! ```ignore
//! use onshapi::mock_server::{Fixtures, MockServer};
//! use onshapi::{get_document, Credentials, OnshapeClient};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = OnshapeClient::new(server.credentials()).unwrap();
//!
//!     // Server comes with default fixtures
//!     let document = get_document(&client, Fixtures::DOCUMENT_ID).await.unwrap();
//!     assert_eq!(document.name, "Toolbox Drawer");
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures};
pub use server::MockServer;
pub use state::MockState;
