//! Onshape API client library.
//!
//! A Rust library for the Onshape REST API. Every request is signed with an
//! API key pair (HMAC-SHA256 over a canonical request string), and each
//! endpoint's response is deserialized into a typed model.
//!
//! # Quick Start
//!
//! ```no_run
//! use onshapi::{ElementsQuery, OnshapeClient, Scope};
//!
//! #[tokio::main]
//! async fn main() -> onshapi::Result<()> {
//!     // Create client from environment variables
//!     let client = OnshapeClient::from_env()?;
//!
//!     let document = onshapi::get_document(&client, "f2dd281fff1cee4d67627c2e").await?;
//!     println!("Document: {}", document.name);
//!
//!     // List the assemblies in the main workspace
//!     let workspace = Scope::Workspace("606e94ad4692296338edd039".to_string());
//!     let assemblies = onshapi::get_elements_in_document(
//!         &client,
//!         &document.id,
//!         workspace.clone(),
//!         ElementsQuery::of_type("Assembly"),
//!     )
//!     .await?;
//!
//!     for assembly in &assemblies {
//!         let bom =
//!             onshapi::get_bill_of_materials(&client, &document.id, workspace.clone(), &assembly.id)
//!                 .await?;
//!         println!("{}: {} parts", assembly.name, bom.total_quantity());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`RequestSigner`] builds the `Authorization`, `On-Nonce` and `Date`
//!   headers for a request.
//! - [`OnshapeClient`] resolves an [`ApiRequest`] to a URL, signs it, sends
//!   it and checks the response.
//! - The [`Get`] and [`List`] traits are implemented by the response models
//!   ([`Document`], [`Element`], [`Part`], [`BillOfMaterials`]).
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `ONSHAPE_ACCESS_KEY` (required) - API access key
//! - `ONSHAPE_SECRET_KEY` (required) - API secret key
//! - `ONSHAPE_BASE_URL` (optional) - Base URL (defaults to `https://cad.onshape.com`)
//! - `ONSHAPE_DEBUG` (optional) - Log every request URL at info level

mod client;
mod credentials;
mod error;
mod models;
mod nonce;
mod request;
mod signer;
mod traits;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::OnshapeClient;
pub use credentials::{Credentials, DEFAULT_BASE_URL};
pub use error::{OnshapeError, Result};
pub use nonce::{generate_nonce, NONCE_LENGTH};
pub use request::{
    build_query_string, ApiRequest, ElementRef, Query, Scope, Selector, StructuredPath,
};
pub use signer::{
    authorization_value, canonical_string, format_http_date, sign_canonical, RequestSigner,
    DEFAULT_ACCEPT, DEFAULT_CONTENT_TYPE, ON_NONCE,
};

// Re-export traits
pub use traits::{Get, List};

// Re-export models
pub use models::{
    // Document types
    Document,
    Owner,
    Thumbnail,
    UserSummary,
    Workspace,
    // Element types
    Element,
    ElementUnits,
    ElementsInDocument,
    ElementsQuery,
    // Part types
    Part,
    PartAppearance,
    // Bill of materials types
    BillOfMaterials,
    BomAppearance,
    BomHeader,
    BomItem,
    BomSource,
    BomSourceElement,
    BomTable,
    ItemSource,
    Material,
    NamedRef,
    Rgb,
};

// Re-export convenience functions
pub use models::{get_bill_of_materials, get_document, get_elements_in_document, get_parts};
