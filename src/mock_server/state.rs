//! Mock server state management.
//!
//! Provides the in-memory data store for the mock Onshape API server, and
//! the server-side half of the request signature check.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum::http::HeaderMap;
use tokio::sync::RwLock;

use crate::request::{ElementRef, Scope};
use crate::signer::{authorization_value, canonical_string, sign_canonical};
use crate::{BillOfMaterials, Document, Element, Part};

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// Documents indexed by id.
    pub documents: HashMap<String, Document>,

    /// Elements indexed by document id and scope.
    pub elements: HashMap<(String, Scope), Vec<Element>>,

    /// Parts indexed by element.
    pub parts: HashMap<ElementRef, Vec<Part>>,

    /// Bills of materials indexed by assembly element.
    pub boms: HashMap<ElementRef, BillOfMaterials>,

    /// Paths answered with a 307 to the mapped location.
    pub redirects: HashMap<String, String>,

    /// API keys (access, secret) requests must be signed with. When unset,
    /// signatures are not checked.
    pub api_keys: Option<(String, String)>,

    /// Nonces already accepted; a repeat is rejected as a replay.
    pub seen_nonces: HashSet<String>,

    /// Number of API requests received, including rejected ones.
    pub request_count: usize,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a document to the state.
    pub fn with_document(mut self, document: Document) -> Self {
        self.documents.insert(document.id.clone(), document);
        self
    }

    /// Add the elements of a document at a scope.
    pub fn with_elements(mut self, document_id: &str, scope: Scope, elements: Vec<Element>) -> Self {
        self.elements
            .insert((document_id.to_string(), scope), elements);
        self
    }

    /// Add the parts of an element.
    pub fn with_parts(mut self, element: ElementRef, parts: Vec<Part>) -> Self {
        self.parts.insert(element, parts);
        self
    }

    /// Add the bill of materials of an assembly.
    pub fn with_bom(mut self, assembly: ElementRef, bom: BillOfMaterials) -> Self {
        self.boms.insert(assembly, bom);
        self
    }

    /// Answer `path` with a 307 pointing at `location`.
    pub fn with_redirect(mut self, path: &str, location: &str) -> Self {
        self.redirects
            .insert(path.to_string(), location.to_string());
        self
    }

    /// Require requests to be signed with these keys.
    pub fn with_api_keys(mut self, access_key: &str, secret_key: &str) -> Self {
        self.api_keys = Some((access_key.to_string(), secret_key.to_string()));
        self
    }

    /// Get a document by id.
    pub fn get_document(&self, id: &str) -> Option<&Document> {
        self.documents.get(id)
    }

    /// List the elements of a document, filtered by type and id.
    pub fn list_elements(
        &self,
        document_id: &str,
        scope: &Scope,
        element_type: Option<&str>,
        element_id: Option<&str>,
    ) -> Option<Vec<&Element>> {
        let elements = self
            .elements
            .get(&(document_id.to_string(), scope.clone()))?;
        Some(
            elements
                .iter()
                .filter(|e| {
                    element_type
                        .map(|t| {
                            e.element_type
                                .as_deref()
                                .is_some_and(|et| et.eq_ignore_ascii_case(t))
                        })
                        .unwrap_or(true)
                })
                .filter(|e| element_id.map(|id| e.id == id).unwrap_or(true))
                .collect(),
        )
    }

    /// Get the parts of an element.
    pub fn get_parts(&self, element: &ElementRef) -> Option<&Vec<Part>> {
        self.parts.get(element)
    }

    /// Get the bill of materials of an assembly.
    pub fn get_bom(&self, assembly: &ElementRef) -> Option<&BillOfMaterials> {
        self.boms.get(assembly)
    }

    /// Check a GET request's signature the way the Onshape server does.
    ///
    /// `path` and `query` are exactly as received. On success the nonce is
    /// recorded so a replay fails.
    pub fn verify_signature(
        &mut self,
        headers: &HeaderMap,
        path: &str,
        query: &str,
    ) -> Result<(), String> {
        let Some((access_key, secret_key)) = &self.api_keys else {
            return Ok(());
        };

        let nonce = required_header(headers, "on-nonce")?;
        let date = required_header(headers, "date")?;
        let content_type = required_header(headers, "content-type")?;
        let authorization = required_header(headers, "authorization")?;

        let canonical = canonical_string("GET", nonce, date, content_type, path, query);
        let expected = authorization_value(access_key, &sign_canonical(secret_key, &canonical));
        if authorization != expected {
            return Err("signature mismatch".to_string());
        }

        if !self.seen_nonces.insert(nonce.to_string()) {
            return Err(format!("nonce {nonce} already used"));
        }
        Ok(())
    }
}

fn required_header<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| format!("missing {name} header"))
}
