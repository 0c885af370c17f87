//! Request descriptors and the path/query builders.
//!
//! A request names its endpoint either through a [`StructuredPath`]
//! (`/api/{resource}/d/{did}/{w|v|m}/{id}/e/{eid}/{subresource}`) or a raw
//! path, chosen explicitly with [`Selector`].

use std::fmt;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use url::form_urlencoded;

use crate::error::{OnshapeError, Result};

/// Which point in a document's history a request is pinned to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    Workspace(String),
    Version(String),
    Microversion(String),
}

impl Scope {
    /// Path segment letter for this scope (`w`, `v` or `m`).
    pub fn segment(&self) -> &'static str {
        match self {
            Self::Workspace(_) => "w",
            Self::Version(_) => "v",
            Self::Microversion(_) => "m",
        }
    }

    /// The workspace, version or microversion id.
    pub fn id(&self) -> &str {
        match self {
            Self::Workspace(id) | Self::Version(id) | Self::Microversion(id) => id,
        }
    }

    /// Build a scope from its path segment letter.
    pub fn from_segment(segment: &str, id: impl Into<String>) -> Option<Self> {
        match segment {
            "w" => Some(Self::Workspace(id.into())),
            "v" => Some(Self::Version(id.into())),
            "m" => Some(Self::Microversion(id.into())),
            _ => None,
        }
    }

    /// Pick a scope out of loosely-typed optional ids.
    ///
    /// Workspace wins over version, version over microversion. Supplying
    /// more than one is a caller bug and is logged.
    pub fn first_of(
        workspace: Option<&str>,
        version: Option<&str>,
        microversion: Option<&str>,
    ) -> Option<Self> {
        let supplied = [workspace, version, microversion]
            .iter()
            .filter(|s| s.is_some())
            .count();
        if supplied > 1 {
            tracing::warn!(
                supplied,
                "more than one of workspace/version/microversion supplied; using the first"
            );
        }

        workspace
            .map(|id| Self::Workspace(id.to_string()))
            .or_else(|| version.map(|id| Self::Version(id.to_string())))
            .or_else(|| microversion.map(|id| Self::Microversion(id.to_string())))
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.segment(), self.id())
    }
}

/// A `/api/{resource}/d/{document}/...` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredPath {
    pub resource: String,
    pub document_id: String,
    pub scope: Option<Scope>,
    pub element_id: Option<String>,
    pub subresource: Option<String>,
}

impl StructuredPath {
    pub fn new(resource: impl Into<String>, document_id: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            document_id: document_id.into(),
            scope: None,
            element_id: None,
            subresource: None,
        }
    }

    #[must_use]
    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    #[must_use]
    pub fn element(mut self, element_id: impl Into<String>) -> Self {
        self.element_id = Some(element_id.into());
        self
    }

    #[must_use]
    pub fn subresource(mut self, subresource: impl Into<String>) -> Self {
        self.subresource = Some(subresource.into());
        self
    }

    /// Render the canonical URL path.
    pub fn build(&self) -> String {
        let mut path = format!(
            "/api/{}/d/{}",
            self.resource,
            urlencoding::encode(&self.document_id)
        );
        if let Some(scope) = &self.scope {
            path.push('/');
            path.push_str(scope.segment());
            path.push('/');
            path.push_str(&urlencoding::encode(scope.id()));
        }
        if let Some(element_id) = &self.element_id {
            path.push_str("/e/");
            path.push_str(&urlencoding::encode(element_id));
        }
        if let Some(subresource) = &self.subresource {
            path.push('/');
            path.push_str(subresource);
        }
        path
    }
}

/// An element pinned to a workspace, version or microversion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementRef {
    pub document_id: String,
    pub scope: Scope,
    pub element_id: String,
}

impl ElementRef {
    pub fn new(
        document_id: impl Into<String>,
        scope: Scope,
        element_id: impl Into<String>,
    ) -> Self {
        Self {
            document_id: document_id.into(),
            scope,
            element_id: element_id.into(),
        }
    }

    /// The `/api/{resource}/d/../e/{eid}` path for this element.
    pub fn path(&self, resource: &str) -> StructuredPath {
        StructuredPath::new(resource, self.document_id.clone())
            .scope(self.scope.clone())
            .element(self.element_id.clone())
    }
}

/// How a request names its endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    Structured(StructuredPath),
    /// A path starting at `/api/...`, used verbatim.
    Raw { path: String },
}

/// Ordered query parameters. Keys are sent in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter.
    pub fn push(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.pairs.push((key.into(), value.to_string()));
        self
    }

    /// Append a parameter only when a value is present.
    pub fn push_opt<V: ToString>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Form-encode the parameters, without a leading `?`.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }

    /// Parse a raw query string (without `?`), e.g. from a redirect target.
    pub fn parse(raw: &str) -> Self {
        form_urlencoded::parse(raw.as_bytes()).into_owned().collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Query {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Build the query string for optional parameters. Absent → `""`.
pub fn build_query_string(query: Option<&Query>) -> String {
    query.map(Query::to_query_string).unwrap_or_default()
}

/// A single GET against the Onshape API.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    selector: Selector,
    query: Option<Query>,
    headers: HeaderMap,
    base_url: Option<String>,
}

impl ApiRequest {
    pub fn new(selector: Selector) -> Self {
        Self {
            selector,
            query: None,
            headers: HeaderMap::new(),
            base_url: None,
        }
    }

    pub fn structured(path: StructuredPath) -> Self {
        Self::new(Selector::Structured(path))
    }

    pub fn raw(path: impl Into<String>) -> Self {
        Self::new(Selector::Raw { path: path.into() })
    }

    #[must_use]
    pub fn with_query(mut self, query: Query) -> Self {
        self.query = Some(query);
        self
    }

    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Add one header.
    ///
    /// # Errors
    ///
    /// Returns [`OnshapeError::InvalidHeader`] if the name or value is not
    /// valid on the wire.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| OnshapeError::InvalidHeader(e.to_string()))?;
        let value =
            HeaderValue::from_str(value).map_err(|e| OnshapeError::InvalidHeader(e.to_string()))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Send this request to another host instead of the client's.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }

    pub fn query(&self) -> Option<&Query> {
        self.query.as_ref()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// The URL path this request resolves to.
    pub fn path(&self) -> String {
        match &self.selector {
            Selector::Raw { path } => path.clone(),
            Selector::Structured(structured) => structured.build(),
        }
    }

    /// The encoded query string, without `?`.
    pub fn query_string(&self) -> String {
        build_query_string(self.query.as_ref())
    }
}
