//! Element model and trait implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::OnshapeClient;
use crate::error::Result;
use crate::request::{ApiRequest, Query, Scope, StructuredPath};
use crate::traits::List;

/// A tab inside a document: part studio, assembly, drawing, blob, ...
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// The element id.
    pub id: String,

    /// The element (tab) name.
    pub name: String,

    /// Machine-readable kind, e.g. "PARTSTUDIO" or "ASSEMBLY".
    #[serde(default)]
    pub element_type: Option<String>,

    /// Human-readable kind, e.g. "Part Studio".
    #[serde(rename = "type", default)]
    pub type_name: Option<String>,

    /// MIME type for blob elements.
    #[serde(default)]
    pub data_type: Option<String>,

    #[serde(default)]
    pub filename: Option<String>,

    #[serde(default)]
    pub microversion_id: Option<String>,

    #[serde(default)]
    pub foreign_data_id: Option<String>,

    #[serde(default)]
    pub unupdatable: bool,

    #[serde(default)]
    pub specified_unit: Option<String>,

    /// Present when requested with `withThumbnails=true`.
    #[serde(default)]
    pub thumbnail_info: Option<serde_json::Value>,

    #[serde(default)]
    pub thumbnails: Option<serde_json::Value>,

    /// Display units configured for the element.
    #[serde(flatten)]
    pub units: ElementUnits,
}

/// Units configured on an element.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementUnits {
    #[serde(default)]
    pub length_units: Option<String>,
    #[serde(default)]
    pub angle_units: Option<String>,
    #[serde(default)]
    pub mass_units: Option<String>,
    #[serde(default)]
    pub time_units: Option<String>,
    #[serde(default)]
    pub force_units: Option<String>,
    #[serde(default)]
    pub pressure_units: Option<String>,
    #[serde(default)]
    pub moment_units: Option<String>,
    #[serde(default)]
    pub acceleration_units: Option<String>,
    #[serde(default)]
    pub angular_velocity_units: Option<String>,
    #[serde(default)]
    pub energy_units: Option<String>,
    #[serde(default)]
    pub area_units: Option<String>,
    #[serde(default)]
    pub volume_units: Option<String>,
}

impl Element {
    fn is_kind(&self, kind: &str) -> bool {
        self.element_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case(kind))
    }

    pub fn is_assembly(&self) -> bool {
        self.is_kind("ASSEMBLY")
    }

    pub fn is_part_studio(&self) -> bool {
        self.is_kind("PARTSTUDIO")
    }

    pub fn is_drawing(&self) -> bool {
        self.is_kind("DRAWING")
    }
}

/// Optional filters for listing elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementsQuery {
    /// Only elements of this kind (e.g. "Assembly", "PARTSTUDIO").
    pub element_type: Option<String>,
    /// Only the element with this id.
    pub element_id: Option<String>,
    /// Include thumbnail info in each element.
    pub with_thumbnails: Option<bool>,
    /// Document id to use for linked documents.
    pub link_document_id: Option<String>,
}

impl ElementsQuery {
    /// Filter by element type.
    pub fn of_type(element_type: impl Into<String>) -> Self {
        Self {
            element_type: Some(element_type.into()),
            ..Default::default()
        }
    }
}

impl From<&ElementsQuery> for Query {
    fn from(q: &ElementsQuery) -> Self {
        let mut query = Query::new();
        query
            .push_opt("elementType", q.element_type.as_deref())
            .push_opt("elementId", q.element_id.as_deref())
            .push_opt("withThumbnails", q.with_thumbnails)
            .push_opt("linkDocumentId", q.link_document_id.as_deref());
        query
    }
}

/// Which document's elements to list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementsInDocument {
    pub document_id: String,
    pub scope: Scope,
    pub filters: ElementsQuery,
}

impl ElementsInDocument {
    pub fn new(document_id: impl Into<String>, scope: Scope) -> Self {
        Self {
            document_id: document_id.into(),
            scope,
            filters: ElementsQuery::default(),
        }
    }

    #[must_use]
    pub fn with_filters(mut self, filters: ElementsQuery) -> Self {
        self.filters = filters;
        self
    }

    /// The request for `/api/documents/d/{did}/{wvm}/{id}/elements`.
    pub fn request(&self) -> ApiRequest {
        let path = StructuredPath::new("documents", self.document_id.clone())
            .scope(self.scope.clone())
            .subresource("elements");
        let query = Query::from(&self.filters);

        let request = ApiRequest::structured(path);
        if query.is_empty() {
            request
        } else {
            request.with_query(query)
        }
    }
}

#[async_trait]
impl List for Element {
    type Query = ElementsInDocument;

    #[tracing::instrument(skip(client))]
    async fn list(client: &OnshapeClient, query: &Self::Query) -> Result<Vec<Self>> {
        client.get(&query.request()).await
    }
}

/// List the elements of a document at a workspace, version or microversion.
pub async fn get_elements_in_document(
    client: &OnshapeClient,
    document_id: &str,
    scope: Scope,
    filters: ElementsQuery,
) -> Result<Vec<Element>> {
    let query = ElementsInDocument::new(document_id, scope).with_filters(filters);
    Element::list(client, &query).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elements_request_path_and_query() {
        let request = ElementsInDocument::new(
            "f2dd281fff1cee4d67627c2e",
            Scope::Workspace("606e94ad4692296338edd039".to_string()),
        )
        .with_filters(ElementsQuery::of_type("Assembly"))
        .request();

        assert_eq!(
            request.path(),
            "/api/documents/d/f2dd281fff1cee4d67627c2e/w/606e94ad4692296338edd039/elements"
        );
        assert_eq!(request.query_string(), "elementType=Assembly");
    }

    #[test]
    fn test_elements_query_all_filters() {
        let filters = ElementsQuery {
            element_type: Some("PARTSTUDIO".to_string()),
            element_id: Some("e1".to_string()),
            with_thumbnails: Some(false),
            link_document_id: Some("d2".to_string()),
        };
        assert_eq!(
            Query::from(&filters).to_query_string(),
            "elementType=PARTSTUDIO&elementId=e1&withThumbnails=false&linkDocumentId=d2"
        );
    }

    #[test]
    fn test_no_filters_no_query() {
        let request =
            ElementsInDocument::new("d", Scope::Version("v".to_string())).request();
        assert!(request.query().is_none());
        assert_eq!(request.query_string(), "");
    }

    #[test]
    fn test_element_deserialize_with_units() {
        let element: Element = serde_json::from_value(serde_json::json!({
            "id": "e1b650854533c47944c9cb13",
            "name": "Drawer Assembly",
            "elementType": "ASSEMBLY",
            "type": "Assembly",
            "lengthUnits": "millimeter",
            "massUnits": "kilogram",
            "filename": null,
            "unupdatable": false
        }))
        .unwrap();

        assert!(element.is_assembly());
        assert!(!element.is_part_studio());
        assert_eq!(element.units.length_units.as_deref(), Some("millimeter"));
        assert_eq!(element.type_name.as_deref(), Some("Assembly"));
    }
}
