//! Part model and trait implementations.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::client::OnshapeClient;
use crate::error::Result;
use crate::request::{ApiRequest, ElementRef, Scope};
use crate::traits::List;

/// A part in a part studio or assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    /// Part id, unique within its element.
    pub part_id: String,

    pub name: String,

    /// Element that defines the part.
    #[serde(default)]
    pub element_id: Option<String>,

    /// "solid", "sheet", "wire", ...
    #[serde(default)]
    pub body_type: Option<String>,

    #[serde(default)]
    pub microversion_id: Option<String>,

    #[serde(default)]
    pub configuration_id: Option<String>,

    #[serde(default)]
    pub thumbnail_configuration_id: Option<String>,

    /// Query string that selects this part in FeatureScript.
    #[serde(default)]
    pub part_query: Option<String>,

    #[serde(default)]
    pub part_number: Option<String>,

    #[serde(default)]
    pub revision: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Release-management state, e.g. "IN_PROGRESS".
    #[serde(default)]
    pub state: Option<String>,

    #[serde(default)]
    pub mesh_state: Option<String>,

    #[serde(default)]
    pub default_color_hash: Option<String>,

    #[serde(default)]
    pub ordinal: Option<i64>,

    #[serde(default)]
    pub is_hidden: bool,

    #[serde(default)]
    pub is_mesh: bool,

    #[serde(default)]
    pub is_flattened_body: bool,

    #[serde(default)]
    pub appearance: Option<PartAppearance>,

    #[serde(default)]
    pub part_identity: Option<String>,

    #[serde(default)]
    pub property_source_types: Option<serde_json::Value>,
}

/// Display color and opacity of a part.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartAppearance {
    /// RGB components, 0-255.
    #[serde(default)]
    pub color: Vec<u8>,
    /// Opacity, 0-255.
    #[serde(default)]
    pub opacity: Option<u8>,
    #[serde(default)]
    pub is_generated: bool,
}

impl Part {
    pub fn is_solid(&self) -> bool {
        self.body_type.as_deref() == Some("solid")
    }
}

#[async_trait]
impl List for Part {
    type Query = ElementRef;

    #[tracing::instrument(skip(client))]
    async fn list(client: &OnshapeClient, element: &Self::Query) -> Result<Vec<Self>> {
        client.get(&ApiRequest::structured(element.path("parts"))).await
    }
}

/// List the parts of an element.
pub async fn get_parts(
    client: &OnshapeClient,
    document_id: &str,
    scope: Scope,
    element_id: &str,
) -> Result<Vec<Part>> {
    Part::list(client, &ElementRef::new(document_id, scope, element_id)).await
}
