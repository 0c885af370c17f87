//! Bill of materials model and trait implementations.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::OnshapeClient;
use crate::error::Result;
use crate::request::{ApiRequest, ElementRef, Scope};
use crate::traits::Get;

/// The bill of materials of an assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillOfMaterials {
    pub bom_table: BomTable,
}

/// BOM columns and rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BomTable {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    /// "Top-level", "Flattened" or "Structured".
    #[serde(rename = "type", default)]
    pub table_type: Option<String>,
    #[serde(default)]
    pub format_version: Option<String>,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub bom_source: Option<BomSource>,
    #[serde(default)]
    pub headers: Vec<BomHeader>,
    #[serde(default)]
    pub items: Vec<BomItem>,
}

/// Where a BOM was generated from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BomSource {
    #[serde(default)]
    pub document: Option<NamedRef>,
    #[serde(default)]
    pub workspace: Option<NamedRef>,
    #[serde(default)]
    pub version: Option<NamedRef>,
    #[serde(default)]
    pub element: Option<BomSourceElement>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub view_href: Option<String>,
    #[serde(default)]
    pub configuration: Option<String>,
}

/// An id plus display name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedRef {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// The assembly element a BOM was generated from.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BomSourceElement {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub element_type: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}

/// A BOM column.
///
/// Built-in columns are keyed in each item by `property_name`; custom
/// property columns by `property_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BomHeader {
    pub name: String,
    #[serde(default)]
    pub property_name: Option<String>,
    #[serde(default)]
    pub property_id: Option<String>,
    #[serde(default)]
    pub visible: bool,
}

/// A BOM row.
///
/// Well-known columns are typed fields. Everything else, including custom
/// properties keyed by their property id, lands in `properties`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BomItem {
    #[serde(default)]
    pub item: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub part_number: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub revision: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub product_line: Option<String>,
    #[serde(default)]
    pub material: Option<Material>,
    #[serde(default)]
    pub appearance: Option<BomAppearance>,
    #[serde(default)]
    pub bom_behavior: Option<String>,
    #[serde(default)]
    pub exclude_from_bom: bool,
    #[serde(default)]
    pub not_revision_managed: bool,
    #[serde(default)]
    pub item_source: Option<ItemSource>,

    /// Remaining columns keyed by property name or property id.
    #[serde(flatten)]
    pub properties: BTreeMap<String, serde_json::Value>,
}

/// A part material.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub library_name: Option<String>,
    #[serde(default)]
    pub properties: Vec<serde_json::Value>,
}

/// Appearance of a BOM row's part.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BomAppearance {
    #[serde(default)]
    pub color: Option<Rgb>,
    #[serde(default)]
    pub opacity: Option<u8>,
    #[serde(default)]
    pub is_generated: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

/// Where a BOM row's part is defined.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSource {
    #[serde(default)]
    pub document_id: Option<String>,
    #[serde(default)]
    pub element_id: Option<String>,
    #[serde(default)]
    pub part_id: Option<String>,
    /// "w", "v" or "m".
    #[serde(default)]
    pub wvm_type: Option<String>,
    #[serde(default)]
    pub wvm_id: Option<String>,
    #[serde(default)]
    pub configuration: Option<String>,
    #[serde(default)]
    pub full_configuration: Option<String>,
    #[serde(default)]
    pub view_href: Option<String>,
    #[serde(default)]
    pub is_standard_content: bool,
    #[serde(default)]
    pub related_occurrences: Vec<String>,
    #[serde(default)]
    pub indent_level: u32,
}

impl ItemSource {
    /// The source element as an addressable reference.
    pub fn element_ref(&self) -> Option<ElementRef> {
        let scope = Scope::from_segment(self.wvm_type.as_deref()?, self.wvm_id.clone()?)?;
        Some(ElementRef::new(
            self.document_id.clone()?,
            scope,
            self.element_id.clone()?,
        ))
    }
}

impl BomItem {
    /// Value of a column not covered by the typed fields.
    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.get(key)
    }

    /// Value of a column as a string, if it is one.
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.property(key).and_then(|v| v.as_str())
    }

    /// Value of the column described by `header`.
    ///
    /// Looks the row up by property id first, then by property name.
    pub fn value_for(&self, header: &BomHeader) -> Option<&serde_json::Value> {
        header
            .property_id
            .as_deref()
            .and_then(|id| self.property(id))
            .or_else(|| header.property_name.as_deref().and_then(|n| self.property(n)))
    }
}

impl BomTable {
    /// The column for a property id.
    pub fn header_for(&self, property_id: &str) -> Option<&BomHeader> {
        self.headers
            .iter()
            .find(|h| h.property_id.as_deref() == Some(property_id))
    }

    /// Columns shown in the Onshape UI.
    pub fn visible_headers(&self) -> impl Iterator<Item = &BomHeader> {
        self.headers.iter().filter(|h| h.visible)
    }
}

impl BillOfMaterials {
    /// Sum of quantities over rows not excluded from the BOM.
    pub fn total_quantity(&self) -> f64 {
        self.bom_table
            .items
            .iter()
            .filter(|i| !i.exclude_from_bom)
            .filter_map(|i| i.quantity)
            .sum()
    }
}

#[async_trait]
impl Get for BillOfMaterials {
    type Id = ElementRef; // Assembly element

    #[tracing::instrument(skip(client))]
    async fn get(client: &OnshapeClient, assembly: ElementRef) -> Result<Self> {
        let path = assembly.path("assemblies").subresource("bom");
        client.get(&ApiRequest::structured(path)).await
    }
}

/// Get the bill of materials of an assembly.
pub async fn get_bill_of_materials(
    client: &OnshapeClient,
    document_id: &str,
    scope: Scope,
    element_id: &str,
) -> Result<BillOfMaterials> {
    BillOfMaterials::get(client, ElementRef::new(document_id, scope, element_id)).await
}
