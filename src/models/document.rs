//! Document model and trait implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::OnshapeClient;
use crate::error::Result;
use crate::request::ApiRequest;
use crate::traits::Get;

/// An Onshape document.
///
/// Documents are the top-level containers. Each one holds elements (part
/// studios, assemblies, drawings) across workspaces and versions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// The document id.
    pub id: String,

    /// The document name.
    pub name: String,

    /// API URL of this document.
    #[serde(default)]
    pub href: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub owner: Option<Owner>,

    #[serde(default)]
    pub created_by: Option<UserSummary>,

    #[serde(default)]
    pub modified_by: Option<UserSummary>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub modified_at: Option<DateTime<Utc>>,

    /// The workspace opened by default.
    #[serde(default)]
    pub default_workspace: Option<Workspace>,

    /// The element opened by default.
    #[serde(default)]
    pub default_element_id: Option<String>,

    #[serde(default)]
    pub document_thumbnail_element_id: Option<String>,

    #[serde(default)]
    pub thumbnail: Option<Thumbnail>,

    /// The caller's permission level (e.g. "OWNER").
    #[serde(default)]
    pub permission: Option<String>,

    #[serde(default)]
    pub permission_set: Vec<String>,

    #[serde(default)]
    pub public: bool,

    #[serde(default)]
    pub trash: bool,

    #[serde(default)]
    pub is_mutable: bool,

    #[serde(default)]
    pub is_container: bool,

    #[serde(default)]
    pub is_orphaned: bool,

    #[serde(default)]
    pub is_enterprise_owned: bool,

    #[serde(default)]
    pub not_revision_managed: bool,

    #[serde(default)]
    pub anonymous_access_allowed: bool,

    #[serde(default)]
    pub tags: Vec<serde_json::Value>,

    #[serde(default)]
    pub document_labels: Vec<serde_json::Value>,

    #[serde(default)]
    pub likes: u32,

    #[serde(default)]
    pub number_of_times_copied: u32,

    #[serde(default)]
    pub number_of_times_referenced: u32,

    #[serde(default)]
    pub resource_type: Option<String>,

    #[serde(default)]
    pub json_type: Option<String>,

    #[serde(default)]
    pub project_id: Option<String>,

    #[serde(default)]
    pub parent_id: Option<String>,

    #[serde(default)]
    pub recent_version: Option<serde_json::Value>,
}

/// The owner of a document (a user, company or team).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// Owner kind: 0 user, 1 company, 2 team.
    #[serde(rename = "type", default)]
    pub owner_type: Option<u32>,
    #[serde(default)]
    pub is_enterprise_owned_resource: bool,
}

/// A user reference (creator, last modifier).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub state: Option<u32>,
}

/// A document workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub document_id: Option<String>,
    /// Current microversion of the workspace.
    #[serde(default)]
    pub microversion: Option<String>,
    /// Version this workspace branched from.
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub is_read_only: bool,
    #[serde(default)]
    pub can_delete: bool,
    #[serde(default)]
    pub creator: Option<UserSummary>,
    #[serde(default)]
    pub last_modifier: Option<UserSummary>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified_at: Option<DateTime<Utc>>,
}

/// Thumbnail links for a document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thumbnail {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub sizes: Vec<serde_json::Value>,
}

impl Document {
    /// Id of the default workspace, if the document has one.
    pub fn default_workspace_id(&self) -> Option<&str> {
        self.default_workspace.as_ref().map(|w| w.id.as_str())
    }

    /// Whether the caller can edit this document.
    pub fn is_writable(&self) -> bool {
        self.permission_set.iter().any(|p| p == "WRITE")
    }
}

#[async_trait]
impl Get for Document {
    type Id = String; // Document id

    #[tracing::instrument(skip(client))]
    async fn get(client: &OnshapeClient, document_id: String) -> Result<Self> {
        let path = format!("/api/documents/{}", urlencoding::encode(&document_id));
        client.get(&ApiRequest::raw(path)).await
    }
}

/// Get a document's metadata.
pub async fn get_document(client: &OnshapeClient, document_id: &str) -> Result<Document> {
    Document::get(client, document_id.to_string()).await
}
