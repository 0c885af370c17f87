//! Get trait for fetching single entities.

use async_trait::async_trait;

use crate::client::OnshapeClient;
use crate::error::Result;

/// Fetch a single entity.
///
/// Implement this trait for response types that an endpoint returns as one
/// JSON object.
///
/// # Example
///
/// ```ignore
/// use onshapi::{Document, Get, OnshapeClient};
///
/// let client = OnshapeClient::from_env()?;
/// let document = Document::get(&client, "f2dd281fff1cee4d67627c2e".to_string()).await?;
/// ```
#[async_trait]
pub trait Get: Sized {
    /// What addresses the entity (a document id, an element reference).
    type Id: Send;

    /// Fetch the entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not match
    /// the expected shape.
    async fn get(client: &OnshapeClient, id: Self::Id) -> Result<Self>;
}
