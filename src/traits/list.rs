//! List trait for fetching collections of entities.

use async_trait::async_trait;

use crate::client::OnshapeClient;
use crate::error::Result;

/// Fetch every entity an endpoint returns as a JSON array.
///
/// Onshape returns these collections in a single response, so there is no
/// paging.
///
/// # Example
///
/// ```ignore
/// use onshapi::{Element, ElementsInDocument, List, OnshapeClient, Scope};
///
/// let client = OnshapeClient::from_env()?;
/// let query = ElementsInDocument::new(
///     "f2dd281fff1cee4d67627c2e",
///     Scope::Workspace("606e94ad4692296338edd039".to_string()),
/// );
/// let elements = Element::list(&client, &query).await?;
/// ```
#[async_trait]
pub trait List: Sized + Send {
    /// Which collection to fetch, plus any filters.
    type Query: Send + Sync;

    /// List entities matching the query.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body does not match
    /// the expected shape.
    async fn list(client: &OnshapeClient, query: &Self::Query) -> Result<Vec<Self>>;
}
