//! Walk a document: list its assemblies, then print parts and BOMs.
//!
//! Run with:
//! ```
//! ONSHAPE_ACCESS_KEY=... ONSHAPE_SECRET_KEY=... cargo run --example elements
//! ```

use onshapi::{
    get_bill_of_materials, get_document, get_elements_in_document, get_parts, Credentials,
    ElementsQuery, OnshapeClient, Scope,
};

// Toolbox drawer, main workspace
const DOCUMENT_ID: &str = "f2dd281fff1cee4d67627c2e";
const WORKSPACE_ID: &str = "606e94ad4692296338edd039";

#[tokio::main]
async fn main() -> onshapi::Result<()> {
    tracing_subscriber::fmt::init();

    let credentials = Credentials::from_env()?.with_debug(true);
    let client = OnshapeClient::new(credentials)?;
    println!("Connected to: {}", client.base_url());

    let document = get_document(&client, DOCUMENT_ID).await?;
    println!("Document: {} ({})", document.name, document.id);

    let workspace = Scope::Workspace(WORKSPACE_ID.to_string());

    println!("\n--- Assemblies ---");
    let assemblies = get_elements_in_document(
        &client,
        DOCUMENT_ID,
        workspace.clone(),
        ElementsQuery::of_type("Assembly"),
    )
    .await?;

    for assembly in &assemblies {
        let bom = get_bill_of_materials(&client, DOCUMENT_ID, workspace.clone(), &assembly.id).await?;
        println!("{} [{}]", assembly.name, assembly.id);
        for item in &bom.bom_table.items {
            println!(
                "  {:>4} x {}",
                item.quantity.unwrap_or_default(),
                item.name.as_deref().unwrap_or("<unnamed>")
            );
        }
        println!("  total: {}", bom.total_quantity());
    }

    println!("\n--- Part Studios ---");
    let part_studios = get_elements_in_document(
        &client,
        DOCUMENT_ID,
        workspace.clone(),
        ElementsQuery::of_type("PARTSTUDIO"),
    )
    .await?;

    for studio in &part_studios {
        let parts = get_parts(&client, DOCUMENT_ID, workspace.clone(), &studio.id).await?;
        println!("{}: {} parts", studio.name, parts.len());
        for part in parts.iter().filter(|p| p.is_solid()) {
            println!("  {} [{}]", part.name, part.part_id);
        }
    }

    Ok(())
}
