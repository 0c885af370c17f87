//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data. Fixtures
//! are built from JSON shaped like real Onshape responses, so building them
//! also exercises the model deserializers.

use serde::de::DeserializeOwned;
use serde_json::json;

use crate::request::{ElementRef, Scope};
use crate::{BillOfMaterials, Document, Element, Part};

/// Collection of fixture factories for test data.
pub struct Fixtures;

fn from_json<T: DeserializeOwned>(value: serde_json::Value) -> T {
    serde_json::from_value(value).expect("fixture JSON must match the model")
}

impl Fixtures {
    /// Access key the default scenario expects requests to be signed with.
    pub const ACCESS_KEY: &'static str = "mock-access-key";

    /// Secret key the default scenario expects requests to be signed with.
    pub const SECRET_KEY: &'static str = "mock-secret-key";

    /// Document id of the default scenario.
    pub const DOCUMENT_ID: &'static str = "f2dd281fff1cee4d67627c2e";

    /// Main workspace of the default scenario.
    pub const WORKSPACE_ID: &'static str = "606e94ad4692296338edd039";

    /// Part studio of the default scenario.
    pub const PART_STUDIO_ID: &'static str = "c2494edebdb1eabcaa6a5370";

    /// Assembly of the default scenario.
    pub const ASSEMBLY_ID: &'static str = "e1b650854533c47944c9cb13";

    // =========================================================================
    // Document Fixtures
    // =========================================================================

    /// Create a minimal document with required fields only.
    pub fn minimal_document(id: &str, name: &str) -> Document {
        from_json(json!({ "id": id, "name": name }))
    }

    /// Create a document with a default workspace and owner.
    pub fn document(id: &str, name: &str, workspace_id: &str) -> Document {
        from_json(json!({
            "id": id,
            "name": name,
            "href": format!("https://cad.onshape.com/api/documents/{id}"),
            "jsonType": "document-summary",
            "resourceType": "document",
            "permission": "OWNER",
            "permissionSet": ["READ", "WRITE", "DELETE", "SHARE"],
            "public": false,
            "createdAt": "2021-03-12T15:29:05.000+00:00",
            "modifiedAt": "2021-04-02T09:10:11.000+00:00",
            "owner": { "id": "5f1a2b3c4d5e6f7a8b9c0d1e", "name": "Mock User", "type": 0 },
            "defaultWorkspace": {
                "id": workspace_id,
                "name": "Main",
                "documentId": id,
                "microversion": "8a0b1c2d3e4f5a6b7c8d9e0f",
                "isReadOnly": false
            },
            "tags": [],
            "documentLabels": []
        }))
    }

    // =========================================================================
    // Element Fixtures
    // =========================================================================

    /// Create an element of the given kind ("PARTSTUDIO", "ASSEMBLY", ...).
    pub fn element(id: &str, name: &str, element_type: &str) -> Element {
        from_json(json!({
            "id": id,
            "name": name,
            "elementType": element_type,
            "type": element_type,
            "dataType": "onshape/partstudio",
            "microversionId": "8a0b1c2d3e4f5a6b7c8d9e0f",
            "lengthUnits": "millimeter",
            "angleUnits": "degree",
            "massUnits": "kilogram",
            "filename": null,
            "unupdatable": false
        }))
    }

    // =========================================================================
    // Part Fixtures
    // =========================================================================

    /// Create a solid part.
    pub fn part(part_id: &str, name: &str, element_id: &str) -> Part {
        from_json(json!({
            "partId": part_id,
            "name": name,
            "elementId": element_id,
            "bodyType": "solid",
            "state": "IN_PROGRESS",
            "isHidden": false,
            "isMesh": false,
            "partNumber": null,
            "appearance": { "color": [153, 153, 153], "opacity": 255, "isGenerated": true }
        }))
    }

    // =========================================================================
    // Bill of Materials Fixtures
    // =========================================================================

    /// Create a top-level BOM with one row per `(name, part number, quantity)`.
    ///
    /// Each row carries a custom "Finish" property keyed by property id.
    pub fn bom(assembly: &ElementRef, rows: &[(&str, &str, f64)]) -> BillOfMaterials {
        let items: Vec<serde_json::Value> = rows
            .iter()
            .enumerate()
            .map(|(i, (name, part_number, quantity))| {
                json!({
                    "item": (i + 1).to_string(),
                    "name": name,
                    "partNumber": part_number,
                    "quantity": quantity,
                    "excludeFromBom": false,
                    "5ace8269c046ad612c65a0bb": "Raw",
                    "itemSource": {
                        "documentId": assembly.document_id,
                        "elementId": assembly.element_id,
                        "wvmType": assembly.scope.segment(),
                        "wvmId": assembly.scope.id(),
                        "indentLevel": 0
                    }
                })
            })
            .collect();

        from_json(json!({
            "bomTable": {
                "id": "bom-1",
                "name": "Bill of Materials",
                "type": "Top-level",
                "formatVersion": "1.0.2",
                "headers": [
                    { "name": "Item", "propertyName": "item", "visible": true, "propertyId": "57f3fb8efa3416c06701d623" },
                    { "name": "Quantity", "propertyName": "quantity", "visible": true, "propertyId": "57f3fb8efa3416c06701d624" },
                    { "name": "Finish", "propertyName": "finish", "visible": false, "propertyId": "5ace8269c046ad612c65a0bb" }
                ],
                "items": items
            }
        }))
    }

    // =========================================================================
    // Scenario Builders
    // =========================================================================

    /// Create a default set of test data for common scenarios.
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario::new()
    }
}

/// A complete test scenario: one document with a part studio and an
/// assembly in its main workspace.
pub struct DefaultScenario {
    pub documents: Vec<Document>,
    pub elements: Vec<(String, Scope, Vec<Element>)>,
    pub parts: Vec<(ElementRef, Vec<Part>)>,
    pub boms: Vec<(ElementRef, BillOfMaterials)>,
}

impl DefaultScenario {
    fn new() -> Self {
        let scope = Scope::Workspace(Fixtures::WORKSPACE_ID.to_string());
        let part_studio = ElementRef::new(Fixtures::DOCUMENT_ID, scope.clone(), Fixtures::PART_STUDIO_ID);
        let assembly = ElementRef::new(Fixtures::DOCUMENT_ID, scope.clone(), Fixtures::ASSEMBLY_ID);

        let documents = vec![Fixtures::document(
            Fixtures::DOCUMENT_ID,
            "Toolbox Drawer",
            Fixtures::WORKSPACE_ID,
        )];

        let elements = vec![(
            Fixtures::DOCUMENT_ID.to_string(),
            scope,
            vec![
                Fixtures::element(Fixtures::PART_STUDIO_ID, "Drawer Parts", "PARTSTUDIO"),
                Fixtures::element(Fixtures::ASSEMBLY_ID, "Drawer Assembly", "ASSEMBLY"),
            ],
        )];

        let parts = vec![(
            part_studio,
            vec![
                Fixtures::part("JHD", "Drawer Front", Fixtures::PART_STUDIO_ID),
                Fixtures::part("JHH", "Drawer Side", Fixtures::PART_STUDIO_ID),
                Fixtures::part("JHL", "Drawer Bottom", Fixtures::PART_STUDIO_ID),
            ],
        )];

        let bom = Fixtures::bom(
            &assembly,
            &[
                ("Drawer Front", "PRT-001", 1.0),
                ("Drawer Side", "PRT-002", 2.0),
                ("Drawer Bottom", "PRT-003", 1.0),
            ],
        );

        Self {
            documents,
            elements,
            parts,
            boms: vec![(assembly, bom)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_document() {
        let document = Fixtures::minimal_document("d1", "Test");
        assert_eq!(document.id, "d1");
        assert_eq!(document.name, "Test");
        assert!(document.default_workspace.is_none());
    }

    #[test]
    fn test_bom_fixture_rows() {
        let assembly = ElementRef::new("d1", Scope::Workspace("w1".to_string()), "e1");
        let bom = Fixtures::bom(&assembly, &[("A", "P-1", 2.0), ("B", "P-2", 3.0)]);

        assert_eq!(bom.bom_table.items.len(), 2);
        assert_eq!(bom.total_quantity(), 5.0);
        let source = bom.bom_table.items[1].item_source.as_ref().unwrap();
        assert_eq!(source.element_ref(), Some(assembly));
    }

    #[test]
    fn test_default_scenario() {
        let scenario = Fixtures::default_scenario();
        assert!(!scenario.documents.is_empty());
        assert!(!scenario.elements.is_empty());
        assert!(!scenario.parts.is_empty());
        assert!(!scenario.boms.is_empty());
    }
}
