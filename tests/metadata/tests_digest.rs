#![allow(clippy::unwrap_used)]

//! Digestion of realistic metadata documents.

use crate::helpers::fixtures::{CATALOG_V4, ORDERS_V2, ORDERS_V4, SAP_NS};
use crate::helpers::model;
use odata::ODataVersion;
use odata::metadata::xml::parse_document;
use odata::metadata::{DigestOptions, Digester, DigestionError, TypeRef, digest};
use rstest::rstest;

#[test]
fn test_modern_document() {
    let model = model(ORDERS_V4);
    assert_eq!(model.version, ODataVersion::V4);
    assert_eq!(model.service_namespace.as_deref(), Some("Example.Orders"));
    assert_eq!(model.entity_types.len(), 2);
    assert_eq!(model.container.name, "OrdersContainer");

    let names: Vec<_> = model.properties("Example.Orders.Order").iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["OrderID", "OrderDate", "CustomerName"]);
    assert!(!model.find_property("Example.Orders.Order", "OrderID").unwrap().nullable);

    let items = model.find_navigation("Example.Orders.Order", "Items").unwrap();
    assert_eq!(items.target, "Example.Orders.Item");
    assert!(items.collection);
    assert_eq!(items.binding.as_deref(), Some("Items"));
}

#[test]
fn test_alias_qualified_names_are_resolved() {
    let model = model(ORDERS_V4);
    assert_eq!(model.namespaces[0].alias.as_deref(), Some("Ord"));
    assert_eq!(
        model.container.entity_sets["Orders"].entity_type,
        "Example.Orders.Order"
    );
    let import = &model.container.function_imports["TopOrders"];
    assert_eq!(import.operation.as_deref(), Some("Example.Orders.TopOrders"));
    assert_eq!(
        import.return_type,
        Some(TypeRef {
            name: "Example.Orders.Order".to_string(),
            collection: true,
        })
    );
}

#[test]
fn test_legacy_document_navigation_through_associations() {
    let model = model(ORDERS_V2);
    assert_eq!(model.version, ODataVersion::V2);
    assert_eq!(model.container.name, "OrdersEntities");

    let items = model.find_navigation("Example.Orders.Order", "Items").unwrap();
    assert_eq!(items.target, "Example.Orders.Item");
    assert!(items.collection);
    assert_eq!(items.binding.as_deref(), Some("Items"));

    let order = model.find_navigation("Example.Orders.Item", "Order").unwrap();
    assert_eq!(order.target, "Example.Orders.Order");
    assert!(!order.collection);
    assert_eq!(order.binding.as_deref(), Some("Orders"));

    let latest = model.container_member("LatestOrder").unwrap();
    assert_eq!(latest.kind_label(), "function import");
    assert_eq!(
        latest.result_type().map(|t| (t.name, t.collection)),
        Some(("Example.Orders.Order".to_string(), false))
    );
}

#[test]
fn test_both_versions_expose_the_same_shape() {
    let modern = model(ORDERS_V4);
    let legacy = model(ORDERS_V2);
    let sets = |m: &odata::metadata::DataModel| -> Vec<String> {
        m.container.entity_sets.keys().cloned().collect()
    };
    assert_eq!(sets(&modern), sets(&legacy));
    assert_eq!(
        modern.keys("Example.Orders.Order"),
        legacy.keys("Example.Orders.Order")
    );
}

#[test]
fn test_stripping_vendor_namespace() {
    let mut root = parse_document(ORDERS_V2).unwrap();
    root.strip_namespaces(&[SAP_NS.to_string()]);

    fn has_sap(element: &odata::metadata::xml::XmlElement) -> bool {
        element.namespace.as_deref() == Some(SAP_NS)
            || element
                .attributes
                .iter()
                .any(|a| a.namespace.as_deref() == Some(SAP_NS))
            || element.children.iter().any(has_sap)
    }
    assert!(!has_sap(&root));

    let stripped = Digester::with_options(DigestOptions {
        strip_namespaces: vec![SAP_NS.to_string()],
    })
    .digest(ORDERS_V2)
    .unwrap();
    assert_eq!(stripped, model(ORDERS_V2));
}

#[test]
fn test_name_collisions_across_schemas() {
    let model = model(CATALOG_V4);
    assert_eq!(model.name_collisions.len(), 1);
    assert_eq!(model.name_collisions[0].name, "Product");
    assert_eq!(
        model.name_collisions[0].namespaces,
        vec!["Catalog.Common".to_string(), "Catalog.Service".to_string()]
    );
    assert!(model.entity_type("Catalog.Common.Product").is_some());
    assert!(model.entity_type("Catalog.Service.Product").is_some());
}

#[test]
fn test_inheritance_and_complex_types() {
    let model = model(CATALOG_V4);
    let supplier = "Catalog.Service.Supplier";

    let names: Vec<_> = model.properties(supplier).iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["ID", "Address", "Rating"]);
    assert_eq!(model.keys(supplier), vec!["ID"]);
    assert!(model.entity_type("Catalog.Service.Party").unwrap().is_abstract);

    let address = model.find_property(supplier, "Address").unwrap();
    assert_eq!(address.type_name, "Catalog.Common.Address");
    let city: Vec<_> = model
        .properties(&address.type_name)
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(city, vec!["Street", "City"]);

    let featured = model.container_member("FeaturedSupplier").unwrap();
    assert_eq!(featured.kind_label(), "singleton");
    assert_eq!(featured.result_type().unwrap().name, supplier);
}

#[rstest]
#[case("<Edmx/>", "Not an EDMX document")]
#[case(
    r#"<edmx:Edmx Version="3.0" xmlns:edmx="http://docs.oasis-open.org/odata/ns/edmx"/>"#,
    "Unsupported EDMX version: 3.0"
)]
#[case(
    r#"<edmx:Edmx Version="4.0" xmlns:edmx="http://docs.oasis-open.org/odata/ns/edmx"/>"#,
    "Missing required element: DataServices"
)]
#[case("<edmx:Edmx Version=\"4.0\" xmlns:edmx=\"http://docs.oasis-open.org/odata/ns/edmx\">", "XML error")]
fn test_rejected_documents(#[case] xml: &str, #[case] message: &str) {
    let err = digest(xml).unwrap_err();
    assert!(err.to_string().starts_with(message), "{err}");
}

#[test]
fn test_unresolved_entity_set_type() {
    let xml = ORDERS_V4.replace(r#"EntityType="Ord.Item""#, r#"EntityType="Ord.Missing""#);
    assert_eq!(
        digest(&xml).unwrap_err(),
        DigestionError::UnresolvedType("Ord.Missing".to_string())
    );
}
