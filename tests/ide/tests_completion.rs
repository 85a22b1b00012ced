#![allow(clippy::unwrap_used)]

//! Completion while typing requests against the order fixtures.

use crate::helpers::fixtures::{ORDERS_V2, ORDERS_V4};
use crate::helpers::{model, offset_after};
use odata::ide::{CompletionItem, CompletionKind, completions};

fn labels(items: &[CompletionItem]) -> Vec<&str> {
    items.iter().map(|i| i.label.as_ref()).collect()
}

fn complete_end(xml: &str, text: &str) -> Vec<CompletionItem> {
    let model = model(xml);
    completions(text, text.len(), Some(&model))
}

#[test]
fn test_select_lists_properties_then_navigation() {
    let items = complete_end(ORDERS_V4, "https://example.com/orders.svc/Orders?$select=");
    assert_eq!(labels(&items), vec!["OrderID", "OrderDate", "CustomerName", "Items"]);
    assert_eq!(items[0].kind, CompletionKind::Property);
    assert_eq!(items[3].kind, CompletionKind::NavigationProperty);
    assert_eq!(items[3].detail.as_deref(), Some("Collection(Example.Orders.Item)"));
}

#[test]
fn test_select_after_comma_and_partial_word() {
    let items = complete_end(ORDERS_V4, "https://example.com/orders.svc/Orders?$select=OrderID,Cust");
    assert_eq!(labels(&items), vec!["OrderID", "OrderDate", "CustomerName", "Items"]);
}

#[test]
fn test_cursor_in_the_middle_of_the_text() {
    let text = "https://example.com/orders.svc/Orders?$select=&$top=5";
    let model = model(ORDERS_V4);
    let items = completions(text, offset_after(text, "$select="), Some(&model));
    assert_eq!(labels(&items).len(), 4);
}

#[test]
fn test_navigation_path_scopes_members() {
    let items = complete_end(ORDERS_V4, "https://example.com/orders.svc/Orders?$select=Items/");
    assert_eq!(labels(&items), vec!["ItemID", "Quantity", "Price"]);
}

#[test]
fn test_expand_lists_navigation_only() {
    let items = complete_end(ORDERS_V2, "https://example.com/orders.svc/Items?$expand=");
    assert_eq!(labels(&items), vec!["Order"]);
}

#[test]
fn test_nested_expand_scope() {
    let items = complete_end(
        ORDERS_V4,
        "https://example.com/orders.svc/Orders?$expand=Items($select=",
    );
    assert_eq!(labels(&items), vec!["ItemID", "Quantity", "Price"]);
}

#[test]
fn test_filter_offers_members_and_version_functions() {
    let text = "https://example.com/orders.svc/Orders?$filter=";
    let v4 = complete_end(ORDERS_V4, text);
    let v4_labels = labels(&v4);
    assert_eq!(v4_labels[0], "OrderID");
    assert!(v4_labels.contains(&"contains"));
    assert!(!v4_labels.contains(&"substringof"));

    let v2 = complete_end(ORDERS_V2, text);
    let v2_labels = labels(&v2);
    assert!(v2_labels.contains(&"substringof"));
    assert!(!v2_labels.contains(&"contains"));

    let startswith = v4.iter().find(|i| &*i.label == "startswith").unwrap();
    assert_eq!(startswith.kind, CompletionKind::Function);
    assert_eq!(startswith.insert_text.as_deref(), Some("startswith("));
}

#[test]
fn test_system_options_follow_version() {
    let text = "https://example.com/orders.svc/Orders?$";
    let v4 = complete_end(ORDERS_V4, text);
    assert!(labels(&v4).contains(&"$count"));
    assert!(!labels(&v4).contains(&"$inlinecount"));
    assert!(v4.iter().all(|i| i.kind == CompletionKind::QueryOption));

    let v2 = complete_end(ORDERS_V2, "https://example.com/orders.svc/Orders?$top=1&$in");
    assert!(labels(&v2).contains(&"$inlinecount"));
    assert!(!labels(&v2).contains(&"$search"));
}

#[test]
fn test_resource_path_lists_container_members() {
    let items = complete_end(ORDERS_V4, "https://example.com/orders.svc/");
    assert_eq!(labels(&items), vec!["Orders", "Items", "TopOrders"]);
    assert_eq!(items[0].kind, CompletionKind::EntitySet);
    assert_eq!(items[2].kind, CompletionKind::Operation);
}

#[test]
fn test_fixed_values() {
    let items = complete_end(ORDERS_V4, "https://example.com/orders.svc/Orders?$format=");
    assert_eq!(labels(&items), vec!["json", "xml", "atom"]);
    let items = complete_end(ORDERS_V2, "https://example.com/orders.svc/Orders?$inlinecount=");
    assert_eq!(labels(&items), vec!["allpages", "none"]);
}

#[test]
fn test_nothing_for_unknown_resource_or_custom_option() {
    let items = complete_end(ORDERS_V4, "https://example.com/orders.svc/Nope?$select=");
    assert!(items.is_empty());
    let items = complete_end(ORDERS_V4, "https://example.com/orders.svc/Orders?debug=");
    assert!(items.is_empty());
}

#[test]
fn test_without_model() {
    let text = "https://example.com/orders.svc/Orders?$select=";
    assert!(completions(text, text.len(), None).is_empty());

    let text = "https://example.com/orders.svc/Orders?$filter=";
    let items = completions(text, text.len(), None);
    assert!(!items.is_empty());
    assert!(items.iter().all(|i| i.kind == CompletionKind::Function));
}
