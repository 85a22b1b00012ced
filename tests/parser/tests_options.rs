#![allow(clippy::unwrap_used)]

//! Structured option values over realistic requests.

use crate::helpers::parsed;
use odata::parser::{
    BinaryOp, Expr, InlineCount, LiteralKind, OptionKind, OptionValue, SelectItem, SortDirection,
    SystemQueryOption,
};
use rstest::rstest;

fn value<'q>(query: &'q odata::ParsedQuery, option: SystemQueryOption) -> &'q OptionValue {
    &query.system_option(option).unwrap().value
}

#[test]
fn test_expand_with_nested_options() {
    let query = parsed(
        "https://services.odata.org/V4/Northwind/Northwind.svc/Orders?$expand=Customer($select=CompanyName;$top=1),Order_Details",
    );
    let OptionValue::Expand(items) = value(&query, SystemQueryOption::Expand) else {
        panic!("expected $expand");
    };
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].path.segments[0].name, "Customer");
    assert_eq!(items[0].options.len(), 2);
    assert_eq!(items[0].options[0].system(), Some(SystemQueryOption::Select));
    assert_eq!(items[0].options[1].value, OptionValue::Top(1));
    assert!(items[1].options.is_empty());
}

#[test]
fn test_orderby_with_arithmetic_and_default_direction() {
    let query = parsed("http://localhost:4004/odata/v4/catalog/Books?$orderby=price mul 2 asc,title");
    let OptionValue::OrderBy(items) = value(&query, SystemQueryOption::OrderBy) else {
        panic!("expected $orderby");
    };
    assert!(matches!(&items[0].expr, Expr::Binary(b) if b.op == BinaryOp::Mul));
    assert_eq!(items[0].direction, SortDirection::Asc);
    assert!(matches!(&items[1].expr, Expr::Property(_)));
    assert_eq!(items[1].direction, SortDirection::Asc);
}

#[rstest]
#[case("OrderDate gt datetime'1997-01-01T00:00:00'", LiteralKind::Typed)]
#[case("ID eq 01234567-89ab-cdef-0123-456789abcdef", LiteralKind::Guid)]
#[case("revenue ge 1000000.50m", LiteralKind::Decimal)]
#[case("Tags eq null", LiteralKind::Null)]
#[case("Discontinued eq false", LiteralKind::Boolean)]
#[case("ShipDate lt 2024-01-31", LiteralKind::Date)]
#[case("Modified gt 2024-01-31T10:00:00Z", LiteralKind::DateTimeOffset)]
#[case("Name eq @p1", LiteralKind::Alias)]
fn test_comparison_literal_kinds(#[case] filter: &str, #[case] kind: LiteralKind) {
    let query = parsed(&format!("https://example.com/orders.svc/Orders?$filter={filter}"));
    let Expr::Binary(binary) = odata_filter(&query) else {
        panic!("expected comparison");
    };
    assert!(binary.op.is_comparison());
    let Expr::Literal(literal) = binary.rhs.as_ref() else {
        panic!("expected literal on the right");
    };
    assert_eq!(literal.kind, kind);
}

fn odata_filter(query: &odata::ParsedQuery) -> &Expr {
    match value(query, SystemQueryOption::Filter) {
        OptionValue::Filter(expr) => expr,
        other => panic!("expected $filter, got {other:?}"),
    }
}

#[test]
fn test_not_binds_tighter_than_and() {
    let query = parsed(
        "https://example.com/orders.svc/Orders?$filter=not (OrderID eq 1) and year(OrderDate) eq 2024",
    );
    let Expr::Binary(and) = odata_filter(&query) else {
        panic!("expected 'and'");
    };
    assert_eq!(and.op, BinaryOp::And);
    assert!(matches!(and.lhs.as_ref(), Expr::Unary(_)));
    let Expr::Binary(eq) = and.rhs.as_ref() else {
        panic!("expected comparison");
    };
    assert!(matches!(eq.lhs.as_ref(), Expr::Call(call) if call.name.name == "year"));
}

#[test]
fn test_scalar_and_raw_options() {
    let query = parsed(
        "https://services.odata.org/V2/Northwind/Northwind.svc/Orders?$inlinecount=allpages&$top=3&$skip=6&$format=json&$skiptoken=abc123",
    );
    assert_eq!(
        value(&query, SystemQueryOption::InlineCount),
        &OptionValue::InlineCount(InlineCount::AllPages)
    );
    assert_eq!(value(&query, SystemQueryOption::Top), &OptionValue::Top(3));
    assert_eq!(value(&query, SystemQueryOption::Skip), &OptionValue::Skip(6));
    assert_eq!(
        value(&query, SystemQueryOption::Format),
        &OptionValue::Format("json".to_string())
    );
    assert_eq!(
        value(&query, SystemQueryOption::SkipToken),
        &OptionValue::SkipToken("abc123".to_string())
    );
}

#[test]
fn test_select_star_and_paths() {
    let query = parsed("https://example.com/orders.svc/Orders?$select=*,Items/Quantity");
    let OptionValue::Select(items) = value(&query, SystemQueryOption::Select) else {
        panic!("expected $select");
    };
    assert!(matches!(items[0], SelectItem::Star(_)));
    let SelectItem::Path(path) = &items[1] else {
        panic!("expected path");
    };
    assert_eq!(path.segments.len(), 2);
}

#[test]
fn test_custom_options_are_kept_verbatim() {
    let query = parsed(
        "https://example.com/sap/opu/odata/sap/API_SALES_ORDER_SRV/A_SalesOrder?$filter=SalesOrderType eq 'OR'&sap-client=100&debug",
    );
    let custom: Vec<_> = query
        .query_options
        .iter()
        .filter(|o| o.kind == OptionKind::Custom)
        .map(|o| (o.name.name.to_string(), o.raw_value.clone()))
        .collect();
    assert_eq!(
        custom,
        vec![
            ("sap-client".to_string(), "100".to_string()),
            ("debug".to_string(), String::new()),
        ]
    );
}

#[rstest]
#[case("$search=don't&$top=1", "$search", "don't")]
#[case("$top=1&note=it's&$skip=2", "note", "it's")]
#[case("$format=json&$skiptoken=o'k&$top=1", "$skiptoken", "o'k")]
fn test_apostrophe_in_free_text_ends_at_ampersand(
    #[case] options: &str,
    #[case] name: &str,
    #[case] raw: &str,
) {
    let query = parsed(&format!("https://example.com/orders.svc/Orders?{options}"));
    assert_eq!(query.query_options.len(), options.split('&').count());
    let option = query
        .query_options
        .iter()
        .find(|o| o.name.name == name)
        .unwrap();
    assert_eq!(option.raw_value, raw);
}

#[test]
fn test_ampersand_inside_string_literal_stays_in_filter() {
    let query = parsed("https://example.com/orders.svc/Orders?$filter=CustomerName eq 'A&B'&$top=1");
    assert_eq!(query.query_options.len(), 2);
    assert_eq!(value(&query, SystemQueryOption::Top), &OptionValue::Top(1));
    let OptionValue::Filter(Expr::Binary(comparison)) = value(&query, SystemQueryOption::Filter) else {
        panic!("expected a comparison");
    };
    assert!(matches!(&*comparison.rhs, Expr::Literal(l) if l.text == "'A&B'"));
}
