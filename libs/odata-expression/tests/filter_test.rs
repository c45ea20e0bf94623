//! End-to-end `$filter` tests against a small customer/order model.

use odata_expression::{parse_filter, FilterInfo, NativeExpressionRenderer};
use odata_metadata::{EdmType, ResourceProperty, ResourcePropertyKind, ResourceType};
use std::sync::Arc;

/// Customer entity with a complex Address, a Boss self-reference and an
/// Orders set reference.
fn customer_type() -> Arc<ResourceType> {
    let address = ResourceType::complex("Sample", "Address", "Address");
    address
        .add_property(
            ResourceProperty::new(
                "City",
                None,
                ResourcePropertyKind::PRIMITIVE,
                ResourceType::primitive(EdmType::String),
            )
            .unwrap(),
        )
        .unwrap();

    let order = ResourceType::entity("Sample", "Order", "Order");
    order
        .add_property(
            ResourceProperty::new(
                "OrderId",
                None,
                ResourcePropertyKind::PRIMITIVE.with_key(),
                ResourceType::primitive(EdmType::Int32),
            )
            .unwrap(),
        )
        .unwrap();

    let customer = ResourceType::entity("Sample", "Customer", "Customer");
    let add = |property: ResourceProperty| customer.add_property(property).unwrap();
    add(ResourceProperty::new(
        "CustomerId",
        None,
        ResourcePropertyKind::PRIMITIVE.with_key(),
        ResourceType::primitive(EdmType::String),
    )
    .unwrap());
    add(ResourceProperty::new(
        "Name",
        None,
        ResourcePropertyKind::PRIMITIVE,
        ResourceType::primitive(EdmType::String),
    )
    .unwrap());
    add(ResourceProperty::new(
        "Age",
        None,
        ResourcePropertyKind::PRIMITIVE,
        ResourceType::primitive(EdmType::Int32),
    )
    .unwrap());
    add(ResourceProperty::new(
        "Address",
        None,
        ResourcePropertyKind::COMPLEX_TYPE,
        Arc::clone(&address),
    )
    .unwrap());
    add(ResourceProperty::new(
        "Boss",
        None,
        ResourcePropertyKind::RESOURCE_REFERENCE,
        Arc::clone(&customer),
    )
    .unwrap());
    add(ResourceProperty::new(
        "Orders",
        None,
        ResourcePropertyKind::RESOURCESET_REFERENCE,
        order,
    )
    .unwrap());
    customer
}

fn run(text: &str) -> odata_common::Result<FilterInfo> {
    parse_filter(text, &customer_type(), &NativeExpressionRenderer::new())
}

#[test]
fn simple_predicate_has_no_navigation_chains() {
    let info = run("Age gt 18").unwrap();
    assert_eq!(info.expression(), "(Age > 18)");
    assert!(info.navigation_chains().is_none());
}

#[test]
fn empty_filter_text_yields_empty_info() {
    let info = run("   ").unwrap();
    assert_eq!(info.expression(), "");
    assert!(info.navigation_chains().is_none());
}

#[test]
fn navigation_path_records_one_chain() {
    let info = run("Boss/Age gt 18").unwrap();
    assert_eq!(info.expression(), "(Boss.Age > 18)");
    let chains = info.navigation_chains().unwrap();
    assert_eq!(chains.len(), 1);
    assert_eq!(chains[0].as_slice(), ["Boss".to_string()]);
}

#[test]
fn repeated_navigation_paths_are_deduplicated() {
    let info = run("Boss/Age gt 18 and Boss/Name eq 'Ann'").unwrap();
    assert_eq!(info.navigation_chains().unwrap().len(), 1);
}

#[test]
fn multi_hop_navigation_records_ordered_chain() {
    let info = run("Boss/Boss/Age gt 60").unwrap();
    let chains = info.navigation_chains().unwrap();
    assert_eq!(chains[0].as_slice(), ["Boss".to_string(), "Boss".to_string()]);
}

#[test]
fn complex_traversal_is_not_a_navigation_chain() {
    let info = run("Address/City eq 'Redmond'").unwrap();
    assert_eq!(info.expression(), "(Address.City == 'Redmond')");
    assert!(info.navigation_chains().is_none());
}

#[test]
fn unknown_property_is_a_bad_request_naming_the_property() {
    let err = run("Salary gt 18").unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert!(err.message().contains("Salary"), "message: {}", err.message());
}

#[test]
fn set_reference_cannot_be_traversed() {
    let err = run("Orders/OrderId eq 1").unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert!(err.message().contains("Orders"));
}

#[test]
fn type_errors_surface_as_bad_request() {
    let err = run("Name gt 5").unwrap_err();
    assert_eq!(err.status_code(), 400);
}

#[test]
fn string_functions_render_as_calls() {
    let info = run("startswith(Name, 'A') and length(Name) gt 2").unwrap();
    assert_eq!(
        info.expression(),
        "(startswith(Name, 'A') && (length(Name) > 2))"
    );
}

#[test]
fn not_and_grouping_render_with_native_operators() {
    let info = run("not (Age ge 18 or Name eq 'Ann')").unwrap();
    assert_eq!(info.expression(), "!(((Age >= 18) || (Name == 'Ann')))");
}
