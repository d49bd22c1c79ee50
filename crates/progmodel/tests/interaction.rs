mod common;

use common::{build, domain, init_tracing, order_state};
use pretty_assertions::assert_eq;
use tessera_metamodel::{FeatureId, FieldDecl, InvokeError, MethodDecl, ObjectState, TypeDecl, Value, ValueType};
use tessera_progmodel::InteractionError;
use tessera_progmodel::capabilities::{NameSource, NamedKind};
use tessera_progmodel::interaction::{
	choices, default_value, disabled_reason, display_name, invoke, is_hidden, property_value, title,
	validate_proposed,
};

#[test]
fn test_disable_companion_decides_per_instance() {
	init_tracing();
	let graph = build(domain());
	let total = graph.specification_for("Order").unwrap().member("total").unwrap();

	assert_eq!(
		disabled_reason(total, &order_state(-5, "open")).unwrap(),
		Some("negative".to_string())
	);
	assert_eq!(disabled_reason(total, &order_state(5, "open")).unwrap(), None);
}

#[test]
fn test_disable_companion_keeps_member_casing() {
	let invoice = TypeDecl::new("Invoice")
		.field(FieldDecl::new("orderID", ValueType::Int))
		.method(MethodDecl::new("disableOrderID", ValueType::optional(ValueType::Text), |obj, _| {
			let issued = obj.get("orderID").and_then(Value::as_int).is_some_and(|n| n > 0);
			Ok(issued.then_some("already issued").into())
		}));
	let graph = build([invoice]);
	let order_id = graph.specification_for("Invoice").unwrap().member("orderID").unwrap();

	assert_eq!(
		disabled_reason(order_id, &ObjectState::new("Invoice").with("orderID", 7)).unwrap(),
		Some("already issued".to_string())
	);
	assert_eq!(disabled_reason(order_id, &ObjectState::new("Invoice")).unwrap(), None);
}

#[test]
fn test_disabled_chain_falls_through_to_attribute() {
	let graph = build(domain());
	let notes = graph.specification_for("Customer").unwrap().member("notes").unwrap();
	let target = ObjectState::new("Customer");

	assert_eq!(disabled_reason(notes, &target).unwrap(), Some("archived".to_string()));
}

#[test]
fn test_title_and_names() {
	let graph = build(domain());
	let order = graph.specification_for("Order").unwrap();
	let customer = graph.specification_for("Customer").unwrap();

	assert_eq!(title(order, &order_state(42, "open")).unwrap(), "Order 42");
	assert_eq!(title(customer, &ObjectState::new("Customer")).unwrap(), "Customer");

	let name = customer.member("name").unwrap();
	assert_eq!(display_name(name), Some("Full name"));
	assert_eq!(name.capability::<NamedKind>().unwrap().source, NameSource::Attribute);
	assert_eq!(display_name(order.member("total").unwrap()), Some("Total"));
}

#[test]
fn test_validate_proposed_property_value() {
	let graph = build(domain());
	let status = graph.specification_for("Order").unwrap().member("status").unwrap();
	let target = order_state(1, "open");
	let check = |value: Value| validate_proposed(status, &target, &[value]).unwrap();

	assert_eq!(check("closed".into()), None);
	assert_eq!(check("void".into()), Some("void is reserved".to_string()));
	assert_eq!(check("abcdefghijk".into()), Some("may not exceed 10 characters".to_string()));
	assert_eq!(check(Value::Int(3)), Some("expected text, got int".to_string()));
	assert_eq!(check(Value::Nothing), Some("required".to_string()));
}

#[test]
fn test_choices_and_defaults() {
	let graph = build(domain());
	let order = graph.specification_for("Order").unwrap();
	let target = order_state(1, "open");

	let status = order.member("status").unwrap();
	assert_eq!(
		choices(status, &target).unwrap(),
		Some(vec![Value::from("open"), Value::from("closed")])
	);
	assert_eq!(choices(order.member("total").unwrap(), &target).unwrap(), None);

	let place = order.member("place").unwrap();
	let qty = order.parameters(place).next().unwrap();
	assert_eq!(default_value(qty, &target).unwrap(), Some(Value::Int(1)));
	assert_eq!(default_value(status, &target).unwrap(), None);
}

#[test]
fn test_hide_companion() {
	let graph = build(domain());
	let cancel = graph.specification_for("Order").unwrap().member("cancel").unwrap();

	assert!(is_hidden(cancel, &order_state(1, "closed")).unwrap());
	assert!(!is_hidden(cancel, &order_state(1, "open")).unwrap());
}

#[test]
fn test_property_value_reads_backing_field() {
	let graph = build(domain());
	let order = graph.specification_for("Order").unwrap();
	let target = order_state(7, "open");

	assert_eq!(property_value(order.member("total").unwrap(), &target), Some(&Value::Int(7)));
	assert_eq!(property_value(order.member("customer").unwrap(), &target), None);
	assert_eq!(property_value(order.member("place").unwrap(), &target), None);
}

#[test]
fn test_invoke_validates_arguments() {
	let graph = build(domain());
	let order = graph.specification_for("Order").unwrap();
	let target = order_state(1, "open");
	let place = FeatureId::for_type("Order").member("place");

	assert_eq!(
		invoke(order, "place", &target, &[Value::Int(3)]).unwrap(),
		Value::from("placed 3")
	);
	assert_eq!(
		invoke(order, "place", &target, &[Value::Int(0)]),
		Err(InteractionError::Invalid {
			feature: place.param(0),
			reason: "quantity must be positive".into(),
		})
	);
	assert_eq!(
		invoke(order, "place", &target, &[Value::Nothing]),
		Err(InteractionError::Invalid {
			feature: place.param(0),
			reason: "required".into(),
		})
	);
	assert!(matches!(
		invoke(order, "place", &target, &[]),
		Err(InteractionError::Invoke(InvokeError::Arity { expected: 1, found: 0, .. }))
	));
}

#[test]
fn test_invoke_refuses_non_actions_and_surfaces_failures() {
	let graph = build(domain());
	let order = graph.specification_for("Order").unwrap();
	let target = order_state(1, "open");

	assert_eq!(
		invoke(order, "total", &target, &[]),
		Err(InteractionError::NotAnAction {
			feature: FeatureId::for_type("Order").member("total"),
		})
	);
	assert_eq!(
		invoke(order, "archive", &target, &[]),
		Err(InteractionError::Invoke(InvokeError::Failed("archive is offline".into())))
	);
	assert!(matches!(
		invoke(order, "place", &ObjectState::new("Customer"), &[Value::Int(1)]),
		Err(InteractionError::Invoke(InvokeError::WrongTarget { .. }))
	));
}
