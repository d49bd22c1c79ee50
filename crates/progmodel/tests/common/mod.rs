#![allow(dead_code)]

use tessera_metamodel::{
	BuildOutcome, FieldDecl, InvokeError, MethodDecl, Metamodel, ObjectState, TypeDecl, ValidationReport, Value,
	ValueType, build_metamodel,
};
use tessera_progmodel::standard_inputs;

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn text_or_nothing() -> ValueType {
	ValueType::optional(ValueType::Text)
}

fn int_arg(args: &[Value]) -> i64 {
	args.first().and_then(Value::as_int).unwrap_or_default()
}

fn field_text(obj: &ObjectState, field: &str) -> String {
	obj.get(field).and_then(Value::as_text).unwrap_or_default().to_string()
}

pub fn order() -> TypeDecl {
	TypeDecl::new("Order")
		.attr("described-as", "A purchase order")
		.field(FieldDecl::new("total", ValueType::Int))
		.field(FieldDecl::new("status", ValueType::Text).attr("max-length", "10"))
		.field(FieldDecl::new("customer", ValueType::optional(ValueType::object("Customer"))))
		.field(FieldDecl::new("lines", ValueType::list(ValueType::Text)))
		.method(MethodDecl::new("title", ValueType::Text, |obj, _| {
			let total = obj.get("total").and_then(Value::as_int).unwrap_or_default();
			Ok(Value::Text(format!("Order {total}")))
		}))
		.method(MethodDecl::new("disableTotal", text_or_nothing(), |obj, _| {
			let negative = obj.get("total").and_then(Value::as_int).is_some_and(|t| t < 0);
			Ok(negative.then_some("negative").into())
		}))
		.method(
			MethodDecl::new("validateStatus", text_or_nothing(), |_, args| {
				let reserved = args.first().and_then(Value::as_text) == Some("void");
				Ok(reserved.then_some("void is reserved").into())
			})
			.param("status", ValueType::Text),
		)
		.method(MethodDecl::new("choicesStatus", ValueType::list(ValueType::Text), |_, _| {
			Ok(vec!["open", "closed"].into())
		}))
		.method(
			MethodDecl::new("place", ValueType::Text, |_, args| {
				Ok(Value::Text(format!("placed {}", int_arg(args))))
			})
			.param("qty", ValueType::Int),
		)
		.method(
			MethodDecl::new("validate0Place", text_or_nothing(), |_, args| {
				Ok((int_arg(args) <= 0).then_some("quantity must be positive").into())
			})
			.param("qty", ValueType::Int),
		)
		.method(MethodDecl::new("default0Place", ValueType::Int, |_, _| Ok(Value::Int(1))))
		.method(MethodDecl::new("cancel", ValueType::Text, |_, _| Ok("cancelled".into())))
		.method(MethodDecl::new("hideCancel", ValueType::Bool, |obj, _| {
			Ok((field_text(obj, "status") == "closed").into())
		}))
		.method(MethodDecl::new("archive", ValueType::Unit, |_, _| {
			Err(InvokeError::Failed("archive is offline".into()))
		}))
}

pub fn customer() -> TypeDecl {
	TypeDecl::new("Customer")
		.attr("described-as", "Someone who buys")
		.field(FieldDecl::new("name", ValueType::Text).attr("named", "Full name"))
		.field(FieldDecl::new("notes", ValueType::Text).attr("disabled", "archived"))
		.method(MethodDecl::new("disableNotes", text_or_nothing(), |_, _| Ok(Value::Nothing)))
}

/// Reference data: immutable except for `label`.
pub fn country() -> TypeDecl {
	TypeDecl::new("Country")
		.attr("immutable", "reference data")
		.field(FieldDecl::new("code", ValueType::Text))
		.field(FieldDecl::new("label", ValueType::Text).attr("editing", "enabled"))
}

pub fn domain() -> Vec<TypeDecl> {
	vec![order(), customer(), country()]
}

pub fn build(types: impl IntoIterator<Item = TypeDecl>) -> Metamodel {
	let inputs = standard_inputs(types).unwrap();
	match build_metamodel(&inputs).unwrap() {
		BuildOutcome::Valid(graph) => graph,
		BuildOutcome::Invalid(report) => panic!("unexpected rejection:\n{report}"),
	}
}

pub fn reject(types: impl IntoIterator<Item = TypeDecl>) -> ValidationReport {
	let inputs = standard_inputs(types).unwrap();
	match build_metamodel(&inputs).unwrap() {
		BuildOutcome::Valid(_) => panic!("expected rejection"),
		BuildOutcome::Invalid(report) => report,
	}
}

pub fn order_state(total: i64, status: &str) -> ObjectState {
	ObjectState::new("Order").with("total", total).with("status", status)
}
