//! Minimal programming model used by the engine's own tests.

use std::sync::{Arc, Mutex};

use crate::build::BuildInputs;
use crate::capability::KindRegistry;
use crate::decl::{BoundMethod, FieldDecl, MethodDecl, TypeDecl, Value, ValueType};
use crate::discovery::{
	DiscoveryContext, DiscoveryUnit, ExpectedSignature, NamingConvention, ParamsRule, Phase,
	ProgrammingModel, ReturnRule, UnitOrder,
};
use crate::error::ProgrammingError;
use crate::identity::FeatureShapes;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guard(pub BoundMethod);

crate::capability_kind!(pub LabelKind => Label, "fixture.label");
crate::capability_kind!(pub GuardKind => Guard, "fixture.guard", Replace);

pub const GUARD: NamingConvention =
	NamingConvention::member("guard", ExpectedSignature::new(ParamsRule::None, ReturnRule::TextOrNothing));

pub fn kinds() -> KindRegistry {
	let mut kinds = KindRegistry::new();
	kinds.register::<LabelKind>().unwrap();
	kinds.register::<GuardKind>().unwrap();
	kinds
}

/// Labels any feature from its `label` attribute.
pub struct AttrLabel;

impl DiscoveryUnit for AttrLabel {
	fn name(&self) -> &'static str {
		"attr-label"
	}

	fn shapes(&self) -> FeatureShapes {
		FeatureShapes::all()
	}

	fn process(&self, cx: &mut DiscoveryContext<'_>) -> Result<(), ProgrammingError> {
		if let Some(text) = cx.declaration().attr("label") {
			cx.attach::<LabelKind>(Label(text.to_string()))?;
		}
		Ok(())
	}
}

/// Labels every feature of its shapes with a fixed text.
pub struct FixedLabel {
	pub name: &'static str,
	pub text: &'static str,
	pub order: UnitOrder,
}

impl DiscoveryUnit for FixedLabel {
	fn name(&self) -> &'static str {
		self.name
	}

	fn shapes(&self) -> FeatureShapes {
		FeatureShapes::TYPE | FeatureShapes::MEMBERS
	}

	fn order(&self) -> UnitOrder {
		self.order
	}

	fn process(&self, cx: &mut DiscoveryContext<'_>) -> Result<(), ProgrammingError> {
		cx.attach::<LabelKind>(Label(self.text.to_string()))?;
		Ok(())
	}
}

/// Binds `guardX` companions.
pub struct GuardCompanion;

impl DiscoveryUnit for GuardCompanion {
	fn name(&self) -> &'static str {
		"guard-companion"
	}

	fn shapes(&self) -> FeatureShapes {
		FeatureShapes::MEMBERS
	}

	fn order(&self) -> UnitOrder {
		UnitOrder::in_phase(Phase::Conventions)
	}

	fn conventions(&self) -> &[NamingConvention] {
		&[GUARD]
	}

	fn process(&self, cx: &mut DiscoveryContext<'_>) -> Result<(), ProgrammingError> {
		if let Some(method) = cx.companion(&GUARD) {
			cx.attach::<GuardKind>(Guard(method))?;
		}
		Ok(())
	}
}

/// Logs `unit:feature` for every visit.
pub struct Recorder {
	pub name: &'static str,
	pub shapes: FeatureShapes,
	pub order: UnitOrder,
	pub log: Arc<Mutex<Vec<String>>>,
}

impl DiscoveryUnit for Recorder {
	fn name(&self) -> &'static str {
		self.name
	}

	fn shapes(&self) -> FeatureShapes {
		self.shapes
	}

	fn order(&self) -> UnitOrder {
		self.order
	}

	fn process(&self, cx: &mut DiscoveryContext<'_>) -> Result<(), ProgrammingError> {
		self.log.lock().unwrap().push(format!("{}:{}", self.name, cx.feature_id()));
		Ok(())
	}
}

pub fn model() -> Arc<ProgrammingModel> {
	let mut builder = ProgrammingModel::builder();
	builder.register(AttrLabel).unwrap();
	builder.register(GuardCompanion).unwrap();
	Arc::new(builder.build())
}

pub fn text_method(name: &str, text: Option<&'static str>) -> MethodDecl {
	MethodDecl::new(name, ValueType::optional(ValueType::Text), move |_, _| Ok(text.into()))
}

/// `Order { total: int, lines: [text] }` with a guarded `total` and a
/// `place(qty)` action.
pub fn order() -> TypeDecl {
	TypeDecl::new("Order")
		.attr("label", "Purchase order")
		.field(FieldDecl::new("total", ValueType::Int).attr("label", "Total"))
		.field(FieldDecl::new("lines", ValueType::list(ValueType::Text)))
		.method(MethodDecl::new("guardTotal", ValueType::optional(ValueType::Text), |obj, _| {
			let negative = obj.get("total").and_then(Value::as_int).is_some_and(|n| n < 0);
			Ok(negative.then_some("negative").into())
		}))
		.method(MethodDecl::new("place", ValueType::Unit, |_, _| Ok(Value::Nothing)).param("qty", ValueType::Int))
}

pub fn customer() -> TypeDecl {
	TypeDecl::new("Customer")
		.attr("label", "Customer")
		.field(FieldDecl::new("name", ValueType::Text))
		.field(FieldDecl::new("last_order", ValueType::optional(ValueType::object("Order"))))
}

pub fn inputs() -> BuildInputs {
	BuildInputs::new(model(), kinds()).with_types([order(), customer()])
}
