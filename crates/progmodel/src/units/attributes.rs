//! Units driven by declaration attributes.

use tessera_metamodel::{DiscoveryContext, DiscoveryUnit, FeatureShapes, Phase, ProgrammingError, UnitOrder};

use crate::capabilities::{
	CssClass, CssClassKind, DescribedAs, DescribedAsKind, Disabled, DisabledKind, EditingKind,
	EditingPolicy, Hidden, HiddenKind, Immutable, ImmutableKind, MaxLength, MaxLengthKind, NameSource,
	Named, NamedKind, Optionality, OptionalityKind,
};

const METADATA: UnitOrder = UnitOrder::in_phase(Phase::Metadata);

/// Reads a boolean-ish attribute value. An empty value means `true`.
fn flag(value: &str) -> Option<bool> {
	match value.trim() {
		"" | "true" => Some(true),
		"false" => Some(false),
		_ => None,
	}
}

/// `named = "..."` overrides the identifier-derived name.
pub struct NamedAttribute;

impl DiscoveryUnit for NamedAttribute {
	fn name(&self) -> &'static str {
		"named-attribute"
	}

	fn shapes(&self) -> FeatureShapes {
		FeatureShapes::all()
	}

	fn order(&self) -> UnitOrder {
		METADATA
	}

	fn process(&self, cx: &mut DiscoveryContext<'_>) -> Result<(), ProgrammingError> {
		if let Some(text) = cx.declaration().attr("named") {
			cx.attach::<NamedKind>(Named::new(text, NameSource::Attribute))?;
		}
		Ok(())
	}
}

pub struct DescribedAsAttribute;

impl DiscoveryUnit for DescribedAsAttribute {
	fn name(&self) -> &'static str {
		"described-as"
	}

	fn shapes(&self) -> FeatureShapes {
		FeatureShapes::all()
	}

	fn order(&self) -> UnitOrder {
		METADATA
	}

	fn process(&self, cx: &mut DiscoveryContext<'_>) -> Result<(), ProgrammingError> {
		if let Some(text) = cx.declaration().attr("described-as") {
			cx.attach::<DescribedAsKind>(DescribedAs { text: text.to_string() })?;
		}
		Ok(())
	}
}

pub struct CssClassAttribute;

impl DiscoveryUnit for CssClassAttribute {
	fn name(&self) -> &'static str {
		"css-class"
	}

	fn shapes(&self) -> FeatureShapes {
		FeatureShapes::TYPE | FeatureShapes::MEMBERS
	}

	fn order(&self) -> UnitOrder {
		METADATA
	}

	fn process(&self, cx: &mut DiscoveryContext<'_>) -> Result<(), ProgrammingError> {
		if let Some(class) = cx.declaration().attr("css-class") {
			cx.attach::<CssClassKind>(CssClass { class: class.to_string() })?;
		}
		Ok(())
	}
}

/// Marks a type immutable from `immutable` or `editing = "disabled"`.
///
/// A non-boolean `immutable` value is taken as the reason. Type-level
/// `editing` accepts the same values as on fields.
pub struct ImmutableAttribute;

impl DiscoveryUnit for ImmutableAttribute {
	fn name(&self) -> &'static str {
		"immutable"
	}

	fn shapes(&self) -> FeatureShapes {
		FeatureShapes::TYPE
	}

	fn order(&self) -> UnitOrder {
		METADATA
	}

	fn process(&self, cx: &mut DiscoveryContext<'_>) -> Result<(), ProgrammingError> {
		let decl = cx.declaration();
		let editing = decl.attr("editing");
		if let Some(other) = editing.filter(|v| !matches!(*v, "enabled" | "disabled")) {
			cx.report(format!("unsupported editing value {other:?}"));
		}
		let immutable = match decl.attr("immutable") {
			Some(value) => match flag(value) {
				Some(true) => Some(Immutable { reason: None }),
				Some(false) => None,
				None => Some(Immutable {
					reason: Some(value.to_string()),
				}),
			},
			None => (editing == Some("disabled")).then_some(Immutable { reason: None }),
		};
		if let Some(immutable) = immutable {
			cx.attach::<ImmutableKind>(immutable)?;
		}
		Ok(())
	}
}

/// Per-field `editing = "enabled" | "disabled"`.
///
/// `enabled` opts the field out of type-level immutability; `disabled`
/// disables the field outright.
pub struct EditingAttribute;

impl DiscoveryUnit for EditingAttribute {
	fn name(&self) -> &'static str {
		"editing"
	}

	fn shapes(&self) -> FeatureShapes {
		FeatureShapes::FIELDS
	}

	fn order(&self) -> UnitOrder {
		METADATA
	}

	fn process(&self, cx: &mut DiscoveryContext<'_>) -> Result<(), ProgrammingError> {
		let Some(value) = cx.declaration().attr("editing") else {
			return Ok(());
		};
		match value {
			"enabled" => {
				cx.attach::<EditingKind>(EditingPolicy::Enabled)?;
			}
			"disabled" => {
				cx.attach::<EditingKind>(EditingPolicy::Disabled)?;
				cx.attach::<DisabledKind>(Disabled::Always {
					reason: "not editable".to_string(),
				})?;
			}
			other => cx.report(format!("unsupported editing value {other:?}")),
		}
		Ok(())
	}
}

pub struct MaxLengthAttribute;

impl DiscoveryUnit for MaxLengthAttribute {
	fn name(&self) -> &'static str {
		"max-length"
	}

	fn shapes(&self) -> FeatureShapes {
		FeatureShapes::FIELDS | FeatureShapes::PARAMETER
	}

	fn order(&self) -> UnitOrder {
		METADATA
	}

	fn process(&self, cx: &mut DiscoveryContext<'_>) -> Result<(), ProgrammingError> {
		let Some(value) = cx.declaration().attr("max-length") else {
			return Ok(());
		};
		match value.trim().parse::<u32>() {
			Ok(limit) if limit > 0 => {
				cx.attach::<MaxLengthKind>(MaxLength { limit })?;
			}
			_ => cx.report(format!("max-length must be a positive integer, got {value:?}")),
		}
		Ok(())
	}
}

/// Mandatory unless the declared type is optional or `optional` is set.
pub struct OptionalityAttribute;

impl DiscoveryUnit for OptionalityAttribute {
	fn name(&self) -> &'static str {
		"optionality"
	}

	fn shapes(&self) -> FeatureShapes {
		FeatureShapes::PROPERTY | FeatureShapes::PARAMETER
	}

	fn order(&self) -> UnitOrder {
		METADATA
	}

	fn process(&self, cx: &mut DiscoveryContext<'_>) -> Result<(), ProgrammingError> {
		let declared_optional = cx.value_type().required() != cx.value_type();
		let optional = match cx.declaration().attr("optional") {
			Some(value) => match flag(value) {
				Some(on) => on,
				None => {
					cx.report(format!("unsupported optional value {value:?}"));
					declared_optional
				}
			},
			None => declared_optional,
		};
		let optionality = if optional {
			Optionality::Optional
		} else {
			Optionality::Mandatory
		};
		cx.attach::<OptionalityKind>(optionality)?;
		Ok(())
	}
}

/// `disabled` on a member; a non-boolean value is the reason.
pub struct DisabledAttribute;

impl DiscoveryUnit for DisabledAttribute {
	fn name(&self) -> &'static str {
		"disabled"
	}

	fn shapes(&self) -> FeatureShapes {
		FeatureShapes::MEMBERS
	}

	fn order(&self) -> UnitOrder {
		METADATA
	}

	fn process(&self, cx: &mut DiscoveryContext<'_>) -> Result<(), ProgrammingError> {
		let Some(value) = cx.declaration().attr("disabled") else {
			return Ok(());
		};
		let reason = match flag(value) {
			Some(false) => return Ok(()),
			Some(true) => "disabled".to_string(),
			None => value.to_string(),
		};
		cx.attach::<DisabledKind>(Disabled::Always { reason })?;
		Ok(())
	}
}

pub struct HiddenAttribute;

impl DiscoveryUnit for HiddenAttribute {
	fn name(&self) -> &'static str {
		"hidden"
	}

	fn shapes(&self) -> FeatureShapes {
		FeatureShapes::MEMBERS | FeatureShapes::PARAMETER
	}

	fn order(&self) -> UnitOrder {
		METADATA
	}

	fn process(&self, cx: &mut DiscoveryContext<'_>) -> Result<(), ProgrammingError> {
		let Some(value) = cx.declaration().attr("hidden") else {
			return Ok(());
		};
		match flag(value) {
			Some(true) => {
				cx.attach::<HiddenKind>(Hidden::Always)?;
			}
			Some(false) => {}
			None => cx.report(format!("unsupported hidden value {value:?}")),
		}
		Ok(())
	}
}
