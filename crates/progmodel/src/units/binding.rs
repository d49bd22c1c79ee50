use heck::ToTitleCase;
use tessera_metamodel::{
	Declaration, DiscoveryContext, DiscoveryUnit, FeatureShapes, Phase, ProgrammingError, UnitOrder,
};

use crate::capabilities::{
	ActionInvocation, ActionInvocationKind, NameSource, Named, NamedKind, PropertyAccessor,
	PropertyAccessorKind,
};

/// Gives every feature a display name derived from its identifier.
pub struct NamedFromIdentifier;

impl DiscoveryUnit for NamedFromIdentifier {
	fn name(&self) -> &'static str {
		"named-identifier"
	}

	fn shapes(&self) -> FeatureShapes {
		FeatureShapes::all()
	}

	fn order(&self) -> UnitOrder {
		UnitOrder::in_phase(Phase::Identity)
	}

	fn process(&self, cx: &mut DiscoveryContext<'_>) -> Result<(), ProgrammingError> {
		let text = cx.declaration().name().to_title_case();
		cx.attach::<NamedKind>(Named::new(text, NameSource::Identifier))?;
		Ok(())
	}
}

pub struct PropertyAccessorUnit;

impl DiscoveryUnit for PropertyAccessorUnit {
	fn name(&self) -> &'static str {
		"property-accessor"
	}

	fn shapes(&self) -> FeatureShapes {
		FeatureShapes::FIELDS
	}

	fn order(&self) -> UnitOrder {
		UnitOrder::in_phase(Phase::Binding)
	}

	fn process(&self, cx: &mut DiscoveryContext<'_>) -> Result<(), ProgrammingError> {
		let Declaration::Field(field) = cx.declaration() else {
			return Ok(());
		};
		cx.attach::<PropertyAccessorKind>(PropertyAccessor {
			field: field.name().into(),
		})?;
		Ok(())
	}
}

/// Binds each exposed action to the method that runs it.
pub struct ActionInvocationUnit;

impl DiscoveryUnit for ActionInvocationUnit {
	fn name(&self) -> &'static str {
		"action-invocation"
	}

	fn shapes(&self) -> FeatureShapes {
		FeatureShapes::ACTION
	}

	fn order(&self) -> UnitOrder {
		UnitOrder::in_phase(Phase::Binding)
	}

	fn process(&self, cx: &mut DiscoveryContext<'_>) -> Result<(), ProgrammingError> {
		let Declaration::Action(method) = cx.declaration() else {
			return Ok(());
		};
		let method = method.bind(cx.type_decl().name_arc());
		cx.attach::<ActionInvocationKind>(ActionInvocation { method })?;
		Ok(())
	}
}
