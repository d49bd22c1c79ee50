//! Standard validation rules.

use tessera_metamodel::{Failures, FeatureKind, FeatureModel, Metamodel, Validator, ValidatorComposite};

use crate::capabilities::{DefaultKind, Hidden, HiddenKind, MaxLengthKind, Optionality, OptionalityKind};

/// `max-length` only makes sense on text.
pub struct MaxLengthRequiresText;

impl Validator for MaxLengthRequiresText {
	fn name(&self) -> &'static str {
		"max-length-text"
	}

	fn check_feature(&self, _graph: &Metamodel, feature: &FeatureModel, out: &mut Failures) {
		if feature.has::<MaxLengthKind>() && !feature.value_type().is_text() {
			out.report(
				feature.id(),
				format!("max-length on a {} {}", feature.value_type(), feature.kind()),
			);
		}
	}
}

/// Every object type a member, action or parameter mentions is declared.
pub struct ReferencedTypeDeclared;

impl Validator for ReferencedTypeDeclared {
	fn name(&self) -> &'static str {
		"referenced-type-declared"
	}

	fn check_feature(&self, graph: &Metamodel, feature: &FeatureModel, out: &mut Failures) {
		if feature.kind() == FeatureKind::Type {
			return;
		}
		if let Some(target) = feature.value_type().referenced_type()
			&& graph.specification_for(target).is_none()
		{
			out.report(feature.id(), format!("refers to undeclared type {target}"));
		}
	}
}

/// A mandatory property that is always hidden can only be filled by a
/// default.
pub struct HiddenMandatoryNeedsDefault;

impl Validator for HiddenMandatoryNeedsDefault {
	fn name(&self) -> &'static str {
		"hidden-mandatory-default"
	}

	fn check_feature(&self, _graph: &Metamodel, feature: &FeatureModel, out: &mut Failures) {
		if feature.kind() != FeatureKind::Property
			|| feature.capability::<OptionalityKind>() != Some(&Optionality::Mandatory)
			|| feature.has::<DefaultKind>()
		{
			return;
		}
		if feature.chain::<HiddenKind>().any(|h| *h == Hidden::Always) {
			out.report(feature.id(), "mandatory property is always hidden and has no default");
		}
	}
}

/// The rules above under one composite named `standard`.
pub fn standard_rules() -> ValidatorComposite {
	ValidatorComposite::new("standard")
		.with(MaxLengthRequiresText)
		.with(ReferencedTypeDeclared)
		.with(HiddenMandatoryNeedsDefault)
}
