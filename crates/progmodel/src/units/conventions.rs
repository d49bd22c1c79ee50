//! Companion-method units.
//!
//! Each unit resolves one or more [`NamingConvention`]s against the visited
//! feature and wraps the bound method in a capability.

use tessera_metamodel::{
	BoundMethod, DiscoveryContext, DiscoveryUnit, ExpectedSignature, FeatureShapes,
	NamingConvention, ParamsRule, Phase, ProgrammingError, ReturnRule, UnitOrder,
};

use crate::capabilities::{
	Choices, ChoicesKind, DefaultKind, DefaultValue, Disabled, DisabledKind, Hidden, HiddenKind, Title,
	TitleKind, ValidateKind, ValidateValue,
};

const CONVENTIONS: UnitOrder = UnitOrder::in_phase(Phase::Conventions);

const TEXT_OR_NOTHING: ExpectedSignature = ExpectedSignature::new(ParamsRule::None, ReturnRule::TextOrNothing);
const VALIDATES_SUBJECT: ExpectedSignature =
	ExpectedSignature::new(ParamsRule::Subject, ReturnRule::TextOrNothing);
const LIST_OF_SELF: ExpectedSignature = ExpectedSignature::new(ParamsRule::None, ReturnRule::ListOfFeatureType);
const OF_SELF: ExpectedSignature = ExpectedSignature::new(ParamsRule::None, ReturnRule::FeatureType);

static TITLE: [NamingConvention; 1] =
	[NamingConvention::type_level("title", ExpectedSignature::new(ParamsRule::None, ReturnRule::Text))];
static DISABLE: [NamingConvention; 1] = [NamingConvention::member("disable", TEXT_OR_NOTHING)];
static HIDE: [NamingConvention; 1] =
	[NamingConvention::member("hide", ExpectedSignature::new(ParamsRule::None, ReturnRule::Bool))];
static VALIDATE: [NamingConvention; 2] = [
	NamingConvention::member("validate", VALIDATES_SUBJECT),
	NamingConvention::parameter("validate", VALIDATES_SUBJECT),
];
static CHOICES: [NamingConvention; 2] = [
	NamingConvention::member("choices", LIST_OF_SELF),
	NamingConvention::parameter("choices", LIST_OF_SELF),
];
static DEFAULT: [NamingConvention; 2] = [
	NamingConvention::member("default", OF_SELF),
	NamingConvention::parameter("default", OF_SELF),
];

/// First convention in `conventions` that binds a companion for the visited
/// feature. Scopes are disjoint, so at most one can apply.
fn resolve(cx: &mut DiscoveryContext<'_>, conventions: &[NamingConvention]) -> Option<BoundMethod> {
	conventions.iter().find_map(|c| cx.companion(c))
}

/// `title()` on the type computes instance titles.
pub struct TitleMethod;

impl DiscoveryUnit for TitleMethod {
	fn name(&self) -> &'static str {
		"title-method"
	}

	fn shapes(&self) -> FeatureShapes {
		FeatureShapes::TYPE
	}

	fn order(&self) -> UnitOrder {
		CONVENTIONS
	}

	fn conventions(&self) -> &[NamingConvention] {
		&TITLE
	}

	fn process(&self, cx: &mut DiscoveryContext<'_>) -> Result<(), ProgrammingError> {
		if let Some(method) = resolve(cx, &TITLE) {
			cx.attach::<TitleKind>(Title { method })?;
		}
		Ok(())
	}
}

/// `disable<Member>()` returns a reason when the member is unusable.
pub struct DisableMethod;

impl DiscoveryUnit for DisableMethod {
	fn name(&self) -> &'static str {
		"disable-method"
	}

	fn shapes(&self) -> FeatureShapes {
		FeatureShapes::MEMBERS
	}

	fn order(&self) -> UnitOrder {
		CONVENTIONS
	}

	fn conventions(&self) -> &[NamingConvention] {
		&DISABLE
	}

	fn process(&self, cx: &mut DiscoveryContext<'_>) -> Result<(), ProgrammingError> {
		if let Some(method) = resolve(cx, &DISABLE) {
			cx.attach::<DisabledKind>(Disabled::Method(method))?;
		}
		Ok(())
	}
}

pub struct HideMethod;

impl DiscoveryUnit for HideMethod {
	fn name(&self) -> &'static str {
		"hide-method"
	}

	fn shapes(&self) -> FeatureShapes {
		FeatureShapes::MEMBERS
	}

	fn order(&self) -> UnitOrder {
		CONVENTIONS
	}

	fn conventions(&self) -> &[NamingConvention] {
		&HIDE
	}

	fn process(&self, cx: &mut DiscoveryContext<'_>) -> Result<(), ProgrammingError> {
		if let Some(method) = resolve(cx, &HIDE) {
			cx.attach::<HiddenKind>(Hidden::Method(method))?;
		}
		Ok(())
	}
}

/// `validate<Member>(value)` and `validate<N><Action>(arg)`.
///
/// For an action the companion takes the action's full argument list.
pub struct ValidateMethod;

impl DiscoveryUnit for ValidateMethod {
	fn name(&self) -> &'static str {
		"validate-method"
	}

	fn shapes(&self) -> FeatureShapes {
		FeatureShapes::PROPERTY | FeatureShapes::ACTION | FeatureShapes::PARAMETER
	}

	fn order(&self) -> UnitOrder {
		CONVENTIONS
	}

	fn conventions(&self) -> &[NamingConvention] {
		&VALIDATE
	}

	fn process(&self, cx: &mut DiscoveryContext<'_>) -> Result<(), ProgrammingError> {
		if let Some(method) = resolve(cx, &VALIDATE) {
			cx.attach::<ValidateKind>(ValidateValue { method })?;
		}
		Ok(())
	}
}

pub struct ChoicesMethod;

impl DiscoveryUnit for ChoicesMethod {
	fn name(&self) -> &'static str {
		"choices-method"
	}

	fn shapes(&self) -> FeatureShapes {
		FeatureShapes::PROPERTY | FeatureShapes::PARAMETER
	}

	fn order(&self) -> UnitOrder {
		CONVENTIONS
	}

	fn conventions(&self) -> &[NamingConvention] {
		&CHOICES
	}

	fn process(&self, cx: &mut DiscoveryContext<'_>) -> Result<(), ProgrammingError> {
		if let Some(method) = resolve(cx, &CHOICES) {
			cx.attach::<ChoicesKind>(Choices { method })?;
		}
		Ok(())
	}
}

pub struct DefaultMethod;

impl DiscoveryUnit for DefaultMethod {
	fn name(&self) -> &'static str {
		"default-method"
	}

	fn shapes(&self) -> FeatureShapes {
		FeatureShapes::PROPERTY | FeatureShapes::PARAMETER
	}

	fn order(&self) -> UnitOrder {
		CONVENTIONS
	}

	fn conventions(&self) -> &[NamingConvention] {
		&DEFAULT
	}

	fn process(&self, cx: &mut DiscoveryContext<'_>) -> Result<(), ProgrammingError> {
		if let Some(method) = resolve(cx, &DEFAULT) {
			cx.attach::<DefaultKind>(DefaultValue { method })?;
		}
		Ok(())
	}
}
