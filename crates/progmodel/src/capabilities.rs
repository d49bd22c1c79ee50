//! Standard capability kinds.
//!
//! Payloads that carry a [`BoundMethod`] compare by the method's identity, so
//! two units binding the same companion collapse instead of stacking.

use std::sync::Arc;

use tessera_metamodel::{BoundMethod, FeatureId, KindRegistry, ProgrammingError, capability_kind};

/// Where a display name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameSource {
	/// Derived from the declared identifier.
	Identifier,
	/// Given explicitly by a `named` attribute.
	Attribute,
}

/// Display name of a feature.
#[derive(Debug, Clone)]
pub struct Named {
	pub text: String,
	pub source: NameSource,
}

impl Named {
	pub fn new(text: impl Into<String>, source: NameSource) -> Self {
		Self {
			text: text.into(),
			source,
		}
	}
}

/// Equal names are the same contribution wherever they came from.
impl PartialEq for Named {
	fn eq(&self, other: &Self) -> bool {
		self.text == other.text
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribedAs {
	pub text: String,
}

/// Instance title computed by a type-level `title()` method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title {
	pub method: BoundMethod,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssClass {
	pub class: String,
}

/// Instances of the type may not be edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Immutable {
	pub reason: Option<String>,
}

/// Explicit per-member editing override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditingPolicy {
	Enabled,
	Disabled,
}

/// Why a member is disabled. Decorates: the newest rule is consulted first
/// and delegates to the one it wraps when it does not apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disabled {
	/// Unconditionally disabled.
	Always { reason: String },
	/// Disabled when the companion method returns a reason.
	Method(BoundMethod),
	/// Disabled because the owning type is immutable.
	Immutable { source: FeatureId, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hidden {
	Always,
	/// Hidden when the companion method returns `true`.
	Method(BoundMethod),
}

/// Companion validating a proposed value or argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateValue {
	pub method: BoundMethod,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choices {
	pub method: BoundMethod,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultValue {
	pub method: BoundMethod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaxLength {
	pub limit: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Optionality {
	Mandatory,
	Optional,
}

/// The method an action runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionInvocation {
	pub method: BoundMethod,
}

/// Field backing a property or collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyAccessor {
	pub field: Arc<str>,
}

capability_kind!(pub NamedKind => Named, "named", Replace);
capability_kind!(pub DescribedAsKind => DescribedAs, "described-as", Replace);
capability_kind!(pub TitleKind => Title, "title", Replace);
capability_kind!(pub CssClassKind => CssClass, "css-class", Replace);
capability_kind!(pub ImmutableKind => Immutable, "immutable", FirstWins);
capability_kind!(pub EditingKind => EditingPolicy, "editing", Replace);
capability_kind!(pub DisabledKind => Disabled, "disabled", Decorate);
capability_kind!(pub HiddenKind => Hidden, "hidden", Decorate);
capability_kind!(pub ValidateKind => ValidateValue, "validate", Decorate);
capability_kind!(pub ChoicesKind => Choices, "choices", Replace);
capability_kind!(pub DefaultKind => DefaultValue, "default", Replace);
capability_kind!(pub MaxLengthKind => MaxLength, "max-length", Replace);
capability_kind!(pub OptionalityKind => Optionality, "optionality", Replace);
capability_kind!(pub ActionInvocationKind => ActionInvocation, "action-invocation", Replace);
capability_kind!(pub PropertyAccessorKind => PropertyAccessor, "property-accessor", Replace);

/// Registers every standard kind.
pub fn register_kinds(kinds: &mut KindRegistry) -> Result<(), ProgrammingError> {
	kinds.register::<NamedKind>()?;
	kinds.register::<DescribedAsKind>()?;
	kinds.register::<TitleKind>()?;
	kinds.register::<CssClassKind>()?;
	kinds.register::<ImmutableKind>()?;
	kinds.register::<EditingKind>()?;
	kinds.register::<DisabledKind>()?;
	kinds.register::<HiddenKind>()?;
	kinds.register::<ValidateKind>()?;
	kinds.register::<ChoicesKind>()?;
	kinds.register::<DefaultKind>()?;
	kinds.register::<MaxLengthKind>()?;
	kinds.register::<OptionalityKind>()?;
	kinds.register::<ActionInvocationKind>()?;
	kinds.register::<PropertyAccessorKind>()?;
	Ok(())
}
