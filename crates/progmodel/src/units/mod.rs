//! Standard discovery units.
//!
//! # Ordering
//!
//! | phase | units |
//! |-------|-------|
//! | identity | `named-identifier` |
//! | metadata | attribute units (`named-attribute`, `described-as`, `css-class`, `immutable`, `editing`, `max-length`, `optionality`, `disabled`, `hidden`) |
//! | conventions | companion units (`title-method`, `disable-method`, `hide-method`, `validate-method`, `choices-method`, `default-method`) |
//! | binding | `property-accessor`, `action-invocation` |
//!
//! Attribute units run before companion units so that a companion method
//! decorates, and therefore overrides, attribute configuration.

mod attributes;
mod binding;
mod conventions;

pub use self::attributes::{
	CssClassAttribute, DescribedAsAttribute, DisabledAttribute, EditingAttribute, HiddenAttribute,
	ImmutableAttribute, MaxLengthAttribute, NamedAttribute, OptionalityAttribute,
};
pub use self::binding::{ActionInvocationUnit, NamedFromIdentifier, PropertyAccessorUnit};
pub use self::conventions::{
	ChoicesMethod, DefaultMethod, DisableMethod, HideMethod, TitleMethod, ValidateMethod,
};
use tessera_metamodel::{ProgrammingError, ProgrammingModel};

/// The standard programming model with every unit above registered.
pub fn programming_model() -> Result<ProgrammingModel, ProgrammingError> {
	let mut builder = ProgrammingModel::builder();
	builder
		.register(NamedFromIdentifier)?
		.register(NamedAttribute)?
		.register(DescribedAsAttribute)?
		.register(CssClassAttribute)?
		.register(ImmutableAttribute)?
		.register(EditingAttribute)?
		.register(MaxLengthAttribute)?
		.register(OptionalityAttribute)?
		.register(DisabledAttribute)?
		.register(HiddenAttribute)?
		.register(TitleMethod)?
		.register(DisableMethod)?
		.register(HideMethod)?
		.register(ValidateMethod)?
		.register(ChoicesMethod)?
		.register(DefaultMethod)?
		.register(PropertyAccessorUnit)?
		.register(ActionInvocationUnit)?;
	Ok(builder.build())
}
