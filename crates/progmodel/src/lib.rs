//! Default programming model.
//!
//! Plugs the standard capability kinds, discovery units, postprocessors and
//! rules into the metamodel engine, and offers the interaction helpers that
//! renderers use to query the frozen graph.
//!
//! # Conventions
//!
//! | companion | supports | returns |
//! |-----------|----------|---------|
//! | `title()` | type | text |
//! | `disable<Member>()` | property, collection, action | text or nothing |
//! | `hide<Member>()` | property, collection, action | bool |
//! | `validate<Member>(value)` | property | text or nothing |
//! | `validate<Action>(args..)` | action | text or nothing |
//! | `validate<N><Action>(arg)` | parameter | text or nothing |
//! | `choices<Member>()`, `choices<N><Action>()` | property, parameter | list of the value type |
//! | `default<Member>()`, `default<N><Action>()` | property, parameter | the value type |
//!
//! Attributes recognized on declarations: `named`, `described-as`,
//! `css-class`, `immutable`, `editing`, `max-length`, `optional`, `disabled`,
//! `hidden`.

pub mod capabilities;
pub mod interaction;
pub mod postprocessors;
pub mod rules;
pub mod units;

use std::sync::Arc;

use tessera_metamodel::{BuildInputs, KindRegistry, ProgrammingError, TypeDecl};

pub use self::capabilities::register_kinds;
pub use self::interaction::InteractionError;
pub use self::rules::standard_rules;
pub use self::units::programming_model;

/// A registry holding every standard kind.
pub fn kinds() -> Result<KindRegistry, ProgrammingError> {
	let mut kinds = KindRegistry::new();
	register_kinds(&mut kinds)?;
	Ok(kinds)
}

/// Build inputs wired with the standard model, postprocessors and rules.
pub fn standard_inputs(types: impl IntoIterator<Item = TypeDecl>) -> Result<BuildInputs, ProgrammingError> {
	let inputs = BuildInputs::new(Arc::new(programming_model()?), kinds()?)
		.with_types(types)
		.with_postprocessor(postprocessors::DisabledFromImmutable)?
		.with_postprocessor(postprocessors::DescribedAsFromReferencedType)?
		.with_validator(standard_rules());
	Ok(inputs)
}
