use crate::capability::KindId;
use crate::identity::FeatureId;

/// Fatal construction errors.
///
/// These indicate a defect in the programming model or in the host's
/// registration code, never a problem with a user's declarations. They abort
/// the build immediately.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgrammingError {
	/// A payload was attached under a kind registered for a different payload type.
	#[error("capability kind {kind} expects payload {expected}, got {found}")]
	PayloadMismatch {
		kind: KindId,
		expected: &'static str,
		found: &'static str,
	},
	/// A kind was referenced before being registered.
	#[error("unknown capability kind {name:?}{}", did_you_mean(.suggestion))]
	UnknownKind {
		name: String,
		suggestion: Option<&'static str>,
	},
	/// The same kind name was registered twice with different payloads or policies.
	#[error("capability kind {kind} registered twice: existing={existing} incoming={incoming}")]
	ConflictingKind {
		kind: KindId,
		existing: &'static str,
		incoming: &'static str,
	},
	/// Two discovery units share a name.
	#[error("duplicate discovery unit: {name}")]
	DuplicateUnit { name: &'static str },
	/// Two postprocessors share a name.
	#[error("duplicate postprocessor: {name}")]
	DuplicatePostprocessor { name: &'static str },
	/// Two candidate declarations share a type name.
	#[error("duplicate type declaration: {name}")]
	DuplicateType { name: String },
	/// A type declares the same field twice.
	#[error("type {type_name} declares field {field} more than once")]
	DuplicateField { type_name: String, field: String },
	/// Two features of one type resolved to the same identity.
	#[error("duplicate feature {feature}")]
	DuplicateFeature { feature: FeatureId },
	/// A method declares more parameters than a parameter index can address.
	#[error("action {action} declares {count} parameters; at most 65536 are supported")]
	TooManyParameters { action: FeatureId, count: usize },
	/// A postprocessor addressed a feature that does not exist.
	#[error("unknown feature {feature}")]
	UnknownFeature { feature: FeatureId },
}

fn did_you_mean(suggestion: &Option<&'static str>) -> String {
	match suggestion {
		Some(s) => format!(" (did you mean {s:?}?)"),
		None => String::new(),
	}
}

/// Failure raised while invoking a bound method at interaction time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvokeError {
	#[error("{method} is declared on {expected}, invoked on {found}")]
	WrongTarget {
		method: String,
		expected: String,
		found: String,
	},
	#[error("{method} expects {expected} argument(s), got {found}")]
	Arity {
		method: String,
		expected: usize,
		found: usize,
	},
	#[error("{method} returned {found}, declared {expected}")]
	UnexpectedReturn {
		method: String,
		expected: String,
		found: String,
	},
	/// Raised by the method body itself.
	#[error("{0}")]
	Failed(String),
}

/// Configuration parse failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("invalid metamodel configuration: {0}")]
	Parse(#[from] toml::de::Error),
}
