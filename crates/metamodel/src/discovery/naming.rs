//! Naming-convention descriptors.
//!
//! A convention names a companion method after the feature it supports, e.g.
//! `disableTotal` for property `total` or `choices0Place` for the first
//! parameter of action `place`. Matching happens once at build time against
//! the declaring type's method table and produces a bound method.

use crate::decl::{Signature, ValueType};
use crate::identity::{FeatureId, FeatureKind};

/// Which features a convention applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConventionScope {
	/// `prefix + suffix`, on the type feature.
	Type,
	/// `prefix + Capitalized(member) + suffix`, on properties, collections and actions.
	Member,
	/// `prefix + index + Capitalized(action) + suffix`, on action parameters.
	Parameter,
}

impl ConventionScope {
	pub fn applies_to(self, kind: FeatureKind) -> bool {
		match self {
			Self::Type => kind == FeatureKind::Type,
			Self::Member => matches!(
				kind,
				FeatureKind::Property | FeatureKind::Collection | FeatureKind::Action
			),
			Self::Parameter => kind == FeatureKind::Parameter,
		}
	}
}

/// Expected parameter list of a companion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamsRule {
	/// No parameters.
	None,
	/// The values the feature accepts: the property or parameter type, or the
	/// action's own parameter list.
	Subject,
}

/// Expected return type of a companion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReturnRule {
	Text,
	TextOrNothing,
	Bool,
	/// The feature's own value type.
	FeatureType,
	/// A list of the feature's (non-optional) value type.
	ListOfFeatureType,
	Any,
}

/// What the signature of a matching companion must look like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExpectedSignature {
	pub params: ParamsRule,
	pub returns: ReturnRule,
}

/// The feature a companion is being matched for.
#[derive(Debug, Clone, Copy)]
pub struct MatchTarget<'a> {
	pub feature_type: &'a ValueType,
	pub subject: &'a [ValueType],
}

impl ExpectedSignature {
	pub const fn new(params: ParamsRule, returns: ReturnRule) -> Self {
		Self { params, returns }
	}

	pub fn accepts(&self, sig: &Signature, target: &MatchTarget<'_>) -> bool {
		let params_ok = match self.params {
			ParamsRule::None => sig.arity() == 0,
			ParamsRule::Subject => sig.params() == target.subject,
		};
		params_ok && self.returns_ok(sig.returns(), target.feature_type)
	}

	fn returns_ok(&self, returns: &ValueType, feature_type: &ValueType) -> bool {
		match self.returns {
			ReturnRule::Text => *returns == ValueType::Text,
			ReturnRule::TextOrNothing => returns.required() == &ValueType::Text,
			ReturnRule::Bool => *returns == ValueType::Bool,
			ReturnRule::FeatureType => returns == feature_type || returns == feature_type.required(),
			ReturnRule::ListOfFeatureType => {
				matches!(returns, ValueType::List(elem) if **elem == *feature_type.required())
			}
			ReturnRule::Any => true,
		}
	}
}

/// A naming-convention descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NamingConvention {
	pub prefix: &'static str,
	pub suffix: &'static str,
	pub scope: ConventionScope,
	pub expected: ExpectedSignature,
}

impl NamingConvention {
	pub const fn member(prefix: &'static str, expected: ExpectedSignature) -> Self {
		Self {
			prefix,
			suffix: "",
			scope: ConventionScope::Member,
			expected,
		}
	}

	pub const fn parameter(prefix: &'static str, expected: ExpectedSignature) -> Self {
		Self {
			prefix,
			suffix: "",
			scope: ConventionScope::Parameter,
			expected,
		}
	}

	/// A type-level companion named exactly `name`.
	pub const fn type_level(name: &'static str, expected: ExpectedSignature) -> Self {
		Self {
			prefix: name,
			suffix: "",
			scope: ConventionScope::Type,
			expected,
		}
	}

	pub const fn with_suffix(mut self, suffix: &'static str) -> Self {
		self.suffix = suffix;
		self
	}

	/// Companion method name for `feature`, or `None` if the feature is
	/// outside this convention's scope.
	pub fn companion_name(&self, feature: &FeatureId) -> Option<String> {
		let (prefix, suffix) = (self.prefix, self.suffix);
		match (self.scope, feature.member_name(), feature.param_index()) {
			(ConventionScope::Type, None, None) => Some(format!("{prefix}{suffix}")),
			(ConventionScope::Member, Some(member), None) => {
				Some(format!("{prefix}{}{suffix}", capitalized(member)))
			}
			(ConventionScope::Parameter, Some(action), Some(idx)) => {
				Some(format!("{prefix}{idx}{}{suffix}", capitalized(action)))
			}
			_ => None,
		}
	}

	/// Returns true if `method` has the shape of a companion under this
	/// convention, whatever feature it would support.
	pub fn reserves(&self, method: &str) -> bool {
		let Some(rest) = method
			.strip_prefix(self.prefix)
			.and_then(|r| r.strip_suffix(self.suffix))
		else {
			return false;
		};
		match self.scope {
			ConventionScope::Type => rest.is_empty(),
			ConventionScope::Member => rest.starts_with(char::is_uppercase),
			ConventionScope::Parameter => {
				let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
				digits > 0 && rest[digits..].starts_with(char::is_uppercase)
			}
		}
	}
}

/// Uppercases the first letter and every letter following `_`, dropping the
/// underscores. Everything else keeps its case, so `orderID` gives `OrderID`
/// and `unit_price` gives `UnitPrice`.
fn capitalized(name: &str) -> String {
	let mut out = String::with_capacity(name.len());
	let mut upper = true;
	for c in name.chars() {
		if c == '_' {
			upper = true;
		} else if upper {
			out.extend(c.to_uppercase());
			upper = false;
		} else {
			out.push(c);
		}
	}
	out
}
