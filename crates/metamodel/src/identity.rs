//! Stable feature identities and shape classification.

use std::fmt;
use std::sync::Arc;

/// Fully-qualified identity of a feature.
///
/// Renders as `Order`, `Order#total` or `Order#place[0]`. Identities are
/// stable across rebuilds from identical declarations, so collaborators may
/// hold them across reloads and re-resolve against the new graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureId {
	type_name: Arc<str>,
	member: Option<Arc<str>>,
	param: Option<u16>,
}

impl FeatureId {
	/// Identity of a type-level feature.
	pub fn for_type(type_name: impl Into<Arc<str>>) -> Self {
		Self {
			type_name: type_name.into(),
			member: None,
			param: None,
		}
	}

	/// Identity of a member declared on this identity's type.
	pub fn member(&self, name: impl Into<Arc<str>>) -> Self {
		Self {
			type_name: self.type_name.clone(),
			member: Some(name.into()),
			param: None,
		}
	}

	/// Identity of the `index`-th parameter of this action identity.
	pub fn param(&self, index: u16) -> Self {
		Self {
			type_name: self.type_name.clone(),
			member: self.member.clone(),
			param: Some(index),
		}
	}

	/// Parses the rendered form back into an identity.
	pub fn parse(s: &str) -> Option<Self> {
		let Some((type_name, rest)) = s.split_once('#') else {
			return (!s.is_empty()).then(|| Self::for_type(s));
		};
		if type_name.is_empty() {
			return None;
		}
		let owner = Self::for_type(type_name);
		match rest.split_once('[') {
			None if !rest.is_empty() => Some(owner.member(rest)),
			None => None,
			Some((member, idx)) => {
				let idx = idx.strip_suffix(']')?.parse().ok()?;
				(!member.is_empty()).then(|| owner.member(member).param(idx))
			}
		}
	}

	pub fn type_name(&self) -> &str {
		&self.type_name
	}

	pub fn type_name_arc(&self) -> &Arc<str> {
		&self.type_name
	}

	pub fn member_name(&self) -> Option<&str> {
		self.member.as_deref()
	}

	pub fn param_index(&self) -> Option<u16> {
		self.param
	}

	/// Identity of the owning type feature.
	pub fn owning_type(&self) -> Self {
		Self::for_type(self.type_name.clone())
	}

	pub fn is_type(&self) -> bool {
		self.member.is_none()
	}
}

impl fmt::Display for FeatureId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.type_name)?;
		if let Some(member) = &self.member {
			write!(f, "#{member}")?;
		}
		if let Some(idx) = self.param {
			write!(f, "[{idx}]")?;
		}
		Ok(())
	}
}

/// Structural kind of a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureKind {
	Type,
	Property,
	Collection,
	Action,
	Parameter,
}

impl FeatureKind {
	pub const fn shape(self) -> FeatureShapes {
		match self {
			Self::Type => FeatureShapes::TYPE,
			Self::Property => FeatureShapes::PROPERTY,
			Self::Collection => FeatureShapes::COLLECTION,
			Self::Action => FeatureShapes::ACTION,
			Self::Parameter => FeatureShapes::PARAMETER,
		}
	}
}

impl fmt::Display for FeatureKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Type => "type",
			Self::Property => "property",
			Self::Collection => "collection",
			Self::Action => "action",
			Self::Parameter => "parameter",
		})
	}
}

bitflags::bitflags! {
	/// Set of feature shapes a discovery unit applies to.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
	pub struct FeatureShapes: u8 {
		const TYPE = 1 << 0;
		const PROPERTY = 1 << 1;
		const COLLECTION = 1 << 2;
		const ACTION = 1 << 3;
		const PARAMETER = 1 << 4;

		/// Properties and collections, i.e. everything backed by a field.
		const FIELDS = Self::PROPERTY.bits() | Self::COLLECTION.bits();
		const MEMBERS = Self::FIELDS.bits() | Self::ACTION.bits();
	}
}

impl FromIterator<FeatureKind> for FeatureShapes {
	fn from_iter<I: IntoIterator<Item = FeatureKind>>(iter: I) -> Self {
		iter.into_iter()
			.fold(FeatureShapes::empty(), |set, kind| set | kind.shape())
	}
}
