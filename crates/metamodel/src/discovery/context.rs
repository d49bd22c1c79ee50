use std::sync::Arc;

use super::naming::{MatchTarget, NamingConvention};
use super::rules;
use crate::capability::{AttachOutcome, CapabilityHolder, CapabilityKind, KindId, KindRegistry, Payload};
use crate::decl::{Attributes, BoundMethod, FieldDecl, MethodDecl, MethodIdx, ParamDecl, TypeDecl, ValueType};
use crate::error::ProgrammingError;
use crate::identity::{FeatureId, FeatureKind};
use crate::model::{DeclSource, FeatureIdx, FeatureModel, TypeSpec};

/// The raw declaration behind the feature being visited.
#[derive(Debug, Clone, Copy)]
pub enum Declaration<'a> {
	Type(&'a TypeDecl),
	Field(&'a FieldDecl),
	Action(&'a MethodDecl),
	Parameter {
		action: &'a MethodDecl,
		index: usize,
		param: &'a ParamDecl,
	},
}

impl<'a> Declaration<'a> {
	pub fn attributes(&self) -> &'a Attributes {
		match self {
			Self::Type(t) => t.attributes(),
			Self::Field(f) => f.attributes(),
			Self::Action(m) => m.attributes(),
			Self::Parameter { param, .. } => param.attributes(),
		}
	}

	/// Declared name; parameters report their own name, not the action's.
	pub fn name(&self) -> &'a str {
		match self {
			Self::Type(t) => t.name(),
			Self::Field(f) => f.name(),
			Self::Action(m) => m.name(),
			Self::Parameter { param, .. } => param.name(),
		}
	}

	pub fn attr(&self, name: &str) -> Option<&'a str> {
		self.attributes().get(name)
	}
}

/// What a discovery unit sees while visiting one feature.
///
/// Writes go to the visited feature's holder only. The type-level holder and
/// the parent holder are readable so that member units can see type-wide
/// configuration established earlier in the pass.
pub struct DiscoveryContext<'a> {
	spec: &'a mut TypeSpec,
	decl: &'a TypeDecl,
	kinds: &'a KindRegistry,
	feature: FeatureIdx,
	unit: &'static str,
}

impl<'a> DiscoveryContext<'a> {
	pub(crate) fn new(
		spec: &'a mut TypeSpec,
		decl: &'a TypeDecl,
		kinds: &'a KindRegistry,
		feature: FeatureIdx,
		unit: &'static str,
	) -> Self {
		Self {
			spec,
			decl,
			kinds,
			feature,
			unit,
		}
	}

	/// Name of the running unit; recorded as the origin of every attachment.
	pub fn unit(&self) -> &'static str {
		self.unit
	}

	pub fn type_decl(&self) -> &'a TypeDecl {
		self.decl
	}

	pub fn declaration(&self) -> Declaration<'a> {
		let decl = self.decl;
		match self.model().source() {
			DeclSource::Type => Declaration::Type(decl),
			DeclSource::Field(i) => Declaration::Field(&decl.fields()[i]),
			DeclSource::Method(m) => Declaration::Action(&decl.methods()[m.index()]),
			DeclSource::Param { method, index } => {
				let action = &decl.methods()[method.index()];
				Declaration::Parameter {
					action,
					index,
					param: &action.params()[index],
				}
			}
		}
	}

	fn model(&self) -> &FeatureModel {
		&self.spec.features()[self.feature.index()]
	}

	pub fn feature_id(&self) -> &FeatureId {
		self.model().id()
	}

	pub fn feature_kind(&self) -> FeatureKind {
		self.model().kind()
	}

	pub fn value_type(&self) -> &ValueType {
		self.model().value_type()
	}

	/// Holder of the visited feature.
	pub fn holder(&self) -> &CapabilityHolder {
		self.model().holder()
	}

	/// Holder of the owning type feature.
	pub fn type_holder(&self) -> &CapabilityHolder {
		self.spec.type_feature().holder()
	}

	/// Holder of the enclosing feature: the type for members, the action for
	/// parameters.
	pub fn parent_holder(&self) -> Option<&CapabilityHolder> {
		let parent = self.model().parent()?;
		self.spec.feature(parent).map(|f| f.holder())
	}

	pub fn attach<K: CapabilityKind>(&mut self, payload: K::Payload) -> Result<AttachOutcome, ProgrammingError> {
		self.attach_dyn(K::ID, Arc::new(payload))
	}

	pub fn attach_dyn(&mut self, kind: KindId, payload: Arc<dyn Payload>) -> Result<AttachOutcome, ProgrammingError> {
		let spec = *self.kinds.require(kind)?;
		let unit = self.unit;
		let feature = self
			.spec
			.feature_mut(self.feature)
			.ok_or_else(|| ProgrammingError::UnknownFeature {
				feature: FeatureId::for_type(self.decl.name_arc().clone()),
			})?;
		feature.holder_mut().add(&spec, unit, payload)
	}

	/// Removes `method` from the candidate pool. Returns false if another
	/// unit already claimed it.
	pub fn claim(&mut self, method: MethodIdx) -> bool {
		self.spec.claim(method)
	}

	pub fn is_claimed(&self, method: MethodIdx) -> bool {
		self.spec.is_claimed(method)
	}

	/// Methods no unit has claimed yet, in declaration order.
	pub fn unclaimed_methods(&self) -> Vec<(MethodIdx, &'a MethodDecl)> {
		self.decl
			.method_indices()
			.filter(|(idx, _)| !self.spec.is_claimed(*idx))
			.collect()
	}

	/// Resolves the companion method `convention` names for the visited
	/// feature.
	///
	/// A single match is claimed and bound. Several matches are all claimed
	/// and reported as ambiguous; nothing is returned. Methods with the right
	/// name but the wrong signature are left in the pool.
	///
	/// When another feature of the type derives the same name (`unit_price`
	/// and `unitPrice`), every feature involved reports the ambiguity and none
	/// binds, whatever the declaration order.
	pub fn companion(&mut self, convention: &NamingConvention) -> Option<BoundMethod> {
		if !convention.scope.applies_to(self.feature_kind()) {
			return None;
		}
		let name = convention.companion_name(self.feature_id())?;
		if let Some(other) = self.sibling_deriving(convention, &name) {
			let clashing: Vec<MethodIdx> = self
				.decl
				.method_indices()
				.filter(|(_, m)| m.name() == name)
				.map(|(idx, _)| idx)
				.collect();
			if !clashing.is_empty() {
				for idx in clashing {
					self.claim(idx);
				}
				let message = format!("companion {name} also derives from {other}");
				self.report_as(rules::AMBIGUOUS_COMPANION, message);
			}
			return None;
		}

		let subject: Vec<ValueType> = match self.declaration() {
			Declaration::Type(_) => Vec::new(),
			Declaration::Action(m) => m.params().iter().map(|p| p.value_type().clone()).collect(),
			_ => vec![self.value_type().clone()],
		};
		let feature_type = self.value_type().clone();
		let target = MatchTarget {
			feature_type: &feature_type,
			subject: &subject,
		};

		let matches: Vec<_> = self
			.unclaimed_methods()
			.into_iter()
			.filter(|(_, m)| m.name() == name && convention.expected.accepts(&m.signature(), &target))
			.collect();

		match matches.as_slice() {
			[] => None,
			[(idx, method)] => {
				self.claim(*idx);
				tracing::trace!(feature = %self.feature_id(), unit = self.unit, companion = %name, "companion bound");
				Some(method.bind(self.decl.name_arc()))
			}
			many => {
				for (idx, _) in many {
					self.claim(*idx);
				}
				let message = format!("{} methods match companion {name}", many.len());
				self.report_as(rules::AMBIGUOUS_COMPANION, message);
				None
			}
		}
	}

	/// Another feature of this type for which `convention` derives `name`.
	fn sibling_deriving(&self, convention: &NamingConvention, name: &str) -> Option<FeatureId> {
		let own = self.feature_id();
		self.spec
			.features()
			.iter()
			.filter(|f| f.id() != own && convention.scope.applies_to(f.kind()))
			.find(|f| convention.companion_name(f.id()).as_deref() == Some(name))
			.map(|f| f.id().clone())
	}

	/// Records a discovery report against the visited feature under the
	/// running unit's name.
	pub fn report(&mut self, message: impl Into<String>) {
		self.report_as(self.unit, message);
	}

	pub fn report_as(&mut self, rule: &'static str, message: impl Into<String>) {
		let id = self.feature_id().clone();
		self.spec.report(id, rule, message);
	}
}
