//! Feature models, type specifications and the frozen graph.
//!
//! # Role
//!
//! A [`TypeSpec`] is the arena of [`FeatureModel`]s for one declared type.
//! Index 0 is always the type feature; members hang off it, parameters hang
//! off their action. The [`Metamodel`] keys specifications by type name in
//! sorted order and is immutable once built.
//!
//! # Invariants
//!
//! - Feature identities are unique within a specification.
//!   - Enforced in: [`TypeSpec::push_feature`] (single `by_id` slot per identity).
//! - A field name is declared at most once per type.
//!   - Enforced in: [`TypeSpec::new`].
//! - Type specifications appear in name order.
//!   - Enforced in: [`Metamodel::new`].

mod draft;

pub use self::draft::GraphDraft;

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap};

use crate::capability::{Capability, CapabilityHolder, CapabilityKind, KindId};
use crate::decl::{MethodIdx, TypeDecl, ValueType};
use crate::error::ProgrammingError;
use crate::identity::{FeatureId, FeatureKind, FeatureShapes};
use crate::validate::ValidationFailure;

/// Position of a feature in its type specification's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureIdx(u32);

impl FeatureIdx {
	/// The type feature.
	pub const ROOT: Self = Self(0);

	pub fn index(self) -> usize {
		self.0 as usize
	}
}

/// Which raw declaration a feature was created from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DeclSource {
	Type,
	Field(usize),
	Method(MethodIdx),
	Param { method: MethodIdx, index: usize },
}

/// One node of the graph: a capability holder with identity and structure.
#[derive(Debug, Clone)]
pub struct FeatureModel {
	kind: FeatureKind,
	value_type: ValueType,
	holder: CapabilityHolder,
	parent: Option<FeatureIdx>,
	children: Vec<FeatureIdx>,
	source: DeclSource,
}

impl FeatureModel {
	pub fn id(&self) -> &FeatureId {
		self.holder.feature()
	}

	pub fn kind(&self) -> FeatureKind {
		self.kind
	}

	/// Declared value type. For actions this is the return type; for the
	/// type feature it is a reference to the type itself.
	pub fn value_type(&self) -> &ValueType {
		&self.value_type
	}

	pub fn holder(&self) -> &CapabilityHolder {
		&self.holder
	}

	pub(crate) fn holder_mut(&mut self) -> &mut CapabilityHolder {
		&mut self.holder
	}

	pub fn parent(&self) -> Option<FeatureIdx> {
		self.parent
	}

	pub fn children(&self) -> &[FeatureIdx] {
		&self.children
	}

	pub(crate) fn source(&self) -> DeclSource {
		self.source
	}

	/// Typed view of the active capability of `K`.
	pub fn capability<K: CapabilityKind>(&self) -> Option<&K::Payload> {
		self.holder.payload::<K>()
	}

	/// Typed decoration chain of `K`, newest first.
	pub fn chain<K: CapabilityKind>(&self) -> impl Iterator<Item = &K::Payload> {
		self.holder.payloads::<K>()
	}

	pub fn has<K: CapabilityKind>(&self) -> bool {
		self.holder.has::<K>()
	}

	fn semantically_eq(&self, other: &FeatureModel) -> bool {
		self.kind == other.kind && self.value_type == other.value_type && self.holder.semantically_eq(&other.holder)
	}
}

/// Arena of feature models for one declared type.
#[derive(Debug, Clone)]
pub struct TypeSpec {
	decl: Arc<TypeDecl>,
	features: Vec<FeatureModel>,
	by_id: FxHashMap<FeatureId, FeatureIdx>,
	claimed: Vec<bool>,
	reports: Vec<ValidationFailure>,
}

impl TypeSpec {
	/// Creates the type feature and one property or collection per field.
	pub(crate) fn new(decl: Arc<TypeDecl>) -> Result<Self, ProgrammingError> {
		let type_id = FeatureId::for_type(decl.name_arc().clone());
		let mut spec = Self {
			claimed: vec![false; decl.methods().len()],
			features: Vec::with_capacity(1 + decl.fields().len()),
			by_id: FxHashMap::default(),
			reports: Vec::new(),
			decl: decl.clone(),
		};
		let self_type = ValueType::Object(decl.name_arc().clone());
		spec.push_feature(None, type_id.clone(), FeatureKind::Type, self_type, DeclSource::Type)?;

		for (i, field) in decl.fields().iter().enumerate() {
			let kind = if field.is_collection() {
				FeatureKind::Collection
			} else {
				FeatureKind::Property
			};
			let id = type_id.member(field.name());
			spec.push_feature(Some(FeatureIdx::ROOT), id, kind, field.value_type().clone(), DeclSource::Field(i))
				.map_err(|_| ProgrammingError::DuplicateField {
					type_name: decl.name().to_string(),
					field: field.name().to_string(),
				})?;
		}
		Ok(spec)
	}

	pub(crate) fn push_feature(
		&mut self,
		parent: Option<FeatureIdx>,
		id: FeatureId,
		kind: FeatureKind,
		value_type: ValueType,
		source: DeclSource,
	) -> Result<FeatureIdx, ProgrammingError> {
		if self.by_id.contains_key(&id) {
			return Err(ProgrammingError::DuplicateFeature { feature: id });
		}
		let idx = FeatureIdx(self.features.len() as u32);
		self.by_id.insert(id.clone(), idx);
		self.features.push(FeatureModel {
			kind,
			value_type,
			holder: CapabilityHolder::new(id),
			parent,
			children: Vec::new(),
			source,
		});
		if let Some(p) = parent {
			self.features[p.index()].children.push(idx);
		}
		Ok(idx)
	}

	pub fn name(&self) -> &str {
		self.decl.name()
	}

	pub fn decl(&self) -> &TypeDecl {
		&self.decl
	}

	pub(crate) fn decl_arc(&self) -> &Arc<TypeDecl> {
		&self.decl
	}

	pub fn type_feature(&self) -> &FeatureModel {
		&self.features[FeatureIdx::ROOT.index()]
	}

	pub fn features(&self) -> &[FeatureModel] {
		&self.features
	}

	pub fn feature(&self, idx: FeatureIdx) -> Option<&FeatureModel> {
		self.features.get(idx.index())
	}

	pub(crate) fn feature_mut(&mut self, idx: FeatureIdx) -> Option<&mut FeatureModel> {
		self.features.get_mut(idx.index())
	}

	pub fn index_of(&self, id: &FeatureId) -> Option<FeatureIdx> {
		self.by_id.get(id).copied()
	}

	pub fn by_id(&self, id: &FeatureId) -> Option<&FeatureModel> {
		self.feature(self.index_of(id)?)
	}

	/// Member by name: a property, collection or action.
	pub fn member(&self, name: &str) -> Option<&FeatureModel> {
		self.by_id(&self.type_feature().id().member(name))
	}

	/// Direct members of the type in declaration order, fields first.
	pub fn members(&self) -> impl Iterator<Item = &FeatureModel> {
		self.type_feature().children().iter().map(|i| &self.features[i.index()])
	}

	pub fn properties(&self) -> impl Iterator<Item = &FeatureModel> {
		self.members().filter(|f| f.kind() == FeatureKind::Property)
	}

	pub fn collections(&self) -> impl Iterator<Item = &FeatureModel> {
		self.members().filter(|f| f.kind() == FeatureKind::Collection)
	}

	pub fn actions(&self) -> impl Iterator<Item = &FeatureModel> {
		self.members().filter(|f| f.kind() == FeatureKind::Action)
	}

	/// Parameters of `action`, in declaration order.
	pub fn parameters<'a>(&'a self, action: &'a FeatureModel) -> impl Iterator<Item = &'a FeatureModel> + 'a {
		action.children().iter().map(|i| &self.features[i.index()])
	}

	/// Arena indices of features whose kind is in `shapes`.
	pub(crate) fn indices_with(&self, shapes: FeatureShapes) -> Vec<FeatureIdx> {
		self.features
			.iter()
			.enumerate()
			.filter(|(_, f)| shapes.contains(f.kind().shape()))
			.map(|(i, _)| FeatureIdx(i as u32))
			.collect()
	}

	/// Problems recorded during discovery; surfaced as validation failures.
	pub fn reports(&self) -> &[ValidationFailure] {
		&self.reports
	}

	pub(crate) fn report(&mut self, feature: FeatureId, rule: &'static str, message: impl Into<String>) {
		self.reports.push(ValidationFailure::new(feature, rule, message));
	}

	pub fn is_claimed(&self, method: MethodIdx) -> bool {
		self.claimed.get(method.index()).copied().unwrap_or(false)
	}

	/// Removes a method from the candidate pool. Returns false if it was
	/// already claimed.
	pub(crate) fn claim(&mut self, method: MethodIdx) -> bool {
		match self.claimed.get_mut(method.index()) {
			Some(slot) if !*slot => {
				*slot = true;
				true
			}
			_ => false,
		}
	}

	/// Same features by identity with semantically equal holders, and the
	/// same discovery reports. Member order does not matter.
	pub fn semantically_eq(&self, other: &TypeSpec) -> bool {
		if self.name() != other.name() || self.features.len() != other.features.len() {
			return false;
		}
		let same_features = self
			.features
			.iter()
			.all(|f| other.by_id(f.id()).is_some_and(|o| f.semantically_eq(o)));
		let mut mine = self.reports.clone();
		let mut theirs = other.reports.clone();
		mine.sort();
		theirs.sort();
		same_features && mine == theirs
	}
}

/// The frozen graph: every type specification, keyed by type name.
#[derive(Debug, Clone)]
pub struct Metamodel {
	types: IndexMap<Arc<str>, TypeSpec, FxBuildHasher>,
	warnings: Vec<ValidationFailure>,
	contributors: usize,
}

impl Metamodel {
	pub(crate) fn new(mut types: IndexMap<Arc<str>, TypeSpec, FxBuildHasher>, contributors: usize) -> Self {
		types.sort_keys();
		Self {
			types,
			warnings: Vec::new(),
			contributors,
		}
	}

	pub(crate) fn set_warnings(&mut self, warnings: Vec<ValidationFailure>) {
		self.warnings = warnings;
	}

	pub fn specification_for(&self, type_name: &str) -> Option<&TypeSpec> {
		self.types.get(type_name)
	}

	pub(crate) fn index_of(&self, type_name: &str) -> Option<usize> {
		self.types.get_index_of(type_name)
	}

	pub(crate) fn spec_at(&self, index: usize) -> &TypeSpec {
		&self.types[index]
	}

	pub fn feature(&self, id: &FeatureId) -> Option<&FeatureModel> {
		self.types.get(id.type_name())?.by_id(id)
	}

	pub fn capability_of(&self, id: &FeatureId, kind: KindId) -> Option<&Arc<Capability>> {
		self.feature(id)?.holder().get(kind)
	}

	/// Typed view of the active capability of `K` on `id`.
	pub fn capability<K: CapabilityKind>(&self, id: &FeatureId) -> Option<&K::Payload> {
		self.feature(id)?.capability::<K>()
	}

	/// Type specifications in name order.
	pub fn types(&self) -> impl Iterator<Item = &TypeSpec> {
		self.types.values()
	}

	pub fn type_names(&self) -> impl Iterator<Item = &str> {
		self.types.keys().map(|k| &**k)
	}

	pub fn len(&self) -> usize {
		self.types.len()
	}

	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}

	pub fn feature_count(&self) -> usize {
		self.types.values().map(|t| t.features().len()).sum()
	}

	/// Failures tolerated by a tolerant build.
	pub fn warnings(&self) -> &[ValidationFailure] {
		&self.warnings
	}

	/// Number of discovery units plus postprocessors that built this graph.
	pub fn contributors(&self) -> usize {
		self.contributors
	}

	/// Structural and capability-level equality, ignoring declaration order.
	pub fn semantically_eq(&self, other: &Metamodel) -> bool {
		self.types.len() == other.types.len()
			&& self.warnings == other.warnings
			&& self
				.types
				.iter()
				.all(|(name, spec)| other.types.get(name).is_some_and(|o| spec.semantically_eq(o)))
	}
}
