use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use super::{FeatureModel, TypeSpec};
use crate::capability::{AttachOutcome, Capability, CapabilityKind, KindId, KindRegistry, Payload};
use crate::error::ProgrammingError;
use crate::identity::{FeatureId, FeatureShapes};

/// Mutable view of the whole graph handed to a postprocessor.
///
/// Exists only between the discovery barrier and the freeze. Every
/// attachment made through it is attributed to the running postprocessor.
pub struct GraphDraft<'a> {
	types: &'a mut IndexMap<Arc<str>, TypeSpec, FxBuildHasher>,
	kinds: &'a KindRegistry,
	origin: &'static str,
}

impl<'a> GraphDraft<'a> {
	pub(crate) fn new(
		types: &'a mut IndexMap<Arc<str>, TypeSpec, FxBuildHasher>,
		kinds: &'a KindRegistry,
		origin: &'static str,
	) -> Self {
		Self { types, kinds, origin }
	}

	/// Name of the postprocessor this draft is attributed to.
	pub fn origin(&self) -> &'static str {
		self.origin
	}

	pub fn type_names(&self) -> Vec<Arc<str>> {
		self.types.keys().cloned().collect()
	}

	pub fn spec(&self, type_name: &str) -> Option<&TypeSpec> {
		self.types.get(type_name)
	}

	pub fn feature(&self, id: &FeatureId) -> Option<&FeatureModel> {
		self.types.get(id.type_name())?.by_id(id)
	}

	/// Identities of every feature in the graph whose kind is in `shapes`.
	pub fn feature_ids(&self, shapes: FeatureShapes) -> Vec<FeatureId> {
		self.types
			.values()
			.flat_map(|spec| spec.features())
			.filter(|f| shapes.contains(f.kind().shape()))
			.map(|f| f.id().clone())
			.collect()
	}

	pub fn capability(&self, id: &FeatureId, kind: KindId) -> Option<Arc<Capability>> {
		self.feature(id)?.holder().get(kind).cloned()
	}

	pub fn payload<K: CapabilityKind>(&self, id: &FeatureId) -> Option<&K::Payload> {
		self.feature(id)?.capability::<K>()
	}

	pub fn attach<K: CapabilityKind>(
		&mut self,
		id: &FeatureId,
		payload: K::Payload,
	) -> Result<AttachOutcome, ProgrammingError> {
		self.attach_dyn(id, K::ID, Arc::new(payload))
	}

	pub fn attach_dyn(
		&mut self,
		id: &FeatureId,
		kind: KindId,
		payload: Arc<dyn Payload>,
	) -> Result<AttachOutcome, ProgrammingError> {
		let spec = *self.kinds.require(kind)?;
		let unknown = || ProgrammingError::UnknownFeature { feature: id.clone() };
		let type_spec = self.types.get_mut(id.type_name()).ok_or_else(unknown)?;
		let idx = type_spec.index_of(id).ok_or_else(unknown)?;
		let feature = type_spec.feature_mut(idx).ok_or_else(unknown)?;
		feature.holder_mut().add(&spec, self.origin, payload)
	}
}
