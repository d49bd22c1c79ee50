use std::sync::Arc;

use rustc_hash::FxHashMap;

use super::{AttachOutcome, Capability, CapabilityKind, KindId, KindRegistry, KindSpec, Payload, WinPolicy};
use crate::error::ProgrammingError;
use crate::identity::FeatureId;

/// Active-capability map for one feature.
///
/// Single-writer while the owning type is being built; read-only once the
/// graph is frozen.
#[derive(Debug, Clone)]
pub struct CapabilityHolder {
	feature: FeatureId,
	active: FxHashMap<KindId, Arc<Capability>>,
}

impl CapabilityHolder {
	pub fn new(feature: FeatureId) -> Self {
		Self {
			feature,
			active: FxHashMap::default(),
		}
	}

	pub fn feature(&self) -> &FeatureId {
		&self.feature
	}

	/// Attaches `payload` under `spec`, resolving against the active capability
	/// of that kind according to the kind's policy.
	pub fn add(
		&mut self,
		spec: &KindSpec,
		origin: &'static str,
		payload: Arc<dyn Payload>,
	) -> Result<AttachOutcome, ProgrammingError> {
		if payload.as_any().type_id() != spec.payload {
			return Err(ProgrammingError::PayloadMismatch {
				kind: spec.id,
				expected: spec.payload_name,
				found: payload.type_name(),
			});
		}

		let (outcome, underlying) = match self.active.get(&spec.id) {
			None => (AttachOutcome::Inserted, None),
			Some(prev) if prev.payload.semantically_eq(&*payload) => {
				return Ok(self.traced(spec.id, origin, AttachOutcome::Collapsed));
			}
			Some(_) if spec.policy == WinPolicy::FirstWins => {
				return Ok(self.traced(spec.id, origin, AttachOutcome::KeptExisting));
			}
			Some(_) if spec.policy == WinPolicy::Replace => (AttachOutcome::Replaced, None),
			Some(prev) => (AttachOutcome::Decorated, Some(prev.clone())),
		};

		let cap = Capability::new(spec.id, self.feature.clone(), origin, payload, underlying);
		self.active.insert(spec.id, Arc::new(cap));
		Ok(self.traced(spec.id, origin, outcome))
	}

	/// Typed attachment; the kind must be registered in `kinds`.
	pub fn attach<K: CapabilityKind>(
		&mut self,
		kinds: &KindRegistry,
		origin: &'static str,
		payload: K::Payload,
	) -> Result<AttachOutcome, ProgrammingError> {
		let spec = *kinds.require(K::ID)?;
		self.add(&spec, origin, Arc::new(payload))
	}

	fn traced(&self, kind: KindId, origin: &'static str, outcome: AttachOutcome) -> AttachOutcome {
		tracing::trace!(feature = %self.feature, %kind, origin, %outcome, "capability attach");
		outcome
	}

	/// Active capability of `kind`, if any.
	pub fn get(&self, kind: KindId) -> Option<&Arc<Capability>> {
		self.active.get(&kind)
	}

	/// Typed view of the active payload of `K`.
	pub fn payload<K: CapabilityKind>(&self) -> Option<&K::Payload> {
		self.active.get(&K::ID)?.downcast::<K::Payload>()
	}

	/// Typed payloads of the decoration chain of `K`, newest first.
	pub fn payloads<K: CapabilityKind>(&self) -> impl Iterator<Item = &K::Payload> {
		self.active
			.get(&K::ID)
			.into_iter()
			.flat_map(|cap| cap.chain())
			.filter_map(|cap| cap.downcast::<K::Payload>())
	}

	pub fn has<K: CapabilityKind>(&self) -> bool {
		self.active.contains_key(&K::ID)
	}

	pub fn contains(&self, kind: KindId) -> bool {
		self.active.contains_key(&kind)
	}

	/// Active capabilities ordered by kind name.
	pub fn iter(&self) -> impl Iterator<Item = &Arc<Capability>> {
		let mut caps: Vec<_> = self.active.values().collect();
		caps.sort_by_key(|c| c.kind());
		caps.into_iter()
	}

	pub fn kinds(&self) -> Vec<KindId> {
		let mut kinds: Vec<_> = self.active.keys().copied().collect();
		kinds.sort();
		kinds
	}

	pub fn len(&self) -> usize {
		self.active.len()
	}

	pub fn is_empty(&self) -> bool {
		self.active.is_empty()
	}

	/// Same kinds, and per kind the same decoration chain.
	pub fn semantically_eq(&self, other: &CapabilityHolder) -> bool {
		self.feature == other.feature
			&& self.active.len() == other.active.len()
			&& self.active.iter().all(|(kind, cap)| {
				other
					.active
					.get(kind)
					.is_some_and(|o| cap.chain_semantically_eq(o))
			})
	}
}
