use std::any::TypeId;
use std::collections::BTreeMap;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use super::{CapabilityKind, KindId, WinPolicy};
use crate::error::ProgrammingError;

/// Registered description of a capability kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindSpec {
	pub id: KindId,
	pub payload: TypeId,
	pub payload_name: &'static str,
	pub policy: WinPolicy,
}

impl KindSpec {
	pub fn of<K: CapabilityKind + ?Sized>() -> Self {
		Self {
			id: K::ID,
			payload: TypeId::of::<K::Payload>(),
			payload_name: std::any::type_name::<K::Payload>(),
			policy: K::POLICY,
		}
	}

	pub fn with_policy(mut self, policy: WinPolicy) -> Self {
		self.policy = policy;
		self
	}
}

/// Set of capability kinds known to a build.
///
/// Registration is idempotent for identical specs. Re-registering a name with a
/// different payload type or policy is a programming error.
#[derive(Debug, Clone, Default)]
pub struct KindRegistry {
	specs: IndexMap<KindId, KindSpec, FxBuildHasher>,
}

impl KindRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register<K: CapabilityKind>(&mut self) -> Result<(), ProgrammingError> {
		self.register_spec(K::spec())
	}

	pub fn register_spec(&mut self, spec: KindSpec) -> Result<(), ProgrammingError> {
		match self.specs.get(&spec.id) {
			None => {
				self.specs.insert(spec.id, spec);
				Ok(())
			}
			Some(existing) if *existing == spec => Ok(()),
			Some(existing) => Err(ProgrammingError::ConflictingKind {
				kind: spec.id,
				existing: existing.payload_name,
				incoming: spec.payload_name,
			}),
		}
	}

	pub fn get(&self, id: KindId) -> Option<&KindSpec> {
		self.specs.get(&id)
	}

	/// Looks up a registered kind, failing with a suggestion when absent.
	pub fn require(&self, id: KindId) -> Result<&KindSpec, ProgrammingError> {
		self.specs.get(&id).ok_or_else(|| self.unknown(id.name()))
	}

	pub fn get_by_name(&self, name: &str) -> Option<&KindSpec> {
		self.specs.values().find(|s| s.id.name() == name)
	}

	/// Overrides the win policy of a registered kind.
	pub fn set_policy(&mut self, name: &str, policy: WinPolicy) -> Result<(), ProgrammingError> {
		let Some(id) = self.get_by_name(name).map(|s| s.id) else {
			return Err(self.unknown(name));
		};
		if let Some(spec) = self.specs.get_mut(&id) {
			spec.policy = policy;
		}
		Ok(())
	}

	/// Applies configured policy overrides, keyed by kind name.
	pub fn apply_overrides(&mut self, overrides: &BTreeMap<String, WinPolicy>) -> Result<(), ProgrammingError> {
		for (name, policy) in overrides {
			self.set_policy(name, *policy)?;
		}
		Ok(())
	}

	pub fn iter(&self) -> impl Iterator<Item = &KindSpec> {
		self.specs.values()
	}

	pub fn len(&self) -> usize {
		self.specs.len()
	}

	pub fn is_empty(&self) -> bool {
		self.specs.is_empty()
	}

	fn unknown(&self, name: &str) -> ProgrammingError {
		let suggestion = self
			.specs
			.keys()
			.map(|id| (id.name(), strsim::jaro_winkler(name, id.name())))
			.filter(|(_, score)| *score > 0.8)
			.max_by(|a, b| a.1.total_cmp(&b.1))
			.map(|(candidate, _)| candidate);
		ProgrammingError::UnknownKind {
			name: name.to_string(),
			suggestion,
		}
	}
}
