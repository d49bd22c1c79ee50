//! Published graph with atomic reload.
//!
//! # Role
//!
//! [`SpecificationLoader`] owns the current graph behind an `ArcSwap`. Lookups
//! pin the snapshot they read from; reload builds a replacement off to the
//! side and publishes it with a single store once validation passes.
//!
//! # Invariants
//!
//! - Readers never observe a partially built graph.
//!   - Enforced in: [`SpecificationLoader::reload`] (store happens after a successful build).
//! - A [`SpecRef`] keeps its snapshot alive across swaps.
//!   - Enforced in: [`SpecRef`] (holds an `Arc<Metamodel>`).
//! - A failed reload leaves the current graph in place.
//!   - Enforced in: [`SpecificationLoader::reload`].


use std::ops::Deref;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;

use crate::build::{BuildInputs, BuildOutcome, build_metamodel};
use crate::capability::{Capability, CapabilityKind, KindId};
use crate::config::MetamodelConfig;
use crate::error::ProgrammingError;
use crate::identity::FeatureId;
use crate::model::{Metamodel, TypeSpec};
use crate::validate::ValidationReport;

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
	#[error(transparent)]
	Programming(#[from] ProgrammingError),
	#[error("metamodel rejected: {0}")]
	Invalid(ValidationReport),
}

#[derive(Debug, thiserror::Error)]
pub enum ReloadError {
	#[error("reload is not allowed in production mode")]
	Production,
	#[error(transparent)]
	Programming(#[from] ProgrammingError),
	#[error("replacement metamodel rejected: {0}")]
	Invalid(ValidationReport),
}

/// Owner of the published graph.
pub struct SpecificationLoader {
	inputs: BuildInputs,
	current: ArcSwap<Metamodel>,
	generation: AtomicU64,
}

impl SpecificationLoader {
	/// Builds the initial graph; any failure aborts bootstrap.
	pub fn bootstrap(inputs: BuildInputs) -> Result<Self, BootstrapError> {
		let graph = match build_metamodel(&inputs)? {
			BuildOutcome::Valid(graph) => graph,
			BuildOutcome::Invalid(report) => return Err(BootstrapError::Invalid(report)),
		};
		Ok(Self {
			inputs,
			current: ArcSwap::from_pointee(graph),
			generation: AtomicU64::new(0),
		})
	}

	pub fn config(&self) -> &MetamodelConfig {
		self.inputs.config()
	}

	/// Pins the current graph.
	pub fn current(&self) -> Arc<Metamodel> {
		self.current.load_full()
	}

	/// Number of successful reloads since bootstrap.
	pub fn generation(&self) -> u64 {
		self.generation.load(Ordering::Acquire)
	}

	pub fn specification_for(&self, type_name: &str) -> Option<SpecRef> {
		let graph = self.current.load_full();
		let index = graph.index_of(type_name)?;
		Some(SpecRef { graph, index })
	}

	pub fn capability_of(&self, feature: &FeatureId, kind: KindId) -> Option<Arc<Capability>> {
		self.current.load().capability_of(feature, kind).cloned()
	}

	/// Rebuilds from the bootstrap inputs and publishes the result.
	///
	/// Only allowed in prototype mode. Returns the new generation.
	pub fn reload(&self) -> Result<u64, ReloadError> {
		if !self.inputs.config().reload_allowed() {
			return Err(ReloadError::Production);
		}
		let graph = match build_metamodel(&self.inputs)? {
			BuildOutcome::Valid(graph) => graph,
			BuildOutcome::Invalid(report) => {
				tracing::warn!(failures = report.len(), "reload rejected; keeping current metamodel");
				return Err(ReloadError::Invalid(report));
			}
		};
		self.current.store(Arc::new(graph));
		let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
		tracing::info!(generation, "metamodel reloaded");
		Ok(generation)
	}
}

/// Snapshot-pinning handle to one type specification.
#[derive(Clone)]
pub struct SpecRef {
	graph: Arc<Metamodel>,
	index: usize,
}

impl SpecRef {
	/// The graph this specification was read from.
	pub fn graph(&self) -> &Arc<Metamodel> {
		&self.graph
	}

	pub fn capability_of(&self, feature: &FeatureId, kind: KindId) -> Option<&Arc<Capability>> {
		self.graph.capability_of(feature, kind)
	}

	pub fn capability<K: CapabilityKind>(&self, feature: &FeatureId) -> Option<&K::Payload> {
		self.graph.capability::<K>(feature)
	}
}

impl Deref for SpecRef {
	type Target = TypeSpec;

	fn deref(&self) -> &TypeSpec {
		self.graph.spec_at(self.index)
	}
}

impl std::fmt::Debug for SpecRef {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SpecRef").field("type_name", &self.name()).finish()
	}
}
