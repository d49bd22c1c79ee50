//! Build trigger.
//!
//! # Role
//!
//! Turns a set of candidate declarations into a frozen, validated graph:
//! per-type discovery (in parallel), a barrier, postprocessing over the whole
//! graph, then the validator composite.
//!
//! # Invariants
//!
//! - Postprocessing starts only after every type finished discovery.
//!   - Enforced in: [`build_metamodel`] (all workers joined before the first postprocessor runs).
//! - Building twice from identical inputs yields semantically equal graphs.
//!   - Enforced in: deterministic unit order, sorted type order, collapse of equal contributions.
//! - A type's discovery never reads another type's draft.
//!   - Enforced in: `discover_type` (takes one declaration, returns one specification).

#[cfg(test)]
mod tests;

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashSet};

use crate::capability::KindRegistry;
use crate::config::{MetamodelConfig, ValidationPolicy};
use crate::decl::TypeDecl;
use crate::discovery::ProgrammingModel;
use crate::discovery::driver::discover_type;
use crate::error::ProgrammingError;
use crate::model::{GraphDraft, Metamodel, TypeSpec};
use crate::postprocess::Postprocessor;
use crate::validate::builtin::builtin_rules;
use crate::validate::{Failures, ValidationReport, Validator, ValidatorComposite};

/// Everything a build reads. Reused verbatim by reload.
#[derive(Clone)]
pub struct BuildInputs {
	types: Vec<Arc<TypeDecl>>,
	kinds: KindRegistry,
	model: Arc<ProgrammingModel>,
	postprocessors: Vec<Arc<dyn Postprocessor>>,
	validators: ValidatorComposite,
	config: MetamodelConfig,
}

impl BuildInputs {
	pub fn new(model: Arc<ProgrammingModel>, kinds: KindRegistry) -> Self {
		Self {
			types: Vec::new(),
			kinds,
			model,
			postprocessors: Vec::new(),
			validators: ValidatorComposite::new("host"),
			config: MetamodelConfig::default(),
		}
	}

	pub fn with_types(mut self, types: impl IntoIterator<Item = TypeDecl>) -> Self {
		self.types.extend(types.into_iter().map(Arc::new));
		self
	}

	pub fn add_type(&mut self, decl: TypeDecl) {
		self.types.push(Arc::new(decl));
	}

	pub fn with_postprocessor(mut self, p: impl Postprocessor + 'static) -> Result<Self, ProgrammingError> {
		self.add_postprocessor(Arc::new(p))?;
		Ok(self)
	}

	pub fn add_postprocessor(&mut self, p: Arc<dyn Postprocessor>) -> Result<(), ProgrammingError> {
		let name = p.name();
		if self.postprocessors.iter().any(|q| q.name() == name) {
			return Err(ProgrammingError::DuplicatePostprocessor { name });
		}
		self.postprocessors.push(p);
		Ok(())
	}

	pub fn with_validator(mut self, rule: impl Validator + 'static) -> Self {
		self.validators.push(Arc::new(rule));
		self
	}

	pub fn with_config(mut self, config: MetamodelConfig) -> Self {
		self.config = config;
		self
	}

	pub fn types(&self) -> &[Arc<TypeDecl>] {
		&self.types
	}

	pub fn kinds(&self) -> &KindRegistry {
		&self.kinds
	}

	pub fn model(&self) -> &ProgrammingModel {
		&self.model
	}

	pub fn validators(&self) -> &ValidatorComposite {
		&self.validators
	}

	pub fn config(&self) -> &MetamodelConfig {
		&self.config
	}

	/// Discovery units plus postprocessors; the longest legal decoration chain.
	pub fn contributors(&self) -> usize {
		self.model.len() + self.postprocessors.len()
	}
}

/// Result of a build that did not hit a programming error.
#[derive(Debug)]
pub enum BuildOutcome {
	Valid(Metamodel),
	Invalid(ValidationReport),
}

impl BuildOutcome {
	pub fn is_valid(&self) -> bool {
		matches!(self, Self::Valid(_))
	}

	pub fn into_result(self) -> Result<Metamodel, ValidationReport> {
		match self {
			Self::Valid(graph) => Ok(graph),
			Self::Invalid(report) => Err(report),
		}
	}
}

/// Builds and validates a graph from `inputs`.
///
/// Programming errors abort immediately with `Err`. Declaration problems
/// are collected and returned as [`BuildOutcome::Invalid`], unless the
/// configuration tolerates them.
pub fn build_metamodel(inputs: &BuildInputs) -> Result<BuildOutcome, ProgrammingError> {
	let config = &inputs.config;
	let mut kinds = inputs.kinds.clone();
	kinds.apply_overrides(&config.win_policies)?;

	let mut seen = FxHashSet::default();
	for decl in &inputs.types {
		if !seen.insert(decl.name()) {
			return Err(ProgrammingError::DuplicateType {
				name: decl.name().to_string(),
			});
		}
	}

	let workers = config.effective_parallelism();
	let specs = discover_all(&inputs.types, &inputs.model, &kinds, workers)?;
	let mut types: IndexMap<Arc<str>, TypeSpec, FxBuildHasher> = specs
		.into_iter()
		.map(|spec| (spec.decl_arc().name_arc().clone(), spec))
		.collect();
	types.sort_keys();

	for p in &inputs.postprocessors {
		let _span = tracing::debug_span!("postprocess", postprocessor = p.name()).entered();
		let mut draft = GraphDraft::new(&mut types, &kinds, p.name());
		p.postprocess(&mut draft)?;
	}

	let mut graph = Metamodel::new(types, inputs.contributors());

	let mut failures = Failures::new();
	builtin_rules(inputs.contributors()).run(&graph, &mut failures);
	inputs.validators.run(&graph, &mut failures);
	let report = failures.into_report();

	if report.is_valid() {
		tracing::info!(types = graph.len(), features = graph.feature_count(), "metamodel built");
		return Ok(BuildOutcome::Valid(graph));
	}
	match config.validation {
		ValidationPolicy::Strict => {
			tracing::debug!(failures = report.len(), "metamodel rejected");
			Ok(BuildOutcome::Invalid(report))
		}
		ValidationPolicy::Tolerant => {
			for failure in report.failures() {
				tracing::warn!(feature = %failure.feature(), rule = failure.rule(), "{}", failure.message());
			}
			tracing::info!(
				types = graph.len(),
				features = graph.feature_count(),
				warnings = report.len(),
				"metamodel built with tolerated failures"
			);
			graph.set_warnings(report.into_failures());
			Ok(BuildOutcome::Valid(graph))
		}
	}
}

/// Discovers every type, spreading the work over up to `workers` scoped
/// threads. Output order matches input order.
fn discover_all(
	types: &[Arc<TypeDecl>],
	model: &ProgrammingModel,
	kinds: &KindRegistry,
	workers: usize,
) -> Result<Vec<TypeSpec>, ProgrammingError> {
	if workers <= 1 || types.len() <= 1 {
		return types.iter().map(|d| discover_type(d.clone(), model, kinds)).collect();
	}

	let chunk = types.len().div_ceil(workers);
	std::thread::scope(|s| {
		let handles: Vec<_> = types
			.chunks(chunk)
			.map(|batch| {
				s.spawn(move || {
					batch
						.iter()
						.map(|d| discover_type(d.clone(), model, kinds))
						.collect::<Result<Vec<_>, _>>()
				})
			})
			.collect();

		let mut specs = Vec::with_capacity(types.len());
		for handle in handles {
			let batch = handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic))?;
			specs.extend(batch);
		}
		Ok(specs)
	})
}
