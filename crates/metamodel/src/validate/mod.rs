//! Validator composite.
//!
//! # Role
//!
//! Rules inspect the frozen graph and append failures to a shared
//! accumulator. They receive `&Metamodel` only, so they cannot mutate what
//! they check, and the order in which they run does not affect the outcome.
//!
//! # Invariants
//!
//! - The outcome is valid iff no rule reported anything.
//!   - Enforced in: [`ValidationReport::is_valid`].
//! - Every failure names the rule that produced it.
//!   - Enforced in: [`Failures::report`] (stamped from the running rule).

pub(crate) mod builtin;


use std::fmt;
use std::sync::Arc;

use crate::identity::FeatureId;
use crate::model::{FeatureModel, Metamodel};

/// A non-fatal problem found in the declarations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValidationFailure {
	feature: FeatureId,
	rule: &'static str,
	message: String,
}

impl ValidationFailure {
	pub fn new(feature: FeatureId, rule: &'static str, message: impl Into<String>) -> Self {
		Self {
			feature,
			rule,
			message: message.into(),
		}
	}

	pub fn feature(&self) -> &FeatureId {
		&self.feature
	}

	pub fn rule(&self) -> &'static str {
		self.rule
	}

	pub fn message(&self) -> &str {
		&self.message
	}
}

impl fmt::Display for ValidationFailure {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {} [{}]", self.feature, self.message, self.rule)
	}
}

/// Shared failure accumulator handed to every rule.
#[derive(Debug, Default)]
pub struct Failures {
	rule: &'static str,
	items: Vec<ValidationFailure>,
}

impl Failures {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	/// Records a failure against `feature` under the currently running rule.
	pub fn report(&mut self, feature: &FeatureId, message: impl Into<String>) {
		let failure = ValidationFailure::new(feature.clone(), self.rule, message);
		self.items.push(failure);
	}

	/// Records a failure that already carries its rule name.
	pub fn push(&mut self, failure: ValidationFailure) {
		self.items.push(failure);
	}

	pub fn len(&self) -> usize {
		self.items.len()
	}

	pub fn is_empty(&self) -> bool {
		self.items.is_empty()
	}

	fn with_rule<R>(&mut self, rule: &'static str, f: impl FnOnce(&mut Self) -> R) -> R {
		let prev = std::mem::replace(&mut self.rule, rule);
		let out = f(self);
		self.rule = prev;
		out
	}

	pub(crate) fn into_report(self) -> ValidationReport {
		ValidationReport::new(self.items)
	}
}

/// An independently registered validation rule.
///
/// Both hooks default to no-ops; a rule overrides whichever it needs.
pub trait Validator: Send + Sync {
	fn name(&self) -> &'static str;

	/// Called once per feature of every type specification.
	fn check_feature(&self, graph: &Metamodel, feature: &FeatureModel, out: &mut Failures) {
		let _ = (graph, feature, out);
	}

	/// Called once for the whole graph.
	fn check_graph(&self, graph: &Metamodel, out: &mut Failures) {
		let _ = (graph, out);
	}
}

/// A flat or nested set of rules, itself usable as a rule.
#[derive(Clone)]
pub struct ValidatorComposite {
	name: &'static str,
	rules: Vec<Arc<dyn Validator>>,
}

impl ValidatorComposite {
	pub fn new(name: &'static str) -> Self {
		Self {
			name,
			rules: Vec::new(),
		}
	}

	pub fn with(mut self, rule: impl Validator + 'static) -> Self {
		self.push(Arc::new(rule));
		self
	}

	pub fn push(&mut self, rule: Arc<dyn Validator>) {
		self.rules.push(rule);
	}

	pub fn len(&self) -> usize {
		self.rules.len()
	}

	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}

	pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.rules.iter().map(|r| r.name())
	}

	/// Runs every rule against every feature, then against the graph.
	pub fn validate(&self, graph: &Metamodel) -> ValidationReport {
		let mut out = Failures::new();
		self.run(graph, &mut out);
		out.into_report()
	}

	pub(crate) fn run(&self, graph: &Metamodel, out: &mut Failures) {
		for spec in graph.types() {
			for feature in spec.features() {
				self.check_feature(graph, feature, out);
			}
		}
		self.check_graph(graph, out);
	}
}

impl Validator for ValidatorComposite {
	fn name(&self) -> &'static str {
		self.name
	}

	fn check_feature(&self, graph: &Metamodel, feature: &FeatureModel, out: &mut Failures) {
		for rule in &self.rules {
			out.with_rule(rule.name(), |out| rule.check_feature(graph, feature, out));
		}
	}

	fn check_graph(&self, graph: &Metamodel, out: &mut Failures) {
		for rule in &self.rules {
			out.with_rule(rule.name(), |out| rule.check_graph(graph, out));
		}
	}
}

impl fmt::Debug for ValidatorComposite {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ValidatorComposite")
			.field("name", &self.name)
			.field("rules", &self.rule_names().collect::<Vec<_>>())
			.finish()
	}
}

/// Sorted, deduplicated batch of failures from one validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
	failures: Vec<ValidationFailure>,
}

impl ValidationReport {
	pub fn new(mut failures: Vec<ValidationFailure>) -> Self {
		failures.sort();
		failures.dedup();
		Self { failures }
	}

	pub fn is_valid(&self) -> bool {
		self.failures.is_empty()
	}

	pub fn failures(&self) -> &[ValidationFailure] {
		&self.failures
	}

	pub fn len(&self) -> usize {
		self.failures.len()
	}

	pub fn is_empty(&self) -> bool {
		self.failures.is_empty()
	}

	/// Failures produced by the named rule.
	pub fn by_rule<'a>(&'a self, rule: &'a str) -> impl Iterator<Item = &'a ValidationFailure> + 'a {
		self.failures.iter().filter(move |f| f.rule == rule)
	}

	pub fn into_failures(self) -> Vec<ValidationFailure> {
		self.failures
	}
}

impl fmt::Display for ValidationReport {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.failures.is_empty() {
			return f.write_str("no validation failures");
		}
		writeln!(f, "{} validation failure(s):", self.failures.len())?;
		for failure in &self.failures {
			writeln!(f, "  {failure}")?;
		}
		Ok(())
	}
}
