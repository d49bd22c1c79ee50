//! Rules every build runs ahead of host rules.

use super::{Failures, Validator, ValidatorComposite};
use crate::model::{FeatureModel, Metamodel};

/// Surfaces the reports recorded during discovery.
///
/// Discovery never fails a build directly; ambiguous companions, unsupported
/// configuration values and orphaned supporting methods are recorded on the
/// type specification and turned into failures here.
pub struct DiscoveryReportRule;

impl Validator for DiscoveryReportRule {
	fn name(&self) -> &'static str {
		"discovery"
	}

	fn check_graph(&self, graph: &Metamodel, out: &mut Failures) {
		for spec in graph.types() {
			for report in spec.reports() {
				out.push(report.clone());
			}
		}
	}
}

/// Caps decoration-chain length at the number of contributors.
///
/// Each unit or postprocessor contributes at most once per kind per feature,
/// so a longer chain means a contributor ran twice.
pub struct ChainBoundRule {
	limit: usize,
}

impl ChainBoundRule {
	pub fn new(limit: usize) -> Self {
		Self { limit }
	}
}

impl Validator for ChainBoundRule {
	fn name(&self) -> &'static str {
		"chain-bound"
	}

	fn check_feature(&self, _graph: &Metamodel, feature: &FeatureModel, out: &mut Failures) {
		for cap in feature.holder().iter() {
			let depth = cap.depth();
			if depth > self.limit {
				out.report(
					feature.id(),
					format!("{} chain has {depth} links, limit is {}", cap.kind(), self.limit),
				);
			}
		}
	}
}

pub(crate) fn builtin_rules(contributors: usize) -> ValidatorComposite {
	ValidatorComposite::new("builtin")
		.with(DiscoveryReportRule)
		.with(ChainBoundRule::new(contributors))
}
