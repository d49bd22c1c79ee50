use std::sync::Arc;

use pretty_assertions::assert_eq;

use super::*;
use crate::capability::{CapabilityKind, WinPolicy};
use crate::config::{MetamodelConfig, ValidationPolicy};
use crate::decl::{FieldDecl, TypeDecl, ValueType};
use crate::discovery::{Phase, UnitOrder, rules};
use crate::identity::{FeatureId, FeatureShapes};
use crate::model::GraphDraft;
use crate::test_fixtures::{FixedLabel, Label, LabelKind, customer, inputs, kinds, model, order, text_method};

fn valid(outcome: BuildOutcome) -> Metamodel {
	match outcome {
		BuildOutcome::Valid(graph) => graph,
		BuildOutcome::Invalid(report) => panic!("unexpected rejection: {report}"),
	}
}

fn invalid(outcome: BuildOutcome) -> ValidationReport {
	match outcome {
		BuildOutcome::Valid(_) => panic!("expected rejection"),
		BuildOutcome::Invalid(report) => report,
	}
}

/// Gives unlabelled properties the label of the type they reference.
struct InheritLabel;

impl Postprocessor for InheritLabel {
	fn name(&self) -> &'static str {
		"inherit-label"
	}

	fn postprocess(&self, graph: &mut GraphDraft<'_>) -> Result<(), ProgrammingError> {
		for id in graph.feature_ids(FeatureShapes::PROPERTY) {
			if graph.payload::<LabelKind>(&id).is_some() {
				continue;
			}
			let Some(target) = graph
				.feature(&id)
				.and_then(|f| f.value_type().referenced_type())
				.map(FeatureId::for_type)
			else {
				continue;
			};
			if let Some(label) = graph.payload::<LabelKind>(&target).cloned() {
				graph.attach::<LabelKind>(&id, label)?;
			}
		}
		Ok(())
	}
}

/// Attaches `texts` to one feature, one after another.
struct Restack {
	feature: FeatureId,
	texts: &'static [&'static str],
}

impl Postprocessor for Restack {
	fn name(&self) -> &'static str {
		"restack"
	}

	fn postprocess(&self, graph: &mut GraphDraft<'_>) -> Result<(), ProgrammingError> {
		for text in self.texts {
			graph.attach::<LabelKind>(&self.feature, Label(text.to_string()))?;
		}
		Ok(())
	}
}

#[test]
fn test_postprocessor_sees_the_whole_graph() {
	let inputs = inputs().with_postprocessor(InheritLabel).unwrap();
	let graph = valid(build_metamodel(&inputs).unwrap());

	let last_order = FeatureId::for_type("Customer").member("last_order");
	let cap = graph.capability_of(&last_order, LabelKind::ID).unwrap();
	assert_eq!(cap.downcast::<Label>(), Some(&Label("Purchase order".into())));
	assert_eq!(cap.origin(), "inherit-label");
	assert_eq!(graph.capability::<LabelKind>(&FeatureId::for_type("Customer").member("name")), None);
	assert_eq!(graph.contributors(), 3);
}

#[test]
fn test_types_are_sorted_by_name() {
	let graph = valid(build_metamodel(&inputs()).unwrap());
	assert_eq!(graph.type_names().collect::<Vec<_>>(), vec!["Customer", "Order"]);
}

#[test]
fn test_duplicate_inputs_are_programming_errors() {
	let err = inputs().with_postprocessor(InheritLabel).unwrap().with_postprocessor(InheritLabel).err();
	assert_eq!(err, Some(ProgrammingError::DuplicatePostprocessor { name: "inherit-label" }));

	let dup = inputs().with_types([order()]);
	assert_eq!(
		build_metamodel(&dup).unwrap_err(),
		ProgrammingError::DuplicateType { name: "Order".into() }
	);
}

#[test]
fn test_postprocessor_addressing_missing_feature_fails() {
	let inputs = inputs()
		.with_postprocessor(Restack {
			feature: FeatureId::for_type("Invoice"),
			texts: &["x"],
		})
		.unwrap();
	assert_eq!(
		build_metamodel(&inputs).unwrap_err(),
		ProgrammingError::UnknownFeature {
			feature: FeatureId::for_type("Invoice"),
		}
	);
}

#[test]
fn test_discovery_reports_reject_strict_build() {
	let broken = TypeDecl::new("Ledger")
		.field(FieldDecl::new("balance", ValueType::Int))
		.method(text_method("guardMissing", None));
	let inputs = inputs().with_types([broken]);

	let report = invalid(build_metamodel(&inputs).unwrap());
	assert_eq!(report.len(), 1);
	assert_eq!(report.failures()[0].rule(), rules::ORPHANED_METHOD);
	assert_eq!(report.failures()[0].feature(), &FeatureId::for_type("Ledger"));
}

#[test]
fn test_tolerant_build_keeps_warnings() {
	let broken = TypeDecl::new("Ledger").method(text_method("guardMissing", None));
	let config = MetamodelConfig::default().with_validation(ValidationPolicy::Tolerant);
	let inputs = inputs().with_types([broken]).with_config(config);

	let graph = valid(build_metamodel(&inputs).unwrap());
	assert_eq!(graph.warnings().len(), 1);
	assert!(graph.specification_for("Ledger").is_some());
}

#[test]
fn test_chain_longer_than_contributors_is_rejected() {
	let total = FeatureId::for_type("Order").member("total");
	let inputs = inputs()
		.with_postprocessor(Restack {
			feature: total.clone(),
			texts: &["a", "b", "c"],
		})
		.unwrap();

	let report = invalid(build_metamodel(&inputs).unwrap());
	let failures: Vec<_> = report.by_rule("chain-bound").collect();
	assert_eq!(failures.len(), 1);
	assert_eq!(failures[0].feature(), &total);
}

#[test]
fn test_builds_are_idempotent() {
	let inputs = inputs().with_postprocessor(InheritLabel).unwrap();
	let a = valid(build_metamodel(&inputs).unwrap());
	let b = valid(build_metamodel(&inputs).unwrap());
	assert!(a.semantically_eq(&b));

	let other = valid(build_metamodel(&BuildInputs::new(model(), kinds()).with_types([order()])).unwrap());
	assert!(!a.semantically_eq(&other));
}

#[test]
fn test_candidate_order_does_not_matter() {
	let a = valid(build_metamodel(&BuildInputs::new(model(), kinds()).with_types([order(), customer()])).unwrap());
	let b = valid(build_metamodel(&BuildInputs::new(model(), kinds()).with_types([customer(), order()])).unwrap());
	assert!(a.semantically_eq(&b));
}

#[test]
fn test_parallel_matches_sequential() {
	let decls = || {
		(0..16).map(|i| {
			TypeDecl::new(format!("T{i:02}"))
				.attr("label", format!("Type {i}"))
				.field(FieldDecl::new("value", ValueType::Int).attr("label", "Value"))
				.method(text_method("guardValue", Some("locked")))
		})
	};
	let build = |parallelism| {
		let config = MetamodelConfig::default().with_parallelism(parallelism);
		valid(build_metamodel(&BuildInputs::new(model(), kinds()).with_types(decls()).with_config(config)).unwrap())
	};

	let sequential = build(1);
	let parallel = build(4);
	assert_eq!(parallel.len(), 16);
	assert!(sequential.semantically_eq(&parallel));
	assert_eq!(
		sequential.type_names().collect::<Vec<_>>(),
		parallel.type_names().collect::<Vec<_>>()
	);
}

#[test]
fn test_win_policy_override_from_config() {
	let mut builder = ProgrammingModel::builder();
	for (name, rank) in [("first", 0), ("second", 1)] {
		builder
			.register(FixedLabel {
				name,
				text: name,
				order: UnitOrder::new(Phase::Metadata, rank),
			})
			.unwrap();
	}
	let model = Arc::new(builder.build());
	let total = FeatureId::for_type("Order").member("total");

	let decorated = valid(build_metamodel(&BuildInputs::new(model.clone(), kinds()).with_types([order()])).unwrap());
	let cap = decorated.capability_of(&total, LabelKind::ID).unwrap();
	assert_eq!(cap.origin(), "second");
	assert_eq!(cap.depth(), 2);

	let config = MetamodelConfig::default().with_win_policy("fixture.label", WinPolicy::FirstWins);
	let inputs = BuildInputs::new(model, kinds()).with_types([order()]).with_config(config);
	let first_wins = valid(build_metamodel(&inputs).unwrap());
	let cap = first_wins.capability_of(&total, LabelKind::ID).unwrap();
	assert_eq!(cap.origin(), "first");
	assert_eq!(cap.depth(), 1);
}

#[test]
fn test_unknown_policy_override_is_programming_error() {
	let config = MetamodelConfig::default().with_win_policy("fixture.lable", WinPolicy::Replace);
	let err = build_metamodel(&inputs().with_config(config)).unwrap_err();
	assert_eq!(
		err,
		ProgrammingError::UnknownKind {
			name: "fixture.lable".into(),
			suggestion: Some("fixture.label"),
		}
	);
}
