//! Whole-graph postprocessors.

use tessera_metamodel::{FeatureId, FeatureShapes, GraphDraft, Postprocessor, ProgrammingError};

use crate::capabilities::{DescribedAsKind, Disabled, DisabledKind, EditingKind, EditingPolicy, ImmutableKind};

/// Disables the properties and collections of immutable types.
///
/// A field that explicitly opts in with `editing = "enabled"` is left alone.
/// The disabling decorates whatever the field already had, so a companion
/// `disable<Member>` is still consulted after the immutability check.
pub struct DisabledFromImmutable;

impl Postprocessor for DisabledFromImmutable {
	fn name(&self) -> &'static str {
		"disabled-from-immutable"
	}

	fn postprocess(&self, graph: &mut GraphDraft<'_>) -> Result<(), ProgrammingError> {
		for type_name in graph.type_names() {
			let type_id = FeatureId::for_type(type_name.clone());
			let Some(immutable) = graph.payload::<ImmutableKind>(&type_id) else {
				continue;
			};
			let reason = immutable
				.reason
				.clone()
				.unwrap_or_else(|| format!("{type_name} is immutable"));

			let Some(spec) = graph.spec(&type_name) else {
				continue;
			};
			let targets: Vec<FeatureId> = spec
				.members()
				.filter(|f| FeatureShapes::FIELDS.contains(f.kind().shape()))
				.filter(|f| f.capability::<EditingKind>() != Some(&EditingPolicy::Enabled))
				.map(|f| f.id().clone())
				.collect();

			tracing::debug!(type_name = %type_name, fields = targets.len(), "disabling immutable fields");
			for id in targets {
				graph.attach::<DisabledKind>(
					&id,
					Disabled::Immutable {
						source: type_id.clone(),
						reason: reason.clone(),
					},
				)?;
			}
		}
		Ok(())
	}
}

/// Gives undescribed members and parameters the description of the type they
/// reference.
pub struct DescribedAsFromReferencedType;

impl Postprocessor for DescribedAsFromReferencedType {
	fn name(&self) -> &'static str {
		"described-as-from-type"
	}

	fn postprocess(&self, graph: &mut GraphDraft<'_>) -> Result<(), ProgrammingError> {
		let shapes = FeatureShapes::FIELDS | FeatureShapes::PARAMETER;
		for id in graph.feature_ids(shapes) {
			if graph.payload::<DescribedAsKind>(&id).is_some() {
				continue;
			}
			let Some(target) = graph
				.feature(&id)
				.and_then(|f| f.value_type().referenced_type())
				.map(FeatureId::for_type)
			else {
				continue;
			};
			if let Some(described) = graph.payload::<DescribedAsKind>(&target).cloned() {
				graph.attach::<DescribedAsKind>(&id, described)?;
			}
		}
		Ok(())
	}
}
