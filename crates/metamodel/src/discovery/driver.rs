use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashSet;

use super::context::DiscoveryContext;
use super::{ProgrammingModel, rules};
use crate::capability::KindRegistry;
use crate::decl::{MethodIdx, TypeDecl};
use crate::error::ProgrammingError;
use crate::identity::{FeatureId, FeatureKind, FeatureShapes};
use crate::model::{DeclSource, FeatureIdx, TypeSpec};

/// Builds the specification of one type.
///
/// Runs the type and field pass, exposes the remaining methods as actions,
/// runs the action and parameter pass, then reports orphaned companions.
/// Reads nothing outside `decl`, so types can be discovered concurrently.
pub(crate) fn discover_type(
	decl: Arc<TypeDecl>,
	model: &ProgrammingModel,
	kinds: &KindRegistry,
) -> Result<TypeSpec, ProgrammingError> {
	let _span = tracing::debug_span!("discover", type_name = %decl.name()).entered();
	let mut spec = TypeSpec::new(decl.clone())?;

	run_pass(&mut spec, &decl, model, kinds, FeatureShapes::TYPE | FeatureShapes::FIELDS)?;
	let withheld = expose_actions(&mut spec, &decl, model)?;
	run_pass(&mut spec, &decl, model, kinds, FeatureShapes::ACTION | FeatureShapes::PARAMETER)?;
	sweep_orphans(&mut spec, &decl, model, &withheld);

	tracing::debug!(
		features = spec.features().len(),
		reports = spec.reports().len(),
		"type discovered"
	);
	Ok(spec)
}

fn run_pass(
	spec: &mut TypeSpec,
	decl: &TypeDecl,
	model: &ProgrammingModel,
	kinds: &KindRegistry,
	pass: FeatureShapes,
) -> Result<(), ProgrammingError> {
	for unit in model.units() {
		let shapes = unit.shapes() & pass;
		if shapes.is_empty() {
			continue;
		}
		let targets = spec.indices_with(shapes);
		tracing::trace!(unit = unit.name(), features = targets.len(), "unit pass");
		for idx in targets {
			let mut cx = DiscoveryContext::new(spec, decl, kinds, idx, unit.name());
			unit.process(&mut cx)?;
		}
	}
	Ok(())
}

/// Turns unclaimed, non-reserved methods into actions with parameters.
///
/// Returns the companion names withheld from exposure: a method named after a
/// companion of a field or of a prospective action waits for the action pass
/// even when its name does not have a reserved shape.
fn expose_actions(
	spec: &mut TypeSpec,
	decl: &TypeDecl,
	model: &ProgrammingModel,
) -> Result<FxHashSet<String>, ProgrammingError> {
	let mut candidates: IndexMap<&str, Vec<MethodIdx>> = IndexMap::new();
	for (idx, method) in decl.method_indices() {
		if spec.is_claimed(idx) || model.is_reserved(method.name()) {
			continue;
		}
		candidates.entry(method.name()).or_default().push(idx);
	}

	let type_id = spec.type_feature().id().clone();
	let withheld = prospective_companions(&type_id, decl, &candidates, model);
	for (name, indices) in candidates {
		if withheld.contains(name) {
			continue;
		}
		if indices.len() > 1 {
			spec.report(
				type_id.clone(),
				rules::OVERLOADED_ACTION,
				format!("{} methods named {name}; not exposed", indices.len()),
			);
			continue;
		}
		if decl.fields().iter().any(|f| f.name() == name) {
			spec.report(
				type_id.clone(),
				rules::ACTION_SHADOWS_FIELD,
				format!("method {name} shares its name with a field; not exposed"),
			);
			continue;
		}

		let method_idx = indices[0];
		let method = &decl.methods()[method_idx.index()];
		let action_id = type_id.member(name);
		let param_ids = (0..method.params().len())
			.map(|i| u16::try_from(i).map(|i| action_id.param(i)))
			.collect::<Result<Vec<_>, _>>()
			.map_err(|_| ProgrammingError::TooManyParameters {
				action: action_id.clone(),
				count: method.params().len(),
			})?;

		spec.claim(method_idx);
		let action = spec.push_feature(
			Some(FeatureIdx::ROOT),
			action_id,
			FeatureKind::Action,
			method.returns().clone(),
			DeclSource::Method(method_idx),
		)?;
		for ((index, param), id) in method.params().iter().enumerate().zip(param_ids) {
			spec.push_feature(
				Some(action),
				id,
				FeatureKind::Parameter,
				param.value_type().clone(),
				DeclSource::Param {
					method: method_idx,
					index,
				},
			)?;
		}
	}
	Ok(withheld)
}

/// Companion names the model derives for every field and every action the
/// candidates would expose, parameters included.
fn prospective_companions(
	type_id: &FeatureId,
	decl: &TypeDecl,
	candidates: &IndexMap<&str, Vec<MethodIdx>>,
	model: &ProgrammingModel,
) -> FxHashSet<String> {
	let mut features: Vec<FeatureId> = decl.fields().iter().map(|f| type_id.member(f.name())).collect();
	for (name, indices) in candidates {
		let action = type_id.member(*name);
		let arity = indices
			.iter()
			.map(|idx| decl.methods()[idx.index()].params().len())
			.max()
			.unwrap_or_default();
		features.extend((0..arity).map_while(|i| u16::try_from(i).ok()).map(|i| action.param(i)));
		features.push(action);
	}
	features
		.iter()
		.flat_map(|id| model.conventions().filter_map(move |c| c.companion_name(id)))
		.collect()
}

fn sweep_orphans(spec: &mut TypeSpec, decl: &TypeDecl, model: &ProgrammingModel, withheld: &FxHashSet<String>) {
	let type_id = spec.type_feature().id().clone();
	for (idx, method) in decl.method_indices() {
		let companion_shaped = model.is_reserved(method.name()) || withheld.contains(method.name());
		if !spec.is_claimed(idx) && companion_shaped {
			spec.report(
				type_id.clone(),
				rules::ORPHANED_METHOD,
				format!("supporting method {} matches no feature", method.name()),
			);
		}
	}
}
