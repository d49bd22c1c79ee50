//! Query surface for renderers and adapters.
//!
//! Every helper reads the frozen graph and calls bound methods on the caller's
//! thread. Decorated kinds are walked newest-first; the first link that
//! applies decides.

use tessera_metamodel::{FeatureId, FeatureKind, FeatureModel, InvokeError, ObjectState, TypeSpec, Value};

use crate::capabilities::{
	ActionInvocationKind, ChoicesKind, DefaultKind, Disabled, DisabledKind, Hidden, HiddenKind, MaxLengthKind,
	NamedKind, Optionality, OptionalityKind, PropertyAccessorKind, TitleKind, ValidateKind,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InteractionError {
	#[error("{feature} is not an action")]
	NotAnAction { feature: FeatureId },
	#[error("{feature} is disabled: {reason}")]
	Disabled { feature: FeatureId, reason: String },
	#[error("{feature}: {reason}")]
	Invalid { feature: FeatureId, reason: String },
	#[error(transparent)]
	Invoke(#[from] InvokeError),
}

/// Title of an instance: the `title()` companion, else the type's display
/// name, else the type name.
pub fn title(spec: &TypeSpec, target: &ObjectState) -> Result<String, InvokeError> {
	let ty = spec.type_feature();
	if let Some(title) = ty.capability::<TitleKind>()
		&& let Some(text) = title.method.invoke_text(target, &[])?
	{
		return Ok(text);
	}
	Ok(display_name(ty).unwrap_or(spec.name()).to_string())
}

pub fn display_name(feature: &FeatureModel) -> Option<&str> {
	feature.capability::<NamedKind>().map(|n| n.text.as_str())
}

/// Why `feature` is unusable on `target`, or `None` if it is usable.
pub fn disabled_reason(feature: &FeatureModel, target: &ObjectState) -> Result<Option<String>, InvokeError> {
	for disabled in feature.chain::<DisabledKind>() {
		match disabled {
			Disabled::Always { reason } | Disabled::Immutable { reason, .. } => return Ok(Some(reason.clone())),
			Disabled::Method(method) => {
				if let Some(reason) = method.invoke_text(target, &[])? {
					return Ok(Some(reason));
				}
			}
		}
	}
	Ok(None)
}

pub fn is_hidden(feature: &FeatureModel, target: &ObjectState) -> Result<bool, InvokeError> {
	for hidden in feature.chain::<HiddenKind>() {
		let on = match hidden {
			Hidden::Always => true,
			Hidden::Method(method) => method.invoke_bool(target, &[])?,
		};
		if on {
			return Ok(true);
		}
	}
	Ok(false)
}

/// Checks a proposed value before it is applied.
///
/// For a property or parameter `args` holds the single proposed value; for an
/// action it is the full argument list. Returns the first reason the proposal
/// is rejected.
pub fn validate_proposed(
	feature: &FeatureModel,
	target: &ObjectState,
	args: &[Value],
) -> Result<Option<String>, InvokeError> {
	if matches!(feature.kind(), FeatureKind::Property | FeatureKind::Parameter)
		&& let Some(reason) = check_value(feature, args.first().unwrap_or(&Value::Nothing))
	{
		return Ok(Some(reason));
	}
	for validate in feature.chain::<ValidateKind>() {
		if let Some(reason) = validate.method.invoke_text(target, args)? {
			return Ok(Some(reason));
		}
	}
	Ok(None)
}

fn check_value(feature: &FeatureModel, value: &Value) -> Option<String> {
	if value.is_nothing() {
		return (feature.capability::<OptionalityKind>() == Some(&Optionality::Mandatory))
			.then(|| "required".to_string());
	}
	if !feature.value_type().accepts(value) {
		return Some(format!("expected {}, got {}", feature.value_type(), value.label()));
	}
	if let Some(max) = feature.capability::<MaxLengthKind>()
		&& let Some(text) = value.as_text()
		&& text.chars().count() > max.limit as usize
	{
		return Some(format!("may not exceed {} characters", max.limit));
	}
	None
}

/// Values offered for `feature`, if it has a choices companion.
pub fn choices(feature: &FeatureModel, target: &ObjectState) -> Result<Option<Vec<Value>>, InvokeError> {
	let Some(choices) = feature.capability::<ChoicesKind>() else {
		return Ok(None);
	};
	let out = choices.method.invoke(target, &[])?;
	Ok(out.as_list().map(<[Value]>::to_vec))
}

pub fn default_value(feature: &FeatureModel, target: &ObjectState) -> Result<Option<Value>, InvokeError> {
	match feature.capability::<DefaultKind>() {
		Some(default) => default.method.invoke(target, &[]).map(Some),
		None => Ok(None),
	}
}

/// Current value of a property or collection on `target`.
pub fn property_value<'a>(feature: &FeatureModel, target: &'a ObjectState) -> Option<&'a Value> {
	let accessor = feature.capability::<PropertyAccessorKind>()?;
	target.get(&accessor.field)
}

/// Runs action `action` of `spec` on `target`.
///
/// Refuses disabled actions, then validates each argument against its
/// parameter and the whole list against the action before invoking.
pub fn invoke(spec: &TypeSpec, action: &str, target: &ObjectState, args: &[Value]) -> Result<Value, InteractionError> {
	let not_an_action = || InteractionError::NotAnAction {
		feature: FeatureId::for_type(spec.name()).member(action),
	};
	let feature = spec
		.member(action)
		.filter(|f| f.kind() == FeatureKind::Action)
		.ok_or_else(not_an_action)?;
	let invocation = feature.capability::<ActionInvocationKind>().ok_or_else(not_an_action)?;

	if let Some(reason) = disabled_reason(feature, target)? {
		return Err(InteractionError::Disabled {
			feature: feature.id().clone(),
			reason,
		});
	}

	let params: Vec<_> = spec.parameters(feature).collect();
	if params.len() == args.len() {
		for (param, arg) in params.iter().zip(args) {
			if let Some(reason) = validate_proposed(param, target, std::slice::from_ref(arg))? {
				return Err(InteractionError::Invalid {
					feature: param.id().clone(),
					reason,
				});
			}
		}
		if let Some(reason) = validate_proposed(feature, target, args)? {
			return Err(InteractionError::Invalid {
				feature: feature.id().clone(),
				reason,
			});
		}
	}

	tracing::trace!(action = %feature.id(), "invoking action");
	Ok(invocation.method.invoke(target, args)?)
}
