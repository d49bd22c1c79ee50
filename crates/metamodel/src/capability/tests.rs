use std::collections::BTreeMap;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::error::ProgrammingError;
use crate::identity::FeatureId;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Label(String);

#[derive(Debug, Clone, PartialEq, Eq)]
struct Weight(u8);

crate::capability_kind!(LabelKind => Label, "test.label", Replace);
crate::capability_kind!(WeightKind => Weight, "test.weight");
crate::capability_kind!(FirstKind => Label, "test.first", FirstWins);
crate::capability_kind!(ClashKind => Weight, "test.label");

fn kinds() -> KindRegistry {
	let mut kinds = KindRegistry::new();
	kinds.register::<LabelKind>().unwrap();
	kinds.register::<WeightKind>().unwrap();
	kinds.register::<FirstKind>().unwrap();
	kinds
}

fn holder() -> CapabilityHolder {
	CapabilityHolder::new(FeatureId::for_type("Order").member("total"))
}

#[test]
fn test_decorate_keeps_prior_as_underlying() {
	let kinds = kinds();
	let mut h = holder();

	assert_eq!(h.attach::<WeightKind>(&kinds, "a", Weight(1)).unwrap(), AttachOutcome::Inserted);
	assert_eq!(h.attach::<WeightKind>(&kinds, "b", Weight(2)).unwrap(), AttachOutcome::Decorated);
	assert_eq!(h.attach::<WeightKind>(&kinds, "c", Weight(3)).unwrap(), AttachOutcome::Decorated);

	let active = h.get(WeightKind::ID).unwrap();
	let chain: Vec<_> = active
		.chain()
		.map(|c| (c.origin(), c.downcast::<Weight>().unwrap().0))
		.collect();
	assert_eq!(chain, vec![("c", 3), ("b", 2), ("a", 1)]);
	assert_eq!(h.payload::<WeightKind>(), Some(&Weight(3)));
	let weights: Vec<_> = h.payloads::<WeightKind>().map(|w| w.0).collect();
	assert_eq!(weights, vec![3, 2, 1]);
	assert_eq!(h.payloads::<LabelKind>().count(), 0);
	assert_eq!(active.holder(), h.feature());
	assert_eq!(h.len(), 1);
}

#[test]
fn test_replace_drops_prior() {
	let kinds = kinds();
	let mut h = holder();

	h.attach::<LabelKind>(&kinds, "a", Label("Total".into())).unwrap();
	let outcome = h.attach::<LabelKind>(&kinds, "b", Label("Grand total".into())).unwrap();

	assert_eq!(outcome, AttachOutcome::Replaced);
	let active = h.get(LabelKind::ID).unwrap();
	assert_eq!(active.depth(), 1);
	assert!(active.underlying().is_none());
	assert_eq!(active.origin(), "b");
}

#[test]
fn test_first_wins_ignores_later() {
	let kinds = kinds();
	let mut h = holder();

	h.attach::<FirstKind>(&kinds, "a", Label("first".into())).unwrap();
	let outcome = h.attach::<FirstKind>(&kinds, "b", Label("second".into())).unwrap();

	assert_eq!(outcome, AttachOutcome::KeptExisting);
	assert!(!outcome.changed());
	assert_eq!(h.payload::<FirstKind>(), Some(&Label("first".into())));
}

#[test]
fn test_semantically_equal_contribution_collapses() {
	let kinds = kinds();
	let mut h = holder();

	h.attach::<WeightKind>(&kinds, "a", Weight(7)).unwrap();
	let outcome = h.attach::<WeightKind>(&kinds, "b", Weight(7)).unwrap();

	assert_eq!(outcome, AttachOutcome::Collapsed);
	let active = h.get(WeightKind::ID).unwrap();
	assert_eq!(active.depth(), 1);
	assert_eq!(active.origin(), "a");
}

#[test]
fn test_payload_mismatch_is_fatal() {
	let kinds = kinds();
	let spec = *kinds.get(WeightKind::ID).unwrap();
	let mut h = holder();

	let err = h.add(&spec, "a", Arc::new(Label("oops".into()))).unwrap_err();
	assert!(matches!(
		err,
		ProgrammingError::PayloadMismatch { kind, .. } if kind == WeightKind::ID
	));
	assert!(h.is_empty());
}

#[test]
fn test_unregistered_kind_is_fatal() {
	let kinds = KindRegistry::new();
	let mut h = holder();

	let err = h.attach::<WeightKind>(&kinds, "a", Weight(1)).unwrap_err();
	assert!(matches!(err, ProgrammingError::UnknownKind { .. }));
}

#[test]
fn test_conflicting_registration() {
	let mut kinds = kinds();
	kinds.register::<LabelKind>().unwrap();

	let err = kinds.register::<ClashKind>().unwrap_err();
	assert!(matches!(err, ProgrammingError::ConflictingKind { .. }));
	assert_eq!(kinds.len(), 3);
}

#[test]
fn test_policy_override_by_name() {
	let mut kinds = kinds();
	let overrides = BTreeMap::from([("test.weight".to_string(), WinPolicy::FirstWins)]);
	kinds.apply_overrides(&overrides).unwrap();
	assert_eq!(kinds.get(WeightKind::ID).unwrap().policy, WinPolicy::FirstWins);

	let err = kinds.set_policy("test.wieght", WinPolicy::Replace).unwrap_err();
	assert_eq!(
		err,
		ProgrammingError::UnknownKind {
			name: "test.wieght".into(),
			suggestion: Some("test.weight"),
		}
	);
	assert!(err.to_string().contains("did you mean"));
}

#[test]
fn test_holder_semantic_equality() {
	let kinds = kinds();
	let mut a = holder();
	let mut b = holder();
	for h in [&mut a, &mut b] {
		h.attach::<WeightKind>(&kinds, "x", Weight(1)).unwrap();
		h.attach::<WeightKind>(&kinds, "y", Weight(2)).unwrap();
	}
	assert!(a.semantically_eq(&b));

	b.attach::<LabelKind>(&kinds, "z", Label("extra".into())).unwrap();
	assert!(!a.semantically_eq(&b));
}

proptest! {
	/// The active payload is the last attachment; the chain holds one link per
	/// run of semantically equal consecutive attachments.
	#[test]
	fn prop_decoration_chain_dedups(seq in prop::collection::vec(0u8..3, 1..24)) {
		let kinds = kinds();
		let mut h = holder();
		for w in &seq {
			h.attach::<WeightKind>(&kinds, "unit", Weight(*w)).unwrap();
		}

		let mut runs = seq.clone();
		runs.dedup();

		let active = h.get(WeightKind::ID).unwrap();
		let last = seq.last().copied().map(Weight);
		prop_assert_eq!(active.downcast::<Weight>().cloned(), last);
		prop_assert_eq!(active.depth(), runs.len());

		let chain: Vec<u8> = active.chain().map(|c| c.downcast::<Weight>().unwrap().0).collect();
		runs.reverse();
		prop_assert_eq!(chain, runs);
	}
}
