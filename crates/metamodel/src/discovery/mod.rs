//! Discovery units and the programming model.
//!
//! # Mental Model
//!
//! A programming model is an ordered list of discovery units. Each unit looks
//! at the raw declaration behind one feature and attaches capabilities to its
//! holder. The driver runs units *unit-major*: one unit visits every
//! applicable feature of a type before the next unit starts, so later units
//! always see the complete output of earlier ones.
//!
//! # Invariants
//!
//! - Unit order is a function of `(phase, rank, name)` only.
//!   - Enforced in: [`ProgrammingModelBuilder::build`].
//!   - Failure symptom: the active capability per kind depends on registration order.
//! - Unit names are unique.
//!   - Enforced in: [`ProgrammingModelBuilder::register_arc`].
//! - A claimed method is never bound or exposed again.
//!   - Enforced in: `TypeSpec::claim`, [`DiscoveryContext::unclaimed_methods`].

mod context;
pub(crate) mod driver;
mod naming;


use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashSet;

pub use self::context::{Declaration, DiscoveryContext};
pub use self::naming::{
	ConventionScope, ExpectedSignature, MatchTarget, NamingConvention, ParamsRule, ReturnRule,
};
use crate::error::ProgrammingError;
use crate::identity::FeatureShapes;

/// Rule names used for discovery reports.
pub mod rules {
	/// Several methods matched one companion name and signature.
	pub const AMBIGUOUS_COMPANION: &str = "ambiguous-companion";
	/// A method with a companion prefix supported no feature.
	pub const ORPHANED_METHOD: &str = "orphaned-method";
	/// Several unclaimed methods share a name and cannot be exposed as one action.
	pub const OVERLOADED_ACTION: &str = "overloaded-action";
	/// An unclaimed method shares its name with a field.
	pub const ACTION_SHADOWS_FIELD: &str = "action-shadows-field";
}

/// Coarse ordering bucket for a unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
	/// Names and identity-level facts that later units read.
	Identity,
	/// Attribute-driven configuration.
	#[default]
	Metadata,
	/// Naming-convention companions; these override metadata.
	Conventions,
	/// Invocation and accessor binding.
	Binding,
}

/// Position of a unit in the programming model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitOrder {
	pub phase: Phase,
	pub rank: i16,
}

impl UnitOrder {
	pub const fn new(phase: Phase, rank: i16) -> Self {
		Self { phase, rank }
	}

	pub const fn in_phase(phase: Phase) -> Self {
		Self { phase, rank: 0 }
	}
}

/// A pluggable inspector run over every feature of its shapes.
pub trait DiscoveryUnit: Send + Sync {
	fn name(&self) -> &'static str;

	/// Feature shapes this unit visits.
	fn shapes(&self) -> FeatureShapes;

	fn order(&self) -> UnitOrder {
		UnitOrder::default()
	}

	/// Companion conventions this unit resolves. Methods of these shapes are
	/// never exposed as actions.
	fn conventions(&self) -> &[NamingConvention] {
		&[]
	}

	fn process(&self, cx: &mut DiscoveryContext<'_>) -> Result<(), ProgrammingError>;
}

/// Ordered, immutable set of discovery units.
#[derive(Clone, Default)]
pub struct ProgrammingModel {
	units: Vec<Arc<dyn DiscoveryUnit>>,
}

impl ProgrammingModel {
	pub fn builder() -> ProgrammingModelBuilder {
		ProgrammingModelBuilder::default()
	}

	/// Units in execution order.
	pub fn units(&self) -> &[Arc<dyn DiscoveryUnit>] {
		&self.units
	}

	pub fn unit_names(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.units.iter().map(|u| u.name())
	}

	pub fn len(&self) -> usize {
		self.units.len()
	}

	pub fn is_empty(&self) -> bool {
		self.units.is_empty()
	}

	/// Every convention of every unit, in unit order.
	pub fn conventions(&self) -> impl Iterator<Item = &NamingConvention> + '_ {
		self.units.iter().flat_map(|u| u.conventions())
	}

	/// Returns true if some unit's convention claims names shaped like `method`.
	pub fn is_reserved(&self, method: &str) -> bool {
		self.conventions().any(|c| c.reserves(method))
	}
}

impl fmt::Debug for ProgrammingModel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.unit_names()).finish()
	}
}

/// Collects units; ordering is applied at [`build`](Self::build).
#[derive(Default)]
pub struct ProgrammingModelBuilder {
	units: Vec<Arc<dyn DiscoveryUnit>>,
	names: FxHashSet<&'static str>,
}

impl ProgrammingModelBuilder {
	pub fn register<U: DiscoveryUnit + 'static>(&mut self, unit: U) -> Result<&mut Self, ProgrammingError> {
		self.register_arc(Arc::new(unit))
	}

	pub fn register_arc(&mut self, unit: Arc<dyn DiscoveryUnit>) -> Result<&mut Self, ProgrammingError> {
		let name = unit.name();
		if !self.names.insert(name) {
			return Err(ProgrammingError::DuplicateUnit { name });
		}
		self.units.push(unit);
		Ok(self)
	}

	pub fn len(&self) -> usize {
		self.units.len()
	}

	pub fn is_empty(&self) -> bool {
		self.units.is_empty()
	}

	pub fn build(mut self) -> ProgrammingModel {
		self.units.sort_by(|a, b| (a.order(), a.name()).cmp(&(b.order(), b.name())));
		ProgrammingModel { units: self.units }
	}
}
