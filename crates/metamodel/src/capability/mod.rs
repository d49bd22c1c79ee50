//! Capabilities and their holders.
//!
//! # Mental Model
//!
//! A capability is one behavior object for one concern (naming, disablement,
//! validation, ...) attached to one feature. Each concern is a *kind*; a holder
//! keeps at most one active capability per kind. When a newer contribution of
//! the same kind arrives, the kind's [`WinPolicy`] decides whether it wraps the
//! older one (decoration chain), replaces it, or is ignored.
//!
//! # Invariants
//!
//! - A holder never has two active capabilities of one kind.
//!   - Enforced in: [`CapabilityHolder::add`] (single map slot per kind).
//! - A payload always matches its kind's registered payload type.
//!   - Enforced in: [`CapabilityHolder::add`], statically by [`CapabilityKind`] for typed attachment.
//! - Decoration chains are acyclic.
//!   - Enforced in: [`Capability`] construction; `underlying` only ever points at an already-built capability.
//! - Semantically equal consecutive contributions collapse.
//!   - Enforced in: [`CapabilityHolder::add`].
//!   - Failure symptom: redundant wrappers and chain growth on rebuild.

mod holder;
mod policy;
mod registry;

#[cfg(test)]
mod tests;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

pub use self::holder::CapabilityHolder;
pub use self::policy::{AttachOutcome, WinPolicy};
pub use self::registry::{KindRegistry, KindSpec};
use crate::identity::FeatureId;

/// Identifier of a capability kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KindId(&'static str);

impl KindId {
	pub const fn new(name: &'static str) -> Self {
		Self(name)
	}

	pub const fn name(self) -> &'static str {
		self.0
	}
}

impl fmt::Display for KindId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.0)
	}
}

/// Behavior object carried by a capability.
///
/// Implemented for every `PartialEq` type; semantic equality is `==` between
/// payloads of the same concrete type. Payloads that want a looser notion
/// (e.g. ignoring where a value came from) implement `PartialEq` by hand.
pub trait Payload: Any + Send + Sync + fmt::Debug {
	fn as_any(&self) -> &dyn Any;

	fn type_name(&self) -> &'static str;

	fn semantically_eq(&self, other: &dyn Payload) -> bool;
}

impl<T> Payload for T
where
	T: Any + Send + Sync + fmt::Debug + PartialEq,
{
	fn as_any(&self) -> &dyn Any {
		self
	}

	fn type_name(&self) -> &'static str {
		std::any::type_name::<T>()
	}

	fn semantically_eq(&self, other: &dyn Payload) -> bool {
		other.as_any().downcast_ref::<T>().is_some_and(|o| self == o)
	}
}

/// Static description of a capability kind.
pub trait CapabilityKind: 'static {
	type Payload: Payload;

	const ID: KindId;

	/// Default policy; configuration may override it by kind name.
	const POLICY: WinPolicy = WinPolicy::Decorate;

	fn spec() -> KindSpec {
		KindSpec::of::<Self>()
	}
}

/// Declares a marker type implementing [`CapabilityKind`].
///
/// ```ignore
/// capability_kind!(
///     /// Disablement of a member.
///     pub DisabledKind => Disabled, "disabled", Decorate
/// );
/// ```
#[macro_export]
macro_rules! capability_kind {
	($(#[$attr:meta])* $vis:vis $name:ident => $payload:ty, $id:literal $(, $policy:ident)? $(,)?) => {
		$(#[$attr])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
		$vis struct $name;

		impl $crate::capability::CapabilityKind for $name {
			type Payload = $payload;
			const ID: $crate::capability::KindId = $crate::capability::KindId::new($id);
			$(const POLICY: $crate::capability::WinPolicy = $crate::capability::WinPolicy::$policy;)?
		}
	};
}

/// One attached behavior object.
///
/// Immutable once attached. `underlying` links to the capability of the same
/// kind this one decorates, forming a newest-first chain.
#[derive(Debug)]
pub struct Capability {
	kind: KindId,
	holder: FeatureId,
	origin: &'static str,
	payload: Arc<dyn Payload>,
	underlying: Option<Arc<Capability>>,
}

impl Capability {
	pub(crate) fn new(
		kind: KindId,
		holder: FeatureId,
		origin: &'static str,
		payload: Arc<dyn Payload>,
		underlying: Option<Arc<Capability>>,
	) -> Self {
		Self {
			kind,
			holder,
			origin,
			payload,
			underlying,
		}
	}

	pub fn kind(&self) -> KindId {
		self.kind
	}

	/// Identity of the owning feature.
	pub fn holder(&self) -> &FeatureId {
		&self.holder
	}

	/// Name of the unit or postprocessor that attached this capability.
	pub fn origin(&self) -> &'static str {
		self.origin
	}

	pub fn payload(&self) -> &dyn Payload {
		&*self.payload
	}

	/// Typed view of the payload.
	pub fn downcast<P: Payload>(&self) -> Option<&P> {
		self.payload.as_any().downcast_ref::<P>()
	}

	pub fn underlying(&self) -> Option<&Arc<Capability>> {
		self.underlying.as_ref()
	}

	/// Walks the decoration chain newest-first, starting with `self`.
	pub fn chain(&self) -> Chain<'_> {
		Chain { next: Some(self) }
	}

	/// Length of the decoration chain including `self`.
	pub fn depth(&self) -> usize {
		self.chain().count()
	}

	pub fn semantically_eq(&self, other: &Capability) -> bool {
		self.kind == other.kind && self.payload.semantically_eq(&*other.payload)
	}

	/// Compares whole decoration chains link by link.
	pub fn chain_semantically_eq(&self, other: &Capability) -> bool {
		self.depth() == other.depth()
			&& self
				.chain()
				.zip(other.chain())
				.all(|(a, b)| a.semantically_eq(b))
	}
}

/// Iterator over a decoration chain.
pub struct Chain<'a> {
	next: Option<&'a Capability>,
}

impl<'a> Iterator for Chain<'a> {
	type Item = &'a Capability;

	fn next(&mut self) -> Option<Self::Item> {
		let cur = self.next?;
		self.next = cur.underlying.as_deref();
		Some(cur)
	}
}
