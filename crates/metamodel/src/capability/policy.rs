//! Win policies and attachment outcomes.
//!
//! # Role
//!
//! This module defines the vocabulary for same-kind attachments on one holder
//! and the per-kind rule used to resolve them.

use std::fmt;

use serde::Deserialize;

/// How a new attachment of a kind interacts with the active one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WinPolicy {
	/// Newest wins and keeps the prior capability as its underlying.
	#[default]
	Decorate,
	/// Newest wins; the prior capability is dropped.
	Replace,
	/// Keep the first capability attached; later attachments are ignored.
	FirstWins,
}

impl fmt::Display for WinPolicy {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Decorate => "decorate",
			Self::Replace => "replace",
			Self::FirstWins => "first-wins",
		})
	}
}

/// Result of a single attachment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttachOutcome {
	/// No capability of this kind was active.
	Inserted,
	/// Incoming became active, wrapping the previous one.
	Decorated,
	/// Incoming became active, previous one dropped.
	Replaced,
	/// Existing capability kept under [`WinPolicy::FirstWins`].
	KeptExisting,
	/// Incoming was semantically equal to the active capability; nothing changed.
	Collapsed,
}

impl AttachOutcome {
	/// Returns true if the active capability changed.
	pub const fn changed(self) -> bool {
		matches!(self, Self::Inserted | Self::Decorated | Self::Replaced)
	}
}

impl fmt::Display for AttachOutcome {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Inserted => "inserted",
			Self::Decorated => "decorated",
			Self::Replaced => "replaced",
			Self::KeptExisting => "kept_existing",
			Self::Collapsed => "collapsed",
		})
	}
}
