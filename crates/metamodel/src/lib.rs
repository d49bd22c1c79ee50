//! Metamodel construction engine.
//!
//! Inspects host-supplied declarations of application types and builds, once
//! at startup, a queryable graph of each type's runtime behavior: how it is
//! titled, validated, enabled, displayed and invoked. Behavior is expressed as
//! capabilities attached to feature holders by an ordered pipeline of
//! discovery units, refined by postprocessors and checked by a validator
//! composite before the graph is frozen and published.
//!
//! # Modules
//!
//! - [`capability`] - capability kinds, decoration chains, holders
//! - [`decl`] - raw type declarations and bound methods
//! - [`discovery`] - discovery units, naming conventions, the programming model
//! - [`model`] - feature arenas and the frozen graph
//! - [`postprocess`] - cross-type refinement after discovery
//! - [`validate`] - validation rules and the composite
//! - [`build`] - the build trigger
//! - [`runtime`] - publication and reload
//!
//! # Build Flow
//!
//! 1. Declarations are discovered per type (in parallel), unit-major.
//! 2. After every type finished, postprocessors run over the whole graph.
//! 3. Built-in and host rules validate the frozen graph.
//! 4. A valid graph is published; an invalid one is returned as a report.

pub mod build;
pub mod capability;
pub mod config;
pub mod decl;
pub mod discovery;
mod error;
pub mod identity;
pub mod model;
pub mod postprocess;
pub mod runtime;
pub mod validate;

#[cfg(test)]
mod test_fixtures;

pub use build::{BuildInputs, BuildOutcome, build_metamodel};
pub use capability::{
	AttachOutcome, Capability, CapabilityHolder, CapabilityKind, KindId, KindRegistry, KindSpec,
	Payload, WinPolicy,
};
pub use config::{DeploymentMode, MetamodelConfig, ValidationPolicy};
pub use decl::{
	Attributes, BoundMethod, FieldDecl, MethodDecl, ObjectState, ParamDecl, Signature, TypeDecl,
	Value, ValueType,
};
pub use discovery::{
	ConventionScope, Declaration, DiscoveryContext, DiscoveryUnit, ExpectedSignature, NamingConvention,
	ParamsRule, Phase, ProgrammingModel, ReturnRule, UnitOrder,
};
pub use error::{ConfigError, InvokeError, ProgrammingError};
pub use identity::{FeatureId, FeatureKind, FeatureShapes};
pub use model::{FeatureIdx, FeatureModel, GraphDraft, Metamodel, TypeSpec};
pub use postprocess::Postprocessor;
pub use runtime::{BootstrapError, ReloadError, SpecRef, SpecificationLoader};
pub use validate::{Failures, ValidationFailure, ValidationReport, Validator, ValidatorComposite};
