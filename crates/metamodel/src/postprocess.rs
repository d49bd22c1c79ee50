//! Cross-cutting refinement after discovery.

use crate::error::ProgrammingError;
use crate::model::GraphDraft;

/// Runs once over the whole draft graph, after every type finished
/// discovery and before validation.
///
/// Postprocessors may read any feature of any type and attach capabilities
/// anywhere; they run in registration order.
pub trait Postprocessor: Send + Sync {
	fn name(&self) -> &'static str;

	fn postprocess(&self, graph: &mut GraphDraft<'_>) -> Result<(), ProgrammingError>;
}
