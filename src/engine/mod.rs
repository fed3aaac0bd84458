pub mod matcher;
pub mod registry;
pub mod resolver;
pub mod shared;

use thiserror::Error;

use crate::model::locale::Locale;
use crate::model::result::{InterpretationRequest, InterpretationResult};

pub use matcher::{GenotypeMatcher, resolve};
pub use registry::{RuleRegistry, RuleSetVersion};
pub use resolver::{describe, describe_resolution};
pub use shared::SharedRegistry;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("unknown gene: {0}")]
    UnknownGene(String),
}

/// Matches and describes in one step; unresolved input yields null fields.
pub fn interpret(
    registry: &RuleRegistry,
    request: &InterpretationRequest,
    locale: Locale,
) -> Result<InterpretationResult, EngineError> {
    let resolution = resolve(registry, &request.gene_key, &request.marker_values)?;
    Ok(describe_resolution(&resolution, locale))
}

#[cfg(test)]
#[path = "../../tests/src_inline/engine/mod.rs"]
mod tests;
