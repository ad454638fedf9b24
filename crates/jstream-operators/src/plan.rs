//! Operator planning surface: output schema plus memory behavior.

use jstream_core::prelude::Schema;
use serde::{Deserialize, Serialize};

/// Coarse memory model for an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Footprint {
    /// Holds at most one row at a time.
    Streaming,
    /// Buffers the whole input before emitting anything.
    Materializing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpPlan {
    pub output_schema: Schema,
    pub footprint: Footprint,
}

impl OpPlan {
    pub fn streaming(output_schema: Schema) -> Self {
        Self {
            output_schema,
            footprint: Footprint::Streaming,
        }
    }

    pub fn materializing(output_schema: Schema) -> Self {
        Self {
            output_schema,
            footprint: Footprint::Materializing,
        }
    }
}
