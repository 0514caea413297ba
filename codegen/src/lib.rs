//! Generation context, per-occurrence fragments and final program assembly.

pub mod assembler;
pub mod context;
pub mod fragment;

pub use assembler::{ProgramAssembler, CORE_INCLUDE};
pub use context::{Declaration, GenerationContext};
pub use fragment::{Aggregate, Fragment};
