//! Workflow orchestration for monorel

mod release;

pub use release::*;
