//! monorel Adapters - Package manager integration
//!
//! This crate refreshes npm and Composer lock files after manifests were
//! rewritten with new versions.

pub mod composer;
pub mod npm;
pub mod registry;
mod traits;

pub use composer::ComposerLockfile;
pub use npm::NpmLockfile;
pub use registry::{LockfileOutcome, LockfileRegistry, LockfileReport};
pub use traits::LockfileUpdater;
