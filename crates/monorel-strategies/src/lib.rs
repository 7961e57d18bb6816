//! monorel Strategies - Version strategies for release propagation
//!
//! This crate turns a package's last released version and a release type
//! into the next version, optionally on a prerelease channel.

mod next;
mod semver;
mod traits;
pub mod types;

pub use next::{SemVerNextVersion, StrategyNextVersion};
pub use self::semver::SemVerStrategy;
pub use traits::VersionStrategy;
pub use types::VersionComponents;
