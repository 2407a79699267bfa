pub mod consts;
pub mod env;
pub mod model;

pub use env::EnvSnapshot;
pub use model::{Config, ConfigOverrides, LocalPaths, ReleaseSpec, VersionRequest};
