//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `plumb-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: File operations
//!   - `SyntaxChecker`: Per-format parse-and-report leaves
//!   - `ManifestParser`: Dependency manifest readers
//!   - `VulnerabilitySource`: Advisory lookups
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - (Defined in CLI layer, implemented by services)

pub mod output;

pub use output::{
    Filesystem, LOOKUP_TIMEOUT, LookupError, ManifestParser, SyntaxChecker, VulnerabilitySource,
};

#[cfg(test)]
pub use output::{MockManifestParser, MockVulnerabilitySource};
