use thiserror::Error;

/// Type Alias: A rebranding of the `Result` enum from the standard library which focuses on errors
/// that may surface while configuring or running a simulation.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    /// A requested reference id has no slot in swap. Every reference is expected to exist in
    /// swap, so hitting this means the memory model is corrupt and the run must stop.
    #[error("reference {reference_id} not found in swap")]
    ReferenceNotFound { reference_id: u32 },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
