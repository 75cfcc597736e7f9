//! Error types for the cache engines
//!
//! Misses are never errors: absence is returned as `None`. The variants here
//! only cover building an engine that does not exist and bad configuration.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache crate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The requested engine has no implementation for the operation
    #[error("{engine}.{operation} is not implemented")]
    NotImplemented {
        operation: &'static str,
        engine: String,
    },

    /// The abstract engine contract was requested directly
    #[error("Cannot instantiate abstract cache engine: {0}")]
    InstantiationOfAbstract(String),

    /// Configuration could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache crate.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_implemented_names_operation_and_engine() {
        let err = CacheError::NotImplemented {
            operation: "new",
            engine: "RedisCache".to_string(),
        };
        assert_eq!(err.to_string(), "RedisCache.new is not implemented");
    }

    #[test]
    fn test_instantiation_of_abstract_message() {
        let err = CacheError::InstantiationOfAbstract("CacheEngine".to_string());
        assert!(err.to_string().contains("CacheEngine"));
    }
}
