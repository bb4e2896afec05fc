//! Error types for APIC name mapping operations

use crate::NameType;
use thiserror::Error;

/// Name store errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Read failed for {name_type} name of {resource_id}: {reason}")]
    ReadFailed {
        name_type: NameType,
        resource_id: String,
        reason: String,
    },

    #[error("Write failed for {name_type} name of {resource_id}: {reason}")]
    WriteFailed {
        name_type: NameType,
        resource_id: String,
        reason: String,
    },

    #[error("Delete failed for {resource_id}: {reason}")]
    DeleteFailed { resource_id: String, reason: String },

    #[error("Backend error: {reason}")]
    Backend { reason: String },

    #[error("Name store lock poisoned")]
    LockPoisoned,
}

/// Identity service errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Failed to build identity client for {auth_url}: {reason}")]
    ClientConstruction { auth_url: String, reason: String },

    #[error("Tenant listing failed: {reason}")]
    ListTenants { reason: String },
}

/// Errors raised while looking up a canonical resource name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolverError {
    #[error("{name_type} {resource_id} not found")]
    NotFound {
        name_type: NameType,
        resource_id: String,
    },

    #[error("Upstream lookup of {name_type} {resource_id} failed: {reason}")]
    Upstream {
        name_type: NameType,
        resource_id: String,
        reason: String,
    },

    #[error("{name_type} names cannot be resolved through the mapper pipeline")]
    Unsupported { name_type: NameType },

    #[error("Identity service error: {0}")]
    Identity(#[from] IdentityError),
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to parse configuration: {reason}")]
    Parse { reason: String },
}

/// Master error type for all name mapping errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MapperError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Resolver error: {0}")]
    Resolver(#[from] ResolverError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl From<IdentityError> for MapperError {
    fn from(e: IdentityError) -> Self {
        MapperError::Resolver(ResolverError::Identity(e))
    }
}

/// Result type alias for name mapping operations.
pub type MapperResult<T> = Result<T, MapperError>;

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display_write_failed() {
        let err = StoreError::WriteFailed {
            name_type: NameType::Network,
            resource_id: "net-1".to_string(),
            reason: "disk full".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("Write failed"));
        assert!(msg.contains("network"));
        assert!(msg.contains("net-1"));
        assert!(msg.contains("disk full"));
    }

    #[test]
    fn test_resolver_error_display_not_found() {
        let err = ResolverError::NotFound {
            name_type: NameType::Subnet,
            resource_id: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "subnet abc not found");
    }

    #[test]
    fn test_resolver_error_display_unsupported() {
        let err = ResolverError::Unsupported {
            name_type: NameType::AppProfile,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("app-profile"));
        assert!(msg.contains("cannot be resolved"));
    }

    #[test]
    fn test_config_error_display_invalid_value() {
        let err = ConfigError::InvalidValue {
            field: "auth_protocol".to_string(),
            value: "ftp".to_string(),
            reason: "must be http or https".to_string(),
        };
        let msg = format!("{}", err);
        assert!(msg.contains("auth_protocol"));
        assert!(msg.contains("ftp"));
        assert!(msg.contains("must be http or https"));
    }

    #[test]
    fn test_identity_error_surfaces_as_resolver_error() {
        let err = MapperError::from(IdentityError::ListTenants {
            reason: "401 Unauthorized".to_string(),
        });
        assert!(matches!(
            err,
            MapperError::Resolver(ResolverError::Identity(IdentityError::ListTenants { .. }))
        ));
        assert!(err.to_string().contains("401 Unauthorized"));
    }

    #[test]
    fn test_mapper_error_from_variants() {
        let store = MapperError::from(StoreError::LockPoisoned);
        assert!(matches!(store, MapperError::Store(_)));

        let resolver = MapperError::from(ResolverError::Unsupported {
            name_type: NameType::AppProfile,
        });
        assert!(matches!(resolver, MapperError::Resolver(_)));

        let config = MapperError::from(ConfigError::MissingRequired {
            field: "auth_host".to_string(),
        });
        assert!(matches!(config, MapperError::Config(_)));
    }

    #[test]
    fn test_store_error_display_lock_poisoned() {
        let err = StoreError::LockPoisoned;
        assert!(err.to_string().contains("lock poisoned"));
    }
}
