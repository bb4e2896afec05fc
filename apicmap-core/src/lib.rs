//! APICMAP Core - Types and Naming Rules
//!
//! Shared data types, error types, configuration, the APIC name synthesis
//! rules, and the contracts for the external collaborators (resource
//! resolver, identity service). All other crates depend on this.

mod config;
mod enums;
mod error;
mod identity;
mod naming;
mod resolver;

pub use config::{IdentityConfig, MapperConfig};
pub use enums::{NameType, NamingStrategy};
pub use error::{ConfigError, IdentityError, MapperError, MapperResult, ResolverError, StoreError};
pub use identity::{IdentityClient, IdentityClientFactory, IdentityCredentials, TenantRecord};
pub use naming::{
    canonical_budget, collapse_hyphens, synthesize, truncate, ID_SUFFIX_SEPARATOR,
    MAX_NAME_LENGTH,
};
pub use resolver::{MapperContext, ResourceResolver};

/// Resource id of the singleton app profile entry.
pub const APP_PROFILE_KEY: &str = "app_profile";
