//! Identity service (Keystone) contracts used to resolve tenant names.

use std::fmt;

use crate::IdentityError;

/// Credentials used to build an identity client.
#[derive(Clone, PartialEq, Eq)]
pub struct IdentityCredentials {
    pub auth_url: String,
    pub username: String,
    pub password: String,
    pub tenant_name: String,
}

impl fmt::Debug for IdentityCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityCredentials")
            .field("auth_url", &self.auth_url)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("tenant_name", &self.tenant_name)
            .finish()
    }
}

/// A tenant as reported by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantRecord {
    pub id: String,
    pub name: String,
}

impl TenantRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Connected identity service client.
pub trait IdentityClient: Send + Sync {
    /// List every tenant visible to the admin credentials.
    fn list_tenants(&self) -> Result<Vec<TenantRecord>, IdentityError>;
}

/// Builds identity clients from credentials.
pub trait IdentityClientFactory: Send + Sync {
    fn connect(
        &self,
        credentials: &IdentityCredentials,
    ) -> Result<Box<dyn IdentityClient>, IdentityError>;
}
