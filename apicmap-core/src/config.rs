//! Configuration types

use crate::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Keystone connection settings used to resolve tenant names.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub auth_protocol: String,
    pub auth_host: String,
    pub auth_port: u16,
    pub admin_user: String,
    pub admin_password: String,
    pub admin_tenant_name: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            auth_protocol: "http".to_string(),
            auth_host: "127.0.0.1".to_string(),
            auth_port: 35357,
            admin_user: String::new(),
            admin_password: String::new(),
            admin_tenant_name: String::new(),
        }
    }
}

// The password never shows up in logs.
impl fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("auth_protocol", &self.auth_protocol)
            .field("auth_host", &self.auth_host)
            .field("auth_port", &self.auth_port)
            .field("admin_user", &self.admin_user)
            .field("admin_password", &"<redacted>")
            .field("admin_tenant_name", &self.admin_tenant_name)
            .finish()
    }
}

impl IdentityConfig {
    /// Keystone v2.0 endpoint, e.g. `http://127.0.0.1:35357/v2.0/`.
    pub fn auth_url(&self) -> String {
        format!(
            "{}://{}:{}/v2.0/",
            self.auth_protocol, self.auth_host, self.auth_port
        )
    }

    /// Credentials handed to the identity client factory.
    pub fn credentials(&self) -> IdentityCredentials {
        IdentityCredentials {
            auth_url: self.auth_url(),
            username: self.admin_user.clone(),
            password: self.admin_password.clone(),
            tenant_name: self.admin_tenant_name.clone(),
        }
    }

    /// Validate the identity settings.
    ///
    /// Validates:
    /// - auth_protocol is `http` or `https`
    /// - auth_host and admin_user are non-empty
    /// - auth_port is non-zero
    pub fn validate(&self) -> MapperResult<()> {
        if !matches!(self.auth_protocol.as_str(), "http" | "https") {
            return Err(MapperError::Config(ConfigError::InvalidValue {
                field: "identity.auth_protocol".to_string(),
                value: self.auth_protocol.clone(),
                reason: "auth_protocol must be http or https".to_string(),
            }));
        }

        if self.auth_host.trim().is_empty() {
            return Err(MapperError::Config(ConfigError::MissingRequired {
                field: "identity.auth_host".to_string(),
            }));
        }

        if self.auth_port == 0 {
            return Err(MapperError::Config(ConfigError::InvalidValue {
                field: "identity.auth_port".to_string(),
                value: self.auth_port.to_string(),
                reason: "auth_port must be non-zero".to_string(),
            }));
        }

        if self.admin_user.trim().is_empty() {
            return Err(MapperError::Config(ConfigError::MissingRequired {
                field: "identity.admin_user".to_string(),
            }));
        }

        Ok(())
    }
}

/// Master configuration for a name mapper instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    pub naming_strategy: NamingStrategy,
    pub identity: IdentityConfig,
}

impl MapperConfig {
    /// Create from environment variables with fallback to defaults.
    ///
    /// Environment variables:
    /// - `APIC_NAME_MAPPING_STRATEGY`: `use_uuid` or `use_name` (default: use_uuid)
    /// - `KEYSTONE_AUTH_PROTOCOL`: default `http`
    /// - `KEYSTONE_AUTH_HOST`: default `127.0.0.1`
    /// - `KEYSTONE_AUTH_PORT`: default 35357
    /// - `KEYSTONE_ADMIN_USER`, `KEYSTONE_ADMIN_PASSWORD`, `KEYSTONE_ADMIN_TENANT_NAME`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`MapperConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = IdentityConfig::default();

        Self {
            naming_strategy: lookup("APIC_NAME_MAPPING_STRATEGY")
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            identity: IdentityConfig {
                auth_protocol: lookup("KEYSTONE_AUTH_PROTOCOL").unwrap_or(defaults.auth_protocol),
                auth_host: lookup("KEYSTONE_AUTH_HOST").unwrap_or(defaults.auth_host),
                auth_port: lookup("KEYSTONE_AUTH_PORT")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.auth_port),
                admin_user: lookup("KEYSTONE_ADMIN_USER").unwrap_or(defaults.admin_user),
                admin_password: lookup("KEYSTONE_ADMIN_PASSWORD")
                    .unwrap_or(defaults.admin_password),
                admin_tenant_name: lookup("KEYSTONE_ADMIN_TENANT_NAME")
                    .unwrap_or(defaults.admin_tenant_name),
            },
        }
    }

    /// Parse a TOML document. Missing fields take their defaults.
    pub fn from_toml_str(input: &str) -> MapperResult<Self> {
        toml::from_str(input).map_err(|e| {
            MapperError::Config(ConfigError::Parse {
                reason: e.to_string(),
            })
        })
    }

    /// Validate the configuration.
    pub fn validate(&self) -> MapperResult<()> {
        self.identity.validate()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn valid_identity() -> IdentityConfig {
        IdentityConfig {
            admin_user: "admin".to_string(),
            admin_password: "secret".to_string(),
            admin_tenant_name: "service".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_auth_url_format() {
        let identity = IdentityConfig {
            auth_protocol: "https".to_string(),
            auth_host: "keystone.local".to_string(),
            auth_port: 5000,
            ..Default::default()
        };
        assert_eq!(identity.auth_url(), "https://keystone.local:5000/v2.0/");
    }

    #[test]
    fn test_credentials_copy_admin_fields() {
        let creds = valid_identity().credentials();
        assert_eq!(creds.auth_url, "http://127.0.0.1:35357/v2.0/");
        assert_eq!(creds.username, "admin");
        assert_eq!(creds.password, "secret");
        assert_eq!(creds.tenant_name, "service");
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", valid_identity());
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_validate_accepts_valid_config() {
        let config = MapperConfig {
            naming_strategy: NamingStrategy::UseName,
            identity: valid_identity(),
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_protocol() {
        let config = MapperConfig {
            identity: IdentityConfig {
                auth_protocol: "ftp".to_string(),
                ..valid_identity()
            },
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            MapperError::Config(ConfigError::InvalidValue { ref field, .. }) if field == "identity.auth_protocol"
        ));
    }

    #[test]
    fn test_validate_rejects_missing_user() {
        let config = MapperConfig::default();
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            MapperError::Config(ConfigError::MissingRequired { ref field }) if field == "identity.admin_user"
        ));
    }

    #[test]
    fn test_validate_rejects_zero_port() {
        let config = MapperConfig {
            identity: IdentityConfig {
                auth_port: 0,
                ..valid_identity()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_lookup_reads_variables() {
        let vars: HashMap<&str, &str> = [
            ("APIC_NAME_MAPPING_STRATEGY", "use_name"),
            ("KEYSTONE_AUTH_HOST", "10.0.0.5"),
            ("KEYSTONE_AUTH_PORT", "5000"),
            ("KEYSTONE_ADMIN_USER", "neutron"),
        ]
        .into_iter()
        .collect();

        let config = MapperConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.naming_strategy, NamingStrategy::UseName);
        assert_eq!(config.identity.auth_host, "10.0.0.5");
        assert_eq!(config.identity.auth_port, 5000);
        assert_eq!(config.identity.admin_user, "neutron");
        assert_eq!(config.identity.auth_protocol, "http");
    }

    #[test]
    fn test_from_lookup_ignores_unparseable_values() {
        let config = MapperConfig::from_lookup(|k| match k {
            "APIC_NAME_MAPPING_STRATEGY" => Some("use_hash".to_string()),
            "KEYSTONE_AUTH_PORT" => Some("not-a-port".to_string()),
            _ => None,
        });
        assert_eq!(config.naming_strategy, NamingStrategy::UseUuid);
        assert_eq!(config.identity.auth_port, 35357);
    }

    #[test]
    fn test_from_toml_str() {
        let config = MapperConfig::from_toml_str(
            r#"
            naming_strategy = "use_name"

            [identity]
            auth_protocol = "https"
            auth_host = "keystone"
            admin_user = "admin"
            "#,
        )
        .unwrap();
        assert_eq!(config.naming_strategy, NamingStrategy::UseName);
        assert_eq!(config.identity.auth_url(), "https://keystone:35357/v2.0/");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml_str_rejects_unknown_strategy() {
        let err = MapperConfig::from_toml_str(r#"naming_strategy = "use_hash""#).unwrap_err();
        assert!(matches!(err, MapperError::Config(ConfigError::Parse { .. })));
    }
}
