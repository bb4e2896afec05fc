//! Enum types for APIC name mapping

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// CORE ENUMS
// ============================================================================

/// Resource type tag for mapped names.
///
/// The string form (see [`NameType::as_str`]) is the wire tag shared with
/// other consumers of the name table; it must never change for an existing
/// variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NameType {
    #[serde(rename = "tenant")]
    Tenant,
    #[serde(rename = "network")]
    Network,
    #[serde(rename = "subnet")]
    Subnet,
    #[serde(rename = "port")]
    Port,
    #[serde(rename = "router")]
    Router,
    #[serde(rename = "app-profile")]
    AppProfile,
    #[serde(rename = "policy_target_group")]
    PolicyTargetGroup,
    #[serde(rename = "l3_policy")]
    L3Policy,
    #[serde(rename = "l2_policy")]
    L2Policy,
    #[serde(rename = "policy_rule_set")]
    PolicyRuleSet,
    #[serde(rename = "policy_rule")]
    PolicyRule,
}

impl NameType {
    /// Every tag, in declaration order.
    pub const ALL: [NameType; 11] = [
        NameType::Tenant,
        NameType::Network,
        NameType::Subnet,
        NameType::Port,
        NameType::Router,
        NameType::AppProfile,
        NameType::PolicyTargetGroup,
        NameType::L3Policy,
        NameType::L2Policy,
        NameType::PolicyRuleSet,
        NameType::PolicyRule,
    ];

    /// Persisted string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            NameType::Tenant => "tenant",
            NameType::Network => "network",
            NameType::Subnet => "subnet",
            NameType::Port => "port",
            NameType::Router => "router",
            NameType::AppProfile => "app-profile",
            NameType::PolicyTargetGroup => "policy_target_group",
            NameType::L3Policy => "l3_policy",
            NameType::L2Policy => "l2_policy",
            NameType::PolicyRuleSet => "policy_rule_set",
            NameType::PolicyRule => "policy_rule",
        }
    }

    /// Whether names of this type are produced by the resolver pipeline.
    ///
    /// The app profile is claimed directly rather than resolved.
    pub fn is_resolvable(&self) -> bool {
        !matches!(self, NameType::AppProfile)
    }
}

/// Naming strategy used when synthesizing APIC names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamingStrategy {
    /// Truncated canonical name followed by `_<resource id>`.
    #[default]
    #[serde(rename = "use_uuid")]
    UseUuid,
    /// Canonical name alone, falling back to the resource id.
    #[serde(rename = "use_name")]
    UseName,
}

impl NamingStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            NamingStrategy::UseUuid => "use_uuid",
            NamingStrategy::UseName => "use_name",
        }
    }
}

// ============================================================================
// DISPLAY / PARSE
// ============================================================================

fn normalize_token(input: &str) -> String {
    input
        .trim()
        .chars()
        .map(|c| if c == '-' { '_' } else { c.to_ascii_lowercase() })
        .collect()
}

impl fmt::Display for NameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NameType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "tenant" => Ok(NameType::Tenant),
            "network" => Ok(NameType::Network),
            "subnet" => Ok(NameType::Subnet),
            "port" => Ok(NameType::Port),
            "router" => Ok(NameType::Router),
            "app_profile" => Ok(NameType::AppProfile),
            "policy_target_group" => Ok(NameType::PolicyTargetGroup),
            "l3_policy" => Ok(NameType::L3Policy),
            "l2_policy" => Ok(NameType::L2Policy),
            "policy_rule_set" => Ok(NameType::PolicyRuleSet),
            "policy_rule" => Ok(NameType::PolicyRule),
            _ => Err(format!("Invalid NameType: {}", s)),
        }
    }
}

impl fmt::Display for NamingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NamingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "use_uuid" | "uuid" => Ok(NamingStrategy::UseUuid),
            "use_name" | "name" => Ok(NamingStrategy::UseName),
            _ => Err(format!("Invalid NamingStrategy: {}", s)),
        }
    }
}
