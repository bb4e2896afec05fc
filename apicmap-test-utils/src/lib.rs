//! APICMAP Test Utilities
//!
//! Centralized test infrastructure for the APICMAP workspace:
//! - Mock resource resolver and identity service with call counters
//! - Proptest generators for ids, names and tags
//! - Test fixtures for common scenarios
//! - Custom assertions for mapped names and errors

// Re-export the in-memory store from its source crate
pub use apicmap_storage::InMemoryNameStore;

// Re-export core types for convenience
pub use apicmap_core::{
    IdentityClient, IdentityClientFactory, IdentityConfig, IdentityCredentials, IdentityError,
    MapperConfig, MapperContext, MapperError, MapperResult, NameType, NamingStrategy,
    ResolverError, ResourceResolver, StoreError, TenantRecord, MAX_NAME_LENGTH,
};

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// MOCK RESOURCE RESOLVER
// ============================================================================

#[derive(Debug, Clone)]
enum Scripted {
    Named(Option<String>),
    Failing(String),
}

/// Scriptable resource resolver.
///
/// Unscripted ids resolve to [`ResolverError::NotFound`]. Every call is
/// counted per name type.
#[derive(Debug, Default)]
pub struct MockResourceResolver {
    entries: Mutex<HashMap<(NameType, String), Scripted>>,
    calls: Mutex<HashMap<NameType, usize>>,
}

impl MockResourceResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`MockResourceResolver::set_name`].
    pub fn with_name(self, name_type: NameType, id: &str, name: &str) -> Self {
        self.set_name(name_type, id, name);
        self
    }

    /// Resolve `id` to `name`.
    pub fn set_name(&self, name_type: NameType, id: &str, name: &str) {
        self.script(name_type, id, Scripted::Named(Some(name.to_string())));
    }

    /// Resolve `id` to "exists but has no name".
    pub fn set_unnamed(&self, name_type: NameType, id: &str) {
        self.script(name_type, id, Scripted::Named(None));
    }

    /// Make lookups of `id` fail with an upstream error.
    pub fn set_failure(&self, name_type: NameType, id: &str, reason: &str) {
        self.script(name_type, id, Scripted::Failing(reason.to_string()));
    }

    /// Number of lookups made for `name_type`.
    pub fn calls(&self, name_type: NameType) -> usize {
        self.calls
            .lock()
            .expect("mock resolver lock poisoned")
            .get(&name_type)
            .copied()
            .unwrap_or(0)
    }

    /// Number of lookups across all types.
    pub fn total_calls(&self) -> usize {
        self.calls
            .lock()
            .expect("mock resolver lock poisoned")
            .values()
            .sum()
    }

    fn script(&self, name_type: NameType, id: &str, entry: Scripted) {
        self.entries
            .lock()
            .expect("mock resolver lock poisoned")
            .insert((name_type, id.to_string()), entry);
    }

    fn lookup(&self, name_type: NameType, id: &str) -> MapperResult<Option<String>> {
        *self
            .calls
            .lock()
            .expect("mock resolver lock poisoned")
            .entry(name_type)
            .or_default() += 1;

        let entry = self
            .entries
            .lock()
            .expect("mock resolver lock poisoned")
            .get(&(name_type, id.to_string()))
            .cloned();

        match entry {
            Some(Scripted::Named(name)) => Ok(name),
            Some(Scripted::Failing(reason)) => Err(ResolverError::Upstream {
                name_type,
                resource_id: id.to_string(),
                reason,
            }
            .into()),
            None => Err(ResolverError::NotFound {
                name_type,
                resource_id: id.to_string(),
            }
            .into()),
        }
    }
}

impl ResourceResolver for MockResourceResolver {
    fn network_name(&self, network_id: &str) -> MapperResult<Option<String>> {
        self.lookup(NameType::Network, network_id)
    }

    fn subnet_name(&self, subnet_id: &str) -> MapperResult<Option<String>> {
        self.lookup(NameType::Subnet, subnet_id)
    }

    fn port_name(&self, port_id: &str) -> MapperResult<Option<String>> {
        self.lookup(NameType::Port, port_id)
    }

    fn router_name(&self, router_id: &str) -> MapperResult<Option<String>> {
        self.lookup(NameType::Router, router_id)
    }

    fn policy_target_group_name(
        &self,
        policy_target_group_id: &str,
    ) -> MapperResult<Option<String>> {
        self.lookup(NameType::PolicyTargetGroup, policy_target_group_id)
    }

    fn l3_policy_name(&self, l3_policy_id: &str) -> MapperResult<Option<String>> {
        self.lookup(NameType::L3Policy, l3_policy_id)
    }

    fn l2_policy_name(&self, l2_policy_id: &str) -> MapperResult<Option<String>> {
        self.lookup(NameType::L2Policy, l2_policy_id)
    }

    fn policy_rule_set_name(&self, policy_rule_set_id: &str) -> MapperResult<Option<String>> {
        self.lookup(NameType::PolicyRuleSet, policy_rule_set_id)
    }

    fn policy_rule_name(&self, policy_rule_id: &str) -> MapperResult<Option<String>> {
        self.lookup(NameType::PolicyRule, policy_rule_id)
    }
}

// ============================================================================
// MOCK IDENTITY SERVICE
// ============================================================================

#[derive(Debug, Default)]
struct IdentityState {
    tenants: Mutex<Vec<TenantRecord>>,
    connect_failure: Mutex<Option<String>>,
    list_failure: Mutex<Option<String>>,
    last_credentials: Mutex<Option<IdentityCredentials>>,
    connects: AtomicUsize,
    lists: AtomicUsize,
}

/// Mock identity service.
///
/// Clones share state, so a test can hand one clone to the mapper and keep
/// another to script tenants and inspect call counts.
#[derive(Debug, Clone, Default)]
pub struct MockIdentityFactory {
    state: Arc<IdentityState>,
}

impl MockIdentityFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tenants(tenants: Vec<TenantRecord>) -> Self {
        let factory = Self::new();
        factory.set_tenants(tenants);
        factory
    }

    /// Replace the tenant list returned by future listings.
    pub fn set_tenants(&self, tenants: Vec<TenantRecord>) {
        *self.state.tenants.lock().expect("mock identity lock poisoned") = tenants;
    }

    /// Make `connect` fail (or succeed again with `None`).
    pub fn fail_connect(&self, reason: Option<&str>) {
        *self
            .state
            .connect_failure
            .lock()
            .expect("mock identity lock poisoned") = reason.map(str::to_string);
    }

    /// Make `list_tenants` fail (or succeed again with `None`).
    pub fn fail_list(&self, reason: Option<&str>) {
        *self
            .state
            .list_failure
            .lock()
            .expect("mock identity lock poisoned") = reason.map(str::to_string);
    }

    /// Number of successful client constructions.
    pub fn connect_count(&self) -> usize {
        self.state.connects.load(Ordering::SeqCst)
    }

    /// Number of tenant listings attempted.
    pub fn list_count(&self) -> usize {
        self.state.lists.load(Ordering::SeqCst)
    }

    /// Credentials passed to the last `connect`.
    pub fn last_credentials(&self) -> Option<IdentityCredentials> {
        self.state
            .last_credentials
            .lock()
            .expect("mock identity lock poisoned")
            .clone()
    }
}

impl IdentityClientFactory for MockIdentityFactory {
    fn connect(
        &self,
        credentials: &IdentityCredentials,
    ) -> Result<Box<dyn IdentityClient>, IdentityError> {
        *self
            .state
            .last_credentials
            .lock()
            .expect("mock identity lock poisoned") = Some(credentials.clone());

        if let Some(reason) = self
            .state
            .connect_failure
            .lock()
            .expect("mock identity lock poisoned")
            .clone()
        {
            return Err(IdentityError::ClientConstruction {
                auth_url: credentials.auth_url.clone(),
                reason,
            });
        }

        self.state.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockIdentityClient {
            state: Arc::clone(&self.state),
        }))
    }
}

/// Client handed out by [`MockIdentityFactory`].
#[derive(Debug)]
pub struct MockIdentityClient {
    state: Arc<IdentityState>,
}

impl IdentityClient for MockIdentityClient {
    fn list_tenants(&self) -> Result<Vec<TenantRecord>, IdentityError> {
        self.state.lists.fetch_add(1, Ordering::SeqCst);

        if let Some(reason) = self
            .state
            .list_failure
            .lock()
            .expect("mock identity lock poisoned")
            .clone()
        {
            return Err(IdentityError::ListTenants { reason });
        }

        Ok(self
            .state
            .tenants
            .lock()
            .expect("mock identity lock poisoned")
            .clone())
    }
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for generating mapper inputs.

    use super::*;
    use proptest::prelude::*;
    use uuid::Uuid;

    /// Generate a resource id: mostly UUID strings, sometimes with doubled
    /// hyphens or arbitrary text.
    pub fn arb_resource_id() -> impl Strategy<Value = String> {
        prop_oneof![
            4 => any::<[u8; 16]>().prop_map(|b| Uuid::from_bytes(b).to_string()),
            1 => any::<[u8; 16]>().prop_map(|b| Uuid::from_bytes(b).to_string().replace('-', "--")),
            1 => "[a-z0-9-]{1,60}",
        ]
    }

    /// Generate a canonical resource name.
    pub fn arb_canonical_name() -> impl Strategy<Value = String> {
        prop_oneof![
            "[A-Za-z0-9 _-]{1,80}",
            "[a-z]{1,10}(--[a-z]{1,10}){0,3}",
            "\\PC{1,30}",
        ]
    }

    /// Generate any NameType.
    pub fn arb_name_type() -> impl Strategy<Value = NameType> {
        proptest::sample::select(NameType::ALL.to_vec())
    }

    /// Generate a NameType served by the resource resolver (not tenant,
    /// not app profile).
    pub fn arb_plugin_name_type() -> impl Strategy<Value = NameType> {
        proptest::sample::select(
            NameType::ALL
                .iter()
                .copied()
                .filter(|t| t.is_resolvable() && *t != NameType::Tenant)
                .collect::<Vec<_>>(),
        )
    }

    /// Generate a NamingStrategy.
    pub fn arb_naming_strategy() -> impl Strategy<Value = NamingStrategy> {
        prop_oneof![Just(NamingStrategy::UseUuid), Just(NamingStrategy::UseName)]
    }

    /// Generate a tenant list with unique ids.
    pub fn arb_tenants(max: usize) -> impl Strategy<Value = Vec<TenantRecord>> {
        prop::collection::hash_map(arb_resource_id(), arb_canonical_name(), 1..max.max(2))
            .prop_map(|m| m.into_iter().map(|(id, name)| TenantRecord { id, name }).collect())
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built values for common test scenarios.

    use super::*;

    /// Identity settings that pass validation.
    pub fn identity_config() -> IdentityConfig {
        IdentityConfig {
            auth_protocol: "http".to_string(),
            auth_host: "keystone.test".to_string(),
            auth_port: 35357,
            admin_user: "neutron".to_string(),
            admin_password: "secret".to_string(),
            admin_tenant_name: "service".to_string(),
        }
    }

    pub fn mapper_config(naming_strategy: NamingStrategy) -> MapperConfig {
        MapperConfig {
            naming_strategy,
            identity: identity_config(),
        }
    }

    /// `count` tenants named `tenant-<n>` with ids `tid-<n>`.
    pub fn tenants(count: usize) -> Vec<TenantRecord> {
        (0..count)
            .map(|i| TenantRecord::new(format!("tid-{}", i), format!("tenant-{}", i)))
            .collect()
    }

    /// Context wrapping a resolver.
    pub fn context(resolver: Arc<MockResourceResolver>) -> MapperContext {
        MapperContext::new(resolver)
    }
}

// ============================================================================
// LOGGING
// ============================================================================

/// Install a test-writer tracing subscriber (honors `RUST_LOG`).
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// CUSTOM ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Custom assertions for mapper results.

    use super::*;

    /// Assert that a name is acceptable to APIC.
    pub fn assert_apic_name(name: &str) {
        assert!(
            name.chars().count() <= MAX_NAME_LENGTH,
            "APIC name {:?} exceeds {} characters",
            name,
            MAX_NAME_LENGTH
        );
        assert!(!name.contains("--"), "APIC name {:?} contains a hyphen run", name);
    }

    /// Assert that a result is a resolver error.
    pub fn assert_resolver_error<T: std::fmt::Debug>(result: &MapperResult<T>) {
        assert!(
            matches!(result, Err(MapperError::Resolver(_))),
            "Expected resolver error, got {:?}",
            result
        );
    }

    /// Assert that a result is a resolver NotFound for the given type.
    pub fn assert_not_found<T: std::fmt::Debug>(result: &MapperResult<T>, name_type: NameType) {
        match result {
            Err(MapperError::Resolver(ResolverError::NotFound { name_type: t, .. })) => {
                assert_eq!(*t, name_type, "NotFound for wrong name type");
            }
            other => panic!("Expected NotFound for {}, got {:?}", name_type, other),
        }
    }

    /// Assert that a result is an identity service error.
    pub fn assert_identity_error<T: std::fmt::Debug>(result: &MapperResult<T>) {
        assert!(
            matches!(result, Err(MapperError::Resolver(ResolverError::Identity(_)))),
            "Expected identity error, got {:?}",
            result
        );
    }
}
