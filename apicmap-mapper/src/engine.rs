//! The name mapping engine.
//!
//! [`NameMapper`] turns resource ids into APIC names. Every resolvable type
//! goes through the same pipeline:
//!
//! 1. Forced remap deletes the cached entry first.
//! 2. A cached name is returned without touching the resolver.
//! 3. On a miss the canonical name is looked up (tenants through the
//!    identity service, everything else through the [`ResourceResolver`]
//!    carried by the [`MapperContext`]).
//! 4. The name is synthesized with the engine's [`NamingStrategy`], written
//!    back to the store, and returned as a [`MappedName`].
//!
//! [`ResourceResolver`]: apicmap_core::ResourceResolver

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, RwLock};

use apicmap_core::{
    canonical_budget, synthesize, IdentityClient, IdentityClientFactory, IdentityConfig,
    IdentityCredentials, MapperConfig, MapperContext, MapperError, MapperResult, NameType,
    NamingStrategy, ResolverError, StoreError, TenantRecord, APP_PROFILE_KEY,
};
use apicmap_storage::NameStore;
use tracing::{debug, error, info, info_span, warn, Span};

use crate::mapped::MappedName;

// ============================================================================
// BUILDER
// ============================================================================

/// Builder for [`NameMapper`].
///
/// Credentials default to [`IdentityConfig::default`], the strategy to
/// [`NamingStrategy::UseUuid`] and the span to `apic_name_mapper`.
pub struct NameMapperBuilder {
    store: Arc<dyn NameStore>,
    identity_factory: Arc<dyn IdentityClientFactory>,
    credentials: IdentityCredentials,
    strategy: NamingStrategy,
    span: Option<Span>,
}

impl NameMapperBuilder {
    fn new(store: Arc<dyn NameStore>, identity_factory: Arc<dyn IdentityClientFactory>) -> Self {
        Self {
            store,
            identity_factory,
            credentials: IdentityConfig::default().credentials(),
            strategy: NamingStrategy::default(),
            span: None,
        }
    }

    /// Credentials used to build the identity client.
    pub fn credentials(mut self, credentials: IdentityCredentials) -> Self {
        self.credentials = credentials;
        self
    }

    pub fn naming_strategy(mut self, strategy: NamingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Span every mapper event is recorded under.
    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Take the strategy and identity credentials from a loaded config.
    pub fn config(self, config: &MapperConfig) -> Self {
        self.naming_strategy(config.naming_strategy)
            .credentials(config.identity.credentials())
    }

    pub fn build(self) -> NameMapper {
        NameMapper {
            store: self.store,
            identity_factory: self.identity_factory,
            credentials: self.credentials,
            strategy: self.strategy,
            span: self
                .span
                .unwrap_or_else(|| info_span!("apic_name_mapper")),
            tenant_names: RwLock::new(HashMap::new()),
            identity_client: Mutex::new(None),
        }
    }
}

// ============================================================================
// NAME MAPPER
// ============================================================================

/// Cached, strategy-driven mapping of resource ids to APIC names.
///
/// Methods take `&self` so that returned [`MappedName`]s can borrow the
/// engine. The tenant cache and identity client sit behind locks for that
/// reason only; concurrent misses on the same key both resolve and the last
/// store write wins.
pub struct NameMapper {
    store: Arc<dyn NameStore>,
    identity_factory: Arc<dyn IdentityClientFactory>,
    credentials: IdentityCredentials,
    strategy: NamingStrategy,
    span: Span,
    /// Tenant id -> display name, filled by bulk listing. Never evicted.
    tenant_names: RwLock<HashMap<String, String>>,
    /// Built on the first tenant lookup that misses `tenant_names`.
    identity_client: Mutex<Option<Box<dyn IdentityClient>>>,
}

impl NameMapper {
    pub fn builder(
        store: Arc<dyn NameStore>,
        identity_factory: Arc<dyn IdentityClientFactory>,
    ) -> NameMapperBuilder {
        NameMapperBuilder::new(store, identity_factory)
    }

    /// Build a mapper from a validated config.
    pub fn from_config(
        store: Arc<dyn NameStore>,
        identity_factory: Arc<dyn IdentityClientFactory>,
        config: &MapperConfig,
    ) -> MapperResult<Self> {
        config.validate()?;
        Ok(Self::builder(store, identity_factory).config(config).build())
    }

    pub fn naming_strategy(&self) -> NamingStrategy {
        self.strategy
    }

    pub fn store(&self) -> &dyn NameStore {
        self.store.as_ref()
    }

    /// Number of tenant names currently held in memory.
    pub fn cached_tenant_count(&self) -> usize {
        self.tenant_names.read().map(|names| names.len()).unwrap_or(0)
    }

    /// Map `resource_id` of type `name_type` to its APIC name.
    ///
    /// With `remap` the cached entry is discarded and the name recomputed.
    /// Resolver and store failures are logged and returned unchanged; nothing
    /// is written to the store after a resolver failure.
    pub fn resolve_name(
        &self,
        name_type: NameType,
        ctx: &MapperContext,
        resource_id: &str,
        remap: bool,
    ) -> MapperResult<MappedName<'_>> {
        let value = self.map(name_type, ctx, resource_id, remap)?;
        Ok(MappedName::new(
            self,
            name_type,
            resource_id,
            Some(ctx.clone()),
            value,
        ))
    }

    pub fn tenant(
        &self,
        ctx: &MapperContext,
        tenant_id: &str,
        remap: bool,
    ) -> MapperResult<MappedName<'_>> {
        self.resolve_name(NameType::Tenant, ctx, tenant_id, remap)
    }

    pub fn network(
        &self,
        ctx: &MapperContext,
        network_id: &str,
        remap: bool,
    ) -> MapperResult<MappedName<'_>> {
        self.resolve_name(NameType::Network, ctx, network_id, remap)
    }

    pub fn subnet(
        &self,
        ctx: &MapperContext,
        subnet_id: &str,
        remap: bool,
    ) -> MapperResult<MappedName<'_>> {
        self.resolve_name(NameType::Subnet, ctx, subnet_id, remap)
    }

    pub fn port(
        &self,
        ctx: &MapperContext,
        port_id: &str,
        remap: bool,
    ) -> MapperResult<MappedName<'_>> {
        self.resolve_name(NameType::Port, ctx, port_id, remap)
    }

    pub fn router(
        &self,
        ctx: &MapperContext,
        router_id: &str,
        remap: bool,
    ) -> MapperResult<MappedName<'_>> {
        self.resolve_name(NameType::Router, ctx, router_id, remap)
    }

    pub fn policy_target_group(
        &self,
        ctx: &MapperContext,
        policy_target_group_id: &str,
        remap: bool,
    ) -> MapperResult<MappedName<'_>> {
        self.resolve_name(NameType::PolicyTargetGroup, ctx, policy_target_group_id, remap)
    }

    pub fn l3_policy(
        &self,
        ctx: &MapperContext,
        l3_policy_id: &str,
        remap: bool,
    ) -> MapperResult<MappedName<'_>> {
        self.resolve_name(NameType::L3Policy, ctx, l3_policy_id, remap)
    }

    pub fn l2_policy(
        &self,
        ctx: &MapperContext,
        l2_policy_id: &str,
        remap: bool,
    ) -> MapperResult<MappedName<'_>> {
        self.resolve_name(NameType::L2Policy, ctx, l2_policy_id, remap)
    }

    pub fn policy_rule_set(
        &self,
        ctx: &MapperContext,
        policy_rule_set_id: &str,
        remap: bool,
    ) -> MapperResult<MappedName<'_>> {
        self.resolve_name(NameType::PolicyRuleSet, ctx, policy_rule_set_id, remap)
    }

    pub fn policy_rule(
        &self,
        ctx: &MapperContext,
        policy_rule_id: &str,
        remap: bool,
    ) -> MapperResult<MappedName<'_>> {
        self.resolve_name(NameType::PolicyRule, ctx, policy_rule_id, remap)
    }

    /// Claim the singleton app profile name.
    ///
    /// The first caller's `desired` name is stored and every later call
    /// returns it, whatever it asks for, until a remap clears the slot. The
    /// returned [`MappedName`] keeps `desired` as its resource id so that
    /// renewing it re-claims that name.
    pub fn app_profile(
        &self,
        ctx: Option<&MapperContext>,
        desired: &str,
        remap: bool,
    ) -> MapperResult<MappedName<'_>> {
        let value = self.claim_app_profile(desired, remap)?;
        Ok(MappedName::new(
            self,
            NameType::AppProfile,
            desired,
            ctx.cloned(),
            value,
        ))
    }

    // ------------------------------------------------------------------------
    // Pipeline
    // ------------------------------------------------------------------------

    pub(crate) fn map(
        &self,
        name_type: NameType,
        ctx: &MapperContext,
        resource_id: &str,
        remap: bool,
    ) -> MapperResult<String> {
        let _entered = self.span.enter();

        if !name_type.is_resolvable() {
            error!(name_type = %name_type, resource_id, "Name type has no resolver");
            return Err(ResolverError::Unsupported { name_type }.into());
        }

        if remap {
            info!(name_type = %name_type, resource_id, "Remapping APIC name");
            self.store
                .delete_name(resource_id, Some(name_type))
                .map_err(store_failure(name_type, resource_id, "delete"))?;
        } else if let Some(cached) = self
            .store
            .get_name(resource_id, name_type)
            .map_err(store_failure(name_type, resource_id, "read"))?
        {
            debug!(name_type = %name_type, resource_id, "APIC name cache hit");
            return Ok(cached);
        } else {
            debug!(name_type = %name_type, resource_id, "APIC name cache miss");
        }

        let canonical = match self.lookup_canonical(name_type, ctx, resource_id) {
            Ok(canonical) => canonical,
            Err(e) => {
                error!(
                    name_type = %name_type,
                    resource_id,
                    error = %e,
                    "Failed to look up canonical name"
                );
                return Err(e);
            }
        };

        if let Some(name) = canonical.as_deref().filter(|name| !name.is_empty()) {
            if self.strategy == NamingStrategy::UseUuid && canonical_budget(resource_id) <= 0 {
                warn!(
                    name_type = %name_type,
                    resource_id,
                    canonical = name,
                    "Resource id leaves no room for the canonical name"
                );
            }
        }

        let result = synthesize(canonical.as_deref(), resource_id, self.strategy);
        self.store
            .update_name(resource_id, name_type, &result)
            .map_err(store_failure(name_type, resource_id, "write"))?;
        Ok(result)
    }

    /// Per-type canonical name lookup.
    fn lookup_canonical(
        &self,
        name_type: NameType,
        ctx: &MapperContext,
        resource_id: &str,
    ) -> MapperResult<Option<String>> {
        let resolver = ctx.resolver();
        match name_type {
            NameType::Tenant => self.tenant_name(resource_id),
            NameType::Network => resolver.network_name(resource_id),
            NameType::Subnet => resolver.subnet_name(resource_id),
            NameType::Port => resolver.port_name(resource_id),
            NameType::Router => resolver.router_name(resource_id),
            NameType::PolicyTargetGroup => resolver.policy_target_group_name(resource_id),
            NameType::L3Policy => resolver.l3_policy_name(resource_id),
            NameType::L2Policy => resolver.l2_policy_name(resource_id),
            NameType::PolicyRuleSet => resolver.policy_rule_set_name(resource_id),
            NameType::PolicyRule => resolver.policy_rule_name(resource_id),
            NameType::AppProfile => Err(ResolverError::Unsupported { name_type }.into()),
        }
    }

    fn tenant_name(&self, tenant_id: &str) -> MapperResult<Option<String>> {
        if let Some(name) = self
            .tenant_names
            .read()
            .map_err(|_| StoreError::LockPoisoned)?
            .get(tenant_id)
        {
            return Ok(Some(name.clone()));
        }

        let tenants = self.list_tenants()?;
        debug!(count = tenants.len(), "Listed identity service tenants");

        let mut names = self
            .tenant_names
            .write()
            .map_err(|_| StoreError::LockPoisoned)?;
        for tenant in tenants {
            names.insert(tenant.id, tenant.name);
        }
        Ok(names.get(tenant_id).cloned())
    }

    fn list_tenants(&self) -> MapperResult<Vec<TenantRecord>> {
        let mut slot = self
            .identity_client
            .lock()
            .map_err(|_| StoreError::LockPoisoned)?;

        let client = match slot.take() {
            Some(client) => client,
            None => {
                debug!(auth_url = %self.credentials.auth_url, "Connecting to identity service");
                self.identity_factory.connect(&self.credentials)?
            }
        };
        let tenants = client.list_tenants();
        *slot = Some(client);

        Ok(tenants?)
    }

    pub(crate) fn claim_app_profile(&self, desired: &str, remap: bool) -> MapperResult<String> {
        let _entered = self.span.enter();

        if remap {
            info!(desired, "Releasing app profile name");
            self.store
                .delete_name(APP_PROFILE_KEY, None)
                .map_err(store_failure(NameType::AppProfile, APP_PROFILE_KEY, "delete"))?;
        }

        match self
            .store
            .get_name(APP_PROFILE_KEY, NameType::AppProfile)
            .map_err(store_failure(NameType::AppProfile, APP_PROFILE_KEY, "read"))?
        {
            Some(existing) => Ok(existing),
            None => {
                self.store
                    .update_name(APP_PROFILE_KEY, NameType::AppProfile, desired)
                    .map_err(store_failure(NameType::AppProfile, APP_PROFILE_KEY, "write"))?;
                debug!(desired, "Claimed app profile name");
                Ok(desired.to_string())
            }
        }
    }
}

/// Log a name store failure before handing the error back unchanged.
fn store_failure<'a>(
    name_type: NameType,
    resource_id: &'a str,
    operation: &'static str,
) -> impl FnOnce(MapperError) -> MapperError + 'a {
    move |e| {
        error!(
            name_type = %name_type,
            resource_id,
            operation,
            error = %e,
            "Name store operation failed"
        );
        e
    }
}

impl fmt::Debug for NameMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameMapper")
            .field("strategy", &self.strategy)
            .field("credentials", &self.credentials)
            .field("cached_tenants", &self.cached_tenant_count())
            .finish_non_exhaustive()
    }
}
