//! Contracts for the subsystem that owns networks, ports and policy objects.

use std::fmt;
use std::sync::Arc;

use crate::MapperResult;

/// Source of canonical names for every resolvable resource type except
/// tenants, which come from the identity service.
///
/// Each lookup returns `Ok(None)` when the resource exists but has no name,
/// and an error when the resource cannot be read at all.
pub trait ResourceResolver: Send + Sync {
    fn network_name(&self, network_id: &str) -> MapperResult<Option<String>>;

    fn subnet_name(&self, subnet_id: &str) -> MapperResult<Option<String>>;

    fn port_name(&self, port_id: &str) -> MapperResult<Option<String>>;

    fn router_name(&self, router_id: &str) -> MapperResult<Option<String>>;

    fn policy_target_group_name(&self, policy_target_group_id: &str)
        -> MapperResult<Option<String>>;

    fn l3_policy_name(&self, l3_policy_id: &str) -> MapperResult<Option<String>>;

    fn l2_policy_name(&self, l2_policy_id: &str) -> MapperResult<Option<String>>;

    fn policy_rule_set_name(&self, policy_rule_set_id: &str) -> MapperResult<Option<String>>;

    fn policy_rule_name(&self, policy_rule_id: &str) -> MapperResult<Option<String>>;
}

/// Execution context passed through a mapping call.
///
/// Cheap to clone; a [`MapperContext`] is retained by every mapped name so
/// that it can be renewed later without the caller supplying it again.
#[derive(Clone)]
pub struct MapperContext {
    resolver: Arc<dyn ResourceResolver>,
}

impl MapperContext {
    pub fn new(resolver: Arc<dyn ResourceResolver>) -> Self {
        Self { resolver }
    }

    /// The resource-owning subsystem for this call.
    pub fn resolver(&self) -> &dyn ResourceResolver {
        self.resolver.as_ref()
    }
}

impl fmt::Debug for MapperContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapperContext").finish_non_exhaustive()
    }
}
