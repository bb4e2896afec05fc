//! APICMAP Mapper - Resource Id to APIC Name Mapping
//!
//! Maps tenant, network, subnet, port, router and group-policy resource ids
//! to names APIC accepts, caching every result in a [`NameStore`].
//!
//! ```ignore
//! use std::sync::Arc;
//! use apicmap_core::{MapperConfig, MapperContext};
//! use apicmap_mapper::NameMapper;
//! use apicmap_storage::InMemoryNameStore;
//!
//! let mapper = NameMapper::from_config(
//!     Arc::new(InMemoryNameStore::new()),
//!     identity_factory,
//!     &MapperConfig::from_env(),
//! )?;
//! let ctx = MapperContext::new(resolver);
//! let mut name = mapper.network(&ctx, network_id, false)?;
//! name.renew()?;
//! ```
//!
//! [`NameStore`]: apicmap_storage::NameStore

mod engine;
mod mapped;

pub use engine::{NameMapper, NameMapperBuilder};
pub use mapped::MappedName;
