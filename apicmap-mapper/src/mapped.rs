//! Mapped APIC names.

use std::fmt;

use apicmap_core::{MapperContext, MapperResult, NameType};

use crate::engine::NameMapper;

/// An APIC name together with what is needed to recompute it.
///
/// Only the string is cached; a `MappedName` is built fresh on every lookup
/// and borrows the engine that produced it.
#[derive(Clone)]
pub struct MappedName<'a> {
    mapper: &'a NameMapper,
    name_type: NameType,
    resource_id: String,
    context: Option<MapperContext>,
    value: String,
}

impl<'a> MappedName<'a> {
    pub(crate) fn new(
        mapper: &'a NameMapper,
        name_type: NameType,
        resource_id: impl Into<String>,
        context: Option<MapperContext>,
        value: String,
    ) -> Self {
        Self {
            mapper,
            name_type,
            resource_id: resource_id.into(),
            context,
            value,
        }
    }

    /// Recompute the name, bypassing the cache, and update it in place.
    ///
    /// App profile names are re-claimed with the desired name they were
    /// first requested with. Copy [`MappedName::value`] first if the old name
    /// is still needed.
    pub fn renew(&mut self) -> MapperResult<&mut Self> {
        self.value = match (self.name_type, &self.context) {
            (NameType::AppProfile, _) => self.mapper.claim_app_profile(&self.resource_id, true)?,
            (name_type, Some(ctx)) => self.mapper.map(name_type, ctx, &self.resource_id, true)?,
            (name_type, None) => {
                return Err(apicmap_core::ResolverError::Unsupported { name_type }.into())
            }
        };
        Ok(self)
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Id the name was mapped from (the desired name for app profiles).
    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    pub fn name_type(&self) -> NameType {
        self.name_type
    }

    pub fn context(&self) -> Option<&MapperContext> {
        self.context.as_ref()
    }

    pub fn into_value(self) -> String {
        self.value
    }
}

impl fmt::Display for MappedName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl fmt::Debug for MappedName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappedName")
            .field("value", &self.value)
            .field("name_type", &self.name_type)
            .field("resource_id", &self.resource_id)
            .finish_non_exhaustive()
    }
}

impl AsRef<str> for MappedName<'_> {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl PartialEq<str> for MappedName<'_> {
    fn eq(&self, other: &str) -> bool {
        self.value == other
    }
}

impl PartialEq<&str> for MappedName<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.value == *other
    }
}
