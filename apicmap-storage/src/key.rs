//! Name store keys.
//!
//! A key identifies one cached APIC name: the resource id plus the
//! [`NameType`] it was mapped as. All entries for a resource id share a
//! common encoded prefix, which is what makes "forget every name of this
//! id" a single prefix scan.

use apicmap_core::NameType;

/// Separator byte between the resource id and the type tag.
///
/// 0xFF never occurs in UTF-8, so it cannot collide with id bytes.
const SEPARATOR: u8 = 0xFF;

/// Key of a single cached name.
///
/// # Binary Format
///
/// - Bytes 0..n: resource id (UTF-8)
/// - Byte n: separator (0xFF)
/// - Byte n+1: name type discriminant
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NameKey {
    resource_id: String,
    name_type: NameType,
}

impl NameKey {
    pub fn new(resource_id: impl Into<String>, name_type: NameType) -> Self {
        Self {
            resource_id: resource_id.into(),
            name_type,
        }
    }

    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    pub fn name_type(&self) -> NameType {
        self.name_type
    }

    /// Encode this key for LMDB storage.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Self::id_prefix(&self.resource_id);
        bytes.push(name_type_to_byte(self.name_type));
        bytes
    }

    /// Decode a key from bytes.
    ///
    /// Returns `None` if the separator is missing or misplaced, the type byte
    /// is unknown, or the id is not valid UTF-8.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        let (&type_byte, rest) = bytes.split_last()?;
        let (&separator, id_bytes) = rest.split_last()?;
        if separator != SEPARATOR {
            return None;
        }
        let name_type = byte_to_name_type(type_byte)?;
        let resource_id = std::str::from_utf8(id_bytes).ok()?;

        Some(Self::new(resource_id, name_type))
    }

    /// Prefix shared by the keys of every name type for one resource id.
    pub fn id_prefix(resource_id: &str) -> Vec<u8> {
        let mut prefix = Vec::with_capacity(resource_id.len() + 2);
        prefix.extend_from_slice(resource_id.as_bytes());
        prefix.push(SEPARATOR);
        prefix
    }
}

/// Convert NameType to a single-byte discriminant.
///
/// Persisted on disk; never renumber existing variants.
fn name_type_to_byte(name_type: NameType) -> u8 {
    match name_type {
        NameType::Tenant => 0,
        NameType::Network => 1,
        NameType::Subnet => 2,
        NameType::Port => 3,
        NameType::Router => 4,
        NameType::AppProfile => 5,
        NameType::PolicyTargetGroup => 6,
        NameType::L3Policy => 7,
        NameType::L2Policy => 8,
        NameType::PolicyRuleSet => 9,
        NameType::PolicyRule => 10,
    }
}

/// Convert a byte back to NameType.
fn byte_to_name_type(byte: u8) -> Option<NameType> {
    match byte {
        0 => Some(NameType::Tenant),
        1 => Some(NameType::Network),
        2 => Some(NameType::Subnet),
        3 => Some(NameType::Port),
        4 => Some(NameType::Router),
        5 => Some(NameType::AppProfile),
        6 => Some(NameType::PolicyTargetGroup),
        7 => Some(NameType::L3Policy),
        8 => Some(NameType::L2Policy),
        9 => Some(NameType::PolicyRuleSet),
        10 => Some(NameType::PolicyRule),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_and_getters() {
        let key = NameKey::new("net-1", NameType::Network);
        assert_eq!(key.resource_id(), "net-1");
        assert_eq!(key.name_type(), NameType::Network);
    }

    #[test]
    fn test_encode_layout() {
        let key = NameKey::new("ab", NameType::Subnet);
        assert_eq!(key.encode(), vec![b'a', b'b', SEPARATOR, 2]);
    }

    #[test]
    fn test_decode_too_short() {
        assert!(NameKey::decode(&[]).is_none());
        assert!(NameKey::decode(&[1]).is_none());
    }

    #[test]
    fn test_decode_wrong_separator() {
        assert!(NameKey::decode(&[b'a', 0x00, 1]).is_none());
    }

    #[test]
    fn test_decode_invalid_name_type() {
        let mut encoded = NameKey::new("a", NameType::Port).encode();
        let last = encoded.len() - 1;
        encoded[last] = 200;
        assert!(NameKey::decode(&encoded).is_none());
    }

    #[test]
    fn test_decode_empty_resource_id() {
        let key = NameKey::new("", NameType::Tenant);
        assert_eq!(NameKey::decode(&key.encode()), Some(key));
    }

    #[test]
    fn test_all_name_types_roundtrip() {
        for name_type in NameType::ALL {
            let key = NameKey::new("8d4e2bce-7b3b-4b88-96d0-f0e1d9dbd2a5", name_type);
            let decoded = NameKey::decode(&key.encode()).expect("decode should succeed");
            assert_eq!(key, decoded, "Roundtrip failed for {:?}", name_type);
        }
    }

    #[test]
    fn test_id_prefix_does_not_match_longer_id() {
        let prefix = NameKey::id_prefix("net");
        let other = NameKey::new("net-2", NameType::Network).encode();
        assert!(!other.starts_with(&prefix));
    }
}
