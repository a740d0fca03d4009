//! The key model: an immutable byte encoding tagged with its key type.

use bytes::Bytes;

/// The set of key encodings the datastore supports.
///
/// Exactly one encoding exists today. Keeping the tag a closed enum makes
/// unsupported encodings unrepresentable at construction instead of a
/// runtime rejection deep in the scan loop; per-operation validation against
/// the store's accepted type remains in place so the
/// [`KeyTypeMismatch`](crate::Error::KeyTypeMismatch) contract stays
/// explicit when new encodings are added.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyType {
    /// Raw bytes, ordered by unsigned lexicographic comparison.
    #[default]
    Bytes,
}

/// An immutable datastore key.
///
/// Two keys are equal iff their byte encodings are equal. Ordering is
/// unsigned lexicographic over the encoding, matching the engine's keyspace
/// order.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key {
    bytes: Bytes,
    key_type: KeyType,
}

impl Key {
    /// Creates a bytes-typed key from the given encoding.
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            key_type: KeyType::Bytes,
        }
    }

    /// The key's type tag.
    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// The byte encoding used for ordering and storage.
    pub fn bytes(&self) -> Bytes {
        self.bytes.clone()
    }

    /// The byte encoding as a slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_compare_keys_by_byte_encoding() {
        // given
        let a = Key::from_bytes("abc");
        let b = Key::from_bytes(Bytes::from("abc"));
        let c = Key::from_bytes("abd");

        // then
        assert_eq!(a, b);
        assert!(a < c);
    }

    #[test]
    fn should_order_keys_lexicographically_over_raw_bytes() {
        // given - 0xff sorts after any shorter ascii key
        let hi = Key::from_bytes(vec![0xffu8]);
        let lo = Key::from_bytes("zz");

        // then
        assert!(lo < hi);
    }

    #[test]
    fn should_allow_empty_key_encoding() {
        // given
        let empty = Key::from_bytes(Bytes::new());

        // then
        assert!(empty.as_slice().is_empty());
        assert_eq!(empty.key_type(), KeyType::Bytes);
    }
}
