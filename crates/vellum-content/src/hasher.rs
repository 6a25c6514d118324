use vellum_types::ContentAddress;

/// Domain-separated BLAKE3 hasher producing content addresses.
///
/// The domain tag is prepended to every digest so addresses cannot collide
/// with hashes computed elsewhere over the same bytes.
pub struct AddressHasher {
    domain: &'static str,
}

impl AddressHasher {
    /// Hasher for stored payloads.
    pub const CONTENT: Self = Self {
        domain: "vellum-content-v1",
    };

    /// Hasher for a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash `data` into a 64-character lowercase hex address.
    pub fn address(&self, data: &[u8]) -> ContentAddress {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        hasher.update(data);
        ContentAddress::new(hex::encode(hasher.finalize().as_bytes()))
    }

    /// Whether `data` hashes to `expected`.
    pub fn verify(&self, data: &[u8], expected: &ContentAddress) -> bool {
        self.address(data) == *expected
    }

    /// Whether `address` has the shape this hasher produces.
    pub fn is_well_formed(address: &ContentAddress) -> bool {
        let s = address.as_str();
        s.len() == 64 && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    /// The domain tag mixed into every digest.
    pub fn domain(&self) -> &str {
        self.domain
    }
}
