use rand::distributions::Alphanumeric;
use rand::Rng;

/// Capability: produce a unique-enough string token to use as a key when the
/// client did not supply one. Collisions simply overwrite, so "unique enough"
/// is acceptable at this store's scale.
pub trait KeyGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Default generator: short random alphanumeric token.
pub struct RandomKeyGenerator {
    len: usize,
}

impl RandomKeyGenerator {
    pub fn new(len: usize) -> Self {
        Self { len }
    }
}

impl Default for RandomKeyGenerator {
    fn default() -> Self {
        Self::new(8)
    }
}

impl KeyGenerator for RandomKeyGenerator {
    fn generate(&self) -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(self.len)
            .map(char::from)
            .collect()
    }
}
