use crc32fast::Hasher;

pub const DEFAULT_ID_PREFIX: &str = "block";

/// Derive a short, stable seed from an arbitrary session key using CRC32
pub fn get_session_seed(key: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(key.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential block ID generator for one editing session
///
/// IDs look like `block-1a2b3c4d-7`. The seed keeps IDs from different
/// sessions apart; the counter keeps them apart within a session.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    prefix: String,
    seed: String,
    count: u32,
}

impl IdGenerator {
    /// Generator seeded from the current wall-clock time
    pub fn new(prefix: impl Into<String>) -> Self {
        let now = chrono::Utc::now();
        let key = format!(
            "{}:{}",
            now.timestamp(),
            now.timestamp_subsec_nanos()
        );
        Self::from_seed(prefix, get_session_seed(&key))
    }

    pub fn from_seed(prefix: impl Into<String>, seed: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            seed: seed.into(),
            count: 0,
        }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}-{}", self.prefix, self.seed, self.count)
    }

    /// Generate the next ID for which `taken` returns false
    ///
    /// Loaded documents may already contain IDs in this generator's range.
    pub fn new_id_avoiding<F>(&mut self, mut taken: F) -> String
    where
        F: FnMut(&str) -> bool,
    {
        loop {
            let id = self.new_id();
            if !taken(&id) {
                return id;
            }
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_ID_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_seed_is_stable() {
        let seed1 = get_session_seed("session-a");
        let seed2 = get_session_seed("session-a");
        assert_eq!(seed1, seed2);

        let seed3 = get_session_seed("session-b");
        assert_ne!(seed1, seed3);
    }

    #[test]
    fn test_sequential_ids() {
        let mut gen = IdGenerator::from_seed("block", "abc");

        let id1 = gen.new_id();
        let id2 = gen.new_id();
        let id3 = gen.new_id();

        assert_eq!(id1, "block-abc-1");
        assert_eq!(id2, "block-abc-2");
        assert_eq!(id3, "block-abc-3");
        assert_eq!(gen.seed(), "abc");
    }

    #[test]
    fn test_new_id_avoiding_skips_taken_ids() {
        let mut gen = IdGenerator::from_seed("b", "s");
        let taken = ["b-s-1".to_string(), "b-s-2".to_string()];

        let id = gen.new_id_avoiding(|candidate| taken.iter().any(|t| t == candidate));
        assert_eq!(id, "b-s-3");
    }

    #[test]
    fn test_default_uses_block_prefix() {
        let mut gen = IdGenerator::default();
        assert!(gen.new_id().starts_with("block-"));
    }
}
