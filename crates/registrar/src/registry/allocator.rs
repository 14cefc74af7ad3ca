//! Membership code allocation

use rand::Rng;
use tracing::debug;

use crate::persistence::MemberStore;

/// Prefix carried by every membership code
pub const CODE_PREFIX: &str = "ESA";

const CODE_MIN: u32 = 10_000;
const CODE_MAX: u32 = 99_999;

/// Generates membership codes of the form `ESA` + 5 decimal digits.
///
/// The value space holds exactly 90000 codes. `allocate` draws uniformly and
/// redraws on collision until an unused code is found, so allocation time
/// degrades as the space fills while correctness does not. This generator is
/// not suitable for a population approaching the size of the space.
///
/// Allocation alone does not reserve a code: the UNIQUE constraint on
/// `membership_code` is the backstop, and the registry retries allocation
/// when a concurrent insert claims the same candidate first.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeAllocator;

impl CodeAllocator {
    pub fn new() -> Self {
        Self
    }

    /// Draw a random candidate code
    fn draw(&self) -> String {
        let digits = rand::thread_rng().gen_range(CODE_MIN..=CODE_MAX);
        format!("{CODE_PREFIX}{digits}")
    }

    /// Produce a code unused at the instant of the check
    pub async fn allocate(&self, store: &MemberStore) -> Result<String, sqlx::Error> {
        let mut code = self.draw();
        while store.code_exists(&code).await? {
            debug!("Membership code {} already taken, redrawing", code);
            code = self.draw();
        }
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::NewMember;
    use common::config::DatabaseConfig;

    fn memory_config() -> DatabaseConfig {
        DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            idle_timeout: None,
            max_lifetime: None,
            run_migrations: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_draw_format() {
        let allocator = CodeAllocator::new();
        for _ in 0..1000 {
            let code = allocator.draw();
            assert_eq!(code.len(), 8);
            assert!(code.starts_with(CODE_PREFIX));
            let digits: u32 = code[CODE_PREFIX.len()..].parse().unwrap();
            assert!((CODE_MIN..=CODE_MAX).contains(&digits));
        }
    }

    #[tokio::test]
    async fn test_allocate_returns_unused_code() {
        let store = MemberStore::new(&memory_config()).await.unwrap();
        let allocator = CodeAllocator::new();

        let member = NewMember {
            name: "Existing".to_string(),
            email: "existing@example.com".to_string(),
            phone: "+254700000001".to_string(),
            department: None,
            reg_number: None,
            year: None,
        };
        store.insert_member(&member, "ESA10000").await.unwrap();

        for _ in 0..100 {
            let code = allocator.allocate(&store).await.unwrap();
            assert_ne!(code, "ESA10000");
            assert!(code.starts_with(CODE_PREFIX));
        }
    }
}
