//! Budgeted allocator configuration.

/// Configuration for a [`BudgetAllocator`](crate::BudgetAllocator) pool.
///
/// The limit is fixed when the pool is created; every allocator cloned
/// from the pool draws on the same budget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BudgetConfig {
    /// Total bytes that may be outstanding at once across all storage
    /// allocated from the pool.
    ///
    /// Default: 67_108_864 (64MB).
    pub limit_bytes: usize,
}

impl BudgetConfig {
    /// Default budget: 64MB.
    pub const DEFAULT_LIMIT_BYTES: usize = 64 * 1024 * 1024;

    /// Create a config with the given byte limit.
    pub fn new(limit_bytes: usize) -> Self {
        Self { limit_bytes }
    }

    /// A budget that only the process allocator itself can exhaust.
    pub fn unlimited() -> Self {
        Self::new(usize::MAX)
    }

    /// Whether this budget never rejects a request on its own.
    pub fn is_unlimited(&self) -> bool {
        self.limit_bytes == usize::MAX
    }
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT_BYTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limit_is_64mb() {
        assert_eq!(BudgetConfig::default().limit_bytes, 64 * 1024 * 1024);
    }

    #[test]
    fn unlimited_is_flagged() {
        assert!(BudgetConfig::unlimited().is_unlimited());
        assert!(!BudgetConfig::new(1024).is_unlimited());
    }
}
