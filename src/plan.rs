//! Splitting a record count into batches.

use crate::run::RunError;

/// How a total record count is split into batches: `full_batches` batches of
/// `batch_size` records followed by one batch of `remainder` records when the
/// remainder is non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPlan {
    pub total: u64,
    pub batch_size: usize,
    pub full_batches: u64,
    pub remainder: usize,
}

impl BatchPlan {
    pub fn new(total: u64, batch_size: usize) -> Result<Self, RunError> {
        if batch_size == 0 {
            return Err(RunError::InvalidBatchSize);
        }

        let size = batch_size as u64;
        Ok(Self {
            total,
            batch_size,
            full_batches: total / size,
            // Less than batch_size, so it fits in usize
            remainder: (total % size) as usize,
        })
    }

    /// Number of batches written per entity.
    pub fn batch_count(&self) -> u64 {
        self.full_batches + u64::from(self.remainder > 0)
    }

    /// Batch sizes in write order.
    pub fn sizes(&self) -> impl Iterator<Item = usize> {
        let full = std::iter::repeat(self.batch_size).take(self.full_batches as usize);
        let last = (self.remainder > 0).then_some(self.remainder);
        full.chain(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_with_remainder() {
        let plan = BatchPlan::new(10, 3).unwrap();

        assert_eq!(plan.full_batches, 3);
        assert_eq!(plan.remainder, 1);
        assert_eq!(plan.batch_count(), 4);
        assert_eq!(plan.sizes().collect::<Vec<_>>(), vec![3, 3, 3, 1]);
    }

    #[test]
    fn test_plan_exact_multiple() {
        let plan = BatchPlan::new(9, 3).unwrap();

        assert_eq!(plan.remainder, 0);
        assert_eq!(plan.sizes().collect::<Vec<_>>(), vec![3, 3, 3]);
    }

    #[test]
    fn test_plan_smaller_than_batch() {
        let plan = BatchPlan::new(2, 1000).unwrap();
        assert_eq!(plan.sizes().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_plan_empty() {
        let plan = BatchPlan::new(0, 3).unwrap();

        assert_eq!(plan.batch_count(), 0);
        assert_eq!(plan.sizes().count(), 0);
    }

    #[test]
    fn test_plan_rejects_zero_batch_size() {
        assert!(matches!(
            BatchPlan::new(10, 0),
            Err(RunError::InvalidBatchSize)
        ));
    }

    #[test]
    fn test_sizes_sum_to_total() {
        for total in 0..50u64 {
            for batch_size in 1..12usize {
                let plan = BatchPlan::new(total, batch_size).unwrap();
                let sizes: Vec<_> = plan.sizes().collect();

                assert_eq!(sizes.iter().sum::<usize>() as u64, total);
                assert_eq!(sizes.len() as u64, total.div_ceil(batch_size as u64));
                assert!(sizes.iter().all(|s| *s > 0 && *s <= batch_size));
                assert!(sizes[..sizes.len().saturating_sub(1)]
                    .iter()
                    .all(|s| *s == batch_size));
            }
        }
    }
}
