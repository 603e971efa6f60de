//! Rayon-based parallelisation utilities.
//!
//! This module provides order-preserving parallel maps used by the
//! scenario runner. Calculators are stateless and `Sync`, so steps can be
//! evaluated on any worker thread; results are always collected back in
//! input order.

use rayon::prelude::*;

/// Minimum number of items handed to one rayon task.
pub const DEFAULT_BATCH_SIZE: usize = 16;

/// Item count at which parallel evaluation is used.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256;

/// Parallel map preserving input order.
///
/// # Arguments
///
/// * `items` - Slice of items to process
/// * `mapper` - Function to apply to each item
///
/// # Returns
///
/// Vector of mapped results, `output[i] = mapper(&items[i])`.
pub fn parallel_map<T, R, F>(items: &[T], mapper: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Sync + Send,
{
    items.par_iter().map(mapper).collect()
}

/// Indexed map that runs in parallel only when `config` says so.
///
/// The mapper receives each item's position. Output order matches input
/// order on both paths.
///
/// # Examples
///
/// ```
/// use lcis_portfolio::parallel::{map_indexed, ParallelConfig};
///
/// let items = vec![10, 20, 30];
/// let out = map_indexed(&items, &ParallelConfig::always(), |i, x| i * 100 + x);
/// assert_eq!(out, vec![10, 120, 230]);
/// ```
pub fn map_indexed<T, R, F>(items: &[T], config: &ParallelConfig, mapper: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(usize, &T) -> R + Sync + Send,
{
    if config.should_parallelize(items.len()) {
        items
            .par_iter()
            .enumerate()
            .with_min_len(config.batch_size)
            .map(|(index, item)| mapper(index, item))
            .collect()
    } else {
        items
            .iter()
            .enumerate()
            .map(|(index, item)| mapper(index, item))
            .collect()
    }
}

/// Configuration for parallel execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParallelConfig {
    /// Minimum items per rayon task
    pub batch_size: usize,
    /// Minimum items before using parallelism
    pub parallel_threshold: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl ParallelConfig {
    /// Creates a new parallel configuration.
    pub fn new(batch_size: usize, parallel_threshold: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
            parallel_threshold,
        }
    }

    /// Never parallelise.
    pub fn sequential() -> Self {
        Self {
            parallel_threshold: usize::MAX,
            ..Self::default()
        }
    }

    /// Always parallelise, whatever the item count.
    pub fn always() -> Self {
        Self {
            batch_size: 1,
            parallel_threshold: 0,
        }
    }

    /// Returns whether to use parallel processing for the given item count.
    #[inline]
    pub fn should_parallelize(&self, n_items: usize) -> bool {
        n_items >= self.parallel_threshold
    }
}
