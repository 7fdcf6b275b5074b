use crate::prelude::{MatrixError, MatrixResult};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Contiguous block of rows assigned to one worker.
///
/// Stored half-open so that empty ranges (more workers than rows) need no
/// negative end index. `end_inclusive` recovers the `[start, end]` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RowRangeRepr")]
pub struct RowRange {
    start: usize,
    end: usize,
}

#[derive(Deserialize)]
struct RowRangeRepr {
    start: usize,
    end: usize,
}

impl TryFrom<RowRangeRepr> for RowRange {
    type Error = MatrixError;

    fn try_from(repr: RowRangeRepr) -> MatrixResult<Self> {
        if repr.start > repr.end {
            return Err(MatrixError::InvalidArgument(format!(
                "row range starts at {} but ends at {}",
                repr.start, repr.end
            )));
        }
        Ok(Self::new(repr.start, repr.end))
    }
}

impl RowRange {
    pub fn new(start: usize, end_exclusive: usize) -> Self {
        Self {
            start,
            end: end_exclusive.max(start),
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end_exclusive(&self) -> usize {
        self.end
    }

    /// Last row in the range, or `None` when the range carries no work.
    pub fn end_inclusive(&self) -> Option<usize> {
        self.end.checked_sub(1).filter(|&end| end >= self.start)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn rows(&self) -> Range<usize> {
        self.start..self.end
    }

    #[cfg(test)]
    pub(crate) fn from_bounds_unchecked(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Splits `[0, work_amount)` into `num_threads` contiguous ranges.
///
/// With `base = work_amount / num_threads` and `extra = work_amount % num_threads`,
/// the first `extra` ranges get `base + 1` rows and the rest get `base`.
pub fn partition(work_amount: usize, num_threads: usize) -> MatrixResult<Vec<RowRange>> {
    if num_threads == 0 {
        return Err(MatrixError::InvalidArgument(
            "thread count must be at least 1".into(),
        ));
    }

    let base = work_amount / num_threads;
    let extra = work_amount % num_threads;
    let start_of = |t: usize| {
        if t < extra {
            t * (base + 1)
        } else {
            extra * (base + 1) + (t - extra) * base
        }
    };

    let mut ranges = Vec::new();
    ranges
        .try_reserve_exact(num_threads)
        .map_err(|err| MatrixError::Allocation(err.to_string()))?;
    ranges.extend((0..num_threads).map(|t| RowRange::new(start_of(t), start_of(t + 1))));
    Ok(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn assert_exact_cover(ranges: &[RowRange], work_amount: usize, num_threads: usize) {
        assert_eq!(ranges.len(), num_threads);
        let mut next = 0;
        for range in ranges {
            assert_eq!(range.start(), next, "gap or overlap at row {}", next);
            next = range.end_exclusive();
        }
        assert_eq!(next, work_amount);

        let sizes: Vec<usize> = ranges.iter().map(RowRange::len).collect();
        let max = sizes.iter().copied().max().unwrap_or(0);
        let min = sizes.iter().copied().min().unwrap_or(0);
        assert!(max - min <= 1, "unbalanced sizes {:?}", sizes);
        assert!(sizes.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn seven_rows_over_three_threads() {
        let ranges = partition(7, 3).unwrap();
        let bounds: Vec<(usize, Option<usize>)> = ranges
            .iter()
            .map(|r| (r.start(), r.end_inclusive()))
            .collect();
        assert_eq!(bounds, vec![(0, Some(2)), (3, Some(4)), (5, Some(6))]);
    }

    #[test]
    fn more_threads_than_rows_yields_empty_tail() {
        let ranges = partition(2, 5).unwrap();
        assert_eq!(ranges.iter().filter(|r| !r.is_empty()).count(), 2);
        assert!(ranges[..2].iter().all(|r| r.len() == 1));
        assert!(ranges[2..].iter().all(|r| r.is_empty() && r.end_inclusive().is_none()));
        assert_exact_cover(&ranges, 2, 5);
    }

    #[test]
    fn zero_work_gives_all_empty_ranges() {
        let ranges = partition(0, 4).unwrap();
        assert!(ranges.iter().all(RowRange::is_empty));
        assert_exact_cover(&ranges, 0, 4);
    }

    #[test]
    fn zero_threads_is_invalid() {
        assert!(matches!(
            partition(10, 0),
            Err(MatrixError::InvalidArgument(_))
        ));
    }

    #[test]
    fn exhaustive_small_inputs_cover_exactly() {
        for work_amount in 0..64 {
            for num_threads in 1..70 {
                let ranges = partition(work_amount, num_threads).unwrap();
                assert_exact_cover(&ranges, work_amount, num_threads);
            }
        }
    }

    #[test]
    fn random_large_inputs_cover_exactly() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..500 {
            let work_amount = rng.gen_range(0..100_000);
            let num_threads = rng.gen_range(1..512);
            let ranges = partition(work_amount, num_threads).unwrap();
            assert_exact_cover(&ranges, work_amount, num_threads);
        }
    }

    #[test]
    fn unrepresentable_thread_count_fails_allocation() {
        assert!(matches!(
            partition(2, usize::MAX),
            Err(MatrixError::Allocation(_))
        ));
    }

    #[test]
    fn deserialize_rejects_inverted_range() {
        let ok: RowRange = serde_json::from_str(r#"{"start":1,"end":3}"#).unwrap();
        assert_eq!(ok, RowRange::new(1, 3));
        let empty: RowRange = serde_json::from_str(r#"{"start":2,"end":2}"#).unwrap();
        assert!(empty.is_empty());
        assert!(serde_json::from_str::<RowRange>(r#"{"start":2,"end":1}"#).is_err());
    }

    #[test]
    fn row_range_accessors() {
        let range = RowRange::new(3, 5);
        assert_eq!(range.len(), 2);
        assert_eq!(range.end_inclusive(), Some(4));
        assert_eq!(range.rows(), 3..5);
        assert!(RowRange::new(0, 0).end_inclusive().is_none());
    }
}
