use crate::search::SegmentPair;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Interval {
    start: usize,
    len: usize,
    target: usize,
}

/// Query position to target position, stored as sorted disjoint intervals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalMap {
    intervals: Vec<Interval>,
}

impl IntervalMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a map from segment pairs, dropping any that overlap an earlier one.
    pub fn from_segments(segments: &[SegmentPair]) -> Self {
        let mut map = IntervalMap::new();
        for segment in segments {
            if !map.insert(segment) {
                log::warn!(
                    "ignoring segment {:?} -> {:?}, overlaps an earlier one",
                    segment.query,
                    segment.target
                );
            }
        }
        map
    }

    /// Returns false, leaving the map unchanged, if the query range is empty or overlaps.
    pub fn insert(&mut self, segment: &SegmentPair) -> bool {
        let len = segment.query.len().min(segment.target.len());
        if len == 0 {
            return false;
        }
        let start = segment.query.start;
        let at = self.intervals.partition_point(|iv| iv.start < start);
        let overlaps_prev = at > 0 && {
            let prev = self.intervals[at - 1];
            prev.start + prev.len > start
        };
        let overlaps_next = at < self.intervals.len() && self.intervals[at].start < start + len;
        if overlaps_prev || overlaps_next {
            return false;
        }
        self.intervals.insert(
            at,
            Interval {
                start,
                len,
                target: segment.target.start,
            },
        );
        true
    }

    pub fn get(&self, query: usize) -> Option<usize> {
        let at = self.intervals.partition_point(|iv| iv.start <= query);
        let iv = self.intervals.get(at.checked_sub(1)?)?;
        (query < iv.start + iv.len).then(|| iv.target + (query - iv.start))
    }

    /// Mapped query positions, ascending.
    pub fn query_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.intervals.iter().flat_map(|iv| iv.start..iv.start + iv.len)
    }

    pub fn len(&self) -> usize {
        self.intervals.iter().map(|iv| iv.len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let map = IntervalMap::from_segments(&[
            SegmentPair { query: 6..9, target: 30..33 },
            SegmentPair { query: 0..5, target: 10..15 },
        ]);
        assert_eq!(map.len(), 8);
        let mapped: Vec<Option<usize>> = (0..10).map(|q| map.get(q)).collect();
        assert_eq!(
            mapped,
            vec![
                Some(10),
                Some(11),
                Some(12),
                Some(13),
                Some(14),
                None,
                Some(30),
                Some(31),
                Some(32),
                None
            ]
        );
        assert_eq!(map.query_positions().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4, 6, 7, 8]);
    }

    #[test]
    fn test_rejects_overlap() {
        let mut map = IntervalMap::new();
        assert!(map.insert(&SegmentPair { query: 2..6, target: 0..4 }));
        assert!(!map.insert(&SegmentPair { query: 5..8, target: 10..13 }));
        assert!(!map.insert(&SegmentPair { query: 0..3, target: 10..13 }));
        assert!(!map.insert(&SegmentPair { query: 7..7, target: 10..10 }));
        assert!(map.insert(&SegmentPair { query: 6..8, target: 10..12 }));
        assert_eq!(map.get(5), Some(3));
        assert_eq!(map.get(6), Some(10));
        assert_eq!(map.get(1), None);
    }
}
