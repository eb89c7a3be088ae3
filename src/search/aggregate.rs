//! Merging per-task results into one sequence.

/// Concatenates per-task result sequences in the order given.
///
/// Nothing is deduplicated or reordered.
pub fn aggregate<I>(per_task: I) -> Vec<String>
where
    I: IntoIterator<Item = Vec<String>>,
{
    per_task.into_iter().flatten().collect()
}

/// Collects results that arrive in completion order and releases them in
/// dispatch order.
#[derive(Debug)]
pub struct Aggregator {
    slots: Vec<Option<Vec<String>>>,
    filled: usize,
}

impl Aggregator {
    /// Creates an aggregator for `tasks` dispatched tasks.
    pub fn new(tasks: usize) -> Self {
        Self {
            slots: vec![None; tasks],
            filled: 0,
        }
    }

    /// Records the results of the task dispatched at `index`.
    ///
    /// A repeated or out-of-range index is ignored.
    pub fn insert(&mut self, index: usize, results: Vec<String>) {
        if let Some(slot) = self.slots.get_mut(index) {
            if slot.is_none() {
                *slot = Some(results);
                self.filled += 1;
            }
        }
    }

    /// Number of tasks still outstanding.
    pub fn outstanding(&self) -> usize {
        self.slots.len() - self.filled
    }

    pub fn is_complete(&self) -> bool {
        self.outstanding() == 0
    }

    /// Dispatch index of the earliest task that has not reported.
    pub fn first_outstanding(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    /// Total matches recorded so far.
    pub fn matches(&self) -> usize {
        self.slots.iter().flatten().map(Vec::len).sum()
    }

    /// Flattens every slot in dispatch order, or returns `None` if some task
    /// has not reported.
    pub fn finish(self) -> Option<Vec<String>> {
        if !self.is_complete() {
            return None;
        }
        Some(aggregate(self.slots.into_iter().flatten()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_aggregate_concatenates() {
        let merged = aggregate(vec![strings(&["a", "b"]), vec![], strings(&["c"])]);
        assert_eq!(merged, strings(&["a", "b", "c"]));
    }

    #[test]
    fn test_aggregate_empty() {
        assert!(aggregate(Vec::<Vec<String>>::new()).is_empty());
    }

    #[test]
    fn test_dispatch_order_not_completion_order() {
        let mut agg = Aggregator::new(3);
        agg.insert(2, strings(&["z"]));
        agg.insert(0, strings(&["a", "b"]));
        assert_eq!(agg.outstanding(), 1);
        assert_eq!(agg.first_outstanding(), Some(1));
        assert_eq!(agg.matches(), 3);
        agg.insert(1, vec![]);
        assert!(agg.is_complete());
        assert_eq!(agg.finish(), Some(strings(&["a", "b", "z"])));
    }

    #[test]
    fn test_no_dedup() {
        let mut agg = Aggregator::new(2);
        agg.insert(0, strings(&["a"]));
        agg.insert(1, strings(&["a"]));
        assert_eq!(agg.finish(), Some(strings(&["a", "a"])));
    }

    #[test]
    fn test_incomplete_and_repeated_insert() {
        let mut agg = Aggregator::new(2);
        agg.insert(0, strings(&["a"]));
        agg.insert(0, strings(&["b"]));
        agg.insert(9, strings(&["c"]));
        assert_eq!(agg.outstanding(), 1);
        assert_eq!(agg.finish(), None);
    }
}
