//! Splitting a request into disjoint tasks.

use crate::error::Result;

use super::{SearchRequest, TaskDescriptor};

/// Splits `request` into tasks that together cover its candidate space
/// exactly once.
///
/// The first free position is fanned out over the alphabet, whether or not
/// a prefix was given. If that yields fewer tasks than `request.cores`, the
/// next position is fanned out too, and so on until there are enough tasks
/// or no free positions remain. Tasks come back in lexicographic order, so
/// concatenating their results in order reproduces a sequential scan.
///
/// A request with no free positions becomes a single task that checks the
/// prefix itself.
pub fn partition(request: &SearchRequest) -> Result<Vec<TaskDescriptor>> {
    request.validate()?;

    let root = request.root_task();
    if root.remaining == 0 {
        return Ok(vec![root]);
    }

    let mut tasks = root.split();
    // a single-character alphabet never adds tasks by splitting deeper
    let fans_out = request.alphabet.len() > 1;
    // every task at one level has the same number of free positions
    while fans_out
        && tasks.len() < request.cores
        && tasks.first().is_some_and(|t| t.remaining > 0)
    {
        tasks = tasks.iter().flat_map(TaskDescriptor::split).collect();
    }

    tracing::debug!(
        tasks = tasks.len(),
        remaining = tasks.first().map_or(0, |t| t.remaining),
        "partitioned search"
    );
    Ok(tasks)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::hashing::DigestSet;
    use crate::search::{Alphabet, Candidates};

    fn expand(tasks: &[TaskDescriptor]) -> Vec<String> {
        tasks
            .iter()
            .flat_map(|t| {
                t.candidates()
                    .unwrap()
                    .map(|s| format!("{}{}", t.prefix, s))
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    fn request(length: usize, alphabet: &str, prefix: &str, cores: usize) -> SearchRequest {
        SearchRequest::new(DigestSet::new(), length, Alphabet::new(alphabet))
            .with_prefix(prefix)
            .with_cores(cores)
    }

    #[test]
    fn test_one_task_per_leading_char() {
        let tasks = partition(&request(3, "abc", "", 1)).unwrap();
        let prefixes: Vec<_> = tasks.iter().map(|t| t.prefix.as_str()).collect();
        assert_eq!(prefixes, vec!["a", "b", "c"]);
        assert!(tasks.iter().all(|t| t.remaining == 2));
    }

    #[test]
    fn test_prefix_fans_out_next_position() {
        let tasks = partition(&request(3, "yz", "x", 1)).unwrap();
        let prefixes: Vec<_> = tasks.iter().map(|t| t.prefix.as_str()).collect();
        assert_eq!(prefixes, vec!["xy", "xz"]);
        let all = expand(&tasks);
        assert_eq!(all, vec!["xyy", "xyz", "xzy", "xzz"]);
    }

    #[test]
    fn test_deepens_for_more_cores() {
        let tasks = partition(&request(4, "ab", "", 3)).unwrap();
        assert_eq!(tasks.len(), 4);
        assert!(tasks.iter().all(|t| t.remaining == 2));
    }

    #[test]
    fn test_stops_when_positions_run_out() {
        let tasks = partition(&request(2, "ab", "", 64)).unwrap();
        assert_eq!(tasks.len(), 4);
        assert!(tasks.iter().all(|t| t.remaining == 0));
    }

    #[test]
    fn test_single_char_alphabet_splits_once() {
        let tasks = partition(&request(50_000, "a", "", 8)).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].prefix, "a");
        assert_eq!(tasks[0].remaining, 49_999);
    }

    #[test]
    fn test_prefix_fills_length() {
        let tasks = partition(&request(2, "ab", "zz", 4)).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(expand(&tasks), vec!["zz"]);
    }

    #[test]
    fn test_coverage_is_exact_and_ordered() {
        for cores in [1, 2, 5, 40] {
            for (length, prefix) in [(3, ""), (4, "q"), (1, ""), (0, "")] {
                let req = request(length, "abc", prefix, cores);
                let tasks = partition(&req).unwrap();
                let covered = expand(&tasks);
                let sequential: Vec<String> = Candidates::new(req.remaining(), &req.alphabet)
                    .unwrap()
                    .map(|s| format!("{}{}", prefix, s))
                    .collect();
                assert_eq!(covered, sequential, "cores={} length={}", cores, length);
                let unique: HashSet<_> = covered.iter().collect();
                assert_eq!(unique.len(), covered.len());
            }
        }
    }

    #[test]
    fn test_invalid_request_dispatches_nothing() {
        assert!(partition(&request(1, "", "", 1)).is_err());
        assert!(partition(&request(2, "ab", "", 0)).is_err());
    }
}
