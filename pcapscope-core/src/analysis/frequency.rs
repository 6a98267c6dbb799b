//! Top-N frequency counting.

use std::collections::HashMap;
use std::hash::Hash;

/// Default number of entries in a top-N report.
pub const DEFAULT_TOP_N: usize = 10;

/// `(key, count)` pairs, most frequent first.
pub type Frequencies<K> = Vec<(K, usize)>;

/// Count keys and keep the `n` most frequent.
///
/// Ties keep the order in which keys were first encountered.
pub fn top_n<K, I>(keys: I, n: usize) -> Frequencies<K>
where
    K: Eq + Hash + Clone,
    I: IntoIterator<Item = K>,
{
    let mut counts: HashMap<K, (usize, usize)> = HashMap::new();
    for (position, key) in keys.into_iter().enumerate() {
        counts.entry(key).or_insert((position, 0)).1 += 1;
    }

    let mut ranked: Vec<_> = counts.into_iter().collect();
    ranked.sort_by(|(_, (first_a, count_a)), (_, (first_b, count_b))| {
        count_b.cmp(count_a).then(first_a.cmp(first_b))
    });

    ranked
        .into_iter()
        .take(n)
        .map(|(key, (_, count))| (key, count))
        .collect()
}
