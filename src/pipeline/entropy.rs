//! Shannon entropy over outcome-count distributions

/// Calculate the entropy (in nats) of a count distribution whose total is
/// already known: `-sum(p * ln(p))` over all positive counts.
///
/// Counts of zero contribute nothing. `total` must be positive; the
/// pipeline never computes the entropy of an empty partition.
pub fn entropy<'a, I>(counts: I, total: usize) -> f64
where
    I: IntoIterator<Item = &'a usize>,
{
    debug_assert!(total > 0, "entropy of an empty distribution");
    let total = total as f64;
    let mut entropy = 0.0;
    for &count in counts {
        if count > 0 {
            let proportion = count as f64 / total;
            entropy -= proportion * proportion.ln();
        }
    }
    entropy
}
