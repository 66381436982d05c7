use std::collections::HashSet;
use std::hash::Hash;

/// Jaccard similarity |A ∩ B| / |A ∪ B| of two sets
///
/// Two empty sets have similarity 0.
#[inline]
pub fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;

    if union == 0 {
        return 0.0;
    }

    intersection as f64 / union as f64
}

/// Jaccard similarity of two tag lists, ignoring order and duplicates
pub fn tag_jaccard(a: &[String], b: &[String]) -> f64 {
    jaccard(&as_set(a), &as_set(b))
}

/// Borrowed set view over a tag list
pub fn as_set(tags: &[String]) -> HashSet<&str> {
    tags.iter().map(String::as_str).collect()
}

/// Cosine similarity of two equal-length vectors
///
/// Returns 0 when either vector has zero norm.
#[inline]
pub fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|y| y * y).sum::<f64>().sqrt();

    let denominator = norm_a * norm_b;
    if denominator <= 0.0 {
        return 0.0;
    }

    dot / denominator
}

/// Entries of `a` also present in `b`, in `a`'s order, without repeats
pub fn shared_in_order<'a>(a: &'a [String], b: &[String]) -> Vec<&'a str> {
    let other = as_set(b);
    let mut seen = HashSet::new();

    a.iter()
        .map(String::as_str)
        .filter(|tag| other.contains(tag) && seen.insert(*tag))
        .collect()
}
