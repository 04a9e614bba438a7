pub(crate) mod fuzzy;
pub mod time;

pub use time::*;

use rayon::prelude::*;
use std::cmp::Ordering;

pub trait Identifiable {
    fn name(&self) -> &str;
    fn normalized_name(&self) -> &str;
}

/// Lowercased, whitespace collapsed form of a name used for searching.
pub fn normalize(name: &str) -> String {
    name.split_whitespace()
        .map(|token| token.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Generic fuzzy search function built for multithreaded searching.
/// Results are ordered best match first, ties keep haystack order.
pub fn search<'a, T>(needle: &str, haystack: &[&'a T]) -> Vec<&'a T>
where
    T: Sync + Identifiable,
{
    let normalized_needle = normalize(needle);
    let mut results: Vec<(usize, &'a T, f64)> = haystack
        .par_iter()
        .enumerate()
        .filter_map(|(i, hay)| {
            let score = fuzzy::score(&normalized_needle, hay.normalized_name());
            if score > 0.5 { Some((i, *hay, score)) } else { None }
        })
        .collect();

    results.par_sort_unstable_by(|(ia, _, a), (ib, _, b)| {
        b.partial_cmp(a).unwrap_or(Ordering::Equal).then(ia.cmp(ib))
    });
    results.into_iter().map(|(_, entity, _)| entity).collect()
}
