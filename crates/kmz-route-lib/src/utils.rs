//! Natural ordering of route names

use std::cmp::Ordering;

/// One run of a name split for natural ordering
#[derive(Debug, Clone, PartialEq, Eq)]
enum Chunk<'a> {
    /// Lowercased non-digit run (may be empty)
    Text(String),
    /// Digit run with leading zeros stripped
    Number(&'a str),
}

/// Split a name into alternating text and digit runs, starting and ending with text
///
/// `"route10"` becomes `["route", 10, ""]` and `"2x"` becomes `["", 2, "x"]`, so runs at the
/// same position always have the same kind.
fn natural_chunks(name: &str) -> Vec<Chunk<'_>> {
    let mut chunks = Vec::new();
    let mut rest = name;
    loop {
        let text_end = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
        chunks.push(Chunk::Text(rest[..text_end].to_lowercase()));
        rest = &rest[text_end..];
        if rest.is_empty() {
            break;
        }

        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let digits = rest[..digits_end].trim_start_matches('0');
        chunks.push(Chunk::Number(digits));
        rest = &rest[digits_end..];
    }
    chunks
}

#[inline]
fn compare_chunks(a: &Chunk<'_>, b: &Chunk<'_>) -> Ordering {
    match (a, b) {
        (Chunk::Text(a), Chunk::Text(b)) => a.cmp(b),
        // Integer comparison of arbitrary length: fewer significant digits is smaller
        (Chunk::Number(a), Chunk::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
        (Chunk::Text(_), Chunk::Number(_)) => Ordering::Less,
        (Chunk::Number(_), Chunk::Text(_)) => Ordering::Greater,
    }
}

/// Natural-order comparison of two names
///
/// Digit runs compare by integer value, text runs case-insensitively, and a name whose runs
/// are a prefix of another's sorts first. `"route2"` sorts before `"route10"`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let a = natural_chunks(a);
    let b = natural_chunks(b);
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| compare_chunks(x, y))
        .find(|ordering| ordering.is_ne())
        .unwrap_or_else(|| a.len().cmp(&b.len()))
}

/// Sort names in place using [`natural_cmp`]
///
/// The sort is stable: names comparing equal keep their relative order.
pub fn natural_sort<S: AsRef<str>>(names: &mut [S]) {
    names.sort_by(|a, b| natural_cmp(a.as_ref(), b.as_ref()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_sort_routes() {
        let mut names = vec!["route2", "route10", "route1"];
        natural_sort(&mut names);
        assert_eq!(names, vec!["route1", "route2", "route10"]);
    }

    #[test]
    fn test_text_runs_ignore_case() {
        assert_eq!(natural_cmp("Route1", "route1"), Ordering::Equal);
        assert_eq!(natural_cmp("alpha", "Beta"), Ordering::Less);
    }

    #[test]
    fn test_prefix_sorts_first() {
        assert_eq!(natural_cmp("route", "route1"), Ordering::Less);
        assert_eq!(natural_cmp("route1", "route1a"), Ordering::Less);
        assert_eq!(natural_cmp("route1a", "route1"), Ordering::Greater);
    }

    #[test]
    fn test_leading_digits() {
        let mut names = vec!["b", "10a", "2a", "a"];
        natural_sort(&mut names);
        assert_eq!(names, vec!["2a", "10a", "a", "b"]);
    }

    #[test]
    fn test_leading_zeros_and_long_numbers() {
        assert_eq!(natural_cmp("track007", "track7"), Ordering::Equal);
        assert_eq!(natural_cmp("track0", "track00"), Ordering::Equal);
        assert_eq!(
            natural_cmp("n99999999999999999999999", "n100000000000000000000000"),
            Ordering::Less
        );
    }

    #[test]
    fn test_multiple_numeric_runs() {
        let mut names = vec![
            "2023-10-01 ride",
            "2023-9-30 ride",
            "2023-10-01 hike",
            "2022-12-31 ride",
        ];
        natural_sort(&mut names);
        assert_eq!(
            names,
            vec![
                "2022-12-31 ride",
                "2023-9-30 ride",
                "2023-10-01 hike",
                "2023-10-01 ride",
            ]
        );
    }

    #[test]
    fn test_sort_is_stable_for_equal_names() {
        let mut names = vec!["Walk", "walk", "WALK"];
        natural_sort(&mut names);
        assert_eq!(names, vec!["Walk", "walk", "WALK"]);
    }
}
