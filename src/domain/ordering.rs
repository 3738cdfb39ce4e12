//! Deterministic ordering of course entries.
//!
//! All comparisons are byte-wise on the UTF-8 strings: case-sensitive and
//! independent of locale. Both entry comparators fall back to `key` so that
//! equal labels still have a total order.

use std::cmp::Ordering;

use crate::domain::entities::{Classification, CourseEntry};

/// Descending by `term`, then descending by `text`.
pub fn compare_by_term_then_text(a: &CourseEntry, b: &CourseEntry) -> Ordering {
    b.term
        .cmp(&a.term)
        .then_with(|| b.text.cmp(&a.text))
        .then_with(|| b.key.cmp(&a.key))
}

/// Descending by `text` only; the ongoing group has no terms.
pub fn compare_by_text(a: &CourseEntry, b: &CourseEntry) -> Ordering {
    b.text.cmp(&a.text).then_with(|| b.key.cmp(&a.key))
}

/// Sort entries with the comparator their group uses.
pub fn sort_for_group(entries: &mut [CourseEntry], group: Classification) {
    match group {
        Classification::Ongoing => entries.sort_by(compare_by_text),
        Classification::Current | Classification::Past => {
            entries.sort_by(compare_by_term_then_text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, text: &str, term: &str) -> CourseEntry {
        CourseEntry::new(key, text, term)
    }

    #[test]
    fn given_mixed_terms_when_sorted_then_descending_by_term_then_text() {
        let mut entries = vec![
            entry("a", "Algebra", "Fall 2023"),
            entry("b", "Biology", "Spring 2024"),
            entry("c", "Chemistry", "Fall 2023"),
            entry("d", "Drawing", "Spring 2024"),
        ];
        sort_for_group(&mut entries, Classification::Current);

        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["d", "b", "c", "a"]);
    }

    #[test]
    fn given_case_differences_when_compared_then_bytewise() {
        // 'a' (0x61) sorts after 'Z' (0x5a)
        let lower = entry("1", "algebra", "T");
        let upper = entry("2", "Zoology", "T");
        assert_eq!(compare_by_text(&lower, &upper), Ordering::Less);
    }

    #[test]
    fn given_equal_labels_when_compared_then_key_breaks_tie() {
        let a = entry("a", "Same", "T");
        let b = entry("b", "Same", "T");
        assert_eq!(compare_by_term_then_text(&a, &b), Ordering::Greater);
        assert_eq!(compare_by_text(&a, &b), Ordering::Greater);
    }

    #[test]
    fn given_ongoing_group_when_sorted_then_term_is_ignored() {
        let mut entries = vec![
            entry("a", "Alpha", "Z-term"),
            entry("b", "Beta", "A-term"),
        ];
        sort_for_group(&mut entries, Classification::Ongoing);
        assert_eq!(entries[0].key, "b");
    }
}
