//! End-date partition of current entries.

use tracing::debug;

use crate::domain::entities::CourseEntry;

/// Entries and terms after routing ended courses into the past group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub current: Vec<CourseEntry>,
    pub past: Vec<CourseEntry>,
    pub past_terms: Vec<String>,
}

/// Move every current entry that has ended before `now` into the past set.
///
/// Runs once per `init`; nothing is re-evaluated later. A moved entry whose
/// term is missing from `past_terms` gets its term appended, so it still
/// finds a header.
pub fn partition_by_enddate(
    current: Vec<CourseEntry>,
    mut past: Vec<CourseEntry>,
    mut past_terms: Vec<String>,
    now: i64,
) -> Partition {
    let (ended, current): (Vec<CourseEntry>, Vec<CourseEntry>) =
        current.into_iter().partition(|entry| entry.has_ended(now));

    for entry in ended {
        debug!(key = %entry.key, enddate = ?entry.enddate, "routing ended course to past");
        if !past_terms.iter().any(|t| *t == entry.term) {
            past_terms.push(entry.term.clone());
        }
        past.push(entry);
    }

    Partition {
        current,
        past,
        past_terms,
    }
}
