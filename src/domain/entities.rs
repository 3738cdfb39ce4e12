//! Domain entities: course entries, term headers and group labels

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::record::DataRecord;

/// Temporal partition a course entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Classification {
    Ongoing,
    Current,
    Past,
}

impl Classification {
    /// Value of the `data-past` attribute carried by nodes of this group.
    pub fn past_attr(self) -> &'static str {
        match self {
            Classification::Past => "true",
            Classification::Ongoing | Classification::Current => "false",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Classification::Ongoing => "ongoing",
            Classification::Current => "current",
            Classification::Past => "past",
        };
        write!(f, "{}", name)
    }
}

/// One course menu item.
///
/// `past` and `hidden` are display flags assigned during placement;
/// they are never read from input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseEntry {
    /// Lookup key, rendered as `data-key`
    pub key: String,
    /// Label, secondary sort key
    pub text: String,
    /// Grouping key
    #[serde(default)]
    pub term: String,
    /// End date in epoch seconds; absent or zero means no end date
    #[serde(default)]
    pub enddate: Option<i64>,
    /// Link target; entries without one render as non-link items
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub indent: u8,
    #[serde(skip)]
    pub past: bool,
    #[serde(skip)]
    pub hidden: bool,
}

impl CourseEntry {
    pub fn new(key: &str, text: &str, term: &str) -> Self {
        Self {
            key: key.to_string(),
            text: text.to_string(),
            term: term.to_string(),
            enddate: None,
            url: None,
            indent: 0,
            past: false,
            hidden: false,
        }
    }

    pub fn with_enddate(mut self, enddate: i64) -> Self {
        self.enddate = Some(enddate);
        self
    }

    pub fn with_url(mut self, url: &str) -> Self {
        self.url = Some(url.to_string());
        self
    }

    /// True when the entry has a real end date strictly before `now`.
    pub fn has_ended(&self, now: i64) -> bool {
        matches!(self.enddate, Some(end) if end != 0 && end < now)
    }

    /// Display flags for placement inside the past group.
    pub fn into_past(mut self) -> Self {
        self.past = true;
        self.hidden = true;
        self.indent = 1;
        self
    }

    /// Display flags for placement inside the ongoing group.
    pub fn into_ongoing(mut self) -> Self {
        self.past = false;
        self.hidden = false;
        self.indent = 0;
        self
    }

    pub fn to_record(&self, parent: &str) -> DataRecord {
        let mut record = DataRecord::new()
            .with("key", self.key.as_str())
            .with("text", self.text.as_str())
            .with("term", self.term.as_str())
            .with("parent", parent)
            .with("header", false)
            .with("past", self.past)
            .with("hidden", u8::from(self.hidden))
            .with("get_indent", self.indent)
            .with("enddate", self.enddate.unwrap_or(0));
        if let Some(url) = &self.url {
            record.set("action", url.as_str());
        }
        record
    }

    fn validate(&self, group: Classification) -> DomainResult<()> {
        if self.key.trim().is_empty() {
            return Err(DomainError::EmptyKey {
                group,
                text: self.text.clone(),
            });
        }
        if group != Classification::Ongoing && self.term.trim().is_empty() {
            return Err(DomainError::MissingTerm {
                group,
                key: self.key.clone(),
            });
        }
        Ok(())
    }
}

/// Synthetic grouping label for one term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermHeader {
    /// Term string, used as label and as `data-key`
    pub text: String,
    pub past: bool,
    pub hidden: bool,
    pub indent: u8,
}

impl TermHeader {
    /// Past headers start hidden, matching their group's collapsed default.
    pub fn new(term: &str, past: bool) -> Self {
        Self {
            text: term.to_string(),
            past,
            hidden: past,
            indent: u8::from(past),
        }
    }

    pub fn to_record(&self, parent: &str) -> DataRecord {
        DataRecord::new()
            .with("key", self.text.as_str())
            .with("text", self.text.as_str())
            .with("parent", parent)
            .with("header", true)
            .with("past", self.past)
            .with("hidden", u8::from(self.hidden))
            .with("get_indent", self.indent)
            .with(&term_flag(&self.text), true)
    }
}

/// Template flag naming a term, e.g. `term_fall_2024`.
pub fn term_flag(term: &str) -> String {
    let slug: String = term
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("term_{}", slug)
}

/// Icon reference resolved by the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Icon {
    pub pix: String,
    pub component: String,
    #[serde(default)]
    pub alt: String,
}

impl Icon {
    fn to_record(&self) -> DataRecord {
        DataRecord::new()
            .with("pix", self.pix.as_str())
            .with("alt", self.alt.as_str())
            .with("component", self.component.as_str())
    }
}

/// Fixed-shape label node heading a whole classification group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupLabel {
    pub key: String,
    pub text: String,
    /// Disclosure nodes are expandable, collapsed by default and force-open
    pub disclosure: bool,
    pub indent: u8,
    pub icon: Option<Icon>,
}

impl GroupLabel {
    /// The "Past courses" disclosure node.
    pub fn past(key: &str, text: &str, icon: Icon) -> Self {
        Self {
            key: key.to_string(),
            text: text.to_string(),
            disclosure: true,
            indent: 1,
            icon: Some(icon),
        }
    }

    /// The flat "Ongoing courses" label.
    pub fn ongoing(key: &str, text: &str) -> Self {
        Self {
            key: key.to_string(),
            text: text.to_string(),
            disclosure: false,
            indent: 0,
            icon: None,
        }
    }

    pub fn to_record(&self, parent: &str) -> DataRecord {
        let flag = u8::from(self.disclosure);
        let mut record = DataRecord::new()
            .with("key", self.key.as_str())
            .with("text", self.text.as_str())
            .with("parent", parent)
            .with("isexpandable", flag)
            .with("collapse", flag)
            .with("forceopen", flag)
            .with("nodetype", flag)
            .with("get_indent", self.indent)
            .with("showdivider", 0u8)
            .with("type", 0u8)
            .with("isactive", 0u8)
            .with("hidden", 0u8)
            .with("preceedwithhr", 0u8);
        if let Some(icon) = &self.icon {
            record.set("icon", vec![icon.to_record()]);
        }
        record
    }
}

/// Everything one `init` call consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuInput {
    pub current: Vec<CourseEntry>,
    pub current_terms: Vec<String>,
    pub past: Vec<CourseEntry>,
    pub past_terms: Vec<String>,
    pub ongoing: Vec<CourseEntry>,
}

impl MenuInput {
    /// Reject entries the engine cannot key or group.
    pub fn validate(&self) -> DomainResult<()> {
        let groups = [
            (Classification::Current, &self.current),
            (Classification::Past, &self.past),
            (Classification::Ongoing, &self.ongoing),
        ];
        for (group, entries) in groups {
            for entry in entries.iter() {
                entry.validate(group)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, false)]
    #[case(Some(0), false)]
    #[case(Some(999), true)]
    #[case(Some(1000), false)]
    #[case(Some(5000), false)]
    fn given_enddate_when_checking_has_ended_then_only_strictly_earlier_counts(
        #[case] enddate: Option<i64>,
        #[case] expected: bool,
    ) {
        let mut entry = CourseEntry::new("c1", "Algebra", "Fall 2024");
        entry.enddate = enddate;
        assert_eq!(entry.has_ended(1000), expected);
    }

    #[test]
    fn given_past_header_when_built_then_hidden_and_flagged() {
        let header = TermHeader::new("Fall 2024", true);
        let record = header.to_record("mycourses");

        assert!(header.hidden);
        assert_eq!(record.flag("past"), Some(true));
        assert_eq!(record.flag("hidden"), Some(true));
        assert_eq!(record.flag("header"), Some(true));
        assert_eq!(record.flag("term_fall_2024"), Some(true));
        assert_eq!(record.key(), "Fall 2024");
    }

    #[test]
    fn given_past_label_when_built_then_record_is_collapsed_disclosure() {
        let icon = Icon {
            pix: "i/moremenu".into(),
            component: "moodle".into(),
            alt: String::new(),
        };
        let record = GroupLabel::past("mycoursespast", "Past courses", icon).to_record("mycourses");

        assert_eq!(record.flag("isexpandable"), Some(true));
        assert_eq!(record.flag("collapse"), Some(true));
        assert_eq!(record.flag("forceopen"), Some(true));
        assert_eq!(record.int("get_indent"), Some(1));
        assert_eq!(record.list("icon")[0].text("pix"), Some("i/moremenu"));
        assert!(!record.contains("past"));
    }

    #[test]
    fn given_entry_without_key_when_validating_then_rejected() {
        let input = MenuInput {
            ongoing: vec![CourseEntry::new(" ", "Lab", "")],
            ..MenuInput::default()
        };
        assert!(matches!(
            input.validate(),
            Err(DomainError::EmptyKey {
                group: Classification::Ongoing,
                ..
            })
        ));
    }

    #[test]
    fn given_current_entry_without_term_when_validating_then_rejected() {
        let input = MenuInput {
            current: vec![CourseEntry::new("c1", "Lab", "")],
            ..MenuInput::default()
        };
        assert!(matches!(
            input.validate(),
            Err(DomainError::MissingTerm { .. })
        ));
    }
}
