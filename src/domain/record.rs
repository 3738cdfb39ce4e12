//! Render input records and render output markup.
//!
//! A [`DataRecord`] is the flat key/value mapping handed to the template
//! renderer. [`Markup`] is what comes back; the engine passes it to the
//! document untouched.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Write as _};

/// A primitive or nested value inside a [`DataRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataValue {
    Bool(bool),
    Int(i64),
    Text(String),
    List(Vec<DataRecord>),
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        DataValue::Bool(value)
    }
}

impl From<i64> for DataValue {
    fn from(value: i64) -> Self {
        DataValue::Int(value)
    }
}

impl From<u8> for DataValue {
    fn from(value: u8) -> Self {
        DataValue::Int(i64::from(value))
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::Text(value.to_string())
    }
}

impl From<String> for DataValue {
    fn from(value: String) -> Self {
        DataValue::Text(value)
    }
}

impl From<Vec<DataRecord>> for DataValue {
    fn from(value: Vec<DataRecord>) -> Self {
        DataValue::List(value)
    }
}

/// Template input: string keys to primitives or lists of records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataRecord {
    fields: BTreeMap<String, DataValue>,
}

impl DataRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: &str, value: impl Into<DataValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<DataValue>) {
        self.fields.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&DataValue> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(DataValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn int(&self, key: &str) -> Option<i64> {
        match self.fields.get(key) {
            Some(DataValue::Int(i)) => Some(*i),
            Some(DataValue::Bool(b)) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// Truthiness as a template sees it: `Bool`, or `Int` != 0.
    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.fields.get(key) {
            Some(DataValue::Bool(b)) => Some(*b),
            Some(DataValue::Int(i)) => Some(*i != 0),
            _ => None,
        }
    }

    pub fn list(&self, key: &str) -> &[DataRecord] {
        match self.fields.get(key) {
            Some(DataValue::List(items)) => items.as_slice(),
            _ => &[],
        }
    }

    /// The record's lookup key, empty when absent.
    pub fn key(&self) -> &str {
        self.text("key").unwrap_or_default()
    }
}

/// Element tree produced by a renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    pub classes: BTreeSet<String>,
    pub text: Option<String>,
    pub children: Vec<Markup>,
}

impl Markup {
    pub fn element(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(name.to_string(), value.into());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.insert(class.to_string());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_child(mut self, child: Markup) -> Self {
        self.children.push(child);
        self
    }
}

/// HTML-escaped view of text or an attribute value.
struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                c => f.write_char(c)?,
            }
        }
        Ok(())
    }
}

/// HTML serialization. Text and attribute values are escaped.
impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag)?;
        if !self.classes.is_empty() {
            let classes: Vec<&str> = self.classes.iter().map(String::as_str).collect();
            write!(f, " class=\"{}\"", Escaped(&classes.join(" ")))?;
        }
        for (name, value) in &self.attrs {
            write!(f, " {}=\"{}\"", name, Escaped(value))?;
        }
        f.write_str(">")?;
        if let Some(text) = &self.text {
            write!(f, "{}", Escaped(text))?;
        }
        for child in &self.children {
            write!(f, "{}", child)?;
        }
        write!(f, "</{}>", self.tag)
    }
}
