//! Element id allocation for controlled nodes.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static NON_ID_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_-]+").expect("static id pattern"));

/// Hands out document-unique ids derived from node keys.
///
/// Keys are sanitised (ids end up space-joined in `aria-controls`), prefixed
/// unless they already start with `namespace`, and suffixed `-2`, `-3`, ...
/// when the result is taken.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    prefix: String,
    namespace: String,
    taken: HashSet<String>,
}

impl IdAllocator {
    pub fn new(
        prefix: &str,
        namespace: &str,
        existing: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            prefix: prefix.to_string(),
            namespace: namespace.to_string(),
            taken: existing.into_iter().collect(),
        }
    }

    pub fn allocate(&mut self, key: &str) -> String {
        let sanitized = NON_ID_CHARS.replace_all(key.trim(), "-");
        let base = if sanitized.starts_with(&self.namespace) {
            sanitized.into_owned()
        } else {
            format!("{}{}", self.prefix, sanitized)
        };

        let mut candidate = base.clone();
        let mut n = 2;
        while self.taken.contains(&candidate) {
            candidate = format!("{}-{}", base, n);
            n += 1;
        }
        self.taken.insert(candidate.clone());
        candidate
    }
}
