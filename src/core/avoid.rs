//! Avoid-list normalization
//!
//! Turns the free-text "streets to avoid" box (one street per line) into the
//! list that is sent to the routing backend.

use std::ops::Deref;

use serde::Serialize;

/// Ordered list of street names the route must not traverse.
///
/// No element is empty or whitespace-only. Order follows the source text and
/// duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AvoidList(Vec<String>);

impl AvoidList {
    /// Number of streets in the list
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Re-render the list as avoid-box text, one street per line.
    pub fn to_text(&self) -> String {
        self.0.join("\n")
    }
}

impl Deref for AvoidList {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a AvoidList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Normalize raw avoid-box text into an [`AvoidList`].
///
/// Splits on line boundaries, trims each line and drops the ones that end up
/// empty. A byte-order mark counts as whitespace when trimming. No dedup, no
/// case folding, no street-name validation.
pub fn normalize(text: &str) -> AvoidList {
    AvoidList(
        text.lines()
            .map(trim_line)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

fn trim_line(line: &str) -> &str {
    line.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
}
