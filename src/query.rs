//! Search filter state and its query-string representation.
//!
//! The search screen treats a query string (`query=cs&type=courses&...`) as
//! its location: submitting the form serializes the filters into that
//! string, and a location change is what triggers a fetch. Modeling the
//! mapping as a pure pair of functions keeps the fetch trigger independent
//! of any rendering concern.

use std::fmt;
use std::str::FromStr;

use crate::models::{Course, Student};

/// Which resource kind a search targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Students,
    Courses,
}

impl SearchKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchKind::Students => "students",
            SearchKind::Courses => "courses",
        }
    }

    /// Flip between the two kinds, used by the selector control.
    pub fn toggle(&self) -> Self {
        match self {
            SearchKind::Students => SearchKind::Courses,
            SearchKind::Courses => SearchKind::Students,
        }
    }
}

impl Default for SearchKind {
    fn default() -> Self {
        SearchKind::Students
    }
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SearchKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "students" => Ok(SearchKind::Students),
            "courses" => Ok(SearchKind::Courses),
            _ => Err(format!("invalid search kind: {s}")),
        }
    }
}

/// The full filter state of the search screen. The refinement fields stay
/// stored even while the `Courses` kind hides them, so switching back does
/// not lose input. All fields are kept as entered text; parsing happens
/// server-side or not at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters {
    pub query: String,
    pub kind: SearchKind,
    pub min_age: String,
    pub grade: String,
}

impl SearchFilters {
    /// Serialize into the canonical query-string form. `query` and `type`
    /// are always present; `minAge` and `grade` only when non-empty.
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<(&str, &str)> = vec![
            ("query", self.query.as_str()),
            ("type", self.kind.as_str()),
        ];
        if !self.min_age.is_empty() {
            pairs.push(("minAge", &self.min_age));
        }
        if !self.grade.is_empty() {
            pairs.push(("grade", &self.grade));
        }
        pairs
            .into_iter()
            .map(|(key, value)| format!("{key}={}", encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Parse a query string back into filter state. Unknown keys are
    /// ignored; missing keys fall back to defaults, including an invalid
    /// `type` value.
    pub fn from_query_string(raw: &str) -> Self {
        let mut filters = SearchFilters::default();
        for pair in raw.trim_start_matches('?').split('&') {
            let (key, value) = match pair.split_once('=') {
                Some((key, value)) => (key, decode(value)),
                None => continue,
            };
            match key {
                "query" => filters.query = value,
                "type" => {
                    if let Ok(kind) = value.parse() {
                        filters.kind = kind;
                    }
                }
                "minAge" => filters.min_age = value,
                "grade" => filters.grade = value,
                _ => {}
            }
        }
        filters
    }

    /// The server-side refinement parameters for this search. Only student
    /// searches understand refinements; course searches take none.
    pub fn refinements(&self) -> (Option<&str>, Option<&str>) {
        if self.kind != SearchKind::Students {
            return (None, None);
        }
        let min_age = (!self.min_age.is_empty()).then_some(self.min_age.as_str());
        let grade = (!self.grade.is_empty()).then_some(self.grade.as_str());
        (min_age, grade)
    }

    /// Case-insensitive substring match against name or email.
    pub fn matches_student(&self, student: &Student) -> bool {
        let needle = self.query.to_lowercase();
        student.name.to_lowercase().contains(&needle)
            || student.email.to_lowercase().contains(&needle)
    }

    /// Case-insensitive substring match against title or code.
    pub fn matches_course(&self, course: &Course) -> bool {
        let needle = self.query.to_lowercase();
        course.title.to_lowercase().contains(&needle)
            || course.code.to_lowercase().contains(&needle)
    }
}

/// Percent-encode everything outside the unreserved set.
fn encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Inverse of [`encode`]. Also accepts `+` for a space and passes malformed
/// escapes through untouched rather than failing.
fn decode(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' => {
                match (hex_value(bytes.get(i + 1)), hex_value(bytes.get(i + 2))) {
                    (Some(hi), Some(lo)) => {
                        out.push(hi * 16 + lo);
                        i += 3;
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            byte => {
                out.push(byte);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(byte: Option<&u8>) -> Option<u8> {
    match byte? {
        b @ b'0'..=b'9' => Some(b - b'0'),
        b @ b'a'..=b'f' => Some(b - b'a' + 10),
        b @ b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
