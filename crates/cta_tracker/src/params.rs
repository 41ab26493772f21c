//! Query parameter building blocks
//!
//! [`QueryParams`] is the ordered name/value list sent with a request.
//! [`IdList`] models the comma-delimited identifier lists the CTA endpoints
//! accept (`stpid=1001,1002`), built from either a delimited string or a list.

use std::fmt;
use std::str::FromStr;

use crate::error::TrackerError;

/// Largest number of identifiers the Bus Tracker accepts in one list parameter
pub const MAX_IDS: usize = 10;

/// Ordered query parameters for a single request
///
/// Parameter names are the upstream names verbatim. Values are stored as
/// given; nothing is trimmed or re-encoded until the HTTP layer URL-encodes
/// them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create an empty parameter list
    #[must_use]
    pub const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a parameter
    pub fn push(&mut self, name: &'static str, value: impl Into<String>) {
        self.pairs.push((name, value.into()));
    }

    /// Append a parameter only when a value is present
    pub fn push_opt<V: Into<String>>(&mut self, name: &'static str, value: Option<V>) {
        if let Some(value) = value {
            self.push(name, value);
        }
    }

    /// Append an identifier list as a single comma-joined parameter
    pub fn push_ids(&mut self, name: &'static str, ids: &IdList) {
        self.push(name, ids.to_query());
    }

    /// Look up the first value for a parameter name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Whether a parameter is present
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Number of parameters
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether no parameters are set
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate over `(name, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.pairs.iter().map(|(key, value)| (*key, value.as_str()))
    }

    /// Parameter names in insertion order
    pub fn names(&self) -> Vec<&'static str> {
        self.pairs.iter().map(|(key, _)| *key).collect()
    }

    /// Borrow the pairs in a form reqwest can serialize into a query string
    pub fn as_slice(&self) -> &[(&'static str, String)] {
        &self.pairs
    }
}

impl Extend<(&'static str, String)> for QueryParams {
    fn extend<I: IntoIterator<Item = (&'static str, String)>>(&mut self, iter: I) {
        self.pairs.extend(iter);
    }
}

impl IntoIterator for QueryParams {
    type Item = (&'static str, String);
    type IntoIter = std::vec::IntoIter<(&'static str, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

/// A list of identifiers (stop ids, route ids, vehicle ids, ...)
///
/// # Examples
///
/// ```
/// use cta_tracker::IdList;
///
/// let from_str = IdList::from("1001,1002");
/// let from_list = IdList::from(vec!["1001", "1002"]);
/// assert_eq!(from_str, from_list);
/// assert_eq!(from_list.to_query(), "1001,1002");
/// assert_eq!(from_list.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdList(Vec<String>);

impl IdList {
    /// Number of identifiers
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list holds no identifiers
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the identifiers
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// The comma-joined form sent on the wire
    pub fn to_query(&self) -> String {
        self.0.join(",")
    }

    /// Check the list is non-empty, has no blank entries and at most `max` ids
    pub(crate) fn check(&self, name: &str, max: usize) -> Result<(), TrackerError> {
        if self.is_empty() || self.iter().any(|id| id.trim().is_empty()) {
            return Err(TrackerError::invalid(format!(
                "{name} must not contain empty identifiers"
            )));
        }
        if self.len() > max {
            return Err(TrackerError::invalid(if max == 1 {
                format!("only one {name} may be given")
            } else {
                format!("at most {max} {name} identifiers may be given, got {}", self.len())
            }));
        }
        Ok(())
    }

    fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            parts
                .into_iter()
                .flat_map(|part| {
                    part.as_ref()
                        .split(',')
                        .map(str::to_string)
                        .collect::<Vec<_>>()
                })
                .collect(),
        )
    }
}

impl fmt::Display for IdList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query())
    }
}

impl From<&str> for IdList {
    fn from(value: &str) -> Self {
        Self::from_parts([value])
    }
}

impl From<String> for IdList {
    fn from(value: String) -> Self {
        Self::from_parts([value])
    }
}

impl From<&String> for IdList {
    fn from(value: &String) -> Self {
        Self::from_parts([value])
    }
}

impl From<Vec<String>> for IdList {
    fn from(value: Vec<String>) -> Self {
        Self::from_parts(value)
    }
}

impl From<Vec<&str>> for IdList {
    fn from(value: Vec<&str>) -> Self {
        Self::from_parts(value)
    }
}

impl From<&[&str]> for IdList {
    fn from(value: &[&str]) -> Self {
        Self::from_parts(value)
    }
}

impl<const N: usize> From<[&str; N]> for IdList {
    fn from(value: [&str; N]) -> Self {
        Self::from_parts(value)
    }
}

impl<S: AsRef<str>> FromIterator<S> for IdList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_parts(iter)
    }
}

/// Time resolution of timestamps in bus responses (`tmres`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TimeResolution {
    /// `YYYYMMDD HH:MM:SS`
    #[default]
    Seconds,
    /// `YYYYMMDD HH:MM`
    Minutes,
}

impl TimeResolution {
    /// Wire value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Seconds => "s",
            Self::Minutes => "m",
        }
    }
}

impl fmt::Display for TimeResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeResolution {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "s" => Ok(Self::Seconds),
            "m" => Ok(Self::Minutes),
            other => Err(TrackerError::invalid(format!(
                "tmres must be 's' or 'm', got {other:?}"
            ))),
        }
    }
}

/// Wire form of a boolean flag parameter
pub(crate) const fn flag(value: bool) -> Option<&'static str> {
    if value { Some("true") } else { None }
}
