//! Record predicates applied before grouping.

use std::collections::BTreeSet;

use serde::Serialize;

use sales_core::error::{Result, SalesError};
use sales_core::models::SalesRecord;

/// Inclusive range of release years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearRange {
    pub from: u16,
    pub to: u16,
}

impl YearRange {
    /// Years `from..=to`. Both ends are included.
    pub fn between(from: u16, to: u16) -> Result<Self> {
        if from > to {
            return Err(SalesError::Config(format!(
                "year range starts after it ends ({from} > {to})"
            )));
        }
        Ok(Self { from, to })
    }

    pub fn contains(&self, year: u16) -> bool {
        (self.from..=self.to).contains(&year)
    }

    /// Records with an unknown year never fall inside a window.
    pub fn matches(&self, record: &SalesRecord) -> bool {
        record.has_known_year() && self.contains(record.year_of_release)
    }

    /// Every year in the range, ascending.
    pub fn years(&self) -> impl Iterator<Item = u16> {
        self.from..=self.to
    }
}

impl std::fmt::Display for YearRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.from, self.to)
    }
}

/// Set of platform codes; membership is exact and case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlatformSet(BTreeSet<String>);

impl PlatformSet {
    pub fn contains(&self, platform: &str) -> bool {
        self.0.contains(platform)
    }

    pub fn matches(&self, record: &SalesRecord) -> bool {
        self.contains(&record.platform)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for PlatformSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        PlatformSet(iter.into_iter().map(Into::into).collect())
    }
}
