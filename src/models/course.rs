//! Course request and per-course candidate model.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{Category, Section};
use crate::error::ParseError;

fn course_token_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([A-Za-z]+)(\d+)$").expect("course pattern is valid"))
}

/// A course to fetch from the catalog for a given term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CourseRequest {
    /// Subject letters, e.g. `"SENG"`.
    pub subject: String,
    /// Course number, e.g. `"265"`.
    pub code: String,
    /// Catalog term, e.g. `"202309"`.
    pub term: String,
}

impl CourseRequest {
    /// Creates a request from its parts.
    pub fn new(
        subject: impl Into<String>,
        code: impl Into<String>,
        term: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            code: code.into(),
            term: term.into(),
        }
    }

    /// Splits a compact token such as `"SENG265"` into subject and code.
    pub fn parse(token: &str, term: impl Into<String>) -> Result<Self, ParseError> {
        let trimmed = token.trim();
        let caps = course_token_regex()
            .captures(trimmed)
            .ok_or_else(|| ParseError::CourseName(token.to_string()))?;
        Ok(Self::new(
            caps[1].to_ascii_uppercase(),
            &caps[2],
            term,
        ))
    }

    /// Course name used on sections and in logs, e.g. `"SENG265"`.
    pub fn name(&self) -> String {
        format!("{}{}", self.subject, self.code)
    }
}

impl fmt::Display for CourseRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{} ({})", self.subject, self.code, self.term)
    }
}

/// Grouped candidate sections of one course, keyed by category.
///
/// Categories with no sections are simply absent from the selection
/// product: a course without tutorials contributes no tutorial digit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseCandidates {
    /// Course name, e.g. `"SENG265"`.
    pub name: String,
    /// Distinct sections per category, in grouping order.
    pub categories: BTreeMap<Category, Vec<Section>>,
}

impl CourseCandidates {
    /// Creates a course with no sections.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            categories: BTreeMap::new(),
        }
    }

    /// Appends a section under its own category.
    pub fn with_section(mut self, section: Section) -> Self {
        self.categories
            .entry(section.category)
            .or_default()
            .push(section);
        self
    }

    /// Replaces the sections of one category.
    pub fn with_category(mut self, category: Category, sections: Vec<Section>) -> Self {
        self.categories.insert(category, sections);
        self
    }

    /// Sections of one category (empty if absent).
    pub fn sections(&self, category: Category) -> &[Section] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Non-empty candidate lists in category order.
    pub fn candidate_lists(&self) -> impl Iterator<Item = &[Section]> {
        self.categories
            .values()
            .filter(|sections| !sections.is_empty())
            .map(Vec::as_slice)
    }

    /// Number of categories that contribute a digit to the product.
    pub fn populated_categories(&self) -> usize {
        self.candidate_lists().count()
    }

    /// Total distinct sections across categories.
    pub fn section_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }
}
