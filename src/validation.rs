//! Structural checks on grouped candidates.
//!
//! Runs before enumeration and reports every problem found rather than the
//! first. None of these make enumeration unsafe; they flag catalogs whose
//! results would be surprising. Detects:
//! - Duplicate course names
//! - A CRN listed twice within one course
//! - Courses with no candidate sections
//! - Sections filed under the wrong course or category
//! - Sections whose own meetings overlap (they can never be scheduled)

use std::collections::HashSet;

use crate::models::CourseCandidates;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two candidate sets share a course name.
    DuplicateCourse,
    /// A CRN appears on more than one section of a course.
    DuplicateIdentifier,
    /// A course has no populated category.
    EmptyCourse,
    /// A section sits under a course or category it does not belong to.
    MisfiledSection,
    /// A section's meetings overlap each other.
    SelfConflictingSection,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates candidate sets before enumeration.
///
/// Checks:
/// 1. No duplicate course names
/// 2. Every course has at least one candidate section
/// 3. No CRN appears twice within a course
/// 4. Every section is filed under its own course and category
/// 5. No section conflicts with itself
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_candidates(courses: &[CourseCandidates]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut names = HashSet::new();

    for course in courses {
        if !names.insert(course.name.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateCourse,
                format!("Duplicate course: {}", course.name),
            ));
        }

        if course.populated_categories() == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyCourse,
                format!("Course '{}' has no candidate sections", course.name),
            ));
        }

        let mut crns = HashSet::new();
        for (&category, sections) in &course.categories {
            for section in sections {
                for crn in &section.identifiers {
                    if !crns.insert(crn.as_str()) {
                        errors.push(ValidationError::new(
                            ValidationErrorKind::DuplicateIdentifier,
                            format!("Course '{}' lists CRN {} more than once", course.name, crn),
                        ));
                    }
                }

                if section.course != course.name || section.category != category {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::MisfiledSection,
                        format!(
                            "Section {:?} of '{}' ({}) filed under '{}' ({})",
                            section.display_codes,
                            section.course,
                            section.category.code(),
                            course.name,
                            category.code()
                        ),
                    ));
                }

                if section.is_self_conflicting() {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::SelfConflictingSection,
                        format!(
                            "Section {:?} of '{}' has overlapping meetings",
                            section.display_codes, course.name
                        ),
                    ));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
