//! Document-wide check results: findings, severity levels, and aggregation.

use crate::document::Document;
use crate::error::ValidationError;
use crate::session::Session;

/// Severity level of a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The document can be written, but a reader may not resolve it fully.
    Warning,
    /// The document cannot be written.
    Failure,
}

/// A single finding about one document member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// URI of the instance the finding is about.
    pub subject: String,
    /// Human-readable description.
    pub message: String,
    /// Severity of the finding.
    pub severity: Severity,
    /// The constraint violation behind a failure.
    pub violation: Option<ValidationError>,
}

impl Finding {
    /// Creates a failure from a constraint violation.
    #[must_use]
    pub fn fail(violation: ValidationError) -> Self {
        Self {
            subject: violation.uri().to_owned(),
            message: violation.to_string(),
            severity: Severity::Failure,
            violation: Some(violation),
        }
    }

    /// Creates a warning.
    #[must_use]
    pub fn warn(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
            severity: Severity::Warning,
            violation: None,
        }
    }

    /// Returns true if this finding blocks writing.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.severity == Severity::Failure
    }
}

/// Findings over every member of a [`Document`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// All findings, grouped by member in document order.
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks every member of `document`: constraint violations are
    /// failures, references to instances outside the document are warnings.
    #[must_use]
    pub fn check(session: &Session, document: &Document) -> Self {
        let mut report = Self::new();
        for id in document {
            let Some(instance) = session.instance(*id) else {
                report.push(Finding::warn(id.to_string(), "not an instance of this session"));
                continue;
            };
            report
                .findings
                .extend(session.violations(*id).into_iter().map(Finding::fail));
            for target in instance.references().filter(|target| !document.contains(*target)) {
                let target = session
                    .instance(target)
                    .map_or_else(|| target.to_string(), |t| t.uri().to_owned());
                report.push(Finding::warn(
                    instance.uri(),
                    format!("references {target}, which is not in the document"),
                ));
            }
        }
        report
    }

    /// Appends a finding.
    pub fn push(&mut self, finding: Finding) {
        self.findings.push(finding);
    }

    /// Returns the count of failures.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.findings.iter().filter(|f| f.is_failure()).count()
    }

    /// Returns the count of warnings.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.findings.len() - self.failure_count()
    }

    /// Returns true if no finding is a failure.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failure_count() == 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use cimrdf_test_helpers::cim16_schema;

    #[test]
    fn outside_references_warn_and_violations_fail() {
        let mut session = Session::new(cim16_schema());
        let breaker = session.create_with_uri("Breaker", "#cb").unwrap();
        let terminal = session.create_with_uri("Terminal", "#t").unwrap();
        session.set(terminal, "ConductingEquipment", breaker).unwrap();
        let document: Document = [terminal].into_iter().collect();

        let report = ValidationReport::check(&session, &document);
        assert!(report.all_passed());
        assert_eq!(report.warning_count(), 1);
        assert_eq!(report.findings[0].subject, "#t");

        let mut document = document;
        document.add(breaker);
        let report = ValidationReport::check(&session, &document);
        assert_eq!(report.failure_count(), 1);
        assert_eq!(report.warning_count(), 0);
        assert!(matches!(
            report.findings[0].violation,
            Some(ValidationError::MissingRequiredProperty { .. })
        ));
    }
}
