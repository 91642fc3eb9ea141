//! Migration status and outcome types.

use std::time::Duration;

/// Applied and pending migration versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    /// Applied migration versions in chronological order
    pub applied_versions: Vec<String>,
    /// Embedded migration versions not yet applied
    pub pending_versions: Vec<String>,
}

impl MigrationStatus {
    /// Creates a new migration status.
    pub fn new(
        applied_versions: impl Into<Vec<String>>,
        pending_versions: impl Into<Vec<String>>,
    ) -> Self {
        Self {
            applied_versions: applied_versions.into(),
            pending_versions: pending_versions.into(),
        }
    }

    /// Returns the last applied migration version, if any.
    pub fn last_applied_version(&self) -> Option<&str> {
        self.applied_versions.last().map(String::as_str)
    }

    /// Returns the next pending migration version, if any.
    pub fn next_pending_version(&self) -> Option<&str> {
        self.pending_versions.first().map(String::as_str)
    }

    /// Returns the number of applied migrations.
    #[inline]
    pub fn applied_migrations(&self) -> usize {
        self.applied_versions.len()
    }

    /// Returns the number of pending migrations.
    #[inline]
    pub fn pending_migrations(&self) -> usize {
        self.pending_versions.len()
    }

    /// Returns true if all embedded migrations have been applied.
    #[inline]
    pub fn is_up_to_date(&self) -> bool {
        self.pending_versions.is_empty()
    }
}

/// Outcome of a migration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationResult {
    /// Total duration of the run
    pub duration: Duration,
    /// Versions applied during the run
    pub processed_versions: Vec<String>,
}

impl MigrationResult {
    /// Creates a result for a successful run.
    pub fn success(duration: Duration, processed_versions: Vec<String>) -> Self {
        Self {
            duration,
            processed_versions,
        }
    }

    /// Returns whether the run applied nothing.
    pub fn is_no_op(&self) -> bool {
        self.processed_versions.is_empty()
    }

    /// Returns the last applied version, if any.
    pub fn last_processed_version(&self) -> Option<&str> {
        self.processed_versions.last().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_with_pending_versions() {
        let status = MigrationStatus::new(
            vec!["20250601000000".to_owned()],
            vec!["20250701000000".to_owned()],
        );

        assert!(!status.is_up_to_date());
        assert_eq!(status.last_applied_version(), Some("20250601000000"));
        assert_eq!(status.next_pending_version(), Some("20250701000000"));
        assert_eq!(status.applied_migrations() + status.pending_migrations(), 2);
    }

    #[test]
    fn fresh_database_status() {
        let status = MigrationStatus::new(Vec::new(), vec!["20250601000000".to_owned()]);
        assert_eq!(status.last_applied_version(), None);
        assert_eq!(status.pending_migrations(), 1);
    }

    #[test]
    fn result_no_op() {
        let result = MigrationResult::success(Duration::from_millis(5), Vec::new());
        assert!(result.is_no_op());
        assert_eq!(result.last_processed_version(), None);
    }
}
