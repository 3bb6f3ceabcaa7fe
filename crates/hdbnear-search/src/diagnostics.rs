//! Per-request accounting of what degraded and why.

use hdbnear_core::FailureKind;
use serde::Serialize;

use crate::stage::SearchStage;

/// How the search center lookup went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CenterStatus {
    Resolved,
    /// The geocoder answered with no match.
    NotFound,
    /// The geocoder rejected the token, or the token exchange was refused.
    Unauthorized,
    /// Transport or parse failure talking to the geocoder.
    Unavailable,
    /// No credentials or static token are configured.
    TokenUnavailable,
}

impl CenterStatus {
    #[must_use]
    pub fn from_failure(kind: FailureKind) -> Self {
        match kind {
            FailureKind::Unauthorized => CenterStatus::Unauthorized,
            FailureKind::Unresolved => CenterStatus::NotFound,
            FailureKind::Transport | FailureKind::Parse => CenterStatus::Unavailable,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FailureCounts {
    pub unresolved: usize,
    pub transport: usize,
    pub unauthorized: usize,
    pub parse: usize,
}

impl FailureCounts {
    pub fn record(&mut self, kind: FailureKind) {
        match kind {
            FailureKind::Unresolved => self.unresolved += 1,
            FailureKind::Transport => self.transport += 1,
            FailureKind::Unauthorized => self.unauthorized += 1,
            FailureKind::Parse => self.parse += 1,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.unresolved + self.transport + self.unauthorized + self.parse
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchDiagnostics {
    pub center: CenterStatus,
    pub work_items: usize,
    pub failed_work_items: usize,
    pub geocode_attempts: usize,
    pub geocode_misses: usize,
    /// Reverse lookups issued to derive the town set.
    pub town_probes: usize,
    /// Reverse lookups for the town set that contributed no town.
    pub town_probe_misses: usize,
    pub failures: FailureCounts,
    pub stages: Vec<SearchStage>,
}

impl SearchDiagnostics {
    pub(crate) fn new(center: CenterStatus) -> Self {
        Self {
            center,
            work_items: 0,
            failed_work_items: 0,
            geocode_attempts: 0,
            geocode_misses: 0,
            town_probes: 0,
            town_probe_misses: 0,
            failures: FailureCounts::default(),
            stages: Vec::new(),
        }
    }

    /// Whether the credential looks bad rather than the data being sparse:
    /// the center was refused, or every failure was an authorization error.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.center == CenterStatus::Unauthorized
            || (self.failures.unauthorized > 0
                && self.failures.unauthorized == self.failures.total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_kind() {
        let mut counts = FailureCounts::default();
        counts.record(FailureKind::Transport);
        counts.record(FailureKind::Transport);
        counts.record(FailureKind::Parse);
        assert_eq!(counts.transport, 2);
        assert_eq!(counts.parse, 1);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn unauthorized_when_all_failures_are_auth() {
        let mut d = SearchDiagnostics::new(CenterStatus::Resolved);
        assert!(!d.is_unauthorized());
        d.failures.record(FailureKind::Unauthorized);
        assert!(d.is_unauthorized());
        d.failures.record(FailureKind::Transport);
        assert!(!d.is_unauthorized());
    }

    #[test]
    fn center_status_from_failure() {
        assert_eq!(
            CenterStatus::from_failure(FailureKind::Unauthorized),
            CenterStatus::Unauthorized
        );
        assert_eq!(
            CenterStatus::from_failure(FailureKind::Parse),
            CenterStatus::Unavailable
        );
    }
}
