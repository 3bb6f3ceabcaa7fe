use serde::Serialize;

/// Lifecycle of a single search request.
///
/// Stages only move forward. An unresolved center jumps straight from
/// `ResolvingCenter` to `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStage {
    Idle,
    ResolvingCenter,
    ComputingTownSet,
    FetchingConcurrent,
    FilteringByDistance,
    Done,
}

impl std::fmt::Display for SearchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SearchStage::Idle => "idle",
            SearchStage::ResolvingCenter => "resolving_center",
            SearchStage::ComputingTownSet => "computing_town_set",
            SearchStage::FetchingConcurrent => "fetching_concurrent",
            SearchStage::FilteringByDistance => "filtering_by_distance",
            SearchStage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Records the stages a request passes through.
#[derive(Debug, Clone)]
pub(crate) struct StageTracker {
    current: SearchStage,
    visited: Vec<SearchStage>,
}

impl StageTracker {
    pub(crate) fn new() -> Self {
        Self {
            current: SearchStage::Idle,
            visited: vec![SearchStage::Idle],
        }
    }

    /// Moves to `next`. Backward or repeated transitions are ignored.
    pub(crate) fn advance(&mut self, next: SearchStage) {
        if next <= self.current {
            tracing::debug!(from = %self.current, to = %next, "ignoring non-forward stage change");
            return;
        }
        tracing::debug!(from = %self.current, to = %next, "search stage");
        self.current = next;
        self.visited.push(next);
    }

    pub(crate) fn current(&self) -> SearchStage {
        self.current
    }

    pub(crate) fn into_visited(self) -> Vec<SearchStage> {
        self.visited
    }
}
