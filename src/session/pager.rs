use tracing::debug;

use crate::models::list::{ListingPage, ObjectEntry};
use crate::models::path::NavigationTarget;

/// Listing lifecycle for the active navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerState {
    Empty,
    Loading,
    Loaded,
    LoadingMore,
}

/// A fetch the session must issue against the backend. Carries the
/// generation it was issued under so the response can be matched back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub target: NavigationTarget,
    pub continuation: Option<String>,
    pub generation: u64,
}

/// Holds the in-memory page for the active `(bucket, prefix)`.
///
/// Every `reset` bumps a generation counter; responses carrying an older
/// generation are stale and dropped without touching state. Continuation
/// fetches are serialized: at most one request is outstanding per target.
#[derive(Debug)]
pub struct ListingPager {
    target: NavigationTarget,
    state: PagerState,
    entries: Vec<ObjectEntry>,
    continuation_token: Option<String>,
    truncated: bool,
    generation: u64,
}

impl Default for ListingPager {
    fn default() -> Self {
        Self::new()
    }
}

impl ListingPager {
    pub fn new() -> Self {
        Self {
            target: NavigationTarget::root(),
            state: PagerState::Empty,
            entries: Vec::new(),
            continuation_token: None,
            truncated: false,
            generation: 0,
        }
    }

    pub fn target(&self) -> &NavigationTarget {
        &self.target
    }

    pub fn state(&self) -> PagerState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn entries(&self) -> &[ObjectEntry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut Vec<ObjectEntry> {
        &mut self.entries
    }

    pub fn truncated(&self) -> bool {
        self.truncated
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, PagerState::Loading | PagerState::LoadingMore)
    }

    /// Discards the current page for a new target and returns the initial
    /// fetch to issue, or `None` when no bucket is selected. The discard
    /// happens here, synchronously, before any fetch is spawned.
    pub fn reset(&mut self, target: NavigationTarget) -> Option<FetchRequest> {
        self.generation += 1;
        self.target = target;
        self.entries.clear();
        self.continuation_token = None;
        self.truncated = false;

        if self.target.bucket.is_empty() {
            self.state = PagerState::Empty;
            return None;
        }

        self.state = PagerState::Loading;
        Some(FetchRequest {
            target: self.target.clone(),
            continuation: None,
            generation: self.generation,
        })
    }

    /// Continuation fetch for a truncated page. No-op unless the pager is
    /// `Loaded` with more entries available, so rapid repeated triggers
    /// collapse into a single outstanding request.
    pub fn request_more(&mut self) -> Option<FetchRequest> {
        if self.state != PagerState::Loaded || !self.truncated {
            return None;
        }
        let token = self.continuation_token.clone()?;

        self.state = PagerState::LoadingMore;
        Some(FetchRequest {
            target: self.target.clone(),
            continuation: Some(token),
            generation: self.generation,
        })
    }

    /// Applies a listing response. Initial pages replace, continuation
    /// pages append. Returns `false` for stale or unexpected responses,
    /// which leave state untouched.
    pub fn apply(&mut self, generation: u64, page: ListingPage) -> bool {
        if generation != self.generation {
            debug!(
                stale = generation,
                current = self.generation,
                "discarding stale listing response"
            );
            return false;
        }

        match self.state {
            PagerState::Loading => self.entries = page.entries,
            PagerState::LoadingMore => self.entries.extend(page.entries),
            _ => return false,
        }

        self.continuation_token = page.continuation_token;
        self.truncated = page.truncated;
        self.state = PagerState::Loaded;
        true
    }

    /// Marks an outstanding fetch as failed. A failed initial fetch leaves
    /// the pager `Empty`; a failed continuation returns to `Loaded` with
    /// prior entries untouched. Stale failures return `false` and are
    /// ignored entirely.
    pub fn fail(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            debug!(
                stale = generation,
                current = self.generation,
                "discarding stale listing failure"
            );
            return false;
        }

        self.state = match self.state {
            PagerState::Loading => PagerState::Empty,
            PagerState::LoadingMore => PagerState::Loaded,
            other => other,
        };
        true
    }

    /// Drops the named entries from the loaded page (after a successful
    /// bulk delete).
    pub fn remove_entries(&mut self, names: &[String]) {
        self.entries.retain(|e| !names.iter().any(|n| n == &e.name));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::list::ObjectEntry;

    fn target(bucket: &str, prefix: &str) -> NavigationTarget {
        NavigationTarget::new(bucket, prefix)
    }

    fn page(names: &[&str], truncated: bool) -> ListingPage {
        ListingPage {
            entries: names.iter().map(|n| ObjectEntry::file(*n, 1, None)).collect(),
            continuation_token: truncated.then(|| "token".to_string()),
            truncated,
        }
    }

    #[test]
    fn reset_without_bucket_stays_empty() {
        let mut pager = ListingPager::new();
        assert!(pager.reset(NavigationTarget::root()).is_none());
        assert_eq!(pager.state(), PagerState::Empty);
    }

    #[test]
    fn reset_arms_an_initial_fetch() {
        let mut pager = ListingPager::new();
        let req = pager.reset(target("docs", "a/")).unwrap();
        assert_eq!(req.target, target("docs", "a/"));
        assert_eq!(req.continuation, None);
        assert_eq!(pager.state(), PagerState::Loading);
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut pager = ListingPager::new();
        let old = pager.reset(target("docs", "")).unwrap();
        let new = pager.reset(target("media", "")).unwrap();

        assert!(!pager.apply(old.generation, page(&["stale.txt"], false)));
        assert!(pager.entries().is_empty());

        assert!(pager.apply(new.generation, page(&["fresh.txt"], false)));
        assert_eq!(pager.entries().len(), 1);
        assert_eq!(pager.entries()[0].name, "fresh.txt");
    }

    #[test]
    fn request_more_is_gated_on_truncation() {
        let mut pager = ListingPager::new();
        let req = pager.reset(target("docs", "")).unwrap();
        pager.apply(req.generation, page(&["a"], false));

        assert!(pager.request_more().is_none());
    }

    #[test]
    fn duplicate_request_more_yields_one_fetch() {
        let mut pager = ListingPager::new();
        let req = pager.reset(target("docs", "")).unwrap();
        pager.apply(req.generation, page(&["a"], true));

        assert!(pager.request_more().is_some());
        assert!(pager.request_more().is_none());
        assert_eq!(pager.state(), PagerState::LoadingMore);
    }

    #[test]
    fn continuation_appends_entries() {
        let mut pager = ListingPager::new();
        let req = pager.reset(target("docs", "")).unwrap();
        pager.apply(req.generation, page(&["a", "b"], true));

        let more = pager.request_more().unwrap();
        assert_eq!(more.continuation.as_deref(), Some("token"));
        pager.apply(more.generation, page(&["c"], false));

        let names: Vec<_> = pager.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(!pager.truncated());
        assert_eq!(pager.state(), PagerState::Loaded);
    }

    #[test]
    fn failed_continuation_keeps_prior_entries() {
        let mut pager = ListingPager::new();
        let req = pager.reset(target("docs", "")).unwrap();
        pager.apply(req.generation, page(&["a"], true));

        let more = pager.request_more().unwrap();
        assert!(pager.fail(more.generation));

        assert_eq!(pager.state(), PagerState::Loaded);
        assert_eq!(pager.entries().len(), 1);
        // retry is possible: the page is still truncated
        assert!(pager.request_more().is_some());
    }

    #[test]
    fn failed_initial_fetch_returns_to_empty() {
        let mut pager = ListingPager::new();
        let req = pager.reset(target("docs", "")).unwrap();
        assert!(pager.fail(req.generation));
        assert_eq!(pager.state(), PagerState::Empty);
    }

    #[test]
    fn remove_entries_drops_only_named() {
        let mut pager = ListingPager::new();
        let req = pager.reset(target("docs", "")).unwrap();
        pager.apply(req.generation, page(&["a", "b", "c"], false));

        pager.remove_entries(&["a".to_string(), "c".to_string()]);
        let names: Vec<_> = pager.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b"]);
    }
}
