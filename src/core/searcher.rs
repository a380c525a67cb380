/// History searcher with fuzzy matching
///
/// Filters the stored scans by payload.

use crate::core::history::HistoryStore;
use crate::db::SearchResult;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

pub struct Searcher {
    store: HistoryStore,
    matcher: SkimMatcherV2,
}

impl Searcher {
    pub fn new(store: HistoryStore) -> Self {
        Self {
            store,
            matcher: SkimMatcherV2::default(),
        }
    }

    /// Fuzzy search over payloads, best match first.
    ///
    /// Ties keep history order (newest first). A blank query returns
    /// the newest `limit` scans unscored.
    pub async fn search(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        let history = self.store.load().await;
        let query = query.trim();

        if query.is_empty() {
            return history
                .into_iter()
                .take(limit)
                .map(|record| SearchResult { record, score: 0 })
                .collect();
        }

        let mut results: Vec<SearchResult> = history
            .into_iter()
            .filter_map(|record| {
                self.matcher
                    .fuzzy_match(&record.payload, query)
                    .map(|score| SearchResult { record, score })
            })
            .collect();

        // sort_by is stable, so equal scores stay newest-first
        results.sort_by(|a, b| b.score.cmp(&a.score));
        results.truncate(limit);

        results
    }
}
