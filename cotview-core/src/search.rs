//! Case-insensitive market name search with a deterministic ranking.
//!
//! The index is a read-only view over the distinct market names of one
//! loaded table. Names are stored verbatim for display; normalization
//! (trim plus case fold) applies only when comparing.

/// Comparison form of a name or query. Internal whitespace is kept, so a
/// query of "CRUDE OIL" will not match a name with doubled spaces.
fn fold(name: &str) -> String {
    name.trim().to_uppercase()
}

/// How a candidate matched the query, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchClass {
    Exact,
    Prefix,
    Contains,
}

fn classify(folded_name: &str, folded_query: &str) -> Option<MatchClass> {
    if folded_name == folded_query {
        Some(MatchClass::Exact)
    } else if folded_name.starts_with(folded_query) {
        Some(MatchClass::Prefix)
    } else if folded_name.contains(folded_query) {
        Some(MatchClass::Contains)
    } else {
        None
    }
}

/// Searchable list of the distinct market names of one report table.
///
/// Rebuilt whenever a new table is loaded; it has no lifecycle of its own.
#[derive(Debug, Clone, Default)]
pub struct MarketSearchIndex {
    names: Vec<String>,
    folded: Vec<String>,
}

impl MarketSearchIndex {
    /// Build from market names in first-appearance order.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let folded = names.iter().map(|name| fold(name)).collect();
        Self { names, folded }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Every indexed name, in first-appearance order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// All markets whose name contains `query`, best match first.
    ///
    /// Ranking: exact match, then prefix match, then the query occurring
    /// anywhere; within a class shorter names win, and remaining ties keep
    /// first-appearance order. An empty query matches every name. An empty
    /// result is a valid answer, not an error.
    pub fn search(&self, query: &str) -> Vec<&str> {
        let folded_query = fold(query);
        let mut hits: Vec<(MatchClass, usize, usize)> = self
            .folded
            .iter()
            .enumerate()
            .filter_map(|(id, folded)| {
                classify(folded, &folded_query).map(|class| (class, folded.len(), id))
            })
            .collect();
        hits.sort_unstable();
        hits.into_iter().map(|(_, _, id)| self.names[id].as_str()).collect()
    }

    /// The indexed name equal to `query` under normalization, if any.
    pub fn find_exact(&self, query: &str) -> Option<&str> {
        let folded_query = fold(query);
        self.folded
            .iter()
            .position(|folded| *folded == folded_query)
            .map(|id| self.names[id].as_str())
    }
}
