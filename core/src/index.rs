use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

/// Path of a crawled file, used as the document key.
pub type DocId = String;

/// Number of times a term occurs in a document. Always at least 1 for a stored posting.
pub type Count = u32;

/// An index frozen for concurrent reads. Nothing can get `&mut` through the `Arc`.
pub type SharedIndex = Arc<InvertedIndex>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    pub document: DocId,
    pub rank: u64,
}

/// Term -> document -> occurrence count.
///
/// Populated single-threaded through [`InvertedIndex::record`], then wrapped in a
/// [`SharedIndex`] and only read from that point on.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, HashMap<DocId, Count>>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more occurrence of `term` in `document`.
    pub fn record(&mut self, term: &str, document: &str) {
        *self
            .postings
            .entry(term.to_string())
            .or_default()
            .entry(document.to_string())
            .or_insert(0) += 1;
    }

    /// Every document containing `term`, ranked by its occurrence count.
    pub fn lookup_word(&self, term: &str) -> Vec<SearchResult> {
        let Some(docs) = self.postings.get(term) else {
            return Vec::new();
        };
        let mut results: Vec<SearchResult> = docs
            .iter()
            .map(|(doc, count)| SearchResult { document: doc.clone(), rank: u64::from(*count) })
            .collect();
        sort_by_rank(&mut results);
        results
    }

    /// Documents containing every term in `terms`, ranked by the sum of their
    /// per-term counts.
    pub fn lookup_query<S: AsRef<str>>(&self, terms: &[S]) -> Vec<SearchResult> {
        let (first, rest) = match terms {
            [] => return Vec::new(),
            [only] => return self.lookup_word(only.as_ref()),
            [first, rest @ ..] => (first, rest),
        };
        let Some(seed) = self.postings.get(first.as_ref()) else {
            return Vec::new();
        };

        let mut scores: HashMap<&str, u64> =
            seed.iter().map(|(doc, count)| (doc.as_str(), u64::from(*count))).collect();
        for term in rest {
            let Some(docs) = self.postings.get(term.as_ref()) else {
                return Vec::new();
            };
            scores.retain(|doc, score| match docs.get(*doc) {
                Some(count) => {
                    *score += u64::from(*count);
                    true
                }
                None => false,
            });
            if scores.is_empty() {
                return Vec::new();
            }
        }

        let mut results: Vec<SearchResult> = scores
            .into_iter()
            .map(|(doc, rank)| SearchResult { document: doc.to_string(), rank })
            .collect();
        sort_by_rank(&mut results);
        results
    }

    /// Number of distinct terms.
    pub fn num_words(&self) -> usize {
        self.postings.len()
    }

    /// Number of distinct documents holding at least one posting.
    pub fn num_documents(&self) -> usize {
        let mut docs: Vec<&str> = self
            .postings
            .values()
            .flat_map(|docs| docs.keys().map(String::as_str))
            .collect();
        docs.sort_unstable();
        docs.dedup();
        docs.len()
    }

    /// Number of (term, document) pairs.
    pub fn num_postings(&self) -> usize {
        self.postings.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    pub fn into_shared(self) -> SharedIndex {
        Arc::new(self)
    }
}

// Rank descending, then document name so equal ranks come out in a stable order.
fn sort_by_rank(results: &mut [SearchResult]) {
    results.sort_by(|a, b| match b.rank.cmp(&a.rank) {
        Ordering::Equal => a.document.cmp(&b.document),
        other => other,
    });
}
