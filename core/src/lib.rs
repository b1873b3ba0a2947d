//! In-memory inverted index over a directory of text files.
//!
//! [`crawl::crawl_filetree`] builds an [`InvertedIndex`] in a single pass; the
//! result is then frozen into a [`SharedIndex`] and queried concurrently.

pub mod crawl;
pub mod error;
pub mod index;
pub mod tokenizer;

pub use error::{CrawlError, CrawlResult};
pub use index::{Count, DocId, InvertedIndex, SearchResult, SharedIndex};
