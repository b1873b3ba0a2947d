use std::path::PathBuf;

/// Reasons a crawl gives up without producing an index.
#[derive(thiserror::Error, Debug)]
pub enum CrawlError {
    /// A directory in the tree could not be opened or listed.
    #[error("cannot enumerate {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    /// The crawl root exists but is not a directory.
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),
}

pub type CrawlResult<T> = Result<T, CrawlError>;
