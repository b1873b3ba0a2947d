use crate::error::{CrawlError, CrawlResult};
use crate::index::InvertedIndex;
use crate::tokenizer::tokenize;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Index every regular file under `root`, recursively.
///
/// Each file is keyed by its path as reached from `root` (`root/sub/file.txt`).
/// A symlink is indexed when it resolves to a file inside `root`; symlinked
/// directories are not descended. Failing to list any directory aborts the
/// whole crawl; a file that cannot be read is skipped.
pub fn crawl_filetree<P: AsRef<Path>>(root: P) -> CrawlResult<InvertedIndex> {
    let root = root.as_ref();
    let mut index = InvertedIndex::new();
    let mut files = 0usize;
    let canonical_root = root.canonicalize().ok();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|source| CrawlError::Walk {
            path: source.path().unwrap_or(root).to_path_buf(),
            source,
        })?;
        if entry.depth() == 0 && !entry.file_type().is_dir() {
            return Err(CrawlError::NotADirectory(root.to_path_buf()));
        }
        let file_type = entry.file_type();
        if file_type.is_symlink() && !links_to_file_under(entry.path(), canonical_root.as_deref()) {
            continue;
        }
        if !file_type.is_file() && !file_type.is_symlink() {
            continue;
        }
        if index_file(entry.path(), &mut index) {
            files += 1;
        }
    }

    tracing::info!(
        root = %root.display(),
        files,
        num_docs = index.num_documents(),
        num_terms = index.num_words(),
        "crawl complete"
    );
    Ok(index)
}

fn links_to_file_under(link: &Path, canonical_root: Option<&Path>) -> bool {
    let Some(canonical_root) = canonical_root else {
        return false;
    };
    match link.canonicalize() {
        Ok(target) => target.starts_with(canonical_root) && target.is_file(),
        Err(err) => {
            tracing::debug!(path = %link.display(), error = %err, "skipping dangling symlink");
            false
        }
    }
}

fn index_file(path: &Path, index: &mut InvertedIndex) -> bool {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "skipping unreadable file");
            return false;
        }
    };
    let text = String::from_utf8_lossy(&bytes);
    let document = path.to_string_lossy();
    for term in tokenize(&text) {
        index.record(&term, &document);
    }
    true
}
