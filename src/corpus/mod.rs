//! Corpus driver: find documents, rewrite each one, write back what changed.
//!
//! Documents are independent. They share the pipeline (and the stylesheet
//! inside it) read-only, so with `corpus.parallel` they are processed on the
//! rayon pool without locks. Reports always come back in enumeration order.
//! A Ctrl+C stops the run between documents; a document is never left
//! half-written.

mod report;

pub use report::RunSummary;

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use jwalk::WalkDir;
use rayon::prelude::*;
use thiserror::Error;

use crate::{
    config::{BakeConfig, CorpusConfig},
    core::is_shutdown,
    debug,
    logger::ProgressLine,
    pipeline::{Pipeline, PipelineReport},
    rewrite::Issue,
};

/// A fault that stopped one document. The rest of the run continues.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("could not read: {0}")]
    Read(#[source] io::Error),

    #[error("not valid UTF-8")]
    Encoding,

    #[error("could not write: {0}")]
    Write(#[source] io::Error),
}

/// Outcome of one document.
#[derive(Debug)]
pub struct DocumentReport {
    pub path: PathBuf,
    /// Rewriting produced different text.
    pub changed: bool,
    /// The new text was written to disk.
    pub written: bool,
    pub warnings: Vec<Issue>,
    pub error: Option<DocumentError>,
}

impl DocumentReport {
    fn failed(path: &Path, error: DocumentError) -> Self {
        Self {
            path: path.to_path_buf(),
            changed: false,
            written: false,
            warnings: Vec::new(),
            error: Some(error),
        }
    }

    /// Record the outcome of writing the new text back.
    ///
    /// A failed write leaves the file as it was, so the document no longer
    /// counts as changed.
    fn record_write(&mut self, result: io::Result<()>) {
        match result {
            Ok(()) => self.written = true,
            Err(e) => {
                self.changed = false;
                self.error = Some(DocumentError::Write(e));
            }
        }
    }
}

// ============================================================================
// enumeration
// ============================================================================

/// Documents under `corpus.root`, sorted, skipping excluded directories.
pub fn collect_documents(corpus: &CorpusConfig) -> Vec<PathBuf> {
    let exclude = corpus.exclude.clone();

    let mut documents: Vec<PathBuf> = WalkDir::new(&corpus.root)
        .skip_hidden(false)
        .process_read_dir(move |_, _, _, children| {
            children.retain(|entry| match entry {
                Ok(e) if e.file_type().is_dir() => {
                    let name = e.file_name().to_string_lossy();
                    !exclude.iter().any(|x| *x == name)
                }
                _ => true,
            });
        })
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                debug!("walk"; "skipping entry: {}", err);
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|path| corpus.is_document(path))
        .collect();

    documents.sort();
    documents
}

// ============================================================================
// processing
// ============================================================================

/// Rewrite one document, writing it back when it changed and `dry_run` is off.
pub fn process_document(pipeline: &Pipeline, path: &Path, dry_run: bool) -> DocumentReport {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => return DocumentReport::failed(path, DocumentError::Read(e)),
    };
    let Ok(text) = String::from_utf8(bytes) else {
        return DocumentReport::failed(path, DocumentError::Encoding);
    };

    let (output, PipelineReport { changed, warnings, .. }) = pipeline.run(path, &text);

    let mut report = DocumentReport {
        path: path.to_path_buf(),
        changed,
        written: false,
        warnings,
        error: None,
    };

    if changed && !dry_run {
        report.record_write(fs::write(path, output));
    }

    report
}

/// Run the pipeline over every document of the corpus.
pub fn run(config: &BakeConfig, pipeline: &Pipeline, dry_run: bool) -> RunSummary {
    let documents = collect_documents(&config.corpus);
    debug!(
        "corpus";
        "{} documents under {}",
        documents.len(),
        config.corpus.root.display()
    );

    let progress = ProgressLine::new(&[("documents", documents.len())]);
    let process = |path: &PathBuf| -> Option<DocumentReport> {
        if is_shutdown() {
            return None;
        }
        let report = process_document(pipeline, path, dry_run);
        progress.inc("documents");
        Some(report)
    };

    let reports: Vec<Option<DocumentReport>> = if config.corpus.parallel {
        documents.par_iter().map(process).collect()
    } else {
        documents.iter().map(process).collect()
    };
    progress.finish();

    let total = reports.len();
    let reports: Vec<DocumentReport> = reports.into_iter().flatten().collect();
    let interrupted = reports.len() < total;

    RunSummary {
        root: config.corpus.root.clone(),
        dry_run,
        interrupted,
        documents: reports,
    }
}

// ============================================================================
// tests
// ============================================================================
