//! Run summary: colored text on stderr or JSON on stdout.

use std::fmt;
use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use serde::Serialize;

use super::DocumentReport;
use crate::utils::{plural_count, plural_s};

/// Every document report of a run, in enumeration order.
#[derive(Debug)]
pub struct RunSummary {
    pub root: PathBuf,
    /// Nothing was written.
    pub dry_run: bool,
    /// Ctrl+C stopped the run before every document was processed.
    pub interrupted: bool,
    pub documents: Vec<DocumentReport>,
}

impl RunSummary {
    pub fn changed(&self) -> usize {
        self.documents
            .iter()
            .filter(|d| d.changed && d.error.is_none())
            .count()
    }

    pub fn written(&self) -> usize {
        self.documents.iter().filter(|d| d.written).count()
    }

    pub fn errored(&self) -> usize {
        self.documents.iter().filter(|d| d.error.is_some()).count()
    }

    pub fn unchanged(&self) -> usize {
        self.documents
            .iter()
            .filter(|d| !d.changed && d.error.is_none())
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.documents.iter().map(|d| d.warnings.len()).sum()
    }

    /// Run succeeded: nothing errored, nothing interrupted, and for a check,
    /// nothing would change.
    pub fn is_success(&self, check: bool) -> bool {
        self.errored() == 0 && !self.interrupted && !(check && self.changed() > 0)
    }

    fn display_path<'a>(&self, path: &'a Path) -> std::borrow::Cow<'a, str> {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .to_string_lossy()
    }

    // ========================================================================
    // text
    // ========================================================================

    /// Print warnings and errors grouped by document to stderr.
    pub fn print(&self) {
        let noisy: Vec<_> = self
            .documents
            .iter()
            .filter(|d| d.error.is_some() || !d.warnings.is_empty())
            .collect();
        if noisy.is_empty() {
            return;
        }
        eprintln!();

        for doc in noisy {
            let path = self.display_path(&doc.path);
            eprintln!("{}{}{}", "[".dimmed(), path.cyan(), "]".dimmed());
            if let Some(err) = &doc.error {
                eprintln!("{} {}", "→".red(), err);
            }
            for warning in &doc.warnings {
                eprintln!("{} {}", "→".yellow(), warning);
            }
        }
    }

    // ========================================================================
    // json
    // ========================================================================

    pub fn to_json(&self) -> serde_json::Result<String> {
        let documents = self
            .documents
            .iter()
            .map(|d| JsonDocument {
                path: self.display_path(&d.path).into_owned(),
                changed: d.changed,
                written: d.written,
                warnings: d.warnings.iter().map(ToString::to_string).collect(),
                error: d.error.as_ref().map(ToString::to_string),
            })
            .collect();

        let report = JsonReport {
            root: self.root.to_string_lossy().into_owned(),
            dry_run: self.dry_run,
            interrupted: self.interrupted,
            totals: JsonTotals {
                documents: self.documents.len(),
                changed: self.changed(),
                unchanged: self.unchanged(),
                errored: self.errored(),
                written: self.written(),
                warnings: self.warning_count(),
            },
            documents,
        };
        serde_json::to_string_pretty(&report)
    }
}

#[derive(Serialize)]
struct JsonReport {
    root: String,
    dry_run: bool,
    interrupted: bool,
    totals: JsonTotals,
    documents: Vec<JsonDocument>,
}

#[derive(Serialize)]
struct JsonTotals {
    documents: usize,
    changed: usize,
    unchanged: usize,
    errored: usize,
    written: usize,
    warnings: usize,
}

#[derive(Serialize)]
struct JsonDocument {
    path: String,
    changed: bool,
    written: bool,
    warnings: Vec<String>,
    error: Option<String>,
}

/// One-line totals, e.g. `3 documents rewritten, 9 unchanged, 1 error`.
impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.documents.len();
        if total == 0 {
            return write!(f, "{}", "no documents found".dimmed());
        }

        let changed = self.changed();
        let verb = if self.dry_run { "would change" } else { "rewritten" };
        write!(
            f,
            "{} document{} {}, {} unchanged",
            changed.to_string().bold(),
            plural_s(changed),
            verb,
            self.unchanged()
        )?;

        let warnings = self.warning_count();
        if warnings > 0 {
            write!(
                f,
                ", {}",
                plural_count(warnings, "warning").yellow()
            )?;
        }
        let errors = self.errored();
        if errors > 0 {
            write!(
                f,
                ", {}",
                plural_count(errors, "error").red().bold()
            )?;
        }
        if self.interrupted {
            write!(f, " {}", "(interrupted)".dimmed())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::DocumentError;
    use crate::patterns::Anchor;
    use crate::rewrite::Issue;

    fn doc(path: &str, changed: bool, error: Option<DocumentError>) -> DocumentReport {
        DocumentReport {
            path: PathBuf::from(path),
            changed,
            written: changed,
            warnings: Vec::new(),
            error,
        }
    }

    fn summary() -> RunSummary {
        let mut fragment = doc("/site/part.html", false, None);
        fragment.warnings.push(Issue::AnchorMissing {
            step: "inject-stylesheet",
            anchor: Anchor::HeadClose,
        });
        RunSummary {
            root: PathBuf::from("/site"),
            dry_run: false,
            interrupted: false,
            documents: vec![
                doc("/site/index.html", true, None),
                fragment,
                doc("/site/bad.html", false, Some(DocumentError::Encoding)),
            ],
        }
    }

    #[test]
    fn test_counts() {
        let summary = summary();
        assert_eq!(summary.changed(), 1);
        assert_eq!(summary.unchanged(), 1);
        assert_eq!(summary.errored(), 1);
        assert_eq!(summary.warning_count(), 1);
        assert!(!summary.is_success(false));
    }

    #[test]
    fn test_success_rules() {
        let mut summary = summary();
        summary.documents.pop();
        assert!(summary.is_success(false));
        assert!(!summary.is_success(true));

        summary.interrupted = true;
        assert!(!summary.is_success(false));
    }

    #[test]
    fn test_json() {
        let json = summary().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["totals"]["documents"], 3);
        assert_eq!(value["totals"]["errored"], 1);
        assert_eq!(value["documents"][0]["path"], "index.html");
        assert_eq!(
            value["documents"][1]["warnings"][0],
            "inject-stylesheet: `</head>` not found, nothing inserted"
        );
        assert_eq!(value["documents"][2]["error"], "not valid UTF-8");
        assert!(value["documents"][0]["error"].is_null());
    }
}
