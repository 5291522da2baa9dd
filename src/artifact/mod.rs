//! The precompiled stylesheet shared by every document of a run.
//!
//! Acquired once before the corpus loop: optionally compiled, then read from
//! `stylesheet.output`. Any failure here aborts the run before a document is
//! touched.

mod compile;

pub use compile::{compile, compiler_command};

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::{
    config::{BakeConfig, Delivery},
    log,
    patterns::{INLINE_MARKER_ID, LinkedTarget},
    utils::{
        html::escape_attr,
        path::relative_href,
    },
};

/// Why the stylesheet is unavailable.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("stylesheet `{0}` could not be read")]
    Unreadable(PathBuf, #[source] io::Error),

    #[error("stylesheet `{0}` is not valid UTF-8")]
    Encoding(PathBuf),

    #[error("stylesheet `{0}` contains `</style`, which would end the inline block early")]
    StyleClose(PathBuf),

    #[error("stylesheet compiler `{0}` not found")]
    CompilerNotFound(String),

    #[error("stylesheet compiler failed: `{command}`\n{stderr}")]
    CompilerFailed { command: String, stderr: String },

    #[error("could not run stylesheet compiler `{0}`")]
    CompilerIo(String, #[source] io::Error),
}

/// Compiled stylesheet text plus how it is delivered.
#[derive(Debug, Clone)]
pub struct StylesheetArtifact {
    text: String,
    delivery: Delivery,
    output: PathBuf,
    href: Option<String>,
}

impl StylesheetArtifact {
    pub fn new(
        text: impl Into<String>,
        delivery: Delivery,
        output: impl Into<PathBuf>,
        href: Option<String>,
    ) -> Self {
        Self {
            text: text.into(),
            delivery,
            output: output.into(),
            href,
        }
    }

    /// Compile (when enabled) and read the stylesheet named by `config`.
    pub fn acquire(config: &BakeConfig) -> Result<Self, ArtifactError> {
        let sheet = &config.stylesheet;
        if sheet.compiler.enable {
            compile(&sheet.compiler, &sheet.output, &config.root)?;
        }
        Self::load(&sheet.output, sheet.delivery, sheet.href.clone())
    }

    /// Read a compiled stylesheet from disk.
    pub fn load(output: &Path, delivery: Delivery, href: Option<String>) -> Result<Self, ArtifactError> {
        let bytes = fs::read(output).map_err(|e| ArtifactError::Unreadable(output.to_path_buf(), e))?;
        let text = String::from_utf8(bytes).map_err(|_| ArtifactError::Encoding(output.to_path_buf()))?;

        if delivery == Delivery::Inline && contains_style_close(&text) {
            return Err(ArtifactError::StyleClose(output.to_path_buf()));
        }
        if text.trim().is_empty() {
            log!("warning"; "stylesheet `{}` is empty", output.display());
        }

        Ok(Self::new(text, delivery, output, href))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn delivery(&self) -> Delivery {
        self.delivery
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Href reaching the stylesheet from `document`.
    ///
    /// A configured href wins; otherwise the path is relative to the
    /// document's directory.
    pub fn href_for(&self, document: &Path) -> String {
        if let Some(href) = &self.href {
            return href.clone();
        }
        let dir = document.parent().unwrap_or(Path::new(""));
        relative_href(dir, &self.output)
    }

    /// The block inserted before `</head>`.
    pub fn block_for(&self, document: &Path) -> String {
        match self.delivery {
            Delivery::Inline => format!("<style id=\"{INLINE_MARKER_ID}\">{}</style>", self.text),
            Delivery::Linked => format!(
                "<link href=\"{}\" rel=\"stylesheet\">",
                escape_attr(&self.href_for(document))
            ),
        }
    }

    /// What a linked block written by any run points at, for documents
    /// under `corpus_root`.
    pub fn linked_target(&self, corpus_root: &Path) -> LinkedTarget {
        LinkedTarget {
            output: self.output.clone(),
            root: corpus_root.to_path_buf(),
            href: self.href.clone(),
        }
    }
}

/// `</style` in any case.
fn contains_style_close(css: &str) -> bool {
    css.to_ascii_lowercase().contains("</style")
}
