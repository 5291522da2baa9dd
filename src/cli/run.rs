//! `stylebake run` and `stylebake check`.

use std::sync::Arc;

use anyhow::Result;

use crate::{
    artifact::StylesheetArtifact,
    cli::{ReportFormat, RewriteArgs},
    config::{BakeConfig, Delivery},
    corpus, debug, log,
    pipeline::Pipeline,
};

/// Rewrite the corpus, or with `check` only report what would change.
///
/// Returns whether the run succeeded. A missing or unusable stylesheet is an
/// error before any document is touched.
pub fn run_corpus(config: &BakeConfig, args: &RewriteArgs, check: bool) -> Result<bool> {
    let module = if check { "check" } else { "bake" };

    let artifact = StylesheetArtifact::acquire(config)?;
    let delivery = match artifact.delivery() {
        Delivery::Inline => "inline",
        Delivery::Linked => "linked",
    };
    debug!(
        module;
        "{} stylesheet from {} ({} bytes)",
        delivery,
        config.root_relative(artifact.output()).display(),
        artifact.text().len()
    );

    let pipeline = Pipeline::new(config, Arc::new(artifact));
    debug!(module; "steps: {}", pipeline.step_names().join(", "));

    let summary = corpus::run(config, &pipeline, check);

    match args.format {
        ReportFormat::Text => {
            summary.print();
            log!(module; "{}", summary);
        }
        ReportFormat::Json => println!("{}", summary.to_json()?),
    }

    Ok(summary.is_success(check))
}
