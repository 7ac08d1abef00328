//! The two command-line flows, kept out of `main` so they run against any
//! [`FeedClient`].

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::error;

use crate::config::{GroupConfig, GroupList};
use crate::error::ConfigError;
use crate::graph::FeedClient;
use crate::poster::{BatchReport, Poster};
use crate::prompt::Prompter;

/// How a run ended.
#[derive(Debug)]
pub enum RunOutcome {
    Posted(BatchReport),
    /// Nothing was posted, the process still ends normally.
    Skipped(ConfigError),
    /// Nothing was posted and the process must fail.
    Aborted(ConfigError),
}

impl RunOutcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::Posted(_) | RunOutcome::Skipped(_) => 0,
            RunOutcome::Aborted(_) => 1,
        }
    }
}

/// Posts the message of a group file to the groups it lists.
///
/// A bad file is logged and the run is skipped.
pub async fn run_from_file<C: FeedClient>(poster: &Poster<C>, path: &Path) -> RunOutcome {
    let config = match GroupConfig::load(path) {
        Ok(config) => config,
        Err(e) => {
            error!(msg = "not posting", error = %e);
            return RunOutcome::Skipped(e);
        }
    };
    match poster
        .post_to_multiple_groups(&config.groups, &config.message, None, None)
        .await
    {
        Ok(report) => RunOutcome::Posted(report),
        Err(e) => RunOutcome::Skipped(e),
    }
}

/// Asks for a group file, message, link and image folder, then posts.
///
/// A group file that fails to load aborts before anything else is asked.
pub async fn run_interactive<C, R, W>(
    poster: &Poster<C>,
    prompter: &mut Prompter<R, W>,
) -> io::Result<RunOutcome>
where
    C: FeedClient,
    R: BufRead,
    W: Write,
{
    let groups_file = PathBuf::from(prompter.ask("Path to the JSON file with group IDs: ")?);
    let groups = match GroupList::load(&groups_file) {
        Ok(list) => list.groups,
        Err(e) => {
            error!(msg = "cannot load group ids", error = %e);
            return Ok(RunOutcome::Aborted(e));
        }
    };

    let message = prompter.ask("Message to post: ")?;
    let link = prompter.ask_optional("Link to share (blank for none): ")?;
    let folder = prompter
        .ask_optional("Folder with images (blank to skip): ")?
        .map(PathBuf::from);

    let outcome = match poster
        .post_to_multiple_groups(&groups, &message, link.as_deref(), folder.as_deref())
        .await
    {
        Ok(report) => RunOutcome::Posted(report),
        Err(e) => RunOutcome::Aborted(e),
    };
    Ok(outcome)
}

/// One line per group plus a summary.
pub fn write_report(report: &BatchReport, out: &mut impl Write) -> io::Result<()> {
    if let Some(image) = report.images.primary() {
        writeln!(
            out,
            "Attached {} (of {} found)",
            image.display(),
            report.images.len()
        )?;
    }
    for outcome in &report.outcomes {
        writeln!(out, "{outcome}")?;
    }
    writeln!(out, "{} posted, {} failed", report.succeeded(), report.failed())
}
