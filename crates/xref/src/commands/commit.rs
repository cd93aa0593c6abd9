//! `xref commit` command implementation.

use clap::Args;

use super::{CommonArgs, write_output};
use crate::error::CliError;

/// Arguments for the commit command.
#[derive(Args)]
pub(crate) struct CommitArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Link any text that is not a reference to this URL, e.g. the commit page.
    #[arg(long)]
    default_link: Option<String>,
}

impl CommitArgs {
    /// Execute the commit command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, input or post-processing fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let session = self.common.into_session()?;
        let html = session.processor.render_commit_message(
            &session.input,
            &session.url_prefix,
            self.default_link.as_deref().unwrap_or_default(),
            session.metas.as_ref(),
        )?;
        write_output(&html)
    }
}
