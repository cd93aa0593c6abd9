//! `xref render` command implementation.

use clap::Args;

use super::{CommonArgs, write_output};
use crate::error::CliError;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Resolve relative shortlinks inside the repository wiki.
    #[arg(long)]
    wiki: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, input or post-processing fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let session = self.common.into_session()?;
        let html = session.processor.post_process(
            &session.input,
            &session.url_prefix,
            session.metas.as_ref(),
            self.wiki,
        )?;
        write_output(&html)
    }
}
