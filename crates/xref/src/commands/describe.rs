//! `xref describe` command implementation.

use clap::Args;

use super::{CommonArgs, write_output};
use crate::error::CliError;

/// Arguments for the describe command.
#[derive(Args)]
pub(crate) struct DescribeArgs {
    #[command(flatten)]
    common: CommonArgs,
}

impl DescribeArgs {
    /// Execute the describe command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, input or post-processing fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let session = self.common.into_session()?;
        let html = session.processor.render_description(
            &session.input,
            &session.url_prefix,
            session.metas.as_ref(),
        )?;
        write_output(&html)
    }
}
