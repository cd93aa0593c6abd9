//! CLI command implementations.

pub(crate) mod commit;
pub(crate) mod describe;
pub(crate) mod render;

pub(crate) use commit::CommitArgs;
pub(crate) use describe::DescribeArgs;
pub(crate) use render::RenderArgs;

use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Args, ValueEnum};
use xref_config::{CliSettings, Config, RepoConfig};
use xref_markup::{
    META_FORMAT, META_REPO, META_REPO_PATH, META_STYLE, META_USER, MarkupSettings, Metas,
    PostProcessor,
};
use xref_vcs::GitCommitResolver;

use crate::error::CliError;

/// Issue naming style flag.
#[derive(Clone, Copy, ValueEnum)]
pub(crate) enum StyleArg {
    Numeric,
    Alphanumeric,
}

impl StyleArg {
    fn as_str(self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Alphanumeric => "alphanumeric",
        }
    }
}

/// Input, configuration and repository arguments shared by all commands.
#[derive(Args)]
pub(crate) struct CommonArgs {
    /// Rendered HTML fragment to process (`-` reads stdin).
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Path to configuration file (default: auto-discover xref.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Application base URL (overrides config).
    #[arg(long, env = "XREF_APP_URL")]
    app_url: Option<String>,

    /// Prefix for relative links, e.g. `/acme/widget/src/branch/main`.
    #[arg(long, default_value = "")]
    url_prefix: String,

    /// Repository owner (overrides config).
    #[arg(long)]
    user: Option<String>,

    /// Repository name (overrides config).
    #[arg(long)]
    repo: Option<String>,

    /// Issue naming style (overrides config).
    #[arg(long, value_enum)]
    style: Option<StyleArg>,

    /// External issue tracker URL template with `{index}` (overrides config).
    #[arg(long)]
    format: Option<String>,

    /// Repository directory used to confirm commit hashes (overrides config).
    #[arg(long)]
    repo_path: Option<PathBuf>,
}

/// Everything a command needs to post-process its input.
pub(crate) struct Session {
    pub(crate) processor: PostProcessor,
    pub(crate) metas: Option<Metas>,
    pub(crate) input: String,
    pub(crate) url_prefix: String,
}

impl CommonArgs {
    /// Load configuration, build the post-processor and read the input.
    pub(crate) fn into_session(self) -> Result<Session, CliError> {
        let cli_settings = CliSettings {
            app_url: self.app_url,
            user: self.user,
            repo: self.repo,
            style: self.style.map(|style| style.as_str().to_owned()),
            format: self.format,
            repo_path: self.repo_path,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let settings = MarkupSettings::new(&config.app.url)?;
        let mut processor = PostProcessor::new(settings);
        if config.repo.as_ref().is_some_and(|repo| repo.path.is_some()) {
            processor = processor.with_resolver(GitCommitResolver::new());
        }

        Ok(Session {
            processor,
            metas: config.repo.as_ref().map(repo_metas),
            input: read_input(&self.input)?,
            url_prefix: self.url_prefix,
        })
    }
}

/// Convert repository configuration into render metadata.
fn repo_metas(repo: &RepoConfig) -> Metas {
    let mut metas = Metas::new();
    let fields = [
        (META_USER, repo.user.clone()),
        (META_REPO, repo.repo.clone()),
        (META_STYLE, repo.style.clone()),
        (META_FORMAT, repo.format.clone()),
        (
            META_REPO_PATH,
            repo.path.as_ref().map(|path| path.to_string_lossy().into_owned()),
        ),
    ];
    for (key, value) in fields {
        if let Some(value) = value {
            metas.insert(key.to_owned(), value);
        }
    }
    metas
}

/// Read the whole input from a file, or stdin for `-`.
fn read_input(input: &Path) -> Result<String, CliError> {
    if input.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    Ok(std::fs::read_to_string(input)?)
}

/// Write the processed fragment to stdout.
pub(crate) fn write_output(html: &str) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(html.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
