use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Poll the database and forward new rows until interrupted (default)
    Run,

    /// Delete the persisted cursor so the next run starts from the default value
    ClearCache,

    /// Write an options file populated with every default
    CreateDefaultOptions {
        #[arg(long, help = "Replace the file if it already exists")]
        overwrite: bool,

        #[arg(
            short,
            long,
            help = "Where to write the options file, defaults to --options"
        )]
        filename: Option<PathBuf>,
    },

    /// Print the persisted cursor
    ShowCursor {
        #[arg(long, help = "Print as JSON instead of plain text")]
        json: bool,
    },

    /// Connect to the configured database and run a trivial query
    TestConn,
}
