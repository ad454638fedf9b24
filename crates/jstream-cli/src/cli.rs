use std::ffi::{OsStr, OsString};
use std::path::Path;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "jstream")]
#[command(version = jstream_core::VERSION, about = "Typed columnar streams for shell pipelines", long_about = None)]
pub struct Cli {
    /// Show debug logs on stderr (honours JSTREAM_LOG / RUST_LOG)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Disable all logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Forward rows matching `<column> <contains|==|=~> <operand>`
    Filter {
        /// Drop every row whose value in this column was seen before
        #[arg(short, long, value_name = "COLUMN")]
        unique: Option<String>,

        /// Predicate tokens; none means every row passes
        #[arg(value_name = "EXPR", trailing_var_arg = true)]
        expr: Vec<String>,
    },

    /// Keep the named columns, in the given order
    Select {
        #[arg(value_name = "COLUMN")]
        columns: Vec<String>,
    },

    /// Stable sort by one column
    Sort {
        #[arg(value_name = "COLUMN")]
        column: String,

        /// Descending order
        #[arg(short, long)]
        reverse: bool,
    },

    /// Take a window of rows; negative offset/num count from the end
    Slice {
        /// First row index
        #[arg(short, long, allow_negative_numbers = true)]
        offset: Option<i64>,

        /// Maximum number of rows
        #[arg(short, long, allow_negative_numbers = true)]
        num: Option<i64>,

        /// Stride between rows; may be negative, not zero
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        step: i64,
    },

    /// Render a stream as text, whether or not stdout is a terminal
    Print {
        /// Read everything first and fit columns to the data
        #[arg(short, long)]
        sponge: bool,

        /// Fixed width for every column
        #[arg(short = 'c', long = "colwidth", value_name = "N")]
        col_width: Option<usize>,

        /// One JSON object per row
        #[arg(long, conflicts_with_all = ["sponge", "col_width"])]
        json: bool,
    },

    /// Turn delimited text lines into a stream of string columns
    Parse {
        /// Record delimiter
        #[arg(short = 'n', long = "rowdelim", default_value = "\n", allow_hyphen_values = true)]
        row_delimiter: String,

        /// Whole-record regex; capture groups become the columns
        #[arg(short, long, allow_hyphen_values = true)]
        regex: Option<String>,

        /// Split each record at this delimiter
        #[arg(short, long, allow_hyphen_values = true)]
        csv: Option<String>,

        /// Trim whitespace around each --csv part
        #[arg(short, long)]
        trim: bool,

        #[arg(value_name = "COLUMN")]
        columns: Vec<String>,
    },
}

const SUBCOMMANDS: [&str; 6] = ["filter", "select", "sort", "slice", "print", "parse"];

/// Rewrite `argv` so that a `j<subcommand>` symlink (e.g. `jsort -r size`)
/// parses as `jstream sort -r size`.
pub fn normalize_args<I, T>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();
    if let Some(sub) = args.first().and_then(|argv0| implied_subcommand(argv0)) {
        args[0] = OsString::from("jstream");
        args.insert(1, OsString::from(sub));
    }
    args
}

fn implied_subcommand(argv0: &OsStr) -> Option<&'static str> {
    let stem = Path::new(argv0).file_stem()?.to_str()?;
    let name = stem.strip_prefix('j')?;
    SUBCOMMANDS.iter().copied().find(|s| *s == name)
}
