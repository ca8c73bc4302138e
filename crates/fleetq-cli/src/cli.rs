use clap::{ArgAction, Parser, Subcommand, ValueHint};

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress log output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Provide custom config file
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Escape a value for the right hand side of a comparison
    #[command(arg_required_else_help = true)]
    Escape {
        /// Value to escape
        value: String,

        /// Treat `*` as a wildcard instead of escaping it
        #[arg(required = false, short, long)]
        pattern: bool,
    },

    /// Build a wildcard search over an entity's search fields
    #[command(arg_required_else_help = true)]
    #[clap(name = "search", visible_alias = "s")]
    Search {
        /// Entity to search
        entity: String,

        /// Search term
        term: String,

        /// Fields to search instead of the entity defaults
        #[arg(required = false, short, long = "field")]
        fields: Vec<String>,
    },

    /// Translate filter rows into a FIQL query
    #[command(arg_required_else_help = true)]
    #[clap(name = "build", visible_alias = "b")]
    Build {
        /// Entity the filters apply to
        entity: String,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Print the list endpoint URL for an entity
    #[command(arg_required_else_help = true)]
    Url {
        /// Entity to list
        entity: String,

        /// Free-text search over the entity's search fields
        #[arg(required = false, short, long)]
        search: Option<String>,

        #[command(flatten)]
        filters: FilterArgs,

        /// 1-based page number
        #[arg(required = false, long)]
        page: Option<u32>,

        /// Rows per page (defaults to page_size from the config)
        #[arg(required = false, short, long)]
        limit: Option<u32>,

        /// Sort as field or field:asc / field:desc, repeatable
        #[arg(required = false, long)]
        sort: Vec<String>,

        /// Override the configured base URL
        #[arg(required = false, short, long, value_hint = ValueHint::Url)]
        base_url: Option<String>,
    },

    /// Combine query fragments with AND (default) or OR
    #[command(arg_required_else_help = true)]
    Combine {
        /// Query fragments; blank ones are dropped
        #[arg(required = true)]
        parts: Vec<String>,

        /// Join with OR instead of AND
        #[arg(required = false, long)]
        or: bool,

        /// Parenthesise each fragment that has a bare separator
        #[arg(required = false, short, long)]
        group: bool,
    },

    /// Derive the display state of actions from JSON records
    #[clap(name = "action-state", visible_alias = "state")]
    ActionState {
        /// JSON file with one action, an array, or a paged response; stdin if omitted or `-`
        #[arg(required = false, value_hint = ValueHint::FilePath)]
        file: Option<String>,
    },

    /// List supported entities
    Entities,

    /// Print the resolved configuration
    Config,

    /// Generate a default configuration file
    #[clap(name = "defconfig")]
    DefConfig,
}

#[derive(clap::Args, Default)]
pub struct FilterArgs {
    /// Filter as field:operator:value, repeatable
    #[arg(required = false, short, long = "filter")]
    pub filters: Vec<String>,

    /// JSON file with an array of {field, operator, value} rows; `-` for stdin
    #[arg(required = false, long, value_hint = ValueHint::FilePath)]
    pub file: Option<String>,

    /// Map a UI field to a backend field as ui=backend, repeatable
    #[arg(required = false, short, long = "map")]
    pub maps: Vec<String>,

    /// Pass this field's values through without escaping, repeatable
    #[arg(required = false, short, long = "raw")]
    pub raws: Vec<String>,
}
