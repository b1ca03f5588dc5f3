use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the command database (overrides OBC_COMMANDS_DB)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    /// Print records as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Command catalog operations
    Template {
        #[command(subcommand)]
        action: TemplateCommands,
    },
    /// Issue a command against a template
    ///
    /// Params are comma separated values, one per template parameter:
    ///   obc-commands issue 3 --params 1200.5,40
    Issue {
        /// Template ID
        template_id: i64,

        /// Comma separated parameter values
        #[arg(short, long)]
        params: Option<String>,
    },
    /// List issued commands, newest first
    Ls {
        /// Maximum number of results to show. Use 0 to show all commands.
        #[arg(short, long, default_value = "50")]
        limit: usize,

        /// Only commands with this status (PENDING, SENT, ACKNOWLEDGED, FAILED)
        #[arg(short, long)]
        status: Option<String>,

        /// Only commands created at or after this time
        #[arg(long)]
        since: Option<String>,

        /// Only commands issued against this template
        #[arg(short, long)]
        template: Option<i64>,
    },
    /// Show a single issued command
    Show {
        /// Command ID
        command_id: i64,
    },
    /// Update the status of an issued command
    Status {
        /// Command ID
        command_id: i64,

        /// New status (PENDING, SENT, ACKNOWLEDGED, FAILED)
        status: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum TemplateCommands {
    /// Add a command template to the catalog
    ///
    /// Parameters can be given as name:format pairs:
    ///   --param alt:float --param speed:int
    /// or as raw comma separated lists:
    ///   --params alt,speed --format float,int
    Add {
        /// Command name
        #[arg(short, long, required = true)]
        name: String,

        /// Parameter as name:format, repeatable
        #[arg(short = 'p', long = "param", conflicts_with_all = ["params", "format"])]
        param: Vec<String>,

        /// Comma separated parameter names
        #[arg(long)]
        params: Option<String>,

        /// Comma separated format tokens, one per parameter
        #[arg(long)]
        format: Option<String>,

        /// Size of the variable payload in bytes
        #[arg(long, default_value = "0")]
        data_size: i64,

        /// Total command size in bytes
        #[arg(long, required = true)]
        total_size: i64,
    },
    /// List all command templates
    Ls,
    /// Show a template and the commands issued against it
    Show {
        /// Template ID
        template_id: i64,
    },
}
