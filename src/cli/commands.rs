use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tn", about = concat!("tessernote v", env!("CARGO_PKG_VERSION"), " - notes, filtered by #tags"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Notes server base URL (overrides config and TESSERNOTE_SERVER)
    #[arg(long, global = true, value_name = "URL")]
    pub server: Option<String>,

    /// Config file to read instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<String>,

    /// Use a built-in in-memory notebook instead of a server
    #[arg(long, global = true)]
    pub demo: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tags with note counts
    Tags(SelectionArgs),
    /// List note titles
    Titles(SelectionArgs),
    /// Show a note
    Show(ShowArgs),
    /// Create a note: first line is the title, the rest is the body
    New(NewArgs),
    /// Replace a note's text
    Edit(EditArgs),
    /// Delete a note
    Delete(DeleteArgs),
    /// Show the effective configuration, or write a starter file
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct SelectionArgs {
    /// Only notes carrying every one of these tags (without '#')
    pub tags: Vec<String>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Note id
    pub id: String,
    /// Print the body as the note pane shows it (with <br> breaks)
    #[arg(long)]
    pub display: bool,
}

#[derive(Args)]
pub struct NewArgs {
    /// Note text, or "-" to read it from stdin
    pub text: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Note id
    pub id: String,
    /// New note text, or "-" to read it from stdin
    pub text: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Note id
    pub id: String,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Write the effective configuration to the config path
    #[arg(long)]
    pub init: bool,
    /// Overwrite an existing file with --init
    #[arg(long)]
    pub force: bool,
}
