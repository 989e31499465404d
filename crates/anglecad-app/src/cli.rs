//! Command-line arguments.

use anglecad_core::ToolKind;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "anglecad",
    version,
    about = "Place straight lines at a given angle from scripted or typed input",
    long_about = "Hosts the line-angle tool without a window. Input events come from a JSON \
                  script or from stdin, one per line (\"move x y\", \"click x y [right]\", \
                  \"undo\", \"redo\", \"tool <kind>\", or any command-line text such as \
                  \"angle\", \"45\", \"10,10\"). The resulting drawing is written as JSON."
)]
pub struct Cli {
    /// Tool to start with: angle, horizontal or vertical
    #[arg(short, long, default_value = "angle")]
    pub tool: ToolKind,

    /// Settings file (defaults to the platform config directory)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// JSON array of session events; reads stdin lines when absent
    #[arg(short, long, value_name = "PATH")]
    pub script: Option<PathBuf>,

    /// Where to write the document JSON (stdout when absent)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Print the effective settings and exit
    #[arg(long)]
    pub print_config: bool,
}
