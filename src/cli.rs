//! Command-line surface

use clap::{Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ow")]
#[command(version, about = "Nextcloud command-line client for files in your local sync folder")]
pub struct Cli {
    /// Enable debug messages
    #[arg(short, long)]
    pub debug: bool,

    /// Config file (JSON); defaults to <config dir>/ow/config.json
    #[arg(short, long, env = "OW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Action to perform
    pub action: Action,

    /// Local path to operate on
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    /// Print an HTML link to the file
    #[value(name = "html-link", alias = "h")]
    HtmlLink,
    /// Print the file's internal link
    #[value(name = "internal-link", alias = "i")]
    InternalLink,
    /// Lock the file for exclusive editing
    #[value(name = "lock", alias = "l")]
    Lock,
    /// Share the image publicly and print a preview linking to the full size
    #[value(name = "quick-album", alias = "q")]
    QuickAlbum,
    /// Release a lock
    #[value(name = "unlock", alias = "u")]
    Unlock,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_possible_value() {
            Some(v) => f.write_str(v.get_name()),
            None => Ok(()),
        }
    }
}
