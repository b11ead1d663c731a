use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "hivecheck", version, about = "Happy Hives? Swipe to classify hive health")]
pub struct Cli {
    #[arg(long, global = true, help = "Keep the leaderboard in memory only")]
    pub ephemeral: bool,
    #[arg(long, global = true, help = "Config file (default ~/.hivecheck/config.toml)")]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, help = "Use ASCII-only glyphs")]
    pub ascii: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Timed test; the result is ranked on the leaderboard.
    Play {
        #[arg(long)]
        name: String,
        #[arg(long, help = "Deck file (TOML); defaults to the built-in sample deck")]
        deck: Option<PathBuf>,
    },
    /// Two-card walkthrough with feedback after each swipe.
    Tutorial {
        #[arg(long)]
        name: Option<String>,
    },
    /// Print the ranked leaderboard.
    Leaderboard,
    /// Delete every leaderboard record.
    Reset {
        #[arg(long, short = 'y', help = "Skip the confirmation prompt")]
        yes: bool,
    },
}
