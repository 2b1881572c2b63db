use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "duodeck")]
#[command(author, version, about)]
#[command(long_about = "A markdown slide viewer with a synchronized presenter window.\n\n\
    Press N while presenting to open the presenter window with speaker\n\
    notes and an elapsed timer. Either window can drive the slides.\n\n\
    Examples:\n  \
    duodeck talk.md                   Launch presentation (fullscreen)\n  \
    duodeck talk.md --windowed        Launch in a window\n  \
    duodeck talk.md --presenter       Open the presenter window at start\n  \
    duodeck notes talk.md             Print the speaker notes")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Markdown file to present
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Launch in a window instead of fullscreen
    #[arg(long)]
    pub windowed: bool,

    /// Start on a specific slide (1-indexed)
    #[arg(long)]
    pub slide: Option<usize>,

    /// Speaker notes file (defaults to <deck>.notes.yaml next to the deck)
    #[arg(long)]
    pub notes: Option<PathBuf>,

    /// Open the presenter window right away
    #[arg(long)]
    pub presenter: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print the speaker notes of a deck with their target times
    Notes {
        /// Markdown file the notes belong to
        file: PathBuf,

        /// Speaker notes file (defaults to <deck>.notes.yaml next to the deck)
        #[arg(long)]
        notes: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.theme, timer.warning_after_secs)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Notes { file, notes }) => {
                crate::commands::notes::run(&file, notes.as_deref())
            }
            Some(Commands::Version) => {
                println!("duodeck {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
            None => {
                if let Some(file) = self.file {
                    if !file.exists() {
                        anyhow::bail!("File not found: {}", file.display());
                    }
                    crate::app::run(file, self.windowed, self.slide, self.notes, self.presenter)
                } else {
                    use clap::CommandFactory;
                    let mut cmd = Self::command();
                    cmd.print_help()?;
                    println!();
                    Ok(())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_present_flags() {
        let cli = Cli::try_parse_from([
            "duodeck",
            "talk.md",
            "--windowed",
            "--slide",
            "4",
            "--presenter",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("talk.md")));
        assert!(cli.windowed);
        assert!(cli.presenter);
        assert_eq!(cli.slide, Some(4));
        assert_eq!(cli.verbose, 2);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_notes_subcommand() {
        let cli =
            Cli::try_parse_from(["duodeck", "notes", "talk.md", "--notes", "extra.yaml"]).unwrap();
        match cli.command {
            Some(Commands::Notes { file, notes }) => {
                assert_eq!(file, PathBuf::from("talk.md"));
                assert_eq!(notes, Some(PathBuf::from("extra.yaml")));
            }
            _ => panic!("expected notes subcommand"),
        }
    }

    #[test]
    fn test_config_set_subcommand() {
        let cli = Cli::try_parse_from(["duodeck", "config", "set", "defaults.theme", "dark"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                command: ConfigCommands::Set { .. }
            })
        ));
    }
}
