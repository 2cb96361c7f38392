pub mod run;

use crate::config::AppConfig;
use crate::error::Result;
use clap::{Parser, Subcommand};
use log::info;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "ballotbleach", version, about = "Score survey ballots for fraud risk and write reports")]
pub struct Cli {
    /// CSV or JSON file of ballots
    #[arg(long, env = "BALLOTBLEACH_DATA_FILE")]
    pub data_file: Option<PathBuf>,
    /// Directory the reports are written to
    #[arg(long, env = "BALLOTBLEACH_OUT_DIR")]
    pub out_dir: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Write every ballot with its score and explanation
    All,
    /// Write only the ballots under the clean cutoff
    Clean,
    /// Write chart inputs built from the clean ballots
    Charts,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::All => "all",
            Command::Clean => "clean",
            Command::Charts => "charts",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Cli {
    // No subcommand means a full report
    pub fn selected_command(&self) -> Command {
        self.command.unwrap_or(Command::All)
    }

    /// Flags win over whatever the environment lookup produced.
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(data_file) = &self.data_file {
            config.data_file = data_file.clone();
        }
        if let Some(out_dir) = &self.out_dir {
            config.out_dir = out_dir.clone();
        }
    }
}

// Route a command to its handler
pub async fn handle_command(config: &AppConfig, command: Command) -> Result<()> {
    info!("Received command: {}", command);
    let output = match command {
        Command::All => run::write_all_ballots(config).await?,
        Command::Clean => run::write_clean_ballots(config).await?,
        Command::Charts => run::write_chart_data(config).await?,
    };
    info!("Command {} finished, output at {}", command, output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn no_subcommand_runs_everything() {
        let cli = Cli::try_parse_from(["ballotbleach"]).unwrap();
        assert_eq!(cli.selected_command(), Command::All);
    }

    #[test]
    fn subcommands_parse_by_name() {
        for (name, expected) in [("all", Command::All), ("clean", Command::Clean), ("charts", Command::Charts)] {
            let cli = Cli::try_parse_from(["ballotbleach", name]).unwrap();
            assert_eq!(cli.selected_command(), expected);
            assert_eq!(expected.to_string(), name);
        }
    }

    #[test]
    fn help_and_typos_are_handled_by_the_parser() {
        let help = Cli::try_parse_from(["ballotbleach", "--help"]).unwrap_err();
        assert_eq!(help.kind(), ErrorKind::DisplayHelp);

        let typo = Cli::try_parse_from(["ballotbleach", "clen"]).unwrap_err();
        assert_eq!(typo.kind(), ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn path_flags_override_the_environment_config() {
        let cli = Cli::try_parse_from([
            "ballotbleach",
            "--data-file",
            "/srv/survey.json",
            "--out-dir",
            "/srv/out",
            "clean",
        ])
        .unwrap();
        let mut config = AppConfig::from_lookup(|_| None).unwrap();
        cli.apply_to(&mut config);
        assert_eq!(config.data_file, PathBuf::from("/srv/survey.json"));
        assert_eq!(config.out_dir, PathBuf::from("/srv/out"));
        assert_eq!(cli.selected_command(), Command::Clean);
    }

    #[test]
    fn command_line_is_well_formed() {
        use clap::CommandFactory;
        <Cli as CommandFactory>::command().debug_assert();
    }
}
