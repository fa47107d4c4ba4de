use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use dtp_types::Tier;

#[derive(Parser)]
#[command(
    name = "dtp",
    about = "Design token pipeline: build exports and review token changes",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory the token, baseline and export roots are relative to
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// TOML pipeline configuration
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Build export artifacts for each tier
    Build(BuildArgs),
    /// Render the visual comparison against the baseline
    Diff(DiffArgs),
    /// Report files and tokens removed since the baseline
    CheckRemovals(CheckArgs),
    /// Report deprecated folder layout problems
    CheckDeprecated(CheckArgs),
    /// Print the tiers touched by a list of changed files
    ChangedTiers(ChangedTiersArgs),
    /// Convert a saved design-tool variables response into token files
    Variables(VariablesArgs),
}

#[derive(Args)]
pub struct BuildArgs {
    /// Tiers to build (default: all)
    #[arg(long = "tier")]
    pub tiers: Vec<Tier>,
}

impl BuildArgs {
    pub fn tiers(&self) -> Vec<Tier> {
        if self.tiers.is_empty() {
            Tier::ALL.to_vec()
        } else {
            self.tiers.clone()
        }
    }
}

#[derive(Args)]
pub struct DiffArgs {}

#[derive(Args)]
pub struct CheckArgs {
    /// Exit with an error when issues are found
    #[arg(long)]
    pub strict: bool,
}

#[derive(Args)]
pub struct ChangedTiersArgs {
    pub files: Vec<String>,
}

#[derive(Args)]
pub struct VariablesArgs {
    /// Path to the saved local-variables response
    pub response: PathBuf,
    /// Output directory, relative to --root
    #[arg(long, default_value = "tokens")]
    pub out: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_build_all() {
        let cli = Cli::try_parse_from(["dtp", "build"]).unwrap();
        if let Command::Build(args) = cli.command {
            assert_eq!(args.tiers(), Tier::ALL.to_vec());
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_build_tiers() {
        let cli = Cli::try_parse_from(["dtp", "build", "--tier", "sys", "--tier", "base"]).unwrap();
        if let Command::Build(args) = cli.command {
            assert_eq!(args.tiers(), vec![Tier::Sys, Tier::Base]);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_build_rejects_unknown_tier() {
        assert!(Cli::try_parse_from(["dtp", "build", "--tier", "theme"]).is_err());
    }

    #[test]
    fn parse_diff_json() {
        let cli = Cli::try_parse_from(["dtp", "--format", "json", "diff"]).unwrap();
        assert!(matches!(cli.command, Command::Diff(_)));
        assert!(matches!(cli.format, OutputFormat::Json));
    }

    #[test]
    fn parse_checks() {
        let cli = Cli::try_parse_from(["dtp", "check-removals", "--strict"]).unwrap();
        if let Command::CheckRemovals(args) = cli.command {
            assert!(args.strict);
        } else { panic!("wrong command"); }
        let cli = Cli::try_parse_from(["dtp", "check-deprecated"]).unwrap();
        assert!(matches!(cli.command, Command::CheckDeprecated(_)));
    }

    #[test]
    fn parse_changed_tiers() {
        let cli = Cli::try_parse_from(["dtp", "changed-tiers", "tokens/base.json", "tokens/sys/a.json"]).unwrap();
        if let Command::ChangedTiers(args) = cli.command {
            assert_eq!(args.files.len(), 2);
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_variables() {
        let cli = Cli::try_parse_from(["dtp", "variables", "resp.json", "--out", "figma"]).unwrap();
        if let Command::Variables(args) = cli.command {
            assert_eq!(args.response, PathBuf::from("resp.json"));
            assert_eq!(args.out, PathBuf::from("figma"));
        } else { panic!("wrong command"); }
    }

    #[test]
    fn parse_global_options() {
        let cli = Cli::try_parse_from(["dtp", "diff", "--root", "/repo", "-v", "--config", "dtp.toml"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.root, PathBuf::from("/repo"));
        assert_eq!(cli.config, Some(PathBuf::from("dtp.toml")));
    }
}
