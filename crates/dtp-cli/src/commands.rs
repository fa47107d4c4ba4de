use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use colored::Colorize;
use dtp_diff::{check_deprecated, check_removals, diff_sources};
use dtp_export::{BuildPipeline, FsSink};
use dtp_merge::FsTokenSource;
use dtp_report::{render_deprecation_report, render_removal_report, render_visual_report};
use dtp_sync::{changed_tiers, encode_config, join_tiers, token_files_from_variables, LocalVariablesResponse};
use dtp_types::PipelineConfig;
use serde::Serialize;
use tracing::info;

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let format = cli.format;
    match cli.command {
        Command::Build(args) => cmd_build(&config, &format, args),
        Command::Diff(_) => cmd_diff(&config, &format),
        Command::CheckRemovals(args) => cmd_check_removals(&config, &format, args),
        Command::CheckDeprecated(args) => cmd_check_deprecated(&config, &format, args),
        Command::ChangedTiers(args) => cmd_changed_tiers(&format, args),
        Command::Variables(args) => cmd_variables(&cli.root, args),
    }
}

/// The configuration file (or defaults) with every root resolved against `--root`.
fn load_config(cli: &Cli) -> anyhow::Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => PipelineConfig::default(),
    };
    config.paths = config.paths.rebase(&cli.root);
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn sources(config: &PipelineConfig) -> (FsTokenSource, FsTokenSource) {
    (
        FsTokenSource::new(config.paths.tokens.clone()),
        FsTokenSource::new(config.paths.baseline.clone()),
    )
}

fn cmd_build(config: &PipelineConfig, format: &OutputFormat, args: BuildArgs) -> anyhow::Result<()> {
    let source = FsTokenSource::new(config.paths.tokens.clone());
    let sink = FsSink::new(config.paths.export.clone());
    let pipeline = BuildPipeline::new(config.clone()).context("invalid pipeline configuration")?;
    let report = pipeline
        .run(&source, &sink, &args.tiers())
        .with_context(|| format!("building tokens from {}", config.paths.tokens.display()))?;

    if let OutputFormat::Json = format {
        return print_json(&report);
    }
    for artifact in &report.artifacts {
        println!("  {} {}", "wrote".green(), sink.path_of(&artifact.location).display());
    }
    for tier in &report.skipped {
        println!("  {} {} (no tokens)", "skipped".yellow(), tier.to_string().bold());
    }
    println!("{} Built {} artifacts", "✓".green().bold(), report.len().to_string().bold());
    Ok(())
}

fn cmd_diff(config: &PipelineConfig, format: &OutputFormat) -> anyhow::Result<()> {
    let (tokens, baseline) = sources(config);
    let diffs = diff_sources(&tokens, &baseline).with_context(|| {
        format!(
            "diffing {} against {}",
            config.paths.tokens.display(),
            config.paths.baseline.display()
        )
    })?;

    if let OutputFormat::Json = format {
        return print_json(&diffs);
    }
    let report = render_visual_report(&diffs);
    if report.is_empty() {
        info!("no visual changes");
    } else {
        print!("{report}");
    }
    Ok(())
}

fn cmd_check_removals(config: &PipelineConfig, format: &OutputFormat, args: CheckArgs) -> anyhow::Result<()> {
    let (tokens, baseline) = sources(config);
    let report = check_removals(&tokens, &baseline).context("checking for removed tokens")?;
    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text if report.is_empty() => {
            println!("{} No removed tokens.", "✓".green().bold())
        }
        OutputFormat::Text => print!("{}", render_removal_report(&report)),
    }
    if args.strict && !report.is_empty() {
        bail!(
            "{} removed files and {} removed tokens",
            report.missing_files.len(),
            report.removed_count()
        );
    }
    Ok(())
}

fn cmd_check_deprecated(config: &PipelineConfig, format: &OutputFormat, args: CheckArgs) -> anyhow::Result<()> {
    let (tokens, _) = sources(config);
    let report = check_deprecated(&tokens).context("checking deprecated tokens")?;
    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text if report.is_empty() => {
            println!("{} Deprecated structure matches main tokens.", "✓".green().bold())
        }
        OutputFormat::Text => print!("{}", render_deprecation_report(&report)),
    }
    if args.strict && !report.is_empty() {
        bail!("deprecated token structure has issues");
    }
    Ok(())
}

fn cmd_changed_tiers(format: &OutputFormat, args: ChangedTiersArgs) -> anyhow::Result<()> {
    let tiers = changed_tiers(&args.files);
    match format {
        OutputFormat::Json => print_json(&tiers),
        OutputFormat::Text => {
            println!("{}", join_tiers(&tiers));
            Ok(())
        }
    }
}

fn cmd_variables(root: &Path, args: VariablesArgs) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(&args.response)
        .with_context(|| format!("reading {}", args.response.display()))?;
    let response = LocalVariablesResponse::from_json(&text)
        .with_context(|| format!("parsing {}", args.response.display()))?;
    let files = token_files_from_variables(&response)?;

    let out: PathBuf = root.join(&args.out);
    std::fs::create_dir_all(&out).with_context(|| format!("creating {}", out.display()))?;
    for (name, tree) in &files {
        let path = out.join(name);
        std::fs::write(&path, encode_config(tree)?)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("  {} {}", "wrote".green(), path.display());
    }
    println!("{} Generated {} token files", "✓".green().bold(), files.len().to_string().bold());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn run(args: &[&str]) -> anyhow::Result<()> {
        run_command(Cli::try_parse_from(args).unwrap())
    }

    fn write(root: &Path, path: &str, text: &str) {
        let path = root.join(path);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, text).unwrap();
    }

    #[test]
    fn build_writes_exports_under_root() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "tokens/base/base.json", r#"{"base": {"unit": {"value": 8}}}"#);
        write(root, "tokens/sys/space.json", r#"{"sys": {"space": {"sm": {"value": "{unit}"}}}}"#);

        run(&["dtp", "build", "--root", root.to_str().unwrap()]).unwrap();

        let sys: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(root.join("export/web/sys.json")).unwrap()).unwrap();
        assert_eq!(sys["sys"]["space"]["sm"]["value"], "{base.unit}");
        assert!(root.join("export/base.json").is_file());
        assert!(!root.join("export/web/brand.json").exists());
    }

    #[test]
    fn config_file_overrides_paths() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "src/base.json", r#"{"base": {"unit": {"value": 8}}}"#);
        let config = root.join("dtp.toml");
        std::fs::write(&config, "[paths]\ntokens = \"src\"\nexport = \"dist\"\n").unwrap();

        run(&[
            "dtp",
            "build",
            "--root",
            root.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .unwrap();
        assert!(root.join("dist/base.json").is_file());
    }

    #[test]
    fn strict_removal_check_fails_on_removed_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(root, "tokens-base/base.json", r#"{"base": {"unit": {"value": 8}, "gap": {"value": 4}}}"#);
        write(root, "tokens/base.json", r#"{"base": {"unit": {"value": 8}}}"#);
        let root = root.to_str().unwrap();

        run(&["dtp", "check-removals", "--root", root]).unwrap();
        assert!(run(&["dtp", "check-removals", "--strict", "--root", root]).is_err());
        run(&["dtp", "--format", "json", "diff", "--root", root]).unwrap();
    }

    #[test]
    fn variables_writes_one_file_per_mode() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(
            root,
            "response.json",
            r#"{"meta": {
                "variableCollections": {"c": {"name": "sys", "modes": [{"modeId": "m", "name": "light"}]}},
                "variables": {"v": {"name": "gap/sm", "variableCollectionId": "c", "resolvedType": "FLOAT", "valuesByMode": {"m": 4}}}
            }}"#,
        );
        let response = root.join("response.json");
        run(&[
            "dtp",
            "variables",
            response.to_str().unwrap(),
            "--root",
            root.to_str().unwrap(),
            "--out",
            "figma",
        ])
        .unwrap();

        let file: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(root.join("figma/sys.light.json")).unwrap()).unwrap();
        assert_eq!(file["gap"]["sm"]["$value"], 4);
        assert_eq!(file["gap"]["sm"]["$type"], "number");
    }

    #[test]
    fn missing_config_file_is_reported_with_its_path() {
        let err = run(&["dtp", "build", "--config", "/definitely/missing/dtp.toml"]).unwrap_err();
        assert!(format!("{err:#}").contains("/definitely/missing/dtp.toml"));
    }
}
