use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sourcelint_core::{Config, RuleId, ScanReport, SourceMatch};
use sourcelint_engine::{read_jsonl, IncompleteScanner, PostSources, RuleSet};

/// sourcelint - Lint and repair the source links of image board posts
#[derive(Parser)]
#[command(name = "sourcelint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: sourcelint.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every enabled rule over a JSON lines dump
    Check {
        /// Input file, one {"post_id", "source"} object per line
        input: PathBuf,

        /// Output file for report.json
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Also output markdown report
        #[arg(short, long)]
        markdown: Option<PathBuf>,
    },

    /// Find posts whose sources hint at a submission but do not link it
    Candidates {
        /// Input file, one {"post_id", "source"} object per line
        input: PathBuf,

        /// Output file for the consolidated hints
        #[arg(short, long, default_value = "candidates.json")]
        output: PathBuf,
    },

    /// Show what the rules make of some source links
    Explain {
        /// Source links of a single post
        #[arg(required = true)]
        sources: Vec<String>,
    },

    /// List the rules and whether they are enabled
    Rules,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // .env is optional
    let _ = dotenvy::dotenv();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let config = load_config(cli.config.as_deref(), cli.verbose)?;

    match cli.command {
        Commands::Check { input, output, markdown } => {
            check_command(&config, &input, &output, markdown.as_deref(), cli.verbose)
        }
        Commands::Candidates { input, output } => candidates_command(&config, &input, &output, cli.verbose),
        Commands::Explain { sources } => explain_command(&config, &sources),
        Commands::Rules => rules_command(&config),
    }
}

/// `--config`, else `./sourcelint.toml`, else defaults
fn load_config(path: Option<&Path>, verbose: bool) -> Result<Config> {
    if let Some(path) = path {
        return Config::from_file(path).with_context(|| format!("Failed to load config {}", path.display()));
    }

    let local = Path::new("sourcelint.toml");
    if local.exists() {
        return Config::from_file(local).context("Failed to load sourcelint.toml");
    }

    if verbose {
        eprintln!("{}", "No config file found, using defaults".yellow());
    }
    Ok(Config::default())
}

fn load_posts(input: &Path, verbose: bool) -> Result<Vec<PostSources>> {
    if verbose {
        eprintln!("{} {}", "Loading posts from:".cyan(), input.display());
    }
    let posts = read_jsonl(input).with_context(|| format!("Failed to read {}", input.display()))?;
    if verbose {
        eprintln!("{} {} posts", "Loaded".cyan(), posts.len());
    }
    Ok(posts)
}

/// Check command - run the rule set and write the report
fn check_command(
    config: &Config,
    input: &Path,
    output: &Path,
    markdown: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let posts = load_posts(input, verbose)?;

    let rules = RuleSet::from_config(config).context("Failed to build rule set")?;
    if verbose {
        eprintln!("{} {} rules", "Running".cyan(), rules.len());
    }

    let report = rules.report(&posts)?;

    report
        .save_to_file(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    if verbose {
        eprintln!("{} {}", "Report saved to:".green(), output.display());
    }

    if let Some(md_path) = markdown {
        std::fs::write(md_path, generate_markdown_report(&report))
            .with_context(|| format!("Failed to write {}", md_path.display()))?;
        if verbose {
            eprintln!("{} {}", "Markdown report saved to:".green(), md_path.display());
        }
    }

    print_report_summary(&report);

    if report.has_matches() {
        std::process::exit(1);
    }
    Ok(())
}

/// Candidates command - consolidated hints per post
fn candidates_command(config: &Config, input: &Path, output: &Path, verbose: bool) -> Result<()> {
    let posts = load_posts(input, verbose)?;

    let found = IncompleteScanner::from_config(config).scan(&posts)?;

    let entries: Vec<serde_json::Value> = found
        .values()
        .map(|issues| {
            serde_json::json!({
                "post_id": issues.post_id,
                "claims": issues.unique_match_info(),
                "source_issues": issues.source_issues,
            })
        })
        .collect();

    let json = serde_json::to_string_pretty(&entries)?;
    std::fs::write(output, json).with_context(|| format!("Failed to write {}", output.display()))?;

    let claims: usize = found.values().map(|issues| issues.unique_match_info().len()).sum();
    println!(
        "{} {} of {} posts, {} lookups",
        "Candidates:".bold(),
        found.len().to_string().yellow(),
        posts.len(),
        claims
    );
    if verbose {
        eprintln!("{} {}", "Candidates saved to:".green(), output.display());
    }
    Ok(())
}

/// Explain command - run the rules on the given sources and print each hit
fn explain_command(config: &Config, sources: &[String]) -> Result<()> {
    let post = PostSources::from_sources("explain", sources);

    let scan = RuleSet::from_config(config)
        .context("Failed to build rule set")?
        .with_parallel(false)
        .run(&post)?;

    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Source Check".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    for source in post.raw_sources() {
        println!("  {}", source);
    }
    println!();

    if scan.matches.is_empty() {
        println!("{}", "✓ No rule matched".green());
    } else {
        for m in &scan.matches {
            print_match(m);
        }
    }

    for rule in scan.stats.rules() {
        if let Some(text) = scan.stats.report(rule) {
            println!("{} {}", "Seen:".dimmed(), text);
        }
    }

    if let Some(issues) = IncompleteScanner::from_config(config).scan_post(&post)? {
        println!();
        println!("{}", "Submission hints:".bold());
        for hint in issues.unique_match_info() {
            let user = hint.site_user_id.as_deref().unwrap_or("-");
            let link = hint.direct_image_link.as_deref().unwrap_or("-");
            println!("  {} user={} file={}", hint.site_id.cyan(), user, link);
        }
    }

    Ok(())
}

/// Rules command - list every rule id
fn rules_command(config: &Config) -> Result<()> {
    for rule in RuleId::ALL {
        let status = if config.rules.is_enabled(rule) {
            "enabled".green()
        } else {
            "disabled".red()
        };
        println!("{:<48} {:<5} {}", rule.as_str(), rule.shape().to_string(), status);
    }
    Ok(())
}

fn print_match(m: &SourceMatch) {
    let marker = if m.is_fixable() { "FIX".green() } else { "FLAG".yellow() };
    println!("{} {} - {}", marker.bold(), m.rule.to_string().bold(), m.reason);
    println!("  {} {}", "source:".dimmed(), m.source);
    if let Some(replacement) = &m.replacement {
        println!("  {} {}", "fix:   ".dimmed(), replacement.green());
    }
}

fn print_report_summary(report: &ScanReport) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Source Lint Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("{} {}", "Posts scanned:".bold(), report.summary.posts_scanned);
    println!("{} {}", "Posts with matches:".bold(), report.summary.posts_with_matches);
    println!("{} {}", "Total matches:".bold(), report.summary.total);
    println!("{} {}", "Auto-fixable:".bold(), report.summary.auto_fixable.to_string().green());
    println!();

    if !report.has_matches() {
        println!("{}", "✓ All sources look fine".green().bold());
        return;
    }

    println!("{}", "By rule:".bold());
    for totals in &report.by_rule {
        println!(
            "  {:<48} {:>6}  {:>5.1}% fixable",
            totals.rule.as_str(),
            totals.total.to_string().yellow(),
            totals.solvable_percent()
        );
    }

    if !report.rule_reports.is_empty() {
        println!();
        for rule_report in &report.rule_reports {
            println!("{}", rule_report.text.dimmed());
        }
    }
}

fn generate_markdown_report(report: &ScanReport) -> String {
    let mut md = String::new();

    md.push_str("# Source Lint Report\n\n");
    md.push_str(&format!("**Version:** {}\n\n", report.version));
    md.push_str(&format!("**Timestamp:** {}\n\n", report.timestamp));

    md.push_str("## Summary\n\n");
    md.push_str(&format!("- Posts scanned: {}\n", report.summary.posts_scanned));
    md.push_str(&format!("- Posts with matches: {}\n", report.summary.posts_with_matches));
    md.push_str(&format!("- Total matches: {}\n", report.summary.total));
    md.push_str(&format!("- Auto-fixable: {}\n", report.summary.auto_fixable));
    md.push('\n');

    if !report.has_matches() {
        md.push_str("✅ **No issues found!**\n");
        return md;
    }

    md.push_str("## By Rule\n\n");
    md.push_str("| Rule | Matches | Fixable |\n");
    md.push_str("|---|---:|---:|\n");
    for totals in &report.by_rule {
        md.push_str(&format!(
            "| `{}` | {} | {:.1}% |\n",
            totals.rule,
            totals.total,
            totals.solvable_percent()
        ));
    }
    md.push('\n');

    if !report.rule_reports.is_empty() {
        md.push_str("## Observed Values\n\n");
        for rule_report in &report.rule_reports {
            md.push_str(&format!("- {}\n", rule_report.text));
        }
        md.push('\n');
    }

    md.push_str("## Matches\n\n");
    for (post_id, matches) in &report.matches {
        md.push_str(&format!("### Post {}\n\n", post_id));
        for m in matches {
            md.push_str(&format!("- `{}`: {}\n", m.rule, m.reason));
            md.push_str(&format!("  - Source: `{}`\n", m.source));
            if let Some(replacement) = &m.replacement {
                md.push_str(&format!("  - Fix: `{}`\n", replacement));
            }
        }
        md.push('\n');
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn markdown_lists_fixes() {
        let rules = RuleSet::from_config(&Config::default()).unwrap().with_parallel(false);
        let posts = vec![PostSources::from_sources("1", &["http://twitter.com/artist/status/1"])];
        let report = rules.report(&posts).unwrap();

        let md = generate_markdown_report(&report);
        assert!(md.contains("# Source Lint Report"));
        assert!(md.contains("### Post 1"));
        assert!(md.contains("`protocols.InsecureProtocol`"));
        assert!(md.contains("Fix: `https://twitter.com/artist/status/1`"));
    }

    #[test]
    fn markdown_without_matches() {
        let report = RuleSet::from_config(&Config::default())
            .unwrap()
            .report(&[PostSources::from_sources("1", &["https://twitter.com/artist/status/1"])])
            .unwrap();
        assert!(generate_markdown_report(&report).contains("No issues found"));
    }

    #[test]
    fn explicit_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[rules]\ndisabled = [\"protocols.InsecureProtocol\"]\n").unwrap();

        let config = load_config(Some(&path), false).unwrap();
        assert!(!config.rules.is_enabled(RuleId::InsecureProtocol));

        assert!(load_config(Some(&dir.path().join("missing.toml")), false).is_err());
    }
}
