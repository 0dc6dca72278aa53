use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use mdsearch::{
    filters::parse_glob_list, open_project, replace_and_rescan, search_with_progress,
    LocalFileHost, ProjectSearchResult, SearchConfig, SearchError,
};

type Result<T> = std::result::Result<T, SearchError>;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct QueryArgs {
    /// Text to search for (a regular expression with --regex)
    query: String,

    /// Treat the query as a regular expression
    #[arg(short = 'r', long)]
    regex: bool,

    /// Match case exactly
    #[arg(short = 's', long)]
    case_sensitive: bool,

    /// Match whole words only (literal queries)
    #[arg(short = 'w', long)]
    whole_word: bool,

    /// Include globs, comma or space separated (e.g. "**/*.md, **/*.txt")
    #[arg(short = 'i', long)]
    include: Option<String>,

    /// Exclude globs, comma or space separated (e.g. "**/drafts/**")
    #[arg(short = 'x', long)]
    exclude: Option<String>,

    /// Root directory of the project
    #[arg(short = 'd', long, default_value = ".")]
    root: PathBuf,

    /// Bytes of preview context on each side of a match
    #[arg(short = 'C', long, default_value = "24")]
    context: usize,

    /// Configuration file layered under the CLI flags
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the project for a query
    Search {
        #[command(flatten)]
        query: QueryArgs,

        /// Show only statistics, not individual matches
        #[arg(long)]
        stats: bool,

        /// Emit the result set as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace every match across the project, then re-scan
    Replace {
        #[command(flatten)]
        query: QueryArgs,

        /// Text to insert in place of each match (verbatim, no
        /// backreferences)
        #[arg(short = 'R', long)]
        replacement: String,
    },
}

impl QueryArgs {
    fn into_config(self) -> Result<SearchConfig> {
        let cli_config = SearchConfig {
            query: self.query,
            case_sensitive: self.case_sensitive,
            whole_word: self.whole_word,
            use_regex: self.regex,
            include: self.include.as_deref().map(parse_glob_list).unwrap_or_default(),
            exclude: self.exclude.as_deref().map(parse_glob_list).unwrap_or_default(),
            root_path: self.root,
            preview_context: self.context,
            log_level: self.log_level,
        };

        match self.config {
            Some(path) => {
                let file_config = SearchConfig::load_from(Some(&path))
                    .map_err(|e| SearchError::config_error(e.to_string()))?;
                Ok(file_config.merge_with_cli(cli_config))
            }
            None => Ok(cli_config),
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { query, stats, json } => {
            let config = query.into_config()?;
            init_tracing(&config.log_level);

            let host = LocalFileHost::new();
            let tree = open_project(&host, &config.root_path)?;

            let progress = scan_progress();
            let result = search_with_progress(&host, &tree, &config, |current, total| {
                progress.set_length(total as u64);
                progress.set_position(current as u64);
            })
            .await?;
            progress.finish_and_clear();

            if json {
                println!("{}", serde_json::to_string_pretty(&result).unwrap());
            } else {
                print_search_results(&result, stats);
            }
            Ok(())
        }
        Commands::Replace { query, replacement } => {
            let config = query.into_config()?;
            init_tracing(&config.log_level);

            let host = LocalFileHost::new();
            let tree = open_project(&host, &config.root_path)?;

            let (summary, fresh) = replace_and_rescan(&host, &tree, &config, &replacement).await?;

            println!(
                "Replaced {} matches in {} files",
                summary.total_replaced.to_string().green(),
                summary.files_changed.to_string().green()
            );
            if !fresh.is_empty() {
                println!(
                    "{} {} matches remain after replacement",
                    "note:".yellow(),
                    fresh.total_matches
                );
            }
            Ok(())
        }
    }
}

fn init_tracing(log_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn scan_progress() -> ProgressBar {
    let progress = ProgressBar::new(0);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("[{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );
    progress
}

fn print_search_results(result: &ProjectSearchResult, stats_only: bool) {
    if result.is_empty() {
        println!("No matches found");
        return;
    }

    if !stats_only {
        for file_result in &result.file_results {
            println!(
                "\n{} ({} matches)",
                file_result.relative_path.blue(),
                file_result.matches.len()
            );
            for m in &file_result.matches {
                let location = format!("{}:{}", m.line, m.column);
                println!(
                    "  {}: {}{}{}",
                    location.green(),
                    one_line(&m.preview.before),
                    one_line(&m.preview.hit).red().bold(),
                    one_line(&m.preview.after)
                );
            }
        }
        println!();
    }

    println!(
        "Found {} matches in {} files",
        result.total_matches, result.files_with_matches
    );
}

/// Previews can straddle line breaks; flatten them for terminal output
fn one_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}
