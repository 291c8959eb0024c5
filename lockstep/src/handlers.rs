use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use colored::Colorize;
use lockstep_core::crawl::{CrawlOptions, FetchSource, execute_crawl, generate_crawl_report};
use lockstep_core::fixture::GOLANG_SEED;
use lockstep_core::tree::{BinaryTree, same_tree, walk};
use lockstep_scanner::ClaimOrder;
use std::fs;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, warn};
use url::Url;

/// Install the fmt subscriber on stderr. Warnings only unless `verbose`;
/// colour only when stderr is a terminal.
pub fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    // A subscriber may already be installed (tests, embedding); keep that one.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init();
}

/// The banner goes to stdout, so it is skipped under `--quiet` and whenever
/// stdout carries machine-readable output.
pub fn wants_banner(matches: &ArgMatches) -> bool {
    if matches.get_flag("quiet") {
        return false;
    }
    match matches.subcommand() {
        Some(("crawl", sub)) => sub
            .get_one::<String>("format")
            .is_none_or(|format| format != "json"),
        _ => true,
    }
}

// Helper functions for crawl handler

/// Load seed URLs from either a file or a single URL argument, falling back to
/// the golang.org seed
pub fn load_urls_from_source(
    url: Option<&Url>,
    seeds_file: Option<&PathBuf>,
) -> Result<Vec<String>, String> {
    if let Some(seeds_file_path) = seeds_file {
        load_urls_from_file(seeds_file_path)
    } else if let Some(url) = url {
        Ok(vec![url.as_str().to_string()])
    } else {
        Ok(vec![GOLANG_SEED.to_string()])
    }
}

/// Load and parse URLs from a file
pub fn load_urls_from_file(path: &PathBuf) -> Result<Vec<String>, String> {
    let content = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read seeds file {}: {}", path.display(), e))?;

    let urls: Vec<String> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| parse_url_line(line.trim()))
        .collect();

    if urls.is_empty() {
        return Err(format!("No valid URLs found in {}", path.display()));
    }

    Ok(urls)
}

/// Parse a single line as a URL, trying to add http:// if needed
pub fn parse_url_line(line: &str) -> Option<String> {
    if Url::parse(line).is_ok() {
        return Some(line.to_string());
    }

    let with_scheme = format!("http://{}", line);
    if Url::parse(&with_scheme).is_ok() {
        return Some(with_scheme);
    }

    warn!("Skipping invalid URL '{}'", line);
    None
}

/// Build crawl options from the `crawl` subcommand's matches
pub fn crawl_options_from_args(sub_matches: &ArgMatches) -> Result<CrawlOptions> {
    let url = sub_matches.get_one::<Url>("url");
    let seeds_file = sub_matches.get_one::<PathBuf>("seeds-file");
    let max_depth = *sub_matches.get_one::<usize>("depth").unwrap_or(&4);
    let timeout_secs = *sub_matches.get_one::<u64>("timeout").unwrap_or(&10);
    let format = sub_matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("text");

    let urls = load_urls_from_source(url, seeds_file).map_err(|e| anyhow!(e))?;

    let source = if sub_matches.get_flag("http") {
        FetchSource::Http { timeout_secs }
    } else if let Some(path) = sub_matches.get_one::<String>("fixture") {
        FetchSource::Fixture(path.clone())
    } else {
        FetchSource::Bundled
    };

    let claim_order = if sub_matches.get_flag("claim-after-depth") {
        ClaimOrder::AfterDepthCheck
    } else {
        ClaimOrder::BeforeDepthCheck
    };

    Ok(CrawlOptions {
        urls,
        max_depth,
        claim_order,
        source,
        show_progress_bars: format == "text",
    })
}

pub async fn handle_crawl(sub_matches: &ArgMatches, quiet: bool) -> Result<()> {
    let options = crawl_options_from_args(sub_matches)?;
    let json = sub_matches
        .get_one::<String>("format")
        .is_some_and(|f| f == "json");

    if !quiet && !json {
        println!("\n🕷️  Crawling {} seed(s)", options.urls.len());
        println!("Max depth: {}", options.max_depth);
        let source = match &options.source {
            FetchSource::Bundled => "bundled golang.org fixture".to_string(),
            FetchSource::Fixture(path) => format!("fixture {}", path),
            FetchSource::Http { timeout_secs } => format!("http (timeout {}s)", timeout_secs),
        };
        println!("Source: {}", source);
        let claim = match options.claim_order {
            ClaimOrder::BeforeDepthCheck => "before depth check",
            ClaimOrder::AfterDepthCheck => "after depth check",
        };
        println!("Claim: {}\n", claim);
    }

    let progress_callback = Arc::new(move |msg: String| {
        if !quiet && !json {
            println!("{}", msg);
        }
    });

    let results = execute_crawl(options, Some(progress_callback))
        .await
        .context("Crawl failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        println!("\n{} Crawl complete!\n", "✓".green().bold());
        print!("{}", generate_crawl_report(&results));
    }

    Ok(())
}

fn shuffled_tree(k: i64, seed: u64) -> Result<Arc<BinaryTree>> {
    BinaryTree::shuffled(k, seed)
        .map(Arc::new)
        .ok_or_else(|| anyhow!("k = {} is out of range; 10k must fit in an i64", k))
}

/// Returns whether the two trees matched
pub async fn handle_same_tree(sub_matches: &ArgMatches, quiet: bool) -> Result<bool> {
    let left_k = *sub_matches.get_one::<i64>("left").unwrap_or(&1);
    let right_k = *sub_matches.get_one::<i64>("right").unwrap_or(&1);
    let seed = *sub_matches.get_one::<u64>("seed").unwrap_or(&0);

    let left = shuffled_tree(left_k, seed)?;
    let right = shuffled_tree(right_k, seed.wrapping_add(1))?;

    if !quiet {
        let left_values = walk(left.clone()).collect().await;
        let right_values = walk(right.clone()).collect().await;
        println!("{} {:?}", "left: ".blue(), left_values);
        println!("{} {:?}", "right:".blue(), right_values);
    }

    let same = same_tree(left, right).await;
    if same {
        println!("{} same tree", "✓".green().bold());
    } else {
        println!("{} different trees", "✗".red().bold());
    }

    Ok(same)
}
