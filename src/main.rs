//! ferrite-decor - command-line entry point
//!
//! Decorates a markdown file with the user's decorator table and prints the
//! result as HTML.

use clap::Parser;
use ferrite_decor::config::load_registry;
use ferrite_decor::export::{generate_html_document, to_html};
use ferrite_decor::Result;
use log::info;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "ferrite-decor")]
#[command(about = "Decorate a markdown file and print it as HTML")]
#[command(version)]
struct Cli {
    /// File to decorate (reads stdin if omitted or `-`)
    file: Option<PathBuf>,

    /// Print only the nested span markup
    #[arg(long, conflicts_with = "stats")]
    fragment: bool,

    /// Print pass statistics instead of markup
    #[arg(long)]
    stats: bool,
}

impl Cli {
    /// The input file, or `None` for stdin.
    fn input(&self) -> Option<&Path> {
        self.file.as_deref().filter(|path| *path != Path::new("-"))
    }
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => Ok(std::fs::read_to_string(path)?),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn run(cli: &Cli) -> Result<String> {
    let buffer = read_input(cli.input())?;
    let registry = load_registry();
    info!(
        "Decorating {} bytes with {} decorators",
        buffer.len(),
        registry.len()
    );

    if cli.stats {
        let (tree, stats) = registry.build_tree(&buffer);
        return Ok(format!(
            "offered: {}\nplaced: {}\ndropped: {}\nskipped: {}\nnodes: {}\n",
            stats.offered,
            stats.placed,
            stats.dropped,
            stats.skipped,
            tree.node_count()
        ));
    }

    let rendered = registry.render(&buffer);
    if cli.fragment {
        return Ok(to_html(&rendered));
    }
    let title = cli
        .input()
        .and_then(Path::file_stem)
        .map(|s| s.to_string_lossy().into_owned());
    Ok(generate_html_document(&rendered, title.as_deref()))
}

fn main() -> ExitCode {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Usage errors exit with code 2.
    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => {
            print!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("ferrite-decor: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;
    use ferrite_decor::Error;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("ferrite-decor").chain(args.iter().copied()))
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_to_document_from_stdin() {
        let cli = parse(&[]).unwrap();
        assert!(!cli.fragment && !cli.stats);
        assert_eq!(cli.input(), None);
        assert_eq!(parse(&["-"]).unwrap().input(), None);
    }

    #[test]
    fn test_flags_and_file() {
        let cli = parse(&["--stats", "notes.md"]).unwrap();
        assert!(cli.stats);
        assert_eq!(cli.input(), Some(Path::new("notes.md")));
        assert!(parse(&["--fragment"]).unwrap().fragment);
    }

    #[test]
    fn test_usage_errors() {
        let unknown = parse(&["--verbose"]).unwrap_err();
        assert_eq!(unknown.kind(), ErrorKind::UnknownArgument);
        assert_eq!(unknown.exit_code(), 2);

        let both = parse(&["--fragment", "--stats"]).unwrap_err();
        assert_eq!(both.kind(), ErrorKind::ArgumentConflict);

        let extra = parse(&["a.md", "b.md"]).unwrap_err();
        assert_eq!(extra.exit_code(), 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let cli = parse(&["--fragment", "/definitely/not/here.md"]).unwrap();
        assert!(matches!(run(&cli), Err(Error::Io(_))));
    }

    #[test]
    fn test_run_stats_on_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("n.md");
        std::fs::write(&path, "**a** and `b`").unwrap();
        let cli = parse(&["--stats", path.to_str().unwrap()]).unwrap();
        let out = run(&cli).unwrap();
        assert!(out.starts_with("offered: "));
        assert!(out.contains("nodes: "));
    }
}
