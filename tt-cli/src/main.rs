//! Command-line interface for tagged text
//! This binary renders the publications declared by a spine file, and shows how single files parse.
//!
//! Usage:
//!   tt render `<spine>` [--config `<file>`] [--no-cache] [--quiet]   - Render every publication
//!   tt parse `<file>` [--format json|treeviz]                        - Print a parsed node array

use std::path::Path;
use std::process;

use clap::{Arg, ArgAction, ArgMatches, Command};
use log::debug;
use tt_compositor::{render, RenderReport};
use tt_config::{Loader, TtConfig};
use tt_parser::tt::formats::{to_persisted_string, to_treeviz_str};
use tt_parser::tt::DocumentLoader;

fn main() {
    let matches = Command::new("tt")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Render tagged text content through tagged text templates")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("render")
                .about("Render the publications declared by a spine file")
                .arg(
                    Arg::new("spine")
                        .help("Path to the spine file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("TOML file layered over the built-in configuration"),
                )
                .arg(
                    Arg::new("no-cache")
                        .long("no-cache")
                        .help("Parse every source file, without reading or writing the cache")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("quiet")
                        .long("quiet")
                        .short('q')
                        .help("Only log warnings and errors")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse one tagged text file and print its node array")
                .arg(
                    Arg::new("file")
                        .help("Path to the tagged text file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format")
                        .value_parser(["json", "treeviz"])
                        .default_value("treeviz"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("render", sub)) => {
            init_logging(sub.get_flag("quiet"));
            handle_render_command(sub);
        }
        Some(("parse", sub)) => {
            init_logging(false);
            let file = sub.get_one::<String>("file").expect("file is required");
            let format = sub.get_one::<String>("format").expect("format has a default");
            handle_parse_command(file, format);
        }
        _ => unreachable!("clap requires a subcommand"),
    }
}

fn init_logging(quiet: bool) {
    let level = if quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn load_config(matches: &ArgMatches) -> TtConfig {
    let mut loader = Loader::new();
    if let Some(path) = matches.get_one::<String>("config") {
        debug!("layering configuration file {}", path);
        loader = loader.with_file(path);
    }
    if matches.get_flag("no-cache") {
        loader = loader
            .set_override("cache.enabled", false)
            .unwrap_or_else(|e| {
                eprintln!("Configuration error: {}", e);
                process::exit(1);
            });
    }
    loader.build().unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        process::exit(1);
    })
}

/// Handle the render command
fn handle_render_command(matches: &ArgMatches) {
    let spine = matches.get_one::<String>("spine").expect("spine is required");
    let config = load_config(matches);
    let report = render(spine, &config).unwrap_or_else(|e| {
        eprintln!("Render error: {}", e);
        process::exit(1);
    });
    print!("{}", summary(&report));
}

/// Detected sources, `*` marking the ones reused from the cache, then the written files.
fn summary(report: &RenderReport) -> String {
    let mut out = String::from("Detected files (* = reused from cache):\n");
    for source in &report.sources {
        let marker = if source.from_cache { " *" } else { "" };
        out.push_str(&format!("  {}{}\n", source.path.display(), marker));
    }
    out.push_str("Written publications:\n");
    for path in &report.written {
        out.push_str(&format!("  {}\n", path.display()));
    }
    out
}

/// Handle the parse command
fn handle_parse_command(file: &str, format: &str) {
    let array = DocumentLoader::from_path(file)
        .map_err(|e| e.to_string())
        .and_then(|loader| loader.parse().map_err(|e| e.to_string()))
        .unwrap_or_else(|e| {
            eprintln!("Parse error: {}", e);
            process::exit(1);
        });

    let formatted = match format {
        "json" => to_persisted_string(&array).unwrap_or_else(|e| {
            eprintln!("Error formatting node array: {}", e);
            process::exit(1);
        }),
        _ => {
            let name = Path::new(file)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| file.to_string());
            to_treeviz_str(&array, &name)
        }
    };
    println!("{}", formatted);
}
