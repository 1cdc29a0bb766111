// ABOUTME: CLI binary for the HTML component module loader.
// ABOUTME: Transforms HTML files into module source and prints it, or writes it to a file.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use html_module_loader::{Loader, LoaderError, Options, Transformed};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "html-module-loader")]
#[command(about = "Transform web-component HTML into bundler module source")]
struct Args {
    /// JSON file with loader options (ignoreLinks, ignoreLinksFromPartialMatches, ignorePathReWrite)
    #[arg(long = "options")]
    options: Option<PathBuf>,

    /// Skip a link whose href matches exactly (repeatable)
    #[arg(long = "ignore-link")]
    ignore_links: Vec<String>,

    /// Skip any link whose href contains this text (repeatable)
    #[arg(long = "ignore-link-partial")]
    ignore_link_partials: Vec<String>,

    /// Do not add "./" to hrefs containing this text (repeatable)
    #[arg(long = "ignore-path-rewrite")]
    ignore_path_rewrites: Vec<String>,

    /// Module providing register() and toBody()
    #[arg(long = "register-helper")]
    register_helper: Option<String>,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Output as JSON objects with path, source and sourceMap
    #[arg(long = "json")]
    json_output: bool,

    /// Print elapsed time in ms to stderr
    #[arg(long = "timing")]
    timing: bool,

    /// Log debug events to stderr (RUST_LOG overrides)
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,

    /// HTML files to transform
    #[arg()]
    files: Vec<PathBuf>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FileOutput<'a> {
    path: String,
    #[serde(flatten)]
    result: &'a Transformed,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_options(args: &Args) -> Result<Options, String> {
    let mut opts = match &args.options {
        Some(path) => {
            let json = fs::read_to_string(path)
                .map_err(|e| format!("error reading options {:?}: {}", path, e))?;
            Options::from_json(&json).map_err(|e| format!("error in options {:?}: {}", path, e))?
        }
        None => Options::default(),
    };
    opts.ignore_links.extend(args.ignore_links.iter().cloned());
    opts.ignore_links_from_partial_matches
        .extend(args.ignore_link_partials.iter().cloned());
    opts.ignore_path_rewrite
        .extend(args.ignore_path_rewrites.iter().cloned());
    if let Some(helper) = &args.register_helper {
        opts.register_helper = helper.clone();
    }
    Ok(opts)
}

fn format_output(results: &[(String, Transformed)], json_output: bool) -> Result<String, String> {
    if json_output {
        let entries: Vec<FileOutput<'_>> = results
            .iter()
            .map(|(path, result)| FileOutput {
                path: path.clone(),
                result,
            })
            .collect();
        let json = if entries.len() == 1 {
            serde_json::to_string_pretty(&entries[0])
        } else {
            serde_json::to_string_pretty(&entries)
        };
        json.map_err(|e| format!("error encoding JSON: {}", e))
    } else {
        Ok(results
            .iter()
            .map(|(_, r)| r.source.as_str())
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.files.is_empty() {
        eprintln!("error: at least one HTML file is required");
        return ExitCode::from(1);
    }

    let loader = match load_options(&args).and_then(|o| Loader::new(o).map_err(|e| e.to_string())) {
        Ok(loader) => loader,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(1);
        }
    };

    let start = Instant::now();
    let mut results: Vec<(String, Transformed)> = Vec::new();
    let mut had_error = false;

    for path in &args.files {
        let display = path.display().to_string();
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("{}", LoaderError::io(display, "read file", Some(e.into())));
                had_error = true;
                continue;
            }
        };
        match loader.process_bytes(&bytes, &display) {
            Ok(result) => results.push((display, result)),
            Err(e) => {
                eprintln!("error transforming {}: {}", display, e);
                had_error = true;
            }
        }
    }

    let elapsed = start.elapsed();

    if !results.is_empty() {
        match format_output(&results, args.json_output) {
            Ok(output_str) => {
                if let Some(output_path) = &args.output {
                    if let Err(e) = fs::write(output_path, &output_str) {
                        eprintln!("error writing to {:?}: {}", output_path, e);
                        had_error = true;
                    }
                } else {
                    println!("{}", output_str);
                }
            }
            Err(e) => {
                eprintln!("{}", e);
                had_error = true;
            }
        }
    }

    if args.timing {
        let _ = writeln!(io::stderr(), "elapsed: {}ms", elapsed.as_millis());
    }

    if had_error {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
