//! Command-line interface for hsml
//! This binary compiles hsml templates to HTML and dumps the intermediate stages for debugging.
//!
//! Usage:
//!   hsml compile `<path>` [-o `<out>`] [-f `<format>`] [-c `<config>`]  - Compile a file or every *.hsml file in a directory
//!   hsml check `<path>` [-c `<config>`]                             - Report compile errors without writing output
//!   hsml list-formats                                              - List all available output formats
//!
//! A `hsml.toml` in the working directory is layered over the built-in defaults; `--config`
//! layers a file on top of that. Set `RUST_LOG=debug` to see the pipeline logs.

use clap::{value_parser, Arg, ArgMatches, Command};
use hsml::hsml::config::{load_compile_options, CompileOptions};
use hsml::hsml::processor::{
    available_formats, process_source, OutputFormat, ProcessingError, ProcessingSpec,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

const TEMPLATE_EXTENSION: &str = "hsml";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config_arg = Arg::new("config")
        .long("config")
        .short('c')
        .help("Configuration file layered over the defaults")
        .value_parser(value_parser!(PathBuf));

    let matches = Command::new("hsml")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A compiler for hsml templates")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("compile")
                .about("Compile a template, or every template in a directory")
                .arg(
                    Arg::new("path")
                        .help("Path to an hsml file or a directory of hsml files")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .index(1),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Output file (or directory when compiling a directory)")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (e.g., 'html', 'ast-treeviz', 'lines-simple')")
                        .default_value("html"),
                )
                .arg(config_arg.clone()),
        )
        .subcommand(
            Command::new("check")
                .about("Check templates for errors")
                .arg(
                    Arg::new("path")
                        .help("Path to an hsml file or a directory of hsml files")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .index(1),
                )
                .arg(config_arg),
        )
        .subcommand(Command::new("list-formats").about("List available output formats"))
        .get_matches();

    // Handle subcommands
    match matches.subcommand() {
        Some(("compile", compile_matches)) => handle_compile_command(compile_matches),
        Some(("check", check_matches)) => handle_check_command(check_matches),
        Some(("list-formats", _)) => handle_list_formats_command(),
        _ => unreachable!(),
    }
}

/// Handle the compile command
fn handle_compile_command(matches: &ArgMatches) {
    let path = matches.get_one::<PathBuf>("path").unwrap();
    let output = matches.get_one::<PathBuf>("output");
    let format = matches.get_one::<String>("format").unwrap();
    let options = load_options(matches.get_one::<PathBuf>("config"));

    let spec = ProcessingSpec::from_string(format).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        eprintln!("Available formats: {}", available_formats().join(", "));
        process::exit(2);
    });

    if path.is_dir() {
        let out_dir = output.cloned().unwrap_or_else(|| path.clone());
        let failures = compile_directory(path, &out_dir, &spec, &options);
        if failures > 0 {
            process::exit(1);
        }
        return;
    }

    let result = compile_file(path, &spec, &options).unwrap_or_else(|message| {
        eprintln!("{}", message);
        process::exit(1);
    });

    match output {
        Some(out) => write_output(out, &result),
        None => print!("{}", result),
    }
}

/// Handle the check command
fn handle_check_command(matches: &ArgMatches) {
    let path = matches.get_one::<PathBuf>("path").unwrap();
    let options = load_options(matches.get_one::<PathBuf>("config"));

    let files = if path.is_dir() {
        templates_in(path)
    } else {
        vec![path.clone()]
    };

    let mut failures = 0;
    for file in &files {
        match compile_file(file, &ProcessingSpec::HTML, &options) {
            Ok(_) => println!("ok: {}", file.display()),
            Err(message) => {
                failures += 1;
                eprintln!("{}: {}", file.display(), message);
            }
        }
    }

    if failures > 0 {
        eprintln!("{} of {} templates failed", failures, files.len());
        process::exit(1);
    }
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    println!("Available output formats:\n");
    for format in available_formats() {
        println!("  {}", format);
    }
}

fn load_options(config: Option<&PathBuf>) -> CompileOptions {
    load_compile_options(".", config.map(PathBuf::as_path)).unwrap_or_else(|e| {
        eprintln!("Error loading configuration: {}", e);
        process::exit(2);
    })
}

/// Compile one file, returning the user-facing error text on failure.
fn compile_file(
    path: &Path,
    spec: &ProcessingSpec,
    options: &CompileOptions,
) -> Result<String, String> {
    let source = fs::read_to_string(path)
        .map_err(|e| format!("Error reading {}: {}", path.display(), e))?;

    process_source(&source, spec, options).map_err(|e| match e {
        ProcessingError::Compile(err) => err.render(&source),
        other => format!("Error: {}", other),
    })
}

/// Compile every template in `dir` into `out_dir`. Returns the number of failures.
fn compile_directory(
    dir: &Path,
    out_dir: &Path,
    spec: &ProcessingSpec,
    options: &CompileOptions,
) -> usize {
    if let Err(e) = fs::create_dir_all(out_dir) {
        eprintln!("Error creating {}: {}", out_dir.display(), e);
        process::exit(1);
    }

    let mut failures = 0;
    for file in templates_in(dir) {
        let Some(stem) = file.file_stem() else {
            continue;
        };
        let target = out_dir.join(format!(
            "{}.{}",
            stem.to_string_lossy(),
            output_extension(spec)
        ));

        match compile_file(&file, spec, options) {
            Ok(result) => {
                write_output(&target, &result);
                log::info!("{} -> {}", file.display(), target.display());
            }
            Err(message) => {
                failures += 1;
                eprintln!("{}: {}", file.display(), message);
            }
        }
    }
    failures
}

/// The `*.hsml` files directly inside `dir`, sorted by name.
fn templates_in(dir: &Path) -> Vec<PathBuf> {
    let entries = fs::read_dir(dir).unwrap_or_else(|e| {
        eprintln!("Error reading directory {}: {}", dir.display(), e);
        process::exit(1);
    });

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| {
            path.is_file()
                && path.extension().and_then(|ext| ext.to_str()) == Some(TEMPLATE_EXTENSION)
        })
        .collect();
    files.sort();
    files
}

fn output_extension(spec: &ProcessingSpec) -> &'static str {
    match spec.format {
        OutputFormat::Html => "html",
        OutputFormat::Json => "json",
        OutputFormat::Simple | OutputFormat::Treeviz => "txt",
    }
}

fn write_output(path: &Path, content: &str) {
    if let Err(e) = fs::write(path, content) {
        eprintln!("Error writing {}: {}", path.display(), e);
        process::exit(1);
    }
}
