//! Command-line task status viewer for speckit projects.
//!
//! Shows the next uncompleted tasks from a `tasks.md` checklist. When no
//! path is given, the file is auto-discovered from the latest
//! `specs/###-*/` feature directory of the enclosing repository.
//!
//! Exit codes: 0 success, 1 load/discovery failure, 2 parse errors.

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};

use sknext_parser::discovery::{discover_tasks_file, GitProbe};
use sknext_parser::tasks::constants::DEFAULT_TASK_COUNT;
use sknext_parser::tasks::{DocumentLoader, ParseOptions};

mod views;

fn main() {
    let matches = Command::new("sknext")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Task status viewer for speckit projects")
        .arg(
            Arg::new("path")
                .help("Path to the tasks.md file (auto-discovered if not provided)")
                .index(1),
        )
        .arg(
            Arg::new("count")
                .long("count")
                .short('n')
                .value_parser(clap::value_parser!(usize))
                .help("Number of tasks to display (default: 10)"),
        )
        .arg(
            Arg::new("phases-only")
                .long("phases-only")
                .action(ArgAction::SetTrue)
                .help("Show only phases with uncompleted work (no sections or tasks)"),
        )
        .arg(
            Arg::new("structure")
                .long("structure")
                .action(ArgAction::SetTrue)
                .help("Show phases and sections with uncompleted work (no tasks)"),
        )
        .arg(
            Arg::new("all-phases")
                .long("all-phases")
                .action(ArgAction::SetTrue)
                .help("Show all incomplete phases followed by next N tasks"),
        )
        .arg(
            Arg::new("tasks-only")
                .long("tasks-only")
                .action(ArgAction::SetTrue)
                .help("Show only task lines without phase or section headings"),
        )
        .arg(
            Arg::new("all")
                .long("all")
                .action(ArgAction::SetTrue)
                .help("Show all remaining tasks with full context (ignores -n)"),
        )
        .arg(
            Arg::new("lenient")
                .long("lenient")
                .action(ArgAction::SetTrue)
                .help("Skip unrecognized prose lines instead of reporting them"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .short('f')
                .default_value("text")
                .help("Output format: text or json"),
        )
        .get_matches();

    let count = matches
        .get_one::<usize>("count")
        .copied()
        .unwrap_or(DEFAULT_TASK_COUNT);

    let path = match matches.get_one::<String>("path") {
        Some(path) => PathBuf::from(path),
        None => {
            let cwd = std::env::current_dir().unwrap_or_else(|err| {
                eprintln!("Error: cannot determine current directory: {}", err);
                std::process::exit(1);
            });
            match discover_tasks_file(&cwd, &GitProbe::new()) {
                Ok(found) => {
                    println!("Found: {}\n", found.display());
                    found
                }
                Err(err) => {
                    eprintln!("Error: {}", err);
                    std::process::exit(1);
                }
            }
        }
    };

    let options = ParseOptions {
        strict: !matches.get_flag("lenient"),
        ..ParseOptions::default()
    };
    let document = match DocumentLoader::from_path(&path) {
        Ok(loader) => loader.parse_with(options),
        Err(err) => {
            eprintln!("Error: {}", err);
            std::process::exit(1);
        }
    };

    if !document.is_parsed() {
        eprintln!("Parse errors found:");
        for error in document.fatal_errors() {
            eprintln!(
                "  Line {}: {} - {}",
                error.line_number, error.kind, error.message
            );
            eprintln!("    {}", error.line_content);
        }
        std::process::exit(2);
    }

    match matches
        .get_one::<String>("format")
        .expect("format has a default value")
        .as_str()
    {
        "text" => {}
        "json" => {
            match serde_json::to_string_pretty(&document) {
                Ok(json) => println!("{}", json),
                Err(err) => {
                    eprintln!("Error: failed to serialize document: {}", err);
                    std::process::exit(1);
                }
            }
            return;
        }
        other => {
            eprintln!("Unknown format '{}': expected 'text' or 'json'", other);
            std::process::exit(1);
        }
    }

    let output = if matches.get_flag("phases-only") {
        views::phases_only_view(&document)
    } else if matches.get_flag("structure") {
        views::structure_view(&document)
    } else if matches.get_flag("all-phases") {
        views::combined_view(&document, count)
    } else if matches.get_flag("tasks-only") {
        views::tasks_only_view(&document, count)
    } else if matches.get_flag("all") {
        views::default_view(&document, usize::MAX)
    } else {
        views::default_view(&document, count)
    };
    print!("{}", output);
}
