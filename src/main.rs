use std::io;
use std::panic;
use std::path::PathBuf;

use tracing::{debug, error, info, Level};

use datatable::column::SortDirection;
use datatable::fileio::Document;
use datatable::render::render_text;

const MAX_COL_WIDTH: usize = 40;

/// Options gathered from the command line
#[derive(Debug, Default)]
struct Args {
    file_path: Option<PathBuf>,
    page: Option<usize>,
    page_size: Option<usize>,
    sort: Option<(String, SortDirection)>,
    filters: Vec<(String, String)>,
    expand: Vec<String>,
    select: Vec<String>,
    select_all: bool,
    verbose: bool,
}

fn value_of(args: &[String], i: usize, flag: &str) -> String {
    match args.get(i + 1) {
        Some(v) => v.clone(),
        None => {
            eprintln!("Error: {} requires an argument", flag);
            std::process::exit(1);
        }
    }
}

fn number_of(args: &[String], i: usize, flag: &str) -> usize {
    let raw = value_of(args, i, flag);
    match raw.parse() {
        Ok(n) => n,
        Err(_) => {
            eprintln!("Error: {} expects a number, got '{}'", flag, raw);
            std::process::exit(1);
        }
    }
}

/// Parse `FIELD[:asc|:desc]`
fn parse_sort(s: &str) -> (String, SortDirection) {
    match s.rsplit_once(':') {
        Some((field, dir)) => match SortDirection::parse(dir) {
            Some(direction) => (field.to_string(), direction),
            None => {
                eprintln!("Invalid sort direction: '{}'. Use asc or desc.", dir);
                std::process::exit(1);
            }
        },
        None => (s.to_string(), SortDirection::Ascend),
    }
}

fn parse_args(args: &[String]) -> Args {
    let mut parsed = Args::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--page" => {
                parsed.page = Some(number_of(args, i, "--page"));
                i += 2;
            }
            "--page-size" => {
                parsed.page_size = Some(number_of(args, i, "--page-size"));
                i += 2;
            }
            "--sort" => {
                parsed.sort = Some(parse_sort(&value_of(args, i, "--sort")));
                i += 2;
            }
            "--filter" => {
                let raw = value_of(args, i, "--filter");
                match raw.split_once('=') {
                    Some((field, value)) => parsed.filters.push((field.to_string(), value.to_string())),
                    None => {
                        eprintln!("Error: --filter expects FIELD=VALUE, got '{}'", raw);
                        std::process::exit(1);
                    }
                }
                i += 2;
            }
            "--expand" => {
                parsed.expand.push(value_of(args, i, "--expand"));
                i += 2;
            }
            "--select" => {
                parsed.select.push(value_of(args, i, "--select"));
                i += 2;
            }
            "--select-all" => {
                parsed.select_all = true;
                i += 1;
            }
            "-v" | "--verbose" => {
                parsed.verbose = true;
                i += 1;
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            arg if arg.starts_with('-') => {
                eprintln!("Unknown option: {}", arg);
                std::process::exit(1);
            }
            _ => {
                parsed.file_path = Some(PathBuf::from(&args[i]));
                i += 1;
            }
        }
    }

    parsed
}

/// Handle panics gracefully
fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        if let Some(location) = info.location() {
            error!(
                file = location.file(),
                line = location.line(),
                "panic occured"
            );
        } else {
            error!("panic occured");
        }

        if let Some(s) = info.payload().downcast_ref::<&str>() {
            error!(message = %s);
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            error!(message = %s);
        }

        default_hook(info);
    }));
}

fn print_help() {
    eprintln!("datatable - print the filtered, sorted and paged view of a table document");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    datatable [OPTIONS] FILE");
    eprintln!();
    eprintln!("FILE is a .toml table document or a .csv/.tsv file.");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    --page <N>                 Show page N");
    eprintln!("    --page-size <N>            Rows per page");
    eprintln!("    --sort <FIELD[:asc|desc]>  Sort by a column");
    eprintln!("    --filter <FIELD=VALUE>     Add an active filter value (repeatable)");
    eprintln!("    --expand <KEY>             Expand a row (repeatable)");
    eprintln!("    --select <KEY>             Select a row (repeatable)");
    eprintln!("    --select-all               Select every row on the page");
    eprintln!("    -v, --verbose              Log recomputation and emitted events");
    eprintln!("    -h, --help                 Print this help message");
}

/// Events and recomputation are logged at debug level
fn log_level(verbose: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

fn main() -> io::Result<()> {
    let argv: Vec<String> = std::env::args().collect();
    let args = parse_args(&argv);

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(log_level(args.verbose))
        .init();
    info!("datatable started");

    install_panic_hook();

    let Some(file_path) = args.file_path else {
        print_help();
        std::process::exit(1);
    };

    let document = Document::load(&file_path).map_err(|e| {
        error!(error = %e, "Failed to load table");
        io::Error::new(io::ErrorKind::InvalidData, e)
    })?;
    let mut state = document.into_state();

    // Group filter values per column so each column sees one change
    let mut filter_columns: Vec<(String, Vec<String>)> = Vec::new();
    for (field, value) in args.filters {
        match filter_columns.iter_mut().find(|(f, _)| *f == field) {
            Some((_, values)) => values.push(value),
            None => filter_columns.push((field, vec![value])),
        }
    }
    for (field, values) in filter_columns {
        state.change_filter(&field, values);
    }

    if let Some((field, direction)) = args.sort {
        state.change_sorter(&field, Some(direction));
    }
    if let Some(page_size) = args.page_size {
        state.change_page_size(page_size);
    }
    if let Some(page) = args.page {
        state.change_page(page);
    }
    for key in &args.expand {
        state.toggle_expand(key);
    }
    for key in &args.select {
        state.select(key, true);
    }
    if args.select_all {
        state.select_all(true);
    }

    println!("{}", render_text(&mut state, MAX_COL_WIDTH));

    for event in state.take_events() {
        debug!(?event, "emitted");
    }

    Ok(())
}
