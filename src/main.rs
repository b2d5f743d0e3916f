use clap::Parser;
use j2ref::{json, parse_path, scan_with, PathError, Position, ReferencePath, ScanOptions};

use std::io::{self, Read};

#[derive(Parser)]
#[command(
    name = "j2ref",
    about = "Convert JavaScript-style property paths into key lists",
    version,
    long_about = "Reads one path per line from stdin (e.g. `pets[3].name`) and prints \
                  its keys, matched text and JSON Pointer as JSON."
)]
struct Cli {
    /// Report the longest matching prefix of each line instead of
    /// requiring the whole line to be a path.
    #[arg(long)]
    prefix: bool,

    /// Byte offset within each line to start scanning from (implies --prefix).
    #[arg(long)]
    offset: Option<usize>,

    /// Use the first identifier found at or after the offset (implies --prefix).
    #[arg(long)]
    anywhere: bool,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pretty: bool,
}

impl Cli {
    fn scan_options(&self) -> Option<ScanOptions> {
        if !(self.prefix || self.anywhere || self.offset.is_some()) {
            return None;
        }
        let mut options = ScanOptions::default().at(self.offset.unwrap_or(0));
        if self.anywhere {
            options = options.anywhere();
        }
        Some(options)
    }
}

fn main() {
    let cli = Cli::parse();

    let mut input = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input) {
        eprintln!("error reading stdin: {}", e);
        std::process::exit(2);
    }

    let options = cli.scan_options();
    let mut failed = false;

    for (line_num, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let result = match options {
            Some(ref options) => scan_with(line, options).ok_or_else(|| no_match(line, options)),
            None => parse_path(line),
        };
        match result {
            Ok(path) => print_path(&path, cli.pretty),
            Err(err) => {
                failed = true;
                report(line_num, line, &err);
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}

fn print_path(path: &ReferencePath, pretty: bool) {
    if pretty {
        println!("{}", json::to_json_pretty(path));
    } else {
        println!("{}", json::to_json(path));
    }
}

fn no_match(line: &str, options: &ScanOptions) -> PathError {
    let mut err = PathError::no_match(line);
    if line.is_char_boundary(options.start_offset.min(line.len())) {
        let pos = Position::at(line, options.start_offset.min(line.len()));
        err.begin = pos;
        err.end = pos;
    }
    err
}

fn report(line_num: usize, line_text: &str, err: &PathError) {
    eprintln!("ERROR AT LINE {}:", line_num + 1);
    eprintln!("{}", line_text);

    // Build the underline
    let start_col = err.begin.column;
    let end_col = if err.end.column > err.begin.column {
        err.end.column
    } else {
        start_col + 1
    };

    let mut underline = String::new();
    for _ in 0..start_col {
        underline.push(' ');
    }
    underline.push('^');
    if end_col > start_col + 1 {
        for _ in (start_col + 1)..end_col {
            underline.push('_');
        }
    }

    eprintln!("{}", underline);
    eprintln!("{}", err.message);
    eprintln!();
}
