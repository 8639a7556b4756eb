// zhseg-tokenize: segment text from stdin into lexeme spans.
//
// Reads the whole of stdin, opens one tokenizer session over it and prints
// one line per lexeme: category alias, description, byte range, text.
//
// Usage:
//   zhseg-tokenize [OPTIONS]
//
// Options:
//   --data-dir PATH        Shared data directory (default /usr/share/zhseg)
//   --charset NAME         gbk or utf8 (default utf8)
//   --rules NAME           Rule file (NAME.ini) or "none" (default none)
//   --dicts LIST           Comma-separated .txt/.xdb dictionaries or "none"
//   --multi LIST           short,duality,zmain,zall or "none"
//   --ignore-punctuation   Skip punctuation lexemes
//   --duality              Segment uncovered characters in pairs
//   --in-memory            Load dictionaries into memory
//   -h, --help             Print help

use std::io::{self, Read, Write};

use zhseg_core::lextype::category_info;
use zhseg_engine::CharClassEngine;
use zhseg_parser::{SegParser, SharedDataResolver};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if zhseg_cli::wants_help(&args) {
        print_help();
        return;
    }

    zhseg_cli::init_tracing();

    let (data_dir, args) = zhseg_cli::parse_value_flag(&args, "--data-dir");
    let (charset, args) = zhseg_cli::parse_value_flag(&args, "--charset");
    let (rules, args) = zhseg_cli::parse_value_flag(&args, "--rules");
    let (dicts, args) = zhseg_cli::parse_value_flag(&args, "--dicts");
    let (multi, args) = zhseg_cli::parse_value_flag(&args, "--multi");
    let (ignore_punct, args) = zhseg_cli::parse_bool_flag(&args, "--ignore-punctuation");
    let (duality, args) = zhseg_cli::parse_bool_flag(&args, "--duality");
    let (in_memory, args) = zhseg_cli::parse_bool_flag(&args, "--in-memory");

    if let Some(unknown) = args.first() {
        zhseg_cli::fatal(&format!("unrecognized argument: {unknown}"));
    }

    let engine = CharClassEngine::new()
        .unwrap_or_else(|e| zhseg_cli::fatal(&format!("engine initialization failed: {e}")));
    let data_dir = data_dir.unwrap_or_else(|| zhseg_cli::DEFAULT_DATA_DIR.to_string());
    let mut parser = SegParser::new(engine, Box::new(SharedDataResolver::new(data_dir)));

    // Booleans first: dict_in_memory must be set before the dict compile.
    parser.set_punctuation_ignore(ignore_punct);
    parser.set_seg_with_duality(duality);
    parser.set_dict_in_memory(in_memory);

    let apply = |result: Result<(), zhseg_parser::ConfigError>| {
        if let Err(e) = result {
            zhseg_cli::fatal(&e.to_string());
        }
    };
    apply(parser.set_charset(charset.as_deref().unwrap_or("utf8")));
    apply(parser.set_rules(rules.as_deref().unwrap_or("none")));
    apply(parser.set_extra_dicts(dicts.as_deref().unwrap_or("none")));
    apply(parser.set_multi_mode(multi.as_deref().unwrap_or("none")));

    let mut input = Vec::new();
    io::stdin()
        .read_to_end(&mut input)
        .unwrap_or_else(|e| zhseg_cli::fatal(&format!("failed to read stdin: {e}")));

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    let mut session = parser.open_session(&input);
    loop {
        let span = session.next_lexeme();
        if span.is_end() {
            break;
        }
        let (alias, descr) = category_info(span.category).unwrap_or(("x", "unknown"));
        let text = String::from_utf8_lossy(span.bytes_of(&input));
        let display = text
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t");
        let end = span.off + span.len;
        let _ = writeln!(out, "{alias} {descr:13} [{:>4}..{end:>4}]: {display}", span.off);
    }
}

fn print_help() {
    println!("zhseg-tokenize: segment text into lexeme spans.");
    println!();
    println!("Usage: zhseg-tokenize [OPTIONS]");
    println!();
    println!("Reads text from stdin, prints one line per lexeme:");
    println!("  <alias> <description> [<start>..<end>]: <text>");
    println!();
    println!("Options:");
    println!("  --data-dir PATH        Shared data directory (default /usr/share/zhseg)");
    println!("  --charset NAME         gbk or utf8 (default utf8)");
    println!("  --rules NAME           Rule file (NAME.ini) or \"none\" (default none)");
    println!("  --dicts LIST           Comma-separated .txt/.xdb dictionaries or \"none\"");
    println!("  --multi LIST           short,duality,zmain,zall or \"none\"");
    println!("  --ignore-punctuation   Skip punctuation lexemes");
    println!("  --duality              Segment uncovered characters in pairs");
    println!("  --in-memory            Load dictionaries into memory");
    println!("  -h, --help             Print this help");
}
