// Criterion benchmarks for the tokenizer session protocol.
//
// Uses the bundled reference engine, so no external data is needed.
//
// Run:
//   cargo bench -p zhseg-parser

use criterion::{Criterion, criterion_group, criterion_main};

use zhseg_engine::CharClassEngine;
use zhseg_parser::{SegParser, SharedDataResolver};

fn build_parser() -> SegParser<CharClassEngine> {
    SegParser::new(
        CharClassEngine::new().expect("engine init"),
        Box::new(SharedDataResolver::new("/usr/share/zhseg")),
    )
}

fn sample_text() -> Vec<u8> {
    let sentence = "the 2024 report 中文分词 covers 15 cities, with notes. ";
    sentence.as_bytes().repeat(64)
}

/// Drain a full session over a mixed ASCII/Han buffer.
fn bench_session_drain(c: &mut Criterion) {
    let parser = build_parser();
    let text = sample_text();
    c.bench_function("session_drain", |b| {
        b.iter(|| {
            let mut session = parser.open_session(&text);
            let mut count = 0usize;
            loop {
                let span = session.next_lexeme();
                if span.is_end() {
                    break;
                }
                count += span.len;
            }
            count
        })
    });
}

/// Open and immediately drop sessions, measuring fork overhead.
fn bench_session_open(c: &mut Criterion) {
    let parser = build_parser();
    let text = sample_text();
    c.bench_function("session_open", |b| {
        b.iter(|| {
            let session = parser.open_session(&text);
            drop(session);
        })
    });
}

criterion_group!(benches, bench_session_drain, bench_session_open);
criterion_main!(benches);
