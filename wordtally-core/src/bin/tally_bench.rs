//! Word Tally Benchmarking Tool
//!
//! Measures the text pipeline on a large text file, one message per line,
//! and prints the most frequent words at the end.
//!
//! ## What It Benchmarks
//!
//! 1. **Normalize**: per-token normalization of every whitespace-separated word
//! 2. **Tokenize**: raw lines to normalized tokens
//! 3. **Stem**: tokenize plus stemming of every token
//! 4. **Count**: keyword occurrences with the configured match mode
//! 5. **Tally**: full message ingestion into an in-memory store
//!
//! ## Usage
//!
//! ```bash
//! # Run every stage
//! ./target/release/tally_bench /path/to/chat.txt
//!
//! # A single stage
//! ./target/release/tally_bench /path/to/chat.txt stem
//!
//! # Keyword counting with a custom keyword
//! ./target/release/tally_bench /path/to/chat.txt count pizza
//!
//! # Inside-word matching, with debug logs
//! WORDTALLY_MATCH_MODE=embedded RUST_LOG=wordtally=debug \
//!     ./target/release/tally_bench /path/to/chat.txt count pizz
//! ```
//!
//! ## Example Output
//!
//! ```text
//! === Tally ===
//! --------------------------------
//! Mode        : Tally
//! Elapsed     : 0.412 s
//! Throughput  : 0.121 GiB/s
//! Tokens      : 8_912_004
//! Tokens/sec  : 21_631_077
//! --------------------------------
//! ```

use std::env;
use std::error::Error;
use std::fs;
use std::time::{Duration, Instant};

use tracing::info;
use tracing_subscriber::EnvFilter;
use wordtally_core::analyzer::keyword::KeywordMatcher;
use wordtally_core::analyzer::normalizer::WordNormalizer;
use wordtally_core::analyzer::stemmer::Stemmer;
use wordtally_core::analyzer::tokenizer::Tokenizer;
use wordtally_core::tally::{
    Abbreviations, KeyCountStore, MemoryStore, Scope, Stopwords, WordTally,
};
use wordtally_types::TallyConfig;

const WARMUP_RUNS: usize = 1;
const MEASURE_RUNS: usize = 5;
const TOP_WORDS: usize = 10;
const BENCH_SCOPE: Scope = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Normalize,
    Tokenize,
    Stem,
    Count,
    Tally,
    All,
}

impl Stage {
    fn parse(arg: Option<&str>) -> Option<Self> {
        Some(match arg {
            None | Some("all") => Stage::All,
            Some("normalize") => Stage::Normalize,
            Some("tokenize") => Stage::Tokenize,
            Some("stem") => Stage::Stem,
            Some("count") => Stage::Count,
            Some("tally") => Stage::Tally,
            Some(_) => return None,
        })
    }

    fn runs(self, other: Stage) -> bool {
        self == Stage::All || self == other
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let (Some(path), Some(stage)) = (
        args.get(1),
        Stage::parse(args.get(2).map(String::as_str)),
    ) else {
        eprintln!("Usage: tally_bench <path> [normalize|tokenize|stem|count|tally|all] [keyword]");
        std::process::exit(1);
    };
    let keyword = args.get(3).map_or("time", String::as_str);

    let config = TallyConfig::from_env()?;
    info!(target: "wordtally::bench", ?config, "Loaded configuration");

    println!("Loading file...");
    let input = fs::read_to_string(path)?;

    println!("File size: {}", fmt_bytes(input.len() as u64));
    println!("Lines:     {}\n", fmt_count(input.lines().count() as u64));

    if stage.runs(Stage::Normalize) {
        bench_normalize(&input);
    }
    if stage.runs(Stage::Tokenize) {
        bench_tokenize(&input);
    }
    if stage.runs(Stage::Stem) {
        bench_stem(&input);
    }
    if stage.runs(Stage::Count) {
        bench_count(&input, keyword, &config)?;
    }
    if stage.runs(Stage::Tally) {
        bench_tally(&input, config)?;
    }

    Ok(())
}

fn bench_normalize(input: &str) {
    let normalizer = WordNormalizer::default();
    let mut out = String::with_capacity(64);

    println!("=== Normalize ===");

    let mut words = 0u64;
    let mut run = || {
        let mut local = 0u64;
        for word in input.split_whitespace() {
            normalizer.normalize_into(word, &mut out);
            local += u64::from(!out.is_empty());
        }
        words = local;
        std::hint::black_box(words);
    };
    warmup(&mut run);
    let elapsed = measure(&mut run);

    print_perf("Normalize", input.len(), elapsed, words);
}

fn bench_tokenize(input: &str) {
    let tokenizer = Tokenizer::new();

    println!("=== Tokenize ===");

    let mut tokens = 0u64;
    let mut run = || {
        let mut local = 0u64;
        for line in input.lines() {
            tokenizer.tokenize_with(line, |_t, _p| {
                local += 1;
            });
        }
        tokens = local;
        std::hint::black_box(tokens);
    };
    warmup(&mut run);
    let elapsed = measure(&mut run);

    print_perf("Tokenize", input.len(), elapsed, tokens);
}

fn bench_stem(input: &str) {
    let tokenizer = Tokenizer::new();
    let stemmer = Stemmer::default();

    println!("=== Stem ===");

    let mut tokens = 0u64;
    let mut run = || {
        let mut local = 0u64;
        for line in input.lines() {
            tokenizer.tokenize_with(line, |t, _p| {
                std::hint::black_box(stemmer.stem(t));
                local += 1;
            });
        }
        tokens = local;
    };
    warmup(&mut run);
    let elapsed = measure(&mut run);

    print_perf("Stem", input.len(), elapsed, tokens);
}

fn bench_count(input: &str, keyword: &str, config: &TallyConfig) -> Result<(), Box<dyn Error>> {
    let tally = WordTally::with_config(*config);
    let rule = tally.rule_for(keyword, Vec::<String>::new());
    let matcher = KeywordMatcher::compile(&rule, tally.stemmer())?;

    println!("=== Count ({} / {}) ===", matcher.keyword(), matcher.mode());

    let mut hits = 0u64;
    let mut run = || {
        let mut local = 0u64;
        for line in input.lines() {
            local += matcher.count(line) as u64;
        }
        hits = local;
        std::hint::black_box(hits);
    };
    warmup(&mut run);
    let elapsed = measure(&mut run);

    print_perf("Count", input.len(), elapsed, 0);
    println!("Occurrences : {}\n", fmt_count(hits));
    Ok(())
}

fn bench_tally(input: &str, config: TallyConfig) -> Result<(), Box<dyn Error>> {
    let stopwords = Stopwords::core();
    let abbreviations: Abbreviations = [("gg", "good game"), ("brb", "be right back")]
        .into_iter()
        .collect();

    println!("=== Tally ===");

    let mut store = MemoryStore::new();
    let mut tally = WordTally::with_config(config);
    let mut failure = None;
    let mut run = || {
        store = MemoryStore::new();
        tally.reset_stats();
        for line in input.lines() {
            if let Err(e) = tally.record(&mut store, BENCH_SCOPE, line, &stopwords, &abbreviations)
            {
                failure = Some(e);
                return;
            }
        }
    };
    warmup(&mut run);
    let elapsed = measure(&mut run);

    if let Some(e) = failure {
        return Err(e.into());
    }

    let stats = tally.stats();
    print_perf("Tally", input.len(), elapsed, stats.tokens_seen);
    println!("Stats       : {stats}");
    println!("Distinct    : {}\n", fmt_count(store.words_in(BENCH_SCOPE) as u64));

    println!("Top {TOP_WORDS} words:");
    for (rank, wc) in store.top(BENCH_SCOPE, TOP_WORDS)?.iter().enumerate() {
        println!("{:>3}. {:<20} {}", rank + 1, wc.word, fmt_count(wc.count));
    }
    println!();

    Ok(())
}

fn warmup<F: FnMut()>(f: &mut F) {
    for _ in 0..WARMUP_RUNS {
        f();
    }
}

fn measure<F: FnMut()>(f: &mut F) -> Duration {
    let mut total = Duration::ZERO;

    for _ in 0..MEASURE_RUNS {
        let start = Instant::now();
        f();
        total += start.elapsed();
    }

    total / MEASURE_RUNS as u32
}

fn print_perf(label: &str, input_bytes: usize, elapsed: Duration, tokens: u64) {
    let secs = elapsed.as_secs_f64();
    let gib = input_bytes as f64 / (1024.0 * 1024.0 * 1024.0);

    println!("--------------------------------");
    println!("Mode        : {}", label);
    println!("Elapsed     : {:.3} s", secs);
    println!("Throughput  : {:.3} GiB/s", gib / secs);

    if tokens > 0 {
        println!("Tokens      : {}", fmt_count(tokens));
        println!("Tokens/sec  : {}", fmt_count((tokens as f64 / secs) as u64));
    }

    println!("--------------------------------\n");
}

fn fmt_bytes(b: u64) -> String {
    if b >= 1024 * 1024 * 1024 {
        format!("{:.2} GiB", b as f64 / (1024.0 * 1024.0 * 1024.0))
    } else if b >= 1024 * 1024 {
        format!("{:.2} MiB", b as f64 / (1024.0 * 1024.0))
    } else if b >= 1024 {
        format!("{:.2} KiB", b as f64 / 1024.0)
    } else {
        format!("{} B", b)
    }
}

fn fmt_count(n: u64) -> String {
    let s = n.to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);

    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push('_');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}
