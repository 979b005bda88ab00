//! Reads `k <key>` and `q <lo> <hi>` commands and prints the answer to every
//! range query on its own line.

mod command;
mod logger;

use std::collections::BTreeSet;
use std::fs;
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;
use std::process;
use std::time::Instant;

use anyhow::{Context, bail};
use clap::{ArgAction, Parser, ValueHint};
use osavl_tree::OSAvlTree;

use crate::command::{Command, Commands};

#[derive(Debug, Parser)]
#[clap(version, about)]
struct Options {
    /// File to read commands from. Reads stdin when omitted.
    #[clap(value_hint = ValueHint::FilePath)]
    input: Option<PathBuf>,
    /// Answer queries with the standard library's `BTreeSet` instead of the AVL tree.
    #[clap(long, conflicts_with = "verify")]
    reference: bool,
    /// Answer queries with both sets and fail on the first disagreement.
    #[clap(long)]
    verify: bool,
    /// Log the time spent processing commands.
    #[clap(long, env = "RANGE_QUERY_TIME")]
    time: bool,
    /// Enables verbose logging
    #[clap(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Options {
    fn mode(&self) -> Mode {
        if self.verify {
            Mode::Verify
        } else if self.reference {
            Mode::Reference
        } else {
            Mode::Tree
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Mode {
    Tree,
    Reference,
    Verify,
}

/// A set of keys able to count the keys in `[lo, hi]`.
trait RangeSet {
    fn insert(&mut self, key: i64);

    fn range_count(&self, lo: i64, hi: i64) -> usize;
}

impl RangeSet for OSAvlTree<i64> {
    fn insert(&mut self, key: i64) {
        OSAvlTree::insert(self, key);
    }

    fn range_count(&self, lo: i64, hi: i64) -> usize {
        osavl_tree::range_query(self, &lo, &hi)
    }
}

impl RangeSet for BTreeSet<i64> {
    fn insert(&mut self, key: i64) {
        BTreeSet::insert(self, key);
    }

    fn range_count(&self, lo: i64, hi: i64) -> usize {
        // `BTreeSet::range` panics on an inverted range.
        if lo > hi {
            return 0;
        }
        self.range(lo..=hi).count()
    }
}

/// Answers every query with both sets.
#[derive(Default)]
struct Verified {
    tree: OSAvlTree<i64>,
    reference: BTreeSet<i64>,
}

#[derive(Debug, Default, Eq, PartialEq)]
struct Summary {
    inserts: usize,
    queries: usize,
}

fn main() {
    let opts = Options::parse();
    logger::init(opts.verbose);

    if let Err(err) = run(&opts) {
        log::error!("{err:?}");
        process::exit(1);
    }
}

fn run(opts: &Options) -> anyhow::Result<()> {
    let input = read_input(opts)?;
    let mut out = BufWriter::new(io::stdout().lock());

    let start = Instant::now();
    let summary = process_commands(&input, opts.mode(), &mut out)?;
    let elapsed = start.elapsed();
    out.flush().context("failed to write query results")?;

    log::debug!(
        "processed {} inserts and {} queries",
        summary.inserts,
        summary.queries
    );
    if opts.time {
        log::info!("elapsed: {elapsed:?}");
    }
    Ok(())
}

fn read_input(opts: &Options) -> anyhow::Result<String> {
    match &opts.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}

fn process_commands(input: &str, mode: Mode, out: &mut impl Write) -> anyhow::Result<Summary> {
    log::debug!("answering queries with {mode:?}");
    match mode {
        Mode::Tree => apply(input, &mut OSAvlTree::new(), out),
        Mode::Reference => apply(input, &mut BTreeSet::new(), out),
        Mode::Verify => verify(input, &mut Verified::default(), out),
    }
}

fn apply(input: &str, set: &mut impl RangeSet, out: &mut impl Write) -> anyhow::Result<Summary> {
    let mut summary = Summary::default();
    for command in Commands::new(input) {
        match command.context("malformed input")? {
            Command::Insert(key) => {
                set.insert(key);
                summary.inserts += 1;
            }
            Command::Query { lo, hi } => {
                writeln!(out, "{}", set.range_count(lo, hi))?;
                summary.queries += 1;
            }
        }
    }
    Ok(summary)
}

fn verify(input: &str, sets: &mut Verified, out: &mut impl Write) -> anyhow::Result<Summary> {
    let mut summary = Summary::default();
    for command in Commands::new(input) {
        match command.context("malformed input")? {
            Command::Insert(key) => {
                sets.tree.insert(key);
                sets.reference.insert(key);
                summary.inserts += 1;
            }
            Command::Query { lo, hi } => {
                let actual = RangeSet::range_count(&sets.tree, lo, hi);
                let expected = RangeSet::range_count(&sets.reference, lo, hi);
                if actual != expected {
                    bail!(
                        "query {} `q {lo} {hi}`: tree counted {actual}, reference counted {expected}",
                        summary.queries + 1
                    );
                }
                writeln!(out, "{actual}")?;
                summary.queries += 1;
            }
        }
    }
    if sets.tree.len() != sets.reference.len() {
        bail!(
            "tree holds {} keys, reference holds {}",
            sets.tree.len(),
            sets.reference.len()
        );
    }
    Ok(summary)
}
