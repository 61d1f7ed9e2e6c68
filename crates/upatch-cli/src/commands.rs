use std::borrow::Cow;
use std::fs;
use std::io::{self, BufWriter, IsTerminal, Read, Write};
use std::path::Path;

use anyhow::Context;
use colored::{Color, Colorize};
use tracing::debug;
use upatch_diff::{Endpoint, PatchConfig, PatchWriter};

use crate::cli::*;
use crate::source::{self, Comparison, Entry};

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Diff(args) => cmd_diff(args),
        Command::Hash(args) => cmd_hash(args),
    }
}

fn cmd_diff(args: DiffArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args)?;
    let comparisons = source::collect(&args.old, &args.new)?;
    debug!(count = comparisons.len(), "collected comparisons");

    let color = match args.color {
        ColorChoice::Always => true,
        ColorChoice::Auto => {
            io::stdout().is_terminal() && colored::control::SHOULD_COLORIZE.should_colorize()
        }
        ColorChoice::Never => false,
    };

    if color {
        let patch = render(Vec::new(), &config, &comparisons, args.header_only)?;
        let stdout = io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        write_colored(&mut out, &patch).context("writing patch output")?;
        out.flush().context("flushing patch output")
    } else {
        let stdout = io::stdout();
        let mut out = render(BufWriter::new(stdout.lock()), &config, &comparisons, args.header_only)?;
        out.flush().context("flushing patch output")
    }
}

fn cmd_hash(args: HashArgs) -> anyhow::Result<()> {
    for path in &args.paths {
        let meta = fs::metadata(path).with_context(|| format!("cannot access {}", path.display()))?;
        let entries: Vec<Entry> = if meta.is_dir() {
            source::walk_tree(path)?.into_values().collect()
        } else {
            vec![Entry::load(path, path.clone())?]
        };
        for entry in entries {
            println!("{} {} {}", entry.id.to_hex().yellow(), entry.mode, entry.path.display());
        }
    }
    Ok(())
}

/// Configuration from the optional file, then command-line overrides.
fn resolve_config(args: &DiffArgs) -> anyhow::Result<PatchConfig> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => PatchConfig::default(),
    };
    if args.no_prefix {
        config.src_prefix.clear();
        config.dst_prefix.clear();
    }
    if let Some(prefix) = &args.src_prefix {
        config.src_prefix = prefix.clone();
    }
    if let Some(prefix) = &args.dst_prefix {
        config.dst_prefix = prefix.clone();
    }
    if let Some(context) = args.unified {
        config.differ.context_lines = context;
    }
    if let Some(algorithm) = args.algorithm {
        config.differ.algorithm = algorithm.into();
    }
    Ok(config)
}

pub fn load_config(path: &Path) -> anyhow::Result<PatchConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

/// Write one patch per changed comparison to `out`.
///
/// Content files are opened right before their comparison and closed once
/// it has been written.
pub fn render<W: Write>(
    out: W,
    config: &PatchConfig,
    comparisons: &[Comparison],
    header_only: bool,
) -> anyhow::Result<W> {
    let mut writer = PatchWriter::from_config(out, config);
    for cmp in comparisons {
        if cmp.is_unchanged() {
            debug!(comparison = %cmp.describe(), "unchanged, skipping");
            continue;
        }
        let src = endpoint(cmp.src.as_ref(), header_only)?;
        let dst = endpoint(cmp.dst.as_ref(), header_only)?;
        let written = if header_only {
            writer.write_header(&src, &dst)
        } else {
            writer.write_patch(src, dst)
        };
        written.with_context(|| format!("diffing {}", cmp.describe()))?;
    }
    Ok(writer.into_inner())
}

fn endpoint(entry: Option<&Entry>, header_only: bool) -> anyhow::Result<Endpoint<Box<dyn Read>>> {
    let Some(entry) = entry else {
        return Ok(Endpoint::Absent);
    };
    let content: Box<dyn Read> = if header_only {
        Box::new(io::empty())
    } else {
        entry
            .open()
            .with_context(|| format!("opening {}", entry.location.display()))?
    };
    Ok(Endpoint::Present(entry.to_object(content)))
}

/// How one patch line is highlighted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LineStyle {
    Header,
    Hunk,
    Added,
    Removed,
    Plain,
}

/// Copy `patch` to `out` with ANSI colors, one line at a time.
///
/// Lines are written as raw bytes, so content that is not UTF-8 comes out
/// exactly as the engine produced it.
fn write_colored<W: Write>(out: &mut W, patch: &[u8]) -> io::Result<()> {
    if patch.is_empty() {
        return Ok(());
    }
    let mut in_header = false;
    let body = patch.strip_suffix(b"\n").unwrap_or(patch);
    for line in body.split(|&b| b == b'\n') {
        let code = match classify(line, &mut in_header) {
            LineStyle::Header => Cow::Borrowed("1"),
            LineStyle::Hunk => Color::Cyan.to_fg_str(),
            LineStyle::Added => Color::Green.to_fg_str(),
            LineStyle::Removed => Color::Red.to_fg_str(),
            LineStyle::Plain => {
                out.write_all(line)?;
                out.write_all(b"\n")?;
                continue;
            }
        };
        write!(out, "\x1b[{code}m")?;
        out.write_all(line)?;
        out.write_all(b"\x1b[0m\n")?;
    }
    Ok(())
}

/// The header block runs from `diff --git` through `+++`.
fn classify(line: &[u8], in_header: &mut bool) -> LineStyle {
    if line.starts_with(b"diff --git ") {
        *in_header = true;
    }
    if *in_header {
        if line.starts_with(b"+++ ") {
            *in_header = false;
        }
        return LineStyle::Header;
    }
    match line.first() {
        Some(b'@') => LineStyle::Hunk,
        Some(b'+') => LineStyle::Added,
        Some(b'-') => LineStyle::Removed,
        _ => LineStyle::Plain,
    }
}
