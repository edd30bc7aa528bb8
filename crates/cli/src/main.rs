mod render;

use std::fs;
use std::path::Path;
use std::process;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use ticket_script_core::placeholder::placeholder_names;
use ticket_script_core::{
    Alignment, ElementKind, FontSize, ParseResult, Script, TicketElement, explain,
    generate_script, parse_script, to_pretty_json,
};
use ticket_script_project::{
    TicketProject, load_project_from_str, save_project_to_string, validate_project,
};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::render::{Format, print_summary, render_diagnostics};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "ticket-script",
    version,
    about = "Ticket script toolchain: generate, parse, and check BinaryOut printer scripts"
)]
struct Cli {
    /// Output mode: "pretty" for coloured terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG`
    /// takes precedence when set.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    // ── Layout → script ─────────────────────────────────────────────
    /// Generate the printer script for a project file or a bare element list.
    Generate {
        file: String,
        /// Include the originating element id of each line.
        #[arg(long)]
        annotate: bool,
    },

    // ── Script → layout ─────────────────────────────────────────────
    /// Parse a script and print the recovered elements.
    Parse { file: String },

    /// Replace a project's elements with those parsed from a script.
    /// The project is left untouched when nothing is recognised.
    Import {
        file: String,
        /// Project file to update (created with defaults if missing).
        #[arg(long)]
        into: String,
    },

    /// Check that a script is exactly what the generator would write for
    /// the layout it encodes (exit 1 if not). For CI.
    Check { file: String },

    // ── Reference / informational ───────────────────────────────────
    /// Describe a project's layout with placeholders filled in.
    Preview { file: String },

    /// Explain a diagnostic ID (e.g. TKS1001).
    Explain { id: String },
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let format = Format::resolve_or_detect(cli.output.as_deref());

    match cli.cmd {
        Cmd::Generate { file, annotate } => cmd_generate(&file, annotate, format)?,
        Cmd::Parse { file } => cmd_parse(&file, format)?,
        Cmd::Import { file, into } => cmd_import(&file, &into, format)?,
        Cmd::Check { file } => cmd_check(&file, format)?,
        Cmd::Preview { file } => cmd_preview(&file, format)?,
        Cmd::Explain { id } => cmd_explain(&id, format)?,
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_generate(file: &str, annotate: bool, format: Format) -> Result<()> {
    let script = read_script(file)?;
    info!(file, lines = script.lines.len(), "generated");

    match format {
        Format::Json => {
            let out = if annotate {
                serde_json::json!({ "script": script.text(), "lines": script.lines })
            } else {
                serde_json::json!({ "script": script.text() })
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            if annotate {
                for line in &script.lines {
                    match &line.element_id {
                        Some(id) => println!("{:<12} | {}", id, line.text),
                        None => println!("{:<12} | {}", "", line.text),
                    }
                }
            } else {
                println!("{script}");
            }
        }
    }
    Ok(())
}

fn cmd_parse(file: &str, format: Format) -> Result<()> {
    let input = read_file(file)?;
    let res = parse_script(&input);

    match format {
        Format::Json => {
            // Single valid JSON object to stdout.
            println!("{}", serde_json::to_string_pretty(&res)?);
        }
        Format::Pretty => {
            // Elements to stdout, diagnostics to stderr.
            println!("{}", to_pretty_json(&res.elements));
            render_diagnostics(&input, file, &res.diagnostics, format);
            print_summary(&res.diagnostics);
        }
    }

    exit_if_empty(&res);
    Ok(())
}

fn cmd_import(file: &str, into: &str, format: Format) -> Result<()> {
    let input = read_file(file)?;
    let res = parse_script(&input);

    if res.is_empty() {
        render_diagnostics(&input, file, &res.diagnostics, format);
        if format == Format::Pretty {
            print_summary(&res.diagnostics);
        }
        eprintln!("error: no ticket elements recognised in {file}; {into} left unchanged");
        process::exit(1);
    }

    let mut project = if Path::new(into).exists() {
        load_project_from_str(&read_file(into)?)
            .with_context(|| format!("failed to load project {into}"))?
    } else {
        debug!(into, "project file missing, starting from defaults");
        TicketProject::default()
    };
    let count = res.elements.len();
    project.elements = res.elements;
    fs::write(into, save_project_to_string(&project)?)
        .with_context(|| format!("failed to write {into}"))?;

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "status": "imported",
                "file": into,
                "elements": count,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            eprintln!("imported {count} elements into {into}");
        }
    }
    Ok(())
}

fn cmd_check(file: &str, format: Format) -> Result<()> {
    let input = read_file(file)?;
    let res = parse_script(&input);
    if res.is_empty() {
        render_diagnostics(&input, file, &res.diagnostics, format);
        bail!("no ticket elements recognised in {file}");
    }

    let canonical = generate_script(&res.elements).text();
    let actual = input.replace("\r\n", "\n");
    let ok = actual.trim_end() == canonical;

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "status": if ok { "canonical" } else { "not canonical" },
                "file": file,
                "elements": res.elements.len(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            if ok {
                eprintln!("canonical: {file}");
            } else {
                eprintln!("not canonical: {file}");
                if let Some((n, want, got)) = first_difference(&canonical, &actual) {
                    eprintln!("  line {n}:");
                    eprintln!("    expected: {want}");
                    eprintln!("    found:    {got}");
                }
            }
        }
    }

    if !ok {
        process::exit(1);
    }
    Ok(())
}

/// Summary of one element for `preview`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PreviewItem {
    kind: &'static str,
    align: Alignment,
    is_bold: bool,
    size: FontSize,
    /// Resolved text, image file name, or nothing for spacing.
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    /// Printed height for spacing; overlays are negative.
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<i32>,
    /// Height as drawn in the editor preview.
    #[serde(skip_serializing_if = "Option::is_none")]
    preview_height: Option<f64>,
    /// File an embedded image payload is exported under.
    #[serde(skip_serializing_if = "Option::is_none")]
    export: Option<String>,
    /// Placeholders with no sample value in the project.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    unresolved: Vec<String>,
}

fn cmd_preview(file: &str, format: Format) -> Result<()> {
    let project = load_project_from_str(&read_file(file)?)
        .with_context(|| format!("failed to load project {file}"))?;
    if let Err(e) = validate_project(&project) {
        eprintln!("warning: {e}");
    }

    let items: Vec<PreviewItem> = project
        .elements
        .iter()
        .map(|el| {
            let unresolved = el
                .text_content()
                .map(placeholder_names)
                .unwrap_or_default()
                .into_iter()
                .filter(|name| !project.variables.contains_key(*name))
                .map(str::to_string)
                .collect();
            let (kind, text) = match &el.kind {
                ElementKind::Text { content } => {
                    ("text", Some(project.resolve_placeholders(content)))
                }
                ElementKind::Image { .. } => ("image", el.image_file_name().map(str::to_string)),
                ElementKind::Spacing { .. } if el.is_overlay() => ("overlay", None),
                ElementKind::Spacing { .. } => ("feed", None),
            };
            PreviewItem {
                kind,
                align: el.align,
                is_bold: el.is_bold,
                size: el.size,
                text,
                height: el.spacing_height(),
                preview_height: project.preview_spacing(el),
                export: TicketProject::image_file_name(el),
                unresolved,
            }
        })
        .collect();

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "name": project.name,
                "width": project.width,
                "height": project.height,
                "elements": items,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            println!("{} ({}×{})", project.name, project.width, project.height);
            if items.is_empty() {
                println!("  (empty ticket)");
            }
            for item in &items {
                println!("  {}", describe(item));
            }
        }
    }
    Ok(())
}

fn cmd_explain(id: &str, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let text = explain(id);
            let out = serde_json::json!({
                "id": id,
                "explanation": text,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            // Explanation is the expected output, so it goes to stdout.
            if let Some(text) = explain(id) {
                use ariadne::Fmt;
                println!("{}: {}", id.fg(ariadne::Color::Cyan), text);
            } else {
                println!("{}: (no explanation available)", id);
            }
        }
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn read_file(path: &str) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {path}"))
}

/// Script for either a project file or a bare JSON array of elements.
fn read_script(path: &str) -> Result<Script> {
    let text = read_file(path)?;
    if text.trim_start().starts_with('[') {
        let elements: Vec<TicketElement> = serde_json::from_str(&text)
            .with_context(|| format!("{path} is not a valid element list"))?;
        return Ok(generate_script(&elements));
    }
    let project =
        load_project_from_str(&text).with_context(|| format!("failed to load project {path}"))?;
    Ok(project.script())
}

/// Exit with code 1 when the parse recognised nothing; callers must not
/// treat an empty layout as a successful import.
fn exit_if_empty(res: &ParseResult) {
    if res.is_empty() {
        process::exit(1);
    }
}

/// First differing line (1-based) between the canonical and actual scripts.
fn first_difference<'a>(
    canonical: &'a str,
    actual: &'a str,
) -> Option<(usize, &'a str, &'a str)> {
    let mut want = canonical.lines();
    let mut got = actual.trim_end().lines();
    let mut n = 0;
    loop {
        n += 1;
        match (want.next(), got.next()) {
            (None, None) => return None,
            (w, g) if w != g => return Some((n, w.unwrap_or("<end>"), g.unwrap_or("<end>"))),
            _ => {}
        }
    }
}

fn describe(item: &PreviewItem) -> String {
    let mut style = format!("{:?}", item.align).to_lowercase();
    if item.is_bold {
        style.push_str(" bold");
    }
    if item.size == FontSize::Large {
        style.push_str(" large");
    }
    match (item.kind, &item.text, item.height) {
        ("overlay", _, Some(h)) => format!(
            "[overlay] back {} (preview {:.0})",
            h.unsigned_abs(),
            item.preview_height.unwrap_or_default().abs()
        ),
        ("feed", _, Some(h)) => format!("[feed] {h}"),
        ("image", Some(name), _) => match &item.export {
            Some(export) => format!("[image {style}] {name} (embedded, exports as {export})"),
            None => format!("[image {style}] {name}"),
        },
        (kind, Some(text), _) if item.unresolved.is_empty() => {
            format!("[{kind} {style}] {}", text.replace('\n', "⏎"))
        }
        (kind, Some(text), _) => format!(
            "[{kind} {style}] {} (no sample for {})",
            text.replace('\n', "⏎"),
            item.unresolved.join(", ")
        ),
        (kind, None, _) => format!("[{kind} {style}]"),
    }
}
