use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use html::{get_elements_by_name, ParseOptions};
use serde_json::{json, Value};
use tracing::{info, span, warn, Level};
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

struct Args {
    pub input: PathBuf,
    pub trace: bool,
    /// Extract the leading doc block instead of parsing markup
    pub jsdoc: bool,
    pub find: Option<String>,
    pub attr: Option<String>,
    pub max_depth: Option<usize>,
}

fn main() -> Result<()> {
    let args = parse_args().context("Could not parse arguments")?;
    if args.trace {
        tracing_subscriber::fmt::fmt()
            .with_span_events(FmtSpan::ACTIVE)
            .with_max_level(Level::TRACE)
            .with_env_filter(EnvFilter::from_default_env())
            .finish()
            .init();
        info!("Logger initialized");
    }
    if args.attr.is_some() && args.find.is_none() {
        bail!("--attr requires --find");
    }

    let span = span!(Level::DEBUG, "Scanning file", "{}", args.input.display());
    let _enter = span.enter();
    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("Could not read {}", args.input.display()))?;
    let output = if args.jsdoc {
        scan_jsdoc(&text)
    } else {
        scan_markup(&text, &args)?
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn parse_args() -> Result<Args, pico_args::Error> {
    let mut pargs = pico_args::Arguments::from_env();
    let args = Args {
        trace: pargs.contains(["--trace", "-t"]),
        jsdoc: pargs.contains("--jsdoc"),
        find: pargs.opt_value_from_str("--find")?,
        attr: pargs.opt_value_from_str("--attr")?,
        max_depth: pargs.opt_value_from_str("--max-depth")?,
        input: pargs.free_from_str()?,
    };
    Ok(args)
}

fn scan_markup(text: &str, args: &Args) -> Result<Value> {
    let document = html::parse_with_options(text, ParseOptions { max_depth: args.max_depth });
    let length = document.length;
    let content = document.into_result().context("Could not parse markup")?;
    if length < text.len() {
        warn!(at = length, "Stray close tag ends the document early");
    }

    let Some(name) = &args.find else {
        return Ok(json!({ "index": 0, "length": length, "content": content }));
    };
    let found = get_elements_by_name(&content, name);
    Ok(match &args.attr {
        None => serde_json::to_value(found)?,
        Some(keyword) => found
            .iter()
            .map(|e| {
                json!({
                    "index": e.index,
                    "value": e.get_attribute(keyword).and_then(|a| a.value()),
                })
            })
            .collect(),
    })
}

fn scan_jsdoc(text: &str) -> Value {
    let lines: Vec<&str> = text.lines().collect();
    let parts = jsdoc::parse_next(&lines);
    let srcmbr = jsdoc::SrcmbrDoc::from(&parts);
    json!({ "parts": parts, "srcmbr": srcmbr })
}
