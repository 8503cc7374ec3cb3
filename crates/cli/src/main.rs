// ABOUTME: CLI for parsing OPDS catalogs using the zimcat-opds parser.
// ABOUTME: Reads catalog XML from files or stdin and prints JSON for verification.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use clap::Parser;
use serde_json::{json, Value};
use zimcat_opds::{parse_catalog_bytes, resolve_catalog_href, Catalog};

/// Parse one or more OPDS catalog documents and output JSON.
#[derive(Parser, Debug)]
#[command(name = "zimcat")]
#[command(about = "Parse Zim library catalogs and print JSON", long_about = None)]
struct Args {
    /// Catalog file path(s). Use "-" to read one catalog from stdin.
    #[arg(required = true)]
    targets: Vec<String>,

    /// Library base URL for resolving relative download/icon hrefs in the output.
    #[arg(long)]
    base_url: Option<String>,

    /// Output compact JSON instead of pretty.
    #[arg(long, default_value_t = false)]
    compact: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.targets.iter().filter(|t| t.as_str() == "-").count() > 1 {
        bail!("stdin (\"-\") may only be given once");
    }

    let mut results = Vec::new();

    for target in &args.targets {
        match load_bytes(target).and_then(|bytes| parse_catalog_bytes(&bytes).map_err(anyhow::Error::new)) {
            Ok(catalog) => results.push(json!({
                "target": target,
                "ok": true,
                "catalog": catalog_json(&catalog, args.base_url.as_deref()),
                "error": null
            })),
            Err(err) => results.push(json!({
                "target": target,
                "ok": false,
                "catalog": null,
                "error": err.to_string()
            })),
        }
    }

    // Output format:
    // - Single target and ok => emit the catalog object (easy to pipe)
    // - Otherwise emit an envelope with catalogs array and counts
    let output = if args.targets.len() == 1 {
        if let Some(first) = results.first() {
            if first.get("ok").and_then(Value::as_bool) == Some(true) {
                first.get("catalog").cloned().unwrap_or_else(|| json!({}))
            } else {
                json!({ "catalogs": results, "total_catalogs": 1, "parsed": 0, "failed": 1 })
            }
        } else {
            json!({})
        }
    } else {
        let parsed = results
            .iter()
            .filter(|r| r.get("ok").and_then(Value::as_bool) == Some(true))
            .count();
        let failed = results.len() - parsed;
        json!({
            "catalogs": results,
            "total_catalogs": results.len(),
            "parsed": parsed,
            "failed": failed
        })
    };

    if args.compact {
        println!("{}", serde_json::to_string(&output)?);
    } else {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(())
}

/// Serializes a catalog in document order. With a base URL, relative
/// download/icon hrefs are resolved in the printed output only; the parser's
/// own records stay verbatim.
fn catalog_json(catalog: &Catalog, base_url: Option<&str>) -> Value {
    let zim_files: Vec<Value> = catalog
        .iter()
        .map(|meta| {
            let mut value = serde_json::to_value(meta).unwrap_or_else(|_| json!({}));
            if let (Some(base), Some(obj)) = (base_url, value.as_object_mut()) {
                for key in ["url", "icon_url"] {
                    let href = obj.get(key).and_then(Value::as_str).unwrap_or("");
                    if let Some(resolved) = resolve_catalog_href(base, href) {
                        obj.insert(key.to_string(), Value::String(resolved));
                    }
                }
            }
            value
        })
        .collect();

    json!({
        "ids": catalog.ids(),
        "zim_files": zim_files
    })
}

fn load_bytes(target: &str) -> Result<Vec<u8>> {
    if target == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        return Ok(buf);
    }

    let path = PathBuf::from(target);
    if !path.exists() {
        return Err(anyhow!("file not found: {}", target));
    }
    Ok(fs::read(path)?)
}
