//! `${...}` placeholder scanning for `Fn::Sub`
//!
//! Placeholders whose body starts with `!` are escapes: they are copied to the
//! output verbatim and never looked up.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::ResolveError;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]*)\}").unwrap());

/// Names referenced by the template string, in order of first appearance.
pub fn placeholders(template: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for caps in PLACEHOLDER_RE.captures_iter(template) {
        let Some(body) = caps.get(1) else { continue };
        let name = body.as_str().trim();
        if !is_escape(name) && !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

fn is_escape(body: &str) -> bool {
    body.starts_with('!')
}

/// Replace every non-escaped placeholder with the string `lookup` returns for it.
pub fn render<F>(template: &str, mut lookup: F) -> Result<String, ResolveError>
where
    F: FnMut(&str) -> Result<String, ResolveError>,
{
    let mut out = String::with_capacity(template.len());
    let mut last_end = 0;

    for caps in PLACEHOLDER_RE.captures_iter(template) {
        let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_str(&template[last_end..whole.start()]);

        let name = body.as_str().trim();
        if is_escape(name) {
            out.push_str(whole.as_str());
        } else {
            out.push_str(&lookup(name)?);
        }
        last_end = whole.end();
    }
    out.push_str(&template[last_end..]);

    Ok(out)
}
