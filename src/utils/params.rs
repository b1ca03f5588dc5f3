use regex::Regex;
use std::sync::OnceLock;

use crate::error::{CommandError, Result};

/// Separator used by `params` and `format` on the wire and on disk.
pub const TOKEN_SEPARATOR: char = ',';

fn param_spec_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*):([A-Za-z0-9_\[\]]+)$").expect("static regex")
    })
}

/// Splits a comma separated field into its tokens. No escaping is applied, so
/// an empty string is a single empty token.
pub fn split_tokens(field: &str) -> Vec<&str> {
    field.split(TOKEN_SEPARATOR).collect()
}

/// Number of comma separated tokens in `field`.
pub fn arity(field: &str) -> usize {
    field.split(TOKEN_SEPARATOR).count()
}

/// Joins tokens into the canonical form: no whitespace around the commas.
pub fn join_tokens<I, S>(tokens: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parses a `name:format` pair such as `alt:float`.
pub fn parse_param_spec(spec: &str) -> Result<(String, String)> {
    let caps = param_spec_regex()
        .captures(spec.trim())
        .ok_or_else(|| {
            CommandError::InvalidTemplate(format!(
                "invalid parameter spec {:?}, expected name:format",
                spec
            ))
        })?;
    Ok((caps[1].to_string(), caps[2].to_string()))
}

/// Turns a list of `name:format` pairs into the `params`/`format` columns of a
/// template. An empty list yields no params and no format.
pub fn params_and_format(specs: &[String]) -> Result<(Option<String>, Option<String>)> {
    if specs.is_empty() {
        return Ok((None, None));
    }

    let mut names = Vec::with_capacity(specs.len());
    let mut formats = Vec::with_capacity(specs.len());
    for spec in specs {
        let (name, format) = parse_param_spec(spec)?;
        if names.contains(&name) {
            return Err(CommandError::InvalidTemplate(format!(
                "parameter {:?} declared twice",
                name
            )));
        }
        names.push(name);
        formats.push(format);
    }

    Ok((Some(join_tokens(&names)), Some(join_tokens(&formats))))
}
