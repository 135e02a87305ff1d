//! Environment-variable templates.
//!
//! Files in the template directory are expanded on every request. The only
//! data is the [`EnvSnapshot`], reached through field actions:
//!
//! ```text
//! Hello {{.USER}}          value of USER, empty when unset
//! {{.}}                    the whole snapshot as map[K1:V1 K2:V2]
//! {{/* note */}}           comment, renders nothing
//! a {{- .X -}} b           trim markers eat the surrounding whitespace
//! ```
//!
//! Substituted values are HTML-escaped; literal template text is emitted as is.

use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::env::EnvSnapshot;
use crate::routing::base_name;

#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("template {} not readable: {source}", path.display())]
    NotFound { path: PathBuf, source: io::Error },

    #[error("template syntax error at byte {offset}: {reason}")]
    Syntax { offset: usize, reason: String },

    #[error("template execution failed: {0}")]
    Exec(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Text(Vec<u8>),
    /// Field chain; empty means `{{.}}`.
    Field(Vec<String>),
}

/// A parsed template, ready to execute against a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    nodes: Vec<Node>,
}

const OPEN: &[u8] = b"{{";
const CLOSE: &[u8] = b"}}";

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | b'\n')
}

fn trim_start(mut s: &[u8]) -> &[u8] {
    while let [first, rest @ ..] = s {
        if !is_space(*first) {
            break;
        }
        s = rest;
    }
    s
}

fn trim_end(mut s: &[u8]) -> &[u8] {
    while let [rest @ .., last] = s {
        if !is_space(*last) {
            break;
        }
        s = rest;
    }
    s
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

impl Template {
    pub fn parse(source: &[u8]) -> Result<Self, TemplateError> {
        let syntax = |offset: usize, reason: &str| TemplateError::Syntax {
            offset,
            reason: reason.to_string(),
        };

        let mut nodes = Vec::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(open) = find(rest, OPEN) {
            let mut text = &rest[..open];
            let mut after = &rest[open + OPEN.len()..];
            let action_start = offset + open;

            if let [b'-', next, ..] = after {
                if is_space(*next) {
                    text = trim_end(text);
                    after = &after[1..];
                }
            }
            if !text.is_empty() {
                nodes.push(Node::Text(text.to_vec()));
            }

            let close = find(after, CLOSE).ok_or_else(|| syntax(action_start, "unclosed action"))?;
            let mut inner = &after[..close];
            rest = &after[close + CLOSE.len()..];

            if let [.., space, b'-'] = inner {
                if is_space(*space) {
                    inner = &inner[..inner.len() - 1];
                    rest = trim_start(rest);
                }
            }
            offset = source.len() - rest.len();

            let inner = trim_start(trim_end(inner));
            if inner.starts_with(b"/*") {
                if inner.len() < 4 || !inner.ends_with(b"*/") {
                    return Err(syntax(action_start, "unclosed comment"));
                }
                continue;
            }

            let inner = std::str::from_utf8(inner)
                .map_err(|_| syntax(action_start, "action is not valid UTF-8"))?;
            nodes.push(Self::parse_action(inner).map_err(|reason| syntax(action_start, &reason))?);
        }

        if !rest.is_empty() {
            nodes.push(Node::Text(rest.to_vec()));
        }

        Ok(Self { nodes })
    }

    fn parse_action(inner: &str) -> Result<Node, String> {
        if inner.is_empty() {
            return Err("missing value for command".to_string());
        }
        if inner == "." {
            return Ok(Node::Field(Vec::new()));
        }
        let Some(chain) = inner.strip_prefix('.') else {
            return Err(format!("unsupported action {inner:?}"));
        };
        let fields: Vec<String> = chain.split('.').map(str::to_string).collect();
        if let Some(bad) = fields.iter().find(|f| !is_identifier(f)) {
            return Err(format!("bad field name {bad:?} in {inner:?}"));
        }
        Ok(Node::Field(fields))
    }

    /// Expands the template. Unknown variables render as empty strings.
    pub fn execute(&self, env: &EnvSnapshot) -> Result<Vec<u8>, TemplateError> {
        let mut out = Vec::new();
        for node in &self.nodes {
            match node {
                Node::Text(text) => out.extend_from_slice(text),
                Node::Field(fields) => match fields.as_slice() {
                    [] => {
                        let dump = env
                            .iter()
                            .map(|(k, v)| format!("{k}:{v}"))
                            .collect::<Vec<_>>()
                            .join(" ");
                        escape_html_into(&format!("map[{dump}]"), &mut out);
                    }
                    [name] => escape_html_into(env.get(name).unwrap_or_default(), &mut out),
                    [name, field, ..] => {
                        return Err(TemplateError::Exec(format!(
                            "can't evaluate field {field} of .{name}: value is a string"
                        )));
                    }
                },
            }
        }
        Ok(out)
    }
}

/// Escapes a value for the HTML text context.
fn escape_html_into(value: &str, out: &mut Vec<u8>) {
    for c in value.chars() {
        match c {
            '\0' => out.extend_from_slice("\u{FFFD}".as_bytes()),
            '"' => out.extend_from_slice(b"&#34;"),
            '&' => out.extend_from_slice(b"&amp;"),
            '\'' => out.extend_from_slice(b"&#39;"),
            '+' => out.extend_from_slice(b"&#43;"),
            '<' => out.extend_from_slice(b"&lt;"),
            '>' => out.extend_from_slice(b"&gt;"),
            _ => {
                let mut buf = [0u8; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            }
        }
    }
}

/// Loads and expands templates from one directory.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    dir: PathBuf,
    env: EnvSnapshot,
}

impl TemplateRenderer {
    pub fn new(dir: impl Into<PathBuf>, env: EnvSnapshot) -> Self {
        Self {
            dir: dir.into(),
            env,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path the renderer reads for a requested name. Only the last path
    /// component is kept; names that are not a plain file name (`/`, `.`,
    /// `..`) resolve to nothing, so the result never leaves the directory.
    pub fn resolve(&self, requested: &str) -> Option<PathBuf> {
        match base_name(requested) {
            "/" | "." | ".." => None,
            name => Some(self.dir.join(name)),
        }
    }

    pub async fn render(&self, requested: &str) -> Result<Vec<u8>, TemplateError> {
        let Some(path) = self.resolve(requested) else {
            return Err(TemplateError::NotFound {
                path: self.dir.clone(),
                source: io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("{requested:?} does not name a file"),
                ),
            });
        };
        tracing::debug!("attempting to read the file \"{}\"", path.display());

        let source = match fs::read(&path).await {
            Ok(source) => source,
            Err(source) => return Err(TemplateError::NotFound { path, source }),
        };

        let expanded = Template::parse(&source)?.execute(&self.env)?;
        tracing::debug!(
            "Expanded template:\n----------\n{}----------",
            String::from_utf8_lossy(&expanded)
        );
        Ok(expanded)
    }
}
