//! Placeholder templates for filenames and directories.
//!
//! A template is literal text with `{...}` placeholders. A placeholder is
//! either a field reference or a helper call:
//!
//! - `{name}` inserts the `name` field of the record being rendered.
//! - `{pad season 2}` calls the `pad` helper with the `season` field and the
//!   integer literal `2`.
//! - `{home_path "Videos"}` calls `home_path` with a string literal.
//!
//! `{{` and `}}` produce literal braces.
//!
//! # Example
//!
//! ```
//! use scenerename::media::Media;
//! use scenerename::template::render;
//!
//! let show = Media::show("Show Name", 1, 2).with_ext("mkv");
//! let name = render("{name} - S{pad season 2}E{pad episode 2}.{ext}", &show).unwrap();
//! assert_eq!(name, "Show Name - S01E02.mkv");
//! ```

use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// Render `template` against any serializable record.
pub fn render<T: Serialize + ?Sized>(template: &str, data: &T) -> Result<String> {
    Template::parse(template)?.render(data)
}

/// A parsed template, reusable across records.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Field(String),
    Helper(Helper),
}

#[derive(Debug, Clone, PartialEq)]
enum Helper {
    /// Zero-pad an integer to a width.
    Pad { value: Arg, width: Arg },
    /// Platform path separator.
    Sep,
    /// User home directory.
    Home,
    /// A path under the user home directory.
    HomePath(Arg),
    /// Backslash-escape every space.
    EscapeSpaces(Arg),
}

#[derive(Debug, Clone, PartialEq)]
enum Arg {
    Field(String),
    Int(i64),
    Str(String),
}

impl Template {
    /// Parse a template, checking placeholder syntax and helper arity.
    pub fn parse(source: &str) -> Result<Self> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((pos, c)) = chars.next() {
            match c {
                '{' if chars.peek().is_some_and(|&(_, n)| n == '{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek().is_some_and(|&(_, n)| n == '}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    let mut body = String::new();
                    let mut closed = false;
                    let mut in_string = false;
                    for (_, c) in chars.by_ref() {
                        match c {
                            '"' => {
                                in_string = !in_string;
                                body.push(c);
                            }
                            '}' if !in_string => {
                                closed = true;
                                break;
                            }
                            _ => body.push(c),
                        }
                    }
                    if !closed {
                        return Err(Error::template(format!(
                            "unterminated placeholder at offset {pos} in {source:?}"
                        )));
                    }
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(parse_placeholder(&body)?);
                }
                '}' => {
                    return Err(Error::template(format!(
                        "unmatched `}}` at offset {pos} in {source:?}"
                    )));
                }
                _ => literal.push(c),
            }
        }

        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(Self { segments })
    }

    /// Render against a record. The record is serialized once; fields are
    /// looked up by name on the resulting object.
    pub fn render<T: Serialize + ?Sized>(&self, data: &T) -> Result<String> {
        let value = serde_json::to_value(data)
            .map_err(|e| Error::template(format!("cannot serialize template data: {e}")))?;
        let mut home: Option<PathBuf> = None;
        let mut out = String::new();

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(name) => out.push_str(&display(lookup(&value, name)?, name)?),
                Segment::Helper(helper) => {
                    out.push_str(&call_helper(helper, &value, &mut home)?);
                }
            }
        }
        Ok(out)
    }
}

// -------------------------------------------------------------------------
// Placeholder parsing
// -------------------------------------------------------------------------

fn parse_placeholder(body: &str) -> Result<Segment> {
    let words = split_args(body)?;
    let Some((head, rest)) = words.split_first() else {
        return Err(Error::template("empty placeholder `{}`"));
    };
    let head = match head {
        Arg::Field(name) => name.as_str(),
        other => {
            return Err(Error::template(format!(
                "placeholder must start with a field or helper name, found {other:?}"
            )))
        }
    };

    let helper = match (head, rest) {
        ("pad", [value, width]) => Helper::Pad {
            value: value.clone(),
            width: width.clone(),
        },
        ("sep", []) => Helper::Sep,
        ("home", []) => Helper::Home,
        ("home_path", [path]) => Helper::HomePath(path.clone()),
        ("escape_spaces", [text]) => Helper::EscapeSpaces(text.clone()),
        ("pad" | "sep" | "home" | "home_path" | "escape_spaces", args) => {
            return Err(Error::template(format!(
                "wrong number of arguments for `{head}`: got {}",
                args.len()
            )))
        }
        (name, []) => return Ok(Segment::Field(name.to_string())),
        (name, _) => return Err(Error::template(format!("unknown helper `{name}`"))),
    };
    Ok(Segment::Helper(helper))
}

/// Split a placeholder body into arguments. Quoted strings may contain
/// spaces; `\"` and `\\` are escapes inside them.
fn split_args(body: &str) -> Result<Vec<Arg>> {
    let mut args = Vec::new();
    let mut chars = body.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c == '"' {
            chars.next();
            let mut text = String::new();
            let mut closed = false;
            while let Some(c) = chars.next() {
                match c {
                    '\\' => {
                        if let Some(escaped) = chars.next() {
                            text.push(escaped);
                        }
                    }
                    '"' => {
                        closed = true;
                        break;
                    }
                    _ => text.push(c),
                }
            }
            if !closed {
                return Err(Error::template(format!("unterminated string in `{{{body}}}`")));
            }
            args.push(Arg::Str(text));
            continue;
        }

        let mut word = String::new();
        while let Some(&c) = chars.peek() {
            if c.is_whitespace() {
                break;
            }
            word.push(c);
            chars.next();
        }

        if let Ok(n) = word.parse::<i64>() {
            args.push(Arg::Int(n));
        } else if word.chars().all(|c| c.is_alphanumeric() || c == '_') {
            args.push(Arg::Field(word));
        } else {
            return Err(Error::template(format!("invalid argument `{word}` in `{{{body}}}`")));
        }
    }
    Ok(args)
}

// -------------------------------------------------------------------------
// Evaluation
// -------------------------------------------------------------------------

fn lookup<'a>(value: &'a Value, name: &str) -> Result<&'a Value> {
    value
        .get(name)
        .ok_or_else(|| Error::template(format!("undefined field `{name}`")))
}

fn display(value: &Value, name: &str) -> Result<String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        _ => Err(Error::template(format!("field `{name}` is not a scalar"))),
    }
}

fn arg_int(arg: &Arg, data: &Value, helper: &str) -> Result<i64> {
    match arg {
        Arg::Int(n) => Ok(*n),
        Arg::Field(name) => lookup(data, name)?
            .as_i64()
            .ok_or_else(|| Error::template(format!("`{helper}` expects `{name}` to be an integer"))),
        Arg::Str(s) => Err(Error::template(format!(
            "`{helper}` expects an integer, got string {s:?}"
        ))),
    }
}

fn arg_str(arg: &Arg, data: &Value, helper: &str) -> Result<String> {
    match arg {
        Arg::Str(s) => Ok(s.clone()),
        Arg::Field(name) => match lookup(data, name)? {
            Value::String(s) => Ok(s.clone()),
            Value::Null => Ok(String::new()),
            _ => Err(Error::template(format!(
                "`{helper}` expects `{name}` to be a string"
            ))),
        },
        Arg::Int(n) => Err(Error::template(format!(
            "`{helper}` expects a string, got integer {n}"
        ))),
    }
}

fn home_dir(cache: &mut Option<PathBuf>) -> Result<PathBuf> {
    if let Some(home) = cache {
        return Ok(home.clone());
    }
    let home =
        dirs::home_dir().ok_or_else(|| Error::template("home directory is not available"))?;
    *cache = Some(home.clone());
    Ok(home)
}

fn call_helper(helper: &Helper, data: &Value, home: &mut Option<PathBuf>) -> Result<String> {
    match helper {
        Helper::Pad { value, width } => {
            let value = arg_int(value, data, "pad")?;
            let width = usize::try_from(arg_int(width, data, "pad")?)
                .map_err(|_| Error::template("`pad` width must not be negative"))?;
            Ok(format!("{value:0width$}"))
        }
        Helper::Sep => Ok(std::path::MAIN_SEPARATOR_STR.to_string()),
        Helper::Home => Ok(home_dir(home)?.display().to_string()),
        Helper::HomePath(path) => {
            let path = arg_str(path, data, "home_path")?;
            Ok(home_dir(home)?.join(path).display().to_string())
        }
        Helper::EscapeSpaces(text) => Ok(arg_str(text, data, "escape_spaces")?.replace(' ', "\\ ")),
    }
}
