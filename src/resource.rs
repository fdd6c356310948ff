//! File-backed property resource: load, reload and export.

use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml::{Mapping, Value};

use crate::atomic::write_atomically;
use crate::configdata::ConfigurationData;
use crate::error::ConfigError;
use crate::propertymap::MapNode;
use crate::reader::PropertyReader;

/// Binds a document to a [`PropertyReader`] and accepts exports.
pub trait PropertyResource: Send {
    /// The reader over the currently loaded document.
    fn reader(&self) -> &PropertyReader;

    /// Re-reads the backing document, replacing the reader. Values staged
    /// with [`set_value`](Self::set_value) and not exported are discarded.
    fn reload(&mut self) -> Result<(), ConfigError>;

    /// Serializes the declared properties with their current values in
    /// registration order and persists the result.
    fn export_properties(&mut self, data: &ConfigurationData) -> Result<(), ConfigError>;

    /// Stages a raw value at `path`, visible to subsequent reads through
    /// [`reader`](Self::reader) until the next [`reload`](Self::reload).
    fn set_value(&mut self, path: &str, value: Value);
}

/// A YAML file on disk.
///
/// Construction reads the file once. A missing or empty file is treated
/// as an empty mapping; a non-mapping top level is a format error.
pub struct YamlFileResource {
    path: PathBuf,
    reader: PropertyReader,
}

impl YamlFileResource {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let reader = read_from_disk(&path)?;
        Ok(Self { path, reader })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PropertyResource for YamlFileResource {
    fn reader(&self) -> &PropertyReader {
        &self.reader
    }

    fn reload(&mut self) -> Result<(), ConfigError> {
        self.reader = read_from_disk(&self.path)?;
        Ok(())
    }

    fn export_properties(&mut self, data: &ConfigurationData) -> Result<(), ConfigError> {
        let contents = export_string(data);
        write_atomically(&self.path, &contents).map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source,
        })?;
        self.reload()
    }

    fn set_value(&mut self, path: &str, value: Value) {
        let mut root = self.reader.root().clone();
        insert_at_path(&mut root, path, value);
        self.reader = PropertyReader::new(root);
    }
}

fn read_from_disk(path: &Path) -> Result<PropertyReader, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    let document: Value = serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    match document {
        Value::Null => Ok(PropertyReader::new(Mapping::new())),
        Value::Mapping(map) => Ok(PropertyReader::new(map)),
        _ => Err(ConfigError::TopLevelNotMap {
            path: path.to_path_buf(),
        }),
    }
}

fn insert_at_path(root: &mut Mapping, path: &str, value: Value) {
    let (parents, last) = match path.rsplit_once('.') {
        Some((parents, last)) => (Some(parents), last),
        None => (None, path),
    };
    let mut current = root;
    if let Some(parents) = parents {
        for segment in parents.split('.') {
            let key = Value::String(segment.to_string());
            if !matches!(current.get(&key), Some(Value::Mapping(_))) {
                current.insert(key.clone(), Value::Mapping(Mapping::new()));
            }
            current = match current.get_mut(&key) {
                Some(Value::Mapping(map)) => map,
                _ => unreachable!("mapping inserted above"),
            };
        }
    }
    current.insert(Value::String(last.to_string()), value);
}

/// Renders the declared properties to YAML text.
///
/// Properties sharing a prefix are emitted as one nested block in
/// registration order, with 2-space indentation. Comment lines go
/// immediately above the key they belong to; comments for non-leaf paths
/// are emitted when their block is first opened. Root-level keys after the
/// first are preceded by a blank line. The output depends only on the
/// property map and the current values, so repeated exports are
/// byte-identical.
fn export_string(data: &ConfigurationData) -> String {
    let mut out = String::new();
    let mut first_root_key = true;
    write_children(
        &mut out,
        data.property_map().children(),
        data,
        &mut String::new(),
        0,
        &mut first_root_key,
    );
    out
}

fn write_children(
    out: &mut String,
    children: &[(String, MapNode)],
    data: &ConfigurationData,
    path: &mut String,
    indent: usize,
    first_root_key: &mut bool,
) {
    for (segment, node) in children {
        if indent == 0 {
            if !*first_root_key {
                out.push('\n');
            }
            *first_root_key = false;
        }

        let previous_len = path.len();
        if !path.is_empty() {
            path.push('.');
        }
        path.push_str(segment);

        match node {
            MapNode::Group(grandchildren) => {
                write_comments(out, data.comments_for(path), indent);
                push_indented(out, indent, &format!("{segment}:"));
                write_children(out, grandchildren, data, path, indent + 1, first_root_key);
            }
            MapNode::Entry(entry) => {
                for comment in entry.comments() {
                    write_comment_line(out, comment, indent);
                }
                if let Some(value) = data.export_entry(entry) {
                    write_value(out, segment, &value, indent);
                }
            }
        }

        path.truncate(previous_len);
    }
}

fn write_comments(out: &mut String, comments: &[String], indent: usize) {
    for comment in comments {
        write_comment_line(out, comment, indent);
    }
}

fn write_comment_line(out: &mut String, comment: &str, indent: usize) {
    if comment.is_empty() {
        push_indented(out, indent, "#");
    } else {
        push_indented(out, indent, &format!("# {comment}"));
    }
}

fn write_value(out: &mut String, key: &str, value: &Value, indent: usize) {
    match value {
        Value::Sequence(items) if items.is_empty() => {
            push_indented(out, indent, &format!("{key}: []"));
        }
        Value::Sequence(items) => {
            push_indented(out, indent, &format!("{key}:"));
            for item in items {
                push_indented(out, indent + 1, &format!("- {}", format_flow(item)));
            }
        }
        Value::Mapping(map) if map.is_empty() => {
            push_indented(out, indent, &format!("{key}: {{}}"));
        }
        Value::Mapping(map) => {
            push_indented(out, indent, &format!("{key}:"));
            for (child_key, child_value) in map {
                match child_key.as_str() {
                    Some(name) => write_value(out, name, child_value, indent + 1),
                    None => push_indented(
                        out,
                        indent + 1,
                        &format!("{}: {}", format_flow(child_key), format_flow(child_value)),
                    ),
                }
            }
        }
        scalar => {
            push_indented(out, indent, &format!("{key}: {}", format_scalar(scalar)));
        }
    }
}

fn push_indented(out: &mut String, indent: usize, line: &str) {
    for _ in 0..indent {
        out.push_str("  ");
    }
    out.push_str(line);
    out.push('\n');
}

/// Single-line rendering, used for sequence elements and non-string keys.
fn format_flow(value: &Value) -> String {
    match value {
        Value::Sequence(items) => {
            let rendered: Vec<String> = items.iter().map(format_flow).collect();
            format!("[{}]", rendered.join(", "))
        }
        Value::Mapping(map) => {
            let rendered: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", format_flow(k), format_flow(v)))
                .collect();
            format!("{{{}}}", rendered.join(", "))
        }
        scalar => format_scalar(scalar),
    }
}

fn format_scalar(value: &Value) -> String {
    match value {
        Value::Null => "~".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => format_string(s),
        Value::Tagged(tagged) => format_scalar(&tagged.value),
        other => format_flow(other),
    }
}

/// Quotes a string so that reparsing yields the identical value: plain
/// where unambiguous, single quotes with `''` doubling otherwise, double
/// quotes with escapes when control characters are present.
fn format_string(s: &str) -> String {
    if is_plain_safe(s) {
        return s.to_string();
    }
    if s.chars().any(|c| c.is_control()) {
        return double_quoted(s);
    }
    format!("'{}'", s.replace('\'', "''"))
}

fn is_plain_safe(s: &str) -> bool {
    let mut chars = s.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };
    if !first.is_ascii_alphabetic() {
        return false;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '.' | '-' | '/')) {
        return false;
    }
    if s.ends_with(' ') {
        return false;
    }
    // Words YAML would resolve to booleans or null.
    !matches!(
        s.to_ascii_lowercase().as_str(),
        "true" | "false" | "yes" | "no" | "on" | "off" | "null"
    )
}

fn double_quoted(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 2);
    result.push('"');
    for c in s.chars() {
        match c {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            '\t' => result.push_str("\\t"),
            '\r' => result.push_str("\\r"),
            c if c.is_control() => result.push_str(&format!("\\u{:04X}", c as u32)),
            c => result.push(c),
        }
    }
    result.push('"');
    result
}
