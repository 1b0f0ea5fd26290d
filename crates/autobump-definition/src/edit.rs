//! Line-level edits of block-style YAML definitions.
//!
//! Only the target record's `version` value and its `labels` block are
//! touched; every other byte of the source is carried over. Anything the
//! editor does not understand yields `None` and the caller re-serializes
//! the parsed document instead.

use autobump_core::DefinitionKind;
use autobump_core::labels::VERSION as VERSION_LABEL;
use serde_yml::Value;

use crate::reader::PACKAGES_KEY;

const VERSION_KEY: &str = "version";
const LABELS_KEY: &str = "labels";

/// Lines belonging to one package record.
struct Span {
    start: usize,
    end: usize,
    key_column: usize,
    /// The first line starts with the `- ` of a sequence item.
    item: bool,
}

impl Span {
    fn key<'a>(&self, lines: &'a [String], index: usize) -> Option<(&'a str, usize)> {
        key_at(&lines[index], self.key_column, self.item && index == self.start)
    }

    fn find_key(&self, lines: &[String], key: &str) -> Option<usize> {
        (self.start..self.end)
            .filter(|&i| is_content(&lines[i]))
            .find(|&i| self.key(lines, i).is_some_and(|(k, _)| k == key))
    }

    fn last_content(&self, lines: &[String]) -> Option<usize> {
        (self.start..self.end).rev().find(|&i| is_content(&lines[i]))
    }
}

pub(crate) fn rewrite(
    source: &str,
    kind: DefinitionKind,
    index: usize,
    new_version: &str,
) -> Option<String> {
    let newline = if source.contains("\r\n") { "\r\n" } else { "\n" };
    let mut lines: Vec<String> = source.split_inclusive('\n').map(str::to_string).collect();

    let span = match kind {
        DefinitionKind::Single => root_span(&lines)?,
        DefinitionKind::Collection => item_span(&lines, index)?,
    };

    let version_line = span.find_key(&lines, VERSION_KEY)?;
    let (_, value_start) = span.key(&lines, version_line)?;
    lines[version_line] = replace_scalar(&lines[version_line], value_start, new_version)?;

    update_labels(&mut lines, &span, new_version, newline)?;

    Some(lines.concat())
}

fn root_span(lines: &[String]) -> Option<Span> {
    let first = lines.iter().find(|line| is_content(line))?;
    if indent(first) != 0 || body(first).starts_with(['{', '[']) {
        return None;
    }

    Some(Span {
        start: 0,
        end: lines.len(),
        key_column: 0,
        item: false,
    })
}

fn item_span(lines: &[String], index: usize) -> Option<Span> {
    let packages = (0..lines.len()).find(|&i| {
        is_content(&lines[i])
            && key_at(&lines[i], 0, false).is_some_and(|(key, value_start)| {
                key == PACKAGES_KEY && value_is_empty(&lines[i], value_start)
            })
    })?;

    let mut sequence_indent = None;
    let mut starts = Vec::new();
    let mut end = lines.len();

    for (i, line) in lines.iter().enumerate().skip(packages + 1) {
        if !is_content(line) {
            continue;
        }
        let column = indent(line);
        let dash = is_dash(&body(line)[column..]);
        let expected = *sequence_indent.get_or_insert(column);
        if column < expected || (column == expected && !dash) {
            end = i;
            break;
        }
        if column == expected {
            starts.push(i);
        }
    }

    let start = *starts.get(index)?;
    let end = starts.get(index + 1).copied().unwrap_or(end);

    let line = body(&lines[start]);
    let dash_column = indent(line);
    let after_dash = &line[dash_column + 1..];
    let content = after_dash.trim_start_matches(' ');

    let key_column = if content.is_empty() || content.starts_with('#') {
        let next = (start + 1..end).find(|&i| is_content(&lines[i]))?;
        indent(&lines[next])
    } else if content.starts_with(['{', '[', '\t']) {
        return None;
    } else {
        dash_column + 1 + (after_dash.len() - content.len())
    };

    Some(Span {
        start,
        end,
        key_column,
        item: true,
    })
}

fn update_labels(
    lines: &mut Vec<String>,
    span: &Span,
    version: &str,
    newline: &str,
) -> Option<()> {
    let Some(labels_line) = span.find_key(lines, LABELS_KEY) else {
        let last = span.last_content(lines)?;
        ensure_newline(&mut lines[last], newline);
        lines.insert(
            last + 1,
            entry(span.key_column + 2, VERSION_LABEL, version, newline),
        );
        lines.insert(
            last + 1,
            format!("{}{LABELS_KEY}:{newline}", " ".repeat(span.key_column)),
        );
        return Some(());
    };

    let (_, value_start) = span.key(lines, labels_line)?;
    if !value_is_empty(&lines[labels_line], value_start) {
        return None;
    }

    let children: Vec<usize> = (labels_line + 1..span.end)
        .filter(|&i| is_content(&lines[i]))
        .take_while(|&i| indent(&lines[i]) > span.key_column)
        .collect();

    let Some(&first) = children.first() else {
        ensure_newline(&mut lines[labels_line], newline);
        lines.insert(
            labels_line + 1,
            entry(span.key_column + 2, VERSION_LABEL, version, newline),
        );
        return Some(());
    };

    let label_column = indent(&lines[first]);
    for &i in &children {
        if indent(&lines[i]) != label_column {
            continue;
        }
        if let Some((key, value_start)) = key_at(&lines[i], label_column, false) {
            if key == VERSION_LABEL {
                lines[i] = replace_scalar(&lines[i], value_start, version)?;
                return Some(());
            }
        }
    }

    let last = *children.last()?;
    ensure_newline(&mut lines[last], newline);
    lines.insert(last + 1, entry(label_column, VERSION_LABEL, version, newline));
    Some(())
}

/// The line without its line ending.
fn body(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

fn indent(line: &str) -> usize {
    line.len() - line.trim_start_matches(' ').len()
}

fn is_content(line: &str) -> bool {
    let trimmed = body(line).trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return false;
    }
    !(indent(line) == 0 && (trimmed == "---" || trimmed == "..."))
}

fn is_dash(text: &str) -> bool {
    text == "-" || text.starts_with("- ")
}

fn ensure_newline(line: &mut String, newline: &str) {
    if !line.ends_with('\n') {
        line.push_str(newline);
    }
}

fn entry(column: usize, key: &str, value: &str, newline: &str) -> String {
    format!(
        "{}{key}: {}{newline}",
        " ".repeat(column),
        plain_or_quoted(value)
    )
}

/// Key of a mapping entry starting at `column`, and the byte offset right
/// after its colon.
fn key_at(line: &str, column: usize, item_start: bool) -> Option<(&str, usize)> {
    let line = body(line);
    if line.len() <= column || (!item_start && indent(line) != column) {
        return None;
    }

    let text = &line[column..];
    let (key, after_key) = match text.chars().next()? {
        quote @ ('"' | '\'') => {
            let close = text[1..].find(quote)? + 1;
            (&text[1..close], close + 1)
        }
        _ => {
            let colon = text.char_indices().find_map(|(i, c)| {
                (c == ':'
                    && text[i + 1..]
                        .chars()
                        .next()
                        .is_none_or(|n| n == ' ' || n == '\t'))
                .then_some(i)
            })?;
            (text[..colon].trim_end(), colon)
        }
    };

    let rest = &text[after_key..];
    let after_colon = rest.strip_prefix(':')?;
    if !(after_colon.is_empty() || after_colon.starts_with([' ', '\t'])) {
        return None;
    }

    Some((key, column + after_key + 1))
}

fn value_is_empty(line: &str, value_start: usize) -> bool {
    let value = body(line)[value_start..].trim();
    value.is_empty() || value.starts_with('#')
}

/// Replaces the scalar after `value_start`, keeping its quoting style and
/// any trailing comment.
fn replace_scalar(line: &str, value_start: usize, new_value: &str) -> Option<String> {
    let text = body(line);
    let ending = &line[text.len()..];
    let region = &text[value_start..];
    let value = region.trim_start_matches([' ', '\t']);
    let lead = &region[..region.len() - value.len()];

    if lead.is_empty() || value.is_empty() {
        return None;
    }

    let (old_len, replacement) = match value.chars().next()? {
        '"' => {
            let close = value[1..].find('"')? + 2;
            if value[..close].contains('\\') {
                return None;
            }
            (close, double_quoted(new_value))
        }
        '\'' => {
            let close = value[1..].find('\'')? + 2;
            (close, format!("'{}'", new_value.replace('\'', "''")))
        }
        '|' | '>' | '{' | '[' | '&' | '*' | '!' | '#' => return None,
        _ => {
            let end = value.find(" #").unwrap_or(value.len());
            (value[..end].trim_end().len(), plain_or_quoted(new_value))
        }
    };

    Some(format!(
        "{}{lead}{replacement}{}{ending}",
        &text[..value_start],
        &value[old_len..]
    ))
}

fn double_quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Plain when YAML reads the bare text back as the same string, quoted
/// otherwise (`1.3` would become a float).
fn plain_or_quoted(value: &str) -> String {
    let plain = !value.contains(" #")
        && !value.contains(": ")
        && matches!(serde_yml::from_str::<Value>(value), Ok(Value::String(ref s)) if s == value);

    if plain {
        value.to_string()
    } else {
        double_quoted(value)
    }
}
