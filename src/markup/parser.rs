//! Built-in wiki markup parser.
//!
//! Line-oriented: headings, rules, lists and code fences are recognized per
//! line, everything else accumulates into paragraphs whose text is scanned by
//! the inline pass. The grammar is the classic wiki subset; extending it is
//! out of scope here.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::render::RenderingContext;

use super::document::{HeadingLevel, ListItem, Node, ParsedDocument};

/// Produces a structured document from raw page text.
///
/// Implementations are constructed bound to a rendering context and the text
/// to parse; `parse` may be called more than once and must be deterministic.
pub trait MarkupParser {
    fn parse(&self) -> Result<ParsedDocument, ParseError>;
}

/// Parsing failures surfaced by [`MarkupParser`] implementations.
///
/// The built-in parser is lenient and does not fail on malformed input;
/// parsers that read from external sources report I/O trouble as `Read`.
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    #[error("unable to read page markup: {message}")]
    Read { message: String },
    #[error("malformed markup at line {line}: {message}")]
    Malformed { line: usize, message: String },
}

/// The default markup parser.
pub struct WikiMarkupParser {
    raw: String,
    execute_plugins: bool,
}

impl WikiMarkupParser {
    pub fn new(context: &RenderingContext, raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            execute_plugins: context.plugin_flag().executes(),
        }
    }

    fn flush_paragraph(&self, paragraph: &mut String, blocks: &mut Vec<Node>) {
        if paragraph.trim().is_empty() {
            paragraph.clear();
            return;
        }
        let content = self.parse_inline(paragraph.trim());
        if !content.is_empty() {
            blocks.push(Node::Paragraph(content));
        }
        paragraph.clear();
    }

    fn parse_inline(&self, text: &str) -> Vec<Node> {
        let chars: Vec<char> = text.chars().collect();
        let mut nodes = Vec::new();
        let mut buffer = String::new();
        let mut i = 0;

        while i < chars.len() {
            if chars[i] == '~' && i + 1 < chars.len() {
                buffer.push(chars[i + 1]);
                i += 2;
                continue;
            }
            if starts_with_at(&chars, i, "\\\\") {
                flush_text(&mut buffer, &mut nodes);
                nodes.push(Node::LineBreak);
                i += 2;
                continue;
            }
            if starts_with_at(&chars, i, "__") {
                if let Some(end) = find_from(&chars, i + 2, "__") {
                    flush_text(&mut buffer, &mut nodes);
                    let inner = collect_range(&chars, i + 2, end);
                    nodes.push(Node::Bold(self.parse_inline(&inner)));
                    i = end + 2;
                    continue;
                }
            }
            if starts_with_at(&chars, i, "''") {
                if let Some(end) = find_from(&chars, i + 2, "''") {
                    flush_text(&mut buffer, &mut nodes);
                    let inner = collect_range(&chars, i + 2, end);
                    nodes.push(Node::Italic(self.parse_inline(&inner)));
                    i = end + 2;
                    continue;
                }
            }
            if starts_with_at(&chars, i, "{{{") {
                if let Some(end) = find_from(&chars, i + 3, "}}}") {
                    flush_text(&mut buffer, &mut nodes);
                    nodes.push(Node::Code(collect_range(&chars, i + 3, end)));
                    i = end + 3;
                    continue;
                }
            }
            if starts_with_at(&chars, i, "{{") {
                if let Some(end) = find_from(&chars, i + 2, "}}") {
                    flush_text(&mut buffer, &mut nodes);
                    nodes.push(Node::Code(collect_range(&chars, i + 2, end)));
                    i = end + 2;
                    continue;
                }
            }
            if starts_with_at(&chars, i, "[[") {
                buffer.push('[');
                i += 2;
                continue;
            }
            if starts_with_at(&chars, i, "[{") {
                if let Some(end) = find_from(&chars, i + 2, "}]") {
                    let directive = collect_range(&chars, i + 2, end);
                    if self.execute_plugins {
                        if let Some((name, args)) = parse_plugin_invocation(&directive) {
                            flush_text(&mut buffer, &mut nodes);
                            nodes.push(Node::Plugin { name, args });
                        } else {
                            buffer.push_str("[{");
                            buffer.push_str(&directive);
                            buffer.push_str("}]");
                        }
                    } else {
                        // Execution disabled: keep the directive verbatim so
                        // the editable form round-trips.
                        buffer.push_str("[{");
                        buffer.push_str(&directive);
                        buffer.push_str("}]");
                    }
                    i = end + 2;
                    continue;
                }
            }
            if chars[i] == '[' {
                if let Some(end) = find_from(&chars, i + 1, "]") {
                    let inner = collect_range(&chars, i + 1, end);
                    flush_text(&mut buffer, &mut nodes);
                    nodes.push(link_node(&inner));
                    i = end + 1;
                    continue;
                }
            }
            buffer.push(chars[i]);
            i += 1;
        }

        flush_text(&mut buffer, &mut nodes);
        nodes
    }
}

impl MarkupParser for WikiMarkupParser {
    fn parse(&self) -> Result<ParsedDocument, ParseError> {
        let mut blocks: Vec<Node> = Vec::new();
        let mut paragraph = String::new();
        let mut list_items: Vec<ListItem> = Vec::new();
        let mut list_ordered = false;

        let mut lines = self.raw.lines();
        while let Some(line) = lines.next() {
            let trimmed = line.trim_end();

            if trimmed.trim().is_empty() {
                self.flush_paragraph(&mut paragraph, &mut blocks);
                flush_list(&mut list_items, list_ordered, &mut blocks);
                continue;
            }

            if let Some(rest) = trimmed.strip_prefix("{{{") {
                self.flush_paragraph(&mut paragraph, &mut blocks);
                flush_list(&mut list_items, list_ordered, &mut blocks);
                let mut code = String::new();
                if !rest.is_empty() {
                    code.push_str(rest);
                    code.push('\n');
                }
                // A missing closing fence swallows the rest of the page into
                // the code block, same as the classic parser.
                for code_line in lines.by_ref() {
                    if code_line.trim() == "}}}" {
                        break;
                    }
                    code.push_str(code_line);
                    code.push('\n');
                }
                if code.ends_with('\n') {
                    code.pop();
                }
                blocks.push(Node::CodeBlock(code));
                continue;
            }

            if trimmed.starts_with("----") && trimmed.chars().all(|c| c == '-') {
                self.flush_paragraph(&mut paragraph, &mut blocks);
                flush_list(&mut list_items, list_ordered, &mut blocks);
                blocks.push(Node::Rule);
                continue;
            }

            if trimmed.starts_with('!') {
                self.flush_paragraph(&mut paragraph, &mut blocks);
                flush_list(&mut list_items, list_ordered, &mut blocks);
                let markers = trimmed.chars().take_while(|c| *c == '!').count().min(3);
                let level = match markers {
                    3 => HeadingLevel::Large,
                    2 => HeadingLevel::Medium,
                    _ => HeadingLevel::Small,
                };
                let content = self.parse_inline(trimmed[markers..].trim_start());
                blocks.push(Node::Heading { level, content });
                continue;
            }

            if trimmed.starts_with('*') || trimmed.starts_with('#') {
                self.flush_paragraph(&mut paragraph, &mut blocks);
                let ordered = trimmed.starts_with('#');
                let marker = if ordered { '#' } else { '*' };
                let depth = trimmed.chars().take_while(|c| *c == marker).count();
                if !list_items.is_empty() && list_ordered != ordered {
                    flush_list(&mut list_items, list_ordered, &mut blocks);
                }
                list_ordered = ordered;
                list_items.push(ListItem {
                    depth: depth.min(usize::from(u8::MAX)) as u8,
                    content: self.parse_inline(trimmed[depth..].trim_start()),
                });
                continue;
            }

            flush_list(&mut list_items, list_ordered, &mut blocks);
            if !paragraph.is_empty() {
                paragraph.push('\n');
            }
            paragraph.push_str(trimmed);
        }

        self.flush_paragraph(&mut paragraph, &mut blocks);
        flush_list(&mut list_items, list_ordered, &mut blocks);

        Ok(ParsedDocument::new(self.raw.clone(), blocks))
    }
}

fn flush_text(buffer: &mut String, nodes: &mut Vec<Node>) {
    if !buffer.is_empty() {
        nodes.push(Node::Text(std::mem::take(buffer)));
    }
}

fn flush_list(items: &mut Vec<ListItem>, ordered: bool, blocks: &mut Vec<Node>) {
    if !items.is_empty() {
        blocks.push(Node::List {
            ordered,
            items: std::mem::take(items),
        });
    }
}

fn starts_with_at(chars: &[char], index: usize, pattern: &str) -> bool {
    pattern
        .chars()
        .enumerate()
        .all(|(offset, expected)| chars.get(index + offset) == Some(&expected))
}

fn find_from(chars: &[char], from: usize, pattern: &str) -> Option<usize> {
    (from..chars.len()).find(|&idx| starts_with_at(chars, idx, pattern))
}

fn collect_range(chars: &[char], start: usize, end: usize) -> String {
    chars[start..end].iter().collect()
}

fn link_node(inner: &str) -> Node {
    match inner.split_once('|') {
        Some((label, target)) => Node::Link {
            target: target.trim().to_owned(),
            label: Some(label.trim().to_owned()),
        },
        None => Node::Link {
            target: inner.trim().to_owned(),
            label: None,
        },
    }
}

/// Split `Name key='value' ...` into the plugin name and its arguments.
/// Returns `None` for anything that does not fit that shape; the caller then
/// keeps the directive as literal text.
fn parse_plugin_invocation(directive: &str) -> Option<(String, BTreeMap<String, String>)> {
    let mut rest = directive.trim();
    if rest.is_empty() {
        return None;
    }
    let name_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let name = &rest[..name_end];
    if !name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || c == '_')
    {
        return None;
    }
    rest = rest[name_end..].trim_start();

    let mut args = BTreeMap::new();
    while !rest.is_empty() {
        let eq = rest.find('=')?;
        let key = rest[..eq].trim();
        if key.is_empty() {
            return None;
        }
        let after_eq = rest[eq + 1..].trim_start();
        let quoted = after_eq.strip_prefix('\'')?;
        let close = quoted.find('\'')?;
        args.insert(key.to_owned(), quoted[..close].to_owned());
        rest = quoted[close + 1..].trim_start();
    }
    Some((name.to_owned(), args))
}
