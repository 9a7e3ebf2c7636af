//! WYSIWYG editing renderer.
//!
//! Produces normalized wiki markup from the document tree, the form handed to
//! the in-browser editor. Output round-trips through the parser: feeding it
//! back yields an equivalent tree.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::Arc;

use crate::markup::{Node, ParsedDocument};

use super::context::RenderingContext;
use super::types::{RenderError, Renderer};

pub struct WysiwygRenderer {
    document: Arc<ParsedDocument>,
}

impl WysiwygRenderer {
    pub fn new(_context: &RenderingContext, document: Arc<ParsedDocument>) -> Self {
        Self { document }
    }
}

impl Renderer for WysiwygRenderer {
    fn render(&self) -> Result<String, RenderError> {
        let mut out = String::new();
        let mut first = true;
        for node in self.document.nodes() {
            if !first {
                out.push('\n');
            }
            first = false;
            write_block(&mut out, node)?;
        }
        Ok(out)
    }
}

fn write_block(out: &mut String, node: &Node) -> Result<(), RenderError> {
    match node {
        Node::Heading { level, content } => {
            out.push_str(&"!".repeat(level.markers()));
            write_inline_all(out, content)?;
            out.push('\n');
        }
        Node::Paragraph(content) => {
            write_inline_all(out, content)?;
            out.push('\n');
        }
        Node::List { ordered, items } => {
            let marker = if *ordered { '#' } else { '*' };
            for item in items {
                for _ in 0..item.depth.max(1) {
                    out.push(marker);
                }
                out.push(' ');
                write_inline_all(out, &item.content)?;
                out.push('\n');
            }
        }
        Node::CodeBlock(code) => {
            writeln!(out, "{{{{{{\n{code}\n}}}}}}")?;
        }
        Node::Rule => out.push_str("----\n"),
        inline => {
            write_inline(out, inline)?;
            out.push('\n');
        }
    }
    Ok(())
}

fn write_inline_all(out: &mut String, nodes: &[Node]) -> Result<(), RenderError> {
    for node in nodes {
        write_inline(out, node)?;
    }
    Ok(())
}

fn write_inline(out: &mut String, node: &Node) -> Result<(), RenderError> {
    match node {
        Node::Text(text) => out.push_str(text),
        Node::Bold(content) => {
            out.push_str("__");
            write_inline_all(out, content)?;
            out.push_str("__");
        }
        Node::Italic(content) => {
            out.push_str("''");
            write_inline_all(out, content)?;
            out.push_str("''");
        }
        Node::Code(code) => {
            write!(out, "{{{{{code}}}}}")?;
        }
        Node::LineBreak => out.push_str("\\\\"),
        Node::Link { target, label } => match label {
            Some(label) => write!(out, "[{label}|{target}]")?,
            None => write!(out, "[{target}]")?,
        },
        Node::Plugin { name, args } => write_plugin(out, name, args)?,
        block => {
            write_block(out, block)?;
        }
    }
    Ok(())
}

fn write_plugin(
    out: &mut String,
    name: &str,
    args: &BTreeMap<String, String>,
) -> Result<(), RenderError> {
    write!(out, "[{{{name}")?;
    for (key, value) in args {
        write!(out, " {key}='{value}'")?;
    }
    out.push_str("}]");
    Ok(())
}
