//! Standard HTML renderer.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::Arc;

use crate::markup::{ListItem, Node, ParsedDocument};

use super::context::RenderingContext;
use super::types::{RenderError, Renderer};

/// Renders a parsed document as HTML for page views.
///
/// Text content is escaped; internal links resolve under `/wiki/`, external
/// links keep their target verbatim, and a link back to the page being
/// rendered becomes plain emphasized text. Executed plugin nodes expand to a
/// span carrying the plugin name so surrounding chrome can style or hydrate
/// them.
pub struct XhtmlRenderer {
    context: RenderingContext,
    document: Arc<ParsedDocument>,
}

impl XhtmlRenderer {
    pub fn new(context: &RenderingContext, document: Arc<ParsedDocument>) -> Self {
        Self {
            context: context.clone(),
            document,
        }
    }

    fn write_block(&self, out: &mut String, node: &Node) -> Result<(), RenderError> {
        match node {
            Node::Heading { level, content } => {
                let rank = level.rank();
                write!(out, "<h{rank}>")?;
                self.write_inline_all(out, content)?;
                writeln!(out, "</h{rank}>")?;
            }
            Node::Paragraph(content) => {
                out.push_str("<p>");
                self.write_inline_all(out, content)?;
                out.push_str("</p>\n");
            }
            Node::List { ordered, items } => self.write_list(out, *ordered, items)?,
            Node::CodeBlock(code) => {
                writeln!(out, "<pre><code>{}</code></pre>", escape(code))?;
            }
            Node::Rule => out.push_str("<hr />\n"),
            inline => {
                // Inline node at block position; wrap it like a paragraph.
                out.push_str("<p>");
                self.write_inline(out, inline)?;
                out.push_str("</p>\n");
            }
        }
        Ok(())
    }

    fn write_list(
        &self,
        out: &mut String,
        ordered: bool,
        items: &[ListItem],
    ) -> Result<(), RenderError> {
        let tag = if ordered { "ol" } else { "ul" };
        let mut depth = 0u8;
        for item in items {
            let target = item.depth.max(1);
            while depth < target {
                write!(out, "<{tag}>")?;
                depth += 1;
            }
            while depth > target {
                write!(out, "</{tag}>")?;
                depth -= 1;
            }
            out.push_str("<li>");
            self.write_inline_all(out, &item.content)?;
            out.push_str("</li>");
        }
        while depth > 0 {
            write!(out, "</{tag}>")?;
            depth -= 1;
        }
        out.push('\n');
        Ok(())
    }

    fn write_inline_all(&self, out: &mut String, nodes: &[Node]) -> Result<(), RenderError> {
        for node in nodes {
            self.write_inline(out, node)?;
        }
        Ok(())
    }

    fn write_inline(&self, out: &mut String, node: &Node) -> Result<(), RenderError> {
        match node {
            Node::Text(text) => out.push_str(&escape(text)),
            Node::Bold(content) => {
                out.push_str("<strong>");
                self.write_inline_all(out, content)?;
                out.push_str("</strong>");
            }
            Node::Italic(content) => {
                out.push_str("<em>");
                self.write_inline_all(out, content)?;
                out.push_str("</em>");
            }
            Node::Code(code) => {
                write!(out, "<code>{}</code>", escape(code))?;
            }
            Node::LineBreak => out.push_str("<br />"),
            Node::Link { target, label } => self.write_link(out, target, label.as_deref())?,
            Node::Plugin { name, args } => write_plugin(out, name, args)?,
            block => {
                // Block node in inline position does not occur for documents
                // the parser produces; render its debug form rather than drop
                // content silently.
                write!(out, "{block:?}")?;
            }
        }
        Ok(())
    }

    fn write_link(
        &self,
        out: &mut String,
        target: &str,
        label: Option<&str>,
    ) -> Result<(), RenderError> {
        let text = escape(label.unwrap_or(target));
        if Node::is_external_target(target) {
            write!(
                out,
                "<a class=\"external\" href=\"{}\">{text}</a>",
                escape(target)
            )?;
        } else if target == self.context.page().as_str() {
            // A page linking to itself renders as emphasized text, not a
            // self-referential anchor.
            write!(out, "<strong class=\"selflink\">{text}</strong>")?;
        } else {
            write!(
                out,
                "<a class=\"wikipage\" href=\"/wiki/{}\">{text}</a>",
                href_segment(target)
            )?;
        }
        Ok(())
    }
}

impl Renderer for XhtmlRenderer {
    fn render(&self) -> Result<String, RenderError> {
        let mut out = String::new();
        for node in self.document.nodes() {
            self.write_block(&mut out, node)?;
        }
        Ok(out)
    }
}

fn write_plugin(
    out: &mut String,
    name: &str,
    args: &BTreeMap<String, String>,
) -> Result<(), RenderError> {
    let body = args.get("text").map(String::as_str).unwrap_or(name);
    write!(
        out,
        "<span class=\"plugin\" data-plugin=\"{}\">{}</span>",
        escape(name),
        escape(body)
    )?;
    Ok(())
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn href_segment(target: &str) -> String {
    escape(target).replace(' ', "%20")
}
