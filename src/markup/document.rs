//! Structured document tree produced by markup parsing.

use std::collections::BTreeMap;

/// Heading weight, largest first. `!!!` maps to [`HeadingLevel::Large`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    Large,
    Medium,
    Small,
}

impl HeadingLevel {
    /// Corresponding HTML heading rank (`h1`..`h3`).
    pub fn rank(&self) -> u8 {
        match self {
            HeadingLevel::Large => 1,
            HeadingLevel::Medium => 2,
            HeadingLevel::Small => 3,
        }
    }

    /// Number of `!` markers that produce this level.
    pub fn markers(&self) -> usize {
        match self {
            HeadingLevel::Large => 3,
            HeadingLevel::Medium => 2,
            HeadingLevel::Small => 1,
        }
    }
}

/// One item of a list block. Depth counts the repeated list markers, so `**`
/// yields depth 2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub depth: u8,
    pub content: Vec<Node>,
}

/// A node of the parsed document tree.
///
/// Block nodes appear at the top level of a document; inline nodes appear
/// inside headings, paragraphs and list items. Renderers walk this tree;
/// nothing in the tree references the raw source except through
/// [`ParsedDocument::page_data`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Heading {
        level: HeadingLevel,
        content: Vec<Node>,
    },
    Paragraph(Vec<Node>),
    List {
        ordered: bool,
        items: Vec<ListItem>,
    },
    CodeBlock(String),
    Rule,
    Text(String),
    Bold(Vec<Node>),
    Italic(Vec<Node>),
    Code(String),
    Link {
        target: String,
        label: Option<String>,
    },
    LineBreak,
    /// An executed plugin directive. Present only when the rendering context
    /// enables plugin execution; otherwise the directive survives verbatim as
    /// text.
    Plugin {
        name: String,
        args: BTreeMap<String, String>,
    },
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }

    /// Whether the link target points outside the wiki.
    pub fn is_external_target(target: &str) -> bool {
        target.starts_with("http://")
            || target.starts_with("https://")
            || target.starts_with("mailto:")
    }
}

/// Immutable result of parsing one page revision.
///
/// Owns the exact raw text it was derived from; the cache compares that text
/// byte-for-byte before reusing a memoized document, since upstream filters
/// may rewrite page data between saves. Documents are replaced, never
/// mutated, on re-render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument {
    page_data: String,
    nodes: Vec<Node>,
}

impl ParsedDocument {
    pub fn new(page_data: impl Into<String>, nodes: Vec<Node>) -> Self {
        Self {
            page_data: page_data.into(),
            nodes,
        }
    }

    /// The raw markup this document was parsed from.
    pub fn page_data(&self) -> &str {
        &self.page_data
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Return the document stamped with the given source text.
    ///
    /// The rendering manager stamps every freshly parsed document with the
    /// exact input it handed to the parser, so the staleness comparison never
    /// depends on a parser implementation getting this right.
    pub fn stamped(mut self, page_data: &str) -> Self {
        if self.page_data != page_data {
            self.page_data = page_data.to_owned();
        }
        self
    }
}
