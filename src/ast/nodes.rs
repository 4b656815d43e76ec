use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ast::{ListStyle, SmartQuote, TypographicSymbol};

/// A node of the parsed document tree.
///
/// Each node exclusively owns its children; the tree has no sharing and no
/// cycles. `attr` carries the handful of string attributes some kinds use
/// (`href` on links, `src` on images), `options` carries parser and
/// resolver metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    #[serde(flatten)]
    pub kind: NodeKind,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attr: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "NodeOptions::is_empty")]
    pub options: NodeOptions,
}

/// Node kinds, tagged by `type` in the serialized tree.
///
/// The set is closed: a tree naming any other kind fails to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum NodeKind {
    Root,
    Blank,
    Paragraph,
    Header {
        /// Heading level (1..=6).
        level: u8,
        /// Explicit own-segment mark overriding the outline counter.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mark: Option<String>,
    },
    HorizontalRule,
    Table,
    TableRow,
    TableCell,
    TableHead,
    TableBody,
    TableFoot,
    Blockquote,
    Codeblock {
        value: String,
    },
    UnorderedList,
    OrderedList {
        #[serde(default)]
        style: ListStyle,
        #[serde(default = "default_start")]
        start: usize,
    },
    ListItem,
    DefinitionList,
    DefinitionTerm,
    DefinitionDescription,
    Text {
        value: String,
    },
    LineBreak,
    Emphasis,
    Strong,
    Link,
    Image,
    InlineCode {
        value: String,
    },
    Footnote {
        #[serde(default)]
        value: String,
    },
    RawPassthrough {
        value: String,
    },
    EmphasisEntity {
        #[serde(default)]
        value: String,
    },
    TypographicSymbol {
        value: TypographicSymbol,
    },
    SmartQuote {
        value: SmartQuote,
    },
    Math {
        #[serde(default)]
        value: String,
    },
    Abbreviation {
        #[serde(default)]
        value: String,
    },
    Reference {
        value: String,
    },
    Label {
        value: String,
    },
    ActionItem {
        value: String,
    },
    IssueLink {
        value: String,
    },
    RawHtmlElement {
        #[serde(default)]
        value: String,
    },
    XmlComment {
        #[serde(default)]
        value: String,
    },
    XmlProcessingInstruction {
        #[serde(default)]
        value: String,
    },
}

fn default_start() -> usize {
    1
}

/// Whether a node starts its own indented text region or flows inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Block,
    Span,
}

/// Parser- and resolver-assigned metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeOptions {
    /// Parser-assigned category for kinds that can appear either way.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,

    /// Zero-based index among siblings of the same kind (headers, list items).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_position: Option<usize>,

    /// Identifier of the sibling group `relative_position` counts within.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_mark: Option<String>,
}

impl NodeOptions {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.relative_position.is_none()
            && self.scope.is_none()
            && self.full_mark.is_none()
    }
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            attr: BTreeMap::new(),
            options: NodeOptions::default(),
        }
    }

    pub fn with_children(kind: NodeKind, children: Vec<Node>) -> Self {
        Self {
            children,
            ..Self::new(kind)
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Text {
            value: value.into(),
        })
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attr.insert(name.into(), value.into());
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.options.category = Some(category);
        self
    }

    /// Category of this node.
    ///
    /// Most kinds have a fixed category; passthrough-like kinds take the one
    /// the parser recorded in `options.category`, defaulting to span.
    pub fn category(&self) -> Category {
        match &self.kind {
            NodeKind::Root
            | NodeKind::Blank
            | NodeKind::Paragraph
            | NodeKind::Header { .. }
            | NodeKind::HorizontalRule
            | NodeKind::Table
            | NodeKind::TableRow
            | NodeKind::TableCell
            | NodeKind::TableHead
            | NodeKind::TableBody
            | NodeKind::TableFoot
            | NodeKind::Blockquote
            | NodeKind::Codeblock { .. }
            | NodeKind::UnorderedList
            | NodeKind::OrderedList { .. }
            | NodeKind::ListItem
            | NodeKind::DefinitionList
            | NodeKind::DefinitionTerm
            | NodeKind::DefinitionDescription => Category::Block,

            NodeKind::RawPassthrough { .. }
            | NodeKind::Math { .. }
            | NodeKind::RawHtmlElement { .. }
            | NodeKind::XmlComment { .. }
            | NodeKind::XmlProcessingInstruction { .. } => {
                self.options.category.unwrap_or(Category::Span)
            }

            NodeKind::Text { .. }
            | NodeKind::LineBreak
            | NodeKind::Emphasis
            | NodeKind::Strong
            | NodeKind::Link
            | NodeKind::Image
            | NodeKind::InlineCode { .. }
            | NodeKind::Footnote { .. }
            | NodeKind::EmphasisEntity { .. }
            | NodeKind::TypographicSymbol { .. }
            | NodeKind::SmartQuote { .. }
            | NodeKind::Abbreviation { .. }
            | NodeKind::Reference { .. }
            | NodeKind::Label { .. }
            | NodeKind::ActionItem { .. }
            | NodeKind::IssueLink { .. } => Category::Span,
        }
    }

    pub fn is_block(&self) -> bool {
        self.category() == Category::Block
    }

    /// Kebab-case kind name, as it appears in the serialized `type` tag.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Root => "root",
            NodeKind::Blank => "blank",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Header { .. } => "header",
            NodeKind::HorizontalRule => "horizontal-rule",
            NodeKind::Table => "table",
            NodeKind::TableRow => "table-row",
            NodeKind::TableCell => "table-cell",
            NodeKind::TableHead => "table-head",
            NodeKind::TableBody => "table-body",
            NodeKind::TableFoot => "table-foot",
            NodeKind::Blockquote => "blockquote",
            NodeKind::Codeblock { .. } => "codeblock",
            NodeKind::UnorderedList => "unordered-list",
            NodeKind::OrderedList { .. } => "ordered-list",
            NodeKind::ListItem => "list-item",
            NodeKind::DefinitionList => "definition-list",
            NodeKind::DefinitionTerm => "definition-term",
            NodeKind::DefinitionDescription => "definition-description",
            NodeKind::Text { .. } => "text",
            NodeKind::LineBreak => "line-break",
            NodeKind::Emphasis => "emphasis",
            NodeKind::Strong => "strong",
            NodeKind::Link => "link",
            NodeKind::Image => "image",
            NodeKind::InlineCode { .. } => "inline-code",
            NodeKind::Footnote { .. } => "footnote",
            NodeKind::RawPassthrough { .. } => "raw-passthrough",
            NodeKind::EmphasisEntity { .. } => "emphasis-entity",
            NodeKind::TypographicSymbol { .. } => "typographic-symbol",
            NodeKind::SmartQuote { .. } => "smart-quote",
            NodeKind::Math { .. } => "math",
            NodeKind::Abbreviation { .. } => "abbreviation",
            NodeKind::Reference { .. } => "reference",
            NodeKind::Label { .. } => "label",
            NodeKind::ActionItem { .. } => "action-item",
            NodeKind::IssueLink { .. } => "issue-link",
            NodeKind::RawHtmlElement { .. } => "raw-html-element",
            NodeKind::XmlComment { .. } => "xml-comment",
            NodeKind::XmlProcessingInstruction { .. } => "xml-processing-instruction",
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::UnorderedList | NodeKind::OrderedList { .. }
        )
    }
}
