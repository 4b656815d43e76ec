//! Tree -> fixed-width plain text renderer.
//!
//! This module operates **only** on a tree that went through
//! [`crate::resolve::resolve`]; it never sees markdown source.
//!
//! Layout model:
//! - block nodes render to a newline-terminated string of lines, each
//!   already carrying its indentation,
//! - span nodes render to inline text that is accumulated into the enclosing
//!   block's pending line buffer and flushed (wrapped) whenever a block child
//!   interrupts it or the block ends,
//! - headers and list items hang their body under a bullet (`2.1)`, `*`),
//! - inline code leaves the line buffer and is emitted as a ruled verbatim
//!   block, so its bytes are never reflowed.

mod layout;
mod refs;
mod table;

pub use refs::{RefResolver, UNRESOLVED};

use tracing::warn;

use crate::ast::{Node, NodeKind};
use crate::error::RenderError;
use crate::resolve::{Anchor, Resolved};
use crate::width::{str_width, wrap_line};
use layout::{collapse_trailing_newlines, flatten_inline, hang_bullet, indent_lines, rule, spaces};

/// Glyph used for unordered list items.
pub const UNORDERED_BULLET: &str = "*";

/// What to do with a span node that contains a block node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NestingPolicy {
    /// Render the block as inline text, collapsing its lines.
    #[default]
    Flatten,
    /// Fail with [`RenderError::MalformedNesting`].
    Reject,
}

/// Rendering options that control layout decisions.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Column budget for wrapped text.
    pub max_width: usize,

    /// Extra indentation for definition descriptions and lists nested
    /// directly inside lists.
    pub indent_step: usize,

    /// Extra indentation for blockquote content.
    pub quote_indent: usize,

    /// Length of horizontal rules and separator lines.
    pub rule_width: usize,

    /// Wrap paragraph text to `max_width`. Never applied inside blockquotes
    /// or verbatim content.
    pub wrap: bool,

    /// Wrap every node's output in `<kind>...</kind>` markers. Disables
    /// wrapping so the text between markers matches non-debug output.
    pub debug: bool,

    pub nesting: NestingPolicy,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_width: 80,
            indent_step: 2,
            quote_indent: 4,
            rule_width: 80,
            wrap: true,
            debug: false,
            nesting: NestingPolicy::Flatten,
        }
    }
}

/// Per-call context threaded down the recursion.
#[derive(Debug, Clone)]
pub(crate) struct Frame {
    header: Option<Anchor>,
    item: Option<Anchor>,
    /// Columns that enclosing bullets will add in front of every line.
    hang: usize,
    wrap: bool,
    /// Emit inline code as ruled verbatim blocks. Off where output is
    /// collapsed onto one line (table cells, flattened nesting).
    verbatim_code: bool,
}

impl Frame {
    fn new(opts: &RenderOptions) -> Self {
        Self {
            header: None,
            item: None,
            hang: 0,
            wrap: opts.wrap && !opts.debug,
            verbatim_code: true,
        }
    }

    pub(crate) fn without_wrap(&self) -> Frame {
        Frame {
            wrap: false,
            ..self.clone()
        }
    }

    /// Frame for content that ends up on a single line.
    pub(crate) fn single_line(&self) -> Frame {
        Frame {
            wrap: false,
            verbatim_code: false,
            ..self.clone()
        }
    }
}

/// Renders a resolved tree. One instance per conversion.
pub struct Renderer<'a> {
    opts: &'a RenderOptions,
    refs: RefResolver<'a>,
    root: &'a Node,
}

impl<'a> Renderer<'a> {
    pub fn new(resolved: &'a Resolved, opts: &'a RenderOptions) -> Self {
        Self {
            opts,
            refs: RefResolver::new(resolved),
            root: &resolved.root,
        }
    }

    /// Renders the whole document.
    pub fn render(&self) -> Result<String, RenderError> {
        self.render_node(self.root, 0)
    }

    /// Renders one node at the given indentation.
    ///
    /// Span nodes are rendered as a one-line block of their own.
    pub fn render_node(&self, node: &Node, indent: usize) -> Result<String, RenderError> {
        self.render_node_in(node, indent, &Frame::new(self.opts))
    }

    pub(crate) fn render_node_in(
        &self,
        node: &Node,
        indent: usize,
        frame: &Frame,
    ) -> Result<String, RenderError> {
        if node.is_block() {
            self.block(node, indent, frame)
        } else {
            self.render_container(std::slice::from_ref(node), indent, frame)
        }
    }

    fn block(&self, node: &Node, indent: usize, frame: &Frame) -> Result<String, RenderError> {
        let body = match &node.kind {
            NodeKind::Root
            | NodeKind::Blank
            | NodeKind::Paragraph
            | NodeKind::DefinitionList
            | NodeKind::DefinitionTerm
            | NodeKind::DefinitionDescription
            | NodeKind::TableHead
            | NodeKind::TableBody
            | NodeKind::TableFoot
            | NodeKind::TableRow
            | NodeKind::TableCell => self.render_children(node, indent, frame)?,

            NodeKind::UnorderedList | NodeKind::OrderedList { .. } => {
                self.render_list(node, indent, frame)?
            }
            NodeKind::ListItem => self.render_item(node, indent, frame, UNORDERED_BULLET)?,
            NodeKind::Header { .. } => self.render_header(node, indent, frame)?,
            NodeKind::Table => self.render_table(node, indent, frame)?,

            NodeKind::Blockquote => {
                let inner = self.render_children(
                    node,
                    indent + self.opts.quote_indent,
                    &frame.without_wrap(),
                )?;
                let sep = self.rule(indent, frame);
                format!("{sep}{inner}{sep}")
            }
            NodeKind::Codeblock { value } => self.verbatim_block(value, indent, frame),
            NodeKind::HorizontalRule => self.rule(indent, frame),

            NodeKind::RawPassthrough { value } | NodeKind::Math { value } => {
                if node.children.is_empty() {
                    format!("{value}\n")
                } else {
                    self.render_children(node, indent, frame)?
                }
            }
            NodeKind::RawHtmlElement { .. }
            | NodeKind::XmlComment { .. }
            | NodeKind::XmlProcessingInstruction { .. } => String::new(),

            // span kinds belong to `span`; a stray one renders as a one-line block
            _ => self.render_container(std::slice::from_ref(node), indent, frame)?,
        };

        if self.opts.debug {
            let kind = node.kind_name();
            let pad = spaces(indent);
            return Ok(format!("{pad}<{kind}>\n{body}{pad}</{kind}>\n"));
        }
        Ok(body)
    }

    fn render_children(
        &self,
        node: &Node,
        indent: usize,
        frame: &Frame,
    ) -> Result<String, RenderError> {
        self.render_seq(Some(node), &node.children, indent, frame)
    }

    /// Like [`Self::render_children`] but over a bare slice of nodes with no
    /// owning parent (table cells, span-only roots).
    pub(crate) fn render_container(
        &self,
        children: &[Node],
        indent: usize,
        frame: &Frame,
    ) -> Result<String, RenderError> {
        self.render_seq(None, children, indent, frame)
    }

    fn render_seq(
        &self,
        parent: Option<&Node>,
        children: &[Node],
        indent: usize,
        frame: &Frame,
    ) -> Result<String, RenderError> {
        let mut flow = Flow::default();
        for child in children {
            self.flow(&mut flow, parent, child, indent, frame)?;
        }
        self.flush(&mut flow, indent, frame);
        Ok(collapse_trailing_newlines(flow.body))
    }

    /// Feeds one child of a block into `flow`.
    fn flow(
        &self,
        flow: &mut Flow,
        parent: Option<&Node>,
        child: &Node,
        indent: usize,
        frame: &Frame,
    ) -> Result<(), RenderError> {
        if child.is_block() {
            self.flush(flow, indent, frame);
            let child_indent = indent + self.indent_delta(parent, child);
            flow.body.push_str(&self.block(child, child_indent, frame)?);
            return Ok(());
        }
        match &child.kind {
            NodeKind::InlineCode { value } if frame.verbatim_code => {
                self.flush(flow, indent, frame);
                let code = self.verbatim_block(value, indent, frame);
                flow.body.push_str(&self.tag(child, indent, code));
            }
            // styled runs holding code are walked in place so the code can
            // leave the line buffer too
            NodeKind::Emphasis
            | NodeKind::Strong
            | NodeKind::Math { .. }
            | NodeKind::Abbreviation { .. }
            | NodeKind::EmphasisEntity { .. }
                if frame.verbatim_code && child.children.iter().any(contains_inline_code) =>
            {
                let kind = child.kind_name();
                if self.opts.debug {
                    flow.pending.push_str(&format!("<{kind}>"));
                }
                for grandchild in &child.children {
                    if grandchild.is_block() {
                        let text = self.nested_block(child, grandchild, frame)?;
                        flow.pending.push_str(&text);
                    } else {
                        self.flow(flow, Some(child), grandchild, indent, frame)?;
                    }
                }
                if self.opts.debug {
                    flow.pending.push_str(&format!("</{kind}>"));
                }
            }
            _ => flow.pending.push_str(&self.span(child, frame)?),
        }
        Ok(())
    }

    fn indent_delta(&self, parent: Option<&Node>, child: &Node) -> usize {
        match child.kind {
            NodeKind::DefinitionDescription => self.opts.indent_step,
            _ if parent.is_some_and(Node::is_list) && child.is_list() => self.opts.indent_step,
            _ => 0,
        }
    }

    /// Appends the pending inline text to `body` as wrapped, indented lines.
    fn flush(&self, flow: &mut Flow, indent: usize, frame: &Frame) {
        let text = std::mem::take(&mut flow.pending);
        if text.trim().is_empty() {
            return;
        }
        let text = text.trim_start_matches(' ');
        let text = text.strip_suffix('\n').unwrap_or(text);
        let body = &mut flow.body;
        let budget = self
            .opts
            .max_width
            .saturating_sub(indent + frame.hang)
            .max(1);
        let pad = spaces(indent);

        for hard_line in text.split('\n') {
            let hard_line = hard_line.trim_end();
            let lines = if frame.wrap {
                wrap_line(hard_line, budget)
            } else {
                vec![hard_line.to_string()]
            };
            for line in lines {
                if !line.is_empty() {
                    body.push_str(&pad);
                    body.push_str(&line);
                }
                body.push('\n');
            }
        }
    }

    fn verbatim_block(&self, value: &str, indent: usize, frame: &Frame) -> String {
        let sep = self.rule(indent, frame);
        let content = value.strip_suffix('\n').unwrap_or(value);
        format!("{sep}{}\n{sep}", indent_lines(content, indent))
    }

    /// Separator rule, shortened so it ends within `max_width` once the
    /// block indent and enclosing bullets are in front of it.
    fn rule(&self, indent: usize, frame: &Frame) -> String {
        let room = self
            .opts
            .max_width
            .saturating_sub(indent + frame.hang)
            .max(1);
        rule(indent, self.opts.rule_width.min(room))
    }

    fn render_list(&self, list: &Node, indent: usize, frame: &Frame) -> Result<String, RenderError> {
        let ordered = matches!(list.kind, NodeKind::OrderedList { .. });
        let mut body = String::new();
        for child in &list.children {
            let rendered = match child.kind {
                NodeKind::ListItem => {
                    let bullet = match (&child.options.full_mark, ordered) {
                        (Some(mark), true) => format!("{mark})"),
                        _ => UNORDERED_BULLET.to_string(),
                    };
                    let item = self.render_item(child, indent, frame, &bullet)?;
                    self.tag(child, indent, item)
                }
                _ if child.is_block() => {
                    self.block(child, indent + self.indent_delta(Some(list), child), frame)?
                }
                _ => self.render_container(std::slice::from_ref(child), indent, frame)?,
            };
            body.push_str(&rendered);
        }
        Ok(collapse_trailing_newlines(body))
    }

    fn render_item(
        &self,
        item: &Node,
        indent: usize,
        frame: &Frame,
        bullet: &str,
    ) -> Result<String, RenderError> {
        let inner = Frame {
            item: Anchor::from_node(item).or_else(|| frame.item.clone()),
            hang: frame.hang + str_width(bullet) + 1,
            ..frame.clone()
        };
        let body = self.render_children(item, indent, &inner)?;
        Ok(hang_bullet(&body, indent, bullet))
    }

    fn render_header(
        &self,
        header: &Node,
        indent: usize,
        frame: &Frame,
    ) -> Result<String, RenderError> {
        let Some(mark) = header.options.full_mark.as_deref() else {
            return self.render_children(header, indent, frame);
        };
        let bullet = format!("{mark})");
        let inner = Frame {
            header: Anchor::from_node(header),
            hang: frame.hang + str_width(&bullet) + 1,
            ..frame.clone()
        };
        let body = self.render_children(header, indent, &inner)?;
        Ok(hang_bullet(&body, indent, &bullet))
    }

    /// Debug wrapper for list items, which bypass [`Self::block`] so they can
    /// receive their list's bullet.
    fn tag(&self, node: &Node, indent: usize, body: String) -> String {
        if !self.opts.debug {
            return body;
        }
        let kind = node.kind_name();
        let pad = spaces(indent);
        format!("{pad}<{kind}>\n{body}{pad}</{kind}>\n")
    }

    fn span(&self, node: &Node, frame: &Frame) -> Result<String, RenderError> {
        let text = match &node.kind {
            NodeKind::Text { value } => value.replace(['\r', '\n'], " "),
            NodeKind::LineBreak => "\n".to_string(),

            NodeKind::Emphasis | NodeKind::Strong => self.inline_children(node, frame)?,
            NodeKind::Math { value } | NodeKind::Abbreviation { value } => {
                if node.children.is_empty() {
                    value.replace(['\r', '\n'], " ")
                } else {
                    self.inline_children(node, frame)?
                }
            }
            NodeKind::EmphasisEntity { value } => {
                if node.children.is_empty() {
                    decode_entity(value)
                } else {
                    self.inline_children(node, frame)?
                }
            }

            NodeKind::Link => match node.children.as_slice() {
                [Node {
                    kind: NodeKind::Text { value },
                    ..
                }] => format!("[{}]", value.replace(['\r', '\n'], " ")),
                _ => node.attr.get("href").cloned().unwrap_or_default(),
            },
            NodeKind::Image => node.attr.get("src").cloned().unwrap_or_default(),
            // single-line contexts only; the block flow takes code out first
            NodeKind::InlineCode { value } => value.clone(),

            NodeKind::TypographicSymbol { value } => value.ascii().to_string(),
            NodeKind::SmartQuote { value } => value.ascii().to_string(),

            NodeKind::Reference { value } => {
                self.refs
                    .resolve(value, frame.header.as_ref(), frame.item.as_ref())
            }
            NodeKind::ActionItem { value } => format!("-->({value})"),
            NodeKind::IssueLink { value } => value.clone(),
            NodeKind::RawPassthrough { value } => value.clone(),

            NodeKind::Footnote { .. }
            | NodeKind::Label { .. }
            | NodeKind::RawHtmlElement { .. }
            | NodeKind::XmlComment { .. }
            | NodeKind::XmlProcessingInstruction { .. } => String::new(),

            // block kinds never reach here: callers check `is_block` first
            _ => String::new(),
        };

        if self.opts.debug {
            let kind = node.kind_name();
            return Ok(format!("<{kind}>{text}</{kind}>"));
        }
        Ok(text)
    }

    /// Renders a span node's children as one line of text.
    fn inline_children(&self, node: &Node, frame: &Frame) -> Result<String, RenderError> {
        let mut out = String::new();
        for child in &node.children {
            if child.is_block() {
                out.push_str(&self.nested_block(node, child, frame)?);
            } else {
                out.push_str(&self.span(child, frame)?);
            }
        }
        Ok(out.replace('\n', " "))
    }

    fn nested_block(&self, parent: &Node, child: &Node, frame: &Frame) -> Result<String, RenderError> {
        let malformed = RenderError::MalformedNesting {
            parent: parent.kind_name(),
            child: child.kind_name(),
        };
        match self.opts.nesting {
            NestingPolicy::Reject => Err(malformed),
            NestingPolicy::Flatten => {
                warn!("{malformed}; flattening");
                let text = self.block(child, 0, &frame.single_line())?;
                Ok(flatten_inline(&text))
            }
        }
    }
}

/// Pending inline text and the finished lines of the block being rendered.
#[derive(Default)]
struct Flow {
    body: String,
    pending: String,
}

fn contains_inline_code(node: &Node) -> bool {
    matches!(node.kind, NodeKind::InlineCode { .. }) || node.children.iter().any(contains_inline_code)
}

/// Decodes an entity given either as source text (`&amp;`) or bare name (`amp`).
fn decode_entity(value: &str) -> String {
    if value.starts_with('&') {
        html_escape::decode_html_entities(value).into_owned()
    } else {
        html_escape::decode_html_entities(&format!("&{value};")).into_owned()
    }
}
