//! Table layout.
//!
//! Cells are flattened onto one line, padded to the widest cell of their
//! column and joined with ` | `. A dashed rule closes the table head.

use crate::ast::{Node, NodeKind};
use crate::error::RenderError;
use crate::render::layout::{flatten_inline, spaces};
use crate::render::{Frame, Renderer};
use crate::width::str_width;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Head,
    Body,
    Foot,
}

impl Section {
    fn kind_name(self) -> &'static str {
        match self {
            Section::Head => "table-head",
            Section::Body => "table-body",
            Section::Foot => "table-foot",
        }
    }
}

struct Row {
    section: Section,
    cells: Vec<String>,
}

impl Renderer<'_> {
    pub(super) fn render_table(
        &self,
        table: &Node,
        indent: usize,
        frame: &Frame,
    ) -> Result<String, RenderError> {
        let cell_frame = frame.single_line();
        let mut rows: Vec<Row> = Vec::new();
        for child in &table.children {
            let section = match child.kind {
                NodeKind::TableHead => Section::Head,
                NodeKind::TableFoot => Section::Foot,
                NodeKind::TableRow => {
                    rows.push(self.table_row(child, Section::Body, &cell_frame)?);
                    continue;
                }
                _ => Section::Body,
            };
            for row in &child.children {
                rows.push(self.table_row(row, section, &cell_frame)?);
            }
        }

        if rows.is_empty() {
            return Ok(String::new());
        }

        let col_count = rows.iter().map(|r| r.cells.len()).max().unwrap_or(0);
        let mut widths = vec![0usize; col_count];
        for row in &mut rows {
            row.cells.resize(col_count, String::new());
            for (w, cell) in widths.iter_mut().zip(&row.cells) {
                *w = (*w).max(str_width(cell));
            }
        }
        let total: usize = widths.iter().sum::<usize>() + 3 * col_count.saturating_sub(1);

        let debug = self.opts.debug;
        let pad = spaces(indent);
        let mut out = String::new();
        let mut open: Option<Section> = None;

        for (ri, row) in rows.iter().enumerate() {
            if debug && open != Some(row.section) {
                if let Some(prev) = open {
                    out.push_str(&format!("{pad}</{}>\n", prev.kind_name()));
                }
                out.push_str(&format!("{pad}<{}>\n", row.section.kind_name()));
                open = Some(row.section);
            }

            let cells: Vec<String> = row
                .cells
                .iter()
                .zip(&widths)
                .map(|(cell, &w)| {
                    let padded = format!("{cell}{}", spaces(w - str_width(cell)));
                    if debug {
                        format!("<table-cell>{padded}</table-cell>")
                    } else {
                        padded
                    }
                })
                .collect();
            let line = cells.join(" | ");
            let line = if debug {
                format!("<table-row>{line}</table-row>")
            } else {
                line.trim_end().to_string()
            };
            out.push_str(&pad);
            out.push_str(&line);
            out.push('\n');

            let head_ends = row.section == Section::Head
                && rows.get(ri + 1).is_none_or(|next| next.section != Section::Head);
            if head_ends {
                out.push_str(&pad);
                out.push_str(&"-".repeat(total));
                out.push('\n');
            }
        }
        if let Some(last) = open {
            out.push_str(&format!("{pad}</{}>\n", last.kind_name()));
        }
        Ok(out)
    }

    fn table_row(&self, row: &Node, section: Section, frame: &Frame) -> Result<Row, RenderError> {
        let mut cells = Vec::new();
        if matches!(row.kind, NodeKind::TableRow) {
            for cell in &row.children {
                cells.push(self.table_cell(cell, frame)?);
            }
        } else {
            cells.push(self.table_cell(row, frame)?);
        }
        Ok(Row { section, cells })
    }

    fn table_cell(&self, cell: &Node, frame: &Frame) -> Result<String, RenderError> {
        let text = if matches!(cell.kind, NodeKind::TableCell) {
            self.render_container(&cell.children, 0, frame)?
        } else {
            self.render_node_in(cell, 0, frame)?
        };
        Ok(flatten_inline(&text))
    }
}
