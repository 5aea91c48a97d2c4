use crate::model::{DiagramEdge, DiagramGraph, DiagramVertex, EdgeMode, PyramidLayout};
use crate::text::escape_html;
use std::collections::{HashMap, HashSet};
use ticketmap_core::classify::{fill_color, status_badge, stroke_color};
use ticketmap_core::model::has_explicit_links;
use ticketmap_core::{SiteConfig, TicketRecord};

/// Identifiers 0 and 1 belong to the document's structural root cells.
pub const FIRST_CELL_ID: u32 = 2;

/// Visible summary length, ellipsis included.
pub const SUMMARY_MAX_CHARS: usize = 40;
const ELLIPSIS: &str = "...";
const VIA_MARKER: &str = "(via ";

/// Strips the `(via ...)` annotation and surrounding whitespace, then truncates to
/// [`SUMMARY_MAX_CHARS`] characters.
pub fn display_summary(summary: &str) -> String {
    let mut text = summary.trim();
    if let Some(idx) = text.find(VIA_MARKER) {
        text = text[..idx].trim();
    }

    if text.chars().count() <= SUMMARY_MAX_CHARS {
        return text.to_string();
    }
    let keep = SUMMARY_MAX_CHARS - ELLIPSIS.len();
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// HTML label: badge, linked key, optional status, line break, summary.
pub fn vertex_label(record: &TicketRecord, site: &SiteConfig) -> String {
    let status = record.status_text();
    let mut label = String::new();
    label.push_str(status_badge(status));
    label.push(' ');
    label.push_str(&format!(
        r#"<a href="{url}" target="_blank">{key}</a>"#,
        url = escape_html(&site.browse_url(&record.key)),
        key = escape_html(&record.key),
    ));
    if !status.is_empty() {
        label.push_str(&format!(
            r#" <font style="font-size:9px;color:#666">({})</font>"#,
            escape_html(status)
        ));
    }
    label.push_str(&format!(
        r#"<br/><font style="font-size:10px">{}</font>"#,
        escape_html(&display_summary(&record.summary))
    ));
    label
}

struct EdgeSet {
    edges: Vec<DiagramEdge>,
    seen: HashSet<(u32, u32, String)>,
}

impl EdgeSet {
    fn new() -> Self {
        Self {
            edges: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Adds an edge unless it is a self-loop or repeats an existing `(source, target, label)`.
    fn push(&mut self, next_id: &mut u32, source: u32, target: u32, label: &str) {
        if source == target {
            return;
        }
        if !self.seen.insert((source, target, label.to_string())) {
            return;
        }
        self.edges.push(DiagramEdge {
            id: *next_id,
            source,
            target,
            label: label.to_string(),
            color: stroke_color(label).to_string(),
        });
        *next_id += 1;
    }
}

/// Builds the vertex/edge graph for `records` placed by `layout`.
///
/// Vertices get identifiers first, in record order, then edges. When any record carries a
/// `from_key`, edges follow those links; otherwise each record links to the first record one
/// depth up. References to unknown keys are skipped.
pub fn build_graph(
    records: &[TicketRecord],
    layout: &PyramidLayout,
    site: &SiteConfig,
) -> DiagramGraph {
    tracing::debug!(records = records.len(), "building diagram graph");

    let mut next_id = FIRST_CELL_ID;
    let mut ids: HashMap<&str, u32> = HashMap::with_capacity(records.len());
    let mut vertices = Vec::with_capacity(records.len());

    for (record, pos) in records.iter().zip(&layout.positions) {
        let id = next_id;
        next_id += 1;
        // Duplicate keys: the last vertex wins for edge lookups.
        ids.insert(record.key.as_str(), id);

        vertices.push(DiagramVertex {
            id,
            key: record.key.clone(),
            x: pos.x,
            y: pos.y,
            width: layout.box_width,
            height: layout.box_height,
            fill_color: fill_color(record.link_label(), record.depth).to_string(),
            stroke_color: stroke_color(record.link_label()).to_string(),
            label: vertex_label(record, site),
        });
    }

    let mut edges = EdgeSet::new();
    let edge_mode = if has_explicit_links(records) {
        for record in records {
            let Some(parent_key) = record.from_key.as_deref() else {
                continue;
            };
            let (Some(&source), Some(&target)) =
                (ids.get(parent_key), ids.get(record.key.as_str()))
            else {
                tracing::debug!(key = %record.key, from_key = parent_key, "skipping orphan link");
                continue;
            };
            edges.push(&mut next_id, source, target, record.link_label());
        }
        EdgeMode::Explicit
    } else {
        for row in layout.rows.iter().filter(|r| r.depth > 0) {
            let Some(parent_row) = layout.row(row.depth - 1) else {
                continue;
            };
            let Some(&source) = parent_row
                .members
                .first()
                .and_then(|&idx| ids.get(records[idx].key.as_str()))
            else {
                continue;
            };
            for &idx in &row.members {
                let child = &records[idx];
                if let Some(&target) = ids.get(child.key.as_str()) {
                    edges.push(&mut next_id, source, target, child.link_label());
                }
            }
        }
        EdgeMode::DepthFallback
    };

    tracing::debug!(
        vertices = vertices.len(),
        edges = edges.edges.len(),
        mode = ?edge_mode,
        "diagram graph built"
    );

    DiagramGraph {
        vertices,
        edges: edges.edges,
        edge_mode,
        page_width: layout.page_width,
        page_height: layout.page_height,
    }
}
