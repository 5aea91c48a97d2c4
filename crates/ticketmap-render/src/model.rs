use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutPoint {
    pub x: f64,
    pub y: f64,
}

/// One depth level of the pyramid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRow {
    pub depth: u32,
    pub y: f64,
    pub start_x: f64,
    pub width: f64,
    /// Indices into the record list, in input order.
    pub members: Vec<usize>,
}

impl LayoutRow {
    pub fn center_x(&self) -> f64 {
        self.start_x + self.width / 2.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PyramidLayout {
    /// Top-left corner of each record's box, index-aligned with the record list.
    pub positions: Vec<LayoutPoint>,
    /// Rows by ascending depth.
    pub rows: Vec<LayoutRow>,
    pub max_row_width: f64,
    pub max_depth: u32,
    pub page_width: f64,
    pub page_height: f64,
    pub box_width: f64,
    pub box_height: f64,
}

impl PyramidLayout {
    pub fn row(&self, depth: u32) -> Option<&LayoutRow> {
        self.rows
            .binary_search_by_key(&depth, |r| r.depth)
            .ok()
            .map(|idx| &self.rows[idx])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramVertex {
    pub id: u32,
    pub key: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill_color: String,
    pub stroke_color: String,
    /// HTML label fragment (unescaped for XML).
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramEdge {
    pub id: u32,
    pub source: u32,
    pub target: u32,
    pub label: String,
    pub color: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeMode {
    /// Edges follow each record's `from_key`.
    Explicit,
    /// No record names a source: every record links to the first record one depth up.
    DepthFallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagramGraph {
    pub vertices: Vec<DiagramVertex>,
    pub edges: Vec<DiagramEdge>,
    pub edge_mode: EdgeMode,
    pub page_width: f64,
    pub page_height: f64,
}

impl DiagramGraph {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn vertex(&self, id: u32) -> Option<&DiagramVertex> {
        self.vertices.iter().find(|v| v.id == id)
    }
}
