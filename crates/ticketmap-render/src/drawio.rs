use crate::model::{DiagramEdge, DiagramGraph, DiagramVertex};
use crate::text::escape_xml_attr;
use crate::{Error, Result};
use std::fmt::Write as _;

pub const DEFAULT_TITLE: &str = "Jira Dependency Map";
pub const DEFAULT_DIAGRAM_ID: &str = "jira-dependency-map";
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawioRenderOptions {
    /// Page name shown in the diagram tab.
    pub title: String,
    pub diagram_id: String,
    pub host: String,
    pub agent: String,
    /// `modified` stamp on the envelope; `None` uses today's local date.
    pub modified: Option<chrono::NaiveDate>,
    pub grid_size: u32,
}

impl Default for DrawioRenderOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            diagram_id: DEFAULT_DIAGRAM_ID.to_string(),
            host: "app.diagrams.net".to_string(),
            agent: concat!("ticketmap ", env!("CARGO_PKG_VERSION")).to_string(),
            modified: None,
            grid_size: 10,
        }
    }
}

impl DrawioRenderOptions {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_modified(mut self, date: chrono::NaiveDate) -> Self {
        self.modified = Some(date);
        self
    }
}

fn vertex_style(v: &DiagramVertex) -> String {
    format!(
        "rounded=1;whiteSpace=wrap;html=1;fillColor=#{fill};strokeColor=#{stroke};strokeWidth=2;\
         align=left;verticalAlign=top;spacingLeft=6;spacingTop=4;",
        fill = v.fill_color,
        stroke = v.stroke_color
    )
}

fn edge_style(e: &DiagramEdge) -> String {
    format!(
        "edgeStyle=none;rounded=0;html=1;strokeColor=#{color};strokeWidth=2;endArrow=classic;endFill=1;",
        color = e.color
    )
}

/// Geometry is written as whole diagram units, truncated toward zero.
fn unit(v: f64) -> i64 {
    if v.is_finite() { v.trunc() as i64 } else { 0 }
}

fn write_vertex(out: &mut String, v: &DiagramVertex) {
    let _ = writeln!(
        out,
        r#"        <mxCell id="{id}" value="{value}" style="{style}" vertex="1" parent="1">"#,
        id = v.id,
        value = escape_xml_attr(&v.label),
        style = escape_xml_attr(&vertex_style(v)),
    );
    let _ = writeln!(
        out,
        r#"          <mxGeometry x="{x}" y="{y}" width="{w}" height="{h}" as="geometry"/>"#,
        x = unit(v.x),
        y = unit(v.y),
        w = unit(v.width),
        h = unit(v.height),
    );
    out.push_str("        </mxCell>\n");
}

fn write_edge(out: &mut String, e: &DiagramEdge) {
    let _ = writeln!(
        out,
        r#"        <mxCell id="{id}" value="{value}" style="{style}" edge="1" parent="1" source="{source}" target="{target}">"#,
        id = e.id,
        value = escape_xml_attr(&e.label),
        style = escape_xml_attr(&edge_style(e)),
        source = e.source,
        target = e.target,
    );
    out.push_str(r#"          <mxGeometry relative="1" as="geometry"/>"#);
    out.push('\n');
    out.push_str("        </mxCell>\n");
}

/// Serializes `graph` as an uncompressed draw.io (`mxfile`) document.
///
/// Callers are expected to skip rendering when there are no tickets; an empty graph is
/// rejected with [`Error::EmptyGraph`].
pub fn render_drawio(graph: &DiagramGraph, options: &DrawioRenderOptions) -> Result<String> {
    if graph.is_empty() {
        return Err(Error::EmptyGraph);
    }

    let modified = options
        .modified
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let mut out = String::with_capacity(512 + graph.vertices.len() * 512);
    out.push_str(XML_DECLARATION);
    out.push('\n');
    let _ = writeln!(
        out,
        r#"<mxfile host="{host}" modified="{modified}" agent="{agent}" version="1.0" type="device">"#,
        host = escape_xml_attr(&options.host),
        modified = modified.format("%Y-%m-%d"),
        agent = escape_xml_attr(&options.agent),
    );
    let _ = writeln!(
        out,
        r#"  <diagram name="{name}" id="{id}">"#,
        name = escape_xml_attr(&options.title),
        id = escape_xml_attr(&options.diagram_id),
    );
    let _ = writeln!(
        out,
        r#"    <mxGraphModel dx="0" dy="0" grid="1" gridSize="{grid}" guides="1" tooltips="1" connect="1" arrows="1" fold="1" page="1" pageScale="1" pageWidth="{pw}" pageHeight="{ph}" math="0" shadow="0">"#,
        grid = options.grid_size,
        pw = unit(graph.page_width),
        ph = unit(graph.page_height),
    );
    out.push_str("      <root>\n");
    out.push_str("        <mxCell id=\"0\"/>\n");
    out.push_str("        <mxCell id=\"1\" parent=\"0\"/>\n");

    for v in &graph.vertices {
        write_vertex(&mut out, v);
    }
    for e in &graph.edges {
        write_edge(&mut out, e);
    }

    out.push_str("      </root>\n");
    out.push_str("    </mxGraphModel>\n");
    out.push_str("  </diagram>\n");
    out.push_str("</mxfile>\n");

    tracing::debug!(
        vertices = graph.vertices.len(),
        edges = graph.edges.len(),
        bytes = out.len(),
        "rendered draw.io document"
    );
    Ok(out)
}
