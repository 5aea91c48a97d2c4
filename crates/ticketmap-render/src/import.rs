//! Reader for existing draw.io documents.
//!
//! Pages stored inline and pages stored as compressed text payloads (base64 of raw deflate
//! of the URL-encoded `mxGraphModel`) are both read. A payload that fails to decode skips its
//! page with a warning.

use crate::Result;
use crate::text::html_to_text_lines;
use base64::Engine as _;
use serde::Serialize;
use std::io::Read as _;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawioNode {
    pub id: String,
    /// Raw `value` (HTML when the cell uses `html=1`).
    pub value: String,
    /// Plain-text lines recovered from `value`.
    pub lines: Vec<String>,
    pub parent: String,
    pub style: String,
}

impl DrawioNode {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawioEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub style: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DrawioDocument {
    pub nodes: Vec<DrawioNode>,
    pub edges: Vec<DrawioEdge>,
    /// Pages skipped because their compressed content could not be decoded.
    pub skipped_pages: Vec<String>,
}

pub fn read_drawio_file(path: impl AsRef<Path>) -> Result<DrawioDocument> {
    let text = std::fs::read_to_string(path.as_ref())?;
    parse_drawio(&text)
}

#[derive(Debug, thiserror::Error)]
enum PageDecodeError {
    #[error("base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("inflate: {0}")]
    Inflate(#[from] std::io::Error),
    #[error("url decoding: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

fn compressed_payload<'a>(diagram: roxmltree::Node<'a, '_>) -> Option<&'a str> {
    if diagram.children().any(|c| c.has_tag_name("mxGraphModel")) {
        return None;
    }
    diagram
        .children()
        .filter(|c| c.is_text())
        .filter_map(|c| c.text())
        .find(|t| !t.trim().is_empty())
}

fn inflate_page(payload: &str) -> std::result::Result<String, PageDecodeError> {
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let deflated = base64::engine::general_purpose::STANDARD.decode(compact)?;
    let mut encoded = String::new();
    flate2::read::DeflateDecoder::new(deflated.as_slice()).read_to_string(&mut encoded)?;
    Ok(percent_encoding::percent_decode_str(&encoded)
        .decode_utf8()?
        .into_owned())
}

fn is_wrapper(node: roxmltree::Node<'_, '_>) -> bool {
    matches!(node.tag_name().name(), "UserObject" | "object")
}

fn collect_cells(page: roxmltree::Node<'_, '_>, out: &mut DrawioDocument) {
    for cell in page.descendants().filter(|n| n.has_tag_name("mxCell")) {
        let wrapper = cell.parent_element().filter(|p| is_wrapper(*p));
        let attr = |name: &str| cell.attribute(name).unwrap_or_default();

        let id = wrapper
            .and_then(|w| w.attribute("id"))
            .unwrap_or_else(|| attr("id"));
        if id == "0" || id == "1" {
            continue;
        }

        let source = attr("source");
        let target = attr("target");
        if !source.is_empty() && !target.is_empty() {
            out.edges.push(DrawioEdge {
                id: id.to_string(),
                source: source.to_string(),
                target: target.to_string(),
                style: attr("style").to_string(),
            });
            continue;
        }

        let value = wrapper
            .and_then(|w| w.attribute("label"))
            .unwrap_or_else(|| attr("value"));
        if value.is_empty() {
            continue;
        }
        out.nodes.push(DrawioNode {
            id: id.to_string(),
            value: value.to_string(),
            lines: html_to_text_lines(value),
            parent: attr("parent").to_string(),
            style: attr("style").to_string(),
        });
    }
}

fn read_compressed_page(name: &str, payload: &str, out: &mut DrawioDocument) {
    let xml = match inflate_page(payload) {
        Ok(xml) => xml,
        Err(err) => {
            tracing::warn!(page = %name, error = %err, "skipping undecodable draw.io page");
            out.skipped_pages.push(name.to_string());
            return;
        }
    };
    match roxmltree::Document::parse(&xml) {
        Ok(inner) => {
            tracing::debug!(page = %name, "inflated compressed draw.io page");
            collect_cells(inner.root_element(), out);
        }
        Err(err) => {
            tracing::warn!(page = %name, error = %err, "skipping undecodable draw.io page");
            out.skipped_pages.push(name.to_string());
        }
    }
}

pub fn parse_drawio(text: &str) -> Result<DrawioDocument> {
    let doc = roxmltree::Document::parse(text)?;
    let root = doc.root_element();

    let mut pages: Vec<roxmltree::Node<'_, '_>> = root
        .descendants()
        .filter(|n| n.has_tag_name("diagram"))
        .collect();
    if pages.is_empty() && root.has_tag_name("mxGraphModel") {
        pages.push(root);
    }

    let mut out = DrawioDocument::default();
    for page in pages {
        let payload = page
            .has_tag_name("diagram")
            .then(|| compressed_payload(page))
            .flatten();
        match payload {
            Some(payload) => {
                let name = page.attribute("name").unwrap_or_default();
                read_compressed_page(name, payload, &mut out);
            }
            None => collect_cells(page, &mut out),
        }
    }

    tracing::debug!(
        nodes = out.nodes.len(),
        edges = out.edges.len(),
        skipped = out.skipped_pages.len(),
        "parsed draw.io document"
    );
    Ok(out)
}
