#![forbid(unsafe_code)]

//! Headless layout + draw.io rendering for ticket hierarchies.
//!
//! The pipeline is three pure passes over an already-loaded record list:
//! [`layout::layout_pyramid`] places one row per depth, [`graph::build_graph`] turns records
//! into vertices and edges, and [`drawio::render_drawio`] serializes the graph. The reverse
//! direction ([`import::parse_drawio`], [`org::OrgChart`]) reads existing draw.io files.

pub mod drawio;
pub mod graph;
pub mod import;
pub mod layout;
pub mod model;
pub mod org;
pub mod text;

pub use drawio::{DrawioRenderOptions, render_drawio};
pub use graph::build_graph;
pub use layout::{LayoutOptions, layout_pyramid};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot render a diagram without vertices")]
    EmptyGraph,
    #[error("invalid draw.io XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
