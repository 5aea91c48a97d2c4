#![forbid(unsafe_code)]

//! `ticketmap` turns a ticket hierarchy export into a draw.io dependency map.
//!
//! The loader, record model and classification tables live in `ticketmap-core` and are
//! re-exported here. Layout and serialization are behind a feature.
//!
//! # Features
//!
//! - `render`: enable layout + draw.io output (`ticketmap::render`)

pub use ticketmap_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use ticketmap_render::drawio::{DEFAULT_TITLE, DrawioRenderOptions, render_drawio};
    pub use ticketmap_render::import::{DrawioDocument, parse_drawio, read_drawio_file};
    pub use ticketmap_render::model::{DiagramGraph, EdgeMode, PyramidLayout};
    pub use ticketmap_render::org::{OrgChart, Responsibilities};
    pub use ticketmap_render::{Error as RenderError, LayoutOptions, build_graph, layout_pyramid};

    use std::ffi::OsString;
    use std::io::Write;
    use std::path::{Path, PathBuf};
    use ticketmap_core::model::first_root;
    use ticketmap_core::{Reporter, SiteConfig, TicketRecord};

    pub const OUTPUT_EXTENSION: &str = "drawio";
    pub const NO_TICKETS_MESSAGE: &str = "ERROR: No tickets found in input file.";

    #[derive(Debug, thiserror::Error)]
    pub enum MapError {
        #[error(transparent)]
        Load(#[from] ticketmap_core::Error),
        #[error(transparent)]
        Render(#[from] ticketmap_render::Error),
        #[error("{0}")]
        Io(#[from] std::io::Error),
    }

    impl MapError {
        /// Missing file or unusable input columns, as opposed to an unexpected failure.
        pub fn is_input_error(&self) -> bool {
            matches!(self, Self::Load(err) if err.is_input_error())
        }
    }

    pub type Result<T> = std::result::Result<T, MapError>;

    /// Inputs of one `--create-map` run.
    #[derive(Debug, Clone, Default, PartialEq, Eq)]
    pub struct MapRequest {
        pub input: PathBuf,
        /// Defaults to [`default_output_path`] of `input`.
        pub output: Option<PathBuf>,
        /// Defaults to [`default_title`] of the loaded records.
        pub title: Option<String>,
        /// Pins the document's `modified` date; today when unset.
        pub modified: Option<chrono::NaiveDate>,
    }

    impl MapRequest {
        pub fn new(input: impl Into<PathBuf>) -> Self {
            Self {
                input: input.into(),
                ..Self::default()
            }
        }

        pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
            self.output = Some(output.into());
            self
        }

        pub fn with_title(mut self, title: impl Into<String>) -> Self {
            self.title = Some(title.into());
            self
        }

        pub fn with_modified(mut self, date: chrono::NaiveDate) -> Self {
            self.modified = Some(date);
            self
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum MapOutcome {
        /// The input had no ticket rows; nothing was written.
        NoTickets,
        Written {
            output: PathBuf,
            tickets: usize,
            title: String,
        },
    }

    /// `tickets.csv` becomes `tickets.drawio`; any other name gets `.drawio` appended.
    pub fn default_output_path(input: &Path) -> PathBuf {
        if input.extension().is_some_and(|ext| ext == "csv") {
            return input.with_extension(OUTPUT_EXTENSION);
        }
        let mut name = OsString::from(input.as_os_str());
        name.push(".");
        name.push(OUTPUT_EXTENSION);
        PathBuf::from(name)
    }

    /// Title derived from the first root record, or the generic [`DEFAULT_TITLE`].
    pub fn default_title(records: &[TicketRecord]) -> String {
        match first_root(records) {
            Some(root) => format!("Dependency Map: {}", root.key),
            None => DEFAULT_TITLE.to_string(),
        }
    }

    /// Renders in-memory records with the default layout.
    pub fn create_diagram_from_tickets(
        records: &[TicketRecord],
        title: &str,
        site: &SiteConfig,
    ) -> Result<String> {
        render_records(records, DrawioRenderOptions::default().with_title(title), site)
    }

    fn render_records(
        records: &[TicketRecord],
        options: DrawioRenderOptions,
        site: &SiteConfig,
    ) -> Result<String> {
        let layout = layout_pyramid(records, &LayoutOptions::default());
        let graph = build_graph(records, &layout, site);
        Ok(render_drawio(&graph, &options)?)
    }

    /// Loads `request.input`, renders it and writes the map.
    ///
    /// An input without ticket rows is reported through `reporter` and is not an error.
    pub fn create_map<W: Write>(
        request: &MapRequest,
        site: &SiteConfig,
        reporter: &mut Reporter<W>,
    ) -> Result<MapOutcome> {
        tracing::info!(input = %request.input.display(), "creating dependency map");

        let records = ticketmap_core::load_tickets(&request.input)?;
        if records.is_empty() {
            reporter.line(NO_TICKETS_MESSAGE)?;
            return Ok(MapOutcome::NoTickets);
        }
        tracing::info!("Loaded {} tickets from CSV", records.len());

        let output = request
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&request.input));
        let title = request
            .title
            .clone()
            .unwrap_or_else(|| default_title(&records));
        tracing::info!("Generating draw.io diagram: {title}");

        let mut options = DrawioRenderOptions::default().with_title(&title);
        options.modified = request.modified;
        let xml = render_records(&records, options, site)?;

        tracing::info!("Writing diagram to {}...", output.display());
        std::fs::write(&output, xml)?;

        write_banner(reporter, &request.input, &output, records.len(), &title)?;
        tracing::info!("Created draw.io diagram: {}", output.display());

        Ok(MapOutcome::Written {
            output,
            tickets: records.len(),
            title,
        })
    }

    fn write_banner<W: Write>(
        reporter: &mut Reporter<W>,
        input: &Path,
        output: &Path,
        tickets: usize,
        title: &str,
    ) -> std::io::Result<()> {
        reporter.blank()?;
        reporter.rule()?;
        reporter.line("Draw.io Diagram Created Successfully")?;
        reporter.rule()?;
        reporter.line(format!("Input file:  {}", input.display()))?;
        reporter.line(format!("Output file: {}", output.display()))?;
        reporter.line(format!("Tickets:     {tickets}"))?;
        reporter.line(format!("Title:       {title}"))?;
        reporter.rule()?;
        reporter.blank()?;
        reporter.line("Open the .drawio file with:")?;
        reporter.line("  - draw.io desktop app (https://www.diagrams.net/)")?;
        reporter.line("  - VS Code with Draw.io Integration extension")?;
        reporter.line("  - Online at https://app.diagrams.net/")?;
        reporter.blank()
    }

}
