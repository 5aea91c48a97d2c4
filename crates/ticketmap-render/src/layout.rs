use crate::model::{LayoutPoint, LayoutRow, PyramidLayout};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ticketmap_core::TicketRecord;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    pub box_width: f64,
    pub box_height: f64,
    pub horizontal_spacing: f64,
    pub vertical_spacing: f64,
    /// Left and top margin.
    pub margin: f64,
    /// Added to the widest row to get the page width.
    pub page_padding: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            box_width: 180.0,
            box_height: 60.0,
            horizontal_spacing: 40.0,
            vertical_spacing: 80.0,
            margin: 50.0,
            page_padding: 100.0,
        }
    }
}

impl LayoutOptions {
    pub fn row_width(&self, count: usize) -> f64 {
        if count == 0 {
            return 0.0;
        }
        let n = count as f64;
        n * self.box_width + (n - 1.0) * self.horizontal_spacing
    }

    pub fn row_y(&self, depth: u32) -> f64 {
        self.margin + f64::from(depth) * self.row_pitch()
    }

    pub fn page_height(&self, max_depth: u32) -> f64 {
        self.margin + (f64::from(max_depth) + 1.0) * self.row_pitch() + self.margin
    }

    fn row_pitch(&self) -> f64 {
        self.box_height + self.vertical_spacing
    }
}

/// Places every record on a pyramid: one row per depth, each row centered on the widest one.
///
/// Rows are measured before any is placed, since centering needs the global maximum width.
pub fn layout_pyramid(records: &[TicketRecord], options: &LayoutOptions) -> PyramidLayout {
    tracing::debug!(records = records.len(), "computing pyramid layout");

    let mut by_depth: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
    for (idx, record) in records.iter().enumerate() {
        by_depth.entry(record.depth).or_default().push(idx);
    }

    let max_row_width = by_depth
        .values()
        .map(|members| options.row_width(members.len()))
        .fold(0.0_f64, f64::max);
    let max_depth = by_depth.keys().next_back().copied().unwrap_or(0);

    let mut positions = vec![LayoutPoint { x: 0.0, y: 0.0 }; records.len()];
    let mut rows = Vec::with_capacity(by_depth.len());
    for (depth, members) in by_depth {
        let width = options.row_width(members.len());
        let start_x = (max_row_width - width) / 2.0 + options.margin;
        let y = options.row_y(depth);

        for (slot, &idx) in members.iter().enumerate() {
            positions[idx] = LayoutPoint {
                x: start_x + slot as f64 * (options.box_width + options.horizontal_spacing),
                y,
            };
        }

        rows.push(LayoutRow {
            depth,
            y,
            start_x,
            width,
            members,
        });
    }

    PyramidLayout {
        positions,
        rows,
        max_row_width,
        max_depth,
        page_width: max_row_width + options.page_padding,
        page_height: options.page_height(max_depth),
        box_width: options.box_width,
        box_height: options.box_height,
    }
}
