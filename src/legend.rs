//! Legend rendering
//!
//! Turns a [`Legend`] into anchored overlay boxes on a [`Surface`]:
//!
//! ```text
//! Legend ──group_by_column──> combined groups ──draw_legend_group──┐
//!        └──────────────────> remaining aesthetics ──draw_entry────┴─> Surface::add_overlay
//! ```
//!
//! Combined blocks come first (by column name), then standalone blocks (by
//! aesthetic name). Every block is anchored at `baseline - step * i`, where
//! `i` counts the blocks placed so far. Blocks do not measure each other, so
//! tall legends can overlap.

use crate::error::LegendError;
use crate::group::{group_by_column, LegendGroup};
use crate::ir::{Aesthetic, Align, AnchorLoc, AnchoredBox, Legend, LegendEntry, OffsetBox};
use crate::keys::{
    make_key, make_label, make_line, make_shape, make_title, KEY_HEIGHT, KEY_LINE_WIDTH,
    KEY_Y_OFFSET, MAX_LABEL_LENGTH,
};
use crate::surface::Surface;
use log::{debug, info};
use serde::Deserialize;
use std::collections::BTreeSet;

/// Placement of legend blocks relative to the axes
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LegendLayout {
    pub loc: AnchorLoc,
    /// Horizontal anchor in axes coordinates (1.0 = right edge of the data area)
    pub anchor_x: f64,
    /// Vertical anchor of the first block
    pub baseline: f64,
    /// Vertical distance between consecutive blocks
    pub step: f64,
    pub pad: f64,
    pub borderpad: f64,
    /// Size that `pad` and `borderpad` are measured in
    pub font_size: f64,
    /// Outline each block
    pub frame_on: bool,
}

impl Default for LegendLayout {
    fn default() -> Self {
        Self {
            loc: AnchorLoc::CenterLeft,
            anchor_x: 1.0,
            baseline: 0.8,
            step: 0.35,
            pad: 0.0,
            borderpad: 1.0,
            font_size: 10.0,
            frame_on: false,
        }
    }
}

impl LegendLayout {
    /// Anchor point of the `index`-th block
    pub fn anchor_for(&self, index: usize) -> (f64, f64) {
        (self.anchor_x, self.baseline - self.step * index as f64)
    }
}

// Title and rows of a block
const BLOCK_PAD: f64 = 0.0;
const BLOCK_SEP: f64 = 5.0;
// Glyphs and label of a combined row
const COMBINED_ROW_PAD: f64 = 5.0;
const COMBINED_ROW_SEP: f64 = 5.0;

/// Add every legend block to the surface.
///
/// The legend itself is only read; alpha entries modulate the color of their
/// column's combined block and never get a block of their own.
pub fn add_legend<S: Surface + ?Sized>(
    legend: &Legend,
    surface: &mut S,
    layout: &LegendLayout,
) -> Result<(), LegendError> {
    let groups = group_by_column(legend);
    let mut absorbed: BTreeSet<Aesthetic> = BTreeSet::new();
    let mut ith = 0;

    for group in groups.values().filter(|g| g.is_combined()) {
        let block = draw_legend_group(group, ith, layout)?;
        surface.add_overlay(block)?;
        absorbed.extend(group.drawable_aesthetics());
        ith += 1;
    }

    for (aesthetic, entry) in legend.iter() {
        if aesthetic == Aesthetic::Alpha || absorbed.contains(&aesthetic) {
            continue;
        }
        let block = draw_entry(entry, aesthetic, ith, layout)?;
        surface.add_overlay(block)?;
        ith += 1;
    }

    info!(
        "added {} legend blocks ({} aesthetics combined)",
        ith,
        absorbed.len()
    );
    Ok(())
}

/// One block for a column shared by several aesthetics, one glyph row per label
pub fn draw_legend_group(
    group: &LegendGroup,
    ith_group: usize,
    layout: &LegendLayout,
) -> Result<AnchoredBox, LegendError> {
    let labels = group.labels();
    if labels.is_empty() {
        return Err(LegendError::EmptyGroup(group.column_name.clone()));
    }

    let has_markers = group.contains(Aesthetic::Shape) || group.contains(Aesthetic::Size);
    // Color/fill-only groups get a colored solid line
    let has_lines = group.contains(Aesthetic::Linetype) || !has_markers;

    let mut children = vec![make_title(&group.column_name)];
    for label in &labels {
        let color = group.color(label);
        let mut row = Vec::with_capacity(3);
        if has_lines {
            row.push(OffsetBox::Drawing(make_line(
                color,
                group.linetype(label),
                KEY_LINE_WIDTH,
                KEY_Y_OFFSET,
                KEY_HEIGHT,
            )));
        }
        if has_markers {
            row.push(OffsetBox::Drawing(make_shape(
                color,
                group.shape(label),
                group.size(label),
                KEY_Y_OFFSET,
                KEY_HEIGHT,
            )));
        }
        row.push(make_label(&label.display(), MAX_LABEL_LENGTH));
        children.push(OffsetBox::hpack(row, Align::Center, COMBINED_ROW_PAD, COMBINED_ROW_SEP));
    }

    debug!(
        "combined legend for '{}' with {} rows at slot {}",
        group.column_name,
        labels.len(),
        ith_group
    );
    let block = OffsetBox::vpack(children, Align::Left, BLOCK_PAD, BLOCK_SEP);
    Ok(anchor(block, ith_group, layout))
}

/// One block for a single aesthetic: title above one swatch row per value, sorted by label
pub fn draw_entry(
    entry: &LegendEntry,
    aesthetic: Aesthetic,
    ith_entry: usize,
    layout: &LegendLayout,
) -> Result<AnchoredBox, LegendError> {
    let mut children = vec![make_title(&entry.column_name)];
    for (value, key) in entry.sorted_items() {
        children.push(make_key(aesthetic, &key.display(), value)?);
    }

    debug!(
        "{} legend for '{}' with {} rows at slot {}",
        aesthetic,
        entry.column_name,
        children.len() - 1,
        ith_entry
    );
    let block = OffsetBox::vpack(children, Align::Left, BLOCK_PAD, BLOCK_SEP);
    Ok(anchor(block, ith_entry, layout))
}

fn anchor(child: OffsetBox, index: usize, layout: &LegendLayout) -> AnchoredBox {
    AnchoredBox {
        child,
        loc: layout.loc,
        bbox_to_anchor: layout.anchor_for(index),
        pad: layout.pad,
        borderpad: layout.borderpad,
        frame_on: layout.frame_on,
        clip_on: false,
    }
}
