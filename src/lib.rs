// Library exports for gramlegend

pub mod canvas;
pub mod error;
pub mod group;
pub mod ir;
pub mod keys;
pub mod layout;
pub mod legend;
pub mod parser;
pub mod style;
pub mod surface;

pub use error::LegendError;
pub use ir::{Aesthetic, Legend, LegendEntry, LegendKey, ScaleKind, VisualValue};
pub use legend::{add_legend, LegendLayout};
pub use surface::{RecordingSurface, Surface};

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[serde(rename = "png")]
    #[default]
    Png,
    #[serde(rename = "svg")]
    Svg,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RenderOptions {
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default, rename = "type")]
    pub format: OutputFormat,
    /// Data area as figure fractions [left, bottom, width, height]
    #[serde(default = "default_axes")]
    pub axes: [f64; 4],
    #[serde(default)]
    pub layout: LegendLayout,
}

fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 600 }
fn default_axes() -> [f64; 4] { [0.1, 0.1, 0.4, 0.7] }

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            format: OutputFormat::Png,
            axes: default_axes(),
            layout: LegendLayout::default(),
        }
    }
}

/// Draw every legend block of `legend` next to an empty axes frame and
/// encode the figure in the configured format.
pub fn render_legend(legend: &Legend, options: &RenderOptions) -> Result<Vec<u8>> {
    let mut canvas = canvas::Canvas::new(options);
    add_legend(legend, &mut canvas, &options.layout).context("Failed to build legend")?;
    canvas.render()
}
