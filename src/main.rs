use anyhow::{Context, Result};
use clap::Parser;
use gramlegend::{render_legend, Legend, OutputFormat, RenderOptions};
use log::info;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gramlegend")]
#[command(about = "Render plot legends from a JSON legend description", long_about = None)]
struct Args {
    /// Legend JSON file (reads stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output file (writes stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Render options as JSON, e.g. '{"width": 640, "layout": {"step": 0.3}}'
    #[arg(long)]
    config: Option<String>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
}

impl Args {
    /// Config JSON first, then individual flags on top
    fn render_options(&self) -> Result<RenderOptions> {
        let mut options = match &self.config {
            Some(json) => serde_json::from_str(json).context("Failed to parse --config")?,
            None => RenderOptions::default(),
        };
        if let Some(width) = self.width {
            options.width = width;
        }
        if let Some(height) = self.height {
            options.height = height;
        }
        if let Some(format) = self.format {
            options.format = format;
        }
        Ok(options)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let options = args.render_options()?;

    let input = match &args.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read legend JSON from stdin")?;
            buf
        }
    };

    let legend = Legend::from_json(&input).context("Failed to parse legend")?;
    info!("loaded {} legend entries", legend.len());

    let bytes = render_legend(&legend, &options).context("Failed to render legend")?;

    match &args.output {
        Some(path) => fs::write(path, &bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(&bytes)
                .context("Failed to write output to stdout")?;
            handle.flush().context("Failed to flush stdout")?;
        }
    }

    Ok(())
}
