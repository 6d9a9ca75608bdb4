use clap::Args;
use itertools::Itertools;
use miette::{Context, IntoDiagnostic, Result};
use nitf_file::{File, ParseOptions, Segment};
use owo_colors::OwoColorize;
use std::path::PathBuf;

use super::SchemaArgs;

#[derive(Args)]
pub struct InfoArgs {
    /// An input NITF file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Print the parsed file as JSON
    #[arg(long, default_value_t = false)]
    json: bool,

    #[command(flatten)]
    schema: SchemaArgs,
}

impl InfoArgs {
    pub fn handle(&self) -> Result<()> {
        let registry = self.schema.registry()?;
        let file = File::open(&self.file, &registry, ParseOptions::default())
            .context(format!("path: {}", &self.file.display()))?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&file).into_diagnostic()?);
            return Ok(());
        }

        let header = &file.header;
        println!("{} {}", file.file_type().bold(), self.file.display());
        println!("  title:          {}", header.title);
        println!("  complexity:     {:02}", header.complexity_level);
        println!("  station:        {}", header.originating_station);
        println!("  date:           {}", header.date);
        println!("  classification: {}", header.security.classification);
        println!(
            "  length:         {} ({} header)",
            header.file_length, header.header_length
        );

        print_segments("images", &file.images);
        print_segments("graphics", &file.graphics);
        print_segments("symbols", &file.symbols);
        print_segments("labels", &file.labels);
        print_segments("texts", &file.texts);
        print_segments("data extensions", &file.data_extensions);

        for (owner, tres) in file.tre_collections() {
            println!("  tres ({owner}): {}", tres.unique_names().join(", ").cyan());
        }

        if !file.diagnostics.is_empty() {
            println!("  {} {}", file.diagnostics.len().yellow(), "warnings".yellow());
        }
        Ok(())
    }
}

fn print_segments<S: Segment>(label: &str, segments: &[S]) {
    if segments.is_empty() {
        return;
    }
    let ids = segments.iter().map(|s| s.id()).join(", ");
    println!("  {label}: {} [{ids}]", segments.len().green());
}
