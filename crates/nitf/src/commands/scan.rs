use clap::Args;
use itertools::{Either, Itertools};
use miette::Result;
use nitf_file::{File, ParseOptions};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use tracing::{info, warn};
use walkdir::WalkDir;

use super::SchemaArgs;

const EXTENSIONS: [&str; 3] = ["ntf", "nitf", "nsf"];

#[derive(Args)]
pub struct ScanArgs {
    /// A directory to search
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    #[command(flatten)]
    schema: SchemaArgs,
}

impl ScanArgs {
    pub fn handle(&self) -> Result<()> {
        let registry = self.schema.registry()?;

        let files = WalkDir::new(&self.directory)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| !e.file_type().is_dir())
            .filter(|e| {
                e.path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            })
            .collect::<Vec<_>>();
        info!("scanning {} files in {}", files.len(), self.directory.display());

        let (parsed, failed): (Vec<_>, Vec<_>) = files.iter().partition_map(|entry| {
            match File::open(entry.path(), &registry, ParseOptions::default()) {
                Ok(file) => Either::Left((entry.path(), file)),
                Err(e) => Either::Right((entry.path(), e)),
            }
        });

        for (path, file) in parsed.iter().sorted_by_key(|(path, _)| path.to_path_buf()) {
            let warnings = match file.diagnostics.len() {
                0 => String::new(),
                n => format!(" ({n} warnings)"),
            };
            println!("✅ {} {}{}", path.display().green(), file.file_type(), warnings);
        }

        for (path, e) in failed.iter().sorted_by_key(|(path, _)| path.to_path_buf()) {
            warn!(path = %path.display(), kind = ?e.kind(), "failed to parse");
            println!("❌ {} {}", path.display().red(), e);
        }

        println!("{} parsed, {} failed", parsed.len().green(), failed.len().red());
        Ok(())
    }
}
