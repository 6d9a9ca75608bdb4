use clap::Args;
use miette::{Context, Result};
use nitf_tre::SchemaRegistry;
use std::{path::PathBuf, sync::Arc};
use tracing::debug;

pub mod info;
pub mod scan;
pub mod tres;

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Summarise the header and segments of a file
    Info(info::InfoArgs),
    /// Print the TREs of a file
    Tres(tres::TresArgs),
    /// Check every NITF file under a directory
    Scan(scan::ScanArgs),
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Info(info) => info.handle(),
            Commands::Tres(tres) => tres.handle(),
            Commands::Scan(scan) => scan.handle(),
        }
    }
}

#[derive(Args)]
pub struct SchemaArgs {
    /// A TRE schema file to use instead of the built-in one
    #[arg(long, value_name = "PATH")]
    schema: Option<PathBuf>,
}

impl SchemaArgs {
    pub fn registry(&self) -> Result<Arc<SchemaRegistry>> {
        let registry = match &self.schema {
            Some(path) => SchemaRegistry::load(path)
                .context(format!("loading schema {}", path.display()))?,
            None => SchemaRegistry::builtin()?,
        };
        debug!(tags = registry.len(), "tre schemas ready");
        Ok(registry)
    }
}
