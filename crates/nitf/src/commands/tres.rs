use clap::Args;
use miette::{Context, Result};
use nitf_file::{File, ParseOptions};
use nitf_tre::{Tre, TreEntry, TreGroup};
use owo_colors::OwoColorize;
use std::path::PathBuf;

use super::SchemaArgs;

#[derive(Args)]
pub struct TresArgs {
    /// An input NITF file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Only print TREs with this tag
    #[arg(short, long, value_name = "TAG")]
    tag: Option<String>,

    #[command(flatten)]
    schema: SchemaArgs,
}

impl TresArgs {
    pub fn handle(&self) -> Result<()> {
        let registry = self.schema.registry()?;
        let file = File::open(&self.file, &registry, ParseOptions::default())
            .context(format!("path: {}", &self.file.display()))?;

        for (owner, tres) in file.tre_collections() {
            let selected = tres
                .iter()
                .filter(|t| self.tag.as_ref().map_or(true, |tag| &t.name == tag))
                .collect::<Vec<_>>();
            if selected.is_empty() {
                continue;
            }

            println!("{}", owner.bold());
            for tre in selected {
                print_tre(tre);
            }
        }
        Ok(())
    }
}

fn print_tre(tre: &Tre) {
    println!("  {}", tre.name.cyan());
    print_group(&tre.group, 2);
}

fn print_group(group: &TreGroup, depth: usize) {
    let indent = "  ".repeat(depth);
    for entry in group {
        match entry {
            TreEntry::Leaf { name, value } => println!("{indent}{name}: {}", value.trim_end()),
            TreEntry::Repeated { name, groups } => {
                println!("{indent}{} ({})", name.yellow(), groups.len());
                for (index, group) in groups.iter().enumerate() {
                    println!("{indent}  [{index}]");
                    print_group(group, depth + 2);
                }
            }
        }
    }
}
