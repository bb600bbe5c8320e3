use anyhow::Context;
use dotsync_core::SyncDirection;
use dotsync_core::sync::{DiffContent, SyncEngine};

use super::common::SyncOptions;

pub struct Diff;

impl Diff {
    pub fn execute(direction: SyncDirection, options: &SyncOptions<'_>) -> anyhow::Result<u8> {
        let context = options.context()?;
        let diffs = SyncEngine::new(&context)
            .diff(direction)
            .context("Failed to diff manifest entries")?;

        if diffs.is_empty() {
            println!("No differences");
            return Ok(0);
        }

        for diff in &diffs {
            println!("=== {} ===", diff.entry);
            match &diff.content {
                DiffContent::Text(text) => print!("{text}"),
                DiffContent::Binary => println!(
                    "Binary files {} and {} differ",
                    diff.dest.display(),
                    diff.source.display()
                ),
                DiffContent::Tree(tree) => {
                    println!("  {} paths differ", tree.change_count());
                    for path in &tree.added {
                        println!("  + {}", path.display());
                    }
                    for path in &tree.modified {
                        println!("  ~ {}", path.display());
                    }
                    for path in &tree.removed {
                        println!("  - {}", path.display());
                    }
                }
                DiffContent::KindMismatch => println!(
                    "{} and {} are different kinds of file",
                    diff.source.display(),
                    diff.dest.display()
                ),
            }
            println!();
        }

        Ok(0)
    }
}
