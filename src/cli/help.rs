//! Pipeline descriptor display.

#![allow(clippy::print_stdout)]

use crate::config::Config;
use crate::pipeline::Stage;

/// Print every stage of the default pipeline with its input and output folders.
pub fn print_stages(config: &Config) {
    let folders = &config.folders;

    println!("Default pipeline:");
    println!();
    for (i, stage) in Stage::ALL.iter().enumerate() {
        println!("{}. {:<10} {}", i + 1, stage.name(), stage.description());
        println!(
            "   {:<10} {} -> {}",
            "",
            stage.input().folder(folders).display(),
            stage.output().folder(folders).display()
        );
    }
    println!();
    println!("Run a subset with: catscat run --stages extract,scratch,perturb");
}
