use colored::Colorize;
use grammy_cloud::Manifest;
use std::path::PathBuf;

pub fn handle(file: Option<PathBuf>, output: Option<PathBuf>) -> anyhow::Result<()> {
    let loaded = super::load_project(file)?;
    let manifest = Manifest::from_loaded(&loaded)?;

    match output {
        Some(output) => {
            manifest.write_to(&output)?;
            eprintln!(
                "{} {} ({} stacks)",
                "✓ Manifest written to".green(),
                output.display().to_string().cyan(),
                manifest.stacks.len()
            );
        }
        None => println!("{}", manifest.to_json()?),
    }

    Ok(())
}
