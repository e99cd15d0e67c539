use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_editor::{from_text, to_text};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct FormatArgs {
    /// Page file to format
    pub input: PathBuf,

    /// Only report whether the file is already canonical
    #[arg(long)]
    pub check: bool,
}

pub fn format(args: FormatArgs, _cwd: &Path) -> Result<()> {
    let source = fs::read_to_string(&args.input)?;
    let canonical = canonicalize(&source)
        .map_err(|err| anyhow!("{}: {}", args.input.display(), err))?;

    if canonical == source {
        println!("  {} {} is canonical", "✓".green(), args.input.display());
        return Ok(());
    }

    if args.check {
        return Err(anyhow!("{} is not canonical", args.input.display()));
    }

    fs::write(&args.input, &canonical)?;
    println!("  {} Formatted {}", "✓".green(), args.input.display());
    Ok(())
}

/// Canonical on-disk form: the text view plus a trailing newline
pub fn canonicalize(source: &str) -> Result<String> {
    let document = from_text(source)?;
    Ok(format!("{}\n", to_text(&document)))
}
