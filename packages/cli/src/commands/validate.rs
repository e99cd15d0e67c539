use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_editor::{from_text, ViewError};
use std::fs;
use std::path::{Path, PathBuf};

use super::find_page_files;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Page file or directory of pages
    pub input: PathBuf,
}

/// Result of validating one page
#[derive(Debug)]
pub enum PageCheck {
    Valid { blocks: usize },
    Invalid(ViewError),
}

pub fn validate(args: ValidateArgs, _cwd: &Path) -> Result<()> {
    println!("🔍 {} Pagecraft validator", "Starting".green().bold());
    println!("   Input: {}", args.input.display());
    println!();

    let files = if args.input.is_file() {
        vec![args.input.clone()]
    } else if args.input.is_dir() {
        let files = find_page_files(&args.input)?;
        println!("   Found {} pages", files.len());
        println!();
        files
    } else {
        return Err(anyhow!(
            "Input path does not exist: {}",
            args.input.display()
        ));
    };

    let mut invalid = 0;
    for file in &files {
        match check_page(file)? {
            PageCheck::Valid { blocks } => {
                println!("  {} {} ({} blocks)", "✓".green(), file.display(), blocks);
            }
            PageCheck::Invalid(err) => {
                invalid += 1;
                eprintln!("  {} {} - {}", "✗".red(), file.display(), err);
            }
        }
    }

    println!();
    println!("   Pages checked: {}", files.len());

    if invalid > 0 {
        return Err(anyhow!("{} of {} pages failed validation", invalid, files.len()));
    }

    println!("   {} No issues found!", "✓".green());
    Ok(())
}

pub fn check_page(path: &Path) -> Result<PageCheck> {
    let text = fs::read_to_string(path)?;

    Ok(match from_text(&text) {
        Ok(document) => PageCheck::Valid {
            blocks: document.len(),
        },
        Err(err) => PageCheck::Invalid(err),
    })
}
