use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_common::{EditorConfig, IdGenerator, DEFAULT_CONFIG_NAME};
use pagecraft_editor::{new_block, to_text, BlockType, ContentDocument};
use std::fs;
use std::path::Path;

pub const SAMPLE_PAGE_NAME: &str = "page.json";

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = EditorConfig::path_in(cwd);

    // Check if config already exists
    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            DEFAULT_CONFIG_NAME.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!(
        "{}",
        "📝 Initializing Pagecraft project...".bright_blue().bold()
    );

    let config = EditorConfig::default();
    config.write(cwd)?;
    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);

    // Sample page with a single text block
    let page_path = cwd.join(SAMPLE_PAGE_NAME);
    if !page_path.exists() || args.force {
        let mut ids = IdGenerator::new(config.id_prefix.clone());
        let page = ContentDocument::from_blocks(vec![new_block(ids.new_id(), BlockType::Text)]);

        fs::write(&page_path, format!("{}\n", to_text(&page)))?;
        println!("  {} Created {}", "✓".green(), SAMPLE_PAGE_NAME);
    }

    println!();
    println!("{}", "✅ Project initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {}", SAMPLE_PAGE_NAME);
    println!("  2. Run: pagecraft validate {}", SAMPLE_PAGE_NAME);
    println!("  3. Script edits with: pagecraft apply {} --script edits.json", SAMPLE_PAGE_NAME);

    Ok(())
}
