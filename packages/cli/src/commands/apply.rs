use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_common::EditorConfig;
use pagecraft_editor::{CommandOutcome, EditCommand, Editor, FilePersistence};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Page file to edit
    pub input: PathBuf,

    /// JSON array of editor commands
    #[arg(short, long)]
    pub script: PathBuf,
}

pub async fn apply(args: ApplyArgs, cwd: &Path) -> Result<()> {
    let config = EditorConfig::load(cwd)?;

    let script = tokio::fs::read_to_string(&args.script)
        .await
        .with_context(|| format!("reading script {}", args.script.display()))?;
    let commands: Vec<EditCommand> = serde_json::from_str(&script)
        .with_context(|| format!("parsing script {}", args.script.display()))?;

    let persistence = FilePersistence::new(&args.input);
    let document = persistence
        .load()
        .await
        .with_context(|| format!("loading {}", args.input.display()))?;

    println!(
        "✏️  {} {} commands on {}",
        "Applying".green().bold(),
        commands.len(),
        args.input.display()
    );

    let mut editor = Editor::new(document, Arc::new(persistence), &config);

    for (index, command) in commands.into_iter().enumerate() {
        let outcome = editor
            .apply(command)
            .await
            .with_context(|| format!("command #{}", index + 1))?;

        match outcome {
            CommandOutcome::Created(id) => println!("  {} created {}", "+".green(), id),
            CommandOutcome::Changed => println!("  {} changed", "~".yellow()),
            CommandOutcome::Unchanged => println!("  {} no change", "·".dimmed()),
            CommandOutcome::Saved => println!("  {} saved", "✓".green()),
        }
    }

    editor.close().await?;

    println!();
    println!("{}", "Blocks:".bold());
    for block in &editor.document().blocks {
        let hidden = if block.is_visible { "" } else { " (hidden)" };
        println!(
            "  {:>3}  {:<8} {}{}",
            block.position,
            block.data.block_type().to_string(),
            block.id,
            hidden.dimmed()
        );
    }

    Ok(())
}
