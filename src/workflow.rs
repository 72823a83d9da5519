use crate::cli::Cli;
use crate::clipboard;
use dirpick::tui::{self, DirTree};
use dirpick::{ScanPlan, SharedSelection};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

// Resolves CLI paths against the scan root; absolute paths pass through.
fn resolve_against_root(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

// Applies --select then --exclude through the tree, so carving out a
// subdirectory demotes its selected ancestors the same way a click would.
fn apply_preselection(tree: &mut DirTree, root: &Path, cli_args: &Cli) -> Result<()> {
    for path in &cli_args.select {
        let target = resolve_against_root(root, path);
        tree.select_path(&target)
            .with_context(|| format!("cannot select {}", path.display()))?;
    }
    for path in &cli_args.exclude {
        let target = resolve_against_root(root, path);
        tree.deselect_path(&target)
            .with_context(|| format!("cannot exclude {}", path.display()))?;
    }
    Ok(())
}

// Performs the final action: printing for dry-run or copying to clipboard.
fn perform_final_action(output: &str, file_count: usize, is_dry_run: bool) -> Result<()> {
    if is_dry_run {
        print!("{}", output);
        println!(
            "(Dry run: Would copy {} files. Clipboard not affected.)",
            file_count
        );
    } else if file_count == 0 {
        println!("{}", output.trim_end());
        println!("No files are covered by the selection. Exiting.");
        std::process::exit(1);
    } else {
        clipboard::copy_text_to_clipboard(output.to_string())?;
        println!("✅ Copied {} files to the clipboard.", file_count);
    }
    Ok(())
}

// Main orchestrator for the dirpick application logic.
pub fn run_dirpick(cli_args: Cli) -> Result<()> {
    // Step 1: Resolve the root and build the first level of the tree.
    let root = cli_args
        .root
        .canonicalize()
        .with_context(|| format!("cannot open {}", cli_args.root.display()))?;
    let selection = SharedSelection::new();
    let mut tree = DirTree::new(&root, selection.clone(), cli_args.include_ignored)?;

    // Step 2: Apply selections given on the command line.
    apply_preselection(&mut tree, &root, &cli_args)?;

    // Step 3: Let the user refine the selection unless running headless.
    if !cli_args.headless && !tui::run_tui(tree)? {
        println!("Selection cancelled. Exiting.");
        return Ok(());
    }

    // Step 4: Expand the selection into files.
    let plan = ScanPlan::from_selection(&selection.snapshot());
    if plan.is_empty() {
        println!("No directories selected. Exiting.");
        if !cli_args.dry_run {
            std::process::exit(1);
        }
        return Ok(());
    }
    info!(
        roots = plan.recursive_roots.len(),
        mixed = plan.flat_dirs.len(),
        "selection confirmed"
    );
    let files = plan.collect_files(cli_args.include_ignored);
    let output = plan.render(&root, &files);

    // Step 5: Print or copy.
    perform_final_action(&output, files.len(), cli_args.dry_run)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_relative_paths_resolve_against_root() {
        let root = std::env::temp_dir();
        assert_eq!(resolve_against_root(&root, Path::new("a/b")), root.join("a/b"));
        assert_eq!(resolve_against_root(&root, &root.join("x")), root.join("x"));
    }

    #[test]
    fn test_preselection_applies_excludes_after_selects() {
        let dir = tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        for rel in ["src/core", "src/ui", "docs"] {
            fs::create_dir_all(root.join(rel)).unwrap();
        }
        let cli_args = Cli::try_parse_from([
            "dirpick",
            root.to_str().unwrap(),
            "--headless",
            "--exclude",
            "src/ui",
            "--select",
            "src",
        ])
        .unwrap();

        let selection = SharedSelection::new();
        let mut tree = DirTree::new(&root, selection.clone(), false).unwrap();
        apply_preselection(&mut tree, &root, &cli_args).unwrap();

        let set = selection.snapshot();
        assert_eq!(set.fully_selected_roots(), vec![root.join("src/core")]);
        assert_eq!(set.mixed_paths(), vec![root.clone(), root.join("src")]);
    }

    #[test]
    fn test_preselection_reports_missing_directory() {
        let dir = tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let cli_args =
            Cli::try_parse_from(["dirpick", "--headless", "--select", "nowhere"]).unwrap();
        let mut tree = DirTree::new(&root, SharedSelection::new(), false).unwrap();
        let err = apply_preselection(&mut tree, &root, &cli_args).unwrap_err();
        assert!(err.to_string().contains("cannot select nowhere"));
    }
}
