use clap::Parser;
use std::path::PathBuf;

/// dirpick – mark directory subtrees and collect the files they cover
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Root of the tree (defaults to CWD)
    #[arg(value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Include directories and files ignored by .gitignore
    #[arg(long)]
    pub include_ignored: bool,

    /// Directory to select together with everything beneath it.
    /// Relative paths are resolved against DIR. Can be given multiple times.
    #[arg(long = "select", value_name = "PATH")]
    pub select: Vec<PathBuf>,

    /// Directory to carve out of an earlier --select. Applied after all selects.
    /// Can be given multiple times.
    #[arg(long = "exclude", value_name = "PATH")]
    pub exclude: Vec<PathBuf>,

    /// Apply --select/--exclude and exit without the TUI.
    #[arg(long, requires = "select")]
    pub headless: bool,

    /// Print the result instead of copying it to the clipboard
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_headless_requires_select() {
        assert!(Cli::try_parse_from(["dirpick", "--headless"]).is_err());
        let cli = Cli::try_parse_from([
            "dirpick", "/data", "--headless", "--select", "a", "--select", "b", "--exclude", "a/x",
        ])
        .unwrap();
        assert_eq!(cli.select, vec![PathBuf::from("a"), PathBuf::from("b")]);
        assert_eq!(cli.exclude, vec![PathBuf::from("a/x")]);
        assert!(!cli.dry_run);
    }
}
