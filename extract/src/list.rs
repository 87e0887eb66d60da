//! Command-list file reading.
//!
//! The input is a newline-delimited text file of command names, one per
//! line. Lines are trimmed; blank lines are skipped with a warning rather
//! than treated as invalid commands.

use std::io;
use std::path::Path;

use tracing::warn;

/// Reads the command names to process from a list file.
pub fn read_command_list(path: &Path) -> io::Result<Vec<String>> {
    let text = std::fs::read_to_string(path)?;
    let mut commands = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let name = line.trim();
        if name.is_empty() {
            warn!(line = index + 1, file = %path.display(), "skipping blank command entry");
            continue;
        }
        commands.push(name.to_string());
    }
    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn trims_and_collects_commands() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "  pwd \nls\n\tsort\n").unwrap();

        let commands = read_command_list(file.path()).unwrap();
        assert_eq!(commands, ["pwd", "ls", "sort"]);
    }

    #[test]
    fn skips_blank_lines() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "pwd\n\n   \nls\n").unwrap();

        let commands = read_command_list(file.path()).unwrap();
        assert_eq!(commands, ["pwd", "ls"]);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = read_command_list(Path::new("/no/such/list.txt")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
