use crate::error::{BloomError, Result};
use std::fs;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Reads one non-negative integer per line. Blank lines are skipped; an
/// empty file yields an empty vector.
pub fn read_int_file(path: &Path) -> Result<Vec<u64>> {
    let reader = BufReader::new(fs::File::open(path)?);
    let mut values = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let value = trimmed.parse::<u64>().map_err(|_| BloomError::Parse {
            line: idx + 1,
            value: trimmed.to_string(),
        })?;
        values.push(value);
    }
    Ok(values)
}

/// Reads a `True`/`False` per line result file.
pub fn read_result_file(path: &Path) -> Result<Vec<bool>> {
    let reader = BufReader::new(fs::File::open(path)?);
    let mut values = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        match line.trim() {
            "" => continue,
            "True" => values.push(true),
            "False" => values.push(false),
            other => {
                return Err(BloomError::Parse {
                    line: idx + 1,
                    value: other.to_string(),
                });
            }
        }
    }
    Ok(values)
}

/// Writes `True`/`False` lines. The file is written to a temporary file in
/// the target directory and persisted into place; on any failure the
/// temporary file is removed and `path` is left untouched.
pub fn write_results(path: &Path, results: &[bool]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        for &r in results {
            writeln!(writer, "{}", if r { "True" } else { "False" })?;
        }
        writer.flush()?;
    }
    tmp.persist(path).map_err(|e| BloomError::Io(e.error))?;
    Ok(())
}

/// Element-wise comparison of produced against expected results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Comparison {
    pub matches: usize,
    pub mismatches: usize,
    /// `actual.len() - expected.len()`; elements past the shorter list are
    /// not counted as matches or mismatches.
    pub length_difference: isize,
}

impl Comparison {
    pub fn is_exact(&self) -> bool {
        self.mismatches == 0 && self.length_difference == 0
    }
}

pub fn compare_results(actual: &[bool], expected: &[bool]) -> Comparison {
    let matches = actual
        .iter()
        .zip(expected)
        .filter(|(a, e)| a == e)
        .count();
    Comparison {
        matches,
        mismatches: actual.len().min(expected.len()) - matches,
        length_difference: actual.len() as isize - expected.len() as isize,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_results() {
        let cmp = compare_results(&[true, false, true], &[true, true, true]);
        assert_eq!(cmp.matches, 2);
        assert_eq!(cmp.mismatches, 1);
        assert_eq!(cmp.length_difference, 0);
        assert!(!cmp.is_exact());

        let cmp = compare_results(&[true, false], &[true, false, false]);
        assert_eq!(cmp.matches, 2);
        assert_eq!(cmp.mismatches, 0);
        assert_eq!(cmp.length_difference, -1);
        assert!(!cmp.is_exact());

        assert!(compare_results(&[], &[]).is_exact());
    }

    fn entries(dir: &Path) -> Vec<std::ffi::OsString> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_write_results_failure_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // a non-empty directory cannot be replaced by a file
        let target = dir.path().join("results");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "x").unwrap();

        assert!(write_results(&target, &[true, false]).is_err());
        assert_eq!(entries(dir.path()), vec![std::ffi::OsString::from("results")]);
        assert!(target.is_dir());
        assert_eq!(fs::read_to_string(target.join("keep")).unwrap(), "x");
    }

    #[test]
    fn test_write_results_replaces_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.txt");
        fs::write(&target, "stale\n").unwrap();

        write_results(&target, &[false, true]).unwrap();
        assert_eq!(fs::read_to_string(&target).unwrap(), "False\nTrue\n");
        assert_eq!(entries(dir.path()), vec![std::ffi::OsString::from("out.txt")]);
    }
}
