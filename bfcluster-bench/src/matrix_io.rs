//! Dense similarity-matrix reader.
//!
//! One matrix row per line, entries separated by whitespace and/or commas.
//! Blank lines and anything after `#` are ignored.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use nalgebra::DMatrix;

/// Parse a dense matrix from text.
///
/// Rows must all have the same length. Shape and symmetry are not checked
/// here; the core validates the matrix before solving.
pub fn parse_dense_matrix(content: &str) -> Result<DMatrix<f64>> {
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (lineno, raw) in content.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let row = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|tok| !tok.is_empty())
            .map(|tok| {
                tok.parse::<f64>()
                    .with_context(|| format!("line {}: invalid number '{}'", lineno + 1, tok))
            })
            .collect::<Result<Vec<_>>>()?;

        if let Some(first) = rows.first() {
            if row.len() != first.len() {
                bail!(
                    "line {}: expected {} entries, found {}",
                    lineno + 1,
                    first.len(),
                    row.len()
                );
            }
        }
        rows.push(row);
    }

    if rows.is_empty() {
        bail!("no matrix rows found");
    }

    let ncols = rows[0].len();
    Ok(DMatrix::from_fn(rows.len(), ncols, |i, j| rows[i][j]))
}

/// Read and parse a dense matrix file.
pub fn load_dense_matrix(path: &Path) -> Result<DMatrix<f64>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_dense_matrix(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_whitespace_and_commas() {
        let m = parse_dense_matrix("1 0.5, 0\n0.5,1,0.5\n  0\t0.5  1\n").unwrap();
        assert_eq!(m.shape(), (3, 3));
        assert_eq!(m[(0, 1)], 0.5);
        assert_eq!(m[(2, 2)], 1.0);
        assert_eq!(m[(1, 0)], 0.5);
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let text = "# similarity of two points\n\n1.0 2e-1  # first row\n0.2 1\n\n";
        let m = parse_dense_matrix(text).unwrap();
        assert_eq!(m.shape(), (2, 2));
        assert_eq!(m[(0, 1)], 0.2);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = parse_dense_matrix("1 2 3\n4 5\n").unwrap_err();
        assert!(err.to_string().contains("line 2"), "{}", err);
    }

    #[test]
    fn test_bad_token_rejected() {
        let err = parse_dense_matrix("1 x\n").unwrap_err();
        assert!(err.to_string().contains("invalid number 'x'"), "{}", err);
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(parse_dense_matrix("# nothing\n\n").is_err());
    }

    #[test]
    fn test_non_square_is_passed_through() {
        let m = parse_dense_matrix("1 2 3\n4 5 6\n").unwrap();
        assert_eq!(m.shape(), (2, 3));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(b"# 2x2\n1, 0.3\n0.3, 1\n").expect("Failed to write temp file");
        file.flush().expect("Failed to flush temp file");

        let m = load_dense_matrix(file.path()).unwrap();
        assert_eq!(m.shape(), (2, 2));
        assert_eq!(m[(1, 0)], 0.3);
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = load_dense_matrix(Path::new("/nonexistent/similarity.txt")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"), "{}", err);
    }
}
