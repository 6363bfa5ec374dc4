// In app/src/feed.rs

use anyhow::{Context, Result};
use std::path::Path;

/// A finite, ordered sequence of integer prices read from a text file.
///
/// One price per line. Blank lines and lines starting with `#` are skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceFeed {
    prices: Vec<u64>,
}

impl PriceFeed {
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read price file {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("Invalid price file {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        let mut prices = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let price = line
                .parse::<u64>()
                .with_context(|| format!("line {}: '{}' is not a price", index + 1, line))?;
            prices.push(price);
        }
        Ok(Self { prices })
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl IntoIterator for PriceFeed {
    type Item = u64;
    type IntoIter = std::vec::IntoIter<u64>;

    fn into_iter(self) -> Self::IntoIter {
        self.prices.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let feed = PriceFeed::parse("# warm-up\n100\n\n  101 \n# breakout\n110\n").unwrap();
        assert_eq!(feed.len(), 3);
        assert_eq!(feed.into_iter().collect::<Vec<_>>(), vec![100, 101, 110]);
    }

    #[test]
    fn test_parse_reports_bad_line() {
        let err = PriceFeed::parse("100\n-5\n").unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.txt");
        std::fs::write(&path, "1\n2\n3\n").unwrap();
        assert_eq!(PriceFeed::from_path(&path).unwrap().len(), 3);
        assert!(PriceFeed::from_path(&dir.path().join("missing.txt")).is_err());
    }
}
