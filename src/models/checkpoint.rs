// src/models/checkpoint.rs

//! Crawl resumption cursor.

use std::fmt;

use crate::error::{AppError, Result};

/// Where an interrupted crawl should resume: catalog letter and page number.
///
/// Persisted as the single line `"<letter> <page>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pub letter: char,
    pub page: u32,
}

impl Checkpoint {
    pub fn new(letter: char, page: u32) -> Self {
        Self { letter, page }
    }

    /// Parse the persisted `"<letter> <page>"` form.
    pub fn parse(text: &str) -> Result<Self> {
        let malformed = || AppError::parse("checkpoint", format!("malformed: {text:?}"));

        let (letter_part, page_part) = text.trim().split_once(' ').ok_or_else(malformed)?;
        let mut letters = letter_part.chars();
        let letter = letters.next().ok_or_else(malformed)?;
        if letters.next().is_some() || !letter.is_ascii_uppercase() {
            return Err(malformed());
        }

        let page: u32 = page_part.trim().parse().map_err(|_| malformed())?;
        if page == 0 {
            return Err(malformed());
        }

        Ok(Self { letter, page })
    }
}

impl fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.letter, self.page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let cp = Checkpoint::new('C', 4);
        assert_eq!(cp.to_string(), "C 4");
        assert_eq!(Checkpoint::parse("C 4").unwrap(), cp);
    }

    #[test]
    fn test_parse_tolerates_surrounding_whitespace() {
        assert_eq!(
            Checkpoint::parse(" Q 17\n").unwrap(),
            Checkpoint::new('Q', 17)
        );
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(Checkpoint::parse("").is_err());
        assert!(Checkpoint::parse("C").is_err());
        assert!(Checkpoint::parse("c 4").is_err());
        assert!(Checkpoint::parse("CD 4").is_err());
        assert!(Checkpoint::parse("C zero").is_err());
        assert!(Checkpoint::parse("C 0").is_err());
    }
}
