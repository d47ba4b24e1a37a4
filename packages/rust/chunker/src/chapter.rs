//! Chapter header extraction.
//!
//! A chapter's identity comes from two places: its number is the first
//! contiguous run of digits anywhere in the file name, and its title is the
//! first line of the file, trimmed. A file name without any digit cannot be
//! placed in the corpus and is a parse error (the orchestrator skips the
//! file).

use std::sync::LazyLock;

use regex::Regex;

use chaptervec_shared::{ChapterHeader, ChapterVecError, Result};

/// Matches the first contiguous run of digits in a file name.
static CHAPTER_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)").expect("chapter number regex"));

/// Extract the chapter number from a file name.
///
/// The number is the first contiguous digit run, wherever it appears:
/// `chapter_12.txt` → 12, `03-intro.txt` → 3.
pub fn parse_chapter_number(file_name: &str) -> Result<u32> {
    let caps = CHAPTER_NUMBER_RE.captures(file_name).ok_or_else(|| {
        ChapterVecError::chapter_parse(format!("no chapter number digits in '{file_name}'"))
    })?;

    caps[1].parse::<u32>().map_err(|e| {
        ChapterVecError::chapter_parse(format!("chapter number in '{file_name}': {e}"))
    })
}

/// Build a [`ChapterHeader`] from a file name and the file's first line.
///
/// The title may be empty if the first line is blank; only a missing
/// chapter number is an error.
pub fn parse_header(file_name: &str, first_line: &str) -> Result<ChapterHeader> {
    Ok(ChapterHeader {
        number: parse_chapter_number(file_name)?,
        title: first_line.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_from_simple_name() {
        assert_eq!(parse_chapter_number("chapter_12.txt").unwrap(), 12);
    }

    #[test]
    fn number_is_first_digit_run() {
        // Only the first run counts, later digits are ignored.
        assert_eq!(parse_chapter_number("ch03-part2.txt").unwrap(), 3);
        assert_eq!(parse_chapter_number("7_of_9.txt").unwrap(), 7);
    }

    #[test]
    fn leading_zeros_parse() {
        assert_eq!(parse_chapter_number("007.txt").unwrap(), 7);
    }

    #[test]
    fn no_digits_is_error() {
        let err = parse_chapter_number("introduction.txt").unwrap_err();
        assert!(matches!(err, ChapterVecError::ChapterParse { .. }));
        assert!(err.to_string().contains("introduction.txt"));
    }

    #[test]
    fn header_trims_title() {
        let header = parse_header("chapter_1.txt", "  The Beginning  \n").unwrap();
        assert_eq!(header.number, 1);
        assert_eq!(header.title, "The Beginning");
    }

    #[test]
    fn blank_title_is_allowed() {
        let header = parse_header("chapter_2.txt", "   ").unwrap();
        assert_eq!(header.title, "");
    }
}
