//! Sliding windower over chapter lines.
//!
//! Produces the ordered sequence of text windows submitted to the embedder.
//! For every non-empty line: the trimmed line is appended to an internal
//! buffer, a window is emitted with the buffer joined by single spaces, and
//! the oldest buffered line is removed. Blank lines are skipped entirely —
//! they neither extend nor reset the buffer.
//!
//! Note the append-then-pop-front order means the buffer drains back to
//! empty after every emission, so each window is the single most-recent
//! line. This is kept deliberately: databases written by earlier ingests
//! contain windows in exactly this shape, and changing the policy would
//! change stored content. See DESIGN.md.

use std::collections::VecDeque;

use chaptervec_shared::Window;

/// Lazy iterator of [`Window`]s over a chapter's lines.
///
/// Restartable: constructing a fresh `Windows` over the same lines yields
/// the identical sequence.
pub struct Windows<I> {
    lines: I,
    buffer: VecDeque<String>,
    next_section: u32,
}

/// Create a windower over `lines` (the lines after the title line).
///
/// A sequence with zero non-empty lines yields no windows; that is not an
/// error.
pub fn windows<I>(lines: I) -> Windows<I::IntoIter>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    Windows {
        lines: lines.into_iter(),
        buffer: VecDeque::new(),
        next_section: 1,
    }
}

impl<I, S> Iterator for Windows<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = Window;

    fn next(&mut self) -> Option<Window> {
        loop {
            let line = self.lines.next()?;
            let trimmed = line.as_ref().trim();
            if trimmed.is_empty() {
                continue;
            }

            self.buffer.push_back(trimmed.to_string());
            let text = self
                .buffer
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(" ");
            self.buffer.pop_front();

            let section_number = self.next_section;
            self.next_section += 1;

            return Some(Window {
                section_number,
                text,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(lines: &[&str]) -> Vec<String> {
        windows(lines.iter()).map(|w| w.text).collect()
    }

    #[test]
    fn each_emission_is_most_recent_line() {
        // Worked trace: after L1 the buffer is [L1], "L1" is emitted, and
        // the pop drains it; L2 and L3 behave identically.
        assert_eq!(texts(&["L1", "L2", "L3"]), vec!["L1", "L2", "L3"]);
    }

    #[test]
    fn blank_lines_are_skipped_not_reset() {
        assert_eq!(texts(&["a", "", "b", "c"]), vec!["a", "b", "c"]);
        assert_eq!(texts(&["", "", "only"]), vec!["only"]);
    }

    #[test]
    fn lines_are_trimmed() {
        assert_eq!(texts(&["  padded  ", "\ttabbed\t"]), vec!["padded", "tabbed"]);
    }

    #[test]
    fn multi_word_lines_keep_internal_spacing() {
        assert_eq!(
            texts(&["the quick brown", "fox jumps"]),
            vec!["the quick brown", "fox jumps"]
        );
    }

    #[test]
    fn section_numbers_start_at_one_and_are_contiguous() {
        let nums: Vec<u32> = windows(["a", "", "b", "c", "", "", "d"].iter())
            .map(|w| w.section_number)
            .collect();
        assert_eq!(nums, vec![1, 2, 3, 4]);
    }

    #[test]
    fn empty_input_yields_no_windows() {
        assert!(texts(&[]).is_empty());
        assert!(texts(&["", "   ", "\t"]).is_empty());
    }

    #[test]
    fn windower_is_restartable() {
        let lines = ["alpha", "", "beta gamma", "delta"];
        let first: Vec<Window> = windows(lines.iter()).collect();
        let second: Vec<Window> = windows(lines.iter()).collect();
        assert_eq!(first, second);
    }
}
