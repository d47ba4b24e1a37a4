//! Pure text chunking for chaptervec: chapter header extraction and the
//! sliding windower that turns chapter lines into embeddable sections.
//!
//! No I/O happens here — callers hand in file names and line content, and
//! get back [`ChapterHeader`]s and [`Window`]s.
//!
//! [`ChapterHeader`]: chaptervec_shared::ChapterHeader
//! [`Window`]: chaptervec_shared::Window

pub mod chapter;
pub mod windower;

pub use chapter::{parse_chapter_number, parse_header};
pub use windower::{Windows, windows};
