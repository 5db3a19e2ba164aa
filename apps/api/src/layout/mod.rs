// Layout: text measurement, greedy wrapping and the page flow engine.
// Everything here is pure and CPU-bound; async callers run it inside
// tokio::task::spawn_blocking.

pub mod cursor;
pub mod flow;
pub mod font_metrics;
pub mod sections;
pub mod wrap;

// Re-export the public API consumed by the emitters and the QA scorer.
pub use flow::{layout_resume, DrawOp, LaidOutDocument, LayoutWarning, PageLayout};
pub use font_metrics::{FontFace, FontFamily};
pub use sections::{walk_sections, EntryHeading, SectionKind, SectionSink};
pub use wrap::wrap;
