//! Fancy diagnostics support using `ariadne`.
//!
//! Warnings of [`parse_db_strict`](crate::db::parse_db_strict) carry the byte range of the line
//! they are about, so they can be rendered against the source text. Ariadne computes rows and
//! columns from those ranges.
//!
//! # Usage Example
//!
//! ```rust
//! use pvdb_rs::{db::parse_db_strict, diagnostics::emit_db_warnings};
//!
//! let source = "pv_001.song_name=Test\npv_001.bpm=fast\nnot a key\n";
//! let output = parse_db_strict(source);
//!
//! emit_db_warnings("mod_pv_db.txt", source, &output.warnings);
//! ```

use std::ops::Range;

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::db::{ValidationWarning, ValidationWarningWithRange};

/// Simple source container that holds the filename and source text.
///
/// ```rust
/// use pvdb_rs::diagnostics::SimpleSource;
///
/// let source = SimpleSource::new("mod_pv_db.txt", "pv_001.bpm=180\n");
/// assert_eq!(source.name(), "mod_pv_db.txt");
/// assert_eq!(source.text(), "pv_001.bpm=180\n");
/// ```
pub struct SimpleSource<'a> {
    name: &'a str,
    text: &'a str,
}

impl<'a> SimpleSource<'a> {
    /// Creates a new source container.
    #[must_use]
    pub const fn new(name: &'a str, text: &'a str) -> Self {
        Self { name, text }
    }

    /// Source text content.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Source file name.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }
}

/// Conversion of positioned warnings into `ariadne::Report`.
pub trait ToAriadne {
    /// Builds the report. `src` supplies the file name; row and column come from the range.
    fn to_report<'a>(&self, src: &SimpleSource<'a>) -> Report<'a, (String, Range<usize>)>;
}

/// Builds a styled report with a single label.
#[must_use]
pub fn build_report<'a>(
    src: &SimpleSource<'a>,
    kind: ReportKind<'a>,
    range: Range<usize>,
    title: &str,
    label_message: impl ToString,
    color: Color,
) -> Report<'a, (String, Range<usize>)> {
    let filename = src.name().to_string();
    Report::build(kind, (filename.clone(), range.clone()))
        .with_message(title)
        .with_label(
            Label::new((filename, range))
                .with_message(label_message.to_string())
                .with_color(color),
        )
        .finish()
}

impl ToAriadne for ValidationWarningWithRange {
    fn to_report<'a>(&self, src: &SimpleSource<'a>) -> Report<'a, (String, Range<usize>)> {
        let (title, color) = match self.content() {
            ValidationWarning::MalformedLine { .. } => ("Malformed line", Color::Red),
            ValidationWarning::NonNumericPvId { .. } => ("Non-numeric PV id", Color::Yellow),
            ValidationWarning::MissingKey { .. } => ("Missing key", Color::Blue),
            ValidationWarning::InvalidNumber { .. } => ("Invalid number", Color::Yellow),
            ValidationWarning::Clamped { .. } => ("Count clamped", Color::Yellow),
            ValidationWarning::NoPvEntries => ("Not a PV database", Color::Red),
        };
        build_report(
            src,
            ReportKind::Warning,
            self.as_range(),
            title,
            self.content(),
            color,
        )
    }
}

/// Prints every warning against `source` to stderr.
pub fn emit_db_warnings<'a>(
    name: &'a str,
    source: &'a str,
    warnings: impl IntoIterator<Item = &'a ValidationWarningWithRange>,
) {
    let simple = SimpleSource::new(name, source);
    let ariadne_source = Source::from(source);
    for w in warnings {
        let report = w.to_report(&simple);
        let _ = report.eprint((name.to_string(), ariadne_source.clone()));
    }
}

/// Builds the reports of [`emit_db_warnings`] without printing them.
#[must_use]
pub fn collect_db_reports<'a>(
    name: &'a str,
    source: &'a str,
    warnings: impl IntoIterator<Item = &'a ValidationWarningWithRange>,
) -> Vec<Report<'a, (String, Range<usize>)>> {
    let simple = SimpleSource::new(name, source);
    warnings.into_iter().map(|w| w.to_report(&simple)).collect()
}
