//! Source labels: which instrument an isolated output carries.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Name of a source to isolate from a mixed signal.
///
/// The six well-known labels form the reference set accepted by the command
/// line; the codec itself is label-agnostic and accepts any [`Custom`] label.
///
/// [`Custom`]: SourceLabel::Custom
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceLabel {
    Bass,
    Guitar,
    Vocals,
    Drums,
    Synth,
    Brass,
    /// User-defined label
    Custom(String),
}

impl SourceLabel {
    /// The reference label set.
    pub const REFERENCE: [SourceLabel; 6] = [
        SourceLabel::Bass,
        SourceLabel::Guitar,
        SourceLabel::Vocals,
        SourceLabel::Drums,
        SourceLabel::Synth,
        SourceLabel::Brass,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            SourceLabel::Bass => "bass",
            SourceLabel::Guitar => "guitar",
            SourceLabel::Vocals => "vocals",
            SourceLabel::Drums => "drums",
            SourceLabel::Synth => "synth",
            SourceLabel::Brass => "brass",
            SourceLabel::Custom(s) => s.as_str(),
        }
    }

    pub fn is_reference(&self) -> bool {
        !matches!(self, SourceLabel::Custom(_))
    }

    /// Whether the label can be used verbatim as a file stem inside an
    /// output directory: non-empty, no path separators, not `.` or `..`.
    pub fn is_safe_file_stem(&self) -> bool {
        let s = self.as_str();
        !s.is_empty()
            && s != "."
            && s != ".."
            && !s.contains(['/', '\\', '\0'])
    }

    /// Output file name for this label, `{label}.wav`.
    pub fn file_name(&self) -> String {
        format!("{}.wav", self.as_str())
    }
}

impl fmt::Display for SourceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceLabel {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        // Exact names only: the label is also the output file stem.
        Ok(match s {
            "bass" => SourceLabel::Bass,
            "guitar" => SourceLabel::Guitar,
            "vocals" => SourceLabel::Vocals,
            "drums" => SourceLabel::Drums,
            "synth" => SourceLabel::Synth,
            "brass" => SourceLabel::Brass,
            _ => SourceLabel::Custom(s.to_string()),
        })
    }
}

impl Serialize for SourceLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
