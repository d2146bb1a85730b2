pub mod extraction;

pub use extraction::{ExtractedData, ExtractionError};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SummaryPlayer {
    pub number: i32,
    pub name: String,
    pub rate_snapshot: Option<f64>,
    pub url: Option<String>,
    pub winner: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DiplomacyType {
    OneVOne,
    TeamGame,
    FreeForAll,
    Other,
}

impl DiplomacyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneVOne => "1v1",
            Self::TeamGame => "TG",
            Self::FreeForAll => "FFA",
            Self::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Diplomacy {
    pub kind: DiplomacyType,
    pub team_size: Option<String>,
}

#[derive(Debug)]
pub enum ParseError {
    Malformed(String),
    Io(std::io::Error),
}

impl From<std::io::Error> for ParseError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Contract the ingestion pipeline requires from a parsed match summary.
///
/// Implemented by the external replay parser, not by this workspace.
pub trait MatchSummary: Send {
    fn players(&self) -> Vec<SummaryPlayer>;

    /// Team groupings as lists of player numbers.
    fn teams(&self) -> Vec<Vec<i32>>;

    fn diplomacy(&self) -> Diplomacy;

    fn dataset_id(&self) -> i32;

    fn played(&self) -> Option<chrono::DateTime<chrono::Utc>>;

    /// Whether the replay supports full event playback.
    fn can_playback(&self) -> bool;

    /// Run full playback, sampling state every `interval_ms` milliseconds.
    fn extract(&self, interval_ms: u32) -> Result<ExtractedData, ExtractionError>;
}

pub trait RecParser: Send + Sync {
    fn parse(&self, data: &[u8]) -> Result<Box<dyn MatchSummary>, ParseError>;
}
