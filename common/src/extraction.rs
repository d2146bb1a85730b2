//! Raw extraction payload produced by the external summary's playback run.
//!
//! Timestamps here are still plain milliseconds since match start; the
//! `extract` crate retypes them before anything reaches storage.

/// Recoverable playback failure. Extraction is best-effort, so this never
/// aborts the owning match's ingestion.
#[derive(Debug)]
pub struct ExtractionError(pub String);

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ExtractedData {
    pub version: String,
    pub runtime_ms: i64,
    pub timeseries: Vec<RawTimeseries>,
    pub market: Vec<RawMarket>,
    pub research: Vec<RawResearch>,
    pub objects: Vec<RawObject>,
    pub state: Vec<RawObjectState>,
    pub tribute: Vec<(i64, TributePayload)>,
    pub transactions: Vec<(i64, ActionType, TransactionPayload)>,
    pub actions: Vec<(i64, ActionType, ActionPayload)>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RawTimeseries {
    pub timestamp: i64,
    pub player_number: i32,
    pub population: f32,
    pub military: f32,
    pub percent_explored: f32,
    pub headroom: i32,
    pub food: f32,
    pub wood: f32,
    pub stone: f32,
    pub gold: f32,
    pub relics_captured: i32,
    pub total_housed_time: i64,
    pub total_popcapped_time: i64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RawMarket {
    pub timestamp: i64,
    pub food: f32,
    pub wood: f32,
    pub stone: f32,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RawResearch {
    pub player_number: i32,
    pub technology_id: i32,
    pub started: i64,
    pub finished: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RawObject {
    pub instance_id: i32,
    pub initial_object_id: i32,
    pub initial_class_id: i32,
    pub initial_player_number: Option<i32>,
    pub created: i64,
    pub destroyed: Option<i64>,
    pub destroyed_by_instance_id: Option<i32>,
    pub building_started: Option<i64>,
    pub building_completed: Option<i64>,
    pub total_idle_time: Option<i64>,
    pub created_x: f32,
    pub created_y: f32,
    pub destroyed_x: Option<f32>,
    pub destroyed_y: Option<f32>,
    pub deleted: bool,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RawObjectState {
    pub timestamp: i64,
    pub instance_id: i32,
    pub player_number: Option<i32>,
    pub object_id: i32,
    pub class_id: i32,
    pub researching_technology_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TributePayload {
    pub player_id: i32,
    pub player_id_to: i32,
    pub resource_id: i32,
    pub amount: i32,
    pub fee: f32,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TransactionPayload {
    pub player_id: i32,
    pub resource_id: i32,
    pub amount: i32,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ActionPayload {
    pub player_id: Option<i32>,
    pub x: Option<f32>,
    pub y: Option<f32>,
}

/// In-game action kinds, with the numeric codes used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ActionType {
    Order,
    Stop,
    Work,
    Move,
    Create,
    Patrol,
    Formation,
    Research,
    Build,
    Game,
    Wall,
    Delete,
    AttackGround,
    Tribute,
    Special,
    Queue,
    Sell,
    Buy,
}

impl ActionType {
    pub fn code(&self) -> i32 {
        match self {
            Self::Order => 0,
            Self::Stop => 1,
            Self::Work => 2,
            Self::Move => 3,
            Self::Create => 4,
            Self::Patrol => 21,
            Self::Formation => 23,
            Self::Research => 101,
            Self::Build => 102,
            Self::Game => 103,
            Self::Wall => 105,
            Self::Delete => 106,
            Self::AttackGround => 107,
            Self::Tribute => 108,
            Self::Special => 117,
            Self::Queue => 119,
            Self::Sell => 122,
            Self::Buy => 123,
        }
    }
}
