//! Normalization of the raw playback payload into fixed-shape records.
//!
//! Millisecond counters become `Duration`s here; absent or zero optional
//! timestamps stay absent instead of turning into zero durations.

use std::time::Duration;

use common::extraction::ExtractedData;
use common::{Diplomacy, DiplomacyType};

#[derive(Debug, Clone, PartialEq)]
pub struct Timeseries {
    pub timestamp: Duration,
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
    pub total_housed_time: Duration,
    pub total_popcapped_time: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Market {
    pub timestamp: Duration,
    pub food: f32,
    pub wood: f32,
    pub stone: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Research {
    pub player_number: i32,
    pub technology_id: i32,
    pub started: Duration,
    pub finished: Option<Duration>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectInstance {
    pub instance_id: i32,
    pub initial_object_id: i32,
    pub initial_class_id: i32,
    pub initial_player_number: Option<i32>,
    pub created: Duration,
    pub destroyed: Option<Duration>,
    pub destroyed_by_instance_id: Option<i32>,
    pub building_started: Option<Duration>,
    pub building_completed: Option<Duration>,
    pub total_idle_time: Option<Duration>,
    pub created_x: f32,
    pub created_y: f32,
    pub destroyed_x: Option<f32>,
    pub destroyed_y: Option<f32>,
    pub deleted: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjectInstanceState {
    pub timestamp: Duration,
    pub instance_id: i32,
    pub player_number: Option<i32>,
    pub object_id: i32,
    pub class_id: i32,
    pub researching_technology_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tribute {
    pub timestamp: Duration,
    pub player_number: i32,
    pub target_player_number: i32,
    pub resource_id: i32,
    pub amount: i32,
    pub fee: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub timestamp: Duration,
    pub action_id: i32,
    pub player_number: i32,
    pub resource_id: i32,
    pub amount: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionLogEntry {
    pub timestamp: Duration,
    pub action_id: i32,
    pub player_number: Option<i32>,
    pub action_x: Option<f32>,
    pub action_y: Option<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchExtraction {
    pub version: String,
    pub runtime: Duration,
    pub timeseries: Vec<Timeseries>,
    pub market: Vec<Market>,
    pub research: Vec<Research>,
    pub objects: Vec<ObjectInstance>,
    pub states: Vec<ObjectInstanceState>,
    pub tributes: Vec<Tribute>,
    pub transactions: Vec<Transaction>,
    pub actions: Vec<ActionLogEntry>,
}

fn ms(value: i64) -> Duration {
    Duration::from_millis(value.max(0) as u64)
}

fn opt_ms(value: Option<i64>) -> Option<Duration> {
    value.filter(|v| *v != 0).map(ms)
}

pub fn normalize(data: ExtractedData, diplomacy: &Diplomacy) -> MatchExtraction {
    let timeseries = data
        .timeseries
        .into_iter()
        .map(|r| Timeseries {
            timestamp: ms(r.timestamp),
            player_number: r.player_number,
            population: r.population,
            military: r.military,
            percent_explored: r.percent_explored,
            headroom: r.headroom,
            food: r.food,
            wood: r.wood,
            stone: r.stone,
            gold: r.gold,
            relics_captured: r.relics_captured,
            total_housed_time: ms(r.total_housed_time),
            total_popcapped_time: ms(r.total_popcapped_time),
        })
        .collect();

    let market = data
        .market
        .into_iter()
        .map(|r| Market {
            timestamp: ms(r.timestamp),
            food: r.food,
            wood: r.wood,
            stone: r.stone,
        })
        .collect();

    let research = data
        .research
        .into_iter()
        .map(|r| Research {
            player_number: r.player_number,
            technology_id: r.technology_id,
            started: ms(r.started),
            finished: opt_ms(r.finished),
        })
        .collect();

    let objects = data
        .objects
        .into_iter()
        .map(|r| ObjectInstance {
            instance_id: r.instance_id,
            initial_object_id: r.initial_object_id,
            initial_class_id: r.initial_class_id,
            initial_player_number: r.initial_player_number,
            created: ms(r.created),
            destroyed: opt_ms(r.destroyed),
            destroyed_by_instance_id: r.destroyed_by_instance_id,
            building_started: opt_ms(r.building_started),
            building_completed: opt_ms(r.building_completed),
            total_idle_time: opt_ms(r.total_idle_time),
            created_x: r.created_x,
            created_y: r.created_y,
            destroyed_x: r.destroyed_x,
            destroyed_y: r.destroyed_y,
            deleted: r.deleted,
        })
        .collect();

    let states = data
        .state
        .into_iter()
        .map(|r| ObjectInstanceState {
            timestamp: ms(r.timestamp),
            instance_id: r.instance_id,
            player_number: r.player_number,
            object_id: r.object_id,
            class_id: r.class_id,
            researching_technology_id: r.researching_technology_id,
        })
        .collect();

    let tributes = data
        .tribute
        .into_iter()
        .map(|(timestamp, payload)| Tribute {
            timestamp: ms(timestamp),
            player_number: payload.player_id,
            target_player_number: payload.player_id_to,
            resource_id: payload.resource_id,
            amount: payload.amount,
            fee: payload.fee,
        })
        .collect();

    let transactions = data
        .transactions
        .into_iter()
        .map(|(timestamp, action_type, payload)| Transaction {
            timestamp: ms(timestamp),
            action_id: action_type.code(),
            player_number: payload.player_id,
            resource_id: payload.resource_id,
            amount: payload.amount,
        })
        .collect();

    // The action log only carries meaning for 1v1; team and FFA matches
    // never populate it.
    let actions = if diplomacy.kind == DiplomacyType::OneVOne {
        data.actions
            .into_iter()
            .map(|(timestamp, action_type, payload)| ActionLogEntry {
                timestamp: ms(timestamp),
                action_id: action_type.code(),
                player_number: payload.player_id,
                action_x: payload.x,
                action_y: payload.y,
            })
            .collect()
    } else {
        Vec::new()
    };

    MatchExtraction {
        version: data.version,
        runtime: ms(data.runtime_ms),
        timeseries,
        market,
        research,
        objects,
        states,
        tributes,
        transactions,
        actions,
    }
}
