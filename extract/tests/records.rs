use std::time::Duration;

use common::extraction::{
    ActionPayload, ActionType, ExtractedData, RawObject, RawResearch, RawTimeseries,
    TransactionPayload, TributePayload,
};
use common::{Diplomacy, DiplomacyType};
use extract::records;
use pretty_assertions::assert_eq;

fn one_v_one() -> Diplomacy {
    Diplomacy {
        kind: DiplomacyType::OneVOne,
        team_size: Some("1v1".to_owned()),
    }
}

fn team_game() -> Diplomacy {
    Diplomacy {
        kind: DiplomacyType::TeamGame,
        team_size: Some("2v2".to_owned()),
    }
}

fn object(destroyed: Option<i64>) -> RawObject {
    RawObject {
        instance_id: 400,
        initial_object_id: 83,
        initial_class_id: 70,
        initial_player_number: Some(1),
        created: 0,
        destroyed,
        destroyed_by_instance_id: None,
        building_started: None,
        building_completed: None,
        total_idle_time: None,
        created_x: 12.5,
        created_y: 44.0,
        destroyed_x: None,
        destroyed_y: None,
        deleted: false,
    }
}

#[test]
fn absent_destroyed_stays_absent() {
    let data = ExtractedData {
        objects: vec![object(None)],
        ..ExtractedData::default()
    };

    let result = records::normalize(data, &one_v_one());

    assert_eq!(result.objects.len(), 1);
    assert_eq!(result.objects[0].destroyed, None);
}

#[test]
fn zero_destroyed_stays_absent() {
    let data = ExtractedData {
        objects: vec![object(Some(0))],
        ..ExtractedData::default()
    };

    let result = records::normalize(data, &one_v_one());

    assert_eq!(result.objects[0].destroyed, None);
}

#[test]
fn present_destroyed_becomes_duration() {
    let data = ExtractedData {
        objects: vec![object(Some(913_000))],
        ..ExtractedData::default()
    };

    let result = records::normalize(data, &one_v_one());

    assert_eq!(result.objects[0].destroyed, Some(Duration::from_millis(913_000)));
}

#[test]
fn tribute_triple_expands_to_one_record() {
    let data = ExtractedData {
        tribute: vec![(
            120_500,
            TributePayload {
                player_id: 2,
                player_id_to: 1,
                resource_id: 3,
                amount: 500,
                fee: 0.3,
            },
        )],
        ..ExtractedData::default()
    };

    let result = records::normalize(data, &one_v_one());

    assert_eq!(
        result.tributes,
        vec![records::Tribute {
            timestamp: Duration::from_millis(120_500),
            player_number: 2,
            target_player_number: 1,
            resource_id: 3,
            amount: 500,
            fee: 0.3,
        }]
    );
}

#[test]
fn transactions_carry_the_action_code() {
    let data = ExtractedData {
        transactions: vec![(
            60_000,
            ActionType::Buy,
            TransactionPayload {
                player_id: 1,
                resource_id: 0,
                amount: 100,
            },
        )],
        ..ExtractedData::default()
    };

    let result = records::normalize(data, &team_game());

    assert_eq!(result.transactions.len(), 1);
    assert_eq!(result.transactions[0].action_id, 123);
    assert_eq!(result.transactions[0].player_number, 1);
}

#[test]
fn actions_only_recorded_for_1v1() {
    let actions = vec![(
        15_000,
        ActionType::Move,
        ActionPayload {
            player_id: Some(1),
            x: Some(100.0),
            y: Some(120.0),
        },
    )];

    let team_result = records::normalize(
        ExtractedData {
            actions: actions.clone(),
            ..ExtractedData::default()
        },
        &team_game(),
    );
    assert_eq!(team_result.actions, vec![]);

    let solo_result = records::normalize(
        ExtractedData {
            actions,
            ..ExtractedData::default()
        },
        &one_v_one(),
    );
    assert_eq!(
        solo_result.actions,
        vec![records::ActionLogEntry {
            timestamp: Duration::from_millis(15_000),
            action_id: 3,
            player_number: Some(1),
            action_x: Some(100.0),
            action_y: Some(120.0),
        }]
    );
}

#[test]
fn timeseries_counters_are_retyped() {
    let data = ExtractedData {
        version: "1.4".to_owned(),
        runtime_ms: 85_000,
        timeseries: vec![RawTimeseries {
            timestamp: 30_000,
            player_number: 1,
            population: 18.0,
            military: 3.0,
            percent_explored: 9.4,
            headroom: 7,
            food: 210.0,
            wood: 180.0,
            stone: 100.0,
            gold: 85.0,
            relics_captured: 0,
            total_housed_time: 2_500,
            total_popcapped_time: 0,
        }],
        ..ExtractedData::default()
    };

    let result = records::normalize(data, &one_v_one());

    assert_eq!(result.version, "1.4");
    assert_eq!(result.runtime, Duration::from_millis(85_000));
    assert_eq!(result.timeseries[0].timestamp, Duration::from_millis(30_000));
    assert_eq!(
        result.timeseries[0].total_housed_time,
        Duration::from_millis(2_500)
    );
    assert_eq!(result.timeseries[0].total_popcapped_time, Duration::ZERO);
}

#[test]
fn research_finished_zero_is_absent() {
    let data = ExtractedData {
        research: vec![
            RawResearch {
                player_number: 1,
                technology_id: 22,
                started: 95_000,
                finished: Some(0),
            },
            RawResearch {
                player_number: 2,
                technology_id: 22,
                started: 101_000,
                finished: Some(131_000),
            },
        ],
        ..ExtractedData::default()
    };

    let result = records::normalize(data, &one_v_one());

    assert_eq!(result.research[0].finished, None);
    assert_eq!(
        result.research[1].finished,
        Some(Duration::from_millis(131_000))
    );
}
