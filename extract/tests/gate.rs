use common::SummaryPlayer;
use extract::gate::ExtractionPolicy;
use pretty_assertions::assert_eq;

fn player(number: i32, rate: Option<f64>) -> SummaryPlayer {
    SummaryPlayer {
        number,
        name: format!("Player {}", number),
        rate_snapshot: rate,
        url: None,
        winner: false,
    }
}

fn enabled_policy() -> ExtractionPolicy {
    ExtractionPolicy {
        enabled: true,
        ..ExtractionPolicy::default()
    }
}

#[test]
fn disabled_policy_never_extracts() {
    let policy = ExtractionPolicy::default();
    let players = [player(1, Some(2400.0)), player(2, Some(2300.0))];

    assert_eq!(policy.should_extract(&players, Some(131), 1, true), false);
}

#[test]
fn ladder_outside_allow_list() {
    let policy = enabled_policy();
    let players = [player(1, Some(2400.0)), player(2, Some(2300.0))];

    assert_eq!(policy.should_extract(&players, Some(130), 1, true), false);
    assert_eq!(policy.should_extract(&players, None, 1, true), false);
}

#[test]
fn unsupported_dataset() {
    let policy = enabled_policy();
    let players = [player(1, Some(2400.0)), player(2, Some(2300.0))];

    assert_eq!(policy.should_extract(&players, Some(131), 100, true), false);
}

#[test]
fn all_conditions_met() {
    let policy = enabled_policy();
    let players = [player(1, Some(2400.0)), player(2, Some(2300.0))];

    assert_eq!(policy.should_extract(&players, Some(131), 1, true), true);
    assert_eq!(policy.should_extract(&players, Some(132), 1, true), true);
}

#[test]
fn playback_required() {
    let policy = enabled_policy();
    let players = [player(1, Some(2400.0)), player(2, Some(2300.0))];

    assert_eq!(policy.should_extract(&players, Some(131), 1, false), false);
}

#[test]
fn unrated_players_dilute_the_average() {
    let policy = ExtractionPolicy {
        minimum_rating: 1500.0,
        ..enabled_policy()
    };
    // 2000 / 2 players = 1000, below the minimum even though the only
    // rated player clears it.
    let players = [player(1, Some(2000.0)), player(2, None)];

    assert_eq!(policy.should_extract(&players, Some(131), 1, true), false);

    let rated = [player(1, Some(2000.0)), player(2, Some(1600.0))];
    assert_eq!(policy.should_extract(&rated, Some(131), 1, true), true);
}

#[test]
fn empty_player_list_is_guarded() {
    let policy = enabled_policy();

    assert_eq!(policy.should_extract(&[], Some(131), 1, true), false);
}
