use diesel_async::RunQueryDsl;

use extract::gate::ExtractionPolicy;
use extract::records;

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMeta {
    pub version: String,
    pub interval_ms: u32,
    pub runtime: std::time::Duration,
}

fn dur_ms(value: std::time::Duration) -> i64 {
    value.as_millis() as i64
}

fn opt_dur_ms(value: Option<std::time::Duration>) -> Option<i64> {
    value.map(dur_ms)
}

/// Persist full extraction data for one match when the policy allows it.
///
/// Best-effort relative to the match's base ingestion: a failed gate check
/// or a recoverable playback error reports `None` instead of propagating.
/// All rows land in a single transaction, so a failure partway leaves no
/// partial extraction behind.
#[tracing::instrument(skip(conn, policy, summary))]
pub async fn save_extraction(
    conn: &mut diesel_async::AsyncPgConnection,
    policy: &ExtractionPolicy,
    summary: &dyn common::MatchSummary,
    ladder_id: Option<i32>,
    match_id: i32,
    dataset_id: i32,
    force: bool,
) -> Result<Option<ExtractionMeta>, diesel::result::Error> {
    if !force
        && !policy.should_extract(
            &summary.players(),
            ladder_id,
            dataset_id,
            summary.can_playback(),
        )
    {
        tracing::info!(
            "[m:{}] skipping full extraction, did not meet requirements",
            match_id
        );
        return Ok(None);
    }

    tracing::info!("[m:{}] starting full extraction", match_id);

    let extracted = match summary.extract(policy.interval_ms) {
        Ok(data) => data,
        Err(error) => {
            tracing::warn!("[m:{}] failed to complete extraction: {:?}", match_id, error);
            return Ok(None);
        }
    };

    let normalized = records::normalize(extracted, &summary.diplomacy());
    let meta = ExtractionMeta {
        version: normalized.version.clone(),
        interval_ms: policy.interval_ms,
        runtime: normalized.runtime,
    };

    let timeseries = normalized
        .timeseries
        .into_iter()
        .map(|r| crate::models::Timeseries {
            match_id,
            player_number: r.player_number,
            timestamp_ms: dur_ms(r.timestamp),
            population: r.population,
            military: r.military,
            percent_explored: r.percent_explored,
            headroom: r.headroom,
            food: r.food,
            wood: r.wood,
            stone: r.stone,
            gold: r.gold,
            relics_captured: r.relics_captured,
            total_housed_time_ms: dur_ms(r.total_housed_time),
            total_popcapped_time_ms: dur_ms(r.total_popcapped_time),
        })
        .collect::<Vec<_>>();

    let market = normalized
        .market
        .into_iter()
        .map(|r| crate::models::Market {
            match_id,
            timestamp_ms: dur_ms(r.timestamp),
            food: r.food,
            wood: r.wood,
            stone: r.stone,
        })
        .collect::<Vec<_>>();

    let research = normalized
        .research
        .into_iter()
        .map(|r| crate::models::Research {
            match_id,
            dataset_id,
            player_number: r.player_number,
            technology_id: r.technology_id,
            started_ms: dur_ms(r.started),
            finished_ms: opt_dur_ms(r.finished),
        })
        .collect::<Vec<_>>();

    let objects = normalized
        .objects
        .into_iter()
        .map(|r| crate::models::ObjectInstance {
            match_id,
            dataset_id,
            instance_id: r.instance_id,
            initial_object_id: r.initial_object_id,
            initial_class_id: r.initial_class_id,
            initial_player_number: r.initial_player_number,
            created_ms: dur_ms(r.created),
            destroyed_ms: opt_dur_ms(r.destroyed),
            destroyed_by_instance_id: r.destroyed_by_instance_id,
            building_started_ms: opt_dur_ms(r.building_started),
            building_completed_ms: opt_dur_ms(r.building_completed),
            total_idle_time_ms: opt_dur_ms(r.total_idle_time),
            created_x: r.created_x,
            created_y: r.created_y,
            destroyed_x: r.destroyed_x,
            destroyed_y: r.destroyed_y,
            deleted: r.deleted,
        })
        .collect::<Vec<_>>();

    let states = normalized
        .states
        .into_iter()
        .map(|r| crate::models::ObjectInstanceState {
            match_id,
            dataset_id,
            instance_id: r.instance_id,
            timestamp_ms: dur_ms(r.timestamp),
            player_number: r.player_number,
            object_id: r.object_id,
            class_id: r.class_id,
            researching_technology_id: r.researching_technology_id,
        })
        .collect::<Vec<_>>();

    let tributes = normalized
        .tributes
        .into_iter()
        .map(|r| crate::models::Tribute {
            match_id,
            timestamp_ms: dur_ms(r.timestamp),
            player_number: r.player_number,
            target_player_number: r.target_player_number,
            resource_id: r.resource_id,
            amount: r.amount,
            fee: r.fee,
        })
        .collect::<Vec<_>>();

    let transactions = normalized
        .transactions
        .into_iter()
        .map(|r| crate::models::Transaction {
            match_id,
            timestamp_ms: dur_ms(r.timestamp),
            action_id: r.action_id,
            player_number: r.player_number,
            resource_id: r.resource_id,
            amount: r.amount,
        })
        .collect::<Vec<_>>();

    let actions = normalized
        .actions
        .into_iter()
        .map(|r| crate::models::ActionLog {
            match_id,
            timestamp_ms: dur_ms(r.timestamp),
            action_id: r.action_id,
            player_number: r.player_number,
            action_x: r.action_x,
            action_y: r.action_y,
        })
        .collect::<Vec<_>>();

    conn.build_transaction()
        .run::<_, diesel::result::Error, _>(|conn| {
            Box::pin(async move {
                diesel::dsl::insert_into(crate::schema::timeseries::dsl::timeseries)
                    .values(&timeseries)
                    .execute(conn)
                    .await?;
                diesel::dsl::insert_into(crate::schema::market::dsl::market)
                    .values(&market)
                    .execute(conn)
                    .await?;
                diesel::dsl::insert_into(crate::schema::research::dsl::research)
                    .values(&research)
                    .execute(conn)
                    .await?;
                diesel::dsl::insert_into(crate::schema::object_instances::dsl::object_instances)
                    .values(&objects)
                    .execute(conn)
                    .await?;
                diesel::dsl::insert_into(
                    crate::schema::object_instance_states::dsl::object_instance_states,
                )
                .values(&states)
                .execute(conn)
                .await?;
                diesel::dsl::insert_into(crate::schema::tribute::dsl::tribute)
                    .values(&tributes)
                    .execute(conn)
                    .await?;
                diesel::dsl::insert_into(crate::schema::transactions::dsl::transactions)
                    .values(&transactions)
                    .execute(conn)
                    .await?;
                diesel::dsl::insert_into(crate::schema::action_log::dsl::action_log)
                    .values(&actions)
                    .execute(conn)
                    .await?;

                Ok(())
            })
        })
        .await?;

    tracing::info!("[m:{}] completed full extraction", match_id);
    Ok(Some(meta))
}
