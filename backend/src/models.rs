use diesel::prelude::*;

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::matches)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Match {
    pub id: i32,
    pub platform_id: Option<String>,
    pub platform_match_id: Option<String>,
    pub ladder_id: Option<i32>,
    pub dataset_id: i32,
    pub diplomacy_type: String,
    pub team_size: Option<String>,
    pub series_name: Option<String>,
    pub series_id: Option<String>,
    pub played: Option<chrono::DateTime<chrono::Utc>>,
    pub added: chrono::DateTime<chrono::Utc>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::matches)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AddMatch {
    pub platform_id: Option<String>,
    pub platform_match_id: Option<String>,
    pub ladder_id: Option<i32>,
    pub dataset_id: i32,
    pub diplomacy_type: String,
    pub team_size: Option<String>,
    pub series_name: Option<String>,
    pub series_id: Option<String>,
    pub played: Option<chrono::DateTime<chrono::Utc>>,
    pub added: chrono::DateTime<chrono::Utc>,
}

#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = crate::schema::files)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct RecFile {
    pub id: i32,
    pub match_id: i32,
    pub filename: String,
    pub original_filename: String,
    pub origin: String,
    pub added: chrono::DateTime<chrono::Utc>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::files)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AddRecFile {
    pub match_id: i32,
    pub filename: String,
    pub original_filename: String,
    pub origin: String,
    pub added: chrono::DateTime<chrono::Utc>,
}

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = crate::schema::players)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Player {
    pub match_id: i32,
    pub number: i32,
    pub name: String,
    pub team_id: Option<i32>,
    pub rate_snapshot: Option<f64>,
    pub url: Option<String>,
    pub winner: bool,
}

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = crate::schema::teams)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Team {
    pub match_id: i32,
    pub team_id: i32,
}

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = crate::schema::timeseries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Timeseries {
    pub match_id: i32,
    pub player_number: i32,
    pub timestamp_ms: i64,
    pub population: f32,
    pub military: f32,
    pub percent_explored: f32,
    pub headroom: i32,
    pub food: f32,
    pub wood: f32,
    pub stone: f32,
    pub gold: f32,
    pub relics_captured: i32,
    pub total_housed_time_ms: i64,
    pub total_popcapped_time_ms: i64,
}

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = crate::schema::market)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Market {
    pub match_id: i32,
    pub timestamp_ms: i64,
    pub food: f32,
    pub wood: f32,
    pub stone: f32,
}

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = crate::schema::research)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Research {
    pub match_id: i32,
    pub dataset_id: i32,
    pub player_number: i32,
    pub technology_id: i32,
    pub started_ms: i64,
    pub finished_ms: Option<i64>,
}

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = crate::schema::object_instances)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ObjectInstance {
    pub match_id: i32,
    pub dataset_id: i32,
    pub instance_id: i32,
    pub initial_object_id: i32,
    pub initial_class_id: i32,
    pub initial_player_number: Option<i32>,
    pub created_ms: i64,
    pub destroyed_ms: Option<i64>,
    pub destroyed_by_instance_id: Option<i32>,
    pub building_started_ms: Option<i64>,
    pub building_completed_ms: Option<i64>,
    pub total_idle_time_ms: Option<i64>,
    pub created_x: f32,
    pub created_y: f32,
    pub destroyed_x: Option<f32>,
    pub destroyed_y: Option<f32>,
    pub deleted: bool,
}

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = crate::schema::object_instance_states)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ObjectInstanceState {
    pub match_id: i32,
    pub dataset_id: i32,
    pub instance_id: i32,
    pub timestamp_ms: i64,
    pub player_number: Option<i32>,
    pub object_id: i32,
    pub class_id: i32,
    pub researching_technology_id: Option<i32>,
}

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = crate::schema::tribute)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Tribute {
    pub match_id: i32,
    pub timestamp_ms: i64,
    pub player_number: i32,
    pub target_player_number: i32,
    pub resource_id: i32,
    pub amount: i32,
    pub fee: f32,
}

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Transaction {
    pub match_id: i32,
    pub timestamp_ms: i64,
    pub action_id: i32,
    pub player_number: i32,
    pub resource_id: i32,
    pub amount: i32,
}

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = crate::schema::action_log)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ActionLog {
    pub match_id: i32,
    pub timestamp_ms: i64,
    pub action_id: i32,
    pub player_number: Option<i32>,
    pub action_x: Option<f32>,
    pub action_y: Option<f32>,
}
