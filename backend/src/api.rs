use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use extract::filename::{self, SeriesId};
use extract::gate::ExtractionPolicy;

#[derive(Debug)]
pub enum ApiError {
    Io(std::io::Error),
    Db(diesel::result::Error),
    Archive(zip::result::ZipError),
    Storage(String),
}

impl From<std::io::Error> for ApiError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<diesel::result::Error> for ApiError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Db(value)
    }
}

impl From<zip::result::ZipError> for ApiError {
    fn from(value: zip::result::ZipError) -> Self {
        Self::Archive(value)
    }
}

/// Metadata accompanying a single file ingestion. Everything is optional;
/// local files carry none of it.
#[derive(Debug, Default, Clone)]
pub struct FileInfo {
    pub series_name: Option<String>,
    pub series_id: Option<SeriesId>,
    pub platform_id: Option<String>,
    pub platform_match_id: Option<String>,
    pub played: Option<chrono::DateTime<chrono::Utc>>,
    pub ladder_id: Option<i32>,
    pub user_data: Option<Vec<crate::platforms::PlatformPlayer>>,
    /// Modification time of the staged copy, for archive members whose
    /// original mtime only exists in the archive metadata.
    pub modified: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, PartialEq)]
pub enum AddOutcome {
    Added {
        match_id: i32,
        file_id: i32,
        extracted: bool,
    },
    Duplicate {
        match_id: i32,
        file_id: i32,
        extracted: bool,
    },
    Skipped {
        reason: String,
    },
}

#[derive(Debug, PartialEq)]
pub enum RemoveOutcome {
    Removed,
    NotFound,
}

pub struct Api {
    conn: diesel_async::AsyncPgConnection,
    parser: Box<dyn common::RecParser>,
    platforms: std::collections::HashMap<String, Box<dyn crate::platforms::Platform>>,
    storage: Box<dyn crate::storage::RecStorage>,
    policy: ExtractionPolicy,
    temp_dir: tempfile::TempDir,
}

impl Api {
    /// Connect to the database and set up the scoped staging directory.
    /// Staged downloads and archive members live there until the `Api` is
    /// dropped.
    pub async fn connect(
        parser: Box<dyn common::RecParser>,
        platforms: std::collections::HashMap<String, Box<dyn crate::platforms::Platform>>,
        storage: Box<dyn crate::storage::RecStorage>,
        policy: ExtractionPolicy,
    ) -> Result<Self, ApiError> {
        let conn = crate::db_connection().await;
        let temp_dir = tempfile::tempdir()?;

        Ok(Self {
            conn,
            parser,
            platforms,
            storage,
            policy,
            temp_dir,
        })
    }

    /// Check if a platform match was already ingested.
    pub async fn has_match(
        &mut self,
        platform_id: &str,
        platform_match_id: &str,
    ) -> Result<bool, ApiError> {
        Ok(self
            .find_match(platform_id, platform_match_id)
            .await?
            .is_some())
    }

    async fn find_match(
        &mut self,
        platform_id: &str,
        platform_match_id: &str,
    ) -> Result<Option<i32>, ApiError> {
        let query = crate::schema::matches::dsl::matches
            .filter(crate::schema::matches::dsl::platform_id.eq(platform_id))
            .filter(crate::schema::matches::dsl::platform_match_id.eq(platform_match_id))
            .select(crate::models::Match::as_select());
        let mut results: Vec<crate::models::Match> = query.load(&mut self.conn).await?;

        Ok(results.pop().map(|m| m.id))
    }

    /// Ingest one resolved replay file. All other entry points converge here.
    #[tracing::instrument(skip(self, info))]
    pub async fn add_file(
        &mut self,
        path: &std::path::Path,
        origin: &str,
        info: FileInfo,
    ) -> Result<AddOutcome, ApiError> {
        tracing::info!("processing file {:?}", path);

        let file = std::fs::File::open(path)?;
        let mmap = unsafe { memmap2::MmapOptions::new().map(&file)? };

        let summary = match self.parser.parse(&mmap) {
            Ok(s) => s,
            Err(error) => {
                tracing::warn!("failed to parse {:?}: {:?}", path, error);
                return Ok(AddOutcome::Skipped {
                    reason: format!("unparseable rec: {:?}", error),
                });
            }
        };

        let original_filename = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        let modified = info.modified.or_else(|| {
            std::fs::metadata(path)
                .and_then(|m| m.modified())
                .ok()
                .map(chrono::DateTime::<chrono::Utc>::from)
        });
        let played = resolve_played(info.played, summary.played(), &original_filename, modified);

        let existing = match (&info.platform_id, &info.platform_match_id) {
            (Some(platform_id), Some(platform_match_id)) => {
                self.find_match(platform_id, platform_match_id).await?
            }
            _ => None,
        };

        let diplomacy = summary.diplomacy();
        let dataset_id = summary.dataset_id();

        let match_id = match existing {
            Some(id) => {
                tracing::info!("[m:{}] match already exists", id);
                id
            }
            None => {
                let match_id = diesel::dsl::insert_into(crate::schema::matches::dsl::matches)
                    .values(crate::models::AddMatch {
                        platform_id: info.platform_id.clone(),
                        platform_match_id: info.platform_match_id.clone(),
                        ladder_id: info.ladder_id,
                        dataset_id,
                        diplomacy_type: diplomacy.kind.as_str().to_owned(),
                        team_size: diplomacy.team_size.clone(),
                        series_name: info.series_name.clone(),
                        series_id: info.series_id.as_ref().map(|s| s.to_string()),
                        played,
                        added: chrono::Utc::now(),
                    })
                    .returning(crate::schema::matches::dsl::id)
                    .get_result::<i32>(&mut self.conn)
                    .await?;

                self.add_participants(match_id, summary.as_ref(), info.user_data.as_deref())
                    .await?;

                tracing::info!("[m:{}] created match", match_id);
                match_id
            }
        };

        let stored_path = self
            .storage
            .store(match_id, original_filename.clone(), mmap.to_vec())
            .await
            .map_err(ApiError::Storage)?;

        let file_id = diesel::dsl::insert_into(crate::schema::files::dsl::files)
            .values(crate::models::AddRecFile {
                match_id,
                filename: stored_path,
                original_filename,
                origin: origin.to_owned(),
                added: chrono::Utc::now(),
            })
            .returning(crate::schema::files::dsl::id)
            .get_result::<i32>(&mut self.conn)
            .await?;

        // Extraction eligibility does not depend on duplication status, so
        // this runs for reused matches too.
        let extracted = match crate::extract::save_extraction(
            &mut self.conn,
            &self.policy,
            summary.as_ref(),
            info.ladder_id,
            match_id,
            dataset_id,
            false,
        )
        .await
        {
            Ok(meta) => meta.is_some(),
            Err(error) => {
                tracing::warn!("[m:{}] failed to persist extraction: {:?}", match_id, error);
                false
            }
        };

        Ok(match existing {
            Some(_) => AddOutcome::Duplicate {
                match_id,
                file_id,
                extracted,
            },
            None => AddOutcome::Added {
                match_id,
                file_id,
                extracted,
            },
        })
    }

    async fn add_participants(
        &mut self,
        match_id: i32,
        summary: &dyn common::MatchSummary,
        user_data: Option<&[crate::platforms::PlatformPlayer]>,
    ) -> Result<(), ApiError> {
        let groups = summary.teams();
        let mut team_of = std::collections::HashMap::new();
        for (idx, group) in groups.iter().enumerate() {
            for number in group {
                team_of.insert(*number, (idx + 1) as i32);
            }
        }

        let user_data = user_data.unwrap_or(&[]);
        let player_rows = summary
            .players()
            .into_iter()
            .enumerate()
            .map(|(idx, player)| {
                let meta = user_data.get(idx);

                crate::models::Player {
                    match_id,
                    number: player.number,
                    name: meta
                        .map(|m| m.name.clone())
                        .filter(|n| !n.is_empty())
                        .unwrap_or(player.name),
                    team_id: team_of.get(&player.number).copied(),
                    rate_snapshot: meta.and_then(|m| m.rate_snapshot).or(player.rate_snapshot),
                    url: meta.and_then(|m| m.url.clone()).or(player.url),
                    winner: player.winner,
                }
            })
            .collect::<Vec<_>>();
        let team_rows = (1..=groups.len())
            .map(|team_id| crate::models::Team {
                match_id,
                team_id: team_id as i32,
            })
            .collect::<Vec<_>>();

        diesel::dsl::insert_into(crate::schema::teams::dsl::teams)
            .values(&team_rows)
            .on_conflict_do_nothing()
            .execute(&mut self.conn)
            .await?;
        diesel::dsl::insert_into(crate::schema::players::dsl::players)
            .values(&player_rows)
            .on_conflict_do_nothing()
            .execute(&mut self.conn)
            .await?;

        Ok(())
    }

    /// Ingest a match by platform url or id, downloading one (or every)
    /// participant's point of view.
    #[tracing::instrument(skip(self))]
    pub async fn add_match(
        &mut self,
        platform: &str,
        url: &str,
        single_pov: bool,
    ) -> Result<(), ApiError> {
        let match_id = url.rsplit('/').next().unwrap_or(url);

        let found = {
            let client = match self.platforms.get(platform) {
                Some(c) => c,
                None => {
                    tracing::error!("no client registered for platform {}", platform);
                    return Ok(());
                }
            };
            match client.get_match(match_id).await {
                Ok(m) => m,
                Err(error) => {
                    tracing::error!("failed to get match: {:?}", error);
                    return Ok(());
                }
            }
        };

        let povs = if single_pov {
            match found.players.iter().find(|p| p.url.is_some()) {
                Some(chosen) => vec![chosen.clone()],
                None => return Ok(()),
            }
        } else {
            found.players.clone()
        };

        for pov in povs {
            let rec_url = match pov.url {
                Some(u) => u,
                None => continue,
            };

            let downloaded = match self.platforms.get(platform) {
                Some(client) => client.download_rec(&rec_url, self.temp_dir.path()).await,
                None => continue,
            };
            let filename = match downloaded {
                Ok(f) => f,
                Err(error) => {
                    tracing::error!("could not download valid rec ({}): {:?}", match_id, error);
                    continue;
                }
            };

            let staged = self.temp_dir.path().join(&filename);
            self.add_file(
                &staged,
                url,
                FileInfo {
                    platform_id: Some(platform.to_owned()),
                    platform_match_id: Some(match_id.to_owned()),
                    played: Some(found.timestamp),
                    ladder_id: found.ladder,
                    user_data: Some(found.players.clone()),
                    ..FileInfo::default()
                },
            )
            .await?;
        }

        Ok(())
    }

    /// Ingest every member of a series archive, in lexicographic member
    /// order, all tagged with the same series label/id.
    #[tracing::instrument(skip(self, series_name, series_id))]
    pub async fn add_series(
        &mut self,
        zip_path: &std::path::Path,
        series_name: Option<String>,
        series_id: Option<SeriesId>,
    ) -> Result<(), ApiError> {
        let basename = archive_basename(zip_path);
        let (derived_name, derived_id) = filename::parse_series_path(zip_path);
        let series_name = series_name.or(Some(derived_name));
        let series_id = series_id.or(derived_id);

        let file = std::fs::File::open(zip_path)?;
        let mut archive = zip::ZipArchive::new(file)?;
        tracing::info!("[{}] opened archive", basename);

        let members = stage_archive(&mut archive, self.temp_dir.path())?;
        for member in members {
            tracing::info!("[{}] processing member {}", basename, member.name);
            let result = self
                .add_file(
                    &member.path,
                    &basename,
                    FileInfo {
                        series_name: series_name.clone(),
                        series_id: series_id.clone(),
                        modified: member.modified,
                        ..FileInfo::default()
                    },
                )
                .await;
            if let Err(error) = result {
                tracing::warn!("[{}] failed to add member {}: {:?}", basename, member.name, error);
            }
        }

        tracing::info!("[{}] finished", basename);
        Ok(())
    }

    /// Ingest a zip of platform recs, one match per member with a replay
    /// extension.
    #[tracing::instrument(skip(self))]
    pub async fn add_zip(
        &mut self,
        platform_id: &str,
        zip_path: &std::path::Path,
    ) -> Result<(), ApiError> {
        let basename = archive_basename(zip_path);

        let file = std::fs::File::open(zip_path)?;
        let mut archive = zip::ZipArchive::new(file)?;
        tracing::info!("[{}] opened archive", basename);

        let members = stage_archive(&mut archive, self.temp_dir.path())?;
        for member in members.into_iter().filter(|m| is_rec(&m.name)) {
            tracing::info!("[{}] processing member {}", basename, member.name);

            let member_basename = member.name.rsplit('/').next().unwrap_or(&member.name);
            let played = filename::parse_filename_timestamp(member_basename).or(member.modified);

            let result = self
                .add_file(
                    &member.path,
                    &basename,
                    FileInfo {
                        platform_id: Some(platform_id.to_owned()),
                        played,
                        ..FileInfo::default()
                    },
                )
                .await;
            if let Err(error) = result {
                tracing::warn!("[{}] failed to add member {}: {:?}", basename, member.name, error);
            }
        }

        tracing::info!("[{}] finished", basename);
        Ok(())
    }

    /// Remove a file (cascading to its match when it was the last one) or a
    /// whole match.
    pub async fn remove(
        &mut self,
        file_id: Option<i32>,
        match_id: Option<i32>,
    ) -> Result<RemoveOutcome, ApiError> {
        remove(&mut self.conn, file_id, match_id).await
    }
}

/// Staged deletes, committed separately: later stages failing leave the
/// earlier stages' work in place.
pub async fn remove(
    conn: &mut diesel_async::AsyncPgConnection,
    file_id: Option<i32>,
    match_id: Option<i32>,
) -> Result<RemoveOutcome, ApiError> {
    if let Some(file_id) = file_id {
        let mut rows: Vec<crate::models::RecFile> = crate::schema::files::dsl::files
            .filter(crate::schema::files::dsl::id.eq(file_id))
            .select(crate::models::RecFile::as_select())
            .load(conn)
            .await?;

        if let Some(file) = rows.pop() {
            let siblings: i64 = crate::schema::files::dsl::files
                .filter(crate::schema::files::dsl::match_id.eq(file.match_id))
                .count()
                .get_result(conn)
                .await?;

            if cascades_to_match(siblings) {
                remove_match(conn, file.match_id).await?;
            } else {
                diesel::dsl::delete(
                    crate::schema::files::dsl::files
                        .filter(crate::schema::files::dsl::id.eq(file_id)),
                )
                .execute(conn)
                .await?;
            }
            return Ok(RemoveOutcome::Removed);
        }
    } else if let Some(match_id) = match_id {
        let found: Vec<crate::models::Match> = crate::schema::matches::dsl::matches
            .filter(crate::schema::matches::dsl::id.eq(match_id))
            .select(crate::models::Match::as_select())
            .load(conn)
            .await?;

        if !found.is_empty() {
            remove_match(conn, match_id).await?;
            return Ok(RemoveOutcome::Removed);
        }
    }

    tracing::info!("not found");
    Ok(RemoveOutcome::NotFound)
}

/// Removing a match's last file takes the whole match with it; removing one
/// file of a multi-file match only drops that row. `sibling_files` counts
/// the match's file rows including the one being removed.
pub fn cascades_to_match(sibling_files: i64) -> bool {
    sibling_files <= 1
}

async fn remove_match(
    conn: &mut diesel_async::AsyncPgConnection,
    match_id: i32,
) -> Result<(), ApiError> {
    diesel::dsl::delete(
        crate::schema::files::dsl::files.filter(crate::schema::files::dsl::match_id.eq(match_id)),
    )
    .execute(conn)
    .await?;

    diesel::dsl::delete(
        crate::schema::timeseries::dsl::timeseries
            .filter(crate::schema::timeseries::dsl::match_id.eq(match_id)),
    )
    .execute(conn)
    .await?;
    diesel::dsl::delete(
        crate::schema::market::dsl::market
            .filter(crate::schema::market::dsl::match_id.eq(match_id)),
    )
    .execute(conn)
    .await?;
    diesel::dsl::delete(
        crate::schema::research::dsl::research
            .filter(crate::schema::research::dsl::match_id.eq(match_id)),
    )
    .execute(conn)
    .await?;
    diesel::dsl::delete(
        crate::schema::object_instances::dsl::object_instances
            .filter(crate::schema::object_instances::dsl::match_id.eq(match_id)),
    )
    .execute(conn)
    .await?;
    diesel::dsl::delete(
        crate::schema::object_instance_states::dsl::object_instance_states
            .filter(crate::schema::object_instance_states::dsl::match_id.eq(match_id)),
    )
    .execute(conn)
    .await?;
    diesel::dsl::delete(
        crate::schema::tribute::dsl::tribute
            .filter(crate::schema::tribute::dsl::match_id.eq(match_id)),
    )
    .execute(conn)
    .await?;
    diesel::dsl::delete(
        crate::schema::transactions::dsl::transactions
            .filter(crate::schema::transactions::dsl::match_id.eq(match_id)),
    )
    .execute(conn)
    .await?;
    diesel::dsl::delete(
        crate::schema::action_log::dsl::action_log
            .filter(crate::schema::action_log::dsl::match_id.eq(match_id)),
    )
    .execute(conn)
    .await?;

    diesel::dsl::delete(
        crate::schema::teams::dsl::teams.filter(crate::schema::teams::dsl::match_id.eq(match_id)),
    )
    .execute(conn)
    .await?;
    diesel::dsl::delete(
        crate::schema::players::dsl::players
            .filter(crate::schema::players::dsl::match_id.eq(match_id)),
    )
    .execute(conn)
    .await?;

    diesel::dsl::delete(
        crate::schema::matches::dsl::matches.filter(crate::schema::matches::dsl::id.eq(match_id)),
    )
    .execute(conn)
    .await?;

    Ok(())
}

/// Played-timestamp fallback chain: explicit argument, platform/summary
/// metadata, the fixed filename pattern, then the file modification time.
pub fn resolve_played(
    explicit: Option<chrono::DateTime<chrono::Utc>>,
    from_summary: Option<chrono::DateTime<chrono::Utc>>,
    original_filename: &str,
    modified: Option<chrono::DateTime<chrono::Utc>>,
) -> Option<chrono::DateTime<chrono::Utc>> {
    explicit
        .or(from_summary)
        .or_else(|| filename::parse_filename_timestamp(original_filename))
        .or(modified)
}

pub fn is_rec(name: &str) -> bool {
    name.ends_with(filename::REC_EXT)
}

fn archive_basename(path: &std::path::Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq)]
pub struct StagedMember {
    pub name: String,
    pub path: std::path::PathBuf,
    pub modified: Option<chrono::DateTime<chrono::Utc>>,
}

/// Extract every non-directory member into `dest`, returning them in
/// lexicographic name order. Each member keeps its archive modification
/// time so the timestamp fallback stays correct for staged copies.
pub fn stage_archive<R>(
    archive: &mut zip::ZipArchive<R>,
    dest: &std::path::Path,
) -> Result<Vec<StagedMember>, ApiError>
where
    R: std::io::Read + std::io::Seek,
{
    let mut members = Vec::new();

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        if entry.is_dir() {
            continue;
        }

        let name = entry.name().to_owned();
        let relative = match entry.enclosed_name() {
            Some(p) => p.to_owned(),
            None => {
                tracing::warn!("skipping member with unsafe path {:?}", name);
                continue;
            }
        };
        let path = dest.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut staged = std::fs::File::create(&path)?;
        std::io::copy(&mut entry, &mut staged)?;

        members.push(StagedMember {
            name,
            path,
            modified: archive_datetime(entry.last_modified()),
        });
    }

    members.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(members)
}

fn archive_datetime(value: zip::DateTime) -> Option<chrono::DateTime<chrono::Utc>> {
    let date = chrono::NaiveDate::from_ymd_opt(
        value.year() as i32,
        value.month() as u32,
        value.day() as u32,
    )?;
    let time = chrono::NaiveTime::from_hms_opt(
        value.hour() as u32,
        value.minute() as u32,
        value.second() as u32,
    )?;
    Some(date.and_time(time).and_utc())
}
