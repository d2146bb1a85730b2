use pretty_assertions::assert_eq;

use std::io::Write;

fn dt(s: &str) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::parse_from_rfc3339(s).unwrap().to_utc()
}

#[test]
fn played_prefers_explicit_timestamp() {
    let resolved = backend::api::resolve_played(
        Some(dt("2020-05-01T12:00:00Z")),
        Some(dt("2020-05-02T12:00:00Z")),
        "rec.20200503-120000.mgz",
        Some(dt("2020-05-04T12:00:00Z")),
    );

    assert_eq!(Some(dt("2020-05-01T12:00:00Z")), resolved);
}

#[test]
fn played_falls_back_to_summary_then_filename() {
    let resolved = backend::api::resolve_played(
        None,
        Some(dt("2020-05-02T12:00:00Z")),
        "rec.20200503-120000.mgz",
        Some(dt("2020-05-04T12:00:00Z")),
    );
    assert_eq!(Some(dt("2020-05-02T12:00:00Z")), resolved);

    let resolved = backend::api::resolve_played(
        None,
        None,
        "rec.20200503-120000.mgz",
        Some(dt("2020-05-04T12:00:00Z")),
    );
    assert_eq!(Some(dt("2020-05-03T12:00:00Z")), resolved);
}

#[test]
fn played_falls_back_to_modification_time() {
    let resolved = backend::api::resolve_played(
        None,
        None,
        "some-random-name.mgz",
        Some(dt("2020-05-04T12:00:00Z")),
    );
    assert_eq!(Some(dt("2020-05-04T12:00:00Z")), resolved);

    assert_eq!(
        None,
        backend::api::resolve_played(None, None, "some-random-name.mgz", None)
    );
}

#[test]
fn rec_members_by_extension() {
    assert!(backend::api::is_rec("rec.20200503-120000.mgz"));
    assert!(backend::api::is_rec("nested/game2.mgz"));
    assert!(!backend::api::is_rec("notes.txt"));
    assert!(!backend::api::is_rec("rec.20200503-120000.mgz.bak"));
}

#[test]
fn removing_the_last_file_cascades_to_the_match() {
    assert!(backend::api::cascades_to_match(1));
}

#[test]
fn removing_one_file_of_many_leaves_the_match() {
    assert!(!backend::api::cascades_to_match(2));
    assert!(!backend::api::cascades_to_match(5));
}

fn build_archive(dir: &std::path::Path) -> std::path::PathBuf {
    let path = dir.join("series.zip");
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::FileOptions::default();

    writer.start_file("b.mgz", options).unwrap();
    writer.write_all(b"second game").unwrap();

    writer
        .start_file(
            "a.mgz",
            options.last_modified_time(
                zip::DateTime::from_date_and_time(2020, 5, 3, 12, 0, 0).unwrap(),
            ),
        )
        .unwrap();
    writer.write_all(b"first game").unwrap();

    writer.add_directory("maps/", options).unwrap();

    writer.start_file("maps/notes.txt", options).unwrap();
    writer.write_all(b"not a rec").unwrap();

    writer.finish().unwrap();
    path
}

#[test]
fn staging_orders_members_and_skips_directories() {
    let dir = tempfile::tempdir().unwrap();
    let archive_path = build_archive(dir.path());

    let file = std::fs::File::open(&archive_path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();

    let dest = dir.path().join("staged");
    std::fs::create_dir_all(&dest).unwrap();
    let members = backend::api::stage_archive(&mut archive, &dest).unwrap();

    assert_eq!(
        vec!["a.mgz", "b.mgz", "maps/notes.txt"],
        members.iter().map(|m| m.name.as_str()).collect::<Vec<_>>()
    );
    for member in &members {
        assert!(member.path.exists(), "missing staged copy {:?}", member.path);
    }

    assert_eq!(
        b"first game".as_slice(),
        std::fs::read(&members[0].path).unwrap().as_slice()
    );
    assert_eq!(Some(dt("2020-05-03T12:00:00Z")), members[0].modified);
}

#[test]
fn staging_then_filtering_keeps_only_recs() {
    let dir = tempfile::tempdir().unwrap();
    let archive_path = build_archive(dir.path());

    let file = std::fs::File::open(&archive_path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();

    let dest = dir.path().join("staged");
    std::fs::create_dir_all(&dest).unwrap();
    let members = backend::api::stage_archive(&mut archive, &dest).unwrap();

    let recs = members
        .into_iter()
        .filter(|m| backend::api::is_rec(&m.name))
        .map(|m| m.name)
        .collect::<Vec<_>>();
    assert_eq!(vec!["a.mgz", "b.mgz"], recs);
}
