use extract::filename::{parse_filename_timestamp, parse_series_path, SeriesId};
use pretty_assertions::assert_eq;

#[test]
fn series_with_numeric_prefix() {
    let (name, id) = parse_series_path(std::path::Path::new("12345-coolseries.zip"));

    assert_eq!(name, "coolseries");
    assert_eq!(id, Some(SeriesId::Numeric(12345)));
}

#[test]
fn series_with_manual_span() {
    let (name, id) = parse_series_path(std::path::Path::new("finals-3-7-game1.mgz"));

    assert_eq!(name, "game1.mgz");
    assert_eq!(id, Some(SeriesId::Tag("finals-3-7".to_owned())));
}

#[test]
fn series_without_id() {
    let (name, id) = parse_series_path(std::path::Path::new("showmatch.zip"));

    assert_eq!(name, "showmatch");
    assert_eq!(id, None);
}

#[test]
fn series_ignores_leading_directories() {
    let (name, id) = parse_series_path(std::path::Path::new("/tmp/downloads/777-qualifier.zip"));

    assert_eq!(name, "qualifier");
    assert_eq!(id, Some(SeriesId::Numeric(777)));
}

#[test]
fn timestamp_from_default_rec_name() {
    let result = parse_filename_timestamp("rec.20200101-153000.mgz");

    let expected = chrono::NaiveDate::from_ymd_opt(2020, 1, 1)
        .unwrap()
        .and_hms_opt(15, 30, 0)
        .unwrap()
        .and_utc();
    assert_eq!(result, Some(expected));
}

#[test]
fn timestamp_rejects_other_shapes() {
    assert_eq!(parse_filename_timestamp("rec.20200101-153000.zip"), None);
    assert_eq!(parse_filename_timestamp("match.20200101-153000.mgz"), None);
    // Right prefix and suffix but one digit short.
    assert_eq!(parse_filename_timestamp("rec.2020011-153000.mgz"), None);
    assert_eq!(parse_filename_timestamp(""), None);
}

#[test]
fn timestamp_rejects_multibyte_names() {
    // 23 bytes with a two-byte char straddling a digit-group boundary;
    // archive member names are untrusted input.
    assert_eq!(parse_filename_timestamp("rec.abcé0123456789.mgz"), None);
    assert_eq!(parse_filename_timestamp("rec.é0200101-153000.mgz"), None);
}
