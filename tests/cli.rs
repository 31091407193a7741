use assert_cmd::Command;
use std::path::PathBuf;
use std::str;

/// Generic execution function that invokes geofeedcheck with a path to
/// the test copy of the ISO 3166-2 reference dataset
fn run_geofeedcheck(input: &str, args: &[&str]) -> (String, String, bool) {
    let mut reference = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    reference.push("tests/data/ISO3166-2.CSV");

    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("geofeedcheck").unwrap();
    let output = cmd
        .env("GEOFEED_ISO3166_2", reference.as_os_str())
        .args(args)
        .write_stdin(input)
        .output()
        .expect("failed to execute");

    let stdout = str::from_utf8(&output.stdout)
        .expect("Failed to read stdout as UTF-8")
        .to_string();
    let stderr = str::from_utf8(&output.stderr)
        .expect("Failed to read stderr as UTF-8")
        .to_string();

    (stdout, stderr, output.status.success())
}

/// A fully valid record produces no output
#[test]
fn valid_record_is_silent() {
    let input = "192.0.2.0/24,US,CA,Los Angeles,90001\n";

    let (stdout, _, success) = run_geofeedcheck(input, &[]);

    assert_eq!(stdout, "");
    assert!(success);
}

/// Unknown region for a known country
#[test]
fn wrong_region_code() {
    let input = "198.51.100.0/24,US,XYZ,\"Fake City\",12345\n";
    let expected_output = "Wrong region code: 198.51.100.0/24,US,XYZ,Fake City,12345\n";

    let (stdout, _, success) = run_geofeedcheck(input, &[]);

    assert_eq!(stdout, expected_output);
    assert!(success);
}

/// Unknown country code, with empty trailing fields
#[test]
fn wrong_country_code() {
    let input = "10.0.0.0/8,XX,,,\"\"\n";
    let expected_output = "Wrong country code: 10.0.0.0/8,XX,,,\n";

    let (stdout, _, success) = run_geofeedcheck(input, &[]);

    assert_eq!(stdout, expected_output);
    assert!(success);
}

/// Syntactically invalid prefix
#[test]
fn invalid_prefix() {
    let input = "999.999.999.999/99,US,CA,,\"\"\n";
    let expected_output = "Invalid prefix: 999.999.999.999/99,US,CA,,\n";

    let (stdout, _, success) = run_geofeedcheck(input, &[]);

    assert_eq!(stdout, expected_output);
    assert!(success);
}

/// IPv6 prefixes with `::` compression are accepted
#[test]
fn valid_ipv6_prefix() {
    let input = "2001:db8::/32,SE,AB,Stockholm,\n";

    let (stdout, _, success) = run_geofeedcheck(input, &[]);

    assert_eq!(stdout, "");
    assert!(success);
}

/// IPv6 prefix length beyond 128 is rejected
#[test]
fn ipv6_prefix_length_out_of_range() {
    let input = "2001:db8::/129,SE,AB,Stockholm,\n";
    let expected_output = "Invalid prefix: 2001:db8::/129,SE,AB,Stockholm,\n";

    let (stdout, _, success) = run_geofeedcheck(input, &[]);

    assert_eq!(stdout, expected_output);
    assert!(success);
}

/// A bad prefix on a record with a bad country reports only the prefix
#[test]
fn prefix_error_short_circuits() {
    let input = "300.0.0.0/8,XX,ZZ,,\n";
    let expected_output = "Invalid prefix: 300.0.0.0/8,XX,ZZ,,\n";

    let (stdout, _, _) = run_geofeedcheck(input, &[]);

    assert_eq!(stdout, expected_output);
}

/// An unknown country with a bad region reports only the country
#[test]
fn country_error_short_circuits_region() {
    let input = "192.0.2.0/24,XX,ZZ,,\n";
    let expected_output = "Wrong country code: 192.0.2.0/24,XX,ZZ,,\n";

    let (stdout, _, _) = run_geofeedcheck(input, &[]);

    assert_eq!(stdout, expected_output);
}

/// Lines with the wrong field count are classified, not fatal
#[test]
fn malformed_record_continues_processing() {
    let input = "\
192.0.2.0/24,US,CA
198.51.100.0/24,US,TX,Austin,73301
";
    let expected_output = "Malformed record: 192.0.2.0/24,US,CA\n";

    let (stdout, _, success) = run_geofeedcheck(input, &[]);

    assert_eq!(stdout, expected_output);
    assert!(success);
}

/// Comment and blank lines are skipped without diagnostics
#[test]
fn comments_and_blank_lines_are_skipped() {
    let input = "\
# my geofeed
192.0.2.0/24,US,CA,Los Angeles,90001

# trailing comment
";

    let (stdout, _, success) = run_geofeedcheck(input, &[]);

    assert_eq!(stdout, "");
    assert!(success);
}

/// Mixed input: diagnostics come out in input order
#[test]
fn output_preserves_input_order() {
    let input = "\
999.999.999.999/99,US,CA,,
192.0.2.0/24,US,CA,Los Angeles,90001
10.0.0.0/8,XX,,,
198.51.100.0/24,US,XYZ,,
";
    let expected_output = "\
Invalid prefix: 999.999.999.999/99,US,CA,,
Wrong country code: 10.0.0.0/8,XX,,,
Wrong region code: 198.51.100.0/24,US,XYZ,,
";

    let (stdout, _, _) = run_geofeedcheck(input, &[]);

    assert_eq!(stdout, expected_output);
}

/// Same input, same table, same output
#[test]
fn validation_is_idempotent() {
    let input = "\
192.0.2.0/24,US,CA,Los Angeles,90001
10.0.0.0/8,XX,,,
2001:db8::/129,SE,AB,,
";

    let (first, _, _) = run_geofeedcheck(input, &[]);
    let (second, _, _) = run_geofeedcheck(input, &[]);

    assert_eq!(first, second);
}

/// --json emits one object per diagnostic
#[test]
fn json_output() {
    let input = "10.0.0.0/8,XX,,,\"\"\n";
    let expected_output = "{\"error\":\"wrong_country_code\",\"record\":\"10.0.0.0/8,XX,,,\"}\n";

    let (stdout, _, success) = run_geofeedcheck(input, &["--json"]);

    assert_eq!(stdout, expected_output);
    assert!(success);
}

/// Without --strict the exit status is zero even when records fail
#[test]
fn default_exit_status_ignores_record_failures() {
    let input = "10.0.0.0/8,XX,,,\n";

    let (_, _, success) = run_geofeedcheck(input, &[]);

    assert!(success);
}

/// --strict flips the exit status when any record failed
#[test]
fn strict_exit_status_on_failure() {
    let input = "10.0.0.0/8,XX,,,\n";

    let (_, _, success) = run_geofeedcheck(input, &["--strict"]);

    assert!(!success);
}

/// --strict still exits zero when everything validates
#[test]
fn strict_exit_status_on_success() {
    let input = "192.0.2.0/24,US,CA,Los Angeles,90001\n";

    let (_, _, success) = run_geofeedcheck(input, &["--strict"]);

    assert!(success);
}

/// Missing reference dataset is fatal with a diagnostic on stderr
#[test]
fn missing_reference_is_fatal() {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("geofeedcheck").unwrap();
    let output = cmd
        .args(["--reference", "/nonexistent/ISO3166-2.CSV"])
        .write_stdin("192.0.2.0/24,US,CA,Los Angeles,90001\n")
        .output()
        .expect("failed to execute");

    assert!(!output.status.success());
    let stderr = str::from_utf8(&output.stderr).unwrap();
    assert!(
        stderr.contains("reference dataset"),
        "stderr should name the reference dataset: '{}'",
        stderr
    );
}

/// Quoted city names with embedded commas stay one field
#[test]
fn quoted_city_with_comma() {
    let input = "192.0.2.0/24,US,CA,\"Los Angeles, CA\",90001\n";

    let (stdout, _, success) = run_geofeedcheck(input, &[]);

    assert_eq!(stdout, "");
    assert!(success);
}

/// Reading a geofeed from a file argument instead of stdin
#[test]
fn reads_from_file_argument() {
    use std::io::Write;

    let mut feed = tempfile::NamedTempFile::new().unwrap();
    writeln!(feed, "10.0.0.0/8,XX,,,").unwrap();
    feed.flush().unwrap();

    let mut reference = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    reference.push("tests/data/ISO3166-2.CSV");

    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("geofeedcheck").unwrap();
    let output = cmd
        .env("GEOFEED_ISO3166_2", reference.as_os_str())
        .arg(feed.path())
        .output()
        .expect("failed to execute");

    let stdout = str::from_utf8(&output.stdout).unwrap();
    assert_eq!(stdout, "Wrong country code: 10.0.0.0/8,XX,,,\n");
}
