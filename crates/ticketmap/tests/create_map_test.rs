#![cfg(feature = "render")]

use std::fs;
use std::path::{Path, PathBuf};
use ticketmap::render::{MapOutcome, MapRequest, create_diagram_from_tickets, create_map};
use ticketmap::{Reporter, SiteConfig, TicketRecord};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("tickets")
        .join(name)
}

fn copy_fixture(name: &str, dir: &Path) -> PathBuf {
    let dest = dir.join(name);
    fs::copy(fixture(name), &dest).expect("copy fixture");
    dest
}

#[test]
fn create_map_writes_next_to_the_input() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = copy_fixture("hierarchy.csv", tmp.path());

    let mut reporter = Reporter::new(Vec::new(), false);
    let outcome = create_map(&MapRequest::new(&input), &SiteConfig::default(), &mut reporter)
        .expect("create map");

    let expected = tmp.path().join("hierarchy.drawio");
    assert_eq!(
        outcome,
        MapOutcome::Written {
            output: expected.clone(),
            tickets: 5,
            title: "Dependency Map: STL-100".to_string(),
        }
    );
    let xml = fs::read_to_string(&expected).expect("read output");
    let doc = roxmltree::Document::parse(&xml).expect("well-formed xml");
    let name = doc
        .descendants()
        .find(|n| n.has_tag_name("diagram"))
        .and_then(|n| n.attribute("name"));
    assert_eq!(name, Some("Dependency Map: STL-100"));

    let printed = String::from_utf8(reporter.into_inner()).expect("utf8");
    assert!(printed.contains("Draw.io Diagram Created Successfully"));
    assert!(printed.contains("Tickets:     5"));
}

#[test]
fn create_map_honours_explicit_output_and_title() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = copy_fixture("depth_only.csv", tmp.path());
    let output = tmp.path().join("custom.drawio");

    let request = MapRequest::new(&input)
        .with_output(&output)
        .with_title("Release Dependencies")
        .with_modified(chrono::NaiveDate::from_ymd_opt(2026, 5, 4).expect("date"));
    let mut reporter = Reporter::new(Vec::new(), true);
    let outcome = create_map(&request, &SiteConfig::default(), &mut reporter).expect("create map");

    assert!(matches!(outcome, MapOutcome::Written { tickets: 3, .. }));
    let xml = fs::read_to_string(&output).expect("read output");
    assert!(xml.contains(r#"<diagram name="Release Dependencies""#));
    assert!(!tmp.path().join("depth_only.drawio").exists());
    assert!(reporter.into_inner().is_empty());
}

#[test]
fn create_map_retries_with_csv_extension() {
    let tmp = tempfile::tempdir().expect("tempdir");
    copy_fixture("depth_only.csv", tmp.path());
    let bare = tmp.path().join("depth_only");

    let mut reporter = Reporter::new(Vec::new(), true);
    let outcome =
        create_map(&MapRequest::new(&bare), &SiteConfig::default(), &mut reporter).expect("create");

    // The default output follows the path as given.
    let MapOutcome::Written { output, .. } = outcome else {
        panic!("expected a written map");
    };
    assert_eq!(output, tmp.path().join("depth_only.drawio"));
    assert!(output.exists());
}

#[test]
fn header_only_input_reports_no_tickets() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("empty.csv");
    fs::write(&input, "key,depth,summary\n").expect("write csv");

    let mut reporter = Reporter::new(Vec::new(), false);
    let outcome = create_map(&MapRequest::new(&input), &SiteConfig::default(), &mut reporter)
        .expect("create map");

    assert_eq!(outcome, MapOutcome::NoTickets);
    assert!(!tmp.path().join("empty.drawio").exists());
    let printed = String::from_utf8(reporter.into_inner()).expect("utf8");
    assert_eq!(printed, "ERROR: No tickets found in input file.\n");
}

#[test]
fn missing_depth_column_is_an_input_error() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let input = tmp.path().join("bad.csv");
    fs::write(&input, "key,summary\nSTL-1,Root\n").expect("write csv");

    let mut reporter = Reporter::new(Vec::new(), true);
    let err = create_map(&MapRequest::new(&input), &SiteConfig::default(), &mut reporter)
        .unwrap_err();
    assert!(err.is_input_error());
    assert!(err.to_string().contains(r#"must have a "depth" column"#), "{err}");
    assert!(!tmp.path().join("bad.drawio").exists());
}

#[test]
fn diagram_from_tickets_uses_the_site_url() {
    let site = SiteConfig::default().with_jira_url("https://jira.example.com/");
    let records = vec![TicketRecord::new("X-1", 0).with_summary("Root")];
    let xml = create_diagram_from_tickets(&records, "Map", &site).expect("render");
    assert!(xml.contains("https://jira.example.com/browse/X-1"));
}
