use std::path::PathBuf;
use ticketmap_render::import::read_drawio_file;
use ticketmap_render::org::OrgChart;

fn org_fixture() -> OrgChart {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("org")
        .join("org_chart.drawio");
    let doc = read_drawio_file(&path).expect("fixture");
    OrgChart::from_document(&doc)
}

#[test]
fn org_chart_recovers_people_and_managers() {
    let chart = org_fixture();
    assert_eq!(chart.node_count, 5);
    assert_eq!(chart.edge_count, 5);

    let names: Vec<(&str, &str)> = chart
        .people
        .iter()
        .map(|p| (p.name.as_str(), p.title.as_str()))
        .collect();
    assert_eq!(
        names,
        vec![
            ("Jane Doe", "VP Engineering"),
            ("John Smith", "Firmware Manager"),
            ("Ann Lee", "QA Lead"),
            ("Bob Ray", "Firmware Engineer"),
            ("Cy Noor", "Test Engineer"),
        ]
    );

    assert_eq!(chart.root_ids, vec!["ceo"]);
    assert_eq!(chart.direct_reports("ceo"), ["fw", "qa"]);
    let bob = chart.people.iter().find(|p| p.id == "eng1").expect("eng1");
    assert_eq!(bob.manager_name.as_deref(), Some("John Smith"));
}

#[test]
fn sub_teams_are_listed_before_their_parent_team() {
    let chart = org_fixture();
    let teams: Vec<(&str, usize, usize)> = chart
        .teams
        .iter()
        .map(|t| (t.lead.as_str(), t.depth, t.members.len()))
        .collect();
    assert_eq!(
        teams,
        vec![("John Smith", 1, 1), ("Ann Lee", 1, 1), ("Jane Doe", 0, 0)]
    );
    assert_eq!(chart.teams[0].members[0].name, "Bob Ray");
}

#[test]
fn responsibilities_group_people_by_area() {
    let resp = org_fixture().responsibilities();

    let jane = &resp.by_person["Jane Doe"];
    assert!(jane.is_lead);
    assert_eq!(jane.direct_reports, 2);
    assert_eq!(jane.areas, vec!["General"]);
    assert_eq!(jane.manager, "");
    assert_eq!(resp.by_person["Cy Noor"].manager, "Ann Lee");

    let firmware: Vec<&str> = resp.by_area["Firmware"]
        .iter()
        .map(|o| o.name.as_str())
        .collect();
    assert_eq!(firmware, vec!["John Smith", "Bob Ray"]);
    assert_eq!(resp.by_area["Testing"][0].name, "Cy Noor");
    assert!(resp.by_area["QA"][0].is_lead);

    let leads: Vec<(&str, usize)> = resp
        .team_leads
        .iter()
        .map(|l| (l.name.as_str(), l.team_size))
        .collect();
    assert_eq!(
        leads,
        vec![("Jane Doe", 2), ("John Smith", 1), ("Ann Lee", 1)]
    );
}

#[test]
fn cyclic_reporting_lines_terminate() {
    let xml = r#"<mxGraphModel><root>
        <mxCell id="0"/><mxCell id="1" parent="0"/>
        <mxCell id="a" value="A - Lead" vertex="1" parent="1"/>
        <mxCell id="b" value="B - Lead" vertex="1" parent="1"/>
        <mxCell id="r" value="Root - Director" vertex="1" parent="1"/>
        <mxCell id="e0" edge="1" parent="1" source="r" target="a"/>
        <mxCell id="e1" edge="1" parent="1" source="a" target="b"/>
        <mxCell id="e2" edge="1" parent="1" source="b" target="a"/>
    </root></mxGraphModel>"#;
    let doc = ticketmap_render::import::parse_drawio(xml).expect("parse");
    let chart = OrgChart::from_document(&doc);

    assert_eq!(chart.root_ids, vec!["r"]);
    let leads: Vec<&str> = chart.teams.iter().map(|t| t.lead.as_str()).collect();
    assert_eq!(leads, vec!["B", "A", "Root"]);
}

#[test]
fn responsibilities_serialize_as_json() {
    let resp = org_fixture().responsibilities();
    let json = serde_json::to_value(&resp).expect("json");
    assert_eq!(json["by_person"]["Bob Ray"]["areas"], serde_json::json!(["Firmware"]));
    assert_eq!(json["team_leads"].as_array().map(Vec::len), Some(3));
}

#[test]
fn compressed_org_chart_matches_the_inline_one() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("org")
        .join("org_chart_compressed.drawio");
    let doc = read_drawio_file(&path).expect("fixture");
    assert!(doc.skipped_pages.is_empty());

    let chart = OrgChart::from_document(&doc);
    let inline = org_fixture();
    assert_eq!(chart.people, inline.people);
    assert_eq!(chart.root_ids, inline.root_ids);
    assert_eq!(chart.teams.len(), 3);
}
