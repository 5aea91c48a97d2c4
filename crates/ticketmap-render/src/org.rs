//! Org chart extraction from draw.io documents.
//!
//! Boxes are people, connectors run from a manager to a direct report.

use crate::import::DrawioDocument;
use indexmap::{IndexMap, IndexSet};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

const GENERAL_AREA: &str = "General";

// Scanned in order; several keywords may map to the same area.
static AREA_KEYWORDS: &[(&str, &str)] = &[
    ("software", "Software"),
    ("hardware", "Hardware"),
    ("firmware", "Firmware"),
    ("driver", "Drivers"),
    ("kernel", "Kernel"),
    ("network", "Networking"),
    ("fabric", "Fabric"),
    ("asic", "ASIC"),
    ("fpga", "FPGA"),
    ("test", "Testing"),
    ("qa", "QA"),
    ("quality", "QA"),
    ("devops", "DevOps"),
    ("infrastructure", "Infrastructure"),
    ("security", "Security"),
    ("performance", "Performance"),
    ("documentation", "Documentation"),
    ("support", "Support"),
    ("management", "Management"),
    ("architecture", "Architecture"),
    ("design", "Design"),
    ("verification", "Verification"),
    ("validation", "Validation"),
];

fn parenthesized_title_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(.+?)\s*\((.+?)\)\s*$").expect("valid regex"))
}

/// Splits box text into `(name, title)`.
///
/// Tries a line break, then ` - `, then a trailing `(Title)`; otherwise the whole text is the name.
pub fn split_name_title(text: &str) -> (String, String) {
    let text = text.trim();
    if text.is_empty() {
        return (String::new(), String::new());
    }
    if let Some((name, title)) = text.split_once('\n') {
        return (name.trim().to_string(), title.trim().to_string());
    }
    if let Some((name, title)) = text.split_once(" - ") {
        return (name.trim().to_string(), title.trim().to_string());
    }
    if let Some(caps) = parenthesized_title_regex().captures(text) {
        return (caps[1].trim().to_string(), caps[2].trim().to_string());
    }
    (text.to_string(), String::new())
}

/// Areas of responsibility implied by a job title, without duplicates.
pub fn areas_for_title(title: &str) -> Vec<&'static str> {
    if title.trim().is_empty() {
        return Vec::new();
    }
    let lower = title.to_lowercase();
    let areas: IndexSet<&'static str> = AREA_KEYWORDS
        .iter()
        .filter(|(keyword, _)| lower.contains(keyword))
        .map(|(_, area)| *area)
        .collect();
    if areas.is_empty() {
        vec![GENERAL_AREA]
    } else {
        areas.into_iter().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamMember {
    pub name: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Team {
    pub lead: String,
    pub title: String,
    pub depth: usize,
    pub members: Vec<TeamMember>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrgChart {
    pub people: Vec<Person>,
    /// Manager id to direct report ids, in connector order.
    pub hierarchy: IndexMap<String, Vec<String>>,
    pub root_ids: Vec<String>,
    pub teams: Vec<Team>,
    pub node_count: usize,
    pub edge_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonAreas {
    pub title: String,
    pub areas: Vec<String>,
    pub is_lead: bool,
    pub manager: String,
    pub direct_reports: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AreaOwner {
    pub name: String,
    pub title: String,
    pub is_lead: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamLead {
    pub name: String,
    pub title: String,
    pub team_size: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Responsibilities {
    pub by_person: IndexMap<String, PersonAreas>,
    pub by_area: IndexMap<String, Vec<AreaOwner>>,
    pub team_leads: Vec<TeamLead>,
}

impl OrgChart {
    pub fn from_document(doc: &DrawioDocument) -> Self {
        let mut people: IndexMap<String, Person> = IndexMap::new();
        for node in &doc.nodes {
            let (name, title) = split_name_title(&node.text());
            people.insert(
                node.id.clone(),
                Person {
                    id: node.id.clone(),
                    name,
                    title,
                    manager_id: None,
                    manager_name: None,
                },
            );
        }

        let mut hierarchy: IndexMap<String, Vec<String>> = IndexMap::new();
        for edge in &doc.edges {
            if !people.contains_key(&edge.source) || !people.contains_key(&edge.target) {
                continue;
            }
            hierarchy
                .entry(edge.source.clone())
                .or_default()
                .push(edge.target.clone());

            let manager_name = people[&edge.source].name.clone();
            if let Some(report) = people.get_mut(&edge.target) {
                report.manager_id = Some(edge.source.clone());
                report.manager_name = Some(manager_name);
            }
        }

        let root_ids: Vec<String> = people
            .values()
            .filter(|p| p.manager_id.is_none())
            .map(|p| p.id.clone())
            .collect();

        let mut teams = Vec::new();
        let mut visited = IndexSet::new();
        for root in &root_ids {
            let team = build_team(root, 0, &people, &hierarchy, &mut visited, &mut teams);
            teams.push(team);
        }

        tracing::info!(
            nodes = people.len(),
            edges = doc.edges.len(),
            teams = teams.len(),
            "parsed org chart"
        );

        Self {
            node_count: people.len(),
            people: people.into_values().collect(),
            hierarchy,
            root_ids,
            teams,
            edge_count: doc.edges.len(),
        }
    }

    pub fn direct_reports(&self, id: &str) -> &[String] {
        self.hierarchy.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Who owns which areas, inferred from titles.
    pub fn responsibilities(&self) -> Responsibilities {
        let mut out = Responsibilities::default();

        for person in self.people.iter().filter(|p| !p.name.is_empty()) {
            let reports = self.direct_reports(&person.id).len();
            let is_lead = reports > 0;
            let areas: Vec<String> = areas_for_title(&person.title)
                .into_iter()
                .map(str::to_string)
                .collect();

            for area in &areas {
                out.by_area.entry(area.clone()).or_default().push(AreaOwner {
                    name: person.name.clone(),
                    title: person.title.clone(),
                    is_lead,
                });
            }
            if is_lead {
                out.team_leads.push(TeamLead {
                    name: person.name.clone(),
                    title: person.title.clone(),
                    team_size: reports,
                });
            }
            out.by_person.insert(
                person.name.clone(),
                PersonAreas {
                    title: person.title.clone(),
                    areas,
                    is_lead,
                    manager: person.manager_name.clone().unwrap_or_default(),
                    direct_reports: reports,
                },
            );
        }
        out
    }
}

/// Depth-first team walk. Reports who lead their own team are pushed to `teams` as they are
/// finished, before the team being built here.
fn build_team(
    id: &str,
    depth: usize,
    people: &IndexMap<String, Person>,
    hierarchy: &IndexMap<String, Vec<String>>,
    visited: &mut IndexSet<String>,
    teams: &mut Vec<Team>,
) -> Team {
    visited.insert(id.to_string());
    let (lead, title) = people
        .get(id)
        .map(|p| (p.name.clone(), p.title.clone()))
        .unwrap_or_default();
    let mut team = Team {
        lead,
        title,
        depth,
        members: Vec::new(),
    };

    for child in hierarchy.get(id).into_iter().flatten() {
        if hierarchy.contains_key(child) {
            if visited.contains(child) {
                continue;
            }
            let sub_team = build_team(child, depth + 1, people, hierarchy, visited, teams);
            teams.push(sub_team);
        } else if let Some(p) = people.get(child) {
            team.members.push(TeamMember {
                name: p.name.clone(),
                title: p.title.clone(),
            });
        }
    }
    team
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_name_title_formats() {
        assert_eq!(
            split_name_title("Jane Doe\nVP Engineering"),
            ("Jane Doe".to_string(), "VP Engineering".to_string())
        );
        assert_eq!(
            split_name_title("John Smith - Firmware Lead"),
            ("John Smith".to_string(), "Firmware Lead".to_string())
        );
        assert_eq!(
            split_name_title("Ann Lee (QA Manager)"),
            ("Ann Lee".to_string(), "QA Manager".to_string())
        );
        assert_eq!(
            split_name_title("Solo"),
            ("Solo".to_string(), String::new())
        );
        assert_eq!(split_name_title("  "), (String::new(), String::new()));
    }

    #[test]
    fn areas_for_title_dedups_and_defaults() {
        assert_eq!(areas_for_title("Quality QA Lead"), vec!["QA"]);
        assert_eq!(
            areas_for_title("Senior Software Test Engineer"),
            vec!["Software", "Testing"]
        );
        assert_eq!(areas_for_title("Chief of Staff"), vec!["General"]);
        assert!(areas_for_title("").is_empty());
    }
}
