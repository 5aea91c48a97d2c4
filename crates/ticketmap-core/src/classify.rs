//! Relationship and status classification.
//!
//! Colors are 6-digit hex codes without a leading `#`. Relationship lookups are exact after
//! trimming and ASCII case folding; status lookups are substring matches in table order.

/// Stroke color for unknown or missing relationship labels.
pub const DEFAULT_LINK_COLOR: &str = "666666";
/// Fill color for non-root boxes with an unknown or missing relationship label.
pub const DEFAULT_BOX_FILL: &str = "FFFFFF";
/// Fill color of every depth-0 box.
pub const ROOT_BOX_FILL: &str = "E6FFE6";
/// Badge used when a status is empty or matches no keyword group.
pub const DEFAULT_STATUS_BADGE: &str = "\u{26AA}";

pub const BLOCKED_RED: &str = "FF0000";
pub const CLONE_ORANGE: &str = "FFA500";
pub const DUPLICATE_GRAY: &str = "808080";
pub const RELATED_BLUE: &str = "0000FF";
pub const CAUSE_YELLOW: &str = "FFCC00";
pub const CHILD_GREEN: &str = "00AA00";

static LINK_COLORS: &[(&str, &str)] = &[
    ("is blocked by", BLOCKED_RED),
    ("blocks", BLOCKED_RED),
    ("is cloned by", CLONE_ORANGE),
    ("clones", CLONE_ORANGE),
    ("is duplicated by", DUPLICATE_GRAY),
    ("duplicates", DUPLICATE_GRAY),
    ("relates to", RELATED_BLUE),
    ("is related to", RELATED_BLUE),
    ("is caused by", CAUSE_YELLOW),
    ("causes", CAUSE_YELLOW),
    // Hierarchy exports label parent -> child edges as `child`.
    ("child", CHILD_GREEN),
    ("is child of", CHILD_GREEN),
    ("is parent of", CHILD_GREEN),
];

static BOX_FILL_COLORS: &[(&str, &str)] = &[
    ("is blocked by", "FFCCCC"),
    ("blocks", "FFCCCC"),
    ("relates to", "CCE5FF"),
    ("is related to", "CCE5FF"),
    ("is cloned by", "FFE5CC"),
    ("clones", "FFE5CC"),
    ("is caused by", "FFFFCC"),
    ("causes", "FFFFCC"),
    ("child", "E6FFE6"),
];

// Order is precedence: `blocked` must win over `done`, `qa` over `ready`.
static STATUS_BADGES: &[(&[&str], &str)] = &[
    (&["blocked", "impediment"], "\u{26D4}"),
    (&["in progress", "implement", "doing", "wip"], "\u{1F6A7}"),
    (&["review", "code review", "pr review"], "\u{1F50D}"),
    (&["qa", "test", "testing", "verify", "verification"], "\u{1F9EA}"),
    (
        &["done", "closed", "resolved", "complete", "completed"],
        "\u{2705}",
    ),
    (&["to do", "todo", "backlog", "open", "ready"], "\u{23F3}"),
];

fn lookup(table: &'static [(&'static str, &'static str)], label: &str) -> Option<&'static str> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }
    table
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(label))
        .map(|(_, color)| *color)
}

/// Border/connector color for a relationship label.
pub fn stroke_color(link_via: &str) -> &'static str {
    lookup(LINK_COLORS, link_via).unwrap_or(DEFAULT_LINK_COLOR)
}

/// Box fill color. Roots always get [`ROOT_BOX_FILL`].
pub fn fill_color(link_via: &str, depth: u32) -> &'static str {
    if depth == 0 {
        return ROOT_BOX_FILL;
    }
    lookup(BOX_FILL_COLORS, link_via).unwrap_or(DEFAULT_BOX_FILL)
}

/// Emoji badge for a free-form workflow status.
pub fn status_badge(status: &str) -> &'static str {
    let status = status.trim().to_lowercase();
    if status.is_empty() {
        return DEFAULT_STATUS_BADGE;
    }
    STATUS_BADGES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|kw| status.contains(kw)))
        .map(|(_, badge)| *badge)
        .unwrap_or(DEFAULT_STATUS_BADGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stroke_color_is_case_and_whitespace_insensitive() {
        assert_eq!(stroke_color("is blocked by"), BLOCKED_RED);
        assert_eq!(stroke_color("  Is Blocked By "), BLOCKED_RED);
        assert_eq!(stroke_color("BLOCKS"), BLOCKED_RED);
        assert_eq!(stroke_color("relates to"), RELATED_BLUE);
        assert_eq!(stroke_color("is parent of"), CHILD_GREEN);
        assert_eq!(stroke_color("duplicates"), DUPLICATE_GRAY);
        assert_eq!(stroke_color("causes"), CAUSE_YELLOW);
        assert_eq!(stroke_color("clones"), CLONE_ORANGE);
    }

    #[test]
    fn stroke_color_falls_back_to_default_gray() {
        assert_eq!(stroke_color(""), DEFAULT_LINK_COLOR);
        assert_eq!(stroke_color("   "), DEFAULT_LINK_COLOR);
        assert_eq!(stroke_color("implements"), DEFAULT_LINK_COLOR);
        // Exact lookup, not substring.
        assert_eq!(stroke_color("really blocks"), DEFAULT_LINK_COLOR);
    }

    #[test]
    fn fill_color_uses_root_green_at_depth_zero() {
        for label in ["", "is blocked by", "relates to", "something else"] {
            assert_eq!(fill_color(label, 0), ROOT_BOX_FILL);
        }
    }

    #[test]
    fn fill_color_uses_light_shades_below_root() {
        assert_eq!(fill_color("is blocked by", 1), "FFCCCC");
        assert_eq!(fill_color("Relates To", 2), "CCE5FF");
        assert_eq!(fill_color("child", 3), "E6FFE6");
        // `is child of` has a stroke color but no fill shade.
        assert_eq!(fill_color("is child of", 1), DEFAULT_BOX_FILL);
        assert_eq!(fill_color("duplicates", 1), DEFAULT_BOX_FILL);
        assert_eq!(fill_color("", 1), DEFAULT_BOX_FILL);
    }

    #[test]
    fn status_badge_matches_keyword_groups() {
        assert_eq!(status_badge("In Progress"), "\u{1F6A7}");
        assert_eq!(status_badge("Code Review"), "\u{1F50D}");
        assert_eq!(status_badge("Testing"), "\u{1F9EA}");
        assert_eq!(status_badge("Closed"), "\u{2705}");
        assert_eq!(status_badge("Backlog"), "\u{23F3}");
        assert_eq!(status_badge("Impediment"), "\u{26D4}");
    }

    #[test]
    fn status_badge_respects_group_precedence() {
        assert_eq!(status_badge("Blocked - done pending"), "\u{26D4}");
        assert_eq!(status_badge("Ready for QA"), "\u{1F9EA}");
        assert_eq!(status_badge("Reopened"), "\u{23F3}");
    }

    #[test]
    fn status_badge_defaults_to_unknown() {
        assert_eq!(status_badge(""), DEFAULT_STATUS_BADGE);
        assert_eq!(status_badge("  "), DEFAULT_STATUS_BADGE);
        assert_eq!(status_badge("Triage"), DEFAULT_STATUS_BADGE);
    }
}
