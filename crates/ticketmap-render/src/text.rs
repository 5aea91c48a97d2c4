// Escaping and HTML-label helpers shared by the draw.io writer and reader.

/// Escapes text for an XML attribute value. Line breaks and tabs become character references
/// so attribute-value normalization does not flatten them.
pub fn escape_xml_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_xml_attr_into(&mut out, text);
    out
}

pub fn escape_xml_attr_into(out: &mut String, text: &str) {
    let mut start = 0usize;
    for (i, b) in text.bytes().enumerate() {
        let esc = match b {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            b'\'' => "&#39;",
            b'\n' => "&#10;",
            b'\r' => "&#13;",
            b'\t' => "&#9;",
            _ => continue,
        };
        out.push_str(&text[start..i]);
        out.push_str(esc);
        start = i + 1;
    }
    out.push_str(&text[start..]);
}

/// Escapes plain text for embedding in an HTML label.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Reduces an HTML label to plain text lines.
///
/// `<br>` and closing `</div>`/`</p>` start a new line; other tags are dropped, entities are
/// decoded, runs of whitespace collapse to one space and empty lines are removed.
pub fn html_to_text_lines(s: &str) -> Vec<String> {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(lt) = rest.find('<') {
        out.push_str(&rest[..lt]);
        let after = &rest[lt..];
        let Some(end_rel) = after.find('>') else {
            out.push('<');
            rest = &after[1..];
            continue;
        };
        let tag = after[1..end_rel].trim().to_ascii_lowercase();
        if tag.starts_with("br") || tag.starts_with("/p") || tag.starts_with("/div") {
            out.push('\n');
        } else {
            out.push(' ');
        }
        rest = &after[end_rel + 1..];
    }
    out.push_str(rest);

    htmlize::unescape(&out)
        .split('\n')
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_xml_attr_covers_markup_and_breaks() {
        assert_eq!(
            escape_xml_attr(r#"<a href="x">A & B's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;A &amp; B&#39;s&lt;/a&gt;"
        );
        assert_eq!(escape_xml_attr("a\nb\tc"), "a&#10;b&#9;c");
        assert_eq!(escape_xml_attr("plain"), "plain");
        assert_eq!(escape_xml_attr(""), "");
    }

    #[test]
    fn escape_html_keeps_unicode() {
        assert_eq!(
            escape_html("\u{2705} <ok> & \"done\""),
            "\u{2705} &lt;ok&gt; &amp; &quot;done&quot;"
        );
    }

    #[test]
    fn html_to_text_lines_splits_on_breaks() {
        assert_eq!(
            html_to_text_lines("<b>Jane  Doe</b><br/>Senior&nbsp;Engineer"),
            vec!["Jane Doe", "Senior Engineer"]
        );
        assert_eq!(
            html_to_text_lines("<div>One</div><div>Two &amp; Three</div>"),
            vec!["One", "Two & Three"]
        );
    }

    #[test]
    fn html_to_text_lines_decodes_numeric_entities() {
        assert_eq!(html_to_text_lines("A&#38;B &#x41;"), vec!["A&B A"]);
        assert_eq!(html_to_text_lines("fish & chips"), vec!["fish & chips"]);
    }

    #[test]
    fn html_to_text_lines_decodes_named_entities() {
        assert_eq!(
            html_to_text_lines("Ren&eacute; Dubois<br>&mdash; Firmware&hellip;"),
            vec!["Ren\u{e9} Dubois", "\u{2014} Firmware\u{2026}"]
        );
        assert_eq!(html_to_text_lines("&lt;b&gt;raw&lt;/b&gt;"), vec!["<b>raw</b>"]);
    }

    #[test]
    fn html_to_text_lines_treats_unclosed_tag_as_text() {
        assert_eq!(html_to_text_lines("a < b"), vec!["a < b"]);
    }
}
