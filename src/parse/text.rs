use std::sync::OnceLock;

use regex::Regex;
use scraper::ElementRef;

/// Replaces every run of whitespace (including non-breaking spaces) with a single space and
/// trims both ends.
pub fn collapse_whitespace(s: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\s+").expect("regex should be valid"));
    re.replace_all(s, " ").trim().to_owned()
}

fn ends_line(tag: &str) -> bool {
    matches!(
        tag,
        "p" | "div"
            | "li"
            | "ul"
            | "ol"
            | "tr"
            | "table"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "section"
            | "article"
            | "header"
            | "footer"
            | "blockquote"
            | "dt"
            | "dd"
    )
}

fn is_skipped(tag: &str) -> bool {
    matches!(tag, "script" | "style" | "noscript" | "template")
}

/// Splits the text of `element` into visual lines. Block elements and `<br>` end a line, table
/// cells are separated by a space and empty lines are dropped.
pub fn lines_of(element: ElementRef<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    collect_lines(element, &mut lines, &mut current);
    flush(&mut lines, &mut current);
    lines
}

fn collect_lines(element: ElementRef<'_>, lines: &mut Vec<String>, current: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            current.push_str(text);
            continue;
        }
        let Some(child) = ElementRef::wrap(child) else {
            continue;
        };
        let tag = child.value().name();
        if is_skipped(tag) {
            continue;
        }
        if tag == "br" {
            flush(lines, current);
            continue;
        }
        let block = ends_line(tag);
        if block {
            flush(lines, current);
        }
        collect_lines(child, lines, current);
        if block {
            flush(lines, current);
        } else if matches!(tag, "td" | "th") {
            current.push(' ');
        }
    }
}

fn flush(lines: &mut Vec<String>, current: &mut String) {
    let line = collapse_whitespace(current);
    if !line.is_empty() {
        lines.push(line);
    }
    current.clear();
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  Goveja \n\t juha  "), "Goveja juha");
        assert_eq!(collapse_whitespace("6,50\u{00A0}€"), "6,50 €");
        assert_eq!(collapse_whitespace(" \u{00A0} "), "");
    }

    #[test]
    fn test_lines_split_on_br_and_blocks() {
        let html = Html::parse_fragment(
            "<div><p><strong>Torek</strong> 15.10.<br>Goveja <em>juha</em><br/>\n</p>\
             <ul><li>Rižota</li><li> Solata </li></ul><script>var x = 1;</script></div>",
        );
        let lines = lines_of(html.root_element());
        assert_eq!(
            lines,
            vec!["Torek 15.10.", "Goveja juha", "Rižota", "Solata"]
        );
    }

    #[test]
    fn test_table_cells_joined() {
        let html = Html::parse_fragment(
            "<table><tr><td>Ocvrt sir</td><td>5,90 €</td></tr><tr><td>Juha</td></tr></table>",
        );
        let lines = lines_of(html.root_element());
        assert_eq!(lines, vec!["Ocvrt sir 5,90 €", "Juha"]);
    }
}
