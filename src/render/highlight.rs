use regex::RegexBuilder;

/// Backslash-escape regex metacharacters so `s` matches only itself.
pub fn escape_regex(s: &str) -> String {
    regex::escape(s)
}

/// Minimal HTML text/attribute escaping for rendered fragments.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wrap every case-insensitive occurrence of `query` in `text` with `<mark>`.
///
/// Both the marked and unmarked segments are HTML-escaped. Callers always
/// pass raw item data, never previously rendered output.
pub fn highlight_match(text: &str, query: &str) -> String {
    if query.is_empty() || text.is_empty() {
        return escape_html(text);
    }

    let re = match RegexBuilder::new(&escape_regex(query))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re,
        Err(e) => {
            tracing::debug!("highlight pattern for {:?} rejected: {}", query, e);
            return escape_html(text);
        }
    };

    let mut out = String::with_capacity(text.len() + 16);
    let mut last = 0;
    for m in re.find_iter(text) {
        out.push_str(&escape_html(&text[last..m.start()]));
        out.push_str("<mark>");
        out.push_str(&escape_html(m.as_str()));
        out.push_str("</mark>");
        last = m.end();
    }
    out.push_str(&escape_html(&text[last..]));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    #[test]
    fn highlights_case_insensitively() {
        assert_eq!(highlight_match("Lotus Spa", "lo"), "<mark>Lo</mark>tus Spa");
    }

    #[test]
    fn empty_query_leaves_text_unchanged() {
        assert_eq!(highlight_match("Lotus Spa", ""), "Lotus Spa");
        assert_eq!(highlight_match("", "lo"), "");
    }

    #[test]
    fn marks_every_occurrence() {
        assert_eq!(
            highlight_match("Spa at the SPA spa", "spa"),
            "<mark>Spa</mark> at the <mark>SPA</mark> <mark>spa</mark>"
        );
    }

    #[test]
    fn rerendering_from_raw_text_is_stable() {
        let first = highlight_match("Massage Massage", "mass");
        let second = highlight_match("Massage Massage", "mass");
        assert_eq!(first, second);
        assert_eq!(first.matches("<mark>").count(), 2);
    }

    #[test]
    fn escaped_pattern_matches_only_the_literal() {
        let re = Regex::new(&format!("^{}$", escape_regex("a.b*c"))).unwrap();
        assert!(re.is_match("a.b*c"));
        assert!(!re.is_match("axbc"));
        assert!(!re.is_match("a.bbbc"));
        assert!(!re.is_match("a.b*cc"));
    }

    #[test]
    fn metacharacter_queries_highlight_literally() {
        assert_eq!(
            highlight_match("Spa (Downtown) [new]", "(down"),
            "Spa <mark>(Down</mark>town) [new]"
        );
    }

    #[test]
    fn markup_in_item_data_is_escaped() {
        assert_eq!(
            highlight_match("<b>Lotus</b> & Co", "lotus"),
            "&lt;b&gt;<mark>Lotus</mark>&lt;/b&gt; &amp; Co"
        );
    }
}
