//! Plain-text rendering of the server's detail fragments.
//!
//! The browser keeps the markup verbatim; this is only used when a terminal has
//! to show it. Tags are dropped, block-level elements turn into line breaks and
//! the handful of entities Jinja's autoescape produces are decoded.

use std::sync::OnceLock;

use regex::Regex;

fn hidden_blocks() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?is)<(script|style|head)\b[^>]*>.*?</(script|style|head)\s*>")
            .expect("static regex")
    })
}

fn block_tags() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)</?(br|p|div|li|ul|ol|tr|table|h[1-6]|dt|dd|dl|form|fieldset|pre|section|header|footer|textarea)\b[^>]*>",
        )
        .expect("static regex")
    })
}

fn cell_tags() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)</t[dh]\s*>").expect("static regex"))
}

fn any_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<!--.*?-->|<[^>]*>").expect("static regex"))
}

fn entity() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);").expect("static regex"))
}

fn decode_entity(name: &str) -> Option<String> {
    if let Some(num) = name.strip_prefix('#') {
        let code = if let Some(hex) = num.strip_prefix(['x', 'X']) {
            u32::from_str_radix(hex, 16).ok()?
        } else {
            num.parse::<u32>().ok()?
        };
        return char::from_u32(code).map(|c| c.to_string());
    }
    let s = match name {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => " ",
        _ => return None,
    };
    Some(s.to_string())
}

/// Render a markup fragment as display lines. Blank lines are dropped.
pub fn to_lines(markup: &str) -> Vec<String> {
    let text = hidden_blocks().replace_all(markup, "");
    let text = cell_tags().replace_all(&text, "  ");
    let text = block_tags().replace_all(&text, "\n");
    let text = any_tag().replace_all(&text, "");
    let text = entity().replace_all(&text, |caps: &regex::Captures<'_>| {
        decode_entity(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    });

    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect()
}

pub fn to_text(markup: &str) -> String {
    to_lines(markup).join("\n")
}
