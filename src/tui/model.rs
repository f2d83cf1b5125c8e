use ratatui::prelude::Color;
use unicode_width::UnicodeWidthChar;

#[derive(Debug, Clone, Copy)]
pub(in crate::tui) struct Palette {
    pub(in crate::tui) bg: Color,
    pub(in crate::tui) panel: Color,
    pub(in crate::tui) border: Color,
    pub(in crate::tui) focus: Color,
    pub(in crate::tui) text: Color,
    pub(in crate::tui) muted: Color,
    pub(in crate::tui) accent: Color,
    pub(in crate::tui) good: Color,
    pub(in crate::tui) bad: Color,
    pub(in crate::tui) highlight: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            bg: Color::Rgb(14, 17, 22),
            panel: Color::Rgb(20, 24, 30),
            border: Color::Rgb(54, 62, 74),
            focus: Color::Rgb(198, 64, 52),
            text: Color::Rgb(224, 228, 234),
            muted: Color::Rgb(128, 138, 152),
            accent: Color::Rgb(232, 104, 82),
            good: Color::Rgb(94, 194, 124),
            bad: Color::Rgb(236, 92, 92),
            highlight: Color::Rgb(32, 39, 48),
        }
    }
}

/// Truncate to `max` display columns, marking the cut with `…`.
pub(in crate::tui) fn shorten(s: &str, max: usize) -> String {
    let mut width = 0usize;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > max.saturating_sub(1) {
            let rest: usize = s
                .chars()
                .skip(out.chars().count())
                .map(|c| c.width().unwrap_or(0))
                .sum();
            if width + rest <= max {
                out.extend(s.chars().skip(out.chars().count()));
                return out;
            }
            out.push('…');
            return out;
        }
        width += w;
        out.push(c);
    }
    out
}
