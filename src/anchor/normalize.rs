/// Quotes longer than this are cut down before searching
pub const LONG_QUOTE_CHARS: usize = 260;

/// Length of the centered slice kept from a long quote
pub const CENTER_SLICE_CHARS: usize = 180;

/// Canonical form of a model-supplied quote: straight quotes, ASCII hyphens,
/// single spaces. Long quotes shrink to their centered slice, which still
/// pins the location but is less likely to contain a transcription slip.
pub fn normalize_quote(quote: &str) -> String {
    let mapped: String = quote
        .chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' | '\u{2032}' => '\'',
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' | '\u{2033}' => '"',
            '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{2014}' | '\u{2015}' => '-',
            other => other,
        })
        .collect();

    // split_whitespace covers NBSP and the other Unicode spaces
    let collapsed = mapped.split_whitespace().collect::<Vec<_>>().join(" ");

    let len = collapsed.chars().count();
    if len <= LONG_QUOTE_CHARS {
        return collapsed;
    }

    let skip = (len - CENTER_SLICE_CHARS) / 2;
    collapsed
        .chars()
        .skip(skip)
        .take(CENTER_SLICE_CHARS)
        .collect::<String>()
        .trim()
        .to_string()
}
