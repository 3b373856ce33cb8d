//! Word wrapping for rendered error text.
//!
//! Text is cut into units, each preceded by the separator that was found in
//! front of it. A separator is written verbatim unless the line breaks there,
//! in which case it is replaced by a newline and the continuation prefix.

use std::{borrow::Cow, fmt};

/// Number of display columns taken by `text`: one per Unicode scalar value.
pub(crate) fn display_width(text: &str) -> usize {
    text.chars().count()
}

/// Writes `text` followed by a newline, wrapping at runs of spaces.
///
/// Every line of `text` starts with `indent`; lines produced by wrapping start
/// with `continuation`. Spacing that does not become a line break is kept as
/// written. A word longer than the available width is written on its own line
/// without being split.
pub(crate) fn write_wrapped(
    out: &mut dyn fmt::Write,
    indent: &str,
    continuation: &str,
    text: &str,
    column_width: usize,
) -> fmt::Result {
    for line in text.split('\n') {
        write_units(out, indent, continuation, &split_words(line), column_width)?;
    }
    Ok(())
}

/// Writes `heading` followed by `labels` joined as `a`, `a or b`, `a, b or c`.
///
/// Lines only break between labels, so a label is always written whole.
pub(crate) fn write_clause(
    out: &mut dyn fmt::Write,
    indent: &str,
    continuation: &str,
    heading: &str,
    labels: &[&str],
    column_width: usize,
) -> fmt::Result {
    let last = labels.len().saturating_sub(1);
    let mut texts = vec![Cow::Borrowed(heading)];
    for (i, label) in labels.iter().enumerate() {
        if i > 0 && i == last {
            texts.push(Cow::Borrowed("or"));
        }
        if i + 1 < last {
            texts.push(Cow::Owned(format!("{label},")));
        } else {
            texts.push(Cow::Borrowed(*label));
        }
    }

    let units: Vec<(&str, &str)> = texts
        .iter()
        .enumerate()
        .map(|(i, text)| (if i == 0 { "" } else { " " }, text.as_ref()))
        .collect();
    write_units(out, indent, continuation, &units, column_width)
}

/// Splits a line into `(spaces, word)` pairs; trailing spaces form a pair with
/// an empty word.
fn split_words(line: &str) -> Vec<(&str, &str)> {
    let mut units = Vec::new();
    let mut rest = line;
    while !rest.is_empty() {
        let word_start = rest.find(|c| c != ' ').unwrap_or(rest.len());
        let (spaces, tail) = rest.split_at(word_start);
        let word_end = tail.find(' ').unwrap_or(tail.len());
        let (word, tail) = tail.split_at(word_end);
        units.push((spaces, word));
        rest = tail;
    }
    units
}

fn write_units(
    out: &mut dyn fmt::Write,
    indent: &str,
    continuation: &str,
    units: &[(&str, &str)],
    column_width: usize,
) -> fmt::Result {
    out.write_str(indent)?;
    let mut column = display_width(indent);
    let mut line_has_text = false;

    for &(separator, text) in units {
        let separator_width = display_width(separator);
        let width = display_width(text);
        if line_has_text && !text.is_empty() && column + separator_width + width > column_width {
            out.write_char('\n')?;
            out.write_str(continuation)?;
            column = display_width(continuation);
        } else {
            out.write_str(separator)?;
            column += separator_width;
        }
        out.write_str(text)?;
        column += width;
        line_has_text = true;
    }
    out.write_char('\n')
}
