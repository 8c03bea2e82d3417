//! Column-aligned table parsing
//!
//! `helm list` (like most Kubernetes CLIs) prints a header row followed by
//! rows padded to the header's column positions.

use std::collections::HashMap;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

/// Column name to cell values, in header order and row order
pub type Table = IndexMap<String, Vec<String>>;

static HEADER_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\t| {2,}").expect("valid regex"));

/// Parse raw tabular output into columns
///
/// Header names are split on a tab or a run of two or more spaces, so a
/// name like `APP VERSION` survives. Each data line is sliced at the
/// character positions of the header names. Values that overflow their
/// column end up in the neighbour; that is a known limitation of
/// positional parsing.
pub fn parse_table(raw: &[u8]) -> Table {
    let text = String::from_utf8_lossy(raw);
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());

    let mut table = Table::new();
    let Some(header) = lines.next() else {
        return table;
    };

    let columns = column_starts(header);
    for (name, _) in &columns {
        table.entry(name.clone()).or_default();
    }

    for line in lines {
        let chars: Vec<char> = line.chars().collect();
        for (i, (name, start)) in columns.iter().enumerate() {
            let end = columns.get(i + 1).map_or(chars.len(), |(_, next)| *next);
            let cell = slice_chars(&chars, *start, end);
            if let Some(cells) = table.get_mut(name) {
                cells.push(cell.trim().to_string());
            }
        }
    }

    table
}

/// Header names with their starting character position
///
/// A repeated name gets a positional suffix (`NAME`, `NAME_1`, ...) so each
/// column keeps its own cells.
fn column_starts(header: &str) -> Vec<(String, usize)> {
    let mut columns = Vec::new();
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut search_from = 0;

    for name in HEADER_SEPARATOR.split(header).map(str::trim).filter(|n| !n.is_empty()) {
        let Some(offset) = header[search_from..].find(name) else {
            continue;
        };
        let byte_start = search_from + offset;

        let repeats = seen.entry(name).or_insert(0);
        let key = match *repeats {
            0 => name.to_string(),
            n => format!("{name}_{n}"),
        };
        *repeats += 1;

        columns.push((key, header[..byte_start].chars().count()));
        search_from = byte_start + name.len();
    }

    columns
}

fn slice_chars(chars: &[char], start: usize, end: usize) -> String {
    let start = start.min(chars.len());
    let end = end.clamp(start, chars.len());
    chars[start..end].iter().collect()
}
