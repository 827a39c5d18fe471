pub const DIGITS_PER_LINE: usize = 10;
pub const MAX_LINES_DISPLAYED: usize = 5;

/// One row of the typed-digit board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardLine<'a> {
    pub symbols: &'a str,
    /// Rows above the one being typed into are shown dimmed
    pub completed: bool,
    /// The cursor sits at the end of this row
    pub has_cursor: bool,
}

/// Lay out the correctly entered symbols in fixed-width rows, keeping only
/// the most recent `max_lines`. The cursor opens a new row once the current
/// one is full.
pub fn board_lines(entered: &str, per_line: usize, max_lines: usize) -> Vec<BoardLine<'_>> {
    let per_line = per_line.max(1);
    // entered symbols are ASCII, so byte offsets are char offsets
    let mut rows: Vec<&str> = (0..entered.len())
        .step_by(per_line)
        .map(|start| &entered[start..(start + per_line).min(entered.len())])
        .collect();
    if entered.len() % per_line == 0 {
        rows.push("");
    }

    let last = rows.len() - 1;
    let skip = rows.len().saturating_sub(max_lines.max(1));
    rows.into_iter()
        .enumerate()
        .skip(skip)
        .map(|(i, symbols)| BoardLine {
            symbols,
            completed: i < last,
            has_cursor: i == last,
        })
        .collect()
}
