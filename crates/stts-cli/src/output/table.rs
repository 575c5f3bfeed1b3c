/// Narrowest a column is squeezed to when the terminal is too small.
const MIN_COLUMN: usize = 6;
const GAP: &str = "  ";

#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

/// Render an aligned table: header, divider, one line per row.
///
/// Quantities and prices are right-aligned. With `color`, workflow statuses
/// are tinted by how settled they are.
#[must_use]
pub fn render_entity_table(
    headers: &[&str],
    rows: &[Vec<String>],
    options: TableOptions,
) -> String {
    let widths = column_widths(headers, rows, options.max_width);

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| pad(&clip(header, *width), *width, false))
        .collect::<Vec<_>>()
        .join(GAP);
    let divider = "-".repeat(header_line.chars().count());

    let mut lines = vec![header_line, divider];
    for row in rows {
        let cells = widths.iter().enumerate().map(|(index, width)| {
            let text = clip(row.get(index).map_or("-", String::as_str), *width);
            let padded = pad(&text, *width, looks_numeric(&text));
            if options.color {
                tint(&padded, &text)
            } else {
                padded
            }
        });
        lines.push(cells.collect::<Vec<_>>().join(GAP));
    }
    lines.join("\n")
}

/// Content widths, shrunk widest-first until the table fits `max_width`.
fn column_widths(headers: &[&str], rows: &[Vec<String>], max_width: Option<usize>) -> Vec<usize> {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .chain([header.chars().count(), MIN_COLUMN])
                .max()
                .unwrap_or(MIN_COLUMN)
        })
        .collect();

    let Some(max_width) = max_width else {
        return widths;
    };
    let gaps = widths.len().saturating_sub(1) * GAP.len();
    while widths.iter().sum::<usize>() + gaps > max_width {
        let floor = |index: usize| headers[index].chars().count().max(MIN_COLUMN);
        let Some(widest) = (0..widths.len())
            .filter(|&index| widths[index] > floor(index))
            .max_by_key(|&index| widths[index])
        else {
            break;
        };
        widths[widest] -= 1;
    }
    widths
}

fn clip(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn pad(value: &str, width: usize, right_align: bool) -> String {
    if right_align {
        format!("{value:>width$}")
    } else {
        format!("{value:<width$}")
    }
}

fn looks_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.' | ','))
}

/// Wrap an already padded cell in the colour of its status, if it is one.
fn tint(padded: &str, text: &str) -> String {
    let code = match status_tone(&text.to_ascii_lowercase()) {
        Tone::Good => "32",
        Tone::Waiting => "33",
        Tone::Bad => "31",
        Tone::Plain => return padded.to_string(),
    };
    format!("\u{1b}[{code}m{padded}\u{1b}[0m")
}

#[derive(Debug, PartialEq, Eq)]
enum Tone {
    Good,
    Waiting,
    Bad,
    Plain,
}

fn status_tone(lower: &str) -> Tone {
    match lower {
        "accepted" | "marketable" | "printed" | "approved" | "true" => Tone::Good,
        "pending" | "assigned_inspector" | "lab_inspected" | "received" | "halted" => {
            Tone::Waiting
        }
        "rejected" | "not_marketable" | "false" => Tone::Bad,
        _ => Tone::Plain,
    }
}
