//! Structured line editing of the host's author's note.
//!
//! The injected line is recognised by [`SENTINEL`]. This prefix is a contract
//! with the host: any other line starting with it is treated as ours and will
//! be replaced or removed.

pub const SENTINEL: &str = "Current Weather in";

fn is_weather_line(line: &str) -> bool {
    line.starts_with(SENTINEL)
}

/// Replaces the weather line in `text` with `line`, or appends it if absent.
///
/// Duplicate weather lines after the first are dropped.
pub fn upsert(text: &str, line: &str) -> String {
    if !text.lines().any(is_weather_line) {
        if text.is_empty() {
            return line.to_string();
        }
        let sep = if text.ends_with('\n') { "" } else { "\n" };
        return format!("{text}{sep}{line}");
    }

    let mut replaced = false;
    let mut out: Vec<&str> = Vec::new();
    for existing in text.split('\n') {
        if is_weather_line(existing) {
            if !replaced {
                out.push(line);
                replaced = true;
            }
        } else {
            out.push(existing);
        }
    }
    out.join("\n")
}

/// Removes every weather line from `text`, leaving the rest untouched.
pub fn strip(text: &str) -> String {
    text.split('\n')
        .filter(|l| !is_weather_line(l))
        .collect::<Vec<_>>()
        .join("\n")
}
