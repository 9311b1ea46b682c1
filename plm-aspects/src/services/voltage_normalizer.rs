//! Coil voltage normalizer
//!
//! Maps free-text coil voltage readings ("110/120Vac", "DC48V", "24 vdc")
//! onto the canonical voltage enumeration. Never fails: any input that
//! cannot be classified becomes `Other` with low confidence, so a bulk
//! cleaning pass never aborts on one bad row.
//!
//! # Rules, in order
//! 1. Blank or non-string input → Other/low
//! 2. Remove whitespace, uppercase
//! 3. Current type from letter runs: a run containing "DC" wins over one
//!    containing "AC" (DC is checked first)
//! 4. Every digit run is a candidate; none → Other/low. A run too large to
//!    parse would be the maximum, so it also yields Other/low
//! 5. The largest candidate is the voltage, so ranges such as "460-480"
//!    resolve to their upper bound
//! 6. No current indicator: below 100 V is DC, otherwise AC
//! 7. `"<volts><AC|DC>"` is looked up in the alias table; hit → high,
//!    miss → Other/low

use serde_json::Value;
use std::io::{BufRead, Write};
use tracing::warn;

use crate::models::{NormalizedVoltage, VoltageBatchReport, VoltageConfidence};

/// Sentinel for unclassifiable input
pub const OTHER: &str = "Other";

/// Below this, a reading with no AC/DC marker is taken as DC
const DC_INFERENCE_THRESHOLD: u64 = 100;

/// Canonical voltages, `Other` excluded
pub const CANONICAL_VOLTAGES: &[&str] = &[
    "12VDC", "24VDC", "48VDC", "12VAC", "24VAC", "48VAC", "110VAC", "120VAC", "208VAC",
    "220VAC", "230VAC", "240VAC", "277VAC", "380VAC", "400VAC", "480VAC", "600VAC",
];

/// Nonstandard readings → canonical voltage
const VOLTAGE_ALIASES: &[(&str, &str)] = &[
    ("100AC", "110VAC"),
    ("115AC", "120VAC"),
    ("200AC", "208VAC"),
    ("415AC", "400VAC"),
    ("440AC", "480VAC"),
    ("460AC", "480VAC"),
    ("575AC", "600VAC"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Current {
    Ac,
    Dc,
}

impl Current {
    fn suffix(self) -> &'static str {
        match self {
            Current::Ac => "AC",
            Current::Dc => "DC",
        }
    }
}

/// Maximal runs of characters satisfying `pred`
fn runs<F>(text: &str, pred: F) -> Vec<&str>
where
    F: Fn(char) -> bool,
{
    let mut out = Vec::new();
    let mut start = None;

    for (index, c) in text.char_indices() {
        match (pred(c), start) {
            (true, None) => start = Some(index),
            (false, Some(s)) => {
                out.push(&text[s..index]);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        out.push(&text[s..]);
    }
    out
}

fn detect_current(cleaned: &str) -> Option<Current> {
    let letter_runs = runs(cleaned, |c| c.is_ascii_alphabetic());

    if letter_runs.iter().any(|run| run.contains("DC")) {
        Some(Current::Dc)
    } else if letter_runs.iter().any(|run| run.contains("AC")) {
        Some(Current::Ac)
    } else {
        None
    }
}

/// Largest digit run; None when there is none or any run overflows
fn max_voltage(cleaned: &str) -> Option<u64> {
    runs(cleaned, |c| c.is_ascii_digit())
        .into_iter()
        .map(|run| run.parse::<u64>().ok())
        .collect::<Option<Vec<u64>>>()?
        .into_iter()
        .max()
}

fn canonical_for(voltage: u64, current: Current) -> Option<&'static str> {
    let key = format!("{}{}", voltage, current.suffix());

    if let Some(canonical) = CANONICAL_VOLTAGES
        .iter()
        .find(|c| c.replacen('V', "", 1) == key)
    {
        return Some(*canonical);
    }

    VOLTAGE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map(|(_, canonical)| *canonical)
}

fn other(raw: &str) -> NormalizedVoltage {
    NormalizedVoltage {
        standardized: OTHER.to_string(),
        raw: raw.to_string(),
        confidence: VoltageConfidence::Low,
    }
}

/// Normalize one raw voltage string
pub fn normalize(raw: &str) -> NormalizedVoltage {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return other(trimmed);
    }

    let cleaned: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    let indicated = detect_current(&cleaned);

    let Some(voltage) = max_voltage(&cleaned) else {
        tracing::debug!(raw = %trimmed, "No usable digits in voltage reading");
        return other(trimmed);
    };

    let current = indicated.unwrap_or(if voltage < DC_INFERENCE_THRESHOLD {
        Current::Dc
    } else {
        Current::Ac
    });

    match canonical_for(voltage, current) {
        Some(canonical) => NormalizedVoltage {
            standardized: canonical.to_string(),
            raw: trimmed.to_string(),
            confidence: VoltageConfidence::High,
        },
        None => {
            tracing::debug!(raw = %trimmed, voltage, current = current.suffix(), "Unmapped voltage");
            other(trimmed)
        }
    }
}

/// Normalize an optional value (`None` is the null input)
pub fn normalize_opt(raw: Option<&str>) -> NormalizedVoltage {
    raw.map(normalize).unwrap_or_else(|| other(""))
}

/// Normalize an arbitrary JSON value; anything but a string is Other/low
pub fn normalize_value(value: &Value) -> NormalizedVoltage {
    normalize_opt(value.as_str())
}

/// Normalize a batch, keeping input order
pub fn normalize_batch<'a, I>(values: I) -> VoltageBatchReport
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    report_from(values.into_iter().map(normalize_opt).collect())
}

/// Normalize one reading per line of `reader`, writing one JSON object per
/// line to `out`
///
/// A line that is not valid UTF-8 becomes Other/low and the pass continues;
/// only read or write failures stop it.
pub fn clean_lines<R, W>(mut reader: R, mut out: W) -> std::io::Result<VoltageBatchReport>
where
    R: BufRead,
    W: Write,
{
    let mut results = Vec::new();
    let mut buf = Vec::new();
    let mut line_number = 0usize;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_number += 1;

        let result = match std::str::from_utf8(&buf) {
            Ok(line) => normalize(line),
            Err(e) => {
                warn!(line = line_number, error = %e, "Voltage reading is not valid UTF-8");
                normalize_opt(None)
            }
        };

        serde_json::to_writer(&mut out, &result)?;
        out.write_all(b"\n")?;
        results.push(result);
    }
    out.flush()?;

    Ok(report_from(results))
}

fn report_from(results: Vec<NormalizedVoltage>) -> VoltageBatchReport {
    let high_confidence = results
        .iter()
        .filter(|r| r.confidence == VoltageConfidence::High)
        .count();

    VoltageBatchReport {
        low_confidence: results.len() - high_confidence,
        high_confidence,
        results,
    }
}
