// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/// A duration value as it arrives from an upstream source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawDuration<'a> {
    /// Already expressed in whole seconds
    Seconds(u64),
    /// Free-form text such as `"1:02:03"`, `"45:30"` or `"90"`
    Text(&'a str),
}

impl RawDuration<'_> {
    /// Build a seconds value from milliseconds (sub-second remainder is dropped)
    pub fn from_millis(millis: u64) -> Self {
        RawDuration::Seconds(millis / 1000)
    }
}

impl<'a> From<&'a str> for RawDuration<'a> {
    fn from(text: &'a str) -> Self {
        RawDuration::Text(text)
    }
}

impl From<u64> for RawDuration<'_> {
    fn from(seconds: u64) -> Self {
        RawDuration::Seconds(seconds)
    }
}

/// Parse a duration into whole seconds.
///
/// Text input is split on `:` and read as `[s]`, `[m:s]` or `[h:m:s]`.
/// Missing, empty or malformed input yields `0`, which downstream code
/// treats as "unknown".
pub fn parse_duration(input: Option<RawDuration<'_>>) -> u64 {
    match input {
        Some(RawDuration::Seconds(seconds)) => seconds,
        Some(RawDuration::Text(text)) => parse_colon_format(text).unwrap_or(0),
        None => 0,
    }
}

fn parse_colon_format(text: &str) -> Option<u64> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let parts = text
        .split(':')
        .map(parse_segment)
        .collect::<Option<Vec<f64>>>()?;

    let total = match parts.as_slice() {
        [seconds] => *seconds,
        [minutes, seconds] => minutes * 60.0 + seconds,
        [hours, minutes, seconds] => hours * 3600.0 + minutes * 60.0 + seconds,
        _ => return None,
    };

    Some(total.floor() as u64)
}

fn parse_segment(segment: &str) -> Option<f64> {
    segment
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}

/// Format milliseconds as `H:MM:SS`, or `M:SS` when under an hour
pub fn format_duration(millis: u64) -> String {
    if millis == 0 {
        return "0:00".to_string();
    }

    let total_seconds = millis / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Format whole seconds with [`format_duration`]
pub fn format_seconds(seconds: u64) -> String {
    format_duration(seconds.saturating_mul(1000))
}
