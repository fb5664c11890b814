use crate::error::SessionError;

use super::hypothesis::Hypothesis;
use super::timestamp::{is_naive_timestamp, parse_timestamp};

/// `true` for `"<digits>.<digits>"`.
pub fn is_version_label(s: &str) -> bool {
    let Some((major, minor)) = s.split_once('.') else {
        return false;
    };
    let digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    digits(major) && digits(minor)
}

pub fn validate(hypothesis: &Hypothesis) -> Result<(), SessionError> {
    let num = hypothesis.hypothesis_number;
    if !is_version_label(&hypothesis.version) {
        return Err(SessionError::InvalidEntity(format!(
            "#{}: malformed version {:?}",
            num, hypothesis.version
        )));
    }

    let missing = hypothesis.analysis.missing_keys();
    if !missing.is_empty() {
        return Err(SessionError::InvalidEntity(format!(
            "#{}: analysis missing {}",
            num,
            missing.join(", ")
        )));
    }

    // Naive legacy times carry no offset, so they are only ordered among themselves.
    let mut prev_zoned = None;
    let mut prev_naive = None;
    for (i, entry) in hypothesis.feedback_history.iter().enumerate() {
        let Some(ts) = parse_timestamp(&entry.timestamp) else {
            return Err(SessionError::InvalidEntity(format!(
                "#{}: feedback entry {} has unreadable timestamp {:?}",
                num, i, entry.timestamp
            )));
        };
        let prev = if is_naive_timestamp(&entry.timestamp) {
            &mut prev_naive
        } else {
            &mut prev_zoned
        };
        if prev.is_some_and(|p| ts < p) {
            return Err(SessionError::InvalidEntity(format!(
                "#{}: feedback entry {} is older than the entry before it",
                num, i
            )));
        }
        *prev = Some(ts);
    }

    Ok(())
}
