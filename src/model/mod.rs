mod hypothesis;
mod session;
mod timestamp;
mod validate;

pub use self::hypothesis::{Analysis, FeedbackEntry, Hypothesis, HypothesisKind, Reference};
pub use self::session::{KindCounts, Session};
pub use self::timestamp::{
    EPOCH_TIMESTAMP, format_timestamp, is_naive_timestamp, now_timestamp, parse_timestamp,
};
pub use self::validate::{is_version_label, validate};

#[cfg(test)]
#[path = "../tests/model/validate_tests.rs"]
mod tests;
