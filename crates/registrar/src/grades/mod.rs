/// Grade aggregation for grade-change requests
mod aggregate;
mod types;

pub use aggregate::{
    compute_weighted_grade, letter_grade, parse_lenient, summarize, weight_warning,
    weights_total, weights_valid, WEIGHT_TOLERANCE,
};
pub use types::*;

pub(crate) use types::text_or_number;
