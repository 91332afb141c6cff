//! Query answer domain types

mod answer;

pub use answer::{AnswerOrigin, QueryAnswer};
