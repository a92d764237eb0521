//! Terminal views. Each page renders a state snapshot to text; none of them
//! mutate state.

pub mod chat;
pub mod login;
