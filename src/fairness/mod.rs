pub mod scorer;
pub mod selector;
pub mod service;

pub use scorer::{FairnessSnapshot, MemberFairnessStat, compute_fairness};
pub use selector::select_assignee;
pub use service::FairnessService;
