pub mod chore;
pub mod group;
pub mod member;

pub use chore::{Chore, ChoreStatus, NewChoreRequest, UpdateChoreRequest};
pub use group::{Group, JoinGroupRequest, NewGroupRequest};
pub use member::{Member, NewMemberRequest};
