pub mod hierarchy_repo;
pub use hierarchy_repo::{HierarchyRepository, HierarchyStore};
#[cfg(test)]
pub use hierarchy_repo::MockHierarchyStore;
pub mod user_repo;
pub use user_repo::UserRepository;
pub mod member_repo;
pub use member_repo::{MemberRepository, MemberStore};
#[cfg(test)]
pub use member_repo::MockMemberStore;
pub mod meeting_repo;
pub use meeting_repo::{MeetingRepository, MeetingStore};
#[cfg(test)]
pub use meeting_repo::MockMeetingStore;
pub mod bureau_repo;
pub use bureau_repo::{BureauRepository, BureauStore};
#[cfg(test)]
pub use bureau_repo::MockBureauStore;
