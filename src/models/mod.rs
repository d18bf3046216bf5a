pub mod job;
pub mod user;

pub use job::{
    AppliedJob, AppliedJobExport, JobSections, JobSource, ListedJob, RecommendEntry,
    RecommendedJob,
};
pub use user::{LoginStats, SeedUser, SessionUser, User, DEFAULT_USERS};
