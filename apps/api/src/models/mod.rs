pub mod resume;

pub use resume::{Education, PersonalInfo, ResumeData, WorkExperience};
