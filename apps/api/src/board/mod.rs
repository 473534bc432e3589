// Job board CRUD: postings, user profiles and the applicant tracking board.
// All reads and writes go through the injected `JobStore`.

pub mod applications;
pub mod jobs;
pub mod users;
