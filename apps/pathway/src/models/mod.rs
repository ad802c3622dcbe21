pub mod assessment;
pub mod lenient;
pub mod progress;

pub use assessment::{Assessment, AssessmentDetail};
pub use progress::{MilestoneStatus, ProgressItem};
