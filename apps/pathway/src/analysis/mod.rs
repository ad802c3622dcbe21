// Analysis payloads: canonical model, boundary normalization, text views.
// Nothing outside this module inspects raw analysis JSON.

pub mod model;
pub mod normalize;
pub mod view;

pub use model::{Analysis, AnalysisOutcome, Priority, SkillGap};
pub use normalize::normalize;
