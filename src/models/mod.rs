pub mod evaluation;
pub mod exercise;
pub mod loaders;
pub mod point;

pub use evaluation::{
    EvaluationDetails, EvaluationOutcome, EvaluationRequest, EvaluationResult, Metadata, Statistics,
};
pub use exercise::{ExerciseContext, ExpectedShape};
pub use loaders::{load_requests_file, parse_requests};
pub use point::{Point, Trace};
