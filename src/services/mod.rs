pub mod input_validator;
pub mod normalizer;
pub mod probe;
pub mod request_builder;
pub mod response_validator;
pub mod summary;

pub use input_validator::{validate_input_lengths, InputValidation, MAX_POINTS, MIN_POINTS};
pub use normalizer::normalize;
pub use probe::{check_availability, get_statistics};
pub use request_builder::{build_request, build_request_at, BuiltRequest};
pub use response_validator::validate;
pub use summary::format_summary;
