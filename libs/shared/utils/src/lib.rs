pub mod test_utils;
pub mod token;

pub use token::{issue_token, validate_token, TokenError};
