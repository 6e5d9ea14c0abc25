//! Shared helpers for handling model responses.

pub mod json_extraction;

pub use json_extraction::{
    extract_from_code_block, extract_json_object, extract_largest_object, find_matching_brace,
    nesting_state, JsonExtraction, NestingState,
};
