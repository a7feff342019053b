//! Response decoder module
//!
//! Extracts the record array from a decoded response body using a
//! configured path (`$.data.results[*]` for every resource).

mod decoders;
mod types;

pub use decoders::{lookup_path, JsonDecoder, RECORDS_PATH};
pub use types::RecordDecoder;
