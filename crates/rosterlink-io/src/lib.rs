//! rosterlink-io - Input and output files for rosterlink
//!
//! - **Names**: one-name-per-line UTF-8 lists (queries, pools, residuals)
//! - **Records**: JSON arrays of authoritative player records
//! - **Extract**: query and pool names pulled out of a betting feed or roster
//!
//! Malformed content is skipped and logged; only a file that cannot be
//! opened or is not JSON at all is an error.

pub mod extract;
pub mod names;
pub mod reader;
pub mod records;

pub use extract::{display_names, field_values, runner_names, SHOTS_MARKET};
pub use names::{parse_name_list, read_name_list, write_name_list};
pub use reader::{read_json, IoError, IoResult};
pub use records::{parse_records, read_records};
