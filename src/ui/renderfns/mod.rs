pub mod header;
pub mod utils;

pub use header::{draw_header, extract_domain};
pub use utils::{lozenge_span, status_color, truncate};
