pub mod charts;
pub mod handlers;
pub mod header;
pub mod results;
pub mod theme_toggle;
pub mod upload_section;
pub mod utils;
