mod day_header;
mod error;
mod menu_page;
mod static_selector;
mod text;

pub use day_header::parse_day_header;
pub use error::Error;
pub use menu_page::WeekMenu;
pub use text::lines_of;
