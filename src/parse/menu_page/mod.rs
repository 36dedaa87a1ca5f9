mod daily_menu;
mod money;
mod week_menu;

pub use week_menu::WeekMenu;
