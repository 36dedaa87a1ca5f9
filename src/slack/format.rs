use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::Write,
};

use chrono::{Datelike, NaiveDate, Weekday};

use crate::{parse::WeekMenu, restaurant::Restaurant};

/// Salad comes with every meal, so it is not worth repeating on every line.
const SALAD_SUFFIX: &str = ", solata";

/// Day name as used in "Dnevni meni za <day>".
const fn day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "ponedeljek",
        Weekday::Tue => "torek",
        Weekday::Wed => "sredo",
        Weekday::Thu => "četrtek",
        Weekday::Fri => "petek",
        Weekday::Sat => "soboto",
        Weekday::Sun => "nedeljo",
    }
}

/// Renders the menus of all restaurants as one Slack message, grouped by day.
pub fn format_menu(menus: &BTreeMap<Restaurant, WeekMenu>) -> String {
    let dates: BTreeSet<NaiveDate> = menus.values().flat_map(WeekMenu::dates).collect();

    let mut msg = String::new();
    for date in dates {
        // writing into a String cannot fail
        let _ = writeln!(
            msg,
            "Dnevni meni za {}, {}:",
            day_name(date.weekday()),
            date.format("%d.%m.%Y")
        );
        for (restaurant, week) in menus {
            let Some(day) = week.get(date).filter(|day| !day.is_empty()) else {
                continue;
            };
            let _ = write!(msg, " *<{}|{restaurant}>*", restaurant.url());
            if let Some(price) = day.price() {
                let _ = write!(msg, " _({price})_");
            }
            msg.push_str(":\n");
            for item in day.items() {
                let _ = writeln!(msg, "    • {}", item.replace(SALAD_SUFFIX, ""));
            }
        }
    }
    msg
}
