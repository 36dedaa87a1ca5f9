use std::collections::BTreeMap;

use chrono::NaiveDate;
use scraper::Html;

use super::{daily_menu::DailyMenu, money::Eur};
use crate::parse::{lines_of, parse_day_header, Error};
use crate::static_selector;

/// Daily menus of one restaurant page, ordered by date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekMenu {
    days: BTreeMap<NaiveDate, DailyMenu>,
}

impl WeekMenu {
    /// Extracts the weekday blocks from a menu page. `reference` is the date the page was
    /// fetched on and decides the year of headers that omit it.
    pub fn from_html(html: &Html, reference: NaiveDate) -> Result<Self, Error> {
        static_selector!(ENTRY_CONTENT <- ".entry-content");
        static_selector!(CONTENT <- "#content");
        static_selector!(BODY <- "body");

        let root = [&ENTRY_CONTENT, &CONTENT, &BODY]
            .into_iter()
            .find_map(|selector| html.select(selector).next())
            .ok_or_else(|| Error::html_parse_error("Menu page has no content element"))?;

        Self::from_lines(lines_of(root), reference)
    }

    pub(crate) fn from_lines(
        lines: impl IntoIterator<Item = String>,
        reference: NaiveDate,
    ) -> Result<Self, Error> {
        let mut days: BTreeMap<NaiveDate, DailyMenu> = BTreeMap::new();
        let mut current: Option<NaiveDate> = None;

        for line in lines {
            if let Some(date) = parse_day_header(&line, reference) {
                days.entry(date).or_insert_with(|| DailyMenu::new(date));
                current = Some(date);
                continue;
            }
            let Some(day) = current.and_then(|date| days.get_mut(&date)) else {
                log::trace!("Skipping line before the first day header: {line:?}");
                continue;
            };
            match Eur::from_price_line(&line)? {
                Some(price) => day.set_price(price),
                None => day.push_item(&line),
            }
        }

        days.retain(|date, menu| {
            if menu.is_empty() {
                log::debug!("Dropping {date}, it has no items");
            }
            !menu.is_empty()
        });
        if days.is_empty() {
            return Err(Error::html_parse_error("No daily menus found"));
        }
        Ok(Self { days })
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DailyMenu> {
        self.days.get(&date)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }
}
