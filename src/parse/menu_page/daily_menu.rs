use chrono::NaiveDate;

use super::money::Eur;

/// Everything one restaurant serves on one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyMenu {
    date: NaiveDate,
    items: Vec<String>,
    price: Option<Eur>,
}

impl DailyMenu {
    pub const fn new(date: NaiveDate) -> Self {
        Self {
            date,
            items: Vec::new(),
            price: None,
        }
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub const fn price(&self) -> Option<&Eur> {
        self.price.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub(super) fn push_item(&mut self, item: &str) {
        let item = item
            .trim()
            .trim_start_matches(['-', '•', '*', '–', '·'])
            .trim();
        if !item.is_empty() {
            self.items.push(item.to_owned());
        }
    }

    pub(super) fn set_price(&mut self, price: Eur) {
        if let Some(old) = self.price.replace(price) {
            log::debug!("Price for {} was already {old}, overwriting", self.date);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_item_strips_bullets() {
        let mut menu = DailyMenu::new(NaiveDate::from_ymd_opt(2019, 10, 14).unwrap());
        menu.push_item("• Goveja juha");
        menu.push_item("- Rižota s piščancem, solata");
        menu.push_item(" – ");
        menu.push_item("\t* ");
        menu.push_item("  •Jota");
        assert_eq!(
            menu.items(),
            ["Goveja juha", "Rižota s piščancem, solata", "Jota"]
        );
        assert!(menu.price().is_none());
    }
}
