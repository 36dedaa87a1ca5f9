use std::{fmt::Display, sync::OnceLock};

use regex::Regex;
use rusty_money::{iso, Money, MoneyError};

use crate::parse::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eur(Money<'static, iso::Currency>);

impl Eur {
    /// Parses an amount such as `6,50` or `6.50` (no currency symbol).
    pub fn from_str(s: &str) -> Result<Self, MoneyError> {
        // rusty-money uses the euro locale, where `,` separates the cents
        let normalized = s.trim().replace('.', ",");
        // the parsed scale is kept when formatting, so always give it two decimals
        let normalized = match normalized.split_once(',') {
            Some((whole, cents)) if cents.len() == 1 => format!("{whole},{cents}0"),
            Some(_) => normalized,
            None => format!("{normalized},00"),
        };
        Ok(Self(Money::from_str(&normalized, iso::EUR)?))
    }

    /// Returns the price if `line` consists of nothing but a price, e.g. `Cena: 6,50 €`,
    /// `€ 7.20` or `5,90 EUR`.
    pub fn from_price_line(line: &str) -> Result<Option<Self>, Error> {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| {
            Regex::new(
                r"(?i)^(cena\s*:?\s*)?(€\s*)?(\d{1,3}(?:[.,]\d{1,2})?)\s*(€|eur)?$",
            )
            .expect("regex should be valid")
        });
        let Some(caps) = re.captures(line.trim()) else {
            return Ok(None);
        };
        let marked = caps.get(1).is_some() || caps.get(2).is_some() || caps.get(4).is_some();
        if !marked {
            return Ok(None);
        }
        Self::from_str(&caps[3])
            .map(Some)
            .map_err(|e| Error::price_parse_error(&format!("{line:?}: {e}")))
    }
}

impl Display for Eur {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eur_from_str() {
        let eur = Eur::from_str("6,50").unwrap();
        assert!(eur.to_string().contains("6,50"));
        assert_eq!(Eur::from_str("6.50").unwrap(), eur);
    }

    #[test]
    fn test_eur_always_shows_cents() {
        assert_eq!(Eur::from_str("6,5").unwrap(), Eur::from_str("6,50").unwrap());
        assert!(Eur::from_str("6,5").unwrap().to_string().contains("6,50"));
        assert!(Eur::from_str("7").unwrap().to_string().contains("7,00"));
        let price = Eur::from_price_line("6,5 €").unwrap().unwrap();
        assert!(price.to_string().contains("6,50"), "{price}");
    }

    #[test]
    fn test_price_lines() {
        let expected = Eur::from_str("6,50").unwrap();
        for line in ["Cena: 6,50 €", "6,50 €", "€ 6.50", "6,50 EUR", "cena 6,50"] {
            assert_eq!(
                Eur::from_price_line(line).unwrap(),
                Some(expected.clone()),
                "{line}"
            );
        }
    }

    #[test]
    fn test_not_price_lines() {
        for line in ["6,50", "Dunajski zrezek 6,50 €", "Goveja juha", "2 x 6,50 €"] {
            assert_eq!(Eur::from_price_line(line).unwrap(), None, "{line}");
        }
    }
}
