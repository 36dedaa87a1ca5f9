use std::fmt::{self, Display, Formatter};

use url::Url;

/// Restaurants whose daily menus get posted. Declaration order is the order they appear in
/// the posted message.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Restaurant {
    Antaro,
    Perla,
}

impl Restaurant {
    pub const ALL: [Self; 2] = [Self::Antaro, Self::Perla];

    const fn url_str(self) -> &'static str {
        match self {
            Self::Antaro => "http://www.antaro.si/antaro/dnevni_menu/",
            Self::Perla => "http://www.antaro.si/perla/dnevni_menu/",
        }
    }

    pub fn url(self) -> Url {
        Url::parse(self.url_str()).expect("restaurant url should be valid")
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Antaro => "Antaro",
            Self::Perla => "Perla",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(name))
    }
}

impl Display for Restaurant {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
