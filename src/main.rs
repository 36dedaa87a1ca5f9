#![deny(unused_crate_dependencies)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

mod config;
mod error;
mod fetch;
mod menu_image;
mod parse;
mod restaurant;
mod slack;
#[cfg(test)]
mod test_server;

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use scraper::Html;

use crate::{
    config::Config,
    fetch::make_client,
    menu_image::MenuImage,
    parse::WeekMenu,
    restaurant::Restaurant,
    slack::{format_menu, SlackClient},
};

pub use error::{Error, Result};

#[cfg(all(target_env = "musl", target_pointer_width = "64"))]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Parses every fetched page. A page that cannot be parsed is reported and left out so the
/// other restaurants still get posted.
fn parse_pages(
    pages: Vec<(Restaurant, String)>,
    today: NaiveDate,
) -> BTreeMap<Restaurant, WeekMenu> {
    let mut menus = BTreeMap::new();
    for (restaurant, page) in pages {
        let html = Html::parse_document(&page);
        match WeekMenu::from_html(&html, today) {
            Ok(week) => {
                log::info!("{restaurant}: found menus for {} days", week.len());
                menus.insert(restaurant, week);
            }
            Err(e) => log::warn!("Skipping {restaurant}, its menu page could not be parsed: {e}"),
        }
    }
    menus
}

async fn inspect_menu_image(client: &reqwest::Client, config: &Config) -> Result<()> {
    let Some(url) = config.menu_image_url() else {
        return Ok(());
    };
    let bytes = fetch::menu_image(client, url).await?;
    MenuImage::inspect(bytes, config.detection(), config.image_dump_dir()).await?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> core::result::Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let config = Config::from_env()?;
    log::debug!(
        "Restaurants: {:?}, dry run: {}",
        config.restaurants(),
        config.dry_run()
    );

    let client = make_client();
    let today = Local::now().date_naive();
    let (pages, inspected) = futures::join!(
        fetch::menu_pages(&client, config.restaurants()),
        inspect_menu_image(&client, &config),
    );
    if let Err(e) = inspected {
        log::warn!("Menu image inspection failed: {e}");
    }
    let menus = parse_pages(pages?, today);

    if config.dry_run() {
        print!("{}", format_menu(&menus));
        return Ok(());
    }

    let slack = SlackClient::new(
        client,
        config.slack_token().map(str::to_owned),
        config.slack_channel(),
    )
    .with_api_base(config.slack_api_url().clone());
    if slack.post_menu(&menus).await? {
        log::info!("Posted the menu to {}", slack.channel());
    } else {
        log::warn!("The menu was not posted to {}", slack.channel());
    }
    Ok(())
}
