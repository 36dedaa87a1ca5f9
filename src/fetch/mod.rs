//! Downloads the restaurant menu pages and the optional menu image.
use std::time::Duration;

use reqwest::{Client, Error as RequestError};
use tracing::{instrument, Level};
use url::Url;

use crate::restaurant::Restaurant;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const TIMEOUT: Duration = Duration::from_secs(30);

pub fn make_client() -> Client {
    Client::builder()
        .gzip(true)
        .user_agent(USER_AGENT)
        .timeout(TIMEOUT)
        .build()
        .expect("client creation should succeed")
}

#[instrument(skip(client), level = Level::TRACE)]
pub async fn menu_page(client: &Client, restaurant: Restaurant) -> Result<String, RequestError> {
    let start = std::time::Instant::now();
    let text = page_at(client, restaurant.url()).await?;
    log::debug!("Got menu page of {restaurant} in {:?}", start.elapsed());
    Ok(text)
}

/// Body of `url` as text. Non-2xx statuses are errors.
pub(crate) async fn page_at(client: &Client, url: Url) -> Result<String, RequestError> {
    let response = client.get(url).send().await?.error_for_status()?;
    response.text().await
}

/// Fetches every page at once. Fails as soon as any request fails.
pub async fn menu_pages(
    client: &Client,
    restaurants: &[Restaurant],
) -> Result<Vec<(Restaurant, String)>, RequestError> {
    futures::future::try_join_all(restaurants.iter().map(|&restaurant| async move {
        menu_page(client, restaurant)
            .await
            .map(|page| (restaurant, page))
    }))
    .await
}

#[instrument(skip(client, url), fields(url = %url), level = Level::TRACE)]
pub async fn menu_image(client: &Client, url: &Url) -> Result<Vec<u8>, RequestError> {
    let response = client.get(url.clone()).send().await?.error_for_status()?;
    let bytes = response.bytes().await?;
    log::debug!("Got {} bytes of menu image from {url}", bytes.len());
    Ok(bytes.to_vec())
}
