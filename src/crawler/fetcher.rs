use reqwest::{Client, StatusCode};

pub fn build_client(user_agent: &str) -> anyhow::Result<Client> {
    Ok(Client::builder().user_agent(user_agent).build()?)
}

/// Fetch a detail page, surfacing the status code so the caller can
/// skip non-success responses instead of aborting.
pub async fn fetch_page(client: &Client, url: &str) -> anyhow::Result<(StatusCode, String)> {
    let res = client.get(url).send().await?;
    let status = res.status();
    let body = res.text().await?;
    Ok((status, body))
}
