use crate::models::PropertySet;
use anyhow::Result;
use std::time::Duration;

/// Client HTTP vers l'endpoint /properties d'un pair du parc
#[derive(Clone)]
pub struct SystemClient {
    http: reqwest::Client,
}

impl SystemClient {
    pub fn new() -> Result<Self> {
        // Timeout borné : un pair éteint ne doit pas bloquer un cycle du scout
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(5))
            .build()?;
        Ok(Self { http })
    }

    pub async fn fetch_properties(&self, hostname: &str, port: u16) -> Result<PropertySet> {
        let url = properties_url(hostname, port);
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("{} a répondu {}", url, response.status());
        }
        Ok(response.json::<PropertySet>().await?)
    }
}

fn properties_url(hostname: &str, port: u16) -> String {
    format!("http://{hostname}:{port}/properties")
}
