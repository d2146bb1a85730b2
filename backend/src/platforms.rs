use serde::Deserialize;

#[derive(Debug)]
pub enum PlatformError {
    Http(reqwest::Error),
    NotFound(String),
    MalformedId(String),
    NoValidRec(String),
    Io(std::io::Error),
}

impl From<reqwest::Error> for PlatformError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

impl From<std::io::Error> for PlatformError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlatformPlayer {
    pub name: String,
    pub url: Option<String>,
    pub rate_snapshot: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlatformMatch {
    pub players: Vec<PlatformPlayer>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub ladder: Option<i32>,
}

/// One remote platform (per platform id registered with the orchestrator).
#[async_trait::async_trait]
pub trait Platform: Send + Sync {
    async fn get_match(&self, match_id: &str) -> Result<PlatformMatch, PlatformError>;

    /// Download one participant's replay into `dest`, returning the filename.
    async fn download_rec(
        &self,
        url: &str,
        dest: &std::path::Path,
    ) -> Result<String, PlatformError>;
}

pub struct HttpPlatform {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpPlatform {
    pub fn new<IS>(base_url: IS, api_key: IS) -> Self
    where
        IS: Into<String>,
    {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait::async_trait]
impl Platform for HttpPlatform {
    async fn get_match(&self, match_id: &str) -> Result<PlatformMatch, PlatformError> {
        if match_id.is_empty() || !match_id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(PlatformError::MalformedId(match_id.to_owned()));
        }

        let response = self
            .http
            .get(format!("{}/matches/{}", self.base_url, match_id))
            .query(&[("key", &self.api_key)])
            .send()
            .await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(PlatformError::NotFound(match_id.to_owned()));
        }
        if !response.status().is_success() {
            return Err(PlatformError::NoValidRec(match_id.to_owned()));
        }

        Ok(response.json::<PlatformMatch>().await?)
    }

    async fn download_rec(
        &self,
        url: &str,
        dest: &std::path::Path,
    ) -> Result<String, PlatformError> {
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(PlatformError::NoValidRec(url.to_owned()));
        }

        let filename = url
            .rsplit('/')
            .next()
            .filter(|n| !n.is_empty())
            .unwrap_or("rec.mgz")
            .to_owned();
        let data = response.bytes().await?;
        if data.is_empty() {
            return Err(PlatformError::NoValidRec(url.to_owned()));
        }

        tokio::fs::write(dest.join(&filename), &data).await?;
        Ok(filename)
    }
}
