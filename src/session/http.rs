//! reqwest-backed [`SiteApi`]

use crate::{
    Error, Result,
    config::settings::SiteSettings,
    session::site::{LoginForm, SiteApi, SiteConnector, paths},
};
use async_trait::async_trait;
use reqwest::{
    Client, Response,
    header::{HeaderMap, HeaderValue, REFERER},
};
use url::Url;

/// HTTP session for one account, with its own cookie jar
#[derive(Debug, Clone)]
pub struct HttpSiteApi {
    client: Client,
    base_url: Url,
}

impl HttpSiteApi {
    /// Build a client with browser-like default headers and a fresh cookie store
    pub fn new(site: &SiteSettings) -> Result<Self> {
        let base_url = Url::parse(&site.base_url)?;

        let client = Client::builder()
            .user_agent(site.user_agent.as_str())
            .default_headers(default_headers())
            .cookie_store(true)
            .timeout(site.timeout())
            .build()?;

        Ok(Self { client, base_url })
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    /// Body of a 2xx response, anything else is a protocol error
    async fn body(stage: &str, response: Response) -> Result<String> {
        let status = response.status();
        tracing::debug!("{} -> {}", stage, status);

        if !status.is_success() {
            return Err(Error::protocol(format!(
                "{} returned status {}",
                stage,
                status.as_u16()
            )));
        }

        Ok(response.text().await?)
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        "sec-ch-ua",
        HeaderValue::from_static(
            r#""Not)A;Brand";v="8", "Chromium";v="138", "Google Chrome";v="138""#,
        ),
    );
    headers.insert("sec-ch-ua-mobile", HeaderValue::from_static("?0"));
    headers.insert("sec-ch-ua-platform", HeaderValue::from_static(r#""Windows""#));
    headers.insert("X-Requested-With", HeaderValue::from_static("XMLHttpRequest"));
    headers
}

#[async_trait]
impl SiteApi for HttpSiteApi {
    async fn login_page(&self) -> Result<String> {
        let url = self.url(paths::LOGIN)?;
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        Self::body("login page", response).await
    }

    async fn submit_login(&self, form: &LoginForm) -> Result<String> {
        let url = self.url(paths::LOGIN)?;
        tracing::debug!("POST {}", url);
        let response = self
            .client
            .post(url.clone())
            .header(REFERER, url.as_str())
            .form(form)
            .send()
            .await?;
        Self::body("login", response).await
    }

    async fn home_page(&self) -> Result<String> {
        let url = self.url(paths::HOME)?;
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url.clone())
            .header(REFERER, url.as_str())
            .send()
            .await?;
        Self::body("home page", response).await
    }

    async fn check_in(&self) -> Result<String> {
        let url = self.url(paths::SIGN)?;
        let referer = self.url(paths::HOME)?;
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header(REFERER, referer.as_str())
            .send()
            .await?;
        Self::body("check-in", response).await
    }
}

/// Creates one [`HttpSiteApi`] per account
#[derive(Debug, Clone)]
pub struct HttpConnector {
    site: SiteSettings,
}

impl HttpConnector {
    pub fn new(site: SiteSettings) -> Self {
        Self { site }
    }
}

impl SiteConnector for HttpConnector {
    fn connect(&self) -> Result<Box<dyn SiteApi>> {
        Ok(Box::new(HttpSiteApi::new(&self.site)?))
    }
}
