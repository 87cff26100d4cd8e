use serde::Deserialize;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.yoti.com/idverify/v1";

/// Environment variable consulted by [Config::from_env].
pub const API_URL_ENV: &str = "YOTI_DOC_SCAN_API_URL";

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_api_url")]
    pub api_url: BaseUrl,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
        }
    }
}

impl Config {
    pub fn new(api_url: BaseUrl) -> Self {
        Self { api_url }
    }

    /// Use the API URL from `YOTI_DOC_SCAN_API_URL` when it is set and non-empty, otherwise the
    /// default.
    ///
    /// The environment is read once, here; a client never looks at it again.
    pub fn from_env() -> Result<Self, url::ParseError> {
        Self::from_optional_url(std::env::var(API_URL_ENV).ok())
    }

    pub(crate) fn from_optional_url(url: Option<String>) -> Result<Self, url::ParseError> {
        match url.filter(|url| !url.trim().is_empty()) {
            Some(url) => BaseUrl::try_from(url).map(Self::new),
            None => Ok(Self::default()),
        }
    }
}

fn default_api_url() -> BaseUrl {
    BaseUrl(Url::parse(&format!("{DEFAULT_API_URL}/")).expect("default API URL is valid"))
}

/// A url that is always a base (can be safely join()'ed with further path elements without
/// mangling).
#[derive(Deserialize, Debug, Clone, Hash, PartialEq, Eq)]
#[serde(try_from = "String")]
pub struct BaseUrl(Url);

impl std::ops::Deref for BaseUrl {
    type Target = Url;

    fn deref(&self) -> &Url {
        &self.0
    }
}

impl TryFrom<String> for BaseUrl {
    type Error = url::ParseError;

    fn try_from(mut url: String) -> Result<Self, Self::Error> {
        // Make URL a base.
        if !url.ends_with('/') {
            url += "/"
        }
        url.parse().map(Self)
    }
}

impl std::str::FromStr for BaseUrl {
    type Err = url::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_url() {
        assert_eq!(
            Config::default().api_url.as_str(),
            "https://api.yoti.com/idverify/v1/"
        );
    }

    #[test]
    fn explicit_url_is_made_a_base() {
        let config = Config::from_optional_url(Some("https://example.com/env/api".into())).unwrap();
        assert_eq!(config.api_url.as_str(), "https://example.com/env/api/");
        assert_eq!(
            config.api_url.join("sessions").unwrap().as_str(),
            "https://example.com/env/api/sessions"
        );
    }

    #[test]
    fn empty_url_falls_back_to_default() {
        assert_eq!(
            Config::from_optional_url(Some(String::new())).unwrap(),
            Config::default()
        );
        assert_eq!(Config::from_optional_url(None).unwrap(), Config::default());
    }

    #[test]
    fn deserialize() {
        let config: Config =
            serde_json::from_value(serde_json::json!({"api_url": "https://example.com/option/api"}))
                .unwrap();
        assert_eq!(config.api_url.as_str(), "https://example.com/option/api/");

        let config: Config = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(config, Config::default());
    }
}
