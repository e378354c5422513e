use std::env;

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

pub struct Config {
    pub start_url: String,
    pub base_url: String,
    pub max_links: usize,
    pub user_agent: String,
    pub output_path: String,
    pub next_timeout_ms: u64,
    pub fetch_delay_ms: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            start_url: env::var("START_URL")?,
            base_url: env::var("BASE_URL")?,
            max_links: env::var("MAX_LINKS")
                .unwrap_or_else(|_| "60".into())
                .parse()?,
            user_agent: env::var("USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_USER_AGENT.into()),
            output_path: env::var("OUTPUT_PATH")
                .unwrap_or_else(|_| "result_data.json".into()),
            next_timeout_ms: env::var("NEXT_TIMEOUT_MS")
                .unwrap_or_else(|_| "15000".into())
                .parse()?,
            fetch_delay_ms: env::var("FETCH_DELAY_MS")
                .unwrap_or_else(|_| "300".into())
                .parse()?,
        })
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            start_url: "https://realty.example/en/properties~for-rent".into(),
            base_url: "https://realty.example".into(),
            max_links: 60,
            user_agent: DEFAULT_USER_AGENT.into(),
            output_path: "result_data.json".into(),
            next_timeout_ms: 1000,
            fetch_delay_ms: 0,
        }
    }
}
