pub const DEFAULT_DATABASE_URL: &str = "sqlite://scorecard.db";
pub const DEFAULT_STORE_KEY: &str = "weekly-scorecard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub database_url: String,
    pub store_key: String,
}

impl Config {
    /// `SCORECARD_DATABASE_URL` and `SCORECARD_STORE_KEY`, with a CLI override for the URL.
    pub fn from_env(database_url: Option<String>) -> Self {
        Self::resolve(database_url, |name| std::env::var(name).ok())
    }

    fn resolve(database_url: Option<String>, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let database_url = database_url
            .or_else(|| lookup("SCORECARD_DATABASE_URL"))
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let store_key = lookup("SCORECARD_STORE_KEY")
            .filter(|key| !key.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_STORE_KEY.to_string());

        Self {
            database_url,
            store_key,
        }
    }
}
