use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api/";
const DEFAULT_FORWARDING_DOMAIN: &str = "app.github.dev";
const BACKEND_PORT: u16 = 8000;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Terminal,
    Light,
    Dark,
}

impl ThemePreference {
    pub fn next(self) -> Self {
        match self {
            ThemePreference::Terminal => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
            ThemePreference::Light => ThemePreference::Terminal,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    theme: Option<ThemePreference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_base_url: Option<String>,
}

/// Every place a backend URL can come from, highest priority first.
#[derive(Debug, Clone, Default)]
pub struct UrlSources {
    pub cli_url: Option<String>,
    pub env_url: Option<String>,
    pub codespace: Option<String>,
    pub forwarding_domain: Option<String>,
    pub file_url: Option<String>,
}

impl UrlSources {
    pub fn gather(cli_url: Option<String>, cli_codespace: Option<String>) -> Self {
        Self {
            cli_url,
            env_url: non_empty_env("OCTOFIT_API_URL"),
            codespace: cli_codespace.or_else(|| non_empty_env("CODESPACE_NAME")),
            forwarding_domain: non_empty_env("GITHUB_CODESPACES_PORT_FORWARDING_DOMAIN"),
            file_url: read_config().and_then(|config| config.api_base_url),
        }
    }
}

pub fn resolve_base_url(sources: &UrlSources) -> String {
    let explicit = [&sources.cli_url, &sources.env_url]
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
        .cloned();
    if let Some(url) = explicit {
        return normalize_base_url(&url);
    }

    if let Some(name) = sources.codespace.as_deref().filter(|name| !name.trim().is_empty()) {
        let domain = sources
            .forwarding_domain
            .as_deref()
            .unwrap_or(DEFAULT_FORWARDING_DOMAIN);
        return codespace_url(name.trim(), domain);
    }

    sources
        .file_url
        .as_deref()
        .filter(|url| !url.trim().is_empty())
        .map(normalize_base_url)
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

pub fn codespace_url(name: &str, domain: &str) -> String {
    format!("https://{name}-{BACKEND_PORT}.{domain}/api/")
}

/// Endpoint paths are joined onto the base, so it must end with `/`.
pub fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    }
}

pub fn read_theme() -> Option<ThemePreference> {
    read_config().and_then(|config| config.theme)
}

pub fn write_theme(theme: ThemePreference) -> Result<(), io::Error> {
    let mut config = read_config().unwrap_or_default();
    config.theme = Some(theme);
    write_config(&config)
}

pub fn default_log_path() -> Option<PathBuf> {
    let mut path = dirs::home_dir()?;
    path.push(".octofit.log");
    Some(path)
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn config_path() -> Option<PathBuf> {
    let mut path = dirs::home_dir()?;
    path.push(".octofit.json");
    Some(path)
}

fn read_config() -> Option<Config> {
    let path = config_path()?;
    let contents = fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}

fn write_config(config: &Config) -> Result<(), io::Error> {
    let path = config_path()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Home directory not found"))?;
    let json = serde_json::to_string_pretty(config).map_err(io::Error::other)?;
    fs::write(path, json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_url_wins() {
        let sources = UrlSources {
            cli_url: Some("http://cli:9000/api".to_string()),
            env_url: Some("http://env/api/".to_string()),
            codespace: Some("box".to_string()),
            forwarding_domain: None,
            file_url: Some("http://file/api/".to_string()),
        };
        assert_eq!(resolve_base_url(&sources), "http://cli:9000/api/");
    }

    #[test]
    fn env_url_beats_codespace() {
        let sources = UrlSources {
            env_url: Some("http://env/api/".to_string()),
            codespace: Some("box".to_string()),
            ..UrlSources::default()
        };
        assert_eq!(resolve_base_url(&sources), "http://env/api/");
    }

    #[test]
    fn codespace_name_derives_forwarded_url() {
        let sources = UrlSources {
            codespace: Some("fuzzy-space-robot".to_string()),
            file_url: Some("http://file/api/".to_string()),
            ..UrlSources::default()
        };
        assert_eq!(
            resolve_base_url(&sources),
            "https://fuzzy-space-robot-8000.app.github.dev/api/"
        );
    }

    #[test]
    fn codespace_honors_forwarding_domain() {
        let sources = UrlSources {
            codespace: Some("box".to_string()),
            forwarding_domain: Some("preview.app.github.dev".to_string()),
            ..UrlSources::default()
        };
        assert_eq!(
            resolve_base_url(&sources),
            "https://box-8000.preview.app.github.dev/api/"
        );
    }

    #[test]
    fn falls_back_to_file_then_default() {
        let sources = UrlSources {
            file_url: Some("http://saved:8000/api".to_string()),
            cli_url: Some("  ".to_string()),
            ..UrlSources::default()
        };
        assert_eq!(resolve_base_url(&sources), "http://saved:8000/api/");
        assert_eq!(resolve_base_url(&UrlSources::default()), DEFAULT_API_URL);
    }

    #[test]
    fn theme_cycles_through_all_variants() {
        let start = ThemePreference::Terminal;
        assert_eq!(start.next().next().next(), start);
    }

    #[test]
    fn config_file_round_trips_theme() {
        let config = Config {
            theme: Some(ThemePreference::Dark),
            api_base_url: None,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"theme":"dark"}"#);
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.theme, Some(ThemePreference::Dark));
    }
}
