// appinfosync/src/config/mod.rs
use clap::Parser;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

use crate::errors::{AppError, Result};

pub const DEFAULT_LOOKUP_URL: &str = "https://itunes.apple.com";

/// Read App Store apps in the JSS and update their information with the latest data from iTunes.
#[derive(Debug, Parser)]
#[command(
    name = "appinfosync",
    version,
    arg_required_else_help = true,
    after_help = "Example usage:
  $ appinfosync https://jss.myorg.com
  $ appinfosync https://jss.myorg.com --skip-descriptions
  $ appinfosync https://jss.myorg.com -u username -p pass"
)]
pub struct Cli {
    /// JSS URL
    #[arg(value_name = "SERVER_URL")]
    pub server_url: Option<String>,

    /// Do not update descriptions
    #[arg(short = 'd', long)]
    pub skip_descriptions: bool,

    /// API username
    #[arg(short, long)]
    pub username: Option<String>,

    /// API user password
    #[arg(short, long)]
    pub password: Option<String>,

    /// JSON file with server_url, username, skip_descriptions and lookup_url
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Base URL of the app store lookup service
    #[arg(long, env = "APPSTORE_LOOKUP_URL", value_name = "URL")]
    pub lookup_url: Option<String>,
}

// Structs for deserializing the optional config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub server_url: Option<String>,
    pub username: Option<String>,
    pub skip_descriptions: Option<bool>,
    pub lookup_url: Option<String>,
    // Only here so a stray password key can be refused.
    password: Option<serde_json::Value>,
}

impl FileConfig {
    pub fn load_from_json(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path)?;
        let file_config: FileConfig = serde_json::from_str(&content)?;
        if file_config.password.is_some() {
            return Err(AppError::Config(format!(
                "{} contains a password; pass it with --password or at the prompt instead",
                config_path.display()
            )));
        }
        Ok(file_config)
    }
}

pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }

    /// `username:password`, the payload of a Basic Authorization header.
    pub fn joined(&self) -> String {
        format!("{}:{}", self.username, self.password.expose_secret())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Everything a run needs, resolved once and handed to each client by reference.
#[derive(Debug)]
pub struct SyncConfig {
    pub server_url: String,
    pub credentials: Credentials,
    pub skip_descriptions: bool,
    pub lookup_url: String,
}

/// Source of credentials the command line left out.
pub trait CredentialPrompt {
    fn username(&mut self) -> Result<String>;
    fn password(&mut self) -> Result<SecretString>;
}

/// Asks on the terminal: username echoed, password masked.
pub struct TerminalPrompt;

impl CredentialPrompt for TerminalPrompt {
    fn username(&mut self) -> Result<String> {
        use std::io::{Write, stdin, stdout};

        print!("API Username: ");
        stdout().flush()?;
        let mut input = String::new();
        if stdin().read_line(&mut input)? == 0 {
            return Err(AppError::Prompt("username"));
        }
        Ok(input.trim().to_string())
    }

    fn password(&mut self) -> Result<SecretString> {
        let password =
            rpassword::prompt_password("API Password: ").map_err(|_| AppError::Prompt("password"))?;
        Ok(SecretString::from(password))
    }
}

impl SyncConfig {
    /// Merges flags, environment and the optional config file, prompting for
    /// whatever credential is still missing.
    pub fn resolve(cli: Cli, prompt: &mut impl CredentialPrompt) -> Result<Self> {
        let file_config = match &cli.config {
            Some(path) => FileConfig::load_from_json(path)?,
            None => FileConfig::default(),
        };

        let raw_url = cli
            .server_url
            .or(file_config.server_url)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AppError::Config("the server URL is required".to_string()))?;
        let server_url = clean_url(&raw_url)?;

        let lookup_url = cli
            .lookup_url
            .or(file_config.lookup_url)
            .unwrap_or_else(|| DEFAULT_LOOKUP_URL.to_string());
        let lookup_url = validate_url(lookup_url.trim().trim_end_matches('/'))?;

        let skip_descriptions = cli.skip_descriptions || file_config.skip_descriptions.unwrap_or(false);

        let username = match cli.username.or(file_config.username) {
            Some(username) => username,
            None => prompt.username()?,
        };
        let password = match cli.password {
            Some(password) => SecretString::from(password),
            None => prompt.password()?,
        };

        Ok(SyncConfig {
            server_url,
            credentials: Credentials::new(username, password),
            skip_descriptions,
            lookup_url,
        })
    }
}

/// Strips trailing slashes and prefixes `https://` when no scheme is given.
pub fn normalize_server_url(url: &str) -> String {
    let cleaned_url = url.trim().trim_end_matches('/');
    if cleaned_url.starts_with("http://") || cleaned_url.starts_with("https://") {
        cleaned_url.to_string()
    } else {
        tracing::warn!("valid prefix for server url not found: prefixing with https://");
        format!("https://{}", cleaned_url)
    }
}

fn clean_url(url: &str) -> Result<String> {
    validate_url(&normalize_server_url(url))
}

fn validate_url(url: &str) -> Result<String> {
    let parsed = Url::parse(url)?;
    if parsed.host_str().is_none() {
        return Err(AppError::InvalidUrl(url::ParseError::EmptyHost));
    }
    Ok(url.to_string())
}
