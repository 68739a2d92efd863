//! Configuration management for docsite.
//!
//! Parses `docsite.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.url`
//! - `site.default_author`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "docsite.toml";

/// Default time-to-live for cached content in development mode.
const DEV_CACHE_EXPIRATION: Duration = Duration::from_secs(5 * 60);

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override content root directory.
    pub content_root: Option<PathBuf>,
    /// Override docs spec file.
    pub docs_spec: Option<PathBuf>,
    /// Override public output directory.
    pub public_dir: Option<PathBuf>,
    /// Override content mode.
    pub mode: Option<ContentMode>,
    /// Override canonical site URL.
    pub site_url: Option<String>,
    /// Override cache enabled flag.
    pub cache_enabled: Option<bool>,
}

/// Where content is read from at runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentMode {
    /// Raw `.mdx` sources under `/content`.
    #[serde(alias = "dev")]
    Development,
    /// Preprocessed JSON under `/static/content`.
    #[default]
    #[serde(alias = "prod")]
    Production,
}

impl ContentMode {
    #[must_use]
    pub fn is_dev(self) -> bool {
        self == Self::Development
    }
}

impl std::str::FromStr for ContentMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(ConfigError::Validation(format!(
                "unknown content mode '{other}' (expected development or production)"
            ))),
        }
    }
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site identity.
    pub site: SiteConfig,
    /// Content locations (paths are relative strings from TOML).
    content: ContentConfigRaw,
    /// Output locations (paths are relative strings from TOML).
    output: OutputConfigRaw,
    /// Content cache settings.
    pub cache: CacheConfig,

    /// Resolved paths (set after loading).
    #[serde(skip)]
    pub paths: PathsConfig,
    /// Resolved content mode (set after loading).
    #[serde(skip)]
    pub mode: ContentMode,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Site identity used in generated URLs and metadata defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Canonical site URL, without trailing slash.
    pub url: String,
    /// Author used for blog posts that do not name one.
    pub default_author: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: "https://mirascope.com".to_owned(),
            default_author: "Mirascope Team".to_owned(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    root: Option<String>,
    docs_spec: Option<String>,
    docs_dir: Option<String>,
    templates_dir: Option<String>,
    llms_meta: Option<String>,
    mode: Option<ContentMode>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    public_dir: Option<String>,
    llms_dir: Option<String>,
}

/// Resolved content and output paths.
#[derive(Debug, Default, Clone)]
pub struct PathsConfig {
    /// Root of authored content (`blog/`, `doc/`, `policy/`, `dev/`).
    pub content_root: PathBuf,
    /// Documentation tree definition (JSON or YAML).
    pub docs_spec: PathBuf,
    /// Directory holding documentation `.mdx` sources.
    pub docs_dir: PathBuf,
    /// Directory holding LLM templates.
    pub templates_dir: PathBuf,
    /// LLM document directives (JSON or YAML).
    pub llms_meta: PathBuf,
    /// Public output directory.
    pub public_dir: PathBuf,
    /// Output directory for generated LLM documents.
    pub llms_dir: PathBuf,
}

impl PathsConfig {
    /// Source directory for one content type (`content/blog`, `content/policy`).
    #[must_use]
    pub fn source_dir(&self, content_type: &str) -> PathBuf {
        self.content_root.join(content_type)
    }

    /// Preprocessed static content (`public/static`).
    #[must_use]
    pub fn static_dir(&self) -> PathBuf {
        self.public_dir.join("static")
    }
}

/// Content cache configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether caching is enabled.
    pub enabled: bool,
    /// Maximum number of cached entries.
    pub max_size: usize,
    /// Entry lifetime in seconds; `0` disables expiry.
    ///
    /// When unset, development mode expires entries after five minutes and
    /// production mode keeps them until evicted.
    pub expiration_secs: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_size: 100,
            expiration_secs: None,
        }
    }
}

impl CacheConfig {
    /// Effective entry lifetime for the given mode. `None` means never expire.
    #[must_use]
    pub fn expiration(&self, mode: ContentMode) -> Option<Duration> {
        match self.expiration_secs {
            Some(0) => None,
            Some(secs) => Some(Duration::from_secs(secs)),
            None if mode.is_dev() => Some(DEV_CACHE_EXPIRATION),
            None => None,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.url`").
        field: String,
        /// Error message (e.g., "${`SITE_URL`} not set").
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `docsite.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails, or
    /// the final configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(root) = &settings.content_root {
            self.paths.content_root.clone_from(root);
        }
        if let Some(spec) = &settings.docs_spec {
            self.paths.docs_spec.clone_from(spec);
        }
        if let Some(public_dir) = &settings.public_dir {
            self.paths.public_dir.clone_from(public_dir);
        }
        if let Some(mode) = settings.mode {
            self.mode = mode;
        }
        if let Some(url) = &settings.site_url {
            self.site.url.clone_from(url);
        }
        if let Some(enabled) = settings.cache_enabled {
            self.cache.enabled = enabled;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    #[must_use]
    pub fn default_with_base(base: &Path) -> Self {
        let mut config = Self {
            site: SiteConfig::default(),
            content: ContentConfigRaw::default(),
            output: OutputConfigRaw::default(),
            cache: CacheConfig::default(),
            paths: PathsConfig::default(),
            mode: ContentMode::default(),
            config_path: None,
        };
        config.resolve_paths(base);
        config
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site.url, "site.url")?;
        require_http_url(&self.site.url, "site.url")?;
        if self.site.url.ends_with('/') {
            return Err(ConfigError::Validation(
                "site.url must not end with a slash".to_owned(),
            ));
        }
        require_non_empty(&self.site.default_author, "site.default_author")?;

        if self.cache.enabled && self.cache.max_size == 0 {
            return Err(ConfigError::Validation(
                "cache.max_size must be greater than 0 when the cache is enabled".to_owned(),
            ));
        }

        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.site.url = expand::expand_env(&self.site.url, "site.url")?;
        self.site.default_author =
            expand::expand_env(&self.site.default_author, "site.default_author")?;
        expand::expand_opt(&mut self.content.root, "content.root")?;
        expand::expand_opt(&mut self.output.public_dir, "output.public_dir")?;
        Ok(())
    }

    /// Resolve relative paths against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        let content_root = resolve(self.content.root.as_deref(), "content");
        let public_dir = resolve(self.output.public_dir.as_deref(), "public");

        self.paths = PathsConfig {
            docs_spec: resolve(self.content.docs_spec.as_deref(), "content/doc/_meta.yaml"),
            docs_dir: resolve(self.content.docs_dir.as_deref(), "content/doc"),
            templates_dir: resolve(self.content.templates_dir.as_deref(), "content/llms"),
            llms_meta: resolve(
                self.content.llms_meta.as_deref(),
                "content/llms/_llms-meta.yaml",
            ),
            llms_dir: self
                .output
                .llms_dir
                .as_deref()
                .map_or_else(|| public_dir.join("llms"), |dir| config_dir.join(dir)),
            content_root,
            public_dir,
        };
        self.mode = self.content.mode.unwrap_or_default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/site"));
        assert_eq!(config.site.url, "https://mirascope.com");
        assert_eq!(config.site.default_author, "Mirascope Team");
        assert_eq!(config.paths.content_root, PathBuf::from("/site/content"));
        assert_eq!(
            config.paths.docs_spec,
            PathBuf::from("/site/content/doc/_meta.yaml")
        );
        assert_eq!(config.paths.source_dir("blog"), PathBuf::from("/site/content/blog"));
        assert_eq!(config.paths.static_dir(), PathBuf::from("/site/public/static"));
        assert_eq!(config.paths.llms_dir, PathBuf::from("/site/public/llms"));
        assert_eq!(config.mode, ContentMode::Production);
        assert!(config.cache.enabled);
        assert_eq!(config.cache.max_size, 100);
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.site.url, "https://mirascope.com");
        assert!(config.cache.enabled);
    }

    #[test]
    fn test_parse_mode_aliases() {
        let config: Config = toml::from_str("[content]\nmode = \"dev\"\n").unwrap();
        assert_eq!(config.content.mode, Some(ContentMode::Development));

        let config: Config = toml::from_str("[content]\nmode = \"production\"\n").unwrap();
        assert_eq!(config.content.mode, Some(ContentMode::Production));
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(
            "development".parse::<ContentMode>().unwrap(),
            ContentMode::Development
        );
        assert_eq!("prod".parse::<ContentMode>().unwrap(), ContentMode::Production);
        assert!("staging".parse::<ContentMode>().is_err());
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[content]
root = "src-content"
docs_spec = "meta/docs.json"
mode = "development"

[output]
public_dir = "dist"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.paths.content_root, PathBuf::from("/project/src-content"));
        assert_eq!(config.paths.docs_spec, PathBuf::from("/project/meta/docs.json"));
        assert_eq!(config.paths.public_dir, PathBuf::from("/project/dist"));
        assert_eq!(config.paths.llms_dir, PathBuf::from("/project/dist/llms"));
        assert_eq!(config.mode, ContentMode::Development);
    }

    #[test]
    fn test_cache_expiration_defaults_by_mode() {
        let cache = CacheConfig::default();
        assert_eq!(
            cache.expiration(ContentMode::Development),
            Some(Duration::from_secs(300))
        );
        assert_eq!(cache.expiration(ContentMode::Production), None);
    }

    #[test]
    fn test_cache_expiration_explicit() {
        let cache = CacheConfig {
            expiration_secs: Some(30),
            ..Default::default()
        };
        assert_eq!(
            cache.expiration(ContentMode::Production),
            Some(Duration::from_secs(30))
        );

        let never = CacheConfig {
            expiration_secs: Some(0),
            ..Default::default()
        };
        assert_eq!(never.expiration(ContentMode::Development), None);
    }

    #[test]
    fn test_validate_rejects_non_http_url() {
        let mut config = Config::default_with_base(Path::new("/site"));
        config.site.url = "mirascope.com".to_owned();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("site.url"));
    }

    #[test]
    fn test_validate_rejects_trailing_slash() {
        let mut config = Config::default_with_base(Path::new("/site"));
        config.site.url = "https://mirascope.com/".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_cache_size() {
        let mut config = Config::default_with_base(Path::new("/site"));
        config.cache.max_size = 0;
        assert!(config.validate().is_err());

        config.cache.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/site"));
        let overrides = CliSettings {
            public_dir: Some(PathBuf::from("/out")),
            mode: Some(ContentMode::Development),
            cache_enabled: Some(false),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.paths.public_dir, PathBuf::from("/out"));
        assert_eq!(config.mode, ContentMode::Development);
        assert!(!config.cache.enabled);
        assert_eq!(config.paths.content_root, PathBuf::from("/site/content"));
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let before = Config::default_with_base(Path::new("/site"));
        let mut config = Config::default_with_base(Path::new("/site"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.site.url, before.site.url);
        assert_eq!(config.paths.public_dir, before.paths.public_dir);
        assert_eq!(config.mode, before.mode);
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            "[site]\nurl = \"https://docs.example.com\"\n\n[cache]\nmax_size = 10\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.site.url, "https://docs.example.com");
        assert_eq!(config.cache.max_size, 10);
        assert_eq!(config.paths.content_root, dir.path().join("content"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Some(Path::new("/nonexistent/docsite.toml")), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_expands_site_url() {
        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::set_var("DOCSITE_TEST_SITE_URL", "https://staging.example.com");
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[site]\nurl = \"${DOCSITE_TEST_SITE_URL}\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.site.url, "https://staging.example.com");
        unsafe {
            std::env::remove_var("DOCSITE_TEST_SITE_URL");
        }
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[site\nurl = ").unwrap();

        let result = Config::load(Some(&path), None);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
