use std::collections::HashMap;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::database::DatabaseConfig;

/// ConfigError は設定読み込みのエラーを表す。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read file: {0}")]
    ReadFile(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),
    #[error("validation error: {0}")]
    Validation(String),
}

/// Config はアプリケーション全体の設定を表す。
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub app: AppConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    pub auth: AuthConfig,
    #[serde(default)]
    pub changes_log: ChangesLogConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// AppConfig はアプリケーション基本設定を表す。
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

fn default_environment() -> String {
    "dev".to_string()
}

/// ServerConfig はサーバー設定を表す。
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// AuthConfig は認証設定を表す。
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub jwt: JwtConfig,
}

/// JwtConfig は HS256 トークン検証の設定。
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub issuer: String,
    pub audience: String,
    pub secret: SecretString,
}

/// ChangesLogConfig は変更ログの記録対象を表す。
/// `tracked_properties` はエンティティ種別から追跡するプロパティ名への対応。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChangesLogConfig {
    #[serde(default)]
    pub tracked_properties: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default)]
    pub log: LogConfig,
}

/// LogConfig はログ出力の設定。`level` を省略すると環境名から決める。
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: None,
            format: default_log_format(),
        }
    }
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Config {
    /// YAML 文字列から設定を読み込む。
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// YAML を読み込み Config を返す。env_path があればマージする。
    pub fn load(base_path: &str, env_path: Option<&str>) -> Result<Self, ConfigError> {
        let base = std::fs::read_to_string(base_path)?;
        let mut value: serde_yaml::Value = serde_yaml::from_str(&base)?;

        if let Some(env) = env_path {
            let env_data = std::fs::read_to_string(env)?;
            let overlay: serde_yaml::Value = serde_yaml::from_str(&env_data)?;
            merge_yaml(&mut value, &overlay);
        }

        let config: Config = serde_yaml::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// 設定値のバリデーション。
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.app.name.is_empty() {
            return Err(ConfigError::Validation("app.name is required".to_string()));
        }
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port must be > 0".to_string(),
            ));
        }
        if self.auth.jwt.secret.expose_secret().is_empty() {
            return Err(ConfigError::Validation(
                "auth.jwt.secret is required".to_string(),
            ));
        }
        if let Some(ref db) = self.database {
            db.conn_max_lifetime().map_err(|e| {
                ConfigError::Validation(format!(
                    "database.conn_max_lifetime is not a valid duration ({}): {e}",
                    db.conn_max_lifetime
                ))
            })?;
            if db.max_idle_conns > db.max_open_conns {
                return Err(ConfigError::Validation(format!(
                    "database.max_idle_conns ({}) must not exceed max_open_conns ({})",
                    db.max_idle_conns, db.max_open_conns
                )));
            }
        }
        if let Some((entity_type, _)) = self
            .changes_log
            .tracked_properties
            .iter()
            .find(|(_, properties)| properties.iter().any(String::is_empty))
        {
            return Err(ConfigError::Validation(format!(
                "changes_log.tracked_properties.{entity_type} contains an empty property name"
            )));
        }
        if !matches!(self.observability.log.format.as_str(), "json" | "text") {
            return Err(ConfigError::Validation(format!(
                "observability.log.format must be json or text: {}",
                self.observability.log.format
            )));
        }
        Ok(())
    }
}

/// overlay の値で base を再帰的に上書きする。
fn merge_yaml(base: &mut serde_yaml::Value, overlay: &serde_yaml::Value) {
    match (base, overlay) {
        (serde_yaml::Value::Mapping(base_map), serde_yaml::Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                if let Some(base_value) = base_map.get_mut(key) {
                    merge_yaml(base_value, value);
                } else {
                    base_map.insert(key.clone(), value.clone());
                }
            }
        }
        (base, overlay) => {
            *base = overlay.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const BASE_YAML: &str = r#"
app:
  name: "oos-identity-server"
  environment: "dev"
server:
  port: 8080
auth:
  jwt:
    issuer: "oos"
    audience: "oos-api"
    secret: "dev-secret"
changes_log:
  tracked_properties:
    Provider: ["FullTitle", "EdrpouIpn", "Director", "LegalAddress"]
    PermissionsForRole: ["RoleName", "PackedPermissions"]
"#;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_config_from_yaml() {
        let config = Config::from_yaml(BASE_YAML).unwrap();
        assert_eq!(config.app.name, "oos-identity-server");
        assert_eq!(config.app.version, "0.1.0");
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.database.is_none());
        assert_eq!(config.auth.jwt.secret.expose_secret(), "dev-secret");
        assert_eq!(config.changes_log.tracked_properties["Provider"].len(), 4);
        assert_eq!(config.observability.log.format, "json");
        assert!(config.observability.log.level.is_none());
    }

    #[test]
    fn test_config_missing_secret_is_invalid() {
        let yaml = BASE_YAML.replace("\"dev-secret\"", "\"\"");
        let err = Config::from_yaml(&yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_config_invalid_log_format() {
        let yaml = format!("{BASE_YAML}observability:\n  log:\n    format: \"xml\"\n");
        let err = Config::from_yaml(&yaml).unwrap_err();
        assert!(err.to_string().contains("observability.log.format"));
    }

    fn with_database(extra: &str) -> String {
        format!(
            "{BASE_YAML}database:\n  host: \"localhost\"\n  port: 5432\n  name: \"oos_identity\"\n  user: \"app\"\n{extra}"
        )
    }

    #[test]
    fn test_config_overflowing_conn_max_lifetime_is_invalid() {
        let yaml = with_database("  conn_max_lifetime: \"307445734561825861m\"\n");
        let err = Config::from_yaml(&yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("database.conn_max_lifetime"));
    }

    #[test]
    fn test_config_idle_conns_above_open_conns_is_invalid() {
        let yaml = with_database("  max_open_conns: 4\n  max_idle_conns: 8\n");
        let err = Config::from_yaml(&yaml).unwrap_err();
        assert!(err.to_string().contains("database.max_idle_conns"));
    }

    #[test]
    fn test_config_with_database_defaults_is_valid() {
        let config = Config::from_yaml(&with_database("")).unwrap();
        let db = config.database.unwrap();
        assert_eq!(
            db.conn_max_lifetime().unwrap(),
            std::time::Duration::from_secs(300)
        );
    }

    #[test]
    fn test_load_merges_env_overlay() {
        let base = write_temp(BASE_YAML);
        let overlay = write_temp(
            r#"
app:
  environment: "prod"
database:
  host: "db.internal"
  port: 5432
  name: "oos_identity"
  user: "app"
observability:
  log:
    level: "info"
"#,
        );

        let config = Config::load(
            base.path().to_str().unwrap(),
            Some(overlay.path().to_str().unwrap()),
        )
        .unwrap();
        assert_eq!(config.app.environment, "prod");
        assert_eq!(config.app.name, "oos-identity-server");
        assert_eq!(config.database.unwrap().host, "db.internal");
        assert_eq!(config.observability.log.level.as_deref(), Some("info"));
        assert_eq!(config.auth.jwt.issuer, "oos");
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load("/nonexistent/config.yaml", None).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile(_)));
    }

    #[test]
    fn test_merge_yaml_replaces_scalars_and_sequences() {
        let mut base: serde_yaml::Value =
            serde_yaml::from_str("a: 1\nlist: [1, 2]\nnested:\n  keep: true\n").unwrap();
        let overlay: serde_yaml::Value =
            serde_yaml::from_str("a: 2\nlist: [3]\nnested:\n  added: x\n").unwrap();
        merge_yaml(&mut base, &overlay);
        assert_eq!(base["a"], serde_yaml::Value::from(2));
        assert_eq!(base["list"].as_sequence().unwrap().len(), 1);
        assert_eq!(base["nested"]["keep"], serde_yaml::Value::from(true));
        assert_eq!(base["nested"]["added"], serde_yaml::Value::from("x"));
    }
}
