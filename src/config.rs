use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Настройки процесса. Тайминги цикла фиксированы и сюда не входят.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
                filter: "mouse_follows_focus=info".to_string(),
            },
        }
    }
}

impl Config {
    /// Загрузка из TOML (файл может отсутствовать) с переопределением через `MFF_*`
    pub fn load<P: AsRef<Path>>(config_path: P) -> Result<Self> {
        let config_path = config_path.as_ref();

        Self::from_figment(
            Figment::from(Serialized::defaults(Config::default()))
                .merge(Toml::file(config_path))
                .merge(Env::prefixed("MFF_").split("__")),
        )
        .with_context(|| format!("Не удалось загрузить конфигурацию из {:?}", config_path))
    }

    fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Неверный уровень логирования: {}", self.logging.level),
        }

        match self.logging.format.as_str() {
            "pretty" | "json" => {}
            _ => anyhow::bail!("Неверный формат логирования: {}", self.logging.format),
        }

        if self.logging.filter.trim().is_empty() {
            anyhow::bail!("logging.filter не может быть пустым");
        }

        Ok(())
    }

    /// Директива для EnvFilter: уровень из CLI имеет приоритет над файлом
    pub fn filter_directive(&self, level_override: Option<&str>) -> String {
        match level_override {
            Some(level) => format!("{},mouse_follows_focus={}", self.logging.level, level),
            None => format!("{},{}", self.logging.level, self.logging.filter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn figment_from_toml(toml: &str) -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Toml::string(toml))
    }

    #[test]
    fn test_default_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = Config::load("/nonexistent/mouse-follows-focus.toml").unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_partial_toml_overrides_defaults() {
        let config = Config::from_figment(figment_from_toml(
            r#"
            [logging]
            format = "json"
            "#,
        ))
        .unwrap();

        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_level_rejected() {
        let result = Config::from_figment(figment_from_toml(
            r#"
            [logging]
            level = "loud"
            "#,
        ));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_format_rejected() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_filter_directive_prefers_override() {
        let config = Config::default();
        assert_eq!(config.filter_directive(None), "info,mouse_follows_focus=info");
        assert_eq!(
            config.filter_directive(Some("trace")),
            "info,mouse_follows_focus=trace"
        );
    }
}
