use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Address of the save endpoint. Without one there is no trigger.
    #[serde(default)]
    pub save_url: Option<String>,
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,
    /// socks and http proxy, example: socks5://192.168.0.2:10080
    #[serde(default)]
    pub proxy: Option<String>,
    #[serde(default)]
    pub log_file: Option<String>,
}

fn default_download_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Config {
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Like `from_file`, but a missing file yields the defaults.
    pub fn load_or_default(path: &str) -> anyhow::Result<Self> {
        if !Path::new(path).exists() {
            return Ok(Config {
                download_dir: default_download_dir(),
                ..Config::default()
            });
        }
        Self::from_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_full_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "save_url: http://localhost:5000/save\ndownload_dir: /tmp/out\nproxy: socks5://127.0.0.1:1080\nlog_file: contribute.log"
        )
        .unwrap();

        let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.save_url.as_deref(), Some("http://localhost:5000/save"));
        assert_eq!(config.download_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.proxy.as_deref(), Some("socks5://127.0.0.1:1080"));
        assert_eq!(config.log_file.as_deref(), Some("contribute.log"));
    }

    #[test]
    fn test_defaults_apply() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "save_url: http://localhost/save").unwrap();

        let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.download_dir, PathBuf::from("."));
        assert!(config.proxy.is_none());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");

        let config = Config::load_or_default(path.to_str().unwrap()).unwrap();
        assert!(config.save_url.is_none());
        assert_eq!(config.download_dir, PathBuf::from("."));
    }

    #[test]
    fn test_malformed_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "save_url: [unclosed").unwrap();

        assert!(Config::load_or_default(file.path().to_str().unwrap()).is_err());
    }
}
