use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ServiceConfig {
    pub listen_port: u16,
    pub system_port: u16,
    pub in_maintenance: bool,
    pub contact_email: String,
    pub hosts: Vec<String>,
    pub scout: ScoutConf,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ScoutConf {
    pub interval_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_port: 9080,
            system_port: 9080,
            in_maintenance: false,
            contact_email: "admin@guides.vigie.fr".into(),
            hosts: Vec::new(),
            scout: ScoutConf::default(),
        }
    }
}

impl Default for ScoutConf {
    fn default() -> Self {
        Self { interval_secs: 30 }
    }
}

pub async fn load_config() -> ServiceConfig {
    let path = std::env::var("VIGIE_KERNEL_CONFIG").unwrap_or_else(|_| "vigie.yaml".into());
    load_config_from(&path).await
}

pub async fn load_config_from(path: &str) -> ServiceConfig {
    if Path::new(path).exists() {
        let txt = fs::read_to_string(path).await.unwrap_or_default();
        if txt.trim().is_empty() {
            return ServiceConfig::default();
        }
        serde_yaml::from_str(&txt).unwrap_or_else(|e| {
            eprintln!("[config] config invalide: {e}");
            ServiceConfig::default()
        })
    } else {
        eprintln!("[config] pas de {path}, usage config par défaut");
        ServiceConfig::default()
    }
}

/// Valeurs relues à CHAQUE requête : les variables d'environnement priment
/// sur le fichier, aucune mise en cache entre deux requêtes.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSnapshot {
    pub in_maintenance: bool,
    pub contact_email: String,
    pub port_number: u16,
}

impl ConfigSnapshot {
    pub fn capture(base: &ServiceConfig) -> Self {
        Self::overlay(base, |key| std::env::var(key).ok())
    }

    fn overlay(base: &ServiceConfig, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let in_maintenance = lookup("VIGIE_IN_MAINTENANCE")
            .and_then(|v| parse_bool(&v))
            .unwrap_or(base.in_maintenance);
        let contact_email = lookup("VIGIE_CONTACT_EMAIL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| base.contact_email.clone());
        let port_number = lookup("VIGIE_SYSTEM_PORT")
            .and_then(|v| v.trim().parse::<u16>().ok())
            .unwrap_or(base.system_port);
        Self { in_maintenance, contact_email, port_number }
    }
}

// Valeur illisible = on garde la valeur du fichier
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn default_config_values() {
        let cfg = ServiceConfig::default();
        assert_eq!(cfg.listen_port, 9080);
        assert_eq!(cfg.system_port, 9080);
        assert!(!cfg.in_maintenance);
        assert_eq!(cfg.scout.interval_secs, 30);
        assert!(cfg.hosts.is_empty());
    }

    #[tokio::test]
    async fn yaml_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vigie.yaml");
        let yaml = "in_maintenance: true\n\
                    contact_email: ops@parc.example\n\
                    hosts:\n  - alpha\n  - beta\n\
                    scout:\n  interval_secs: 5\n";
        tokio::fs::write(&path, yaml).await.unwrap();

        let cfg = load_config_from(path.to_str().unwrap()).await;
        assert!(cfg.in_maintenance);
        assert_eq!(cfg.contact_email, "ops@parc.example");
        assert_eq!(cfg.hosts, vec!["alpha".to_string(), "beta".to_string()]);
        assert_eq!(cfg.scout.interval_secs, 5);
        // non précisé dans le fichier : défaut
        assert_eq!(cfg.listen_port, 9080);
    }

    #[tokio::test]
    async fn invalid_yaml_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vigie.yaml");
        tokio::fs::write(&path, "hosts: {pas une liste").await.unwrap();

        let cfg = load_config_from(path.to_str().unwrap()).await;
        assert_eq!(cfg.contact_email, ServiceConfig::default().contact_email);
        assert!(!cfg.in_maintenance);
    }

    #[tokio::test]
    async fn missing_file_falls_back_to_defaults() {
        let cfg = load_config_from("/nonexistent/vigie.yaml").await;
        assert_eq!(cfg.listen_port, ServiceConfig::default().listen_port);
    }

    #[test]
    fn snapshot_uses_base_without_overrides() {
        let base = ServiceConfig::default();
        let snapshot = ConfigSnapshot::overlay(&base, |_| None);
        assert!(!snapshot.in_maintenance);
        assert_eq!(snapshot.contact_email, base.contact_email);
        assert_eq!(snapshot.port_number, 9080);
    }

    #[test]
    fn environment_beats_file_base() {
        let base = ServiceConfig::default();
        let mut vars = HashMap::new();
        vars.insert("VIGIE_IN_MAINTENANCE", "true");
        vars.insert("VIGIE_CONTACT_EMAIL", "urgence@parc.example");
        vars.insert("VIGIE_SYSTEM_PORT", "9081");

        let snapshot = ConfigSnapshot::overlay(&base, |k| vars.get(k).map(|v| v.to_string()));
        assert!(snapshot.in_maintenance);
        assert_eq!(snapshot.contact_email, "urgence@parc.example");
        assert_eq!(snapshot.port_number, 9081);
    }

    #[test]
    fn malformed_overrides_fall_back_to_base() {
        let base = ServiceConfig { in_maintenance: true, ..ServiceConfig::default() };
        let mut vars = HashMap::new();
        vars.insert("VIGIE_IN_MAINTENANCE", "peut-etre");
        vars.insert("VIGIE_SYSTEM_PORT", "pas-un-port");
        vars.insert("VIGIE_CONTACT_EMAIL", "   ");

        let snapshot = ConfigSnapshot::overlay(&base, |k| vars.get(k).map(|v| v.to_string()));
        assert!(snapshot.in_maintenance);
        assert_eq!(snapshot.port_number, base.system_port);
        assert_eq!(snapshot.contact_email, base.contact_email);
    }

    #[test]
    fn parse_bool_accepts_usual_spellings() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool("FALSE"), Some(false));
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("peut-etre"), None);
    }
}
