/**
 * PROPRIÉTÉS SYSTÈME - Collecte des propriétés de la machine locale
 *
 * RÔLE : Construit le document servi par GET /properties : identité de la
 * machine (hostname, OS, noyau, architecture) + ressources + processus courant.
 *
 * FONCTIONNEMENT : collecte via sysinfo/gethostname à chaque requête,
 * clés pointées stables pour les consommateurs (dashboard, scout des pairs).
 */

use crate::models::PropertySet;
use gethostname::gethostname;
use sysinfo::System;

pub fn collect_properties() -> PropertySet {
    let mut sys = System::new();
    sys.refresh_cpu_usage();
    sys.refresh_memory();

    let mut props = PropertySet::new();
    props.insert("hostname".into(), gethostname().to_string_lossy().to_string());
    props.insert(
        "os.name".into(),
        System::name().unwrap_or_else(|| std::env::consts::OS.to_string()),
    );
    if let Some(version) = System::os_version() {
        props.insert("os.version".into(), version);
    }
    if let Some(kernel) = System::kernel_version() {
        props.insert("os.kernel".into(), kernel);
    }
    props.insert("os.arch".into(), std::env::consts::ARCH.to_string());
    props.insert("cpu.count".into(), sys.cpus().len().to_string());
    props.insert("memory.total_mb".into(), (sys.total_memory() / 1024 / 1024).to_string());

    if let Ok(user) = std::env::var("USER").or_else(|_| std::env::var("USERNAME")) {
        props.insert("user.name".into(), user);
    }
    if let Ok(dir) = std::env::current_dir() {
        props.insert("user.dir".into(), dir.to_string_lossy().to_string());
    }

    props.insert("process.pid".into(), std::process::id().to_string());
    props.insert("service.name".into(), env!("CARGO_PKG_NAME").to_string());
    props.insert("service.version".into(), env!("CARGO_PKG_VERSION").to_string());
    props
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn properties_document_is_never_empty() {
        let props = collect_properties();
        assert!(!props.is_empty());
        assert!(props.contains_key("hostname"));
        assert!(props.contains_key("os.name"));
        assert!(props.contains_key("os.arch"));
        assert!(props.contains_key("service.version"));
    }

    #[test]
    fn pid_is_numeric() {
        let props = collect_properties();
        assert!(props["process.pid"].parse::<u32>().is_ok());
    }
}
