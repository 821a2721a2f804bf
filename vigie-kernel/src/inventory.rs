/**
 * INVENTAIRE VIGIE - Registre mémoire des propriétés des machines du parc
 *
 * RÔLE : Conserve, par hostname, le dernier jeu de propriétés collecté.
 * Les handlers HTTP ne font que LIRE ; le scout est le seul écrivain.
 *
 * FONCTIONNEMENT : map partagée (Arc<Mutex>) + tâche de fond qui interroge
 * les pairs déclarés dans la config sur leur endpoint /properties.
 * Un pair injoignable garde sa dernière entrée (marquée stale côté API).
 */

use crate::client::SystemClient;
use crate::config::{ConfigSnapshot, ServiceConfig};
use crate::health::HealthTracker;
use crate::models::{InventoryMap, InventoryRecord, PropertySet};
use crate::state::{new_state, Shared};
use std::collections::HashMap;
use time::OffsetDateTime;
use tokio::task;

#[derive(Clone)]
pub struct InventoryManager {
    store: Shared<InventoryMap>,
}

impl InventoryManager {
    pub fn new() -> Self {
        Self { store: new_state(HashMap::new()) }
    }

    /// Propriétés enregistrées d'une machine, telles quelles
    pub fn get(&self, hostname: &str) -> Option<PropertySet> {
        self.store.lock().get(hostname).map(|r| r.properties.clone())
    }

    /// Instantané complet de l'inventaire, trié par hostname
    pub fn snapshot(&self) -> Vec<InventoryRecord> {
        let mut records: Vec<InventoryRecord> = self.store.lock().values().cloned().collect();
        records.sort_by(|a, b| a.hostname.cmp(&b.hostname));
        records
    }

    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    /// Insertion/remplacement, horodaté à maintenant (réservé au scout)
    pub fn record(&self, hostname: &str, properties: PropertySet) {
        self.record_at(hostname, properties, OffsetDateTime::now_utc());
    }

    fn record_at(&self, hostname: &str, properties: PropertySet, collected_at: OffsetDateTime) {
        let record = InventoryRecord {
            hostname: hostname.to_string(),
            properties,
            collected_at,
        };
        self.store.lock().insert(hostname.to_string(), record);
    }
}

/// Démarre le scout : interroge périodiquement les pairs déclarés et
/// remplit l'inventaire. Pas de collecte pendant la maintenance.
pub fn spawn_inventory_scout(
    base: ServiceConfig,
    inventory: InventoryManager,
    client: SystemClient,
    health_tracker: HealthTracker,
) {
    task::spawn(async move {
        let period = std::time::Duration::from_secs(base.scout.interval_secs.max(1));
        let mut interval = tokio::time::interval(period);

        loop {
            interval.tick().await;

            // La config est recapturée à chaque cycle, comme pour les requêtes
            let snapshot = ConfigSnapshot::capture(&base);
            if snapshot.in_maintenance {
                continue;
            }

            for hostname in &base.hosts {
                match client.fetch_properties(hostname, snapshot.port_number).await {
                    Ok(properties) => inventory.record(hostname, properties),
                    Err(e) => eprintln!("[scout] {hostname} injoignable: {e}"),
                }
            }

            health_tracker.mark_scout_cycle();
            println!(
                "[scout] cycle terminé ({} machines inventoriées)",
                inventory.len()
            );
        }
    });
}
