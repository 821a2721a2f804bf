/**
 * VIGIE KERNEL - Point d'entrée du service d'inventaire du parc
 *
 * RÔLE : Orchestration des modules : config, inventaire, scout, HTTP, health.
 * Bootstrap du service avec gestion d'erreurs et logging.
 *
 * ARCHITECTURE : API REST + scout HTTP périodique + inventaire mémoire partagé.
 * UTILITÉ : Une instance par machine du parc ; chacune expose ses propriétés
 * locales sur /properties et inventorie celles de ses pairs sur /systems.
 */

mod client;
mod config;
mod health;
mod http;
mod inventory;
mod models;
mod state;
mod system;

use crate::client::SystemClient;
use crate::config::load_config;
use crate::health::HealthTracker;
use crate::inventory::InventoryManager;
use crate::state::{new_state, AppState};

use std::net::SocketAddr;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    // Charger les variables d'environnement depuis .env (si présent)
    dotenvy::dotenv().ok(); // Ok si .env n'existe pas

    // config partagée
    let cfg_loaded = load_config().await;
    let listen_port = std::env::var("VIGIE_LISTEN_PORT")
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(cfg_loaded.listen_port);
    let cfg = new_state(cfg_loaded.clone());

    // inventaire + health tracker
    let inventory = InventoryManager::new();
    let health_tracker = HealthTracker::new();

    // client HTTP vers les pairs
    let client = match SystemClient::new() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("[kernel] failed to create HTTP client: {e}");
            std::process::exit(1);
        }
    };

    // le scout remplit l'inventaire en arrière-plan
    if cfg_loaded.hosts.is_empty() {
        println!("[kernel] aucun pair déclaré, inventaire vide au démarrage");
    }
    inventory::spawn_inventory_scout(
        cfg_loaded,
        inventory.clone(),
        client,
        health_tracker.clone(),
    );

    // fabrique l'état unique pour Axum
    let app_state = AppState { cfg, inventory, health_tracker };

    // HTTP
    let app = http::build_router(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], listen_port));
    println!("[kernel] listening on http://{addr}");
    let listener = TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
