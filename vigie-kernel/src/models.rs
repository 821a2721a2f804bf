use std::collections::HashMap;
use time::OffsetDateTime;

/// Propriétés enregistrées d'une machine, clés pointées ("os.name", "user.dir"...)
pub type PropertySet = HashMap<String, String>;

#[derive(Debug, Clone)]
pub struct InventoryRecord {
    pub hostname: String,
    pub properties: PropertySet,
    pub collected_at: OffsetDateTime,
}

pub type InventoryMap = HashMap<String, InventoryRecord>;
