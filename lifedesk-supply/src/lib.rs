//! lifedesk-supply: supplement run-out projection, inventory ordering and restock tasks

pub mod inventory;
pub mod projector;
pub mod restock;

pub use inventory::{Projected, Supplement, count_low_stock, load_inventory, project_all, sort_by_urgency};
pub use projector::{
    Projection, ReorderAdvice, ReorderUrgency, SupplyStatus, consumption_rate_label, progress_percent,
    project, reorder_advice,
};
pub use restock::RestockEmitter;
