mod inventory;
mod risk;

pub use inventory::InventoryCommands;
pub use risk::RiskCommands;
