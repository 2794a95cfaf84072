pub mod dispatch;

mod collect;
mod inventory;
mod list;
mod risk;
mod shared;
mod stats;
mod violations;
