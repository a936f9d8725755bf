mod list;
mod reload;
mod simulate;
mod spawn;

pub use list::List;
pub use reload::Reload;
pub use simulate::Simulate;
pub use spawn::Spawn;
