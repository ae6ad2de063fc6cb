pub mod entries;
pub mod health;
pub mod logs;
pub mod tags;
pub mod workers;
