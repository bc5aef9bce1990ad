pub mod direction;
pub mod item;
pub mod payload;
pub mod position;
pub mod record;
