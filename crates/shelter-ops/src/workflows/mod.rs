pub mod adoption;
pub mod inventory;
