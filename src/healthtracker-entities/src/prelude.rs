pub use super::packets::Entity as Packets;
pub use super::sleep::Entity as Sleep;
pub use super::workouts::Entity as Workouts;
