//! `SeaORM` entities for the healthtracker database.

pub mod prelude;

pub mod packets;
pub mod sleep;
pub mod workouts;
