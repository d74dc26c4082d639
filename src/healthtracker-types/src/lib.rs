pub mod profile;
pub mod sleep;
pub mod workouts;
