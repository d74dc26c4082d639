pub mod sleep;
pub mod workouts;
