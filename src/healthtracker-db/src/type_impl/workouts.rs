use healthtracker_algos::WorkoutSession;
use healthtracker_entities::workouts;
use healthtracker_types::workouts::WorkoutRecord;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, EntityTrait, QueryOrder, Set};

use crate::DatabaseHandler;

impl DatabaseHandler {
    /// Stores a finished session and returns the frozen history record.
    pub async fn create_workout(&self, session: &WorkoutSession) -> anyhow::Result<WorkoutRecord> {
        let model = workouts::ActiveModel {
            id: NotSet,
            duration: Set(session.elapsed_seconds),
            steps: Set(i64::try_from(session.step_estimate).unwrap_or(i64::MAX)),
            heart_rate: Set(i32::from(session.last_heart_rate)),
            calories: Set(session.calories),
        };

        let model = model.insert(&self.db).await?;
        Ok(map_workout(model))
    }

    /// All stored workouts, newest first.
    pub async fn get_workouts(&self) -> anyhow::Result<Vec<WorkoutRecord>> {
        let workouts = workouts::Entity::find()
            .order_by_desc(workouts::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(map_workout)
            .collect();

        Ok(workouts)
    }
}

fn map_workout(model: workouts::Model) -> WorkoutRecord {
    WorkoutRecord {
        id: model.id,
        duration_seconds: model.duration,
        steps: model.steps,
        heart_rate: model.heart_rate.try_into().unwrap_or(u16::MAX),
        calories: model.calories,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn session(elapsed_seconds: i64, step_estimate: u64, last_heart_rate: u16) -> WorkoutSession {
        WorkoutSession {
            start_time: NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(7, 30, 0)
                .unwrap(),
            elapsed_seconds,
            step_estimate,
            calories: elapsed_seconds as f64 * 1.5,
            last_heart_rate,
        }
    }

    #[tokio::test]
    async fn create_workout_returns_record() {
        let db = DatabaseHandler::new("sqlite::memory:").await.unwrap();

        let record = db.create_workout(&session(600, 24_000, 130)).await.unwrap();
        assert!(record.id > 0);
        assert_eq!(record.duration_seconds, 600);
        assert_eq!(record.steps, 24_000);
        assert_eq!(record.heart_rate, 130);
        assert_eq!(record.calories, 900.0);
    }

    #[tokio::test]
    async fn workouts_come_back_newest_first() {
        let db = DatabaseHandler::new("sqlite::memory:").await.unwrap();
        for seconds in [60, 120, 180] {
            db.create_workout(&session(seconds, 10, 90)).await.unwrap();
        }

        let workouts = db.get_workouts().await.unwrap();
        let durations = workouts
            .iter()
            .map(|w| w.duration_seconds)
            .collect::<Vec<_>>();
        assert_eq!(durations, vec![180, 120, 60]);
        assert!(workouts[0].id > workouts[1].id);
    }

    #[tokio::test]
    async fn empty_history() {
        let db = DatabaseHandler::new("sqlite::memory:").await.unwrap();
        assert!(db.get_workouts().await.unwrap().is_empty());
    }

    #[test]
    fn map_workout_saturates_heart_rate() {
        let record = map_workout(workouts::Model {
            id: 1,
            duration: 10,
            steps: 5,
            heart_rate: 70_000,
            calories: 0.0,
        });
        assert_eq!(record.heart_rate, u16::MAX);
    }
}
