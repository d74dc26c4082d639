use healthtracker_entities::sleep;
use healthtracker_types::sleep::{SleepEntry, SleepPhases, SleepRecord};
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, EntityTrait, QueryOrder, Set};

use crate::DatabaseHandler;

impl DatabaseHandler {
    pub async fn create_sleep(&self, record: &SleepRecord) -> anyhow::Result<SleepEntry> {
        let phases = &record.phases;
        let model = sleep::ActiveModel {
            id: NotSet,
            deep: Set(minutes_to_column(phases.deep_minutes)),
            light: Set(minutes_to_column(phases.light_minutes)),
            rem: Set(minutes_to_column(phases.rem_minutes)),
            awake: Set(minutes_to_column(phases.awake_minutes)),
            score: Set(record.score),
        };

        let model = model.insert(&self.db).await?;
        Ok(map_sleep(model))
    }

    /// All stored sleep passes, newest first.
    pub async fn get_sleep_records(&self) -> anyhow::Result<Vec<SleepEntry>> {
        let records = sleep::Entity::find()
            .order_by_desc(sleep::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(map_sleep)
            .collect();

        Ok(records)
    }
}

/// Phase columns are `INTEGER`; minutes above `i32::MAX` are stored as
/// `i32::MAX`, so such values do not round-trip.
fn minutes_to_column(minutes: u32) -> i32 {
    minutes.try_into().unwrap_or(i32::MAX)
}

/// Negative column values (never written by [`minutes_to_column`]) read as 0.
fn minutes_from_column(minutes: i32) -> u32 {
    minutes.try_into().unwrap_or_default()
}

fn map_sleep(model: sleep::Model) -> SleepEntry {
    SleepEntry {
        id: model.id,
        record: SleepRecord {
            phases: SleepPhases {
                deep_minutes: minutes_from_column(model.deep),
                light_minutes: minutes_from_column(model.light),
                rem_minutes: minutes_from_column(model.rem),
                awake_minutes: minutes_from_column(model.awake),
            },
            score: model.score,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthtracker_algos::SleepScoreCalculator;

    fn phases(deep: u32, light: u32, rem: u32, awake: u32) -> SleepPhases {
        SleepPhases {
            deep_minutes: deep,
            light_minutes: light,
            rem_minutes: rem,
            awake_minutes: awake,
        }
    }

    #[tokio::test]
    async fn create_and_get_sleep() {
        let db = DatabaseHandler::new("sqlite::memory:").await.unwrap();

        let record = SleepScoreCalculator::record(phases(80, 100, 40, 10));
        let entry = db.create_sleep(&record).await.unwrap();
        assert_eq!(entry.record, record);

        let stored = db.get_sleep_records().await.unwrap();
        assert_eq!(stored, vec![entry]);
        assert_eq!(stored[0].record.score, 65);
    }

    #[tokio::test]
    async fn negative_scores_are_stored() {
        let db = DatabaseHandler::new("sqlite::memory:").await.unwrap();

        let record = SleepScoreCalculator::record(phases(0, 0, 0, 200));
        db.create_sleep(&record).await.unwrap();

        let stored = db.get_sleep_records().await.unwrap();
        assert_eq!(stored[0].record.score, -100);
    }

    #[test]
    fn oversized_minutes_saturate() {
        assert_eq!(minutes_to_column(480), 480);
        assert_eq!(minutes_to_column(u32::MAX), i32::MAX);
        assert_eq!(minutes_from_column(i32::MAX), i32::MAX as u32);
        assert_eq!(minutes_from_column(-1), 0);
    }

    #[tokio::test]
    async fn sleep_comes_back_newest_first() {
        let db = DatabaseHandler::new("sqlite::memory:").await.unwrap();
        for deep in [60, 70, 80] {
            db.create_sleep(&SleepScoreCalculator::record(phases(deep, 100, 40, 10)))
                .await
                .unwrap();
        }

        let deep = db
            .get_sleep_records()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.record.phases.deep_minutes)
            .collect::<Vec<_>>();
        assert_eq!(deep, vec![80, 70, 60]);
    }
}
