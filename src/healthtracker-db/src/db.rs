use healthtracker_entities::packets;
use healthtracker_migration::{Migrator, MigratorTrait};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, ConnectOptions, Database,
    DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

#[derive(Clone)]
pub struct DatabaseHandler {
    pub(crate) db: DatabaseConnection,
}

impl DatabaseHandler {
    const PACKET_BATCH: u64 = 10_000;

    /// Connects and brings the schema up to date.
    pub async fn new<C>(path: C) -> anyhow::Result<Self>
    where
        C: Into<ConnectOptions>,
    {
        let db = Database::connect(path).await?;
        Migrator::up(&db, None).await?;

        Ok(Self { db })
    }

    pub async fn create_packet(&self, char: Uuid, data: Vec<u8>) -> anyhow::Result<packets::Model> {
        let packet = packets::ActiveModel {
            id: NotSet,
            uuid: Set(char),
            bytes: Set(data),
        };

        let packet = packet.insert(&self.db).await?;
        Ok(packet)
    }

    /// Next batch of captured packets with an id greater than `id`, oldest first.
    pub async fn get_packets(&self, id: i32) -> anyhow::Result<Vec<packets::Model>> {
        let packets = packets::Entity::find()
            .filter(packets::Column::Id.gt(id))
            .order_by_asc(packets::Column::Id)
            .limit(Self::PACKET_BATCH)
            .all(&self.db)
            .await?;

        Ok(packets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_and_get_packets() {
        let db = DatabaseHandler::new("sqlite::memory:").await.unwrap();
        let uuid = Uuid::new_v4();
        let data = vec![0x00, 0x48];

        let packet = db.create_packet(uuid, data.clone()).await.unwrap();
        assert_eq!(packet.uuid, uuid);
        assert_eq!(packet.bytes, data);

        let packets = db.get_packets(0).await.unwrap();
        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0].uuid, uuid);
    }

    #[tokio::test]
    async fn get_packets_resumes_after_id() {
        let db = DatabaseHandler::new("sqlite::memory:").await.unwrap();
        let uuid = Uuid::new_v4();
        for bpm in [60_u8, 61, 62] {
            db.create_packet(uuid, vec![0x00, bpm]).await.unwrap();
        }

        let first = db.get_packets(0).await.unwrap();
        assert_eq!(first.len(), 3);

        let rest = db.get_packets(first[0].id).await.unwrap();
        assert_eq!(rest.len(), 2);
        assert_eq!(rest[0].bytes, vec![0x00, 61]);

        let none = db.get_packets(first[2].id).await.unwrap();
        assert!(none.is_empty());
    }
}
