use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Workouts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Workouts::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    // Seconds
                    .col(ColumnDef::new(Workouts::Duration).big_integer().not_null())
                    .col(ColumnDef::new(Workouts::Steps).big_integer().not_null())
                    // Sqlite and sea orm doesn't have `u16`
                    .col(ColumnDef::new(Workouts::HeartRate).integer().not_null())
                    .col(ColumnDef::new(Workouts::Calories).double().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Workouts::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Workouts {
    Table,
    Id,
    Duration,
    Steps,
    HeartRate,
    Calories,
}
