use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sleep")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub deep: i32,
    pub light: i32,
    pub rem: i32,
    pub awake: i32,
    pub score: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
