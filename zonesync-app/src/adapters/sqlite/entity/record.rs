//! `SeaORM` entity for the `records` table.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "records")]
/// Database row model for a record.
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Owning zone, `ON DELETE CASCADE`.
    pub domain_id: i64,
    /// Provider-issued record identifier.
    #[sea_orm(column_name = "recordId")]
    pub record_id: Option<String>,
    #[sea_orm(column_name = "type")]
    pub record_type: String,
    pub host: String,
    pub value: String,
    pub ttl: i64,
    pub priority: Option<i32>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::zone::Entity",
        from = "Column::DomainId",
        to = "super::zone::Column::Id",
        on_delete = "Cascade"
    )]
    Zone,
}

impl Related<super::zone::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Zone.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
