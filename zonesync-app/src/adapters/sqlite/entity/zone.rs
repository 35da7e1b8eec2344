//! `SeaORM` entity for the `zones` table.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "zones")]
/// Database row model for a zone.
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub client_id: i64,
    #[sea_orm(unique)]
    pub domain_name: String,
    /// Provider name, mirrored from `config`.
    pub provider_id: String,
    /// Provider-issued zone identifier.
    #[sea_orm(column_name = "zoneId")]
    pub zone_id: Option<String>,
    /// `ProviderConfig` as JSON.
    pub config: String,
    /// Last reconciled `ZoneSnapshot` as JSON.
    pub snapshot: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::record::Entity")]
    Record,
}

impl Related<super::record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Record.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
