use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // zones 表
        manager
            .create_table(
                Table::create()
                    .table(Zone::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Zone::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Zone::ClientId).integer().not_null())
                    .col(
                        ColumnDef::new(Zone::DomainName)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Zone::ProviderId).string().not_null())
                    .col(ColumnDef::new(Zone::ZoneId).string().null())
                    .col(ColumnDef::new(Zone::Config).text().not_null())
                    .col(ColumnDef::new(Zone::Snapshot).text().null())
                    .col(ColumnDef::new(Zone::CreatedAt).string().not_null())
                    .col(ColumnDef::new(Zone::UpdatedAt).string().not_null())
                    .to_owned(),
            )
            .await?;

        // records 表
        manager
            .create_table(
                Table::create()
                    .table(Record::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Record::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Record::DomainId).integer().not_null())
                    .col(ColumnDef::new(Record::RecordId).string().null())
                    .col(ColumnDef::new(Record::Type).string().not_null())
                    .col(ColumnDef::new(Record::Host).string().not_null())
                    .col(ColumnDef::new(Record::Value).text().not_null())
                    .col(ColumnDef::new(Record::Ttl).integer().not_null())
                    .col(ColumnDef::new(Record::Priority).integer().null())
                    .col(ColumnDef::new(Record::CreatedAt).string().not_null())
                    .col(ColumnDef::new(Record::UpdatedAt).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_records_domain_id")
                            .from(Record::Table, Record::DomainId)
                            .to(Zone::Table, Zone::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_records_domain_type_host")
                    .table(Record::Table)
                    .col(Record::DomainId)
                    .col(Record::Type)
                    .col(Record::Host)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Record::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Zone::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Zone {
    #[sea_orm(iden = "zones")]
    Table,
    Id,
    ClientId,
    DomainName,
    ProviderId,
    #[sea_orm(iden = "zoneId")]
    ZoneId,
    Config,
    Snapshot,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Record {
    #[sea_orm(iden = "records")]
    Table,
    Id,
    DomainId,
    #[sea_orm(iden = "recordId")]
    RecordId,
    Type,
    Host,
    Value,
    Ttl,
    Priority,
    CreatedAt,
    UpdatedAt,
}
