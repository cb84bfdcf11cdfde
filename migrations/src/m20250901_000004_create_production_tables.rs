use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create production_logs table
        manager
            .create_table(
                Table::create()
                    .table(ProductionLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductionLogs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProductionLogs::MenuItemId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductionLogs::ProductionDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductionLogs::PortionsProduced)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProductionLogs::PortionsSold).integer().null())
                    .col(
                        ColumnDef::new(ProductionLogs::LaborHoursActual)
                            .decimal_len(19, 6)
                            .null(),
                    )
                    .col(ColumnDef::new(ProductionLogs::Notes).text().null())
                    .col(
                        ColumnDef::new(ProductionLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductionLogs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create production_log_details table
        manager
            .create_table(
                Table::create()
                    .table(ProductionLogDetails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductionLogDetails::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ProductionLogDetails::ProductionLogId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductionLogDetails::RawMaterialId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductionLogDetails::QuantityUsed)
                            .decimal_len(19, 6)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ProductionLogDetails::Unit).string().not_null())
                    .col(
                        ColumnDef::new(ProductionLogDetails::UnitPrice)
                            .decimal_len(19, 6)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductionLogDetails::Subtotal)
                            .decimal_len(19, 6)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductionLogDetails::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create variance_records table (append-only)
        manager
            .create_table(
                Table::create()
                    .table(VarianceRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VarianceRecords::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(VarianceRecords::MenuItemId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VarianceRecords::ProductionLogId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VarianceRecords::VarianceDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VarianceRecords::StandardCost)
                            .decimal_len(19, 6)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VarianceRecords::ActualCost)
                            .decimal_len(19, 6)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VarianceRecords::VarianceAmount)
                            .decimal_len(19, 6)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VarianceRecords::VariancePercentage)
                            .decimal_len(19, 6)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(VarianceRecords::VarianceType)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(VarianceRecords::Notes).text().null())
                    .col(
                        ColumnDef::new(VarianceRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Production history per menu item
        manager
            .create_index(
                Index::create()
                    .name("idx_production_logs_item_date")
                    .table(ProductionLogs::Table)
                    .col(ProductionLogs::MenuItemId)
                    .col((ProductionLogs::ProductionDate, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        // Detail rollups per production log
        manager
            .create_index(
                Index::create()
                    .name("idx_production_log_details_log_id")
                    .table(ProductionLogDetails::Table)
                    .col(ProductionLogDetails::ProductionLogId)
                    .to_owned(),
            )
            .await?;

        // Variance history per menu item
        manager
            .create_index(
                Index::create()
                    .name("idx_variance_records_item_date")
                    .table(VarianceRecords::Table)
                    .col(VarianceRecords::MenuItemId)
                    .col((VarianceRecords::VarianceDate, IndexOrder::Desc))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VarianceRecords::Table).to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(ProductionLogDetails::Table)
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(ProductionLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ProductionLogs {
    Table,
    Id,
    MenuItemId,
    ProductionDate,
    PortionsProduced,
    PortionsSold,
    LaborHoursActual,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum ProductionLogDetails {
    Table,
    Id,
    ProductionLogId,
    RawMaterialId,
    QuantityUsed,
    Unit,
    UnitPrice,
    Subtotal,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum VarianceRecords {
    Table,
    Id,
    MenuItemId,
    ProductionLogId,
    VarianceDate,
    StandardCost,
    ActualCost,
    VarianceAmount,
    VariancePercentage,
    VarianceType,
    Notes,
    CreatedAt,
}
