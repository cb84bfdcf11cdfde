use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create business_settings table (single logical row)
        manager
            .create_table(
                Table::create()
                    .table(BusinessSettings::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BusinessSettings::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BusinessSettings::BusinessName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BusinessSettings::Address).text().null())
                    .col(ColumnDef::new(BusinessSettings::Phone).string().null())
                    .col(ColumnDef::new(BusinessSettings::Email).string().null())
                    .col(
                        ColumnDef::new(BusinessSettings::LaborRatePerHour)
                            .decimal_len(19, 6)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(BusinessSettings::Currency)
                            .string()
                            .not_null()
                            .default("USD"),
                    )
                    .col(
                        ColumnDef::new(BusinessSettings::IsInitialized)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(BusinessSettings::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BusinessSettings::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create overhead_configs table (latest effective_date wins)
        manager
            .create_table(
                Table::create()
                    .table(OverheadConfigs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OverheadConfigs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(OverheadConfigs::AllocationMethod)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OverheadConfigs::AllocationRate)
                            .decimal_len(19, 6)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OverheadConfigs::EffectiveDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OverheadConfigs::Notes).text().null())
                    .col(
                        ColumnDef::new(OverheadConfigs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create cost_standards table (append-only snapshots)
        manager
            .create_table(
                Table::create()
                    .table(CostStandards::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CostStandards::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CostStandards::MenuItemId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CostStandards::EffectiveDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CostStandards::MaterialCost)
                            .decimal_len(19, 6)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CostStandards::LaborCost)
                            .decimal_len(19, 6)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CostStandards::OverheadCost)
                            .decimal_len(19, 6)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CostStandards::TotalCost)
                            .decimal_len(19, 6)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CostStandards::CostPerPortion)
                            .decimal_len(19, 6)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CostStandards::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Latest-standard lookups per menu item
        manager
            .create_index(
                Index::create()
                    .name("idx_cost_standards_item_date")
                    .table(CostStandards::Table)
                    .col(CostStandards::MenuItemId)
                    .col((CostStandards::EffectiveDate, IndexOrder::Desc))
                    .to_owned(),
            )
            .await?;

        // Current-policy lookup
        manager
            .create_index(
                Index::create()
                    .name("idx_overhead_configs_date")
                    .table(OverheadConfigs::Table)
                    .col((OverheadConfigs::EffectiveDate, IndexOrder::Desc))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CostStandards::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OverheadConfigs::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BusinessSettings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum BusinessSettings {
    Table,
    Id,
    BusinessName,
    Address,
    Phone,
    Email,
    LaborRatePerHour,
    Currency,
    IsInitialized,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum OverheadConfigs {
    Table,
    Id,
    AllocationMethod,
    AllocationRate,
    EffectiveDate,
    Notes,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum CostStandards {
    Table,
    Id,
    MenuItemId,
    EffectiveDate,
    MaterialCost,
    LaborCost,
    OverheadCost,
    TotalCost,
    CostPerPortion,
    CreatedAt,
}
