use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create suppliers table
        manager
            .create_table(
                Table::create()
                    .table(Suppliers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Suppliers::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Suppliers::Name).string().not_null())
                    .col(ColumnDef::new(Suppliers::ContactPerson).string().null())
                    .col(ColumnDef::new(Suppliers::Phone).string().null())
                    .col(ColumnDef::new(Suppliers::Email).string().null())
                    .col(ColumnDef::new(Suppliers::Address).text().null())
                    .col(ColumnDef::new(Suppliers::PaymentTerms).string().null())
                    .col(ColumnDef::new(Suppliers::Notes).text().null())
                    .col(
                        ColumnDef::new(Suppliers::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Suppliers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Suppliers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create raw_materials table
        manager
            .create_table(
                Table::create()
                    .table(RawMaterials::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RawMaterials::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RawMaterials::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(RawMaterials::Name).string().not_null())
                    .col(ColumnDef::new(RawMaterials::Unit).string().not_null())
                    .col(ColumnDef::new(RawMaterials::Category).string().null())
                    .col(
                        ColumnDef::new(RawMaterials::CurrentPrice)
                            .decimal_len(19, 6)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(RawMaterials::YieldPercentage)
                            .decimal_len(19, 6)
                            .not_null()
                            .default(100),
                    )
                    .col(ColumnDef::new(RawMaterials::SupplierId).big_integer().null())
                    .col(ColumnDef::new(RawMaterials::Notes).text().null())
                    .col(
                        ColumnDef::new(RawMaterials::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(RawMaterials::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RawMaterials::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create yield_tests table
        manager
            .create_table(
                Table::create()
                    .table(YieldTests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(YieldTests::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(YieldTests::RawMaterialId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(YieldTests::TestDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(YieldTests::ApWeight)
                            .decimal_len(19, 6)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(YieldTests::EpWeight)
                            .decimal_len(19, 6)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(YieldTests::YieldPercentage)
                            .decimal_len(19, 6)
                            .not_null(),
                    )
                    .col(ColumnDef::new(YieldTests::Notes).text().null())
                    .col(
                        ColumnDef::new(YieldTests::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Foreign key indexes for material lookups
        manager
            .create_index(
                Index::create()
                    .name("idx_raw_materials_supplier_id")
                    .table(RawMaterials::Table)
                    .col(RawMaterials::SupplierId)
                    .to_owned(),
            )
            .await?;

        // Latest-test-by-date lookups per material
        manager
            .create_index(
                Index::create()
                    .name("idx_yield_tests_material_date")
                    .table(YieldTests::Table)
                    .col(YieldTests::RawMaterialId)
                    .col((YieldTests::TestDate, IndexOrder::Desc))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(YieldTests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RawMaterials::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Suppliers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Suppliers {
    Table,
    Id,
    Name,
    ContactPerson,
    Phone,
    Email,
    Address,
    PaymentTerms,
    Notes,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum RawMaterials {
    Table,
    Id,
    Code,
    Name,
    Unit,
    Category,
    CurrentPrice,
    YieldPercentage,
    SupplierId,
    Notes,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum YieldTests {
    Table,
    Id,
    RawMaterialId,
    TestDate,
    ApWeight,
    EpWeight,
    YieldPercentage,
    Notes,
    CreatedAt,
}
