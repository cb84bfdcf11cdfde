use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create menu_items table
        manager
            .create_table(
                Table::create()
                    .table(MenuItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MenuItems::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MenuItems::Code)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(MenuItems::Name).string().not_null())
                    .col(ColumnDef::new(MenuItems::Category).string().null())
                    .col(
                        ColumnDef::new(MenuItems::StandardPortion)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(MenuItems::StandardPortionUnit)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MenuItems::StandardLaborHours)
                            .decimal_len(19, 6)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MenuItems::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(MenuItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MenuItems::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create recipe_details table
        manager
            .create_table(
                Table::create()
                    .table(RecipeDetails::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RecipeDetails::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RecipeDetails::MenuItemId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecipeDetails::RawMaterialId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecipeDetails::Quantity)
                            .decimal_len(19, 6)
                            .not_null(),
                    )
                    .col(ColumnDef::new(RecipeDetails::Unit).string().not_null())
                    .col(ColumnDef::new(RecipeDetails::Sequence).integer().null())
                    .col(ColumnDef::new(RecipeDetails::Notes).text().null())
                    .col(
                        ColumnDef::new(RecipeDetails::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecipeDetails::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Create menu_pricing table (append-only price history)
        manager
            .create_table(
                Table::create()
                    .table(MenuPricing::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MenuPricing::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MenuPricing::MenuItemId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MenuPricing::SellingPrice)
                            .decimal_len(19, 6)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MenuPricing::EffectiveDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(MenuPricing::Notes).text().null())
                    .col(
                        ColumnDef::new(MenuPricing::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Recipe lookups by menu item in sequence order
        manager
            .create_index(
                Index::create()
                    .name("idx_recipe_details_menu_item")
                    .table(RecipeDetails::Table)
                    .col(RecipeDetails::MenuItemId)
                    .col(RecipeDetails::Sequence)
                    .to_owned(),
            )
            .await?;

        // Current-price lookups per menu item
        manager
            .create_index(
                Index::create()
                    .name("idx_menu_pricing_item_date")
                    .table(MenuPricing::Table)
                    .col(MenuPricing::MenuItemId)
                    .col((MenuPricing::EffectiveDate, IndexOrder::Desc))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MenuPricing::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecipeDetails::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(MenuItems::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum MenuItems {
    Table,
    Id,
    Code,
    Name,
    Category,
    StandardPortion,
    StandardPortionUnit,
    StandardLaborHours,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum RecipeDetails {
    Table,
    Id,
    MenuItemId,
    RawMaterialId,
    Quantity,
    Unit,
    Sequence,
    Notes,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum MenuPricing {
    Table,
    Id,
    MenuItemId,
    SellingPrice,
    EffectiveDate,
    Notes,
    CreatedAt,
}
