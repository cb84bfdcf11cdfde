use crate::{
    db::DbPool,
    entities::{
        menu_item, raw_material, recipe_detail, recipe_detail::Entity as RecipeDetailEntity,
    },
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, ModelTrait, QueryFilter,
    QueryOrder, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Clone)]
pub struct AddRecipeLineInput {
    pub raw_material_id: i64,
    pub quantity: Decimal,
    pub unit: Option<String>,
    pub sequence: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateRecipeLineInput {
    pub quantity: Option<Decimal>,
    pub unit: Option<String>,
    pub sequence: Option<i32>,
    pub notes: Option<String>,
}

/// Recipe line joined with material facts for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeLineView {
    pub id: i64,
    pub menu_item_id: i64,
    pub raw_material_id: i64,
    pub material_code: String,
    pub material_name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub sequence: Option<i32>,
    pub notes: Option<String>,
    pub current_price: Decimal,
    pub yield_percentage: Decimal,
}

#[derive(Clone)]
pub struct RecipeService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl RecipeService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    fn connection(&self) -> &DbPool {
        &self.db_pool
    }

    async fn menu_item_exists(&self, id: i64) -> Result<(), ServiceError> {
        menu_item::Entity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Menu item {} not found", id)))?;
        Ok(())
    }

    /// Recipe lines for one menu item, in sequence order, with material info.
    #[instrument(skip(self))]
    pub async fn list(&self, menu_item_id: i64) -> Result<Vec<RecipeLineView>, ServiceError> {
        self.menu_item_exists(menu_item_id).await?;

        let rows = RecipeDetailEntity::find()
            .filter(recipe_detail::Column::MenuItemId.eq(menu_item_id))
            .order_by_asc(recipe_detail::Column::Sequence)
            .order_by_asc(recipe_detail::Column::Id)
            .find_also_related(raw_material::Entity)
            .all(self.connection())
            .await
            .map_err(ServiceError::db_error)?;

        let views = rows
            .into_iter()
            .map(|(detail, material)| {
                let material = material.ok_or_else(|| {
                    ServiceError::NotFound(format!(
                        "Material {} referenced by recipe line {} not found",
                        detail.raw_material_id, detail.id
                    ))
                })?;
                Ok(RecipeLineView {
                    id: detail.id,
                    menu_item_id: detail.menu_item_id,
                    raw_material_id: detail.raw_material_id,
                    material_code: material.code,
                    material_name: material.name,
                    quantity: detail.quantity,
                    unit: detail.unit,
                    sequence: detail.sequence,
                    notes: detail.notes,
                    current_price: material.current_price,
                    yield_percentage: material.yield_percentage,
                })
            })
            .collect::<Result<Vec<_>, ServiceError>>()?;

        Ok(views)
    }

    #[instrument(skip(self, input))]
    pub async fn add_line(
        &self,
        menu_item_id: i64,
        input: AddRecipeLineInput,
    ) -> Result<recipe_detail::Model, ServiceError> {
        self.menu_item_exists(menu_item_id).await?;

        let material = raw_material::Entity::find_by_id(input.raw_material_id)
            .one(self.connection())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Material {} not found", input.raw_material_id))
            })?;

        if input.quantity <= Decimal::ZERO {
            return Err(ServiceError::InvalidInput(
                "quantity must be greater than zero".into(),
            ));
        }

        let now = Utc::now();
        let model = recipe_detail::ActiveModel {
            id: Default::default(),
            menu_item_id: Set(menu_item_id),
            raw_material_id: Set(material.id),
            quantity: Set(input.quantity),
            unit: Set(input.unit.unwrap_or_else(|| material.unit.clone())),
            sequence: Set(input.sequence),
            notes: Set(input.notes),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let created = model
            .insert(self.connection())
            .await
            .map_err(ServiceError::db_error)?;

        self.event_sender
            .send_or_log(Event::RecipeLineAdded {
                menu_item_id,
                material_id: created.raw_material_id,
            })
            .await;

        Ok(created)
    }

    #[instrument(skip(self, input))]
    pub async fn update_line(
        &self,
        detail_id: i64,
        input: UpdateRecipeLineInput,
    ) -> Result<recipe_detail::Model, ServiceError> {
        let mut model = RecipeDetailEntity::find_by_id(detail_id)
            .one(self.connection())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Recipe line {} not found", detail_id))
            })?;

        if let Some(quantity) = input.quantity {
            if quantity <= Decimal::ZERO {
                return Err(ServiceError::InvalidInput(
                    "quantity must be greater than zero".into(),
                ));
            }
            model.quantity = quantity;
        }
        if let Some(unit) = input.unit {
            model.unit = unit;
        }
        if let Some(sequence) = input.sequence {
            model.sequence = Some(sequence);
        }
        if let Some(notes) = input.notes {
            model.notes = Some(notes);
        }
        model.updated_at = Utc::now().into();

        let menu_item_id = model.menu_item_id;
        let updated = model
            .into_active_model()
            .reset_all()
            .update(self.connection())
            .await
            .map_err(ServiceError::db_error)?;

        self.event_sender
            .send_or_log(Event::RecipeLineUpdated {
                recipe_detail_id: updated.id,
                menu_item_id,
            })
            .await;

        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn remove_line(&self, detail_id: i64) -> Result<(), ServiceError> {
        let model = RecipeDetailEntity::find_by_id(detail_id)
            .one(self.connection())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Recipe line {} not found", detail_id))
            })?;

        let menu_item_id = model.menu_item_id;
        model
            .delete(self.connection())
            .await
            .map_err(ServiceError::db_error)?;

        self.event_sender
            .send_or_log(Event::RecipeLineRemoved {
                recipe_detail_id: detail_id,
                menu_item_id,
            })
            .await;

        Ok(())
    }

    /// Copies every line of the source recipe onto the target menu item.
    /// Existing target lines are kept; the copy appends.
    #[instrument(skip(self))]
    pub async fn duplicate(
        &self,
        source_menu_item_id: i64,
        target_menu_item_id: i64,
    ) -> Result<u64, ServiceError> {
        self.menu_item_exists(source_menu_item_id).await?;
        self.menu_item_exists(target_menu_item_id).await?;

        let source_lines = RecipeDetailEntity::find()
            .filter(recipe_detail::Column::MenuItemId.eq(source_menu_item_id))
            .order_by_asc(recipe_detail::Column::Sequence)
            .all(self.connection())
            .await
            .map_err(ServiceError::db_error)?;

        let now = Utc::now();
        let count = source_lines.len() as u64;

        let txn = self
            .connection()
            .begin()
            .await
            .map_err(ServiceError::db_error)?;

        for line in source_lines {
            let copy = recipe_detail::ActiveModel {
                id: Default::default(),
                menu_item_id: Set(target_menu_item_id),
                raw_material_id: Set(line.raw_material_id),
                quantity: Set(line.quantity),
                unit: Set(line.unit),
                sequence: Set(line.sequence),
                notes: Set(line.notes),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
            };
            copy.insert(&txn).await.map_err(ServiceError::db_error)?;
        }

        txn.commit().await.map_err(ServiceError::db_error)?;

        Ok(count)
    }
}
