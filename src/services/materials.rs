use crate::{
    db::DbPool,
    entities::{
        raw_material, raw_material::Entity as MaterialEntity, recipe_detail, supplier,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::suppliers::DeleteOutcome,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Clone)]
pub struct CreateMaterialInput {
    pub code: String,
    pub name: String,
    pub unit: String,
    pub category: Option<String>,
    pub current_price: Decimal,
    /// Defaults to 100 (no trim loss) when omitted
    pub yield_percentage: Option<Decimal>,
    pub supplier_id: Option<i64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateMaterialInput {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub category: Option<String>,
    pub current_price: Option<Decimal>,
    pub yield_percentage: Option<Decimal>,
    pub supplier_id: Option<Option<i64>>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct MaterialFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub supplier_id: Option<i64>,
    pub is_active: Option<bool>,
}

/// Material joined with its supplier name for detail views
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialView {
    #[serde(flatten)]
    pub material: raw_material::Model,
    pub supplier_name: Option<String>,
}

#[derive(Clone)]
pub struct MaterialService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl MaterialService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    fn connection(&self) -> &DbPool {
        &self.db_pool
    }

    async fn code_exists(&self, code: &str) -> Result<bool, ServiceError> {
        let count = MaterialEntity::find()
            .filter(raw_material::Column::Code.eq(code))
            .count(self.connection())
            .await
            .map_err(ServiceError::db_error)?;
        Ok(count > 0)
    }

    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        input: CreateMaterialInput,
    ) -> Result<raw_material::Model, ServiceError> {
        if self.code_exists(&input.code).await? {
            return Err(ServiceError::DuplicateKey(format!(
                "Material code '{}' already exists",
                input.code
            )));
        }

        let now = Utc::now();
        let model = raw_material::ActiveModel {
            id: Default::default(),
            code: Set(input.code),
            name: Set(input.name),
            unit: Set(input.unit),
            category: Set(input.category),
            current_price: Set(input.current_price),
            yield_percentage: Set(input.yield_percentage.unwrap_or_else(|| Decimal::from(100))),
            supplier_id: Set(input.supplier_id),
            notes: Set(input.notes),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let created = model
            .insert(self.connection())
            .await
            .map_err(ServiceError::db_error)?;

        self.event_sender
            .send_or_log(Event::MaterialCreated(created.id))
            .await;

        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<raw_material::Model, ServiceError> {
        MaterialEntity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Material {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn get_with_supplier(&self, id: i64) -> Result<MaterialView, ServiceError> {
        let material = self.get(id).await?;
        let supplier_name = match material.supplier_id {
            Some(supplier_id) => supplier::Entity::find_by_id(supplier_id)
                .one(self.connection())
                .await
                .map_err(ServiceError::db_error)?
                .map(|s| s.name),
            None => None,
        };
        Ok(MaterialView {
            material,
            supplier_name,
        })
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: MaterialFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<raw_material::Model>, u64), ServiceError> {
        let mut query = MaterialEntity::find().order_by_asc(raw_material::Column::Name);

        if let Some(search) = filter.search.filter(|s| !s.trim().is_empty()) {
            let term = search.trim().to_string();
            query = query.filter(
                raw_material::Column::Name
                    .contains(&term)
                    .or(raw_material::Column::Code.contains(&term)),
            );
        }
        if let Some(category) = filter.category {
            query = query.filter(raw_material::Column::Category.eq(category));
        }
        if let Some(supplier_id) = filter.supplier_id {
            query = query.filter(raw_material::Column::SupplierId.eq(supplier_id));
        }
        if let Some(active) = filter.is_active {
            query = query.filter(raw_material::Column::IsActive.eq(active));
        }

        let per_page = per_page.max(1);
        let paginator = query.paginate(self.connection(), per_page);
        let total = paginator
            .num_items()
            .await
            .map_err(ServiceError::db_error)?;
        let models = paginator
            .fetch_page(page.max(1) - 1)
            .await
            .map_err(ServiceError::db_error)?;

        Ok((models, total))
    }

    /// Distinct non-null categories, for filter dropdowns
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<String>, ServiceError> {
        let rows: Vec<Option<String>> = MaterialEntity::find()
            .select_only()
            .column(raw_material::Column::Category)
            .distinct()
            .order_by_asc(raw_material::Column::Category)
            .into_tuple()
            .all(self.connection())
            .await
            .map_err(ServiceError::db_error)?;

        Ok(rows.into_iter().flatten().collect())
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i64,
        input: UpdateMaterialInput,
    ) -> Result<raw_material::Model, ServiceError> {
        let mut model = self.get(id).await?;
        let old_price = model.current_price;

        if let Some(name) = input.name {
            model.name = name;
        }
        if let Some(unit) = input.unit {
            model.unit = unit;
        }
        if let Some(category) = input.category {
            model.category = Some(category);
        }
        if let Some(price) = input.current_price {
            model.current_price = price;
        }
        if let Some(yield_pct) = input.yield_percentage {
            model.yield_percentage = yield_pct;
        }
        if let Some(supplier_id) = input.supplier_id {
            model.supplier_id = supplier_id;
        }
        if let Some(notes) = input.notes {
            model.notes = Some(notes);
        }
        if let Some(is_active) = input.is_active {
            model.is_active = is_active;
        }
        model.updated_at = Utc::now().into();

        let updated = model
            .into_active_model()
            .reset_all()
            .update(self.connection())
            .await
            .map_err(ServiceError::db_error)?;

        if updated.current_price != old_price {
            self.event_sender
                .send_or_log(Event::MaterialPriceChanged {
                    material_id: updated.id,
                    old_price,
                    new_price: updated.current_price,
                })
                .await;
        }
        self.event_sender
            .send_or_log(Event::MaterialUpdated(updated.id))
            .await;

        Ok(updated)
    }

    /// Materials referenced by recipe lines are deactivated, others deleted.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<DeleteOutcome, ServiceError> {
        let model = self.get(id).await?;

        let dependent_count = recipe_detail::Entity::find()
            .filter(recipe_detail::Column::RawMaterialId.eq(id))
            .count(self.connection())
            .await
            .map_err(ServiceError::db_error)?;

        let outcome = if dependent_count > 0 {
            let mut deactivated = model;
            deactivated.is_active = false;
            deactivated.updated_at = Utc::now().into();
            deactivated
                .into_active_model()
                .reset_all()
                .update(self.connection())
                .await
                .map_err(ServiceError::db_error)?;
            DeleteOutcome::Deactivated { dependent_count }
        } else {
            model
                .delete(self.connection())
                .await
                .map_err(ServiceError::db_error)?;
            DeleteOutcome::Deleted
        };

        self.event_sender
            .send_or_log(Event::MaterialDeleted(id))
            .await;

        Ok(outcome)
    }
}
