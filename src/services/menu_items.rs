use crate::{
    db::DbPool,
    entities::{
        menu_item, menu_item::Entity as MenuItemEntity, menu_pricing, production_log,
    },
    errors::ServiceError,
    events::{Event, EventSender},
    services::suppliers::DeleteOutcome,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Clone)]
pub struct CreateMenuItemInput {
    pub code: String,
    pub name: String,
    pub category: Option<String>,
    pub standard_portion: i32,
    pub standard_portion_unit: Option<String>,
    pub standard_labor_hours: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateMenuItemInput {
    pub name: Option<String>,
    pub category: Option<String>,
    pub standard_portion: Option<i32>,
    pub standard_portion_unit: Option<String>,
    pub standard_labor_hours: Option<Decimal>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct MenuItemFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct SetPriceInput {
    pub selling_price: Decimal,
    pub effective_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct MenuItemService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl MenuItemService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    fn connection(&self) -> &DbPool {
        &self.db_pool
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: CreateMenuItemInput) -> Result<menu_item::Model, ServiceError> {
        if input.standard_portion < 1 {
            return Err(ServiceError::InvalidInput(
                "standard_portion must be at least 1".into(),
            ));
        }

        let exists = MenuItemEntity::find()
            .filter(menu_item::Column::Code.eq(&input.code))
            .count(self.connection())
            .await
            .map_err(ServiceError::db_error)?;
        if exists > 0 {
            return Err(ServiceError::DuplicateKey(format!(
                "Menu item code '{}' already exists",
                input.code
            )));
        }

        let now = Utc::now();
        let model = menu_item::ActiveModel {
            id: Default::default(),
            code: Set(input.code),
            name: Set(input.name),
            category: Set(input.category),
            standard_portion: Set(input.standard_portion),
            standard_portion_unit: Set(input
                .standard_portion_unit
                .unwrap_or_else(|| "portion".to_string())),
            standard_labor_hours: Set(input.standard_labor_hours),
            is_active: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let created = model
            .insert(self.connection())
            .await
            .map_err(ServiceError::db_error)?;

        self.event_sender
            .send_or_log(Event::MenuItemCreated(created.id))
            .await;

        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<menu_item::Model, ServiceError> {
        MenuItemEntity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Menu item {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: MenuItemFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<menu_item::Model>, u64), ServiceError> {
        let mut query = MenuItemEntity::find().order_by_asc(menu_item::Column::Name);

        if let Some(search) = filter.search.filter(|s| !s.trim().is_empty()) {
            let term = search.trim().to_string();
            query = query.filter(
                menu_item::Column::Name
                    .contains(&term)
                    .or(menu_item::Column::Code.contains(&term)),
            );
        }
        if let Some(category) = filter.category {
            query = query.filter(menu_item::Column::Category.eq(category));
        }
        if let Some(active) = filter.is_active {
            query = query.filter(menu_item::Column::IsActive.eq(active));
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

    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<String>, ServiceError> {
        let rows: Vec<Option<String>> = MenuItemEntity::find()
            .select_only()
            .column(menu_item::Column::Category)
            .distinct()
            .order_by_asc(menu_item::Column::Category)
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
        input: UpdateMenuItemInput,
    ) -> Result<menu_item::Model, ServiceError> {
        let mut model = self.get(id).await?;

        if let Some(name) = input.name {
            model.name = name;
        }
        if let Some(category) = input.category {
            model.category = Some(category);
        }
        if let Some(portion) = input.standard_portion {
            if portion < 1 {
                return Err(ServiceError::InvalidInput(
                    "standard_portion must be at least 1".into(),
                ));
            }
            model.standard_portion = portion;
        }
        if let Some(unit) = input.standard_portion_unit {
            model.standard_portion_unit = unit;
        }
        if let Some(hours) = input.standard_labor_hours {
            model.standard_labor_hours = hours;
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

        self.event_sender
            .send_or_log(Event::MenuItemUpdated(updated.id))
            .await;

        Ok(updated)
    }

    /// Menu items with recorded production runs are deactivated instead of
    /// removed, to keep the history intact.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<DeleteOutcome, ServiceError> {
        let model = self.get(id).await?;

        let dependent_count = production_log::Entity::find()
            .filter(production_log::Column::MenuItemId.eq(id))
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
            .send_or_log(Event::MenuItemDeleted(id))
            .await;

        Ok(outcome)
    }

    /// Appends a new selling price; prices are never edited in place.
    #[instrument(skip(self, input))]
    pub async fn set_price(
        &self,
        menu_item_id: i64,
        input: SetPriceInput,
    ) -> Result<menu_pricing::Model, ServiceError> {
        self.get(menu_item_id).await?;

        let now = Utc::now();
        let model = menu_pricing::ActiveModel {
            id: Default::default(),
            menu_item_id: Set(menu_item_id),
            selling_price: Set(input.selling_price),
            effective_date: Set(input.effective_date.unwrap_or(now).into()),
            notes: Set(input.notes),
            created_at: Set(now.into()),
        };

        let created = model
            .insert(self.connection())
            .await
            .map_err(ServiceError::db_error)?;

        self.event_sender
            .send_or_log(Event::MenuPriceSet {
                menu_item_id,
                selling_price: created.selling_price,
            })
            .await;

        Ok(created)
    }

    /// Latest price row by effective date, if any price was ever set.
    #[instrument(skip(self))]
    pub async fn current_price(
        &self,
        menu_item_id: i64,
    ) -> Result<Option<menu_pricing::Model>, ServiceError> {
        self.get(menu_item_id).await?;

        menu_pricing::Entity::find()
            .filter(menu_pricing::Column::MenuItemId.eq(menu_item_id))
            .order_by_desc(menu_pricing::Column::EffectiveDate)
            .one(self.connection())
            .await
            .map_err(ServiceError::db_error)
    }
}
