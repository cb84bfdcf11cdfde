use crate::{
    db::DbPool,
    entities::{raw_material, supplier, supplier::Entity as SupplierEntity},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

/// Input payload for creating a supplier
#[derive(Debug, Clone)]
pub struct CreateSupplierInput {
    pub name: String,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub payment_terms: Option<String>,
    pub notes: Option<String>,
}

/// Input payload for updating a supplier; None fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct UpdateSupplierInput {
    pub name: Option<String>,
    pub contact_person: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub payment_terms: Option<String>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
}

/// Filters accepted by the list endpoint
#[derive(Debug, Clone, Default)]
pub struct SupplierFilter {
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

/// Outcome of the referential delete policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "outcome")]
pub enum DeleteOutcome {
    /// Row removed; nothing referenced it
    Deleted,
    /// Dependents exist; row was deactivated instead
    Deactivated { dependent_count: u64 },
}

#[derive(Clone)]
pub struct SupplierService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl SupplierService {
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
    pub async fn create(&self, input: CreateSupplierInput) -> Result<supplier::Model, ServiceError> {
        let now = Utc::now();
        let model = supplier::ActiveModel {
            id: Default::default(),
            name: Set(input.name),
            contact_person: Set(input.contact_person),
            phone: Set(input.phone),
            email: Set(input.email),
            address: Set(input.address),
            payment_terms: Set(input.payment_terms),
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
            .send_or_log(Event::SupplierCreated(created.id))
            .await;

        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<supplier::Model, ServiceError> {
        SupplierEntity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Supplier {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        filter: SupplierFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<supplier::Model>, u64), ServiceError> {
        let mut query = SupplierEntity::find().order_by_asc(supplier::Column::Name);

        if let Some(search) = filter.search.filter(|s| !s.trim().is_empty()) {
            query = query.filter(supplier::Column::Name.contains(search.trim()));
        }
        if let Some(active) = filter.is_active {
            query = query.filter(supplier::Column::IsActive.eq(active));
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

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i64,
        input: UpdateSupplierInput,
    ) -> Result<supplier::Model, ServiceError> {
        let mut model = self.get(id).await?;

        if let Some(name) = input.name {
            model.name = name;
        }
        if let Some(contact_person) = input.contact_person {
            model.contact_person = Some(contact_person);
        }
        if let Some(phone) = input.phone {
            model.phone = Some(phone);
        }
        if let Some(email) = input.email {
            model.email = Some(email);
        }
        if let Some(address) = input.address {
            model.address = Some(address);
        }
        if let Some(payment_terms) = input.payment_terms {
            model.payment_terms = Some(payment_terms);
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

        self.event_sender
            .send_or_log(Event::SupplierUpdated(updated.id))
            .await;

        Ok(updated)
    }

    /// Two-step referential delete policy: suppliers referenced by raw
    /// materials are deactivated, unreferenced ones are removed.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<DeleteOutcome, ServiceError> {
        let model = self.get(id).await?;

        let dependent_count = raw_material::Entity::find()
            .filter(raw_material::Column::SupplierId.eq(id))
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
            .send_or_log(Event::SupplierDeleted(id))
            .await;

        Ok(outcome)
    }
}
