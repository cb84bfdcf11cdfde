use crate::{
    db::DbPool,
    entities::{business_settings, business_settings::Entity as SettingsEntity},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, QueryOrder};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Clone)]
pub struct InitSettingsInput {
    pub business_name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub labor_rate_per_hour: Decimal,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateSettingsInput {
    pub business_name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub labor_rate_per_hour: Option<Decimal>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsStatus {
    pub is_initialized: bool,
}

#[derive(Clone)]
pub struct SettingsService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl SettingsService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    fn connection(&self) -> &DbPool {
        &self.db_pool
    }

    /// The logical singleton: most recently created row, if any.
    async fn current(&self) -> Result<Option<business_settings::Model>, ServiceError> {
        SettingsEntity::find()
            .order_by_desc(business_settings::Column::CreatedAt)
            .one(self.connection())
            .await
            .map_err(ServiceError::db_error)
    }

    /// One-time initialization of business settings.
    #[instrument(skip(self, input))]
    pub async fn init(
        &self,
        input: InitSettingsInput,
    ) -> Result<business_settings::Model, ServiceError> {
        if let Some(existing) = self.current().await? {
            if existing.is_initialized {
                return Err(ServiceError::InvalidOperation(
                    "Business settings are already initialized".into(),
                ));
            }
        }

        if input.labor_rate_per_hour < Decimal::ZERO {
            return Err(ServiceError::InvalidInput(
                "labor_rate_per_hour must not be negative".into(),
            ));
        }

        let now = Utc::now();
        let model = business_settings::ActiveModel {
            id: Default::default(),
            business_name: Set(input.business_name),
            address: Set(input.address),
            phone: Set(input.phone),
            email: Set(input.email),
            labor_rate_per_hour: Set(input.labor_rate_per_hour),
            currency: Set(input.currency.unwrap_or_else(|| "USD".to_string())),
            is_initialized: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let created = model
            .insert(self.connection())
            .await
            .map_err(ServiceError::db_error)?;

        self.event_sender.send_or_log(Event::SettingsUpdated).await;

        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get(&self) -> Result<business_settings::Model, ServiceError> {
        self.current()
            .await?
            .ok_or_else(|| ServiceError::NotFound("Business settings not initialized".into()))
    }

    #[instrument(skip(self))]
    pub async fn status(&self) -> Result<SettingsStatus, ServiceError> {
        let is_initialized = self
            .current()
            .await?
            .map(|s| s.is_initialized)
            .unwrap_or(false);
        Ok(SettingsStatus { is_initialized })
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        input: UpdateSettingsInput,
    ) -> Result<business_settings::Model, ServiceError> {
        let mut model = self.get().await?;

        if let Some(business_name) = input.business_name {
            model.business_name = business_name;
        }
        if let Some(address) = input.address {
            model.address = Some(address);
        }
        if let Some(phone) = input.phone {
            model.phone = Some(phone);
        }
        if let Some(email) = input.email {
            model.email = Some(email);
        }
        if let Some(rate) = input.labor_rate_per_hour {
            if rate < Decimal::ZERO {
                return Err(ServiceError::InvalidInput(
                    "labor_rate_per_hour must not be negative".into(),
                ));
            }
            model.labor_rate_per_hour = rate;
        }
        if let Some(currency) = input.currency {
            model.currency = currency;
        }
        model.updated_at = Utc::now().into();

        let updated = model
            .into_active_model()
            .reset_all()
            .update(self.connection())
            .await
            .map_err(ServiceError::db_error)?;

        self.event_sender.send_or_log(Event::SettingsUpdated).await;

        Ok(updated)
    }

    /// Labor rate used by calculations; zero when settings were never set.
    #[instrument(skip(self))]
    pub async fn current_labor_rate(&self) -> Result<Decimal, ServiceError> {
        Ok(self
            .current()
            .await?
            .map(|s| s.labor_rate_per_hour)
            .unwrap_or(Decimal::ZERO))
    }
}
