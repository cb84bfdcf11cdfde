use crate::{
    costing::yields::compute_yield,
    db::DbPool,
    entities::{raw_material, yield_test, yield_test::Entity as YieldTestEntity},
    errors::ServiceError,
    events::{Event, EventSender},
};
use chrono::{DateTime, Utc};
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
pub struct CreateYieldTestInput {
    pub raw_material_id: i64,
    pub test_date: Option<DateTime<Utc>>,
    pub ap_weight: Decimal,
    pub ep_weight: Decimal,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateYieldTestInput {
    pub test_date: Option<DateTime<Utc>>,
    pub ap_weight: Option<Decimal>,
    pub ep_weight: Option<Decimal>,
    pub notes: Option<String>,
}

/// Average yield over the most recent tests of a material
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialYieldAverage {
    pub raw_material_id: i64,
    pub average_yield: Decimal,
    pub sample_count: u64,
}

#[derive(Clone)]
pub struct YieldTestService {
    db_pool: Arc<DbPool>,
    event_sender: Arc<EventSender>,
}

impl YieldTestService {
    pub fn new(db_pool: Arc<DbPool>, event_sender: Arc<EventSender>) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    fn connection(&self) -> &DbPool {
        &self.db_pool
    }

    async fn material(&self, id: i64) -> Result<raw_material::Model, ServiceError> {
        raw_material::Entity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Material {} not found", id)))
    }

    /// Records a yield test and writes the measured yield back onto the
    /// owning material. Propagation happens on create only; edits to old
    /// tests do not rewrite the material (last write wins).
    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        input: CreateYieldTestInput,
    ) -> Result<yield_test::Model, ServiceError> {
        let material = self.material(input.raw_material_id).await?;
        let yield_percentage = compute_yield(input.ap_weight, input.ep_weight)?;

        let now = Utc::now();
        let model = yield_test::ActiveModel {
            id: Default::default(),
            raw_material_id: Set(material.id),
            test_date: Set(input.test_date.unwrap_or(now).into()),
            ap_weight: Set(input.ap_weight),
            ep_weight: Set(input.ep_weight),
            yield_percentage: Set(yield_percentage),
            notes: Set(input.notes),
            created_at: Set(now.into()),
        };

        let created = model
            .insert(self.connection())
            .await
            .map_err(ServiceError::db_error)?;

        let mut material = material;
        material.yield_percentage = yield_percentage;
        material.updated_at = now.into();
        material
            .into_active_model()
            .reset_all()
            .update(self.connection())
            .await
            .map_err(ServiceError::db_error)?;

        self.event_sender
            .send_or_log(Event::YieldTestRecorded {
                yield_test_id: created.id,
                material_id: created.raw_material_id,
                yield_percentage,
                applied_to_material: true,
            })
            .await;

        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<yield_test::Model, ServiceError> {
        YieldTestEntity::find_by_id(id)
            .one(self.connection())
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Yield test {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        raw_material_id: Option<i64>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<yield_test::Model>, u64), ServiceError> {
        let mut query = YieldTestEntity::find().order_by_desc(yield_test::Column::TestDate);

        if let Some(material_id) = raw_material_id {
            query = query.filter(yield_test::Column::RawMaterialId.eq(material_id));
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

    /// Recomputes the yield when weights change but does NOT push the new
    /// value onto the material; only fresh tests drive the current yield.
    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i64,
        input: UpdateYieldTestInput,
    ) -> Result<yield_test::Model, ServiceError> {
        let mut model = self.get(id).await?;

        if let Some(test_date) = input.test_date {
            model.test_date = test_date.into();
        }
        if let Some(ap_weight) = input.ap_weight {
            model.ap_weight = ap_weight;
        }
        if let Some(ep_weight) = input.ep_weight {
            model.ep_weight = ep_weight;
        }
        if let Some(notes) = input.notes {
            model.notes = Some(notes);
        }
        model.yield_percentage = compute_yield(model.ap_weight, model.ep_weight)?;

        let updated = model
            .into_active_model()
            .reset_all()
            .update(self.connection())
            .await
            .map_err(ServiceError::db_error)?;

        self.event_sender
            .send_or_log(Event::YieldTestRecorded {
                yield_test_id: updated.id,
                material_id: updated.raw_material_id,
                yield_percentage: updated.yield_percentage,
                applied_to_material: false,
            })
            .await;

        Ok(updated)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let model = self.get(id).await?;
        model
            .delete(self.connection())
            .await
            .map_err(ServiceError::db_error)?;
        Ok(())
    }

    /// Mean yield of the material's last 10 tests by test date. With no
    /// tests on record the material is assumed lossless (100%).
    #[instrument(skip(self))]
    pub async fn material_average(
        &self,
        raw_material_id: i64,
    ) -> Result<MaterialYieldAverage, ServiceError> {
        self.material(raw_material_id).await?;

        let tests = YieldTestEntity::find()
            .filter(yield_test::Column::RawMaterialId.eq(raw_material_id))
            .order_by_desc(yield_test::Column::TestDate)
            .limit(10)
            .all(self.connection())
            .await
            .map_err(ServiceError::db_error)?;

        let sample_count = tests.len() as u64;
        let average_yield = if tests.is_empty() {
            Decimal::from(100)
        } else {
            tests
                .iter()
                .map(|t| t.yield_percentage)
                .sum::<Decimal>()
                / Decimal::from(sample_count)
        };

        Ok(MaterialYieldAverage {
            raw_material_id,
            average_yield,
            sample_count,
        })
    }
}
