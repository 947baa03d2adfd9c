use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, FromQueryResult, IntoActiveModel, ModelTrait, Order, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Value,
};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;
use validator::Validate;

pub trait MergeIntoActiveModel<ActiveModelType> {
    /// Merge this update model into an existing active model
    ///
    /// # Errors
    ///
    /// Returns a `DbErr` if the merge operation fails due to data conversion issues.
    fn merge_into_activemodel(self, existing: ActiveModelType) -> Result<ActiveModelType, DbErr>;
}

/// A record type bound to one Sea-ORM entity, together with the collection
/// primitives the generic handlers in [`crate::routes`] are built on.
///
/// Every primitive has a default implementation against the entity, so an
/// implementor only declares its associated types, columns and names.
/// Lookups report a missing record as `Ok(None)`; `Err` is reserved for
/// failures of the database itself.
#[async_trait]
pub trait CRUDResource: Serialize + Sized + Send + Sync + 'static {
    type EntityType: EntityTrait<Model = Self::ModelType, Column = Self::ColumnType> + Sync;
    type ColumnType: ColumnTrait + std::fmt::Debug;
    type ModelType: ModelTrait<Entity = Self::EntityType>
        + FromQueryResult
        + IntoActiveModel<Self::ActiveModelType>
        + Into<Self>
        + Send
        + Sync;
    type ActiveModelType: ActiveModelTrait<Entity = Self::EntityType>
        + ActiveModelBehavior
        + Send
        + Sync;
    type CreateModel: Into<Self::ActiveModelType> + DeserializeOwned + Validate + Send + 'static;
    type UpdateModel: MergeIntoActiveModel<Self::ActiveModelType>
        + DeserializeOwned
        + Validate
        + Send
        + Sync
        + 'static;

    const ID_COLUMN: Self::ColumnType;
    /// Boolean column flipped by [`CRUDResource::toggle_active`].
    const ACTIVE_COLUMN: Self::ColumnType;
    const RESOURCE_NAME_SINGULAR: &'static str;
    const RESOURCE_NAME_PLURAL: &'static str;
    const RESOURCE_DESCRIPTION: &'static str = "";

    async fn create(
        db: &DatabaseConnection,
        create_model: Self::CreateModel,
    ) -> Result<Self, DbErr> {
        let active_model: Self::ActiveModelType = create_model.into();
        let model = active_model.insert(db).await?;
        Ok(model.into())
    }

    async fn count(db: &DatabaseConnection, condition: &Condition) -> Result<u64, DbErr> {
        let query = Self::EntityType::find().filter(condition.clone());
        PaginatorTrait::count(query, db).await
    }

    async fn find(
        db: &DatabaseConnection,
        condition: &Condition,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Self>, DbErr> {
        let models = Self::EntityType::find()
            .filter(condition.clone())
            .order_by(Self::default_index_column(), Order::Asc)
            .order_by(Self::ID_COLUMN, Order::Asc)
            .offset(offset)
            .limit(limit)
            .all(db)
            .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn find_model(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> Result<Option<Self::ModelType>, DbErr> {
        Self::EntityType::find()
            .filter(Self::ID_COLUMN.eq(id))
            .one(db)
            .await
    }

    async fn find_by_id(db: &DatabaseConnection, id: Uuid) -> Result<Option<Self>, DbErr> {
        Ok(Self::find_model(db, id).await?.map(Into::into))
    }

    async fn find_by_id_and_update(
        db: &DatabaseConnection,
        id: Uuid,
        update_model: Self::UpdateModel,
    ) -> Result<Option<Self>, DbErr> {
        let Some(model) = Self::find_model(db, id).await? else {
            return Ok(None);
        };
        let existing: Self::ActiveModelType = model.into_active_model();
        let merged = update_model.merge_into_activemodel(existing)?;
        let updated = merged.update(db).await?;
        Ok(Some(updated.into()))
    }

    /// Removes the record and hands back its last stored state.
    async fn find_by_id_and_delete(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> Result<Option<Self>, DbErr> {
        let Some(model) = Self::find_model(db, id).await? else {
            return Ok(None);
        };
        Self::EntityType::delete_many()
            .filter(Self::ID_COLUMN.eq(id))
            .exec(db)
            .await?;
        Ok(Some(model.into()))
    }

    async fn toggle_active(db: &DatabaseConnection, id: Uuid) -> Result<Option<Self>, DbErr> {
        let Some(model) = Self::find_model(db, id).await? else {
            return Ok(None);
        };
        let current = match model.get(Self::ACTIVE_COLUMN) {
            Value::Bool(Some(active)) => active,
            other => {
                return Err(DbErr::Type(format!(
                    "{} column {:?} is not a boolean: {other:?}",
                    Self::RESOURCE_NAME_SINGULAR,
                    Self::ACTIVE_COLUMN
                )));
            }
        };
        let mut active_model: Self::ActiveModelType = model.into_active_model();
        active_model.set(Self::ACTIVE_COLUMN, (!current).into());
        let updated = active_model.update(db).await?;
        Ok(Some(updated.into()))
    }

    /// Primary sort column of list pages. Ties are broken by `ID_COLUMN`.
    #[must_use]
    fn default_index_column() -> Self::ColumnType {
        Self::ID_COLUMN
    }

    /// Columns matched by the `q` parameter of the list handler.
    /// Default is empty, which disables search.
    #[must_use]
    fn fulltext_searchable_columns() -> Vec<(&'static str, Self::ColumnType)> {
        vec![]
    }
}
