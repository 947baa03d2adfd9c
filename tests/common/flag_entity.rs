use async_trait::async_trait;
use crudcontroller::{CRUDResource, MergeIntoActiveModel};
use sea_orm::{ActiveValue::Set, entity::prelude::*};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A second resource whose toggled column is `enabled`, not `active`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "flags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub key: String,
    pub enabled: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flag {
    pub id: Uuid,
    pub key: String,
    pub enabled: bool,
}

impl From<Model> for Flag {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            key: model.key,
            enabled: model.enabled,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct FlagCreate {
    #[validate(length(min = 1, max = 64))]
    pub key: String,
    #[serde(default)]
    pub enabled: bool,
}

impl From<FlagCreate> for ActiveModel {
    fn from(create: FlagCreate) -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            key: Set(create.key),
            enabled: Set(create.enabled),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct FlagUpdate {
    #[serde(default)]
    #[validate(length(min = 1, max = 64))]
    pub key: Option<String>,
}

impl MergeIntoActiveModel<ActiveModel> for FlagUpdate {
    fn merge_into_activemodel(self, mut existing: ActiveModel) -> Result<ActiveModel, DbErr> {
        if let Some(key) = self.key {
            existing.key = Set(key);
        }
        Ok(existing)
    }
}

#[async_trait]
impl CRUDResource for Flag {
    type EntityType = Entity;
    type ColumnType = Column;
    type ModelType = Model;
    type ActiveModelType = ActiveModel;
    type CreateModel = FlagCreate;
    type UpdateModel = FlagUpdate;

    const ID_COLUMN: Self::ColumnType = Column::Id;
    const ACTIVE_COLUMN: Self::ColumnType = Column::Enabled;
    const RESOURCE_NAME_SINGULAR: &'static str = "flag";
    const RESOURCE_NAME_PLURAL: &'static str = "flags";
}
