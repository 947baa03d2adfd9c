#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use crudcontroller::item::Item;
use crudcontroller::router;
use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::prelude::*;
use serde_json::Value;
use tower::ServiceExt;

pub mod flag_entity;

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;

    // Run migrations
    Migrator::up(&db, None).await?;

    Ok(db)
}

/// A database with no tables, so every query fails.
pub async fn setup_empty_db() -> Result<DatabaseConnection, DbErr> {
    Database::connect("sqlite::memory:").await
}

pub fn setup_test_app(db: DatabaseConnection) -> Router {
    Router::new()
        .nest("/api/items", router::<Item>(&db))
        .nest("/api/flags", router::<flag_entity::Flag>(&db))
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    send_request(app, request).await
}

pub async fn send_raw(app: &Router, method: &str, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send_request(app, request).await
}

async fn send_request(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Creates an item and returns its `data` object.
pub async fn create_item(app: &Router, body: Value) -> Value {
    let (status, response) = send(app, "POST", "/api/items", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{response}");
    response["data"].clone()
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateItemsTable), Box::new(CreateFlagsTable)]
    }
}

pub struct CreateItemsTable;

impl MigrationName for CreateItemsTable {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_items_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateItemsTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(Items::Table)
            .if_not_exists()
            .col(ColumnDef::new(Items::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Items::Name).string().not_null())
            .col(ColumnDef::new(Items::Description).text().null())
            .col(
                ColumnDef::new(Items::Active)
                    .boolean()
                    .not_null()
                    .default(true),
            )
            .col(
                ColumnDef::new(Items::CreatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .col(
                ColumnDef::new(Items::UpdatedAt)
                    .timestamp_with_time_zone()
                    .not_null(),
            )
            .to_owned();

        manager.create_table(table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Items::Table).to_owned())
            .await
    }
}

pub struct CreateFlagsTable;

impl MigrationName for CreateFlagsTable {
    fn name(&self) -> &'static str {
        "m20240101_000002_create_flags_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateFlagsTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(Flags::Table)
            .if_not_exists()
            .col(ColumnDef::new(Flags::Id).uuid().not_null().primary_key())
            .col(ColumnDef::new(Flags::Key).string().not_null())
            .col(ColumnDef::new(Flags::Enabled).boolean().not_null())
            .to_owned();

        manager.create_table(table).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Flags::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Items {
    Table,
    Id,
    Name,
    Description,
    Active,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Flags {
    Table,
    Id,
    Key,
    Enabled,
}
