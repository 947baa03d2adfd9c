use crate::errors::ApiError;
use crate::pagination::{ListQuery, Pagination};
use crate::response::{DataResponse, ListResponse, MessageResponse};
use crate::search::build_fulltext_condition;
use crate::traits::CRUDResource;
use crate::validation::ValidatedJson;
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};
use sea_orm::{Condition, DatabaseConnection};
use uuid::Uuid;

/// Builds the controller for one resource.
///
/// | method | path | handler |
/// |---|---|---|
/// | `POST` | `/` | [`create_one`] |
/// | `GET` | `/` | [`get_all`] |
/// | `GET` | `/{id}` | [`get_one`] |
/// | `PUT` | `/{id}` | [`update_one`] |
/// | `DELETE` | `/{id}` | [`delete_one`] |
/// | `PATCH` | `/{id}/toggle` | [`toggle_one`] |
///
/// Mount it with `Router::nest`, e.g. `.nest("/api/items", router::<Item>(&db))`.
pub fn router<R: CRUDResource>(db: &DatabaseConnection) -> Router {
    Router::new()
        .route("/", get(get_all::<R>).post(create_one::<R>))
        .route(
            "/{id}",
            get(get_one::<R>)
                .put(update_one::<R>)
                .delete(delete_one::<R>),
        )
        .route("/{id}/toggle", patch(toggle_one::<R>))
        .with_state(db.clone())
}

/// Path ids are UUIDs. A malformed id is not a lookup miss; it goes down the
/// same 500 path as a database failure.
fn parse_id<R: CRUDResource>(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|err| {
        ApiError::internal(format!(
            "malformed {} id `{raw}`: {err}",
            R::RESOURCE_NAME_SINGULAR
        ))
    })
}

fn not_found<R: CRUDResource>(id: Uuid) -> ApiError {
    ApiError::not_found(R::RESOURCE_NAME_SINGULAR, Some(id.to_string()))
}

/// Lists one page of records, optionally filtered by the `q` search term.
///
/// # Errors
///
/// Any database failure, as a 500.
pub async fn get_all<R: CRUDResource>(
    State(db): State<DatabaseConnection>,
    Query(params): Query<ListQuery>,
) -> Result<Json<ListResponse<R>>, ApiError> {
    let pagination = Pagination::from_query(&params);
    let condition = params
        .search_term()
        .and_then(build_fulltext_condition::<R>)
        .unwrap_or_else(Condition::all);

    // Count and page are independent reads; under concurrent writes the
    // total may not match the rows returned.
    let (total, items) = tokio::try_join!(
        R::count(&db, &condition),
        R::find(&db, &condition, pagination.offset(), pagination.limit),
    )?;

    tracing::debug!(
        resource = R::RESOURCE_NAME_PLURAL,
        page = pagination.page,
        limit = pagination.limit,
        total,
        "listed records"
    );
    Ok(Json(ListResponse::new(pagination.meta(total), items)))
}

/// # Errors
///
/// 404 when no record matches, 500 for a malformed id.
pub async fn get_one<R: CRUDResource>(
    State(db): State<DatabaseConnection>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<R>>, ApiError> {
    let id = parse_id::<R>(&id)?;
    let item = R::find_by_id(&db, id)
        .await?
        .ok_or_else(|| not_found::<R>(id))?;
    Ok(Json(DataResponse::new(item)))
}

/// # Errors
///
/// 400 with the field errors when the payload fails validation.
pub async fn create_one<R: CRUDResource>(
    State(db): State<DatabaseConnection>,
    ValidatedJson(payload): ValidatedJson<R::CreateModel>,
) -> Result<(StatusCode, Json<DataResponse<R>>), ApiError> {
    let created = R::create(&db, payload).await?;
    tracing::debug!(resource = R::RESOURCE_NAME_SINGULAR, "created record");
    Ok((StatusCode::CREATED, Json(DataResponse::new(created))))
}

/// Applies a partial update.
///
/// # Errors
///
/// 400 for an invalid payload, 404 when no record matches, 500 for a
/// malformed id.
pub async fn update_one<R: CRUDResource>(
    State(db): State<DatabaseConnection>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<R::UpdateModel>,
) -> Result<Json<DataResponse<R>>, ApiError> {
    let id = parse_id::<R>(&id)?;
    let updated = R::find_by_id_and_update(&db, id, payload)
        .await?
        .ok_or_else(|| not_found::<R>(id))?;
    tracing::debug!(resource = R::RESOURCE_NAME_SINGULAR, %id, "updated record");
    Ok(Json(DataResponse::new(updated)))
}

/// # Errors
///
/// 404 when no record matches, 500 for a malformed id.
pub async fn delete_one<R: CRUDResource>(
    State(db): State<DatabaseConnection>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id::<R>(&id)?;
    R::find_by_id_and_delete(&db, id)
        .await?
        .ok_or_else(|| not_found::<R>(id))?;
    tracing::debug!(resource = R::RESOURCE_NAME_SINGULAR, %id, "deleted record");
    Ok(Json(MessageResponse::success("Deleted")))
}

/// Flips the resource's active flag.
///
/// # Errors
///
/// 404 when no record matches, 500 for a malformed id.
pub async fn toggle_one<R: CRUDResource>(
    State(db): State<DatabaseConnection>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<R>>, ApiError> {
    let id = parse_id::<R>(&id)?;
    let toggled = R::toggle_active(&db, id)
        .await?
        .ok_or_else(|| not_found::<R>(id))?;
    tracing::debug!(resource = R::RESOURCE_NAME_SINGULAR, %id, "toggled active flag");
    Ok(Json(DataResponse::new(toggled)))
}
