use utoipa::openapi::{
    OpenApiBuilder, RefOr, Required,
    content::{Content, ContentBuilder},
    path::{
        HttpMethod, OperationBuilder, Parameter, ParameterBuilder, ParameterIn,
        PathItemBuilder, PathsBuilder,
    },
    request_body::RequestBodyBuilder,
    response::{Response, ResponseBuilder},
    schema::{Array, KnownFormat, ObjectBuilder, Ref, Schema, SchemaFormat, Type},
    tag::TagBuilder,
};
use utoipa::{OpenApi, ToSchema};

use crate::app::ITEMS_PATH;
use crate::item::{Item, ItemCreate, ItemUpdate};
use crate::pagination::PaginationMeta;
use crate::traits::CRUDResource;
use crate::validation::FieldError;

/// Component schemas shared by every mounted resource.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "crudcontroller",
        description = "CRUD controller for the items collection"
    ),
    components(schemas(Item, ItemCreate, ItemUpdate, PaginationMeta, FieldError))
)]
pub struct ApiDoc;

/// Document served at `/api-docs/openapi.json`.
#[must_use]
pub fn api_doc() -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();
    doc.merge(resource_paths::<Item>(ITEMS_PATH));
    doc
}

/// The six operations of [`crate::routes::router`] for `R`, mounted at `base`,
/// under one tag named after the resource.
#[must_use]
pub fn resource_paths<R>(base: &str) -> utoipa::openapi::OpenApi
where
    R: CRUDResource + ToSchema,
    R::CreateModel: ToSchema,
    R::UpdateModel: ToSchema,
{
    let singular = R::RESOURCE_NAME_SINGULAR;
    let plural = R::RESOURCE_NAME_PLURAL;
    let record = schema_ref(&<R as ToSchema>::name());

    let collection = PathItemBuilder::new()
        .operation(
            HttpMethod::Get,
            operation::<R>(format!("list_{plural}"), format!("List {plural}"))
                .parameter(query_param("page", "Page number, starting at 1", Type::Integer))
                .parameter(query_param("limit", "Page size, 1 to 100", Type::Integer))
                .parameter(query_param("q", "Case-insensitive search term", Type::String))
                .response("200", json_response("One page of records", list_envelope(record.clone())))
                .response("500", message_response("Storage failure"))
                .build(),
        )
        .operation(
            HttpMethod::Post,
            operation::<R>(format!("create_{singular}"), format!("Create a {singular}"))
                .request_body(Some(json_body(&<R::CreateModel as ToSchema>::name())))
                .response("201", json_response("Created", data_envelope(record.clone())))
                .response("400", validation_response())
                .response("500", message_response("Storage failure"))
                .build(),
        )
        .build();

    let single = PathItemBuilder::new()
        .operation(
            HttpMethod::Get,
            by_id::<R>(format!("get_{singular}"), format!("Get a {singular} by id"))
                .response("200", json_response("The record", data_envelope(record.clone())))
                .build(),
        )
        .operation(
            HttpMethod::Put,
            by_id::<R>(format!("update_{singular}"), format!("Partially update a {singular}"))
                .request_body(Some(json_body(&<R::UpdateModel as ToSchema>::name())))
                .response("200", json_response("Updated", data_envelope(record.clone())))
                .response("400", validation_response())
                .build(),
        )
        .operation(
            HttpMethod::Delete,
            by_id::<R>(format!("delete_{singular}"), format!("Delete a {singular}"))
                .response("200", message_response("Deleted"))
                .build(),
        )
        .build();

    let toggle = PathItemBuilder::new()
        .operation(
            HttpMethod::Patch,
            by_id::<R>(format!("toggle_{singular}"), format!("Flip the active flag of a {singular}"))
                .response("200", json_response("Toggled", data_envelope(record)))
                .build(),
        )
        .build();

    let paths = PathsBuilder::new()
        .path(base.to_string(), collection)
        .path(format!("{base}/{{id}}"), single)
        .path(format!("{base}/{{id}}/toggle"), toggle)
        .build();

    let description = Some(R::RESOURCE_DESCRIPTION).filter(|text| !text.is_empty());
    let tag = TagBuilder::new()
        .name(plural)
        .description(description)
        .build();

    OpenApiBuilder::new()
        .paths(paths)
        .tags(Some(vec![tag]))
        .build()
}

fn operation<R: CRUDResource>(id: String, summary: String) -> OperationBuilder {
    OperationBuilder::new()
        .tag(R::RESOURCE_NAME_PLURAL)
        .operation_id(Some(id))
        .summary(Some(summary))
}

/// Operations on `/{id}`: they share the id parameter, the 404 and the 500
/// a malformed id or storage failure produces.
fn by_id<R: CRUDResource>(id: String, summary: String) -> OperationBuilder {
    let id_param: Parameter = ParameterBuilder::new()
        .name("id")
        .parameter_in(ParameterIn::Path)
        .required(Required::True)
        .schema(Some(scalar(Type::String, Some(KnownFormat::Uuid))))
        .build();
    operation::<R>(id, summary)
        .parameter(id_param)
        .response("404", message_response("No record has this id"))
        .response("500", message_response("Malformed id or storage failure"))
}

fn query_param(name: &str, description: &str, schema_type: Type) -> Parameter {
    let format = matches!(schema_type, Type::Integer).then_some(KnownFormat::Int64);
    ParameterBuilder::new()
        .name(name)
        .parameter_in(ParameterIn::Query)
        .required(Required::False)
        .description(Some(description))
        .schema(Some(scalar(schema_type, format)))
        .build()
}

fn scalar(schema_type: Type, format: Option<KnownFormat>) -> RefOr<Schema> {
    RefOr::T(Schema::Object(
        ObjectBuilder::new()
            .schema_type(schema_type)
            .format(format.map(SchemaFormat::KnownFormat))
            .build(),
    ))
}

fn schema_ref(name: &str) -> RefOr<Schema> {
    RefOr::Ref(Ref::from_schema_name(name))
}

fn json_content(schema: RefOr<Schema>) -> Content {
    ContentBuilder::new().schema(Some(schema)).build()
}

fn json_body(schema_name: &str) -> utoipa::openapi::request_body::RequestBody {
    RequestBodyBuilder::new()
        .content("application/json", json_content(schema_ref(schema_name)))
        .required(Some(Required::True))
        .build()
}

fn json_response(description: &str, schema: RefOr<Schema>) -> Response {
    ResponseBuilder::new()
        .description(description)
        .content("application/json", json_content(schema))
        .build()
}

fn success_flag() -> RefOr<Schema> {
    scalar(Type::Boolean, None)
}

/// `{ "success": true, "data": <record> }`
fn data_envelope(record: RefOr<Schema>) -> RefOr<Schema> {
    RefOr::T(Schema::Object(
        ObjectBuilder::new()
            .property("success", success_flag())
            .required("success")
            .property("data", record)
            .required("data")
            .build(),
    ))
}

/// `{ "success": true, "meta": {...}, "data": [<record>] }`
fn list_envelope(record: RefOr<Schema>) -> RefOr<Schema> {
    RefOr::T(Schema::Object(
        ObjectBuilder::new()
            .property("success", success_flag())
            .required("success")
            .property("meta", schema_ref("PaginationMeta"))
            .required("meta")
            .property("data", RefOr::T(Schema::Array(Array::new(record))))
            .required("data")
            .build(),
    ))
}

fn message_response(description: &str) -> Response {
    let message = RefOr::T(Schema::Object(
        ObjectBuilder::new()
            .property("success", success_flag())
            .required("success")
            .property("message", scalar(Type::String, None))
            .required("message")
            .build(),
    ));
    json_response(description, message)
}

fn validation_response() -> Response {
    let errors = RefOr::T(Schema::Object(
        ObjectBuilder::new()
            .property(
                "errors",
                RefOr::T(Schema::Array(Array::new(schema_ref("FieldError")))),
            )
            .required("errors")
            .build(),
    ));
    json_response("Payload failed validation", errors)
}
