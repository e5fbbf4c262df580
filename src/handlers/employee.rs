use actix_web::{web, HttpResponse};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::employee::{Employee, EmployeeDraft, EmployeePatch};
use crate::store::{DocumentStore, Filter};

pub async fn get_employees(
    store: web::Data<dyn DocumentStore>,
) -> Result<HttpResponse, AppError> {
    let docs = store.find(Employee::COLLECTION, &Filter::new()).await?;
    let employees = docs
        .into_iter()
        .map(Employee::from_document)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(HttpResponse::Ok().json(employees))
}

pub async fn get_random_employee(
    store: web::Data<dyn DocumentStore>,
) -> Result<HttpResponse, AppError> {
    let doc = store
        .find_random(Employee::COLLECTION)
        .await?
        .ok_or_else(|| AppError::NotFound("No employees".to_string()))?;
    Ok(HttpResponse::Ok().json(Employee::from_document(doc)?))
}

pub async fn get_employee(
    store: web::Data<dyn DocumentStore>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let doc = store
        .find_by_id(Employee::COLLECTION, id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;
    Ok(HttpResponse::Ok().json(Employee::from_document(doc)?))
}

pub async fn create_employee(
    store: web::Data<dyn DocumentStore>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let draft = EmployeeDraft::from_value(&payload)?;
    let doc = store.insert(Employee::COLLECTION, draft.into_body()).await?;
    Ok(HttpResponse::Created().json(Employee::from_document(doc)?))
}

// Patch semantics: an unknown id is reported as zero modifications, not as an
// error, so updates are safe to repeat.
pub async fn update_employee(
    store: web::Data<dyn DocumentStore>,
    id: web::Path<Uuid>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let patch = EmployeePatch::from_value(&payload)?.into_patch();
    let modified = store
        .update_by_id(Employee::COLLECTION, id.into_inner(), &patch)
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "modified": modified })))
}

pub async fn delete_employee(
    store: web::Data<dyn DocumentStore>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let deleted = store
        .delete_by_id(Employee::COLLECTION, id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "deleted": deleted })))
}
