use actix_web::{web, HttpResponse};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::department::{Department, DepartmentDraft, DepartmentPatch};
use crate::store::{DocumentStore, Filter};

pub async fn get_departments(
    store: web::Data<dyn DocumentStore>,
) -> Result<HttpResponse, AppError> {
    let docs = store.find(Department::COLLECTION, &Filter::new()).await?;
    let departments = docs
        .into_iter()
        .map(Department::from_document)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(HttpResponse::Ok().json(departments))
}

pub async fn get_random_department(
    store: web::Data<dyn DocumentStore>,
) -> Result<HttpResponse, AppError> {
    let doc = store
        .find_random(Department::COLLECTION)
        .await?
        .ok_or_else(|| AppError::NotFound("No departments".to_string()))?;
    Ok(HttpResponse::Ok().json(Department::from_document(doc)?))
}

pub async fn get_department(
    store: web::Data<dyn DocumentStore>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let doc = store
        .find_by_id(Department::COLLECTION, id.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Department not found".to_string()))?;
    Ok(HttpResponse::Ok().json(Department::from_document(doc)?))
}

pub async fn create_department(
    store: web::Data<dyn DocumentStore>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let draft = DepartmentDraft::from_value(&payload)?;
    let doc = store
        .insert(Department::COLLECTION, draft.into_body())
        .await?;
    Ok(HttpResponse::Created().json(Department::from_document(doc)?))
}

pub async fn update_department(
    store: web::Data<dyn DocumentStore>,
    id: web::Path<Uuid>,
    payload: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let patch = DepartmentPatch::from_value(&payload)?.into_patch();
    let modified = store
        .update_by_id(Department::COLLECTION, id.into_inner(), &patch)
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "modified": modified })))
}

// Deliberately no cascade: employees referencing the department keep their
// `department` field as-is.
pub async fn delete_department(
    store: web::Data<dyn DocumentStore>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let deleted = store
        .delete_by_id(Department::COLLECTION, id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "deleted": deleted })))
}

#[cfg(test)]
mod tests {
    use crate::handlers;
    use crate::store::memory::MemoryStore;
    use crate::store::{DocumentStore, Filter};
    use actix_web::http::StatusCode;
    use actix_web::web::Data;
    use actix_web::{test, App};
    use serde_json::{json, Value};
    use std::sync::Arc;

    #[actix_web::test]
    async fn create_update_delete_department() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let app = test::init_service(
            App::new()
                .app_data(Data::from(store))
                .configure(handlers::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/departments")
            .set_json(json!({"name": "HR"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        assert_eq!(created["name"], "HR");
        let id = created["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::put()
            .uri(&format!("/departments/{id}"))
            .set_json(json!({"name": "People Ops"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(&format!("/departments/{id}"))
            .to_request();
        let fetched: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(fetched["name"], "People Ops");

        let req = test::TestRequest::delete()
            .uri(&format!("/departments/{id}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/departments").to_request();
        let listed: Vec<Value> = test::read_body_json(test::call_service(&app, req).await).await;
        assert!(listed.is_empty());
    }

    #[actix_web::test]
    async fn create_rejects_missing_name() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let app = test::init_service(
            App::new()
                .app_data(Data::from(store))
                .configure(handlers::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/departments")
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["fields"]["name"].is_array());
    }

    #[actix_web::test]
    async fn deleting_a_department_leaves_employees_alone() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let app = test::init_service(
            App::new()
                .app_data(Data::from(store.clone()))
                .configure(handlers::configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/departments")
            .set_json(json!({"name": "HR"}))
            .to_request();
        let created: Value = test::read_body_json(test::call_service(&app, req).await).await;
        let id = created["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::post()
            .uri("/employees")
            .set_json(json!({"firstName": "John", "lastName": "Doe", "department": "HR"}))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::delete()
            .uri(&format!("/departments/{id}"))
            .to_request();
        test::call_service(&app, req).await;

        let employees = store.find("employees", &Filter::new()).await.unwrap();
        assert_eq!(employees.len(), 1);
        assert_eq!(employees[0].body["department"], "HR");
    }
}
