pub mod department;
pub mod employee;

use actix_web::web;

/// Wires every route; `/{entity}/random` must register before `/{entity}/{id}`
/// so the literal segment wins.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/employees")
            .route(web::get().to(employee::get_employees))
            .route(web::post().to(employee::create_employee)),
    )
    .service(
        web::resource("/employees/random").route(web::get().to(employee::get_random_employee)),
    )
    .service(
        web::resource("/employees/{id}")
            .route(web::get().to(employee::get_employee))
            .route(web::put().to(employee::update_employee))
            .route(web::delete().to(employee::delete_employee)),
    )
    .service(
        web::resource("/departments")
            .route(web::get().to(department::get_departments))
            .route(web::post().to(department::create_department)),
    )
    .service(
        web::resource("/departments/random")
            .route(web::get().to(department::get_random_department)),
    )
    .service(
        web::resource("/departments/{id}")
            .route(web::get().to(department::get_department))
            .route(web::put().to(department::update_department))
            .route(web::delete().to(department::delete_department)),
    );
}
