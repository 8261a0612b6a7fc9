/// HTTP request handlers
///
/// One module per resource; every response goes through the standard
/// envelope, every failure through `AppError`.
pub mod blogs;
pub mod comments;
pub mod events;
pub mod likes;
pub mod projects;
pub mod users;

use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(blogs::configure)
            .configure(projects::configure)
            .configure(events::configure)
            .configure(comments::configure)
            .configure(likes::configure)
            .configure(users::configure),
    );
}
