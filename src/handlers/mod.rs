use actix_web::web;

pub mod clock;
pub mod status;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/clock-in", web::post().to(clock::clock_in))
        .route("/clock-out", web::post().to(clock::clock_out))
        .route("/users/{user_id}", web::get().to(status::user_status));
}
