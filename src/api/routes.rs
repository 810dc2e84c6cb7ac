use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{
    handlers::{
        crops::{delete_crop, list_crops, post_crop},
        farms::{
            get_farm, get_grid, list_farms, post_merge, post_reset, post_unmerge, put_direction,
            put_plot,
        },
        logs::{list_logs, post_log},
    },
    openapi::ApiDoc,
};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(list_farms)
            .service(get_farm)
            .service(get_grid)
            .service(put_plot)
            .service(post_merge)
            .service(post_unmerge)
            .service(post_reset)
            .service(put_direction)
            .service(list_logs)
            .service(post_log)
            .service(list_crops)
            .service(post_crop)
            .service(delete_crop),
    )
    .service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );
}
