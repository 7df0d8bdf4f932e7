use utoipa::OpenApi;

use crate::api;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::generate,
        api::serve_card,
        api::health,
        api::status,
    ),
    components(
        schemas(api::GenerateRequest, api::GenerateResponse, api::HealthResponse)
    ),
    tags(
        (name = "cardgen", description = "Share-card generation API")
    )
)]
pub struct ApiDoc;
