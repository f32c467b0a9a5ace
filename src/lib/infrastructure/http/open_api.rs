//! OpenAPI module

use utoipa::OpenApi;

use crate::{
    domain::portfolio::{About, Language, PersonalInfo, Portfolio, Skills},
    infrastructure::http::{
        errors::{ErrorResponse, FieldErrorResponse},
        handlers::api::*,
    },
};

#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "Portfolio API"),
    paths(contact::handler, health::handler, portfolio::handler),
    components(schemas(
        contact::ContactFormBody,
        contact::ContactResponse,
        health::HealthResponse,
        Portfolio,
        PersonalInfo,
        About,
        Skills,
        Language,
        ErrorResponse,
        FieldErrorResponse,
    ))
)]
pub struct ApiDocs;
