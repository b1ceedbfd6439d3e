use actix_web::{web, HttpResponse};
use serde::Deserialize;

use crate::domain::customer::{
    CreateCustomer, CustomerError, CustomerIdResponse, CustomerService, UpdateAddress,
};

type HandlerResult = Result<HttpResponse, CustomerError>;

/// Optional name filters on GET /api/customers.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSearch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

pub async fn list_customers(
    service: web::Data<CustomerService>,
    query: web::Query<CustomerSearch>,
) -> HandlerResult {
    let customers = service
        .search(query.first_name.as_deref(), query.last_name.as_deref())
        .await?;
    Ok(HttpResponse::Ok().json(customers))
}

pub async fn get_customer(
    service: web::Data<CustomerService>,
    path: web::Path<String>,
) -> HandlerResult {
    let customer = service.find_by_global_id(&path).await?;
    Ok(HttpResponse::Ok().json(customer))
}

pub async fn create_customer(
    service: web::Data<CustomerService>,
    payload: web::Json<CreateCustomer>,
) -> HandlerResult {
    let id = service.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(CustomerIdResponse { id }))
}

pub async fn update_customer_address(
    service: web::Data<CustomerService>,
    path: web::Path<String>,
    payload: web::Json<UpdateAddress>,
) -> HandlerResult {
    service
        .update_address(&path, payload.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
