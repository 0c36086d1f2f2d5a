// ============================================================================
// HTTP API - Order routes
// ============================================================================
//
// POST  /order               create an order
// GET   /orders              list every order
// GET   /orders/{statuses}   list orders in any of a comma-separated set
// GET   /order/detail/{id}   one order
// PATCH /order/{id}          change an order's status
//
// ============================================================================

mod errors;
mod handlers;

pub use errors::json_config;

use std::future::Future;
use std::sync::Arc;

use actix_web::web;

use crate::domain::order::{OrderCommandHandler, OrderError, OrderQueryHandler};
use crate::metrics::Metrics;

pub struct AppState {
    pub queries: OrderQueryHandler,
    pub commands: OrderCommandHandler,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(
        queries: OrderQueryHandler,
        commands: OrderCommandHandler,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            queries,
            commands,
            metrics,
        }
    }

    /// Time `operation` and count its failure, if any, by error kind.
    async fn observe<T, F>(&self, operation: &str, fut: F) -> Result<T, OrderError>
    where
        F: Future<Output = Result<T, OrderError>>,
    {
        let timer = self
            .metrics
            .request_duration
            .with_label_values(&[operation])
            .start_timer();
        let result = fut.await;
        timer.observe_duration();

        if let Err(e) = &result {
            self.metrics
                .requests_failed
                .with_label_values(&[e.kind().as_str()])
                .inc();
        }
        result
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/order", web::post().to(handlers::create_order))
        .route("/orders", web::get().to(handlers::list_all))
        .route("/orders/{statuses}", web::get().to(handlers::list_by_status))
        .route("/order/detail/{id}", web::get().to(handlers::order_detail))
        .route("/order/{id}", web::patch().to(handlers::update_status));
}

// ============================================================================
// HTTP Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use actix_web::dev::ServiceResponse;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::{json, Value};
    use uuid::Uuid;

    use super::*;
    use crate::clients::OpenCatalog;
    use crate::domain::order::{RecordMapper, TransitionPolicy, UuidCodec};
    use crate::store::testing::UnavailableRepository;
    use crate::store::{MemoryOrderRepository, OrderRepository};

    fn state_with(repo: Arc<dyn OrderRepository>) -> web::Data<AppState> {
        let codec = Arc::new(UuidCodec);
        web::Data::new(AppState::new(
            OrderQueryHandler::new(repo.clone(), Arc::new(RecordMapper), codec.clone()),
            OrderCommandHandler::new(
                repo,
                codec,
                Arc::new(OpenCatalog),
                TransitionPolicy::Unrestricted,
            ),
            Arc::new(Metrics::new().unwrap()),
        ))
    }

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data($state.clone())
                    .app_data(json_config())
                    .configure(configure),
            )
            .await
        };
    }

    async fn json_body(resp: ServiceResponse) -> Value {
        test::read_body_json(resp).await
    }

    fn order_body() -> Value {
        json!({
            "customer_id": "customer-1",
            "items": [{ "product_id": "x-burger", "quantity": 2 }]
        })
    }

    #[actix_web::test]
    async fn test_create_then_fetch_detail() {
        let state = state_with(Arc::new(MemoryOrderRepository::new()));
        let app = app!(state);

        let resp = test::call_service(
            &app,
            test::TestRequest::post().uri("/order").set_json(order_body()).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created = json_body(resp).await;
        assert_eq!(created["status"], "received");
        let id = created["id"].as_str().unwrap().to_string();

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri(&format!("/order/detail/{id}")).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let order = json_body(resp).await;
        assert_eq!(order["id"], id.as_str());
        assert_eq!(order["items"][0]["quantity"], 2);
        assert_eq!(state.metrics.orders_created.get(), 1);
    }

    #[actix_web::test]
    async fn test_create_rejects_malformed_body() {
        let state = state_with(Arc::new(MemoryOrderRepository::new()));
        let app = app!(state);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/order")
                .set_json(json!({ "customer_id": "customer-1" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(resp).await["error"], "validation");

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/order")
                .set_json(json!({ "customer_id": "customer-1", "items": [] }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_list_by_status_and_update() {
        let state = state_with(Arc::new(MemoryOrderRepository::new()));
        let app = app!(state);

        let resp = test::call_service(
            &app,
            test::TestRequest::post().uri("/order").set_json(order_body()).to_request(),
        )
        .await;
        let id = json_body(resp).await["id"].as_str().unwrap().to_string();

        let resp = test::call_service(
            &app,
            test::TestRequest::patch()
                .uri(&format!("/order/{id}"))
                .set_json(json!({ "status": "PRONTO" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(json_body(resp).await, json!({ "status": "ready" }));

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/orders/received,ready").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let orders = json_body(resp).await;
        assert_eq!(orders.as_array().unwrap().len(), 1);
        assert_eq!(orders[0]["status"], "ready");

        let resp = test::call_service(&app, test::TestRequest::get().uri("/orders").to_request()).await;
        assert_eq!(json_body(resp).await.as_array().unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_error_mapping() {
        let state = state_with(Arc::new(MemoryOrderRepository::new()));
        let app = app!(state);

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/orders/ready,not_a_status").to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = json_body(resp).await;
        assert_eq!(body["message"], "not_a_status is not a valid status");

        let resp = test::call_service(
            &app,
            test::TestRequest::patch()
                .uri("/order/123")
                .set_json(json!({ "status": "ready" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(resp).await["message"], "123 is not a valid order id");

        let resp = test::call_service(
            &app,
            test::TestRequest::patch()
                .uri(&format!("/order/{}", Uuid::new_v4()))
                .set_json(json!({ "status": "ready" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(resp).await["error"], "not_found");

        assert_eq!(
            state.metrics.requests_failed.with_label_values(&["validation"]).get(),
            2
        );
    }

    #[actix_web::test]
    async fn test_store_failure_is_opaque() {
        let state = state_with(Arc::new(UnavailableRepository));
        let app = app!(state);

        let resp = test::call_service(&app, test::TestRequest::get().uri("/orders").to_request()).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = json_body(resp).await;
        assert_eq!(body["error"], "internal");
        assert_eq!(body["message"], "internal server error");
    }
}
