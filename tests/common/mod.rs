use std::sync::Arc;

use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use serde_json::Value;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

use innkeeper_api::{
    config::AppConfig,
    db::{self, DbConfig},
    entities::{coupon, package, promotion, room, DiscountKind},
    events::{self, EventSender},
    handlers::AppServices,
    AppState,
};

/// Helper harness spinning up the full router against a fresh sqlite
/// database in a temp directory.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _event_task: tokio::task::JoinHandle<()>,
    _tmp: tempfile::TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let db_path = tmp.path().join("innkeeper_test.db");
        let db_cfg = DbConfig {
            url: format!("sqlite://{}?mode=rwc", db_path.display()),
            max_connections: 1,
            min_connections: 1,
            ..Default::default()
        };

        let pool = db::establish_connection_with_config(&db_cfg)
            .await
            .expect("connect test database");
        db::run_migrations(&pool).await.expect("run migrations");

        let db_arc = Arc::new(pool);
        let (event_tx, event_rx) = mpsc::channel(64);
        let event_sender = EventSender::new(event_tx);
        let event_task = tokio::spawn(events::process_events(event_rx));

        let services = AppServices::new(db_arc.clone(), Arc::new(event_sender.clone()));

        let config = AppConfig {
            database_url: db_cfg.url.clone(),
            host: "127.0.0.1".into(),
            port: 18_080,
            environment: "test".into(),
            log_level: "warn".into(),
            log_json: false,
            auto_migrate: true,
            cors_allowed_origins: None,
            db_max_connections: 1,
            db_min_connections: 1,
            db_connect_timeout_secs: 30,
            db_acquire_timeout_secs: 8,
            db_idle_timeout_secs: 600,
            request_timeout_secs: 30,
        };

        let state = AppState {
            db: db_arc,
            config,
            event_sender,
            services,
        };

        let router = Router::new()
            .nest("/api", innkeeper_api::api_routes())
            .with_state(state.clone());

        Self {
            router,
            state,
            _event_task: event_task,
            _tmp: tmp,
        }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router call")
    }

    pub async fn seed_room(&self, room_number: &str, price_per_night: Decimal) -> room::Model {
        self.seed_room_with_capacity(room_number, price_per_night, 2, 2, true)
            .await
    }

    pub async fn seed_room_with_capacity(
        &self,
        room_number: &str,
        price_per_night: Decimal,
        max_adults: i32,
        max_children: i32,
        allow_children: bool,
    ) -> room::Model {
        room::ActiveModel {
            id: Set(Uuid::new_v4()),
            room_number: Set(room_number.to_string()),
            room_type: Set("standard".to_string()),
            price_per_night: Set(price_per_night),
            max_adults: Set(max_adults),
            max_children: Set(max_children),
            allow_children: Set(allow_children),
            status: Set(room::RoomStatus::Available),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed room")
    }

    pub async fn seed_coupon(
        &self,
        code: &str,
        kind: DiscountKind,
        value: Decimal,
        usage_limit: Option<i32>,
        valid_from: NaiveDate,
        valid_to: NaiveDate,
    ) -> coupon::Model {
        coupon::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code.to_string()),
            discount_type: Set(kind),
            discount_value: Set(value),
            usage_limit: Set(usage_limit),
            used_count: Set(0),
            valid_from: Set(valid_from),
            valid_to: Set(valid_to),
            active: Set(true),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed coupon")
    }

    pub async fn seed_package(
        &self,
        name: &str,
        kind: DiscountKind,
        value: Decimal,
        valid_from: NaiveDate,
        valid_to: NaiveDate,
    ) -> package::Model {
        package::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            package_type: Set(kind),
            value: Set(value),
            valid_from: Set(valid_from),
            valid_to: Set(valid_to),
            active: Set(true),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed package")
    }

    pub async fn seed_promotion(
        &self,
        name: &str,
        kind: DiscountKind,
        value: Decimal,
        applicable_rooms: Option<Value>,
        valid_from: NaiveDate,
        valid_to: NaiveDate,
    ) -> promotion::Model {
        promotion::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            discount_type: Set(kind),
            discount_value: Set(value),
            valid_from: Set(valid_from),
            valid_to: Set(valid_to),
            active: Set(true),
            applicable_rooms: Set(applicable_rooms),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*self.state.db)
        .await
        .expect("seed promotion")
    }
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("parse response body")
}

pub fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected, "unexpected HTTP status");
}

pub fn decimal_field(value: &Value, pointer: &str) -> Decimal {
    let raw = value
        .pointer(pointer)
        .unwrap_or_else(|| panic!("missing field {pointer} in {value}"));
    match raw {
        Value::String(s) => s.parse().expect("parse decimal"),
        Value::Number(n) => n.to_string().parse().expect("parse decimal"),
        other => panic!("field {pointer} is not a decimal: {other}"),
    }
}
