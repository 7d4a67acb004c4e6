mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::{json, Value};
use uuid::Uuid;

use common::{assert_status, body_json, decimal_field, TestApp};
use innkeeper_api::entities::{booking, booking_note, coupon, guest, payment, DiscountKind};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn booking_payload(room_id: Uuid, check_in: NaiveDate, check_out: NaiveDate) -> Value {
    json!({
        "roomId": room_id,
        "checkIn": check_in,
        "checkOut": check_out,
        "adults": 2,
        "children": 0,
        "firstName": "Asha",
        "lastName": "Gurung",
        "email": "asha.gurung@example.com",
        "phone": "+9779841000000",
    })
}

#[tokio::test]
async fn create_booking_with_coupon_and_cash_payment() {
    let app = TestApp::new().await;
    let room = app.seed_room("101", dec!(1000)).await;
    app.seed_coupon(
        "WELCOME10",
        DiscountKind::Percent,
        dec!(10),
        None,
        d(2020, 1, 1),
        d(2099, 12, 31),
    )
    .await;

    let mut payload = booking_payload(room.id, d(2030, 1, 10), d(2030, 1, 12));
    payload["couponCode"] = json!("WELCOME10");
    payload["paymentMethod"] = json!("cash");
    payload["specialRequest"] = json!("Late arrival, please keep the key at the desk");

    let response = app
        .request(Method::POST, "/api/bookings", Some(payload))
        .await;
    assert_status(&response, StatusCode::CREATED);

    let body = body_json(response).await;
    assert!(body["success"].as_bool().unwrap());

    // 2 nights x 1000 = 2000, minus 10% = 1800, plus 13% tax = 2034.
    assert_eq!(decimal_field(&body, "/data/booking/totalAmount"), dec!(2034));
    assert_eq!(decimal_field(&body, "/data/booking/discountAmount"), dec!(200));
    assert_eq!(body["data"]["booking"]["status"], "confirmed");
    assert_eq!(body["data"]["booking"]["couponCode"], "WELCOME10");
    assert!(body["data"]["booking"]["reference"]
        .as_str()
        .unwrap()
        .starts_with("BK-"));

    // Instant-confirm method writes a completed payment for the full total.
    assert_eq!(body["data"]["payment"]["status"], "completed");
    assert_eq!(decimal_field(&body, "/data/payment/amount"), dec!(2034));

    let booking_id: Uuid = body["data"]["booking"]["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    let payments = payment::Entity::find()
        .filter(payment::Column::BookingId.eq(booking_id))
        .all(&*app.state.db)
        .await
        .unwrap();
    assert_eq!(payments.len(), 1);

    let saved_coupon = coupon::Entity::find()
        .filter(coupon::Column::Code.eq("WELCOME10"))
        .one(&*app.state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved_coupon.used_count, 1);

    let notes = booking_note::Entity::find()
        .filter(booking_note::Column::BookingId.eq(booking_id))
        .all(&*app.state.db)
        .await
        .unwrap();
    assert_eq!(notes.len(), 1);
    assert!(notes[0].note.contains("Late arrival"));
}

#[tokio::test]
async fn gateway_payment_method_leaves_booking_pending_without_payment() {
    let app = TestApp::new().await;
    let room = app.seed_room("102", dec!(800)).await;

    let mut payload = booking_payload(room.id, d(2030, 2, 1), d(2030, 2, 3));
    payload["paymentMethod"] = json!("khalti");

    let response = app
        .request(Method::POST, "/api/bookings", Some(payload))
        .await;
    assert_status(&response, StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["data"]["booking"]["status"], "pending");
    assert!(body["data"]["payment"].is_null());
}

#[tokio::test]
async fn overlapping_bookings_conflict_but_boundary_touch_is_allowed() {
    let app = TestApp::new().await;
    let room = app.seed_room("103", dec!(1000)).await;

    let first = app
        .request(
            Method::POST,
            "/api/bookings",
            Some(booking_payload(room.id, d(2030, 1, 10), d(2030, 1, 12))),
        )
        .await;
    assert_status(&first, StatusCode::CREATED);

    // Same-day turnover: [10,12) then [12,14) is fine.
    let touching = app
        .request(
            Method::POST,
            "/api/bookings",
            Some(booking_payload(room.id, d(2030, 1, 12), d(2030, 1, 14))),
        )
        .await;
    assert_status(&touching, StatusCode::CREATED);

    // [11,13) overlaps both existing stays.
    let overlapping = app
        .request(
            Method::POST,
            "/api/bookings",
            Some(booking_payload(room.id, d(2030, 1, 11), d(2030, 1, 13))),
        )
        .await;
    assert_status(&overlapping, StatusCode::CONFLICT);
}

#[tokio::test]
async fn cancelled_bookings_do_not_block_the_room() {
    let app = TestApp::new().await;
    let room = app.seed_room("104", dec!(1000)).await;

    let first = app
        .request(
            Method::POST,
            "/api/bookings",
            Some(booking_payload(room.id, d(2030, 3, 1), d(2030, 3, 5))),
        )
        .await;
    assert_status(&first, StatusCode::CREATED);
    let body = body_json(first).await;
    let booking_id = body["data"]["booking"]["id"].as_str().unwrap().to_string();

    let cancel = app
        .request(
            Method::PATCH,
            &format!("/api/bookings/{booking_id}/cancel"),
            Some(json!({"reason": "Change of plans"})),
        )
        .await;
    assert_status(&cancel, StatusCode::OK);

    let rebook = app
        .request(
            Method::POST,
            "/api/bookings",
            Some(booking_payload(room.id, d(2030, 3, 2), d(2030, 3, 4))),
        )
        .await;
    assert_status(&rebook, StatusCode::CREATED);
}

#[tokio::test]
async fn validation_failures_return_bad_request() {
    let app = TestApp::new().await;
    let room = app
        .seed_room_with_capacity("105", dec!(1000), 2, 1, false)
        .await;

    // check_out before check_in
    let backwards = app
        .request(
            Method::POST,
            "/api/bookings",
            Some(booking_payload(room.id, d(2030, 1, 12), d(2030, 1, 10))),
        )
        .await;
    assert_status(&backwards, StatusCode::BAD_REQUEST);

    // zero-night stay
    let zero_nights = app
        .request(
            Method::POST,
            "/api/bookings",
            Some(booking_payload(room.id, d(2030, 1, 10), d(2030, 1, 10))),
        )
        .await;
    assert_status(&zero_nights, StatusCode::BAD_REQUEST);

    // too many adults
    let mut crowded = booking_payload(room.id, d(2030, 1, 10), d(2030, 1, 12));
    crowded["adults"] = json!(3);
    let crowded_resp = app
        .request(Method::POST, "/api/bookings", Some(crowded))
        .await;
    assert_status(&crowded_resp, StatusCode::BAD_REQUEST);

    // children in a childfree room
    let mut with_children = booking_payload(room.id, d(2030, 1, 10), d(2030, 1, 12));
    with_children["children"] = json!(1);
    let children_resp = app
        .request(Method::POST, "/api/bookings", Some(with_children))
        .await;
    assert_status(&children_resp, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_room_returns_not_found() {
    let app = TestApp::new().await;
    let response = app
        .request(
            Method::POST,
            "/api/bookings",
            Some(booking_payload(Uuid::new_v4(), d(2030, 1, 10), d(2030, 1, 12))),
        )
        .await;
    assert_status(&response, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn repeat_guest_is_reused_by_email() {
    let app = TestApp::new().await;
    let room_a = app.seed_room("106", dec!(1000)).await;
    let room_b = app.seed_room("107", dec!(1200)).await;

    let first = app
        .request(
            Method::POST,
            "/api/bookings",
            Some(booking_payload(room_a.id, d(2030, 4, 1), d(2030, 4, 3))),
        )
        .await;
    assert_status(&first, StatusCode::CREATED);
    let first_body = body_json(first).await;

    let second = app
        .request(
            Method::POST,
            "/api/bookings",
            Some(booking_payload(room_b.id, d(2030, 5, 1), d(2030, 5, 3))),
        )
        .await;
    assert_status(&second, StatusCode::CREATED);
    let second_body = body_json(second).await;

    assert_eq!(
        first_body["data"]["booking"]["guestId"],
        second_body["data"]["booking"]["guestId"]
    );

    let guests = guest::Entity::find()
        .filter(guest::Column::Email.eq("asha.gurung@example.com"))
        .count(&*app.state.db)
        .await
        .unwrap();
    assert_eq!(guests, 1);
}

#[tokio::test]
async fn expired_coupon_is_silently_ignored() {
    let app = TestApp::new().await;
    let room = app.seed_room("108", dec!(1000)).await;
    app.seed_coupon(
        "OLD10",
        DiscountKind::Percent,
        dec!(10),
        None,
        d(2020, 1, 1),
        d(2020, 12, 31),
    )
    .await;

    let mut payload = booking_payload(room.id, d(2030, 1, 10), d(2030, 1, 12));
    payload["couponCode"] = json!("OLD10");

    let response = app
        .request(Method::POST, "/api/bookings", Some(payload))
        .await;
    assert_status(&response, StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(decimal_field(&body, "/data/booking/discountAmount"), dec!(0));
    // The dropped reference is not persisted on the booking.
    assert!(body["data"]["booking"].get("couponCode").is_none());
    assert_eq!(decimal_field(&body, "/data/booking/totalAmount"), dec!(2260));

    let saved = coupon::Entity::find()
        .filter(coupon::Column::Code.eq("OLD10"))
        .one(&*app.state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved.used_count, 0);
}

#[tokio::test]
async fn exhausted_coupon_is_not_applied_again() {
    let app = TestApp::new().await;
    let room = app.seed_room("109", dec!(1000)).await;
    app.seed_coupon(
        "ONEUSE",
        DiscountKind::Fixed,
        dec!(500),
        Some(1),
        d(2020, 1, 1),
        d(2099, 12, 31),
    )
    .await;

    let mut first = booking_payload(room.id, d(2030, 6, 1), d(2030, 6, 3));
    first["couponCode"] = json!("ONEUSE");
    let first_resp = app.request(Method::POST, "/api/bookings", Some(first)).await;
    assert_status(&first_resp, StatusCode::CREATED);
    let first_body = body_json(first_resp).await;
    assert_eq!(
        decimal_field(&first_body, "/data/booking/discountAmount"),
        dec!(500)
    );

    let mut second = booking_payload(room.id, d(2030, 7, 1), d(2030, 7, 3));
    second["couponCode"] = json!("ONEUSE");
    let second_resp = app
        .request(Method::POST, "/api/bookings", Some(second))
        .await;
    assert_status(&second_resp, StatusCode::CREATED);
    let second_body = body_json(second_resp).await;
    assert_eq!(
        decimal_field(&second_body, "/data/booking/discountAmount"),
        dec!(0)
    );

    let saved = coupon::Entity::find()
        .filter(coupon::Column::Code.eq("ONEUSE"))
        .one(&*app.state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(saved.used_count, 1);
}

#[tokio::test]
async fn package_and_promotion_stack_in_order() {
    let app = TestApp::new().await;
    let room = app.seed_room("110", dec!(2000)).await;
    let package = app
        .seed_package(
            "Getaway",
            DiscountKind::Fixed,
            dec!(1000),
            d(2020, 1, 1),
            d(2099, 12, 31),
        )
        .await;
    let promotion = app
        .seed_promotion(
            "Monsoon",
            DiscountKind::Percent,
            dec!(10),
            None,
            d(2020, 1, 1),
            d(2099, 12, 31),
        )
        .await;

    let mut payload = booking_payload(room.id, d(2030, 8, 1), d(2030, 8, 6));
    payload["packageId"] = json!(package.id);
    payload["promotionId"] = json!(promotion.id);

    let response = app
        .request(Method::POST, "/api/bookings", Some(payload))
        .await;
    assert_status(&response, StatusCode::CREATED);

    // Fixed package overrides the 5-night arithmetic to 1000; the percent
    // promotion then discounts 10% of the post-package base.
    let body = body_json(response).await;
    assert_eq!(decimal_field(&body, "/data/booking/discountAmount"), dec!(100));
    assert_eq!(decimal_field(&body, "/data/booking/totalAmount"), dec!(1017));
}

#[tokio::test]
async fn room_scoped_promotion_skips_other_rooms() {
    let app = TestApp::new().await;
    let promoted = app.seed_room("111", dec!(1000)).await;
    let other = app.seed_room("112", dec!(1000)).await;
    let promotion = app
        .seed_promotion(
            "Corner room deal",
            DiscountKind::Fixed,
            dec!(300),
            Some(json!([promoted.id])),
            d(2020, 1, 1),
            d(2099, 12, 31),
        )
        .await;

    let mut payload = booking_payload(other.id, d(2030, 9, 1), d(2030, 9, 3));
    payload["promotionId"] = json!(promotion.id);

    let response = app
        .request(Method::POST, "/api/bookings", Some(payload))
        .await;
    assert_status(&response, StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(decimal_field(&body, "/data/booking/discountAmount"), dec!(0));
    assert!(body["data"]["booking"].get("promotionId").is_none());
}

#[tokio::test]
async fn cancel_refunds_payments_and_is_terminal() {
    let app = TestApp::new().await;
    let room = app.seed_room("113", dec!(1000)).await;

    let mut payload = booking_payload(room.id, d(2030, 10, 1), d(2030, 10, 3));
    payload["paymentMethod"] = json!("card");
    let created = app
        .request(Method::POST, "/api/bookings", Some(payload))
        .await;
    assert_status(&created, StatusCode::CREATED);
    let body = body_json(created).await;
    let booking_id: Uuid = body["data"]["booking"]["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    let cancel = app
        .request(
            Method::PATCH,
            &format!("/api/bookings/{booking_id}/cancel"),
            Some(json!({"reason": "Guest request"})),
        )
        .await;
    assert_status(&cancel, StatusCode::OK);
    let cancel_body = body_json(cancel).await;
    assert_eq!(cancel_body["data"]["status"], "cancelled");
    assert_eq!(cancel_body["data"]["cancellationReason"], "Guest request");

    let payments = payment::Entity::find()
        .filter(payment::Column::BookingId.eq(booking_id))
        .all(&*app.state.db)
        .await
        .unwrap();
    assert!(payments
        .iter()
        .all(|p| p.status == payment::PaymentStatus::Refunded));

    // Cancelling twice is rejected.
    let again = app
        .request(
            Method::PATCH,
            &format!("/api/bookings/{booking_id}/cancel"),
            None,
        )
        .await;
    assert_status(&again, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn status_transitions_are_date_gated() {
    let app = TestApp::new().await;
    let room = app.seed_room("114", dec!(1000)).await;
    let today = Utc::now().date_naive();

    // A stay that started yesterday and ends tomorrow, still pending.
    let started = app
        .request(
            Method::POST,
            "/api/bookings",
            Some(booking_payload(
                room.id,
                today - Duration::days(1),
                today + Duration::days(1),
            )),
        )
        .await;
    assert_status(&started, StatusCode::CREATED);
    let started_id = body_json(started).await["data"]["booking"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    // Confirming an in-progress stay works...
    let confirm = app
        .request(
            Method::PUT,
            &format!("/api/bookings/{started_id}"),
            Some(json!({"status": "confirmed"})),
        )
        .await;
    assert_status(&confirm, StatusCode::OK);

    // ...but completing before check-out does not.
    let complete_early = app
        .request(
            Method::PUT,
            &format!("/api/bookings/{started_id}"),
            Some(json!({"status": "completed"})),
        )
        .await;
    assert_status(&complete_early, StatusCode::BAD_REQUEST);

    // A future stay cannot be confirmed yet.
    let future = app
        .request(
            Method::POST,
            "/api/bookings",
            Some(booking_payload(
                room.id,
                today + Duration::days(30),
                today + Duration::days(32),
            )),
        )
        .await;
    assert_status(&future, StatusCode::CREATED);
    let future_id = body_json(future).await["data"]["booking"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let confirm_early = app
        .request(
            Method::PUT,
            &format!("/api/bookings/{future_id}"),
            Some(json!({"status": "confirmed"})),
        )
        .await;
    assert_status(&confirm_early, StatusCode::BAD_REQUEST);

    // Cancelled bookings cannot be reopened.
    let cancel = app
        .request(
            Method::PATCH,
            &format!("/api/bookings/{future_id}/cancel"),
            None,
        )
        .await;
    assert_status(&cancel, StatusCode::OK);

    let reopen = app
        .request(
            Method::PUT,
            &format!("/api/bookings/{future_id}"),
            Some(json!({"status": "confirmed"})),
        )
        .await;
    assert_status(&reopen, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_recheck_excludes_self_and_recomputes_total() {
    let app = TestApp::new().await;
    let room = app.seed_room("115", dec!(1000)).await;

    let first = app
        .request(
            Method::POST,
            "/api/bookings",
            Some(booking_payload(room.id, d(2030, 1, 10), d(2030, 1, 12))),
        )
        .await;
    assert_status(&first, StatusCode::CREATED);

    let second = app
        .request(
            Method::POST,
            "/api/bookings",
            Some(booking_payload(room.id, d(2030, 1, 14), d(2030, 1, 16))),
        )
        .await;
    assert_status(&second, StatusCode::CREATED);
    let second_id = body_json(second).await["data"]["booking"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    // Moving the second stay onto the first conflicts.
    let clash = app
        .request(
            Method::PUT,
            &format!("/api/bookings/{second_id}"),
            Some(json!({"checkIn": "2030-01-11", "checkOut": "2030-01-13"})),
        )
        .await;
    assert_status(&clash, StatusCode::CONFLICT);

    // Touching the first stay's boundary is fine, and the total is
    // recomputed server-side for the new window (3 nights x 1000 x 1.13).
    let shifted = app
        .request(
            Method::PUT,
            &format!("/api/bookings/{second_id}"),
            Some(json!({"checkIn": "2030-01-12", "checkOut": "2030-01-15"})),
        )
        .await;
    assert_status(&shifted, StatusCode::OK);
    let body = body_json(shifted).await;
    assert_eq!(decimal_field(&body, "/data/totalAmount"), dec!(3390));
}

#[tokio::test]
async fn soft_delete_hides_booking_and_frees_the_room() {
    let app = TestApp::new().await;
    let room = app.seed_room("116", dec!(1000)).await;

    let created = app
        .request(
            Method::POST,
            "/api/bookings",
            Some(booking_payload(room.id, d(2030, 2, 10), d(2030, 2, 12))),
        )
        .await;
    assert_status(&created, StatusCode::CREATED);
    let booking_id = body_json(created).await["data"]["booking"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let deleted = app
        .request(Method::DELETE, &format!("/api/bookings/{booking_id}"), None)
        .await;
    assert_status(&deleted, StatusCode::OK);

    let fetched = app
        .request(Method::GET, &format!("/api/bookings/{booking_id}"), None)
        .await;
    assert_status(&fetched, StatusCode::NOT_FOUND);

    // The row is still there, just soft-deleted.
    let id: Uuid = booking_id.parse().unwrap();
    let raw = booking::Entity::find_by_id(id)
        .one(&*app.state.db)
        .await
        .unwrap()
        .unwrap();
    assert!(raw.deleted_at.is_some());

    // And the window is open again.
    let availability = app
        .request(
            Method::GET,
            &format!(
                "/api/rooms/{}/availability?checkIn=2030-02-10&checkOut=2030-02-12",
                room.id
            ),
            None,
        )
        .await;
    assert_status(&availability, StatusCode::OK);
    let body = body_json(availability).await;
    assert_eq!(body["data"]["available"], true);

    let delete_again = app
        .request(Method::DELETE, &format!("/api/bookings/{booking_id}"), None)
        .await;
    assert_status(&delete_again, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn availability_endpoint_reports_conflicts() {
    let app = TestApp::new().await;
    let room = app.seed_room("117", dec!(1000)).await;

    let created = app
        .request(
            Method::POST,
            "/api/bookings",
            Some(booking_payload(room.id, d(2030, 3, 10), d(2030, 3, 12))),
        )
        .await;
    assert_status(&created, StatusCode::CREATED);

    let blocked = app
        .request(
            Method::GET,
            &format!(
                "/api/rooms/{}/availability?checkIn=2030-03-11&checkOut=2030-03-13",
                room.id
            ),
            None,
        )
        .await;
    let body = body_json(blocked).await;
    assert_eq!(body["data"]["available"], false);

    let touching = app
        .request(
            Method::GET,
            &format!(
                "/api/rooms/{}/availability?checkIn=2030-03-12&checkOut=2030-03-14",
                room.id
            ),
            None,
        )
        .await;
    let body = body_json(touching).await;
    assert_eq!(body["data"]["available"], true);

    let bad_range = app
        .request(
            Method::GET,
            &format!(
                "/api/rooms/{}/availability?checkIn=2030-03-12&checkOut=2030-03-12",
                room.id
            ),
            None,
        )
        .await;
    assert_status(&bad_range, StatusCode::BAD_REQUEST);

    let unknown_room = app
        .request(
            Method::GET,
            &format!(
                "/api/rooms/{}/availability?checkIn=2030-03-12&checkOut=2030-03-14",
                Uuid::new_v4()
            ),
            None,
        )
        .await;
    assert_status(&unknown_room, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_bookings_filters_and_paginates() {
    let app = TestApp::new().await;
    let room_a = app.seed_room("118", dec!(1000)).await;
    let room_b = app.seed_room("119", dec!(1000)).await;

    let mut cash = booking_payload(room_a.id, d(2030, 4, 1), d(2030, 4, 3));
    cash["paymentMethod"] = json!("cash");
    assert_status(
        &app.request(Method::POST, "/api/bookings", Some(cash)).await,
        StatusCode::CREATED,
    );

    let mut other_guest = booking_payload(room_b.id, d(2030, 4, 1), d(2030, 4, 3));
    other_guest["firstName"] = json!("Bikram");
    other_guest["lastName"] = json!("Shrestha");
    other_guest["email"] = json!("bikram@example.com");
    assert_status(
        &app.request(Method::POST, "/api/bookings", Some(other_guest))
            .await,
        StatusCode::CREATED,
    );

    let all = body_json(app.request(Method::GET, "/api/bookings", None).await).await;
    assert_eq!(all["data"]["total"], 2);

    let pending =
        body_json(app.request(Method::GET, "/api/bookings?status=pending", None).await).await;
    assert_eq!(pending["data"]["total"], 1);

    let by_room = body_json(
        app.request(
            Method::GET,
            &format!("/api/bookings?roomId={}", room_a.id),
            None,
        )
        .await,
    )
    .await;
    assert_eq!(by_room["data"]["total"], 1);

    let by_guest =
        body_json(app.request(Method::GET, "/api/bookings?guest=Bikram", None).await).await;
    assert_eq!(by_guest["data"]["total"], 1);
    assert_eq!(by_guest["data"]["items"][0]["status"], "pending");

    let paged = body_json(
        app.request(Method::GET, "/api/bookings?page=1&limit=1", None)
            .await,
    )
    .await;
    assert_eq!(paged["data"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(paged["data"]["total"], 2);
    assert_eq!(paged["data"]["total_pages"], 2);
}
