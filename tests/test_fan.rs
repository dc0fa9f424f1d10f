//! Fan CRUD integration tests

use app_lib::app::{
    fan_create, fan_delete, fan_get, fan_list, fan_update, FanCreateReq, FanUpdateReq,
};
use app_lib::infra::db::init_test_db;

// ──────────────────────── Helper ────────────────────────

fn make_create_req(last: &str, first: &str) -> FanCreateReq {
    FanCreateReq {
        last_name: last.to_string(),
        first_name: first.to_string(),
        birth_date: "1990-04-12".to_string(),
    }
}

fn no_changes(id: i64) -> FanUpdateReq {
    FanUpdateReq {
        id,
        last_name: None,
        first_name: None,
        birth_date: None,
    }
}

// ══════════════════════════════════════════════════════════
//  fan_create
// ══════════════════════════════════════════════════════════

#[test]
fn create_fan_returns_dto_with_full_name() {
    let pool = init_test_db();
    let dto = fan_create(&pool, make_create_req("Doe", "Jane")).unwrap();
    assert!(dto.id > 0);
    assert_eq!(dto.last_name, "Doe");
    assert_eq!(dto.first_name, "Jane");
    assert_eq!(dto.birth_date, "1990-04-12");
    assert_eq!(dto.full_name, "Doe, Jane");
}

#[test]
fn create_fan_trims_names() {
    let pool = init_test_db();
    let dto = fan_create(&pool, make_create_req("  Doe ", "\tJane ")).unwrap();
    assert_eq!(dto.full_name, "Doe, Jane");
}

#[test]
fn create_fan_ids_are_sequential() {
    let pool = init_test_db();
    let a = fan_create(&pool, make_create_req("A", "One")).unwrap();
    let b = fan_create(&pool, make_create_req("B", "Two")).unwrap();
    assert!(b.id > a.id);
}

#[test]
fn create_fan_blank_last_name_fails() {
    let pool = init_test_db();
    let err = fan_create(&pool, make_create_req("   ", "Jane")).unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
    assert!(err.to_string().contains("last_name"));
    assert!(fan_list(&pool).unwrap().is_empty());
}

#[test]
fn create_fan_blank_first_name_fails() {
    let pool = init_test_db();
    let err = fan_create(&pool, make_create_req("Doe", "")).unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
    assert!(err.to_string().contains("first_name"));
}

#[test]
fn create_fan_name_over_50_chars_fails() {
    let pool = init_test_db();
    let err = fan_create(&pool, make_create_req(&"x".repeat(51), "Jane")).unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");

    let ok = fan_create(&pool, make_create_req(&"x".repeat(50), "Jane"));
    assert!(ok.is_ok());
}

#[test]
fn create_fan_bad_birth_date_fails() {
    let pool = init_test_db();
    let mut req = make_create_req("Doe", "Jane");
    req.birth_date = "12/04/1990".to_string();
    let err = fan_create(&pool, req).unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
    assert!(err.to_string().contains("birth_date"));
}

// ══════════════════════════════════════════════════════════
//  fan_get / fan_list
// ══════════════════════════════════════════════════════════

#[test]
fn get_fan_round_trips() {
    let pool = init_test_db();
    let created = fan_create(&pool, make_create_req("Doe", "Jane")).unwrap();
    let got = fan_get(&pool, created.id).unwrap();
    assert_eq!(got.id, created.id);
    assert_eq!(got.full_name, "Doe, Jane");
}

#[test]
fn get_missing_fan_is_not_found() {
    let pool = init_test_db();
    let err = fan_get(&pool, 999).unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
}

#[test]
fn list_fans_sorted_by_last_then_first_name() {
    let pool = init_test_db();
    fan_create(&pool, make_create_req("Smith", "Zoe")).unwrap();
    fan_create(&pool, make_create_req("adams", "Bob")).unwrap();
    fan_create(&pool, make_create_req("Smith", "Anna")).unwrap();

    let names: Vec<String> = fan_list(&pool)
        .unwrap()
        .into_iter()
        .map(|f| f.fan.full_name)
        .collect();
    assert_eq!(names, vec!["adams, Bob", "Smith, Anna", "Smith, Zoe"]);
}

#[test]
fn list_fans_without_subscriptions_has_empty_lists() {
    let pool = init_test_db();
    fan_create(&pool, make_create_req("Doe", "Jane")).unwrap();
    let list = fan_list(&pool).unwrap();
    assert_eq!(list.len(), 1);
    assert!(list[0].subscriptions.is_empty());
}

// ══════════════════════════════════════════════════════════
//  fan_update
// ══════════════════════════════════════════════════════════

#[test]
fn update_fan_partial_fields() {
    let pool = init_test_db();
    let fan = fan_create(&pool, make_create_req("Doe", "Jane")).unwrap();

    let updated = fan_update(
        &pool,
        FanUpdateReq {
            first_name: Some("Janet".to_string()),
            ..no_changes(fan.id)
        },
    )
    .unwrap();

    assert_eq!(updated.last_name, "Doe");
    assert_eq!(updated.first_name, "Janet");
    assert_eq!(updated.birth_date, "1990-04-12");
    assert_eq!(updated.full_name, "Doe, Janet");
}

#[test]
fn update_fan_birth_date() {
    let pool = init_test_db();
    let fan = fan_create(&pool, make_create_req("Doe", "Jane")).unwrap();
    let updated = fan_update(
        &pool,
        FanUpdateReq {
            birth_date: Some("2001-12-31".to_string()),
            ..no_changes(fan.id)
        },
    )
    .unwrap();
    assert_eq!(updated.birth_date, "2001-12-31");
}

#[test]
fn update_fan_blank_name_fails_and_keeps_row() {
    let pool = init_test_db();
    let fan = fan_create(&pool, make_create_req("Doe", "Jane")).unwrap();

    let err = fan_update(
        &pool,
        FanUpdateReq {
            last_name: Some("  ".to_string()),
            ..no_changes(fan.id)
        },
    )
    .unwrap_err();
    assert_eq!(err.code(), "VALIDATION_ERROR");
    assert_eq!(fan_get(&pool, fan.id).unwrap().last_name, "Doe");
}

#[test]
fn update_missing_fan_is_not_found() {
    let pool = init_test_db();
    let err = fan_update(&pool, no_changes(42)).unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
}

// ══════════════════════════════════════════════════════════
//  fan_delete
// ══════════════════════════════════════════════════════════

#[test]
fn delete_fan_removes_row() {
    let pool = init_test_db();
    let fan = fan_create(&pool, make_create_req("Doe", "Jane")).unwrap();
    fan_delete(&pool, fan.id).unwrap();
    assert_eq!(fan_get(&pool, fan.id).unwrap_err().code(), "NOT_FOUND");
}

#[test]
fn delete_missing_fan_is_not_found() {
    let pool = init_test_db();
    assert_eq!(fan_delete(&pool, 5).unwrap_err().code(), "NOT_FOUND");
}
