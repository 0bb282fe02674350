//! Tests for the client management service.

use std::sync::Arc;

use super::*;
use crate::domain::fixtures::{business_account, fixture_clock, fixture_now};
use crate::domain::ports::{MockAccountRepository, MockOrderRepository, MockPasswordHasher};
use crate::domain::{ClientDraft, ClientPatch, ErrorCode};
use rstest::rstest;

type Service = ClientService<MockAccountRepository, MockOrderRepository, MockPasswordHasher>;

fn make_service(
    accounts: MockAccountRepository,
    orders: MockOrderRepository,
    hasher: MockPasswordHasher,
) -> Service {
    ClientService::new(
        Arc::new(accounts),
        Arc::new(orders),
        Arc::new(hasher),
        fixture_clock(),
    )
}

fn hashing_to(hash: &'static str) -> MockPasswordHasher {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .times(1)
        .returning(move |_| Ok(PasswordHash::new(hash)));
    hasher
}

fn new_client() -> NewClient {
    NewClient::try_from_draft(ClientDraft {
        username: "spice",
        business_name: "Spice Route",
        password: "s3cret!",
        call_rate: Some(3.0),
        ..ClientDraft::default()
    })
    .expect("valid draft")
}

#[rstest]
#[tokio::test]
async fn create_hashes_password_and_stores_business() {
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_insert()
        .withf(|account: &Account| {
            account.role == Role::Business
                && account.password_hash.as_str() == "$2b$10$hashed"
                && account.is_active
                && account.created_at == fixture_now()
        })
        .times(1)
        .return_once(|_| Ok(()));

    let summary = make_service(accounts, MockOrderRepository::new(), hashing_to("$2b$10$hashed"))
        .create_client(new_client())
        .await
        .expect("client created");

    assert_eq!(summary.username, "spice");
    assert_eq!(summary.call_rate_paise, 300);
    assert_eq!(summary.total_calls, 0);
}

#[rstest]
#[tokio::test]
async fn duplicate_username_is_conflict() {
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_insert()
        .return_once(|_| Err(AccountRepositoryError::duplicate_username("spice")));

    let err = make_service(accounts, MockOrderRepository::new(), hashing_to("h"))
        .create_client(new_client())
        .await
        .expect_err("duplicate");

    assert_eq!(err.code(), ErrorCode::Conflict);
    assert_eq!(err.message(), "username already exists");
}

#[rstest]
#[tokio::test]
async fn list_joins_call_totals() {
    let busy = business_account("busy");
    let quiet = business_account("quiet");
    let busy_id = busy.id;
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_list_businesses()
        .return_once(move || Ok(vec![busy, quiet]));
    let mut orders = MockOrderRepository::new();
    orders.expect_call_totals().return_once(move || {
        Ok(vec![CallTotals {
            business_id: busy_id,
            calls: 3,
            billable_minutes: 5,
        }])
    });

    let clients = make_service(accounts, orders, MockPasswordHasher::new())
        .list_clients()
        .await
        .expect("listing");

    assert_eq!(clients.len(), 2);
    assert_eq!(clients[0].total_calls, 3);
    assert_eq!(clients[0].total_revenue_paise, 1000);
    assert_eq!(clients[1].total_calls, 0);
}

#[rstest]
#[tokio::test]
async fn update_can_deactivate_and_reset_password() {
    let account = business_account("spice");
    let id = account.id;
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(account)));
    accounts
        .expect_update()
        .withf(|account: &Account| {
            !account.is_active && account.password_hash.as_str() == "$2b$10$reset"
        })
        .times(1)
        .return_once(|_| Ok(()));
    let mut orders = MockOrderRepository::new();
    orders.expect_call_totals().return_once(|| Ok(Vec::new()));

    let update = ClientUpdate::try_from_patch(ClientPatch {
        is_active: Some(false),
        password: Some("n3w-pass"),
        ..ClientPatch::default()
    })
    .expect("valid patch");
    let summary = make_service(accounts, orders, hashing_to("$2b$10$reset"))
        .update_client(&id, update)
        .await
        .expect("updated");

    assert!(!summary.is_active);
}

#[rstest]
#[tokio::test]
async fn admin_accounts_cannot_be_edited_as_clients() {
    let mut admin = business_account("root");
    admin.role = Role::Admin;
    let id = admin.id;
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(admin)));
    accounts.expect_update().never();

    let err = make_service(accounts, MockOrderRepository::new(), MockPasswordHasher::new())
        .update_client(&id, ClientUpdate::default())
        .await
        .expect_err("not a client");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(true, None)]
#[case(false, Some(ErrorCode::NotFound))]
#[tokio::test]
async fn delete_reports_missing_clients(
    #[case] deleted: bool,
    #[case] expected: Option<ErrorCode>,
) {
    let mut accounts = MockAccountRepository::new();
    accounts
        .expect_delete_business()
        .return_once(move |_| Ok(deleted));

    let result = make_service(accounts, MockOrderRepository::new(), MockPasswordHasher::new())
        .delete_client(&AccountId::random())
        .await;
    assert_eq!(result.err().map(|err| err.code()), expected);
}
