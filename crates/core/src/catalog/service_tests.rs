//! Tests for CatalogService against the in-memory store.

use std::sync::Arc;

use rust_decimal_macros::dec;

use khata_shared::types::OrganizationId;

use super::*;
use crate::catalog::{AccountSubtype, AccountType};
use crate::store::memory::MemoryStore;

fn service() -> CatalogService {
    CatalogService::new(Arc::new(MemoryStore::new()))
}

fn input(
    organization_id: OrganizationId,
    code: &str,
    name: &str,
    account_type: AccountType,
    parent_code: Option<&str>,
) -> CreateAccountInput {
    CreateAccountInput {
        organization_id,
        code: code.to_string(),
        name: name.to_string(),
        account_type,
        subtype: None,
        parent_code: parent_code.map(str::to_string),
        description: None,
        opening_balance: None,
    }
}

#[tokio::test]
async fn test_create_builds_path_from_parent() {
    let svc = service();
    let org = OrganizationId::new();

    let assets = svc
        .create_account(input(org, "1000", "Assets", AccountType::Asset, None))
        .await
        .unwrap();
    assert_eq!(assets.path, "Assets");
    assert!(assets.is_root());

    let current = svc
        .create_account(input(org, "1100", "Current Assets", AccountType::Asset, Some("1000")))
        .await
        .unwrap();
    let cash = svc
        .create_account(CreateAccountInput {
            subtype: Some(AccountSubtype::Cash),
            opening_balance: Some(dec!(250)),
            ..input(org, "1110", "Cash", AccountType::Asset, Some("1100"))
        })
        .await
        .unwrap();

    assert_eq!(current.path, "Assets:Current Assets");
    assert_eq!(cash.path, "Assets:Current Assets:Cash");
    assert_eq!(cash.parent_code.as_deref(), Some("1100"));
    assert_eq!(cash.opening_balance, Some(dec!(250)));
}

#[tokio::test]
async fn test_duplicate_code_rejected() {
    let svc = service();
    let org = OrganizationId::new();
    svc.create_account(input(org, "1000", "Assets", AccountType::Asset, None))
        .await
        .unwrap();

    let err = svc
        .create_account(input(org, "1000", "Liabilities", AccountType::Liability, None))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::DuplicateCode(code) if code == "1000"));
}

#[tokio::test]
async fn test_sibling_path_collision_ignores_case() {
    let svc = service();
    let org = OrganizationId::new();
    svc.create_account(input(org, "1000", "Assets", AccountType::Asset, None))
        .await
        .unwrap();
    svc.create_account(input(org, "1010", "Cash", AccountType::Asset, Some("1000")))
        .await
        .unwrap();

    let err = svc
        .create_account(input(org, "1020", "CASH", AccountType::Asset, Some("1000")))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::DuplicatePath(_)));
}

#[tokio::test]
async fn test_missing_parent_rejected() {
    let err = service()
        .create_account(input(OrganizationId::new(), "1010", "Cash", AccountType::Asset, Some("9999")))
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::ParentNotFound(code) if code == "9999"));
}

#[tokio::test]
async fn test_subtype_mismatch_rejected() {
    let err = service()
        .create_account(CreateAccountInput {
            subtype: Some(AccountSubtype::Cash),
            ..input(OrganizationId::new(), "4000", "Sales", AccountType::Revenue, None)
        })
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::SubtypeMismatch { .. }));
}

#[tokio::test]
async fn test_tenants_are_isolated() {
    let svc = service();
    let org_a = OrganizationId::new();
    let org_b = OrganizationId::new();
    let a = svc
        .create_account(input(org_a, "1000", "Assets", AccountType::Asset, None))
        .await
        .unwrap();

    svc.create_account(input(org_b, "1000", "Assets", AccountType::Asset, None))
        .await
        .unwrap();
    assert!(matches!(
        svc.get_by_id(org_b, a.id).await,
        Err(CatalogError::AccountNotFound(_))
    ));
    assert_eq!(svc.list_accounts(org_a).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_rename_updates_path_and_keeps_code() {
    let svc = service();
    let org = OrganizationId::new();
    svc.create_account(input(org, "5000", "Expenses", AccountType::Expense, None))
        .await
        .unwrap();
    let office = svc
        .create_account(input(org, "5100", "Office", AccountType::Expense, Some("5000")))
        .await
        .unwrap();

    let renamed = svc
        .update_account(
            org,
            office.id,
            UpdateAccountInput {
                name: Some("Office Supplies".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(renamed.path, "Expenses:Office Supplies");
    assert_eq!(renamed.code, "5100");
    assert_eq!(
        svc.get_by_path(org, "Expenses:Office Supplies").await.unwrap().id,
        office.id
    );
}

#[tokio::test]
async fn test_rename_of_parent_with_children_rejected() {
    let svc = service();
    let org = OrganizationId::new();
    let expenses = svc
        .create_account(input(org, "5000", "Expenses", AccountType::Expense, None))
        .await
        .unwrap();
    svc.create_account(input(org, "5100", "Rent", AccountType::Expense, Some("5000")))
        .await
        .unwrap();

    let err = svc
        .update_account(
            org,
            expenses.id,
            UpdateAccountInput {
                name: Some("Costs".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CatalogError::RenameWithChildren(_)));
}

#[tokio::test]
async fn test_list_children_checks_parent() {
    let svc = service();
    let org = OrganizationId::new();
    svc.create_account(input(org, "1000", "Assets", AccountType::Asset, None))
        .await
        .unwrap();
    svc.create_account(input(org, "1020", "Bank", AccountType::Asset, Some("1000")))
        .await
        .unwrap();
    svc.create_account(input(org, "1010", "Cash", AccountType::Asset, Some("1000")))
        .await
        .unwrap();

    let children = svc.list_children(org, Some("1000")).await.unwrap();
    let codes: Vec<_> = children.iter().map(|a| a.code.as_str()).collect();
    assert_eq!(codes, ["1010", "1020"]);

    assert_eq!(svc.list_children(org, None).await.unwrap().len(), 1);
    assert!(matches!(
        svc.list_children(org, Some("7777")).await,
        Err(CatalogError::AccountNotFound(_))
    ));
}
