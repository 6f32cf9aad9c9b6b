//! Campaign, employee and payroll workflows against the mock backend.

#![allow(clippy::unwrap_used)]

use opsdesk_client::{ActionError, CampaignService, CollectionManager, EmployeeService, PayrollService};
use opsdesk_core::{
    CampaignChannel, CampaignInput, CampaignStatus, Email, EmployeeInput, EmploymentStatus,
    Filter, NumericPolicy, PayrollInput, PayrollStatus,
};
use opsdesk_integration_tests::MockBackend;
use rust_decimal::Decimal;

fn campaign(name: &str, channel: CampaignChannel, budget: i64, spent: i64) -> CampaignInput {
    CampaignInput {
        name: name.to_owned(),
        channel,
        status: CampaignStatus::Active,
        budget: Decimal::from(budget),
        spent: Decimal::from(spent),
        reach: 1000,
        conversions: 25,
        start_date: None,
        end_date: None,
    }
}

fn employee(name: &str, email: &str, department: &str) -> EmployeeInput {
    EmployeeInput {
        name: name.to_owned(),
        email: Email::parse(email).unwrap(),
        department: department.to_owned(),
        position: "Analyst".to_owned(),
        status: EmploymentStatus::Active,
        hire_date: None,
        salary: Decimal::from(60_000),
    }
}

#[tokio::test]
async fn test_campaign_totals_follow_writes() {
    let backend = MockBackend::start().await;
    backend.seed_campaign(&campaign("Spring Sale", CampaignChannel::Email, 1000, 400));
    let mut manager = CollectionManager::new(CampaignService::new(backend.client()), NumericPolicy::default());
    manager.load().await.unwrap();
    assert_eq!(manager.stats().map(|t| t.budget), Some(Decimal::from(1000)));

    let form = manager.open_create();
    form.set("name", "Summer Promo").unwrap();
    form.set("channel", "social").unwrap();
    form.set("budget", "500").unwrap();
    form.set("spent", "120.50").unwrap();
    manager.submit().await.unwrap();

    let totals = manager.stats().unwrap();
    assert_eq!(totals.campaigns, 2);
    assert_eq!(totals.budget, Decimal::from(1500));
    assert_eq!(totals.spent, Decimal::new(52050, 2));

    manager.set_filter(Filter::new("", "all", "social"));
    let names: Vec<&str> = manager.visible().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Summer Promo"]);
}

#[tokio::test]
async fn test_employee_search_and_duplicate_email() {
    let backend = MockBackend::start().await;
    backend.seed_employee(&employee("Ana Ortiz", "ana@example.com", "Finance"));
    backend.seed_employee(&employee("Ben Cho", "ben@example.com", "Operations"));
    let mut manager = CollectionManager::new(EmployeeService::new(backend.client()), NumericPolicy::default());
    manager.load().await.unwrap();

    manager.set_filter(Filter::new("OPERATIONS", "active", "all"));
    let names: Vec<&str> = manager.visible().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Ben Cho"]);

    let form = manager.open_create();
    form.set("name", "Ana Two").unwrap();
    form.set("email", "ana@example.com").unwrap();
    form.set("department", "Finance").unwrap();
    let err = manager.submit().await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Create employee failed: API error: 422 - email already in use"
    );
    assert!(matches!(err, ActionError::RequestFailed { .. }));
    assert_eq!(manager.records().len(), 2);
    assert_eq!(manager.form().and_then(|f| f.draft.get("name")), Some("Ana Two"));
    assert_eq!(manager.drain_notifications().len(), 1);
}

#[tokio::test]
async fn test_payroll_net_pay_is_computed_by_backend() {
    let backend = MockBackend::start().await;
    let mut manager = CollectionManager::new(PayrollService::new(backend.client()), NumericPolicy::Strict);
    manager.load().await.unwrap();

    let form = manager.open_create();
    form.set("employee_name", "Ana Ortiz").unwrap();
    form.set("department", "Finance").unwrap();
    form.set("period", "2024-03").unwrap();
    form.set("base_salary", "6000").unwrap();
    form.set("bonus", "500").unwrap();
    form.set("deductions", "1250.25").unwrap();
    let entry = manager.submit().await.unwrap();

    assert_eq!(entry.net_pay, Decimal::new(524_975, 2));
    assert_eq!(entry.status, PayrollStatus::Pending);
    let totals = manager.stats().unwrap();
    assert_eq!(totals.net, entry.net_pay);
    assert_eq!(totals.pending, 1);
}

#[tokio::test]
async fn test_payroll_edit_changes_status() {
    let backend = MockBackend::start().await;
    let seeded = backend.seed_payroll(&PayrollInput {
        employee_name: "Ben Cho".to_owned(),
        department: "Operations".to_owned(),
        period: "2024-02".to_owned(),
        base_salary: Decimal::from(4000),
        bonus: Decimal::ZERO,
        deductions: Decimal::from(800),
        status: PayrollStatus::Pending,
    });
    let mut manager = CollectionManager::new(PayrollService::new(backend.client()), NumericPolicy::default());
    manager.load().await.unwrap();

    let form = manager.open_edit(seeded.id).unwrap();
    assert_eq!(form.get("base_salary"), Some("4000"));
    form.set("status", "paid").unwrap();
    manager.submit().await.unwrap();

    assert_eq!(manager.records().get(seeded.id).map(|p| p.status), Some(PayrollStatus::Paid));
    assert_eq!(manager.stats().map(|t| (t.pending, t.paid)), Some((0, 1)));
}
