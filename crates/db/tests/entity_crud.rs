//! Repository round trips against a real database: create, update, delete,
//! uniqueness, and foreign key behaviour.

use chrono::NaiveDate;
use sqlx::PgPool;
use roster_db::models::company::CompanyInput;
use roster_db::models::contractor::ContractorInput;
use roster_db::models::department::DepartmentInput;
use roster_db::models::employee::EmployeeInput;
use roster_db::models::user::NewAccount;
use roster_db::models::zip_code::ZipCodeInput;
use roster_db::repositories::{
    CompanyRepo, ContractorRepo, DepartmentRepo, EmployeeRepo, UserRepo, ZipCodeRepo,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_zip(code: &str) -> ZipCodeInput {
    ZipCodeInput {
        zip_code: code.to_string(),
        primary_city: Some("Indianapolis".to_string()),
        state: Some("IN".to_string()),
        county: Some("Marion County".to_string()),
        latitude: Some(39.77),
        longitude: Some(-86.15),
        ..Default::default()
    }
}

fn new_company(name: &str) -> CompanyInput {
    CompanyInput {
        name: name.to_string(),
        ..Default::default()
    }
}

fn new_employee(last_name: &str, company_id: Option<i64>) -> EmployeeInput {
    EmployeeInput {
        first_name: Some("Pat".to_string()),
        last_name: last_name.to_string(),
        company_id,
        active: true,
        ..Default::default()
    }
}

fn constraint_of(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) => db.constraint().map(str::to_string),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Zip codes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_zip_code_round_trip(pool: PgPool) {
    let created = ZipCodeRepo::create(&pool, &new_zip("46201")).await.unwrap();
    assert_eq!(created.zip_code, "46201");
    assert_eq!(created.latitude, Some(39.77));

    let found = ZipCodeRepo::find_by_zip_code(&pool, "46201")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, created.id);

    let mut input = new_zip("46202");
    input.county = None;
    let updated = ZipCodeRepo::update(&pool, created.id, &input)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.zip_code, "46202");
    assert_eq!(updated.county, None, "update replaces every column");
    assert!(updated.updated_at >= created.updated_at);

    assert!(ZipCodeRepo::delete(&pool, created.id).await.unwrap());
    assert!(!ZipCodeRepo::delete(&pool, created.id).await.unwrap());
    assert!(ZipCodeRepo::find_by_id(&pool, created.id)
        .await
        .unwrap()
        .is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_zip_code_violates_unique(pool: PgPool) {
    ZipCodeRepo::create(&pool, &new_zip("46201")).await.unwrap();
    let err = ZipCodeRepo::create(&pool, &new_zip("46201"))
        .await
        .unwrap_err();
    assert_eq!(constraint_of(&err).as_deref(), Some("uq_zip_codes_zip_code"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_zip_code_longer_than_five_rejected(pool: PgPool) {
    let result = ZipCodeRepo::create(&pool, &new_zip("123456")).await;
    assert!(result.is_err());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_missing_zip_code_returns_none(pool: PgPool) {
    let result = ZipCodeRepo::update(&pool, 9999, &new_zip("00000"))
        .await
        .unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Companies, departments, employees, contractors
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_referenced_company_cannot_be_deleted(pool: PgPool) {
    let company = CompanyRepo::create(&pool, &new_company("Acme")).await.unwrap();
    EmployeeRepo::create(&pool, &new_employee("Smith", Some(company.id)))
        .await
        .unwrap();

    let err = CompanyRepo::delete(&pool, company.id).await.unwrap_err();
    assert_eq!(constraint_of(&err).as_deref(), Some("fk_employees_company_id"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_employee_unknown_company_rejected(pool: PgPool) {
    let err = EmployeeRepo::create(&pool, &new_employee("Smith", Some(4242)))
        .await
        .unwrap_err();
    assert_eq!(constraint_of(&err).as_deref(), Some("fk_employees_company_id"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_employee_supervisor_chain(pool: PgPool) {
    let boss = EmployeeRepo::create(&pool, &new_employee("Boss", None))
        .await
        .unwrap();
    let mut input = new_employee("Report", None);
    input.supervisor_id = Some(boss.id);
    input.hired_on = NaiveDate::from_ymd_opt(2021, 3, 1);
    let report = EmployeeRepo::create(&pool, &input).await.unwrap();
    assert_eq!(report.supervisor_id, Some(boss.id));
    assert_eq!(report.hired_on, NaiveDate::from_ymd_opt(2021, 3, 1));

    let options = EmployeeRepo::list_options(&pool).await.unwrap();
    let labels: Vec<_> = options.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, vec!["Boss, Pat", "Report, Pat"]);

    assert!(EmployeeRepo::delete(&pool, boss.id).await.is_err());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_department_names_unique_and_listed(pool: PgPool) {
    for name in ["Sales", "Engineering"] {
        DepartmentRepo::create(
            &pool,
            &DepartmentInput {
                name: name.to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
    }
    let err = DepartmentRepo::create(
        &pool,
        &DepartmentInput {
            name: "Sales".to_string(),
            description: None,
        },
    )
    .await
    .unwrap_err();
    assert_eq!(constraint_of(&err).as_deref(), Some("uq_departments_name"));

    let options = DepartmentRepo::list_options(&pool).await.unwrap();
    let labels: Vec<_> = options.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, vec!["Engineering", "Sales"]);
    assert!(DepartmentRepo::find_by_name(&pool, "Sales")
        .await
        .unwrap()
        .is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_contractor_rate_round_trip(pool: PgPool) {
    let company = CompanyRepo::create(&pool, &new_company("Acme")).await.unwrap();
    let contractor = ContractorRepo::create(
        &pool,
        &ContractorInput {
            first_name: None,
            last_name: "Doe".to_string(),
            company_id: Some(company.id),
            hourly_rate: Some(87.5),
            start_date: NaiveDate::from_ymd_opt(2023, 7, 15),
            active: false,
        },
    )
    .await
    .unwrap();
    assert_eq!(contractor.hourly_rate, Some(87.5));
    assert!(!contractor.active);

    let found = ContractorRepo::find_by_id(&pool, contractor.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.company_id, Some(company.id));
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_user_failed_logins_and_reset(pool: PgPool) {
    let user = UserRepo::create(
        &pool,
        &NewAccount {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "hash".to_string(),
        },
    )
    .await
    .unwrap();
    assert_eq!(user.failed_login_count, 0);

    let lock_until = chrono::Utc::now() + chrono::Duration::minutes(15);
    let first = UserRepo::record_failed_login(&pool, user.id, 2, lock_until)
        .await
        .unwrap();
    assert_eq!(first.failed_login_count, 1);
    assert!(first.locked_until.is_none());
    let second = UserRepo::record_failed_login(&pool, user.id, 2, lock_until)
        .await
        .unwrap();
    assert_eq!(second.failed_login_count, 2);
    assert!(second.locked_until.is_some());

    UserRepo::record_successful_login(&pool, user.id).await.unwrap();
    let user = UserRepo::find_by_username(&pool, "alice")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.failed_login_count, 0);
    assert!(user.locked_until.is_none());
    assert!(user.last_login_at.is_some());
    assert!(UserRepo::email_taken(&pool, "alice@example.com")
        .await
        .unwrap());
    assert!(!UserRepo::email_taken(&pool, "bob@example.com").await.unwrap());
}
