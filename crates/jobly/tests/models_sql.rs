//! Statements issued by the models, checked against a recording client.

mod common;

use common::{PlainHasher, RecordingClient};
use jobly::models::{NewJob, NewUser, company, job, user};
use jobly::{CompanySearch, FieldMap, FieldValue, JobSearch, JoblyError, LoggingClient};

#[tokio::test]
async fn company_listing_unfiltered() {
    let client = RecordingClient::new();
    let listing = company::find_all(&client, None).await.unwrap();
    assert!(listing.is_empty());

    let stmt = client.last();
    assert_eq!(
        stmt.sql,
        "SELECT handle, name, description, num_employees, logo_url FROM companies ORDER BY name"
    );
    assert!(stmt.params.is_empty());
}

#[tokio::test]
async fn company_listing_empty_search_is_unfiltered() {
    let client = RecordingClient::new();
    company::find_all(&client, Some(&CompanySearch::new().name("")))
        .await
        .unwrap();
    assert!(!client.last().sql.contains("WHERE"));
}

#[tokio::test]
async fn company_listing_by_name_omits_employee_count() {
    let client = RecordingClient::new();
    let search = CompanySearch::new().name("net");
    company::find_all(&client, Some(&search)).await.unwrap();

    let stmt = client.last();
    assert_eq!(
        stmt.sql,
        "SELECT handle, name, description, logo_url FROM companies WHERE name ILIKE $1 ORDER BY name"
    );
    assert_eq!(stmt.params, [r#""%net%""#]);
}

#[tokio::test]
async fn company_listing_by_all_fields() {
    let client = RecordingClient::new();
    let search = CompanySearch::new()
        .max_employees("300")
        .min_employees(10)
        .name("net");
    company::find_all(&client, Some(&search)).await.unwrap();

    let stmt = client.last();
    assert_eq!(
        stmt.sql,
        "SELECT handle, name, description, num_employees, logo_url FROM companies \
         WHERE name ILIKE $1 AND num_employees >= $2 AND num_employees <= $3 ORDER BY name"
    );
    assert_eq!(stmt.params, [r#""%net%""#, "10", "300"]);
}

#[tokio::test]
async fn company_listing_rejects_bad_bounds_before_querying() {
    let client = RecordingClient::new();
    let search = CompanySearch::new().min_employees("lots");
    let err = company::find_all(&client, Some(&search)).await.unwrap_err();
    assert!(matches!(err, JoblyError::InvalidFilter { .. }));
    assert!(client.statements().is_empty());
}

#[tokio::test]
async fn company_update_binds_handle_after_values() {
    let client = RecordingClient::new();
    let data = FieldMap::new()
        .with("numEmployees", 12)
        .with("name", "New");
    let err = company::update(&client, "c1", &data).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Not found: No company: c1");

    let stmt = client.last();
    assert_eq!(
        stmt.sql,
        r#"UPDATE companies SET "num_employees"=$1, "name"=$2 WHERE handle = $3 RETURNING handle, name, description, num_employees, logo_url"#
    );
    assert_eq!(stmt.params, ["Int(12)", r#"Text("New")"#, r#""c1""#]);
}

#[tokio::test]
async fn company_update_rejects_handle_and_empty_data() {
    let client = RecordingClient::new();
    let err = company::update(&client, "c1", &FieldMap::new().with("handle", "c9"))
        .await
        .unwrap_err();
    assert!(matches!(err, JoblyError::BadRequest(_)));

    let err = company::update(&client, "c1", &FieldMap::new()).await.unwrap_err();
    assert!(matches!(err, JoblyError::InvalidInput(_)));
    assert!(client.statements().is_empty());
}

#[tokio::test]
async fn company_get_and_remove_not_found() {
    let client = RecordingClient::new();
    assert!(company::get(&client, "nope").await.unwrap_err().is_not_found());
    assert!(company::remove(&client, "nope").await.unwrap_err().is_not_found());
    assert_eq!(
        client.sql(),
        [
            "SELECT handle, name, description, num_employees, logo_url FROM companies WHERE handle = $1",
            "DELETE FROM companies WHERE handle = $1 RETURNING handle",
        ]
    );
}

#[tokio::test]
async fn job_listing_filters_in_order() {
    let client = RecordingClient::new();
    let search = JobSearch::new()
        .has_equity("true")
        .min_salary("30")
        .title("j");
    job::find_all(&client, Some(&search)).await.unwrap();

    let stmt = client.last();
    assert_eq!(
        stmt.sql,
        "SELECT id, title, salary, equity, company_handle FROM jobs \
         WHERE title ILIKE $1 AND salary >= $2 AND equity > $3 ORDER BY salary"
    );
    assert_eq!(stmt.params, [r#""%j%""#, "30", "0"]);
}

#[tokio::test]
async fn job_listing_equity_false_is_unfiltered() {
    let client = RecordingClient::new();
    job::find_all(&client, Some(&JobSearch::new().has_equity("false")))
        .await
        .unwrap();
    assert_eq!(
        client.last().sql,
        "SELECT id, title, salary, equity, company_handle FROM jobs ORDER BY salary"
    );
}

#[tokio::test]
async fn job_create_requires_existing_company() {
    let client = RecordingClient::new();
    let new = NewJob {
        title: "new".into(),
        salary: Some(100),
        equity: None,
        company_handle: "nope".into(),
    };
    let err = job::create(&client, &new).await.unwrap_err();
    assert_eq!(err.to_string(), "Bad request: Invalid company handle: nope");
    assert_eq!(client.statements().len(), 1);
}

#[tokio::test]
async fn job_create_validates_before_querying() {
    let client = RecordingClient::new();
    let new = NewJob {
        title: "new".into(),
        salary: Some(-1),
        equity: None,
        company_handle: "c1".into(),
    };
    let err = job::create(&client, &new).await.unwrap_err();
    assert_eq!(err.status_code(), 400);
    assert!(client.statements().is_empty());
}

#[tokio::test]
async fn job_update_keeps_column_names_and_binds_id_last() {
    let client = RecordingClient::new();
    let data = FieldMap::new().with("title", "New").with("salary", 500);
    let err = job::update(&client, 7, &data).await.unwrap_err();
    assert_eq!(err.to_string(), "Not found: No job: 7");

    let stmt = client.last();
    assert_eq!(
        stmt.sql,
        r#"UPDATE jobs SET "title"=$1, "salary"=$2 WHERE id = $3 RETURNING id, title, salary, equity, company_handle"#
    );
    assert_eq!(stmt.params, [r#"Text("New")"#, "Int(500)", "7"]);
}

#[tokio::test]
async fn job_update_binds_numeric_text_as_numbers() {
    let client = RecordingClient::new();
    let data = FieldMap::new().with("equity", "0.25").with("salary", "500");
    job::update(&client, 7, &data).await.unwrap_err();
    assert_eq!(client.last().params, ["Float(0.25)", "Int(500)", "7"]);

    let client = RecordingClient::new();
    let err = job::update(&client, 7, &FieldMap::new().with("title", 3))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Bad request: Invalid title: 3");
    assert!(client.statements().is_empty());
}

#[tokio::test]
async fn job_update_rejects_company_handle() {
    let client = RecordingClient::new();
    let data = FieldMap::new().with("companyHandle", "c2");
    let err = job::update(&client, 7, &data).await.unwrap_err();
    assert!(matches!(err, JoblyError::BadRequest(_)));
    assert!(client.statements().is_empty());
}

#[tokio::test]
async fn user_update_translates_and_hashes_password() {
    let client = RecordingClient::new();
    let data = FieldMap::new()
        .with("firstName", "New")
        .with("password", "new-password")
        .with("isAdmin", true);
    let err = user::update(&client, "u1", &data, &PlainHasher)
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let stmt = client.last();
    assert_eq!(
        stmt.sql,
        r#"UPDATE users SET "first_name"=$1, "password"=$2, "is_admin"=$3 WHERE username = $4 RETURNING username, first_name, last_name, email, is_admin"#
    );
    assert_eq!(
        stmt.params,
        [
            r#"Text("New")"#,
            r#"Text("hashed:new-password")"#,
            "Bool(true)",
            r#""u1""#
        ]
    );
}

#[tokio::test]
async fn user_update_rejects_bad_values() {
    let client = RecordingClient::new();
    let short = FieldMap::new().with("password", "pw");
    assert!(matches!(
        user::update(&client, "u1", &short, &PlainHasher).await.unwrap_err(),
        JoblyError::Validation(_)
    ));
    let email = FieldMap::new().with("email", FieldValue::Int(3));
    assert!(matches!(
        user::update(&client, "u1", &email, &PlainHasher).await.unwrap_err(),
        JoblyError::BadRequest(_)
    ));
    let username = FieldMap::new().with("username", "u9");
    assert!(matches!(
        user::update(&client, "u1", &username, &PlainHasher).await.unwrap_err(),
        JoblyError::BadRequest(_)
    ));
    assert!(client.statements().is_empty());
}

#[tokio::test]
async fn user_update_checks_value_types() {
    let client = RecordingClient::new();
    let first_name = FieldMap::new().with("firstName", 42);
    let err = user::update(&client, "u1", &first_name, &PlainHasher)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Bad request: Invalid firstName: 42");
    let admin = FieldMap::new().with("isAdmin", "yes");
    assert!(matches!(
        user::update(&client, "u1", &admin, &PlainHasher).await.unwrap_err(),
        JoblyError::BadRequest(_)
    ));
    assert!(client.statements().is_empty());

    let admin = FieldMap::new().with("isAdmin", "true");
    user::update(&client, "u1", &admin, &PlainHasher).await.unwrap_err();
    assert_eq!(client.last().params, ["Bool(true)", r#""u1""#]);
}

#[tokio::test]
async fn company_update_checks_value_types() {
    let client = RecordingClient::new();
    let data = FieldMap::new().with("numEmployees", "12").with("logoUrl", FieldValue::Null);
    company::update(&client, "c1", &data).await.unwrap_err();
    assert_eq!(client.last().params, ["Int(12)", "Null", r#""c1""#]);

    let client = RecordingClient::new();
    for data in [
        FieldMap::new().with("numEmployees", "-1"),
        FieldMap::new().with("numEmployees", "a dozen"),
        FieldMap::new().with("description", FieldValue::Null),
    ] {
        let err = company::update(&client, "c1", &data).await.unwrap_err();
        assert!(matches!(err, JoblyError::BadRequest(_)));
    }
    assert!(client.statements().is_empty());
}

#[tokio::test]
async fn user_listing_and_lookups() {
    let client = RecordingClient::new();
    assert!(user::find_all(&client).await.unwrap().is_empty());
    assert!(user::get(&client, "nope").await.unwrap_err().is_not_found());
    assert_eq!(
        client.sql(),
        [
            "SELECT username, first_name, last_name, email, is_admin FROM users ORDER BY username",
            "SELECT username, first_name, last_name, email, is_admin FROM users WHERE username = $1",
        ]
    );
}

#[tokio::test]
async fn register_validates_before_querying() {
    let client = RecordingClient::new();
    let new = NewUser {
        username: "new".into(),
        password: "password".into(),
        first_name: "Test".into(),
        last_name: "Tester".into(),
        email: "not-an-email".into(),
        is_admin: false,
    };
    let err = user::register(&client, &new, &PlainHasher).await.unwrap_err();
    assert!(matches!(err, JoblyError::Validation(_)));
    assert!(client.statements().is_empty());
}

#[tokio::test]
async fn authenticate_unknown_user_is_unauthorized() {
    let client = RecordingClient::new();
    let err = user::authenticate(&client, "nope", "password", &PlainHasher)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 401);
}

#[tokio::test]
async fn apply_to_missing_job_is_not_found() {
    let client = RecordingClient::new();
    let err = user::apply_to_job(&client, "u1", 0).await.unwrap_err();
    assert_eq!(err.to_string(), "Not found: No job: 0");
    assert_eq!(client.sql(), ["SELECT id FROM jobs WHERE id = $1"]);
}

#[tokio::test]
async fn logging_client_is_transparent() {
    let client = LoggingClient::new(RecordingClient::new());
    company::find_all(&client, Some(&CompanySearch::new().min_employees(2)))
        .await
        .unwrap();
    assert_eq!(
        client.inner().last().sql,
        "SELECT handle, name, description, num_employees, logo_url FROM companies \
         WHERE num_employees >= $1 ORDER BY name"
    );
}
