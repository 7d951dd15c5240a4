use folio_core::TestApp;
use serde_json::json;

// ═══ Health and docs ═══

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let res = app.client.get(&app.url("/api/health")).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.data()["status"], "ok");
}

#[tokio::test]
async fn test_openapi_json_endpoint() {
    let app = TestApp::new().await;
    let res = app.client.get(&app.url("/api-docs/openapi.json")).await;
    assert_eq!(res.status, 200);
    assert!(res.json().get("openapi").is_some());
}

// ═══ Skills ═══

#[tokio::test]
async fn test_skill_crud() {
    let app = TestApp::new().await;
    let token = app.login_admin().await;

    let res = app
        .client
        .post_with_auth(
            &app.url("/api/admin/skills"),
            &token,
            &json!({ "name": "Rust", "proficiency": 90, "category": "Languages" }).to_string(),
        )
        .await;
    assert_eq!(res.status, 201, "body: {}", res.body);
    let skill = res.data();
    let id = skill["id"].as_str().unwrap().to_string();
    assert_eq!(skill["showInPortfolio"], true);
    assert_eq!(skill["sortOrder"], 0);

    // PUT replaces every field.
    let res = app
        .client
        .put_with_auth(
            &app.url(&format!("/api/admin/skills/{}", id)),
            &token,
            &json!({ "name": "Rust", "proficiency": 95 }).to_string(),
        )
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.data()["proficiency"], 95);
    assert_eq!(res.data()["category"], "");

    let res = app.client.get(&app.url("/api/public/skills")).await;
    assert_eq!(res.data().as_array().unwrap().len(), 1);

    let res = app
        .client
        .delete_with_auth(&app.url(&format!("/api/admin/skills/{}", id)), &token)
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.data()["message"], "Skill deleted");
    assert_eq!(res.data()["id"], id);

    let res = app.client.get(&app.url("/api/public/skills")).await;
    assert!(res.data().as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_skill_validation() {
    let app = TestApp::new().await;
    let token = app.login_admin().await;

    let res = app
        .client
        .post_with_auth(
            &app.url("/api/admin/skills"),
            &token,
            &json!({ "name": "Rust", "proficiency": 150 }).to_string(),
        )
        .await;
    assert_eq!(res.status, 422);
    assert_eq!(res.error()["fields"][0]["field"], "proficiency");
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let app = TestApp::new().await;
    let token = app.login_admin().await;
    let missing = uuid::Uuid::new_v4();

    let res = app
        .client
        .put_with_auth(
            &app.url(&format!("/api/admin/hobbies/{}", missing)),
            &token,
            &json!({ "name": "Chess" }).to_string(),
        )
        .await;
    assert_eq!(res.status, 404);

    for path in ["skills", "projects", "experience", "education", "hobbies", "testimonials"] {
        let res = app
            .client
            .delete_with_auth(&app.url(&format!("/api/admin/{}/{}", path, missing)), &token)
            .await;
        assert_eq!(res.status, 404, "{} should 404", path);
    }
}

#[tokio::test]
async fn test_lists_are_ordered_by_sort_order() {
    let app = TestApp::new().await;
    let token = app.login_admin().await;

    for (name, order) in [("Second", 2), ("First", 1), ("Third", 3)] {
        app.client
            .post_with_auth(
                &app.url("/api/admin/hobbies"),
                &token,
                &json!({ "name": name, "sortOrder": order }).to_string(),
            )
            .await;
    }

    let res = app.client.get(&app.url("/api/public/hobbies")).await;
    let names: Vec<String> = res
        .data()
        .as_array()
        .unwrap()
        .iter()
        .map(|h| h["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["First", "Second", "Third"]);
}

// ═══ Projects, experience, education ═══

#[tokio::test]
async fn test_project_tags_round_trip() {
    let app = TestApp::new().await;
    let token = app.login_admin().await;

    let res = app
        .client
        .post_with_auth(
            &app.url("/api/admin/projects"),
            &token,
            &json!({
                "title": "Folio",
                "description": "This site",
                "tags": ["rust", "axum"],
                "featured": true
            })
            .to_string(),
        )
        .await;
    assert_eq!(res.status, 201, "body: {}", res.body);
    assert_eq!(res.data()["tags"], json!(["rust", "axum"]));
    assert_eq!(res.data()["featured"], true);
}

#[tokio::test]
async fn test_experience_dates_and_bullets() {
    let app = TestApp::new().await;
    let token = app.login_admin().await;

    let res = app
        .client
        .post_with_auth(
            &app.url("/api/admin/experience"),
            &token,
            &json!({
                "title": "Engineer",
                "company": "Acme",
                "startDate": "2021-04-01",
                "endDate": "",
                "current": true,
                "description": ["Built things", "Fixed things"]
            })
            .to_string(),
        )
        .await;
    assert_eq!(res.status, 201, "body: {}", res.body);
    let data = res.data();
    assert_eq!(data["startDate"], "2021-04-01");
    assert!(data["endDate"].is_null());
    assert_eq!(data["description"], json!(["Built things", "Fixed things"]));
}

#[tokio::test]
async fn test_malformed_date_is_validation_error() {
    let app = TestApp::new().await;
    let token = app.login_admin().await;

    let res = app
        .client
        .post_with_auth(
            &app.url("/api/admin/education"),
            &token,
            &json!({
                "degree": "MSc",
                "school": "Somewhere",
                "startDate": "01/09/2018"
            })
            .to_string(),
        )
        .await;
    assert_eq!(res.status, 422);
}

// ═══ Aggregate ═══

#[tokio::test]
async fn test_portfolio_hides_private_skills_and_pending_testimonials() {
    let app = TestApp::new().await;
    let token = app.login_admin().await;

    for (name, visible) in [("Rust", true), ("COBOL", false)] {
        app.client
            .post_with_auth(
                &app.url("/api/admin/skills"),
                &token,
                &json!({ "name": name, "proficiency": 50, "showInPortfolio": visible })
                    .to_string(),
            )
            .await;
    }

    app.client
        .post(
            &app.url("/api/public/testimonials"),
            &json!({
                "authorName": "Grace",
                "authorEmail": "grace@example.com",
                "content": "Great work",
                "rating": 5
            })
            .to_string(),
        )
        .await;

    let res = app.client.get(&app.url("/api/public/portfolio")).await;
    assert_eq!(res.status, 200);
    let data = res.data();

    let skills = data["skills"].as_array().unwrap();
    assert_eq!(skills.len(), 1);
    assert_eq!(skills[0]["name"], "Rust");
    assert!(data["testimonials"].as_array().unwrap().is_empty());
    for section in ["projects", "experience", "education", "hobbies"] {
        assert!(data[section].is_array(), "{} should be present", section);
    }

    // The plain skills list still has both.
    let res = app.client.get(&app.url("/api/public/skills")).await;
    assert_eq!(res.data().as_array().unwrap().len(), 2);
}

// ═══ Testimonials ═══

#[tokio::test]
async fn test_testimonial_moderation() {
    let app = TestApp::new().await;
    let token = app.login_admin().await;

    let res = app
        .client
        .post(
            &app.url("/api/public/testimonials"),
            &json!({
                "authorName": "Grace",
                "authorRole": "CTO",
                "authorEmail": "grace@example.com",
                "content": "Great work",
                "rating": 5
            })
            .to_string(),
        )
        .await;
    assert_eq!(res.status, 201);
    assert_eq!(res.data()["status"], "pending");
    let id = res.data()["id"].as_str().unwrap().to_string();

    let res = app.client.get(&app.url("/api/public/testimonials")).await;
    assert!(res.data().as_array().unwrap().is_empty());

    let res = app
        .client
        .put_with_auth(
            &app.url(&format!("/api/admin/testimonials/{}/approve", id)),
            &token,
            "",
        )
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.data()["status"], "approved");

    let res = app.client.get(&app.url("/api/public/testimonials")).await;
    assert_eq!(res.data().as_array().unwrap().len(), 1);

    let res = app
        .client
        .put_with_auth(
            &app.url(&format!("/api/admin/testimonials/{}/reject", id)),
            &token,
            "",
        )
        .await;
    assert_eq!(res.data()["status"], "rejected");

    let res = app
        .client
        .get_with_auth(&app.url("/api/admin/testimonials"), &token)
        .await;
    assert_eq!(res.data().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_testimonial_rating_bounds() {
    let app = TestApp::new().await;

    let res = app
        .client
        .post(
            &app.url("/api/public/testimonials"),
            &json!({
                "authorName": "Grace",
                "authorEmail": "grace@example.com",
                "content": "Great work",
                "rating": 6
            })
            .to_string(),
        )
        .await;
    assert_eq!(res.status, 422);
}

// ═══ Contact info ═══

#[tokio::test]
async fn test_contact_info_defaults_then_upserts() {
    let app = TestApp::new().await;
    let token = app.login_admin().await;

    let res = app.client.get(&app.url("/api/public/contact-info")).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.data()["email"], "");

    let body = json!({ "email": "me@example.com", "github": "https://github.com/me" });
    let res = app
        .client
        .put_with_auth(&app.url("/api/admin/contact-info"), &token, &body.to_string())
        .await;
    assert_eq!(res.status, 200);

    let body = json!({ "email": "me@example.org" });
    app.client
        .put_with_auth(&app.url("/api/admin/contact-info"), &token, &body.to_string())
        .await;

    let res = app.client.get(&app.url("/api/public/contact-info")).await;
    assert_eq!(res.data()["email"], "me@example.org");
    assert_eq!(res.data()["github"], "", "PUT replaces all fields");
}
