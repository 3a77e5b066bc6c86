//! Item CRUD through the HTTP surface. Ownership always comes from the
//! parent list.

use axum::http::StatusCode;

use todo_app_integration_tests::TestApp;

#[tokio::test]
async fn test_groceries_scenario() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let list_id = app.create_list(&alice, "Groceries").await;

    for name in ["Milk", "Bread", "Eggs"] {
        app.create_item(&alice, list_id, name).await;
    }

    let resp = app.get(&format!("/items?listId={list_id}"), Some(&alice)).await;
    assert_eq!(resp.status, StatusCode::OK);
    assert_eq!(resp.body["list"]["name"], "Groceries");

    let items = resp.body["items"].as_array().cloned().unwrap_or_default();
    let names: Vec<&str> = items.iter().filter_map(|i| i["name"].as_str()).collect();
    assert_eq!(names, ["Milk", "Bread", "Eggs"]);
    assert!(items.iter().all(|i| i["status"] == "new"));
    assert!(items.iter().all(|i| i["todoListId"] == list_id));
}

#[tokio::test]
async fn test_item_lifecycle() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let list_id = app.create_list(&alice, "Groceries").await;
    let list_id_str = list_id.to_string();

    let form = app
        .get(&format!("/items/new?listId={list_id}"), Some(&alice))
        .await;
    assert_eq!(form.status, StatusCode::OK);
    assert_eq!(form.body["todoListId"], list_id);
    assert_eq!(form.body["status"], "new");

    let created = app
        .post(
            "/items",
            Some(&alice),
            &[
                ("name", "Milk"),
                ("description", "2 litres"),
                ("status", ""),
                ("todoListId", &list_id_str),
            ],
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["status"], "new");
    let id = created.id();

    let shown = app.get(&format!("/items/{id}"), Some(&alice)).await;
    assert_eq!(shown.status, StatusCode::OK);
    assert_eq!(shown.body, created.body);

    let edit = app.get(&format!("/items/{id}/edit"), Some(&alice)).await;
    assert_eq!(edit.body["name"], "Milk");
    assert_eq!(edit.body["version"], 1);

    let updated = app
        .post(
            &format!("/items/{id}"),
            Some(&alice),
            &[
                ("name", "Oat milk"),
                ("description", "1 litre"),
                ("status", "in progress"),
                ("todoListId", &list_id_str),
                ("version", "1"),
            ],
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["name"], "Oat milk");
    assert_eq!(updated.body["status"], "in progress");
    assert_eq!(updated.body["version"], 2);

    let status = app
        .post(
            &format!("/items/{id}/status"),
            Some(&alice),
            &[("status", "done")],
        )
        .await;
    assert_eq!(status.status, StatusCode::OK);
    assert_eq!(status.body["status"], "done");
    assert_eq!(status.body["name"], "Oat milk");

    let confirm = app.get(&format!("/items/{id}/delete"), Some(&alice)).await;
    assert_eq!(confirm.body["id"], id);

    let deleted = app
        .post(&format!("/items/{id}/delete"), Some(&alice), &[])
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
    assert_eq!(
        app.get(&format!("/items/{id}"), Some(&alice)).await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_non_positive_list_id_is_not_found() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    app.create_list(&alice, "Groceries").await;

    for uri in ["/items?listId=0", "/items?listId=-1", "/items", "/items/new"] {
        let resp = app.get(uri, Some(&alice)).await;
        assert_eq!(resp.status, StatusCode::NOT_FOUND, "GET {uri}");
    }
}

#[tokio::test]
async fn test_items_of_foreign_list_are_hidden() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let list_id = app.create_list(&alice, "Groceries").await;
    let item_id = app.create_item(&alice, list_id, "Milk").await;

    for uri in [
        format!("/items?listId={list_id}"),
        format!("/items/new?listId={list_id}"),
        format!("/items/{item_id}"),
        format!("/items/{item_id}/edit"),
        format!("/items/{item_id}/delete"),
    ] {
        assert_eq!(
            app.get(&uri, Some(&bob)).await.status,
            StatusCode::NOT_FOUND,
            "GET {uri}"
        );
        assert_eq!(
            app.get(&uri, None).await.status,
            StatusCode::NOT_FOUND,
            "anonymous GET {uri}"
        );
    }
}

#[tokio::test]
async fn test_cannot_create_item_in_foreign_list() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let list_id = app.create_list(&alice, "Groceries").await;

    let resp = app
        .post(
            "/items",
            Some(&bob),
            &[
                ("name", "Sneaky"),
                ("description", "not mine"),
                ("todoListId", &list_id.to_string()),
            ],
        )
        .await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);

    let items = app.get(&format!("/items?listId={list_id}"), Some(&alice)).await;
    assert_eq!(items.body["items"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_cannot_modify_foreign_item() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let list_id = app.create_list(&alice, "Groceries").await;
    let item_id = app.create_item(&alice, list_id, "Milk").await;
    let bobs_list = app.create_list(&bob, "Chores").await;

    let update = app
        .post(
            &format!("/items/{item_id}"),
            Some(&bob),
            &[
                ("name", "Taken"),
                ("description", "moved away"),
                ("todoListId", &bobs_list.to_string()),
            ],
        )
        .await;
    assert_eq!(update.status, StatusCode::NOT_FOUND);

    let status = app
        .post(
            &format!("/items/{item_id}/status"),
            Some(&bob),
            &[("status", "done")],
        )
        .await;
    assert_eq!(status.status, StatusCode::NOT_FOUND);

    let delete = app
        .post(&format!("/items/{item_id}/delete"), Some(&bob), &[])
        .await;
    assert_eq!(delete.status, StatusCode::NOT_FOUND);

    let item = app.get(&format!("/items/{item_id}"), Some(&alice)).await;
    assert_eq!(item.status, StatusCode::OK);
    assert_eq!(item.body["name"], "Milk");
    assert_eq!(item.body["status"], "new");
    assert_eq!(item.body["todoListId"], list_id);
}

#[tokio::test]
async fn test_move_between_own_lists_only() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let groceries = app.create_list(&alice, "Groceries").await;
    let pharmacy = app.create_list(&alice, "Pharmacy").await;
    let bobs_list = app.create_list(&bob, "Chores").await;
    let item_id = app.create_item(&alice, groceries, "Plasters").await;
    let uri = format!("/items/{item_id}");

    let into_foreign = app
        .post(
            &uri,
            Some(&alice),
            &[
                ("name", "Plasters"),
                ("description", "box"),
                ("todoListId", &bobs_list.to_string()),
            ],
        )
        .await;
    assert_eq!(into_foreign.status, StatusCode::NOT_FOUND);

    let moved = app
        .post(
            &uri,
            Some(&alice),
            &[
                ("name", "Plasters"),
                ("description", "box"),
                ("todoListId", &pharmacy.to_string()),
            ],
        )
        .await;
    assert_eq!(moved.status, StatusCode::OK);
    assert_eq!(moved.body["todoListId"], pharmacy);

    let remaining = app.get(&format!("/items?listId={groceries}"), Some(&alice)).await;
    assert_eq!(remaining.body["items"].as_array().map(Vec::len), Some(0));
    let bobs_items = app.get(&format!("/items?listId={bobs_list}"), Some(&bob)).await;
    assert_eq!(bobs_items.body["items"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn test_deleting_list_removes_its_items() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let list_id = app.create_list(&alice, "Groceries").await;
    let milk = app.create_item(&alice, list_id, "Milk").await;
    let bread = app.create_item(&alice, list_id, "Bread").await;

    let deleted = app
        .post(&format!("/lists/{list_id}/delete"), Some(&alice), &[])
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    for id in [milk, bread] {
        assert_eq!(
            app.get(&format!("/items/{id}"), Some(&alice)).await.status,
            StatusCode::NOT_FOUND
        );
    }
    assert_eq!(
        app.get(&format!("/items?listId={list_id}"), Some(&alice))
            .await
            .status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_invalid_item_is_echoed_back() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let list_id = app.create_list(&alice, "Groceries").await;

    let resp = app
        .post(
            "/items",
            Some(&alice),
            &[
                ("name", ""),
                ("description", "no name"),
                ("todoListId", &list_id.to_string()),
            ],
        )
        .await;
    assert_eq!(resp.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(resp.body["errors"]["name"], "name is required");
    assert_eq!(resp.body["form"]["description"], "no name");

    let blank_status = app
        .post(
            "/items/1/status",
            Some(&alice),
            &[("status", "  ")],
        )
        .await;
    assert_eq!(blank_status.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_stale_item_version_conflicts() {
    let app = TestApp::new();
    let alice = app.register("alice").await;
    let list_id = app.create_list(&alice, "Groceries").await;
    let item_id = app.create_item(&alice, list_id, "Milk").await;
    let uri = format!("/items/{item_id}/status");

    let first = app
        .post(&uri, Some(&alice), &[("status", "done"), ("version", "1")])
        .await;
    assert_eq!(first.status, StatusCode::OK);

    let second = app
        .post(&uri, Some(&alice), &[("status", "new"), ("version", "1")])
        .await;
    assert_eq!(second.status, StatusCode::CONFLICT);

    let item = app.get(&format!("/items/{item_id}"), Some(&alice)).await;
    assert_eq!(item.body["status"], "done");
}
