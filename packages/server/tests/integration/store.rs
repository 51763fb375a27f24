use pdf2xml_server::store::StoreError;
use pdf2xml_server::store::conversion::{self, NewConversion};

use crate::common::{fresh_db, insert_user};

fn new_conversion(user_id: i32, pdf_filename: &str) -> NewConversion {
    NewConversion {
        user_id,
        pdf_filename: pdf_filename.to_string(),
        xml_content: "<pdf-document/>".to_string(),
        file_size: 7,
    }
}

#[tokio::test]
async fn created_record_reads_back_unchanged() {
    let store = fresh_db().await;
    let user_id = insert_user(&store.db, "alice").await;

    let created = conversion::create(&store.db, new_conversion(user_id, "doc.pdf"))
        .await
        .unwrap();
    let fetched = conversion::get_by_id(&store.db, created.id).await.unwrap();

    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.user_id, user_id);
    assert_eq!(fetched.pdf_filename, "doc.pdf");
    assert_eq!(fetched.xml_filename, created.xml_filename);
    assert!(fetched.xml_filename.ends_with("_doc.xml"));
    assert_eq!(fetched.xml_content, "<pdf-document/>");
    assert_eq!(fetched.status.to_string(), "completed");
    assert_eq!(fetched.file_size, 7);
}

#[tokio::test]
async fn missing_record_is_not_found() {
    let store = fresh_db().await;

    let err = conversion::get_by_id(&store.db, 1).await.unwrap_err();

    assert!(matches!(err, StoreError::NotFound(1)));
}

#[tokio::test]
async fn list_is_scoped_to_owner_and_newest_first() {
    let store = fresh_db().await;
    let alice = insert_user(&store.db, "alice").await;
    let bob = insert_user(&store.db, "bob").await;

    let a1 = conversion::create(&store.db, new_conversion(alice, "a1.pdf")).await.unwrap();
    conversion::create(&store.db, new_conversion(bob, "b1.pdf")).await.unwrap();
    let a2 = conversion::create(&store.db, new_conversion(alice, "a2.pdf")).await.unwrap();

    let rows = conversion::list_by_owner(&store.db, alice).await.unwrap();

    let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![a2.id, a1.id]);
    assert!(rows.iter().all(|r| r.user_id == alice));
}

#[tokio::test]
async fn ownership_check_separates_forbidden_from_missing() {
    let store = fresh_db().await;
    let alice = insert_user(&store.db, "alice").await;
    let bob = insert_user(&store.db, "bob").await;
    let record = conversion::create(&store.db, new_conversion(alice, "a.pdf")).await.unwrap();

    let own = conversion::get_owned_or_forbidden(&store.db, record.id, alice).await;
    assert!(own.is_ok());

    let other = conversion::get_owned_or_forbidden(&store.db, record.id, bob).await;
    assert!(matches!(other, Err(StoreError::Forbidden(id)) if id == record.id));

    let missing = conversion::get_owned_or_forbidden(&store.db, record.id + 100, alice).await;
    assert!(matches!(missing, Err(StoreError::NotFound(_))));
}

#[tokio::test]
async fn concurrent_creates_get_distinct_ids_and_filenames() {
    let store = fresh_db().await;
    let alice = insert_user(&store.db, "alice").await;

    let mut handles = Vec::new();
    for _ in 0..8 {
        let db = store.db.clone();
        handles.push(tokio::spawn(async move {
            conversion::create(&db, new_conversion(alice, "same.pdf")).await
        }));
    }

    let mut ids = std::collections::HashSet::new();
    let mut filenames = std::collections::HashSet::new();
    for handle in handles {
        let record = handle.await.unwrap().unwrap();
        ids.insert(record.id);
        filenames.insert(record.xml_filename);
    }

    assert_eq!(ids.len(), 8);
    assert_eq!(filenames.len(), 8);
    let rows = conversion::list_by_owner(&store.db, alice).await.unwrap();
    assert_eq!(rows.len(), 8);
}
