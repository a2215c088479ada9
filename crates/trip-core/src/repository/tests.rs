//! Repository Integration Tests
//!
//! Tests for SqliteTripRepository and SettingsRepository with SQLite databases.

#[cfg(test)]
mod tests {
    use crate::domain::{DomainError, ItineraryItem, Language, Trip};
    use crate::repository::{
        init_db, DbState, ItineraryOperations, Repository, SettingsRepository,
        SqliteTripRepository, TripRepository,
    };
    use std::path::PathBuf;

    async fn setup_test_db() -> (DbState, SqliteTripRepository) {
        // Use in-memory database for tests
        let db_path = PathBuf::from(":memory:");
        let db_state = init_db(&db_path).await.expect("Failed to init test DB");
        let repo = SqliteTripRepository::new(db_state.connection());
        (db_state, repo)
    }

    fn trip(destination: &str) -> Trip {
        Trip::new(
            destination.to_string(),
            "2024-01-01".to_string(),
            "2024-01-10".to_string(),
        )
    }

    fn draft(title: &str, date: i32) -> ItineraryItem {
        ItineraryItem::draft(title.to_string(), format!("{} notes", title), date)
    }

    #[tokio::test]
    async fn test_create_trip() {
        let (_db, repo) = setup_test_db().await;

        let created = repo.create(&trip("Paris")).await.expect("Failed to create");

        assert!(created.id > 0);
        assert_eq!(created.destination, "Paris");
        assert_eq!(created.start_date, "2024-01-01");
    }

    #[tokio::test]
    async fn test_create_with_items_assigns_ids() {
        let (_db, repo) = setup_test_db().await;

        let created = repo
            .create(&trip("Rome").with_items(vec![draft("Colosseum", 1), draft("Forum", 2)]))
            .await
            .unwrap();

        assert_eq!(created.itinerary_items.len(), 2);
        assert!(created.itinerary_items.iter().all(|item| item.id > 0));
        assert!(created
            .itinerary_items
            .iter()
            .all(|item| item.trip_id == created.id));

        let found = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_list_trips_in_id_order() {
        let (_db, repo) = setup_test_db().await;

        repo.create(&trip("Trip 1")).await.unwrap();
        repo.create(&trip("Trip 2").with_items(vec![draft("Walk", 3)])).await.unwrap();

        let trips = repo.get_trips().await.expect("List failed");
        assert_eq!(trips.len(), 2);
        assert_eq!(trips[0].destination, "Trip 1");
        assert!(trips[0].itinerary_items.is_empty());
        assert_eq!(trips[1].itinerary_items[0].title, "Walk");
    }

    #[tokio::test]
    async fn test_itinerary_order_preserved() {
        let (_db, repo) = setup_test_db().await;

        // Dates deliberately out of order: insertion order wins
        let created = repo
            .create(&trip("Kyoto").with_items(vec![
                draft("Temple", 5),
                draft("Market", 1),
                draft("Garden", 3),
            ]))
            .await
            .unwrap();

        let titles: Vec<String> = repo
            .list_items(created.id)
            .await
            .unwrap()
            .into_iter()
            .map(|item| item.title)
            .collect();
        assert_eq!(titles, vec!["Temple", "Market", "Garden"]);
    }

    #[tokio::test]
    async fn test_item_lookup_across_trips() {
        let (_db, repo) = setup_test_db().await;

        repo.create(&trip("Kyoto").with_items(vec![draft("Temple", 1)]))
            .await
            .unwrap();
        let seoul = repo
            .create(&trip("Seoul").with_items(vec![draft("Palace", 2)]))
            .await
            .unwrap();

        let palace = &seoul.itinerary_items[0];
        let found = repo.find_item(palace.id).await.unwrap().unwrap();
        assert_eq!(&found, palace);
        assert_eq!(found.trip_id, seoul.id);

        assert!(repo.list_items(999).await.unwrap().is_empty());
        assert!(repo.find_item(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_trip_replaces_itinerary() {
        let (_db, repo) = setup_test_db().await;

        let created = repo
            .create(&trip("Original").with_items(vec![draft("Old", 1), draft("Kept", 2)]))
            .await
            .unwrap();

        let kept = created.itinerary_items[1].clone();
        let old_id = created.itinerary_items[0].id;
        let replacement = Trip {
            destination: "Updated".to_string(),
            itinerary_items: vec![
                kept.clone(),
                ItineraryItem::new(0, "New".to_string(), created.id, String::new(), 4),
            ],
            ..created.clone()
        };

        let updated = repo.update_trip(&replacement).await.expect("Update failed");
        assert_eq!(updated.destination, "Updated");
        assert_eq!(updated.itinerary_items[0], kept);
        assert!(updated.itinerary_items[1].id > 0);

        let found = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found, updated);
        assert!(repo.find_item(old_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_trip_is_not_found() {
        let (_db, repo) = setup_test_db().await;

        let err = repo.update_trip(&trip("Ghost").with_id(99)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_rejects_blank_destination() {
        let (_db, repo) = setup_test_db().await;
        let created = repo.create(&trip("Oslo")).await.unwrap();

        let blank = Trip {
            destination: String::new(),
            ..created.clone()
        };
        let err = repo.update(&blank).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));

        let found = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.destination, "Oslo");
    }

    #[tokio::test]
    async fn test_item_id_conflict_rolls_back() {
        let (_db, repo) = setup_test_db().await;

        let first = repo.create(&trip("Lisbon").with_items(vec![draft("Tram", 1)])).await.unwrap();
        let taken_id = first.itinerary_items[0].id;

        let intruder = trip("Porto").with_items(vec![ItineraryItem::new(
            taken_id,
            "Stolen".to_string(),
            0,
            String::new(),
            1,
        )]);
        let err = repo.create(&intruder).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let trips = repo.list().await.unwrap();
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0], first);
    }

    #[tokio::test]
    async fn test_create_ignores_incoming_id() {
        let (_db, repo) = setup_test_db().await;

        let created = repo
            .add_trip(&trip("Paris").with_id(7).with_items(vec![draft("Louvre", 1)]))
            .await
            .unwrap();

        assert_ne!(created.id, 7);
        assert_eq!(created.itinerary_items[0].trip_id, created.id);
        assert_eq!(repo.find_by_id(created.id).await.unwrap().unwrap(), created);
    }

    #[tokio::test]
    async fn test_explicit_item_id_advances_autoincrement() {
        let (_db, repo) = setup_test_db().await;

        repo.create(&trip("A").with_items(vec![ItineraryItem::new(
            10,
            "Fixed".to_string(),
            0,
            String::new(),
            1,
        )]))
        .await
        .unwrap();

        let next = repo.create(&trip("B").with_items(vec![draft("Draft", 2)])).await.unwrap();
        assert_eq!(next.itinerary_items[0].id, 11);
    }

    #[tokio::test]
    async fn test_item_id_space_exhausted_keeps_store_readable() {
        let (_db, repo) = setup_test_db().await;

        let edge = repo
            .create(&trip("Edge").with_items(vec![ItineraryItem::new(
                u32::MAX,
                "Last".to_string(),
                0,
                String::new(),
                1,
            )]))
            .await
            .unwrap();
        assert_eq!(edge.itinerary_items[0].id, u32::MAX);

        // Next rowid would be 2^32: refused and rolled back
        let err = repo
            .create(&trip("Over").with_items(vec![draft("Draft", 2)]))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Internal(_)));

        let trips = repo.get_trips().await.expect("List failed");
        assert_eq!(trips, vec![edge]);
    }

    #[tokio::test]
    async fn test_delete_trip_removes_items() {
        let (_db, repo) = setup_test_db().await;

        let created = repo
            .create(&trip("To delete").with_items(vec![draft("Gone", 1)]))
            .await
            .unwrap();
        let item_id = created.itinerary_items[0].id;

        repo.delete_trip(created.id).await.expect("Delete failed");

        assert!(repo.find_by_id(created.id).await.unwrap().is_none());
        assert!(repo.find_item(item_id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let (_db, repo) = setup_test_db().await;
        let created = repo.create(&trip("Once")).await.unwrap();

        repo.delete(created.id).await.unwrap();
        let err = repo.delete(created.id).await.unwrap_err();
        assert_eq!(err, DomainError::trip_not_found(created.id));
    }

    #[tokio::test]
    async fn test_uninitialized_db_errors() {
        let state = DbState::new(PathBuf::from("unused.db"));
        assert!(!state.is_initialized().await);

        let repo = SqliteTripRepository::new(state.connection());
        let err = repo.list().await.unwrap_err();
        assert!(matches!(err, DomainError::Internal(_)));
    }

    #[tokio::test]
    async fn test_file_db_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("trips.db");

        {
            let state = init_db(&db_path).await.unwrap();
            let repo = SqliteTripRepository::new(state.connection());
            repo.create(&trip("Berlin").with_items(vec![draft("Wall", 2)])).await.unwrap();
        }

        let state = init_db(&db_path).await.unwrap();
        let repo = SqliteTripRepository::new(state.connection());
        let trips = repo.get_trips().await.unwrap();
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].itinerary_items[0].title, "Wall");
    }

    #[tokio::test]
    async fn test_language_persistence() {
        let (db, _repo) = setup_test_db().await;
        let settings = SettingsRepository::new(db.connection());

        assert_eq!(settings.load_language().await.unwrap(), None);

        settings.save_language(Language::En).await.unwrap();
        assert_eq!(settings.load_language().await.unwrap(), Some(Language::En));

        settings.save_language(Language::Es).await.unwrap();
        assert_eq!(settings.get("language").await.unwrap().as_deref(), Some("es"));
    }

    #[tokio::test]
    async fn test_unknown_language_ignored() {
        let (db, _repo) = setup_test_db().await;
        let settings = SettingsRepository::new(db.connection());

        settings.set("language", "klingon").await.unwrap();
        assert_eq!(settings.load_language().await.unwrap(), None);
    }
}
