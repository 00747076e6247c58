//! Service Tests
//!
//! End-to-end behaviour of the board, list and card services over an
//! in-memory store with in-memory collaborators.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};

    use crate::domain::{Activity, CardStatus, DomainError, Member, PositionAllocator};
    use crate::services::{InMemoryActivityCatalog, InMemoryMemberDirectory};
    use crate::{AppState, BoardConfig};

    struct Harness {
        app: AppState,
        members: Arc<InMemoryMemberDirectory>,
        activities: Arc<InMemoryActivityCatalog>,
    }

    async fn setup() -> Harness {
        let members = Arc::new(InMemoryMemberDirectory::new());
        let activities = Arc::new(InMemoryActivityCatalog::new());
        let app = AppState::open(BoardConfig::default(), members.clone(), activities.clone())
            .await
            .expect("Failed to open in-memory store");
        Harness {
            app,
            members,
            activities,
        }
    }

    async fn titles(app: &AppState, list_id: u32) -> Vec<(String, i32)> {
        app.cards
            .list_cards_by_list(list_id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| (c.title, c.position))
            .collect()
    }

    #[tokio::test]
    async fn test_in_memory_state() {
        let app = AppState::in_memory().await.unwrap();
        let board = app.boards.create_board("Gala", "").await.unwrap();
        assert!(app.boards.get_board(board.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_move_card_to_front_of_other_list() {
        let h = setup().await;
        let app = &h.app;

        let board = app.boards.create_board("Spring Concert", "").await.unwrap();
        let todo = app.lists.create_list("To Do", board.id, None).await.unwrap();
        let done = app.lists.create_list("Done", board.id, None).await.unwrap();
        let card = app
            .cards
            .create_card("Book venue", todo.id, None, "")
            .await
            .unwrap();
        assert_eq!(card.position, 1);

        let moved = app.cards.move_card(card.id, done.id, 1).await.unwrap();
        assert_eq!(moved.list_id, done.id);
        assert_eq!(moved.position, 1);

        assert!(titles(app, todo.id).await.is_empty());
        assert_eq!(titles(app, done.id).await, vec![("Book venue".to_string(), 1)]);
    }

    #[tokio::test]
    async fn test_create_card_at_position_shifts_later_cards() {
        let h = setup().await;
        let app = &h.app;
        let board = app.boards.create_board("Board", "").await.unwrap();
        let list = app.lists.create_list("To Do", board.id, None).await.unwrap();

        app.cards.create_card("A", list.id, None, "").await.unwrap();
        app.cards.create_card("B", list.id, None, "").await.unwrap();
        app.cards.create_card("Front", list.id, Some(1), "").await.unwrap();
        app.cards.create_card("Tail", list.id, Some(50), "").await.unwrap();

        assert_eq!(
            titles(app, list.id).await,
            vec![
                ("Front".to_string(), 1),
                ("A".to_string(), 2),
                ("B".to_string(), 3),
                ("Tail".to_string(), 4),
            ]
        );
    }

    #[tokio::test]
    async fn test_update_position_within_list() {
        let h = setup().await;
        let app = &h.app;
        let board = app.boards.create_board("Board", "").await.unwrap();
        let list = app.lists.create_list("To Do", board.id, None).await.unwrap();
        let a = app.cards.create_card("A", list.id, None, "").await.unwrap();
        app.cards.create_card("B", list.id, None, "").await.unwrap();
        app.cards.create_card("C", list.id, None, "").await.unwrap();

        let moved = app.cards.update_position(a.id, 2).await.unwrap();
        assert_eq!(moved.position, 2);
        assert_eq!(
            titles(app, list.id).await,
            vec![("B".to_string(), 1), ("A".to_string(), 2), ("C".to_string(), 3)]
        );
    }

    #[tokio::test]
    async fn test_delete_board_cascades() {
        let h = setup().await;
        let app = &h.app;
        let board = app.boards.create_board("Festival", "three stages").await.unwrap();

        let mut list_ids = Vec::new();
        for name in ["Backlog", "Doing", "Done"] {
            list_ids.push(app.lists.create_list(name, board.id, None).await.unwrap().id);
        }
        let mut card_ids = Vec::new();
        for n in 0..5 {
            let list_id = list_ids[n % list_ids.len()];
            let card = app
                .cards
                .create_card(&format!("Task {}", n), list_id, None, "")
                .await
                .unwrap();
            card_ids.push(card.id);
        }

        let tree = app
            .boards
            .get_board_with_lists_and_cards(board.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(tree.lists.len(), 3);
        assert_eq!(tree.card_count(), 5);

        app.boards.delete_board(board.id).await.unwrap();

        let page = app
            .boards
            .list_boards_paged(1, None, Some("Festival"))
            .await
            .unwrap();
        assert_eq!(page.total, 0);
        assert!(page.boards.is_empty());

        let err = app.lists.list_lists_by_board(board.id).await.unwrap_err();
        assert!(err.is_not_found());
        for id in list_ids {
            assert!(app.lists.get_list(id).await.unwrap().is_none());
        }
        for id in card_ids {
            assert!(app.cards.get_card(id).await.unwrap().is_none());
        }
        assert!(app
            .boards
            .get_board_with_lists_and_cards(board.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_list_removes_its_cards_only() {
        let h = setup().await;
        let app = &h.app;
        let board = app.boards.create_board("Board", "").await.unwrap();
        let first = app.lists.create_list("First", board.id, None).await.unwrap();
        let second = app.lists.create_list("Second", board.id, None).await.unwrap();
        let doomed = app.cards.create_card("Doomed", first.id, None, "").await.unwrap();
        let kept = app.cards.create_card("Kept", second.id, None, "").await.unwrap();

        app.lists.delete_list(first.id).await.unwrap();

        assert!(app.cards.get_card(doomed.id).await.unwrap().is_none());
        assert!(app.cards.get_card(kept.id).await.unwrap().is_some());

        let lists = app.lists.list_lists_by_board(board.id).await.unwrap();
        assert_eq!(lists.len(), 1);
        assert_eq!(lists[0].position, 1);
    }

    #[tokio::test]
    async fn test_mutators_report_missing_targets() {
        let h = setup().await;
        let app = &h.app;
        let missing = 9_999;

        let board_errors = vec![
            app.boards.update_details(missing, "x", "").await.unwrap_err(),
            app.boards.associate_with_activity(missing, None).await.unwrap_err(),
            app.boards.delete_board(missing).await.unwrap_err(),
        ];
        let list_errors = vec![
            app.lists.create_list("x", missing, None).await.unwrap_err(),
            app.lists.update_name(missing, "x").await.unwrap_err(),
            app.lists.update_position(missing, 1).await.unwrap_err(),
            app.lists.delete_list(missing).await.unwrap_err(),
            app.lists.list_lists_by_board(missing).await.unwrap_err(),
            app.lists.normalize_positions(missing).await.unwrap_err(),
        ];
        let card_errors = vec![
            app.cards.create_card("x", missing, None, "").await.unwrap_err(),
            app.cards.update_content(missing, "x", "").await.unwrap_err(),
            app.cards.move_card(missing, missing, 1).await.unwrap_err(),
            app.cards.update_position(missing, 1).await.unwrap_err(),
            app.cards.assign_to_member(missing, None).await.unwrap_err(),
            app.cards.associate_with_activity(missing, None).await.unwrap_err(),
            app.cards.set_status(missing, CardStatus::Done).await.unwrap_err(),
            app.cards.set_labels(missing, None).await.unwrap_err(),
            app.cards.set_dates(missing, None, None, None).await.unwrap_err(),
            app.cards.set_checklist(missing, None).await.unwrap_err(),
            app.cards.set_attachments(missing, None).await.unwrap_err(),
            app.cards.delete_card(missing).await.unwrap_err(),
            app.cards.list_cards_by_list(missing).await.unwrap_err(),
            app.cards.card_details(missing).await.unwrap_err(),
            app.cards.normalize_positions(missing).await.unwrap_err(),
        ];

        for err in board_errors.iter().chain(&list_errors).chain(&card_errors) {
            assert!(err.is_not_found(), "expected NotFound, got {:?}", err);
        }
    }

    #[tokio::test]
    async fn test_validation_rejects_blank_and_negative() {
        let h = setup().await;
        let app = &h.app;
        let board = app.boards.create_board("Board", "").await.unwrap();
        let list = app.lists.create_list("To Do", board.id, None).await.unwrap();
        let card = app.cards.create_card("Card", list.id, None, "").await.unwrap();

        let errors = vec![
            app.boards.create_board("   ", "").await.unwrap_err(),
            app.boards.update_details(board.id, "", "").await.unwrap_err(),
            app.lists.create_list("", board.id, None).await.unwrap_err(),
            app.lists.create_list("Later", board.id, Some(-1)).await.unwrap_err(),
            app.lists.update_position(list.id, -3).await.unwrap_err(),
            app.cards.create_card("", list.id, None, "").await.unwrap_err(),
            app.cards.update_content(card.id, " ", "").await.unwrap_err(),
            app.cards.move_card(card.id, list.id, -1).await.unwrap_err(),
        ];
        for err in errors {
            assert!(matches!(err, DomainError::InvalidInput(_)), "got {:?}", err);
        }

        // Nothing was written by the rejected calls
        let stored = app.cards.get_card(card.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Card");
        assert_eq!(app.lists.list_lists_by_board(board.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_names_are_trimmed() {
        let h = setup().await;
        let app = &h.app;
        let board = app.boards.create_board("  Gala  ", "").await.unwrap();
        assert_eq!(board.name, "Gala");

        let list = app.lists.create_list("x", board.id, None).await.unwrap();
        let renamed = app.lists.update_name(list.id, " Catering ").await.unwrap();
        assert_eq!(renamed.name, "Catering");
    }

    #[tokio::test]
    async fn test_move_within_board_rejects_foreign_list() {
        let h = setup().await;
        let app = &h.app;
        let home = app.boards.create_board("Home", "").await.unwrap();
        let away = app.boards.create_board("Away", "").await.unwrap();
        let home_list = app.lists.create_list("To Do", home.id, None).await.unwrap();
        let home_done = app.lists.create_list("Done", home.id, None).await.unwrap();
        let away_list = app.lists.create_list("To Do", away.id, None).await.unwrap();
        let card = app.cards.create_card("Tickets", home_list.id, None, "").await.unwrap();

        let err = app
            .cards
            .move_card_within_board(home.id, card.id, away_list.id, 1)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::CrossBoardMove {
                card_id: card.id,
                board_id: home.id,
            }
        );
        assert_eq!(app.cards.get_card(card.id).await.unwrap().unwrap().list_id, home_list.id);

        let moved = app
            .cards
            .move_card_within_board(home.id, card.id, home_done.id, 1)
            .await
            .unwrap();
        assert_eq!(moved.list_id, home_done.id);
    }

    #[tokio::test]
    async fn test_assign_and_associate_check_collaborators() {
        let h = setup().await;
        let app = &h.app;
        h.members
            .insert(Member {
                id: "m-1".to_string(),
                display_name: "Ada".to_string(),
                email: Some("ada@example.com".to_string()),
            })
            .await;
        h.activities
            .insert(Activity {
                id: "act-7".to_string(),
                title: "Load-in".to_string(),
                starts_at: Utc.with_ymd_and_hms(2026, 5, 1, 9, 0, 0).single(),
            })
            .await;

        let board = app.boards.create_board("Board", "").await.unwrap();
        let list = app.lists.create_list("To Do", board.id, None).await.unwrap();
        let card = app.cards.create_card("Truck", list.id, None, "").await.unwrap();

        let err = app.cards.assign_to_member(card.id, Some("nobody")).await.unwrap_err();
        assert!(err.is_not_found());
        let err = app
            .boards
            .associate_with_activity(board.id, Some("act-404"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let assigned = app.cards.assign_to_member(card.id, Some("m-1")).await.unwrap();
        assert_eq!(assigned.member_id.as_deref(), Some("m-1"));
        app.cards
            .associate_with_activity(card.id, Some("act-7"))
            .await
            .unwrap();
        let board = app
            .boards
            .associate_with_activity(board.id, Some("act-7"))
            .await
            .unwrap();
        assert_eq!(board.activity_id.as_deref(), Some("act-7"));

        let details = app.cards.card_details(card.id).await.unwrap();
        assert_eq!(details.assignee.unwrap().display_name, "Ada");
        assert_eq!(details.activity.unwrap().title, "Load-in");

        // A reference the directory has forgotten resolves to nothing
        h.members.remove("m-1").await;
        let details = app.cards.card_details(card.id).await.unwrap();
        assert!(details.assignee.is_none());
        assert_eq!(details.card.member_id.as_deref(), Some("m-1"));

        let cleared = app.cards.assign_to_member(card.id, None).await.unwrap();
        assert!(cleared.member_id.is_none());
    }

    #[tokio::test]
    async fn test_card_metadata_updates() {
        let h = setup().await;
        let app = &h.app;
        let board = app.boards.create_board("Board", "").await.unwrap();
        let list = app.lists.create_list("To Do", board.id, None).await.unwrap();
        let card = app.cards.create_card("Stage", list.id, None, "").await.unwrap();
        assert_eq!(card.status, CardStatus::Todo);

        // Any transition is allowed, including backwards
        app.cards.set_status(card.id, CardStatus::Done).await.unwrap();
        let card = app.cards.set_status(card.id, CardStatus::Todo).await.unwrap();
        assert_eq!(card.status, CardStatus::Todo);

        let labelled = app
            .cards
            .set_labels(
                card.id,
                Some(vec![
                    " urgent ".to_string(),
                    "urgent".to_string(),
                    "".to_string(),
                    "av".to_string(),
                ]),
            )
            .await
            .unwrap();
        assert_eq!(labelled.labels, Some(vec!["urgent".to_string(), "av".to_string()]));

        let start = Utc.with_ymd_and_hms(2026, 4, 1, 8, 0, 0).single();
        let due = Utc.with_ymd_and_hms(2026, 4, 3, 18, 0, 0).single();
        let dated = app.cards.set_dates(card.id, start, due, None).await.unwrap();
        assert_eq!(dated.dates.start_at, start);
        assert_eq!(dated.dates.due_at, due);
        assert!(dated.dates.reminder_at.is_none());

        let checklist = serde_json::json!([{"text": "rig lights", "done": true}]);
        let attachments = serde_json::json!([{"name": "plot.pdf", "url": "files/plot.pdf"}]);
        app.cards
            .set_checklist(card.id, Some(checklist.clone()))
            .await
            .unwrap();
        app.cards
            .set_attachments(card.id, Some(attachments.clone()))
            .await
            .unwrap();

        let stored = app.cards.get_card(card.id).await.unwrap().unwrap();
        assert_eq!(stored.checklist, Some(checklist));
        assert_eq!(stored.attachments, Some(attachments));
        assert_eq!(stored.labels, labelled.labels);
        assert_eq!(stored.position, 1);
        assert_eq!(stored.list_id, list.id);
    }

    #[tokio::test]
    async fn test_list_boards_paged() {
        let h = setup().await;
        let app = &h.app;
        for n in 0..5 {
            app.boards
                .create_board(&format!("Concert {}", n), "")
                .await
                .unwrap();
        }
        app.boards.create_board("Gala", "").await.unwrap();

        let first = app.boards.list_boards_paged(0, Some(2), None).await.unwrap();
        assert_eq!(first.page, 1);
        assert_eq!(first.page_size, 2);
        assert_eq!(first.total, 6);
        assert_eq!(first.boards[0].name, "Gala");

        let filtered = app
            .boards
            .list_boards_paged(2, Some(2), Some("concert"))
            .await
            .unwrap();
        assert_eq!(filtered.total, 5);
        assert_eq!(filtered.boards.len(), 2);

        let defaulted = app.boards.list_boards_paged(1, None, None).await.unwrap();
        assert_eq!(defaulted.page_size, 20);
        assert_eq!(defaulted.boards.len(), 6);

        let capped = app.boards.list_boards_paged(1, Some(10_000), None).await.unwrap();
        assert_eq!(capped.page_size, 100);

        let err = app.boards.list_boards_paged(1, Some(0), None).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));

        let beyond = app.boards.list_boards_paged(9, Some(2), None).await.unwrap();
        assert!(beyond.boards.is_empty());
        assert_eq!(beyond.total, 6);
    }

    #[tokio::test]
    async fn test_hierarchy_read_is_ordered() {
        let h = setup().await;
        let app = &h.app;
        let board = app.boards.create_board("Board", "").await.unwrap();
        let later = app.lists.create_list("Later", board.id, None).await.unwrap();
        let now = app.lists.create_list("Now", board.id, Some(1)).await.unwrap();
        app.cards.create_card("second", now.id, None, "").await.unwrap();
        app.cards.create_card("first", now.id, Some(1), "").await.unwrap();

        let lists = app.lists.list_lists_with_cards_by_board(board.id).await.unwrap();
        let names: Vec<&str> = lists.iter().map(|l| l.list.name.as_str()).collect();
        assert_eq!(names, vec!["Now", "Later"]);
        let cards: Vec<&str> = lists[0].cards.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(cards, vec!["first", "second"]);
        assert!(lists[1].cards.is_empty());
        assert_eq!(lists[1].list.id, later.id);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_moves_keep_lists_dense() {
        let app = Arc::new(setup().await.app);
        let board = app.boards.create_board("Board", "").await.unwrap();
        let left = app.lists.create_list("Left", board.id, None).await.unwrap();
        let right = app.lists.create_list("Right", board.id, None).await.unwrap();

        let mut cards = Vec::new();
        for n in 0..10 {
            let list_id = if n % 2 == 0 { left.id } else { right.id };
            let card = app
                .cards
                .create_card(&format!("Card {}", n), list_id, None, "")
                .await
                .unwrap();
            cards.push(card);
        }

        let mut handles = Vec::new();
        for (n, card) in cards.into_iter().enumerate() {
            let app = Arc::clone(&app);
            let target = if card.list_id == left.id { right.id } else { left.id };
            handles.push(tokio::spawn(async move {
                let position = (n % 3) as i32 + 1;
                app.cards.move_card(card.id, target, position).await.map(|_| ())
            }));
        }
        for n in 0..10 {
            let app = Arc::clone(&app);
            let list_id = if n % 2 == 0 { left.id } else { right.id };
            handles.push(tokio::spawn(async move {
                let title = format!("New {}", n);
                app.cards.create_card(&title, list_id, Some(1), "").await.map(|_| ())
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let mut total = 0;
        for list_id in [left.id, right.id] {
            let positions: Vec<i32> = app
                .cards
                .list_cards_by_list(list_id)
                .await
                .unwrap()
                .into_iter()
                .map(|c| c.position)
                .collect();
            assert!(
                PositionAllocator::is_dense(&positions),
                "list {}: {:?}",
                list_id,
                positions
            );
            total += positions.len();
        }
        assert_eq!(total, 20);
    }

    #[tokio::test]
    async fn test_open_with_log_dir_writes_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = BoardConfig {
            log_dir: Some(dir.path().to_path_buf()),
            app_name: "BoardTest".to_string(),
            ..BoardConfig::default()
        };
        let app = AppState::open(
            config,
            Arc::new(InMemoryMemberDirectory::new()),
            Arc::new(InMemoryActivityCatalog::new()),
        )
        .await
        .unwrap();
        app.boards.create_board("Logged", "").await.unwrap();

        let content = std::fs::read_to_string(dir.path().join("BoardTest.log")).unwrap();
        assert!(content.contains("database ready"), "{}", content);
        assert!(content.contains("created board"), "{}", content);
        assert!(!rolling_logger::recent_lines().is_empty());
    }
}
