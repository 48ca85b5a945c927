mod common;

use common::{for_each_store, row_count, FlakyStore};
use pressdesk_core::db::open_db;
use pressdesk_core::{
    Author, EntityId, EntityKind, Lifecycle, Magazine, PublishingError, PublishingService,
    ReferenceError, RepoError, SqliteStore, ValidationError,
};

#[test]
fn create_author_round_trips_name() {
    for_each_store(|backend, service| {
        for name in ["J", "Jane Smith", "Zoë Ångström"] {
            let author = service.create_author(name).unwrap();
            assert_eq!(author.name(), name, "{backend}");
            assert!(author.lifecycle().is_persisted(), "{backend}");

            let loaded = service.load_author(author.id().unwrap()).unwrap();
            assert_eq!(loaded, author, "{backend}");
        }
    });
}

#[test]
fn create_author_rejects_empty_name_without_persisting() {
    for_each_store(|backend, service| {
        let err = service.create_author("").unwrap_err();
        assert!(
            matches!(err, PublishingError::Validation(ValidationError::EmptyAuthorName)),
            "{backend}: {err}"
        );
        assert_eq!(row_count(*service.store(), EntityKind::Author), 0, "{backend}");
    });
}

#[test]
fn load_missing_entities_returns_not_found() {
    for_each_store(|backend, service| {
        let id = EntityId::new(77).unwrap();
        let err = service.load_author(id).unwrap_err();
        assert!(
            matches!(err, PublishingError::NotFound { kind: EntityKind::Author, id: missing } if missing == id),
            "{backend}: {err}"
        );
        assert!(matches!(
            service.load_magazine(id),
            Err(PublishingError::NotFound { kind: EntityKind::Magazine, .. })
        ));
        assert!(matches!(
            service.load_article(id),
            Err(PublishingError::NotFound { kind: EntityKind::Article, .. })
        ));
    });
}

#[test]
fn create_magazine_round_trips_fields() {
    for_each_store(|backend, service| {
        for (name, category) in [
            ("Tech Weekly", "Technology"),
            ("ab", "x"),
            ("Sixteen chars ok", "Art"),
        ] {
            let magazine = service.create_magazine(name, category).unwrap();
            let loaded = service.load_magazine(magazine.id().unwrap()).unwrap();
            assert_eq!(loaded.name(), name, "{backend}");
            assert_eq!(loaded.category(), category, "{backend}");
        }
    });
}

#[test]
fn invalid_magazines_are_rejected_and_not_persisted() {
    for_each_store(|backend, service| {
        let too_long = "x".repeat(37);
        for (name, category) in [
            ("", "Technology"),
            ("A", "Technology"),
            (too_long.as_str(), "Technology"),
            ("Tech Weekly", ""),
        ] {
            let err = service.create_magazine(name, category).unwrap_err();
            assert!(
                matches!(err, PublishingError::Validation(_)),
                "{backend}: {name:?}/{category:?} gave {err}"
            );
        }
        assert_eq!(row_count(*service.store(), EntityKind::Magazine), 0, "{backend}");
    });
}

#[test]
fn magazine_mutation_writes_through_and_keeps_old_value_on_error() {
    for_each_store(|backend, service| {
        let mut magazine = service.create_magazine("Techie", "Technology").unwrap();
        let id = magazine.id().unwrap();

        service.set_magazine_name(&mut magazine, "Gadget Digest").unwrap();
        service.set_magazine_category(&mut magazine, "Hardware").unwrap();
        assert_eq!(magazine.lifecycle(), Lifecycle::Persisted(id), "{backend}");

        let err = service.set_magazine_name(&mut magazine, "G").unwrap_err();
        assert!(matches!(err, PublishingError::Validation(_)), "{backend}");
        let err = service.set_magazine_category(&mut magazine, "").unwrap_err();
        assert!(matches!(err, PublishingError::Validation(_)), "{backend}");

        assert_eq!(magazine.name(), "Gadget Digest", "{backend}");
        let loaded = service.load_magazine(id).unwrap();
        assert_eq!(loaded.name(), "Gadget Digest", "{backend}");
        assert_eq!(loaded.category(), "Hardware", "{backend}");
    });
}

#[test]
fn mutations_from_separate_handles_do_not_revert_each_other() {
    for_each_store(|backend, service| {
        let created = service.create_magazine("Techie", "Technology").unwrap();
        let id = created.id().unwrap();
        let mut first = service.load_magazine(id).unwrap();
        let mut second = service.load_magazine(id).unwrap();

        service.set_magazine_category(&mut first, "Hardware").unwrap();
        service.set_magazine_name(&mut second, "Gadgets").unwrap();

        let stored = service.load_magazine(id).unwrap();
        assert_eq!(stored.name(), "Gadgets", "{backend}");
        assert_eq!(stored.category(), "Hardware", "{backend}");
    });
}

#[test]
fn pending_magazine_mutation_stays_in_memory() {
    for_each_store(|backend, service| {
        let mut magazine = Magazine::new("Techie", "Technology").unwrap();
        service.set_magazine_name(&mut magazine, "Draft Zine").unwrap();
        assert_eq!(magazine.name(), "Draft Zine", "{backend}");
        assert_eq!(row_count(*service.store(), EntityKind::Magazine), 0, "{backend}");
    });
}

#[test]
fn create_article_links_persisted_entities() {
    for_each_store(|backend, service| {
        let author = service.create_author("Jane Smith").unwrap();
        let magazine = service.create_magazine("Tech Weekly", "Technology").unwrap();

        let article = service.create_article(&author, &magazine, "Test Title").unwrap();
        assert_eq!(article.title(), "Test Title", "{backend}");
        assert_eq!(article.author_id(), author.id().unwrap(), "{backend}");
        assert_eq!(article.magazine_id(), magazine.id().unwrap(), "{backend}");

        let loaded = service.load_article(article.id().unwrap()).unwrap();
        assert_eq!(loaded, article, "{backend}");
        assert_eq!(service.article_author(&loaded).unwrap(), author, "{backend}");
        assert_eq!(service.article_magazine(&loaded).unwrap(), magazine, "{backend}");
    });
}

#[test]
fn invalid_article_title_leaves_no_rows() {
    for_each_store(|backend, service| {
        let author = service.create_author("Jane Smith").unwrap();
        let magazine = service.create_magazine("Tech Weekly", "Technology").unwrap();

        for title in [String::new(), "Tiny".to_string(), "y".repeat(51)] {
            let err = service.create_article(&author, &magazine, title).unwrap_err();
            assert!(matches!(err, PublishingError::Validation(_)), "{backend}: {err}");
        }
        assert_eq!(row_count(*service.store(), EntityKind::Article), 0, "{backend}");
    });
}

#[test]
fn article_title_is_checked_before_references() {
    for_each_store(|backend, service| {
        let pending_author = Author::new("Ghost Writer").unwrap();
        let magazine = service.create_magazine("Tech Weekly", "Technology").unwrap();
        let err = service
            .create_article(&pending_author, &magazine, "Bad")
            .unwrap_err();
        assert!(matches!(err, PublishingError::Validation(_)), "{backend}");
    });
}

#[test]
fn create_article_rejects_unresolvable_references() {
    for_each_store(|backend, service| {
        let author = service.create_author("Jane Smith").unwrap();
        let magazine = service.create_magazine("Tech Weekly", "Technology").unwrap();

        let pending_author = Author::new("Ghost Writer").unwrap();
        let err = service
            .create_article(&pending_author, &magazine, "Ghost Story")
            .unwrap_err();
        assert!(
            matches!(err, PublishingError::Reference(ReferenceError::Unpersisted(EntityKind::Author))),
            "{backend}: {err}"
        );

        let pending_magazine = Magazine::new("Draft Zine", "Drafts").unwrap();
        let err = service
            .create_article(&author, &pending_magazine, "Draft Story")
            .unwrap_err();
        assert!(
            matches!(err, PublishingError::Reference(ReferenceError::Unpersisted(EntityKind::Magazine))),
            "{backend}: {err}"
        );

        let stranger = Author::with_id(EntityId::new(500).unwrap(), "Stranger").unwrap();
        let err = service
            .create_article(&stranger, &magazine, "Who Wrote This")
            .unwrap_err();
        assert!(
            matches!(err, PublishingError::Reference(ReferenceError::Missing { kind: EntityKind::Author, .. })),
            "{backend}: {err}"
        );

        assert_eq!(row_count(*service.store(), EntityKind::Article), 0, "{backend}");
    });
}

#[test]
fn list_operations_keep_insertion_order() {
    for_each_store(|backend, service| {
        let names = ["Alice Smith", "Bob Johnson", "Charlie Brown"];
        for name in names {
            service.create_author(name).unwrap();
        }
        service.create_magazine("Techie", "Technology").unwrap();
        service.create_magazine("Garden Life", "Home").unwrap();

        let authors: Vec<String> = service
            .list_authors()
            .unwrap()
            .iter()
            .map(|author| author.name().to_string())
            .collect();
        assert_eq!(authors, names, "{backend}");

        let magazines: Vec<String> = service
            .list_magazines()
            .unwrap()
            .iter()
            .map(|magazine| magazine.name().to_string())
            .collect();
        assert_eq!(magazines, ["Techie", "Garden Life"], "{backend}");
    });
}

#[test]
fn failed_insert_surfaces_persistence_error() {
    let store = FlakyStore::default();
    let service = PublishingService::new(&store);
    store.fail_inserts.set(true);

    let err = service.create_author("Jane Smith").unwrap_err();
    assert!(matches!(err, PublishingError::Persistence(RepoError::Backend(_))));
    assert_eq!(err.code(), "persistence_failed");
    assert!(store.inner.is_empty(EntityKind::Author));
}

#[test]
fn failed_update_leaves_magazine_unchanged() {
    let store = FlakyStore::default();
    let service = PublishingService::new(&store);
    let mut magazine = service.create_magazine("Techie", "Technology").unwrap();

    store.fail_updates.set(true);
    let err = service
        .set_magazine_name(&mut magazine, "Gadget Digest")
        .unwrap_err();

    assert!(matches!(err, PublishingError::Persistence(_)));
    assert_eq!(magazine.name(), "Techie");
    let loaded = service.load_magazine(magazine.id().unwrap()).unwrap();
    assert_eq!(loaded.name(), "Techie");
}

#[test]
fn entities_survive_reopening_a_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pressdesk.db");

    let (author_id, magazine_id) = {
        let conn = open_db(&path).unwrap();
        let service = PublishingService::new(SqliteStore::try_new(&conn).unwrap());
        let author = service.create_author("Alice Smith").unwrap();
        let magazine = service.create_magazine("Techie", "Technology").unwrap();
        service
            .create_article(&author, &magazine, "Latest Tech Trends")
            .unwrap();
        (author.id().unwrap(), magazine.id().unwrap())
    };

    let conn = open_db(&path).unwrap();
    let service = PublishingService::new(SqliteStore::try_new(&conn).unwrap());
    let author = service.load_author(author_id).unwrap();
    let magazine = service.load_magazine(magazine_id).unwrap();
    assert_eq!(author.name(), "Alice Smith");
    let titles = service.article_titles(&magazine).unwrap();
    assert_eq!(titles.items(), ["Latest Tech Trends".to_string()]);
}
