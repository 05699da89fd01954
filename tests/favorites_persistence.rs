use crux_core::testing::AppTester;
use crux_core::Request;
use crux_http::protocol::{HttpRequest, HttpResponse, HttpResult};
use crux_kv::KeyValueOperation;

use catwalk_shared::{
    App, Breed, Effect, Event, FavoritesStore, Model, Photo, FAVORITES_STORE_KEY,
};

fn photo(id: &str) -> Photo {
    Photo {
        id: id.into(),
        url: format!("https://cdn.example/{id}.jpg"),
        width: 800,
        height: 600,
    }
}

/// Pull the single key-value write out of an effect list.
fn written_store(effects: Vec<Effect>) -> (String, Vec<u8>) {
    effects
        .into_iter()
        .find_map(|effect| match effect {
            Effect::KeyValue(request) => match request.operation {
                KeyValueOperation::Set { key, value } => Some((key, value)),
                _ => None,
            },
            _ => None,
        })
        .expect("a key-value write")
}

/// Boot with one breed and a gallery of the given photos.
fn boot_with_photos(app: &AppTester<App, Effect>, model: &mut Model, photos: &[Photo]) {
    let breeds = vec![Breed {
        id: "abys".into(),
        name: "Abyssinian".into(),
        description: None,
        origin: Some("Egypt".into()),
        temperament: None,
    }];

    let update = app.update(Event::AppStarted, model);
    let mut breeds_request: Vec<Request<HttpRequest>> = update
        .effects
        .into_iter()
        .filter_map(|e| match e {
            Effect::Http(request) => Some(request),
            _ => None,
        })
        .collect();
    let response = HttpResponse::ok()
        .body(serde_json::to_vec(&breeds).unwrap())
        .build();
    let update = app
        .resolve(&mut breeds_request[0], HttpResult::Ok(response))
        .expect("breed list resolves");
    for event in update.events {
        app.update(event, model);
    }

    let update = app.update(
        Event::BreedSelected {
            breed_id: "abys".into(),
        },
        model,
    );
    let mut photo_request: Vec<Request<HttpRequest>> = update
        .effects
        .into_iter()
        .filter_map(|e| match e {
            Effect::Http(request) => Some(request),
            _ => None,
        })
        .collect();
    let response = HttpResponse::ok()
        .body(serde_json::to_vec(photos).unwrap())
        .build();
    let update = app
        .resolve(&mut photo_request[0], HttpResult::Ok(response))
        .expect("photo search resolves");
    for event in update.events {
        app.update(event, model);
    }
}

#[test]
fn startup_reads_the_favorites_key() {
    let app = AppTester::<App, _>::default();
    let mut model = Model::default();

    let update = app.update(Event::AppStarted, &mut model);

    let read_key = update
        .effects
        .into_iter()
        .find_map(|effect| match effect {
            Effect::KeyValue(request) => match request.operation {
                KeyValueOperation::Get { key } => Some(key),
                _ => None,
            },
            _ => None,
        })
        .expect("a key-value read");
    assert_eq!(read_key, FAVORITES_STORE_KEY);
}

#[test]
fn toggling_a_favorite_rewrites_the_whole_mapping() {
    let app = AppTester::<App, _>::default();
    let mut model = Model::default();
    boot_with_photos(&app, &mut model, &[photo("p1"), photo("p2")]);

    let update = app.update(
        Event::FavoriteToggled {
            photo_id: "p1".into(),
        },
        &mut model,
    );

    let (key, bytes) = written_store(update.effects);
    assert_eq!(key, FAVORITES_STORE_KEY);

    let store = FavoritesStore::from_bytes(&bytes).unwrap();
    assert_eq!(store.len(), 1);
    assert!(store.contains("p1"));
    assert_eq!(store.get("p1").unwrap().width, 800);
}

#[test]
fn persisted_favorites_survive_a_simulated_reload() {
    let app = AppTester::<App, _>::default();
    let mut model = Model::default();
    boot_with_photos(
        &app,
        &mut model,
        &[Photo {
            id: "x".into(),
            url: "u".into(),
            width: 1,
            height: 1,
        }],
    );

    let update = app.update(
        Event::FavoriteToggled {
            photo_id: "x".into(),
        },
        &mut model,
    );
    let (_, bytes) = written_store(update.effects);

    // Fresh session: the shell hands the persisted bytes back at startup.
    let mut reloaded = Model::default();
    app.update(
        Event::FavoritesLoaded(Box::new(Ok(Some(bytes)))),
        &mut reloaded,
    );

    assert_eq!(reloaded.favorites.len(), 1);
    let entry = reloaded.favorites.get("x").expect("the persisted favorite");
    assert_eq!(entry.url, "u");
    assert_eq!((entry.width, entry.height), (1, 1));
}

#[test]
fn toggling_twice_persists_an_empty_mapping() {
    let app = AppTester::<App, _>::default();
    let mut model = Model::default();
    boot_with_photos(&app, &mut model, &[photo("p1")]);

    app.update(
        Event::FavoriteToggled {
            photo_id: "p1".into(),
        },
        &mut model,
    );
    let update = app.update(
        Event::FavoriteToggled {
            photo_id: "p1".into(),
        },
        &mut model,
    );

    let (_, bytes) = written_store(update.effects);
    let store = FavoritesStore::from_bytes(&bytes).unwrap();
    assert!(store.is_empty());
    assert!(model.favorites.is_empty());
}

#[test]
fn favorites_can_be_toggled_from_the_favorites_view() {
    let app = AppTester::<App, _>::default();
    let mut model = Model::default();

    // Restore a favorite from a prior session; the photo is not in any
    // gallery, favorites is the only place it exists.
    let mut prior = FavoritesStore::new();
    prior.toggle(photo("old"));
    app.update(
        Event::FavoritesLoaded(Box::new(Ok(Some(prior.to_bytes().unwrap())))),
        &mut model,
    );
    app.update(Event::FavoritesViewToggled, &mut model);
    assert_eq!(model.favorites.len(), 1);

    let update = app.update(
        Event::FavoriteToggled {
            photo_id: "old".into(),
        },
        &mut model,
    );

    let (_, bytes) = written_store(update.effects);
    assert!(FavoritesStore::from_bytes(&bytes).unwrap().is_empty());
}

#[test]
fn missing_persisted_data_is_a_no_op() {
    let app = AppTester::<App, _>::default();
    let mut model = Model::default();

    app.update(Event::FavoritesLoaded(Box::new(Ok(None))), &mut model);

    assert!(model.favorites.is_empty());
}

#[test]
fn corrupt_persisted_data_starts_empty_instead_of_crashing() {
    let app = AppTester::<App, _>::default();
    let mut model = Model::default();

    app.update(
        Event::FavoritesLoaded(Box::new(Ok(Some(b"{ not json".to_vec())))),
        &mut model,
    );
    assert!(model.favorites.is_empty());

    // The store still works afterwards.
    boot_with_photos(&app, &mut model, &[photo("p1")]);
    let update = app.update(
        Event::FavoriteToggled {
            photo_id: "p1".into(),
        },
        &mut model,
    );
    let (_, bytes) = written_store(update.effects);
    assert!(FavoritesStore::from_bytes(&bytes).unwrap().contains("p1"));
}

#[test]
fn toggle_for_an_unseen_photo_is_ignored() {
    let app = AppTester::<App, _>::default();
    let mut model = Model::default();
    boot_with_photos(&app, &mut model, &[photo("p1")]);

    let update = app.update(
        Event::FavoriteToggled {
            photo_id: "ghost".into(),
        },
        &mut model,
    );

    assert!(update.effects.is_empty());
    assert!(model.favorites.is_empty());
}
