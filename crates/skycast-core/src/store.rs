// ── City collection store ──
//
// Owns the live, ordered list of tracked cities. Names are unique. Every
// favorite toggle rewrites the persisted snapshot before returning.

use tracing::{debug, info};

use crate::error::FavoritesError;
use crate::favorites::FavoritesStore;
use crate::model::City;

/// Result of [`CityStore::add_city`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    /// A city with the same name is already tracked; nothing changed.
    AlreadyPresent,
}

/// Ordered, name-deduplicated collection of cities.
#[derive(Debug)]
pub struct CityStore {
    cities: Vec<City>,
    favorites: FavoritesStore,
}

impl CityStore {
    /// Empty store writing favorites through `favorites`.
    pub fn new(favorites: FavoritesStore) -> Self {
        Self {
            cities: Vec::new(),
            favorites,
        }
    }

    /// Store seeded from the persisted snapshot.
    pub fn hydrate(favorites: FavoritesStore) -> Self {
        let snapshot = favorites.load();
        info!(favorites = snapshot.len(), "restoring favorite cities");
        let cities = Self::reconcile_with_persisted(Vec::new(), snapshot);
        Self { cities, favorites }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&City> {
        self.cities.iter().find(|c| c.name == name)
    }

    pub fn favorites(&self) -> impl Iterator<Item = &City> {
        self.cities.iter().filter(|c| c.is_favorite)
    }

    /// All cities, or only favorites, in collection order.
    pub fn filtered_view(&self, favorites_only: bool) -> Vec<&City> {
        self.cities
            .iter()
            .filter(|c| !favorites_only || c.is_favorite)
            .collect()
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Append `city` unless one with the same name is already tracked.
    pub fn add_city(&mut self, city: City) -> AddOutcome {
        if self.get(&city.name).is_some() {
            debug!(city = %city.name, "city already tracked");
            return AddOutcome::AlreadyPresent;
        }
        debug!(city = %city.name, "city added");
        self.cities.push(city);
        AddOutcome::Added
    }

    /// Flip the favorite flag of `name` and rewrite the snapshot.
    ///
    /// Returns the new flag, or `None` if no city has that name. The snapshot
    /// is rewritten in either case. A failed write leaves the in-memory flip
    /// in place and is reported as the error.
    pub fn toggle_favorite(&mut self, name: &str) -> Result<Option<bool>, FavoritesError> {
        let flipped = self.cities.iter_mut().find(|c| c.name == name).map(|c| {
            c.is_favorite = !c.is_favorite;
            c.is_favorite
        });
        self.favorites.save(&self.cities)?;
        Ok(flipped)
    }

    /// Pure merge of `snapshot` into `current`.
    ///
    /// Known names are marked favorite in place, other fields untouched.
    /// Unknown names are appended as favorites with their stored forecast.
    /// Applying the same snapshot twice is a no-op.
    pub fn reconcile_with_persisted(current: Vec<City>, snapshot: Vec<City>) -> Vec<City> {
        snapshot.into_iter().fold(current, |mut cities, persisted| {
            match cities.iter_mut().find(|c| c.name == persisted.name) {
                Some(existing) => existing.is_favorite = true,
                None => cities.push(City {
                    is_favorite: true,
                    ..persisted
                }),
            }
            cities
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::favorites::MemoryBackend;
    use crate::model::{ForecastDay, IconRef};

    fn icon(code: &str) -> IconRef {
        IconRef::from_code("https://openweathermap.org/img/wn/{icon}@2x.png", code)
    }

    fn city(name: &str, temperature: i32) -> City {
        City {
            name: name.to_owned(),
            temperature_celsius: temperature,
            condition: "Clear".into(),
            is_favorite: false,
            icon: icon("01d"),
            forecast: None,
        }
    }

    fn store_with(backend: &MemoryBackend) -> CityStore {
        CityStore::new(FavoritesStore::new(backend.clone()))
    }

    fn names(cities: &[&City]) -> Vec<String> {
        cities.iter().map(|c| c.name.clone()).collect()
    }

    #[test]
    fn duplicate_add_keeps_first_entry() {
        let mut store = CityStore::new(FavoritesStore::in_memory());

        assert_eq!(store.add_city(city("Paris", 18)), AddOutcome::Added);
        assert_eq!(store.add_city(city("Paris", 25)), AddOutcome::AlreadyPresent);

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("Paris").unwrap().temperature_celsius, 18);
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut store = CityStore::new(FavoritesStore::in_memory());

        store.add_city(city("paris", 18));
        store.add_city(city("Paris", 18));

        assert_eq!(store.len(), 2);
    }

    #[test]
    fn toggle_returns_new_flag_and_persists() {
        let backend = MemoryBackend::new();
        let mut store = store_with(&backend);
        store.add_city(city("Oslo", 4));
        store.add_city(city("Rome", 24));

        assert_eq!(store.toggle_favorite("Rome").unwrap(), Some(true));

        let persisted = FavoritesStore::new(backend.clone()).load();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0].name, "Rome");
        assert!(persisted[0].is_favorite);
    }

    #[test]
    fn toggle_unknown_name_still_rewrites_snapshot() {
        let backend = MemoryBackend::new();
        let mut store = store_with(&backend);

        assert_eq!(store.toggle_favorite("Atlantis").unwrap(), None);
        assert!(backend.contents().is_some());
    }

    #[test]
    fn double_toggle_restores_snapshot() {
        let backend = MemoryBackend::new();
        let mut store = store_with(&backend);
        store.add_city(city("Oslo", 4));
        store.add_city(city("Rome", 24));
        store.toggle_favorite("Oslo").unwrap();
        let before = backend.contents().unwrap();

        store.toggle_favorite("Rome").unwrap();
        store.toggle_favorite("Rome").unwrap();

        assert_eq!(backend.contents().unwrap(), before);
        assert!(!store.get("Rome").unwrap().is_favorite);
    }

    #[test]
    fn filtered_view_preserves_order() {
        let mut store = CityStore::new(FavoritesStore::in_memory());
        for name in ["A", "B", "C", "D"] {
            store.add_city(city(name, 10));
        }
        store.toggle_favorite("D").unwrap();
        store.toggle_favorite("B").unwrap();

        assert_eq!(names(&store.filtered_view(false)), ["A", "B", "C", "D"]);
        assert_eq!(names(&store.filtered_view(true)), ["B", "D"]);
        assert_eq!(store.favorites().count(), 2);
    }

    #[test]
    fn reconcile_marks_known_and_appends_unknown() {
        let live = vec![city("Paris", 18), city("Oslo", 4)];
        let mut stored_oslo = city("Oslo", -10);
        stored_oslo.is_favorite = true;
        let mut stored_lima = city("Lima", 17);
        stored_lima.is_favorite = true;
        stored_lima.forecast = Some(vec![ForecastDay {
            source_timestamp: "2024-06-16 00:00:00".into(),
            temperature_celsius: 15,
            condition: "Mist".into(),
            icon: icon("50n"),
        }]);

        let merged =
            CityStore::reconcile_with_persisted(live, vec![stored_oslo, stored_lima.clone()]);

        assert_eq!(merged.len(), 3);
        assert!(!merged[0].is_favorite);
        assert!(merged[1].is_favorite);
        // Known city keeps its live data.
        assert_eq!(merged[1].temperature_celsius, 4);
        assert_eq!(merged[2], stored_lima);
    }

    #[test]
    fn reconcile_forces_favorite_on_appended_records() {
        let stored = city("Kyiv", 12);
        let merged = CityStore::reconcile_with_persisted(Vec::new(), vec![stored]);
        assert!(merged[0].is_favorite);
    }

    #[test]
    fn reconcile_is_idempotent() {
        let mut a = city("Oslo", 4);
        a.is_favorite = true;
        let mut b = city("Lima", 17);
        b.is_favorite = true;
        let snapshot = vec![a, b];
        let live = vec![city("Paris", 18), city("Oslo", 4)];

        let once = CityStore::reconcile_with_persisted(live, snapshot.clone());
        let twice = CityStore::reconcile_with_persisted(once.clone(), snapshot);

        assert_eq!(once, twice);
    }

    #[test]
    fn hydrate_restores_snapshot() {
        let backend = MemoryBackend::new();
        {
            let mut store = store_with(&backend);
            store.add_city(city("Tokyo", 21));
            store.toggle_favorite("Tokyo").unwrap();
        }

        let mut reloaded = CityStore::hydrate(FavoritesStore::new(backend));

        assert_eq!(reloaded.len(), 1);
        assert!(reloaded.get("Tokyo").unwrap().is_favorite);
        assert_eq!(reloaded.add_city(city("Tokyo", 30)), AddOutcome::AlreadyPresent);
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn hydrate_with_corrupt_snapshot_starts_empty() {
        let store = CityStore::hydrate(FavoritesStore::new(MemoryBackend::with_contents("][")));
        assert!(store.is_empty());
    }

    #[test]
    fn failed_save_keeps_in_memory_toggle() {
        struct ReadOnly;
        impl crate::favorites::FavoritesBackend for ReadOnly {
            fn read(&self) -> std::io::Result<Option<Vec<u8>>> {
                Ok(None)
            }
            fn write(&self, _: &[u8]) -> std::io::Result<()> {
                Err(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "read-only",
                ))
            }
        }

        let mut store = CityStore::new(FavoritesStore::new(ReadOnly));
        store.add_city(city("Oslo", 4));

        assert!(matches!(
            store.toggle_favorite("Oslo"),
            Err(FavoritesError::Io(_))
        ));
        assert!(store.get("Oslo").unwrap().is_favorite);
    }
}
