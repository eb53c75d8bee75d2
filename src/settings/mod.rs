//! User preferences, localization and currency formatting.
//!
//! Preferences are loaded once after authentication resolves and written
//! through to the backing store on every change. Localization and
//! currency formatting are pure and synchronous so callers can use them
//! while rendering without touching the network.

use std::str::FromStr;
use std::sync::{
    Arc, RwLock,
    atomic::{AtomicBool, Ordering},
};

use serde::{Deserialize, Serialize};

use crate::{Error, UserId, models::UnknownVariant};

mod currency;
mod localization;
mod store;

pub use currency::format_currency;
pub use localization::translate;
pub use store::{LocalPreferenceStore, PreferenceStore, SqlitePreferenceStore};

/// The visual theme of the application.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// The light theme.
    #[default]
    Light,
    /// The dark theme.
    Dark,
}

impl Theme {
    /// The lowercase string stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl FromStr for Theme {
    type Err = UnknownVariant;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(UnknownVariant(other.to_owned())),
        }
    }
}

/// The language of the application interface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Language {
    /// English, also the fallback for missing translations.
    #[default]
    #[serde(rename = "en")]
    En,
    /// Ukrainian.
    #[serde(rename = "uk")]
    Uk,
}

impl Language {
    /// The two-letter language tag stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Uk => "uk",
        }
    }
}

impl FromStr for Language {
    type Err = UnknownVariant;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "en" => Ok(Language::En),
            "uk" => Ok(Language::Uk),
            other => Err(UnknownVariant(other.to_owned())),
        }
    }
}

/// The currency all financial figures are displayed in.
///
/// This is a display preference only; account balances keep their own
/// currency codes and no conversion is performed anywhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    /// United States dollar.
    #[default]
    #[serde(rename = "USD")]
    Usd,
    /// Euro.
    #[serde(rename = "EUR")]
    Eur,
    /// Ukrainian hryvnia.
    #[serde(rename = "UAH")]
    Uah,
}

impl Currency {
    /// The ISO 4217 code stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Uah => "UAH",
        }
    }

    /// The currency symbol used when formatting amounts.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Uah => "₴",
        }
    }
}

impl FromStr for Currency {
    type Err = UnknownVariant;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "UAH" => Ok(Currency::Uah),
            other => Err(UnknownVariant(other.to_owned())),
        }
    }
}

/// The full set of user preferences, one row per user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// The visual theme.
    pub theme: Theme,
    /// The interface language.
    pub language: Language,
    /// The display currency.
    pub currency: Currency,
}

/// Holds the active preferences and exposes localization and currency
/// formatting bound to them.
///
/// Changes are written through to the backing [PreferenceStore] before
/// the in-memory copy is replaced, so the served preferences never run
/// ahead of what a restart would load back.
#[derive(Clone)]
pub struct SettingsService {
    store: Arc<dyn PreferenceStore>,
    preferences: Arc<RwLock<Preferences>>,
    loaded: Arc<AtomicBool>,
}

impl SettingsService {
    /// Create a service with default preferences, backed by `store`.
    ///
    /// The service reports [SettingsService::is_loaded] as `false` until
    /// [SettingsService::load] succeeds, so dependent surfaces can gate on
    /// it.
    pub fn new(store: impl PreferenceStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
            preferences: Arc::new(RwLock::new(Preferences::default())),
            loaded: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Load `user`'s persisted preferences, replacing the in-memory copy.
    ///
    /// A user with no stored row keeps the defaults. Call this once after
    /// authentication resolves and before rendering dependent UI.
    pub fn load(&self, user: UserId) -> Result<(), Error> {
        if let Some(stored) = self.store.load(user)? {
            *self.preferences.write().unwrap() = stored;
        }
        self.loaded.store(true, Ordering::SeqCst);

        Ok(())
    }

    /// Whether a load has completed since the service was created.
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::SeqCst)
    }

    /// A copy of the active preferences.
    pub fn preferences(&self) -> Preferences {
        *self.preferences.read().unwrap()
    }

    /// Replace all preferences for `user` and persist them.
    ///
    /// The in-memory copy only changes once the save succeeds, so a
    /// storage failure leaves the served preferences untouched.
    pub fn update(&self, user: UserId, preferences: Preferences) -> Result<(), Error> {
        self.store.save(user, &preferences)?;
        *self.preferences.write().unwrap() = preferences;

        Ok(())
    }

    /// Set the theme for `user` and persist the change.
    pub fn set_theme(&self, user: UserId, theme: Theme) -> Result<(), Error> {
        let mut preferences = self.preferences();
        preferences.theme = theme;
        self.update(user, preferences)
    }

    /// Set the interface language for `user` and persist the change.
    pub fn set_language(&self, user: UserId, language: Language) -> Result<(), Error> {
        let mut preferences = self.preferences();
        preferences.language = language;
        self.update(user, preferences)
    }

    /// Set the display currency for `user` and persist the change.
    pub fn set_currency(&self, user: UserId, currency: Currency) -> Result<(), Error> {
        let mut preferences = self.preferences();
        preferences.currency = currency;
        self.update(user, preferences)
    }

    /// Resolve a dotted translation key in the active language.
    ///
    /// See [translate] for the lookup and substitution rules.
    pub fn translate(&self, key: &str, substitutions: &[(&str, &str)]) -> String {
        translate(self.preferences().language, key, substitutions)
    }

    /// Format `amount` for the active (language, currency) pair.
    ///
    /// The formatter is derived from the preferences on every call, so a
    /// language or currency change is never served stale.
    pub fn format_currency(&self, amount: f64) -> String {
        let preferences = self.preferences();
        format_currency(preferences.language, preferences.currency, amount)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::{Currency, Language, PreferenceStore, Preferences, SettingsService, Theme};
    use crate::{Error, UserId};

    #[derive(Default)]
    struct FakeStore {
        saved: Arc<Mutex<Vec<(UserId, Preferences)>>>,
        stored: Option<Preferences>,
    }

    impl PreferenceStore for FakeStore {
        fn load(&self, _user: UserId) -> Result<Option<Preferences>, Error> {
            Ok(self.stored)
        }

        fn save(&self, user: UserId, preferences: &Preferences) -> Result<(), Error> {
            self.saved.lock().unwrap().push((user, *preferences));
            Ok(())
        }
    }

    #[test]
    fn starts_unloaded_with_defaults() {
        let settings = SettingsService::new(FakeStore::default());

        assert!(!settings.is_loaded());
        assert_eq!(settings.preferences(), Preferences::default());
    }

    #[test]
    fn load_replaces_defaults_with_stored_row() {
        let stored = Preferences {
            theme: Theme::Dark,
            language: Language::Uk,
            currency: Currency::Uah,
        };
        let settings = SettingsService::new(FakeStore {
            stored: Some(stored),
            ..FakeStore::default()
        });

        settings.load(1).unwrap();

        assert!(settings.is_loaded());
        assert_eq!(settings.preferences(), stored);
    }

    #[test]
    fn load_keeps_defaults_for_new_user() {
        let settings = SettingsService::new(FakeStore::default());

        settings.load(1).unwrap();

        assert!(settings.is_loaded());
        assert_eq!(settings.preferences(), Preferences::default());
    }

    #[test]
    fn changes_write_through_to_the_store() {
        let saved = Arc::new(Mutex::new(Vec::new()));
        let settings = SettingsService::new(FakeStore {
            saved: saved.clone(),
            stored: None,
        });

        settings.set_theme(1, Theme::Dark).unwrap();
        settings.set_language(1, Language::Uk).unwrap();
        settings.set_currency(1, Currency::Eur).unwrap();

        let saved = saved.lock().unwrap();
        assert_eq!(saved.len(), 3);
        assert_eq!(
            saved[2].1,
            Preferences {
                theme: Theme::Dark,
                language: Language::Uk,
                currency: Currency::Eur,
            }
        );
    }

    struct FailingStore;

    impl PreferenceStore for FailingStore {
        fn load(&self, _user: UserId) -> Result<Option<Preferences>, Error> {
            Ok(None)
        }

        fn save(&self, _user: UserId, _preferences: &Preferences) -> Result<(), Error> {
            Err(Error::PreferenceFile("disk full".to_owned()))
        }
    }

    #[test]
    fn a_failed_save_leaves_the_served_preferences_unchanged() {
        let settings = SettingsService::new(FailingStore);

        let result = settings.set_theme(1, Theme::Dark);

        assert!(result.is_err());
        assert_eq!(settings.preferences(), Preferences::default());
    }

    #[test]
    fn format_currency_tracks_preference_changes() {
        let settings = SettingsService::new(FakeStore::default());

        assert_eq!(settings.format_currency(5.0), "$5.00");

        settings.set_currency(1, Currency::Eur).unwrap();
        assert_eq!(settings.format_currency(5.0), "€5.00");
    }
}
