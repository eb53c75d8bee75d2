//! The aggregation hub that caches the signed-in user's data.
//!
//! [DataHub] holds one [Snapshot] of all six collections and keeps it
//! current: a full refetch on sign-in or after any write, a reset on
//! sign-out. Reads elsewhere in the application are served from the
//! cached snapshot rather than from the store.
//!
//! Two guards keep concurrent callers coherent. A refresh gate ensures
//! only one full refetch runs at a time, and a generation counter lets
//! a sign-out that lands mid-refetch invalidate the in-flight results
//! instead of letting them overwrite the freshly cleared state.

use std::{
    fmt::{self, Display, Formatter},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use serde::Serialize;
use tokio::sync::{Mutex, RwLock, watch};

use crate::{
    AuthSession, Error, UserId,
    models::{
        Account, Car, Goal, GoalId, NewAccount, NewCar, NewGoal, NewRefueling, NewServiceRecord,
        NewTransaction, Refueling, ServiceRecord, Transaction,
    },
    stores::DataStore,
};

/// All of one user's data, as of the last successful refetch.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// The user's accounts.
    pub accounts: Vec<Account>,
    /// The user's transactions.
    pub transactions: Vec<Transaction>,
    /// The user's savings goals.
    pub goals: Vec<Goal>,
    /// The user's cars.
    pub cars: Vec<Car>,
    /// Refuelings across all of the user's cars.
    pub refuelings: Vec<Refueling>,
    /// Service records across all of the user's cars.
    pub service_records: Vec<ServiceRecord>,
}

/// Names one of the six cached collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Collection {
    /// The accounts collection.
    Accounts,
    /// The transactions collection.
    Transactions,
    /// The goals collection.
    Goals,
    /// The cars collection.
    Cars,
    /// The refuelings collection.
    Refuelings,
    /// The service records collection.
    ServiceRecords,
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Collection::Accounts => "accounts",
            Collection::Transactions => "transactions",
            Collection::Goals => "goals",
            Collection::Cars => "cars",
            Collection::Refuelings => "refuelings",
            Collection::ServiceRecords => "service records",
        })
    }
}

/// The outcome of one full refetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchReport {
    /// Collections whose query failed. Their cached data was kept and
    /// marked stale.
    pub failed: Vec<Collection>,
    /// Whether the results were thrown away because the identity
    /// changed while the queries ran.
    pub discarded: bool,
}

#[derive(Debug, Default)]
struct HubState {
    snapshot: Snapshot,
    is_loading: bool,
    stale: Vec<Collection>,
}

/// Caches the signed-in user's data and keeps it current across writes
/// and identity changes.
///
/// Cloning the hub is cheap; all clones share the same cache.
#[derive(Debug, Clone)]
pub struct DataHub<S: DataStore> {
    store: S,
    auth: AuthSession,
    state: Arc<RwLock<HubState>>,
    refresh_gate: Arc<Mutex<()>>,
    generation: Arc<AtomicU64>,
}

impl<S: DataStore> DataHub<S> {
    /// Create a hub over `store` that resolves identity through `auth`.
    ///
    /// The cache starts empty; call [refresh_all](Self::refresh_all) or
    /// run [run_identity_watcher] to populate it.
    pub fn new(store: S, auth: AuthSession) -> Self {
        Self {
            store,
            auth,
            state: Arc::new(RwLock::new(HubState::default())),
            refresh_gate: Arc::new(Mutex::new(())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// The cached snapshot.
    pub async fn snapshot(&self) -> Snapshot {
        self.state.read().await.snapshot.clone()
    }

    /// Whether a full refetch is currently in flight.
    pub async fn is_loading(&self) -> bool {
        self.state.read().await.is_loading
    }

    /// Collections whose last refetch failed and whose cached data may
    /// be out of date.
    pub async fn stale(&self) -> Vec<Collection> {
        self.state.read().await.stale.clone()
    }

    /// Refetch all six collections and replace the cached snapshot.
    ///
    /// Queries run concurrently on the blocking pool. A collection
    /// whose query fails keeps its cached data and is reported in
    /// [FetchReport::failed]; the other collections still update.
    ///
    /// Only one refetch runs at a time. A second caller waits for the
    /// first to finish and then runs its own.
    ///
    /// # Errors
    ///
    /// Returns [Error::Unauthenticated] when no identity is signed in.
    pub async fn refresh_all(&self) -> Result<FetchReport, Error> {
        let _gate = self.refresh_gate.lock().await;

        let Some(user) = self.auth.current() else {
            return Err(Error::Unauthenticated);
        };

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.write().await.is_loading = true;

        let (accounts, transactions, goals, cars, refuelings, service_records) = tokio::join!(
            fetch(self.store.clone(), move |store| store.accounts(user)),
            fetch(self.store.clone(), move |store| store.transactions(user)),
            fetch(self.store.clone(), move |store| store.goals(user)),
            fetch(self.store.clone(), move |store| store.cars(user)),
            fetch(self.store.clone(), move |store| store.refuelings(user)),
            fetch(self.store.clone(), move |store| {
                store.service_records(user)
            }),
        );

        let mut state = self.state.write().await;
        state.is_loading = false;

        if self.generation.load(Ordering::SeqCst) != generation {
            // The identity changed while the queries ran. The results
            // belong to a superseded view and must not land.
            return Ok(FetchReport {
                failed: vec![],
                discarded: true,
            });
        }

        let mut failed = Vec::new();
        apply(
            accounts,
            Collection::Accounts,
            &mut state.snapshot.accounts,
            &mut failed,
        );
        apply(
            transactions,
            Collection::Transactions,
            &mut state.snapshot.transactions,
            &mut failed,
        );
        apply(
            goals,
            Collection::Goals,
            &mut state.snapshot.goals,
            &mut failed,
        );
        apply(cars, Collection::Cars, &mut state.snapshot.cars, &mut failed);
        apply(
            refuelings,
            Collection::Refuelings,
            &mut state.snapshot.refuelings,
            &mut failed,
        );
        apply(
            service_records,
            Collection::ServiceRecords,
            &mut state.snapshot.service_records,
            &mut failed,
        );

        state.stale = failed.clone();

        Ok(FetchReport {
            failed,
            discarded: false,
        })
    }

    /// Drop the cached snapshot and invalidate any refetch in flight.
    pub async fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        *self.state.write().await = HubState::default();
    }

    /// Create an account for the signed-in user, then refetch.
    ///
    /// # Errors
    ///
    /// Returns [Error::Unauthenticated] when no identity is signed in,
    /// or the underlying store error when the write fails.
    pub async fn add_account(&self, new_account: NewAccount) -> Result<Account, Error> {
        let created = self
            .write(move |store, user| store.create_account(user, new_account))
            .await?;

        self.refetch_after_write().await;

        Ok(created)
    }

    /// Record a transaction for the signed-in user, then refetch.
    ///
    /// # Errors
    ///
    /// Returns [Error::Unauthenticated] when no identity is signed in,
    /// or the underlying store error when the write fails.
    pub async fn add_transaction(
        &self,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, Error> {
        let created = self
            .write(move |store, user| store.create_transaction(user, new_transaction))
            .await?;

        self.refetch_after_write().await;

        Ok(created)
    }

    /// Create a savings goal for the signed-in user, then refetch.
    ///
    /// # Errors
    ///
    /// Returns [Error::Unauthenticated] when no identity is signed in,
    /// or the underlying store error when the write fails.
    pub async fn add_goal(&self, new_goal: NewGoal) -> Result<Goal, Error> {
        let created = self
            .write(move |store, user| store.create_goal(user, new_goal))
            .await?;

        self.refetch_after_write().await;

        Ok(created)
    }

    /// Delete one of the signed-in user's goals, then refetch.
    ///
    /// # Errors
    ///
    /// Returns [Error::Unauthenticated] when no identity is signed in,
    /// or [Error::NotFound] when the user has no such goal.
    pub async fn delete_goal(&self, id: GoalId) -> Result<(), Error> {
        self.write(move |store, user| store.delete_goal(user, id))
            .await?;

        self.refetch_after_write().await;

        Ok(())
    }

    /// Add a car to the signed-in user's garage, then refetch.
    ///
    /// # Errors
    ///
    /// Returns [Error::Unauthenticated] when no identity is signed in,
    /// or the underlying store error when the write fails.
    pub async fn add_car(&self, new_car: NewCar) -> Result<Car, Error> {
        let created = self
            .write(move |store, user| store.create_car(user, new_car))
            .await?;

        self.refetch_after_write().await;

        Ok(created)
    }

    /// Record a refueling for the signed-in user, then refetch.
    ///
    /// # Errors
    ///
    /// Returns [Error::Unauthenticated] when no identity is signed in,
    /// or the underlying store error when the write fails.
    pub async fn add_refueling(&self, new_refueling: NewRefueling) -> Result<Refueling, Error> {
        let created = self
            .write(move |store, user| store.create_refueling(user, new_refueling))
            .await?;

        self.refetch_after_write().await;

        Ok(created)
    }

    /// Record a service visit for the signed-in user, then refetch.
    ///
    /// # Errors
    ///
    /// Returns [Error::Unauthenticated] when no identity is signed in,
    /// or the underlying store error when the write fails.
    pub async fn add_service_record(
        &self,
        new_record: NewServiceRecord,
    ) -> Result<ServiceRecord, Error> {
        let created = self
            .write(move |store, user| store.create_service_record(user, new_record))
            .await?;

        self.refetch_after_write().await;

        Ok(created)
    }

    async fn write<T, F>(&self, write: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce(&S, UserId) -> Result<T, Error> + Send + 'static,
    {
        let Some(user) = self.auth.current() else {
            return Err(Error::Unauthenticated);
        };

        let store = self.store.clone();

        tokio::task::spawn_blocking(move || write(&store, user))
            .await
            .expect("store write task panicked")
    }

    async fn refetch_after_write(&self) {
        // The write already succeeded, so the only error here is a
        // sign-out that raced the refetch. The watcher handles that.
        if let Err(error) = self.refresh_all().await {
            tracing::debug!("skipping refetch after write: {error}");
        }
    }
}

async fn fetch<S, T, F>(store: S, query: F) -> Result<T, Error>
where
    S: DataStore,
    T: Send + 'static,
    F: FnOnce(&S) -> Result<T, Error> + Send + 'static,
{
    tokio::task::spawn_blocking(move || query(&store))
        .await
        .expect("store query task panicked")
}

fn apply<T>(
    result: Result<Vec<T>, Error>,
    collection: Collection,
    cached: &mut Vec<T>,
    failed: &mut Vec<Collection>,
) {
    match result {
        Ok(items) => *cached = items,
        Err(error) => {
            tracing::error!("could not refresh {collection}: {error}");
            failed.push(collection);
        }
    }
}

/// Drive `hub` from identity changes until `identity` closes.
///
/// A signed-in identity triggers a full refetch, a signed-out one
/// clears the cache. The value at subscription time is acted on too,
/// so the hub converges even when the watcher starts after sign-in.
pub async fn run_identity_watcher<S: DataStore>(
    hub: DataHub<S>,
    mut identity: watch::Receiver<Option<UserId>>,
) {
    loop {
        let signed_in = identity.borrow_and_update().is_some();

        if signed_in {
            if let Err(error) = hub.refresh_all().await {
                tracing::debug!("identity changed during refresh: {error}");
            }
        } else {
            hub.clear().await;
        }

        if identity.changed().await.is_err() {
            return;
        }
    }
}
