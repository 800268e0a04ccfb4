//! In-memory store and app harness for the API tests

use std::{
    sync::{
        atomic::{AtomicBool, AtomicI32, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use async_trait::async_trait;
use bookshelf_server::{
    config::ServerConfig,
    lifecycle::{Component, Lifecycle},
    models::{Book, CreateEntryParams, Entry},
    repository::Queries,
    App, AppError, AppResult,
};

/// Book name that makes the store panic mid-request
pub const PANIC_TRIGGER: &str = "__panic__";

pub type Log = Arc<Mutex<Vec<String>>>;

/// Store kept in memory, registered as a component so its stop hook is
/// ordered against the HTTP server's
pub struct MemoryStore {
    books: Mutex<Vec<Book>>,
    entries: Mutex<Vec<Entry>>,
    next_id: AtomicI32,
    list_delay: Duration,
    closed: AtomicBool,
    log: Log,
}

impl MemoryStore {
    pub fn new(list_delay: Duration, log: Log) -> Self {
        Self {
            books: Mutex::new(Vec::new()),
            entries: Mutex::new(Vec::new()),
            next_id: AtomicI32::new(1),
            list_delay,
            closed: AtomicBool::new(false),
            log,
        }
    }

    fn ensure_open(&self) -> AppResult<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("store is closed").into());
        }
        Ok(())
    }
}

#[async_trait]
impl Queries for MemoryStore {
    async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.ensure_open()?;
        if !self.list_delay.is_zero() {
            tokio::time::sleep(self.list_delay).await;
        }
        self.log.lock().unwrap().push("list_books".to_string());
        Ok(self.books.lock().unwrap().clone())
    }

    async fn create_book(&self, name: &str) -> AppResult<Book> {
        self.ensure_open()?;
        if name == PANIC_TRIGGER {
            panic!("store corrupted");
        }
        let book = Book {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            name: name.to_string(),
        };
        self.books.lock().unwrap().push(book.clone());
        Ok(book)
    }

    async fn entries_by_book(&self, book_id: i32) -> AppResult<Vec<Entry>> {
        self.ensure_open()?;
        Ok(self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|entry| entry.book_id == book_id)
            .cloned()
            .collect())
    }

    async fn create_entry(&self, params: CreateEntryParams) -> AppResult<Entry> {
        self.ensure_open()?;
        let entry = Entry {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            book_id: params.book_id,
            entry_type: params.entry_type,
            content: params.content,
            key: params.key,
        };
        self.entries.lock().unwrap().push(entry.clone());
        Ok(entry)
    }

    async fn delete_entry(&self, id: i32, book_id: i32) -> AppResult<()> {
        self.ensure_open()?;
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|entry| !(entry.id == id && entry.book_id == book_id));
        if entries.len() == before {
            return Err(AppError::not_found(format!(
                "Entry {} not found in book {}",
                id, book_id
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Component for MemoryStore {
    fn name(&self) -> &'static str {
        "memory store"
    }

    async fn stop(&self) -> anyhow::Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        self.log.lock().unwrap().push("store closed".to_string());
        Ok(())
    }
}

pub struct TestApp {
    pub app: App,
    pub base_url: String,
    pub log: Log,
}

/// Start the full application on an ephemeral port
pub async fn spawn_app(list_delay: Duration) -> TestApp {
    let log = Log::default();
    let mut lifecycle = Lifecycle::new(Duration::from_secs(5));

    let store_log = log.clone();
    let store = lifecycle
        .provide("memory store", async move {
            Ok(MemoryStore::new(list_delay, store_log))
        })
        .await
        .expect("Failed to build store");

    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        shutdown_timeout_secs: 5,
    };
    let mut app = App::assemble(lifecycle, store, &config)
        .await
        .expect("Failed to assemble app");
    app.start().await.expect("Failed to start app");

    let addr = app.local_addr().expect("Server not bound");
    TestApp {
        app,
        base_url: format!("http://{}", addr),
        log,
    }
}
