//! Wires a database and a user service, uses them, and shuts them down.

use anyhow::Result;
use bind::{
    handle, items, Binder, Capabilities, Component, Field, Handle, HookResult, Hooks, Logger,
    Shutdown, Startup,
};

trait UserStore: Send + Sync {
    fn user_name(&self, id: u32) -> Option<String>;
}

struct Database {
    connection_string: String,
    connected: bool,
}

impl Startup for Database {
    fn startup(&mut self) -> HookResult {
        println!("Connecting to database: {}", self.connection_string);
        self.connected = true;
        Ok(())
    }
}

impl Shutdown for Database {
    fn shutdown(&mut self) -> HookResult {
        println!("Disconnecting from database");
        self.connected = false;
        Ok(())
    }
}

impl UserStore for Database {
    fn user_name(&self, id: u32) -> Option<String> {
        self.connected.then(|| format!("User {id}"))
    }
}

impl Component for Database {
    fn capabilities() -> Capabilities<Self> {
        Capabilities::new().with::<dyn UserStore>(|h| h)
    }

    fn hooks() -> Hooks<Self> {
        Hooks::new().with_startup().with_shutdown()
    }
}

#[derive(Default)]
struct UserService {
    store: Option<Handle<dyn UserStore>>,
}

impl UserService {
    fn user(&self, id: u32) -> String {
        self.store
            .as_ref()
            .and_then(|store| store.read().ok()?.user_name(id))
            .unwrap_or_default()
    }
}

impl Startup for UserService {
    fn startup(&mut self) -> HookResult {
        if self.store.is_none() {
            return Err("no user store registered".into());
        }
        println!("UserService starting up");
        Ok(())
    }
}

impl Component for UserService {
    fn fields() -> Vec<Field<Self>> {
        vec![Field::capability("store", |s: &mut Self, store| s.store = Some(store))]
    }

    fn hooks() -> Hooks<Self> {
        Hooks::new().with_startup()
    }
}

fn main() -> Result<()> {
    let mut binder = Binder::new();

    let database = handle(Database {
        connection_string: "postgres://localhost/mydb".to_string(),
        connected: false,
    });
    let users = handle(UserService::default());

    binder.add(items![
        handle(Logger::stderr()),
        database.clone(),
        users.clone()
    ])?;

    let name = users
        .read()
        .map_err(|_| anyhow::anyhow!("user service lock poisoned"))?
        .user(123);
    println!("Retrieved: {name}");

    binder.shutdown();
    Ok(())
}
