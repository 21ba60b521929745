use crate::db::connection::{init_db, Database};
use crate::notify::{build_notifier, Notifier};
use crate::router::handle;
use astra::Server;
use std::net::SocketAddr;
use std::sync::Arc;

mod db;
mod domain;
mod errors;
mod notify;
mod responses;
mod router;
mod workflow;

#[cfg(test)]
mod tests;

fn main() {
    // 1️⃣ Create the database handle
    let db = Database::new("rent_reminders.sqlite3");

    // 2️⃣ Initialize database from schema.sql
    if let Err(e) = init_db(&db, "sql/schema.sql") {
        eprintln!("❌ Database initialization failed: {e}");
        std::process::exit(1);
    }

    // 3️⃣ Pick the notifier: Brevo when credentials are configured,
    // console mock otherwise.
    let notifier: Arc<dyn Notifier> = build_notifier();

    // 4️⃣ Start the server
    let addr: SocketAddr = "127.0.0.1:3000".parse().unwrap();
    println!("Starting server at http://{addr}");

    let server = Server::bind(&addr).max_workers(8);

    // 5️⃣ Serve requests, passing db + notifier handles into closure
    let result = server.serve(move |req, _info| match handle(req, &db, notifier.as_ref()) {
        Ok(resp) => resp,
        Err(err) => responses::error_to_response(err),
    });

    if let Err(e) = result {
        eprintln!("Server ended with error: {e}");
    }

    println!("Server shut down cleanly.");
}
